//! Guarded downloads of chat attachments and mentorship documents.
//!
//! Checks run in a fixed order and the first failure wins: the caller must be
//! authenticated, the record must exist, the relationship must allow access,
//! and only then is the stored file looked up. A record whose file is missing
//! is reported as not found.

use mentor_portal_core::{ChatMessageId, DocumentId};
use mentor_portal_platform_access::{AccessError, ActiveRole, Role};
use rootcause::Report;
use std::sync::Arc;
use tracing::instrument;

use crate::access::MentorshipAccessService;
use crate::relationship::{check, AdminPolicy, Decision, MentorshipResource};
use crate::store::{ArtifactStore, AssignmentStore, DocumentStore, MessageStore, ThreadStore};
use crate::types::{ArtifactRef, StoredArtifact};

#[derive(Clone)]
pub struct ResourceDownloadGuard {
    access: MentorshipAccessService,
    assignments: Arc<dyn AssignmentStore>,
    threads: Arc<dyn ThreadStore>,
    messages: Arc<dyn MessageStore>,
    documents: Arc<dyn DocumentStore>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl ResourceDownloadGuard {
    #[must_use]
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        threads: Arc<dyn ThreadStore>,
        messages: Arc<dyn MessageStore>,
        documents: Arc<dyn DocumentStore>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            access: MentorshipAccessService::new(assignments.clone()),
            assignments,
            threads,
            messages,
            documents,
            artifacts,
        }
    }

    /// Authorizes downloading a chat message's attachment.
    ///
    /// Administrators need `escalate` unless the thread is already escalated.
    ///
    /// # Errors
    ///
    /// [`AccessError::Unauthenticated`], [`AccessError::Forbidden`],
    /// [`AccessError::NotFound`], or [`AccessError::Unavailable`].
    #[instrument(skip(self, actor), fields(user_id = ?actor.map(ActiveRole::user_id)))]
    pub async fn chat_attachment(
        &self,
        actor: Option<&ActiveRole>,
        message_id: ChatMessageId,
        escalate: bool,
    ) -> Result<StoredArtifact, Report<AccessError>> {
        let actor = actor.ok_or(AccessError::Unauthenticated)?;

        let message = self
            .messages
            .find_message(message_id)
            .await
            .map_err(AccessError::unavailable)?
            .ok_or_else(|| AccessError::not_found("chat message"))?;
        let thread = self
            .threads
            .find_thread(message.thread_id)
            .await
            .map_err(AccessError::unavailable)?
            .ok_or_else(|| AccessError::not_found("chat thread"))?;

        let decision = if actor.role() == Role::Admin {
            check(
                actor,
                MentorshipResource::Thread(&thread),
                AdminPolicy::Escalation {
                    requested: escalate,
                },
                self.assignments.as_ref(),
            )
            .await
            .map_err(AccessError::unavailable)?
        } else {
            Decision::from_bool(
                self.access
                    .can_access_thread(actor, &thread)
                    .await
                    .map_err(AccessError::unavailable)?,
            )
        };
        require(decision)?;

        self.existing_artifact(&message.attachment, "chat attachment")
            .await
    }

    /// Authorizes downloading a mentorship document's file.
    ///
    /// Administrators need `escalate`; documents carry no escalation state.
    ///
    /// # Errors
    ///
    /// [`AccessError::Unauthenticated`], [`AccessError::Forbidden`],
    /// [`AccessError::NotFound`], or [`AccessError::Unavailable`].
    #[instrument(skip(self, actor), fields(user_id = ?actor.map(ActiveRole::user_id)))]
    pub async fn document(
        &self,
        actor: Option<&ActiveRole>,
        document_id: DocumentId,
        escalate: bool,
    ) -> Result<StoredArtifact, Report<AccessError>> {
        let actor = actor.ok_or(AccessError::Unauthenticated)?;

        let document = self
            .documents
            .find_document(document_id)
            .await
            .map_err(AccessError::unavailable)?
            .ok_or_else(|| AccessError::not_found("document"))?;

        let decision = check(
            actor,
            MentorshipResource::Document(&document),
            AdminPolicy::Escalation {
                requested: escalate,
            },
            self.assignments.as_ref(),
        )
        .await
        .map_err(AccessError::unavailable)?;
        require(decision)?;

        self.existing_artifact(&document.file, "document file").await
    }

    async fn existing_artifact(
        &self,
        file: &ArtifactRef,
        what: &'static str,
    ) -> Result<StoredArtifact, Report<AccessError>> {
        let artifact = file.artifact().ok_or_else(|| AccessError::not_found(what))?;
        let exists = self
            .artifacts
            .exists(&artifact)
            .await
            .map_err(AccessError::unavailable)?;
        if !exists {
            return Err(AccessError::not_found(what).into());
        }
        Ok(artifact)
    }
}

fn require(decision: Decision) -> Result<(), Report<AccessError>> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(AccessError::forbidden("no mentorship relationship").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryArtifactStore, InMemoryMentorshipStore};
    use crate::types::{
        AdvisorType, ChatMessage, ChatThread, MentorshipAssignment, MentorshipDocument,
    };
    use mentor_portal_core::{ThreadId, UserId};
    use mentor_portal_platform_access::Role;

    struct Fixture {
        store: Arc<InMemoryMentorshipStore>,
        artifacts: Arc<InMemoryArtifactStore>,
        guard: ResourceDownloadGuard,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryMentorshipStore::new());
        let artifacts = Arc::new(InMemoryArtifactStore::new());
        let guard = ResourceDownloadGuard::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            artifacts.clone(),
        );
        Fixture {
            store,
            artifacts,
            guard,
        }
    }

    fn kind(err: &Report<AccessError>) -> &'static str {
        match err.current_context() {
            AccessError::Unauthenticated => "unauthenticated",
            AccessError::Forbidden { .. } => "forbidden",
            AccessError::NotFound { .. } => "not found",
            AccessError::Unavailable => "unavailable",
        }
    }

    impl Fixture {
        /// A thread owned by `student` with one message carrying a stored attachment.
        fn thread_with_attachment(&self, student: UserId, is_escalated: bool) -> ChatMessageId {
            let thread = ChatThread {
                id: ThreadId::new(),
                student_id: student,
                is_escalated,
            };
            let message = ChatMessage {
                id: ChatMessageId::new(),
                thread_id: thread.id,
                sender_id: student,
                attachment: ArtifactRef::on_disk("local", "chat/notes.pdf", "notes.pdf"),
            };
            self.artifacts.put("local", "chat/notes.pdf", b"%PDF".to_vec());
            self.store.add_thread(thread);
            let id = message.id;
            self.store.add_message(message);
            id
        }

        fn document(&self, student: UserId, lecturer: Option<UserId>, file: ArtifactRef) -> DocumentId {
            let document = MentorshipDocument {
                id: DocumentId::new(),
                student_id: student,
                lecturer_id: lecturer,
                title: "Thesis draft".to_string(),
                file,
            };
            let id = document.id;
            self.store.add_document(document);
            id
        }
    }

    #[tokio::test]
    async fn anonymous_download_is_unauthenticated() {
        let f = fixture();
        let message = f.thread_with_attachment(UserId::new(), false);
        let err = f.guard.chat_attachment(None, message, false).await.unwrap_err();
        assert_eq!(kind(&err), "unauthenticated");
    }

    #[tokio::test]
    async fn thread_owner_downloads_attachment() {
        let f = fixture();
        let student = UserId::new();
        let message = f.thread_with_attachment(student, false);
        let actor = ActiveRole::new(student, Role::Student);

        let artifact = f
            .guard
            .chat_attachment(Some(&actor), message, false)
            .await
            .unwrap();
        assert_eq!(artifact.display_name, "notes.pdf");
        assert_eq!(artifact.path, "chat/notes.pdf");
    }

    #[tokio::test]
    async fn assigned_lecturer_downloads_attachment_until_assignment_ends() {
        let f = fixture();
        let student = UserId::new();
        let lecturer = UserId::new();
        let message = f.thread_with_attachment(student, false);
        let actor = ActiveRole::new(lecturer, Role::Lecturer);

        f.store
            .add_assignment(MentorshipAssignment::active(student, lecturer, AdvisorType::Primary));
        assert!(f.guard.chat_attachment(Some(&actor), message, false).await.is_ok());

        f.store.end_assignment(student, lecturer);
        let err = f
            .guard
            .chat_attachment(Some(&actor), message, false)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), "forbidden");
    }

    #[tokio::test]
    async fn attachment_access_for_ordinary_roles_matches_thread_access() {
        let f = fixture();
        let student = UserId::new();
        let assigned = UserId::new();
        f.store
            .add_assignment(MentorshipAssignment::active(student, assigned, AdvisorType::Secondary));
        let message = f.thread_with_attachment(student, true);
        let thread = f
            .store
            .find_thread(f.store.find_message(message).await.unwrap().unwrap().thread_id)
            .await
            .unwrap()
            .unwrap();
        let access = MentorshipAccessService::new(f.store.clone());

        let actors = [
            ActiveRole::new(student, Role::Student),
            ActiveRole::new(UserId::new(), Role::Student),
            ActiveRole::new(assigned, Role::Lecturer),
            ActiveRole::new(UserId::new(), Role::Lecturer),
            ActiveRole::new(student, Role::Examiner),
        ];
        for actor in &actors {
            let expected = access.can_access_thread(actor, &thread).await.unwrap();
            let downloaded = f.guard.chat_attachment(Some(actor), message, true).await;
            assert_eq!(downloaded.is_ok(), expected, "{:?}", actor.role());
        }
    }

    #[tokio::test]
    async fn admin_attachment_access_needs_escalation() {
        let f = fixture();
        let admin = ActiveRole::new(UserId::new(), Role::Admin);
        let quiet = f.thread_with_attachment(UserId::new(), false);
        let escalated = f.thread_with_attachment(UserId::new(), true);

        let err = f.guard.chat_attachment(Some(&admin), quiet, false).await.unwrap_err();
        assert_eq!(kind(&err), "forbidden");
        assert!(f.guard.chat_attachment(Some(&admin), quiet, true).await.is_ok());
        assert!(f.guard.chat_attachment(Some(&admin), escalated, false).await.is_ok());
    }

    #[tokio::test]
    async fn missing_message_or_file_is_not_found() {
        let f = fixture();
        let student = UserId::new();
        let actor = ActiveRole::new(student, Role::Student);

        let err = f
            .guard
            .chat_attachment(Some(&actor), ChatMessageId::new(), false)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), "not found");

        let message = f.thread_with_attachment(student, false);
        f.artifacts.remove("local", "chat/notes.pdf");
        let err = f
            .guard
            .chat_attachment(Some(&actor), message, false)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), "not found");
    }

    #[tokio::test]
    async fn document_belongs_to_its_student_only() {
        let f = fixture();
        let owner = UserId::new();
        let other = UserId::new();
        f.artifacts.put("local", "docs/5.pdf", b"five".to_vec());
        let doc = f.document(owner, None, ArtifactRef::on_disk("local", "docs/5.pdf", "5.pdf"));

        let ok = f
            .guard
            .document(Some(&ActiveRole::new(owner, Role::Student)), doc, false)
            .await;
        assert!(ok.is_ok());

        let err = f
            .guard
            .document(Some(&ActiveRole::new(other, Role::Student)), doc, false)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), "forbidden");
    }

    #[tokio::test]
    async fn document_lecturer_must_be_named_on_document() {
        let f = fixture();
        let student = UserId::new();
        let named = UserId::new();
        let advisor = UserId::new();
        f.store
            .add_assignment(MentorshipAssignment::active(student, advisor, AdvisorType::Primary));
        f.artifacts.put("local", "docs/review.pdf", b"review".to_vec());
        let doc = f.document(
            student,
            Some(named),
            ArtifactRef::on_disk("local", "docs/review.pdf", "review.pdf"),
        );

        let named_actor = ActiveRole::new(named, Role::Lecturer);
        assert!(f.guard.document(Some(&named_actor), doc, false).await.is_ok());

        let advisor_actor = ActiveRole::new(advisor, Role::Lecturer);
        let err = f.guard.document(Some(&advisor_actor), doc, false).await.unwrap_err();
        assert_eq!(kind(&err), "forbidden");
    }

    #[tokio::test]
    async fn admin_document_access_needs_explicit_escalation() {
        let f = fixture();
        f.artifacts.put("local", "docs/x.pdf", b"x".to_vec());
        let doc = f.document(
            UserId::new(),
            None,
            ArtifactRef::on_disk("local", "docs/x.pdf", "x.pdf"),
        );
        let admin = ActiveRole::new(UserId::new(), Role::Admin);

        let err = f.guard.document(Some(&admin), doc, false).await.unwrap_err();
        assert_eq!(kind(&err), "forbidden");
        assert!(f.guard.document(Some(&admin), doc, true).await.is_ok());
    }

    #[tokio::test]
    async fn document_without_disk_is_not_found_after_authorization() {
        let f = fixture();
        let owner = UserId::new();
        let doc = f.document(
            owner,
            None,
            ArtifactRef {
                disk: None,
                path: Some("docs/orphan.pdf".to_string()),
                name: None,
            },
        );

        let err = f
            .guard
            .document(Some(&ActiveRole::new(owner, Role::Student)), doc, false)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), "not found");

        let err = f
            .guard
            .document(Some(&ActiveRole::new(UserId::new(), Role::Student)), doc, false)
            .await
            .unwrap_err();
        assert_eq!(kind(&err), "forbidden");
    }
}
