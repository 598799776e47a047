//! In-process store implementations.

use async_trait::async_trait;
use mentor_portal_core::{ChatMessageId, DocumentId, ThreadId, UserId};
use mentor_portal_platform_access::StoreError;
use rootcause::Report;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Mutex, PoisonError};

use crate::store::{
    ArtifactReader, ArtifactStore, AssignmentStore, DocumentStore, MessageStore, ThreadStore,
};
use crate::types::{
    AssignmentStatus, ChatMessage, ChatThread, MentorshipAssignment, MentorshipDocument,
    StoredArtifact,
};

#[derive(Debug, Default)]
struct MentorshipData {
    assignments: Vec<MentorshipAssignment>,
    threads: HashMap<ThreadId, ChatThread>,
    messages: HashMap<ChatMessageId, ChatMessage>,
    documents: HashMap<DocumentId, MentorshipDocument>,
}

/// Assignments, threads, messages, and documents kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryMentorshipStore {
    data: Mutex<MentorshipData>,
}

impl InMemoryMentorshipStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_assignment(&self, assignment: MentorshipAssignment) {
        self.lock().assignments.push(assignment);
    }

    /// Ends every active assignment between the pair. Returns false if there was none.
    pub fn end_assignment(&self, student_id: UserId, lecturer_id: UserId) -> bool {
        let mut ended = false;
        for assignment in self.lock().assignments.iter_mut().filter(|a| {
            a.student_id == student_id && a.lecturer_id == lecturer_id && a.is_active()
        }) {
            assignment.status = AssignmentStatus::Ended;
            ended = true;
        }
        ended
    }

    pub fn add_thread(&self, thread: ChatThread) {
        self.lock().threads.insert(thread.id, thread);
    }

    pub fn add_message(&self, message: ChatMessage) {
        self.lock().messages.insert(message.id, message);
    }

    pub fn add_document(&self, document: MentorshipDocument) {
        self.lock().documents.insert(document.id, document);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MentorshipData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AssignmentStore for InMemoryMentorshipStore {
    async fn has_active_assignment(
        &self,
        student_id: UserId,
        lecturer_id: UserId,
    ) -> Result<bool, Report<StoreError>> {
        Ok(self.lock().assignments.iter().any(|a| {
            a.student_id == student_id && a.lecturer_id == lecturer_id && a.is_active()
        }))
    }
}

#[async_trait]
impl ThreadStore for InMemoryMentorshipStore {
    async fn find_thread(&self, id: ThreadId) -> Result<Option<ChatThread>, Report<StoreError>> {
        Ok(self.lock().threads.get(&id).cloned())
    }
}

#[async_trait]
impl MessageStore for InMemoryMentorshipStore {
    async fn find_message(
        &self,
        id: ChatMessageId,
    ) -> Result<Option<ChatMessage>, Report<StoreError>> {
        Ok(self.lock().messages.get(&id).cloned())
    }
}

#[async_trait]
impl DocumentStore for InMemoryMentorshipStore {
    async fn find_document(
        &self,
        id: DocumentId,
    ) -> Result<Option<MentorshipDocument>, Report<StoreError>> {
        Ok(self.lock().documents.get(&id).cloned())
    }
}

/// File contents keyed by disk and path.
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    files: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryArtifactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, disk: &str, path: &str, contents: Vec<u8>) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((disk.to_string(), path.to_string()), contents);
    }

    pub fn remove(&self, disk: &str, path: &str) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(disk.to_string(), path.to_string()));
    }

    fn contents(&self, artifact: &StoredArtifact) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(artifact.disk.clone(), artifact.path.clone()))
            .cloned()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn exists(&self, artifact: &StoredArtifact) -> Result<bool, Report<StoreError>> {
        Ok(self.contents(artifact).is_some())
    }

    async fn open(&self, artifact: &StoredArtifact) -> Result<ArtifactReader, Report<StoreError>> {
        match self.contents(artifact) {
            Some(contents) => Ok(Box::new(Cursor::new(contents))),
            None => Err(StoreError::Unavailable {
                details: format!("no file at {}:{}", artifact.disk, artifact.path),
            }
            .into()),
        }
    }
}
