//! Thread access for the ordinary portal roles.

use mentor_portal_platform_access::{ActiveRole, StoreError};
use rootcause::Report;
use std::sync::Arc;

use crate::relationship::{check, AdminPolicy, MentorshipResource};
use crate::store::AssignmentStore;
use crate::types::ChatThread;

/// Answers whether a student or lecturer may reach a chat thread.
///
/// Administrators are never granted access here; escalated access is decided
/// by the caller that knows whether it was requested.
#[derive(Clone)]
pub struct MentorshipAccessService {
    assignments: Arc<dyn AssignmentStore>,
}

impl MentorshipAccessService {
    #[must_use]
    pub fn new(assignments: Arc<dyn AssignmentStore>) -> Self {
        Self { assignments }
    }

    /// # Errors
    ///
    /// Fails if the assignment store cannot be read.
    pub async fn can_access_thread(
        &self,
        actor: &ActiveRole,
        thread: &ChatThread,
    ) -> Result<bool, Report<StoreError>> {
        let decision = check(
            actor,
            MentorshipResource::Thread(thread),
            AdminPolicy::Deny,
            self.assignments.as_ref(),
        )
        .await?;
        Ok(decision.is_allowed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMentorshipStore;
    use crate::types::{AdvisorType, MentorshipAssignment};
    use mentor_portal_core::{ThreadId, UserId};
    use mentor_portal_platform_access::Role;

    #[tokio::test]
    async fn ending_an_assignment_revokes_lecturer_access() {
        let store = Arc::new(InMemoryMentorshipStore::new());
        let service = MentorshipAccessService::new(store.clone());
        let student = UserId::new();
        let lecturer = UserId::new();
        let thread = ChatThread {
            id: ThreadId::new(),
            student_id: student,
            is_escalated: false,
        };
        let actor = ActiveRole::new(lecturer, Role::Lecturer);

        assert!(!service.can_access_thread(&actor, &thread).await.unwrap());

        store.add_assignment(MentorshipAssignment::active(student, lecturer, AdvisorType::Primary));
        assert!(service.can_access_thread(&actor, &thread).await.unwrap());

        assert!(store.end_assignment(student, lecturer));
        assert!(!service.can_access_thread(&actor, &thread).await.unwrap());
    }

    #[tokio::test]
    async fn administrators_are_not_granted_thread_access() {
        let store = Arc::new(InMemoryMentorshipStore::new());
        let service = MentorshipAccessService::new(store);
        let thread = ChatThread {
            id: ThreadId::new(),
            student_id: UserId::new(),
            is_escalated: true,
        };
        let admin = ActiveRole::new(UserId::new(), Role::Admin);
        assert!(!service.can_access_thread(&admin, &thread).await.unwrap());
    }
}
