//! Realtime channel subscription authorization.
//!
//! Channel names follow `<kind>.<id>`:
//! - `user.{userId}`: private notifications for one account
//! - `thread.{threadId}`: live messages of a chat thread
//! - `schedule.{userId}`: schedule updates for one account
//!
//! Broadcasters prefix private channels with `private-`; the prefix is
//! accepted and ignored.

use mentor_portal_core::{ThreadId, UserId};
use mentor_portal_platform_access::{ActiveRole, StoreError};
use rootcause::Report;
use std::sync::Arc;
use tracing::debug;

use crate::relationship::{check, AdminPolicy, MentorshipResource};
use crate::store::{AssignmentStore, ThreadStore};

const PRIVATE_PREFIX: &str = "private-";

/// A channel a client may subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    User(UserId),
    Thread(ThreadId),
    Schedule(UserId),
}

impl Channel {
    /// Parses a channel name. Unknown kinds and malformed ids yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.strip_prefix(PRIVATE_PREFIX).unwrap_or(name);
        let (kind, id) = name.split_once('.')?;
        match kind {
            "user" => id.parse().ok().map(Self::User),
            "thread" => id.parse().ok().map(Self::Thread),
            "schedule" => id.parse().ok().map(Self::Schedule),
            _ => None,
        }
    }
}

/// Decides realtime channel subscriptions.
///
/// Subscriptions are not routed through the role gate, so the actor's role
/// is whatever the session currently resolves to.
#[derive(Clone)]
pub struct RealtimeChannelAuthorizer {
    threads: Arc<dyn ThreadStore>,
    assignments: Arc<dyn AssignmentStore>,
}

impl RealtimeChannelAuthorizer {
    #[must_use]
    pub fn new(threads: Arc<dyn ThreadStore>, assignments: Arc<dyn AssignmentStore>) -> Self {
        Self {
            threads,
            assignments,
        }
    }

    /// Returns true if `actor` may subscribe to `channel_name`.
    ///
    /// Administrators may subscribe to any existing thread, unlike the
    /// download path where they need escalation.
    ///
    /// # Errors
    ///
    /// Fails if the thread or assignment store cannot be read.
    pub async fn authorize(
        &self,
        actor: &ActiveRole,
        channel_name: &str,
    ) -> Result<bool, Report<StoreError>> {
        let Some(channel) = Channel::parse(channel_name) else {
            debug!(channel = channel_name, "rejecting unrecognized channel");
            return Ok(false);
        };

        match channel {
            Channel::User(user_id) | Channel::Schedule(user_id) => Ok(user_id == actor.user_id()),
            Channel::Thread(thread_id) => {
                let Some(thread) = self.threads.find_thread(thread_id).await? else {
                    debug!(%thread_id, "rejecting subscription to missing thread");
                    return Ok(false);
                };
                let decision = check(
                    actor,
                    MentorshipResource::Thread(&thread),
                    AdminPolicy::Unconditional,
                    self.assignments.as_ref(),
                )
                .await?;
                Ok(decision.is_allowed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::MentorshipAccessService;
    use crate::memory::InMemoryMentorshipStore;
    use crate::types::{AdvisorType, ChatThread, MentorshipAssignment};
    use mentor_portal_platform_access::Role;

    fn setup() -> (Arc<InMemoryMentorshipStore>, RealtimeChannelAuthorizer) {
        let store = Arc::new(InMemoryMentorshipStore::new());
        let authorizer = RealtimeChannelAuthorizer::new(store.clone(), store.clone());
        (store, authorizer)
    }

    fn add_thread(store: &InMemoryMentorshipStore, student_id: UserId) -> ChatThread {
        let thread = ChatThread {
            id: ThreadId::new(),
            student_id,
            is_escalated: false,
        };
        store.add_thread(thread.clone());
        thread
    }

    #[test]
    fn parses_known_channels() {
        let user = UserId::new();
        let thread = ThreadId::new();
        assert_eq!(Channel::parse(&format!("user.{user}")), Some(Channel::User(user)));
        assert_eq!(
            Channel::parse(&format!("private-thread.{thread}")),
            Some(Channel::Thread(thread))
        );
        assert_eq!(
            Channel::parse(&format!("schedule.{user}")),
            Some(Channel::Schedule(user))
        );
    }

    #[test]
    fn rejects_unknown_or_malformed_channels() {
        assert_eq!(Channel::parse("presence-lobby"), None);
        assert_eq!(Channel::parse("user."), None);
        assert_eq!(Channel::parse("thread.42"), None);
        assert_eq!(Channel::parse(&format!("billing.{}", UserId::new())), None);
    }

    #[tokio::test]
    async fn personal_channels_belong_to_their_user() {
        let (_, authorizer) = setup();
        let me = UserId::new();
        let actor = ActiveRole::new(me, Role::Student);

        assert!(authorizer.authorize(&actor, &format!("user.{me}")).await.unwrap());
        assert!(authorizer.authorize(&actor, &format!("private-schedule.{me}")).await.unwrap());
        assert!(!authorizer
            .authorize(&actor, &format!("user.{}", UserId::new()))
            .await
            .unwrap());
        assert!(!authorizer.authorize(&actor, "anything-else").await.unwrap());
    }

    #[tokio::test]
    async fn thread_channels_follow_the_relationship() {
        let (store, authorizer) = setup();
        let student = UserId::new();
        let lecturer = UserId::new();
        let thread = add_thread(&store, student);
        let channel = format!("thread.{}", thread.id);

        let owner = ActiveRole::new(student, Role::Student);
        let other_student = ActiveRole::new(UserId::new(), Role::Student);
        let lecturer_actor = ActiveRole::new(lecturer, Role::Lecturer);

        assert!(authorizer.authorize(&owner, &channel).await.unwrap());
        assert!(!authorizer.authorize(&other_student, &channel).await.unwrap());
        assert!(!authorizer.authorize(&lecturer_actor, &channel).await.unwrap());

        store.add_assignment(MentorshipAssignment::active(student, lecturer, AdvisorType::Secondary));
        assert!(authorizer.authorize(&lecturer_actor, &channel).await.unwrap());
    }

    #[tokio::test]
    async fn missing_thread_is_denied_even_for_admins() {
        let (_, authorizer) = setup();
        let admin = ActiveRole::new(UserId::new(), Role::Admin);
        let channel = format!("thread.{}", ThreadId::new());
        assert!(!authorizer.authorize(&admin, &channel).await.unwrap());
    }

    #[tokio::test]
    async fn admins_subscribe_to_threads_they_cannot_otherwise_access() {
        let (store, authorizer) = setup();
        let thread = add_thread(&store, UserId::new());
        let admin = ActiveRole::new(UserId::new(), Role::Admin);

        let subscribed = authorizer
            .authorize(&admin, &format!("thread.{}", thread.id))
            .await
            .unwrap();
        let accessible = MentorshipAccessService::new(store.clone())
            .can_access_thread(&admin, &thread)
            .await
            .unwrap();

        assert!(subscribed);
        assert!(!accessible);
    }
}
