//! The relationship check shared by every mentorship-scoped decision.
//!
//! Threads and documents belong to a student. Students reach their own
//! resources; lecturers reach them through an active assignment (threads) or
//! by being the named lecturer (documents). What an administrator may do
//! depends on the entry point, expressed as an [`AdminPolicy`].

use mentor_portal_platform_access::{ActiveRole, Role, StoreError};
use rootcause::Report;
use tracing::{debug, info};

use crate::store::AssignmentStore;
use crate::types::{ChatThread, MentorshipDocument};

/// A resource scoped to a mentorship relationship.
#[derive(Debug, Clone, Copy)]
pub enum MentorshipResource<'a> {
    Thread(&'a ChatThread),
    Document(&'a MentorshipDocument),
}

impl MentorshipResource<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Thread(_) => "thread",
            Self::Document(_) => "document",
        }
    }

    fn id(&self) -> String {
        match self {
            Self::Thread(thread) => thread.id.to_string(),
            Self::Document(document) => document.id.to_string(),
        }
    }
}

/// How administrators are treated at a given entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPolicy {
    /// Administrators get no access through the relationship.
    Deny,
    /// Administrators get access when they explicitly ask for escalated
    /// access, or (threads only) when the thread has been escalated.
    Escalation { requested: bool },
    /// Administrators always get access.
    Unconditional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    #[must_use]
    pub fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decides whether `actor` may reach `resource`.
///
/// # Errors
///
/// Fails only if the assignment store cannot be read.
pub async fn check(
    actor: &ActiveRole,
    resource: MentorshipResource<'_>,
    policy: AdminPolicy,
    assignments: &dyn AssignmentStore,
) -> Result<Decision, Report<StoreError>> {
    let user_id = actor.user_id();
    let decision = match (actor.role(), resource) {
        (Role::Admin, resource) => {
            let allowed = match (policy, resource) {
                (AdminPolicy::Deny, _) => false,
                (AdminPolicy::Unconditional, _) => true,
                (AdminPolicy::Escalation { requested }, MentorshipResource::Thread(thread)) => {
                    requested || thread.is_escalated
                }
                (AdminPolicy::Escalation { requested }, MentorshipResource::Document(_)) => {
                    requested
                }
            };
            if allowed && matches!(policy, AdminPolicy::Escalation { .. }) {
                info!(
                    target: "audit",
                    admin_id = %user_id,
                    resource = resource.kind(),
                    resource_id = %resource.id(),
                    "administrator accessed mentorship resource through escalation"
                );
            }
            Decision::from_bool(allowed)
        }
        (Role::Student, MentorshipResource::Thread(thread)) => {
            Decision::from_bool(thread.student_id == user_id)
        }
        (Role::Student, MentorshipResource::Document(document)) => {
            Decision::from_bool(document.student_id == user_id)
        }
        (Role::Lecturer, MentorshipResource::Thread(thread)) => Decision::from_bool(
            assignments
                .has_active_assignment(thread.student_id, user_id)
                .await?,
        ),
        (Role::Lecturer, MentorshipResource::Document(document)) => {
            Decision::from_bool(document.lecturer_id == Some(user_id))
        }
        (Role::Examiner, _) => Decision::Deny,
    };

    if decision == Decision::Deny {
        debug!(
            user_id = %user_id,
            role = %actor.role(),
            resource = resource.kind(),
            resource_id = %resource.id(),
            "mentorship access denied"
        );
    }
    Ok(decision)
}
