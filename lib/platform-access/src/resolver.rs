//! Active role resolution.
//!
//! [`resolve`] reconciles the role held in the session, the role persisted on
//! the account, and (optionally) the roles a route requires into the single
//! role the current request runs under. It performs no I/O: callers apply
//! the returned [`Resolution`] to the session and account stores.

use crate::role::{Role, RoleSet};

/// Outcome of resolving the active role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The role the request runs under.
    pub role: Role,
    /// True if the session role and the persisted role must both be updated to `role`.
    pub changed: bool,
}

impl Resolution {
    fn unchanged(role: Role) -> Self {
        Self {
            role,
            changed: false,
        }
    }

    fn reconciled(role: Role, session_role: Option<Role>, persisted_role: Option<Role>) -> Self {
        Self {
            role,
            changed: session_role != Some(role) || persisted_role != Some(role),
        }
    }
}

/// Resolves the active role for a request.
///
/// Only roles in `held` are ever returned; stale session or persisted values
/// for revoked roles are skipped.
///
/// With `required` present:
/// 1. a held session role that satisfies the requirement is kept as is;
/// 2. otherwise the first required role (in declared order) that is held wins;
/// 3. if no required role is held, `None` is returned.
///
/// Without `required`, the held session role wins, then the held persisted
/// role, then the account's default role. This case never returns `None`.
#[must_use]
pub fn resolve(
    held: &RoleSet,
    session_role: Option<Role>,
    persisted_role: Option<Role>,
    required: Option<&[Role]>,
) -> Option<Resolution> {
    let held_session_role = session_role.filter(|role| held.contains(*role));

    match required {
        Some(required) => {
            if let Some(role) = held_session_role.filter(|role| required.contains(role)) {
                return Some(Resolution::unchanged(role));
            }
            required
                .iter()
                .copied()
                .find(|role| held.contains(*role))
                .map(|role| Resolution::reconciled(role, session_role, persisted_role))
        }
        None => {
            let role = held_session_role
                .or_else(|| persisted_role.filter(|role| held.contains(*role)))
                .unwrap_or_else(|| held.default_role());
            Some(Resolution::reconciled(role, session_role, persisted_role))
        }
    }
}
