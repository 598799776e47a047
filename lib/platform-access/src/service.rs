//! Active role state machine.
//!
//! [`ActiveRoleService`] ties the pure [`crate::resolver`] to the session and
//! account stores. Three transitions are exposed, each in its own module:
//! - [`ActiveRoleService::enforce`] (route gate, auto-switches on navigation)
//! - [`ActiveRoleService::switch_role`] (explicit user choice)
//! - [`ActiveRoleService::enter`] (generic portal entry)
//!
//! Writing a newly resolved role back to the stores is best-effort: the
//! request always proceeds with the role it resolved, even if persisting it
//! fails.

use rootcause::Report;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::Principal;
use crate::error::AccessError;
use crate::role::{Role, RoleSet};
use crate::store::{SessionStore, UserRoleDirectory};

/// Resolves and records the role each session acts under.
#[derive(Clone)]
pub struct ActiveRoleService {
    directory: Arc<dyn UserRoleDirectory>,
    sessions: Arc<dyn SessionStore>,
}

/// Role state read from the stores for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StoredRoles {
    pub(crate) session_role: Option<Role>,
    pub(crate) persisted_role: Option<Role>,
}

impl ActiveRoleService {
    #[must_use]
    pub fn new(directory: Arc<dyn UserRoleDirectory>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            directory,
            sessions,
        }
    }

    /// Loads the roles held by the principal's account.
    ///
    /// An account that holds nothing no longer exists as far as the portal
    /// is concerned, so the caller is treated as unauthenticated.
    pub(crate) async fn held_roles(
        &self,
        principal: &Principal,
    ) -> Result<RoleSet, Report<AccessError>> {
        let held = self
            .directory
            .held_roles(principal.user_id())
            .await
            .map_err(AccessError::unavailable)?;
        if held.is_empty() {
            debug!(user_id = %principal.user_id(), "principal has no account roles");
            return Err(AccessError::Unauthenticated.into());
        }
        Ok(held)
    }

    pub(crate) async fn stored_roles(
        &self,
        principal: &Principal,
    ) -> Result<StoredRoles, Report<AccessError>> {
        let session_role = self
            .sessions
            .get_active_role(principal.session_id())
            .await
            .map_err(AccessError::unavailable)?;
        let persisted_role = self
            .directory
            .last_active_role(principal.user_id())
            .await
            .map_err(AccessError::unavailable)?;
        Ok(StoredRoles {
            session_role,
            persisted_role,
        })
    }

    /// Writes `role` to whichever of the session and the account disagree with it.
    pub(crate) async fn record(&self, principal: &Principal, stored: StoredRoles, role: Role) {
        if stored.session_role != Some(role) {
            if let Err(e) = self
                .sessions
                .put_active_role(principal.session_id(), role)
                .await
            {
                warn!(
                    error = %e,
                    session_id = %principal.session_id(),
                    role = %role,
                    "failed to store active role in session"
                );
            }
        }

        if stored.persisted_role != Some(role) {
            if let Err(e) = self
                .directory
                .set_last_active_role(principal.user_id(), role)
                .await
            {
                warn!(
                    error = %e,
                    user_id = %principal.user_id(),
                    role = %role,
                    "failed to persist last active role"
                );
            }
        }
    }
}
