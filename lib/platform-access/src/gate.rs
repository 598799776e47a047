//! Route role enforcement.

use rootcause::Report;
use tracing::{debug, info};

use crate::auth::{ActiveRole, Principal};
use crate::error::AccessError;
use crate::requirement::RoleRequirement;
use crate::resolver::resolve;
use crate::service::ActiveRoleService;

impl ActiveRoleService {
    /// Admits a request to a route that accepts the roles in `requirement`.
    ///
    /// A user holding an accepted role is never rejected just because their
    /// session is acting under another role: the active role is switched to
    /// the first accepted role they hold and recorded for later requests.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Unauthenticated`] without a principal
    /// - [`AccessError::Forbidden`] if the requirement is empty or the
    ///   account holds none of its roles
    /// - [`AccessError::Unavailable`] if the stores cannot be read
    pub async fn enforce(
        &self,
        principal: Option<&Principal>,
        requirement: &RoleRequirement,
    ) -> Result<ActiveRole, Report<AccessError>> {
        let Some(principal) = principal else {
            return Err(AccessError::Unauthenticated.into());
        };

        if requirement.is_empty() {
            return Err(AccessError::forbidden("route accepts no known role").into());
        }

        let held = self.held_roles(principal).await?;
        if !held.has_any(requirement.roles()) {
            debug!(
                user_id = %principal.user_id(),
                "account holds none of the roles the route requires"
            );
            return Err(AccessError::forbidden("required role not held").into());
        }

        let stored = self.stored_roles(principal).await?;
        let Some(resolution) = resolve(
            &held,
            stored.session_role,
            stored.persisted_role,
            Some(requirement.roles()),
        ) else {
            return Err(AccessError::forbidden("required role not held").into());
        };

        if resolution.changed {
            info!(
                user_id = %principal.user_id(),
                from = ?stored.session_role,
                to = %resolution.role,
                "switching active role for route"
            );
            self.record(principal, stored, resolution.role).await;
        }

        Ok(ActiveRole::new(principal.user_id(), resolution.role))
    }
}
