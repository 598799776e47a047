//! Explicit role switching.

use rootcause::Report;
use tracing::{debug, info};

use crate::auth::Principal;
use crate::error::AccessError;
use crate::role::Role;
use crate::service::ActiveRoleService;

impl ActiveRoleService {
    /// Makes `requested` the active role and returns its landing route.
    ///
    /// # Errors
    ///
    /// [`AccessError::Forbidden`] if the token names no role, names a role
    /// users cannot select, or names a role the account does not hold.
    pub async fn switch_role(
        &self,
        principal: &Principal,
        requested: &str,
    ) -> Result<&'static str, Report<AccessError>> {
        let role = match requested.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                debug!(error = %e, user_id = %principal.user_id(), "rejected role switch");
                return Err(AccessError::forbidden("unknown role").into());
            }
        };
        if !role.is_selectable() {
            return Err(AccessError::forbidden("role cannot be selected").into());
        }

        let held = self.held_roles(principal).await?;
        if !held.contains(role) {
            debug!(user_id = %principal.user_id(), role = %role, "rejected role switch");
            return Err(AccessError::forbidden("role not held").into());
        }

        let stored = self.stored_roles(principal).await?;
        info!(
            user_id = %principal.user_id(),
            from = ?stored.session_role,
            to = %role,
            "switched active role"
        );
        self.record(principal, stored, role).await;

        Ok(role.landing_route())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::fixture;

    #[tokio::test]
    async fn switching_to_held_role_updates_session_and_account() {
        let f = fixture(&[Role::Lecturer], Some(Role::Student), None, false);
        let route = f
            .service
            .switch_role(&f.principal, "lecturer")
            .await
            .unwrap();
        assert_eq!(route, "/lecturer/dashboard");
        assert_eq!(f.session_role().await, Some(Role::Lecturer));
        assert_eq!(f.persisted_role(), Some(Role::Lecturer));
    }

    #[tokio::test]
    async fn switching_to_current_role_skips_account_write() {
        let f = fixture(
            &[Role::Admin],
            Some(Role::Student),
            Some(Role::Admin),
            false,
        );
        let route = f.service.switch_role(&f.principal, "Admin").await.unwrap();
        assert_eq!(route, "/admin/dashboard");
        assert_eq!(f.writes(), 0);
        assert_eq!(f.session_role().await, Some(Role::Admin));
    }

    #[tokio::test]
    async fn role_not_held_is_forbidden() {
        let f = fixture(&[], Some(Role::Student), None, false);
        let err = f
            .service
            .switch_role(&f.principal, "admin")
            .await
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            AccessError::Forbidden { .. }
        ));
        assert_eq!(f.session_role().await, Some(Role::Student));
    }

    #[tokio::test]
    async fn examiner_cannot_be_selected_even_when_held() {
        let f = fixture(&[Role::Examiner], Some(Role::Student), None, false);
        let err = f
            .service
            .switch_role(&f.principal, "examiner")
            .await
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            AccessError::Forbidden { .. }
        ));
    }

    #[tokio::test]
    async fn unknown_role_is_forbidden() {
        let f = fixture(&[], None, None, false);
        let err = f
            .service
            .switch_role(&f.principal, "dean")
            .await
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            AccessError::Forbidden { .. }
        ));
        assert_eq!(f.writes(), 0);
    }
}
