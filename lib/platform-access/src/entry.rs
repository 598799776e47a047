//! Portal entry and role overview.

use rootcause::Report;
use tracing::info;

use crate::auth::{ActiveRole, Principal, RoleOverview};
use crate::error::AccessError;
use crate::resolver::{resolve, Resolution};
use crate::role::RoleSet;
use crate::service::{ActiveRoleService, StoredRoles};

impl ActiveRoleService {
    /// Resolves the role a user enters the portal with and returns its landing route.
    ///
    /// # Errors
    ///
    /// [`AccessError::Unauthenticated`] if the account no longer exists, or
    /// [`AccessError::Unavailable`] if the stores cannot be read.
    pub async fn enter(&self, principal: &Principal) -> Result<&'static str, Report<AccessError>> {
        let (_, resolution) = self.resolve_unscoped(principal).await?;
        Ok(resolution.role.landing_route())
    }

    /// Returns the active role and the roles the user may switch to.
    ///
    /// Resolving the active role here has the same side effects as entering
    /// the portal.
    pub async fn overview(&self, principal: &Principal) -> Result<RoleOverview, Report<AccessError>> {
        let (held, resolution) = self.resolve_unscoped(principal).await?;
        Ok(RoleOverview {
            active_role: resolution.role,
            available_roles: held.selectable(),
        })
    }

    /// Reports the role the user acts under outside any guarded route,
    /// without writing anything back.
    ///
    /// Used by read-only checks such as realtime subscriptions.
    pub async fn current(&self, principal: &Principal) -> Result<ActiveRole, Report<AccessError>> {
        let (_, _, resolution) = self.read_unscoped(principal).await?;
        Ok(ActiveRole::new(principal.user_id(), resolution.role))
    }

    async fn resolve_unscoped(
        &self,
        principal: &Principal,
    ) -> Result<(RoleSet, Resolution), Report<AccessError>> {
        let (held, stored, resolution) = self.read_unscoped(principal).await?;
        if resolution.changed {
            info!(
                user_id = %principal.user_id(),
                role = %resolution.role,
                "resolved active role on entry"
            );
            self.record(principal, stored, resolution.role).await;
        }
        Ok((held, resolution))
    }

    async fn read_unscoped(
        &self,
        principal: &Principal,
    ) -> Result<(RoleSet, StoredRoles, Resolution), Report<AccessError>> {
        let held = self.held_roles(principal).await?;
        let stored = self.stored_roles(principal).await?;
        let Some(resolution) = resolve(&held, stored.session_role, stored.persisted_role, None)
        else {
            return Err(AccessError::Unauthenticated.into());
        };
        Ok((held, stored, resolution))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AccessError;
    use crate::role::Role;
    use crate::service::test_support::fixture;

    #[tokio::test]
    async fn student_entry_with_no_history_lands_on_student_dashboard() {
        let f = fixture(&[], None, None, false);
        let route = f.service.enter(&f.principal).await.unwrap();
        assert_eq!(route, "/student/dashboard");
        assert_eq!(f.session_role().await, Some(Role::Student));
        assert_eq!(f.persisted_role(), Some(Role::Student));
    }

    #[tokio::test]
    async fn entry_restores_persisted_role() {
        let f = fixture(&[Role::Lecturer], None, Some(Role::Lecturer), false);
        let route = f.service.enter(&f.principal).await.unwrap();
        assert_eq!(route, "/lecturer/dashboard");
        assert_eq!(f.session_role().await, Some(Role::Lecturer));
        assert_eq!(f.writes(), 0);
    }

    #[tokio::test]
    async fn session_role_wins_over_persisted_role() {
        let f = fixture(
            &[Role::Admin, Role::Lecturer],
            Some(Role::Admin),
            Some(Role::Lecturer),
            false,
        );
        let route = f.service.enter(&f.principal).await.unwrap();
        assert_eq!(route, "/admin/dashboard");
        assert_eq!(f.persisted_role(), Some(Role::Admin));
    }

    #[tokio::test]
    async fn examiner_lands_on_student_dashboard() {
        let f = fixture(&[Role::Examiner], Some(Role::Examiner), None, false);
        let route = f.service.enter(&f.principal).await.unwrap();
        assert_eq!(route, "/student/dashboard");
    }

    #[tokio::test]
    async fn revoked_persisted_role_falls_back_to_default() {
        let f = fixture(&[], None, Some(Role::Admin), false);
        let route = f.service.enter(&f.principal).await.unwrap();
        assert_eq!(route, "/student/dashboard");
        assert_eq!(f.persisted_role(), Some(Role::Student));
    }

    #[tokio::test]
    async fn current_role_follows_session() {
        let f = fixture(&[Role::Lecturer], Some(Role::Lecturer), None, false);
        let active = f.service.current(&f.principal).await.unwrap();
        assert_eq!(active.role(), Role::Lecturer);
        assert_eq!(active.user_id(), f.principal.user_id());
        assert_eq!(f.persisted_role(), None);
    }

    #[tokio::test]
    async fn current_role_is_resolved_without_writes() {
        let f = fixture(&[Role::Lecturer], None, None, false);
        let active = f.service.current(&f.principal).await.unwrap();
        assert_eq!(active.role(), Role::Student);
        assert_eq!(f.writes(), 0);
        assert_eq!(f.session_role().await, None);
        assert_eq!(f.persisted_role(), None);
    }

    #[tokio::test]
    async fn overview_lists_selectable_held_roles() {
        let f = fixture(
            &[Role::Lecturer, Role::Examiner],
            Some(Role::Lecturer),
            None,
            false,
        );
        let overview = f.service.overview(&f.principal).await.unwrap();
        assert_eq!(overview.active_role, Role::Lecturer);
        assert_eq!(overview.available_roles, vec![Role::Student, Role::Lecturer]);
    }

    #[tokio::test]
    async fn entry_for_missing_account_is_unauthenticated() {
        let f = fixture(&[], None, None, false);
        let stranger = crate::auth::Principal::new(
            mentor_portal_core::UserId::new(),
            f.principal.session_id().clone(),
        );
        let err = f.service.enter(&stranger).await.unwrap_err();
        assert_eq!(err.current_context(), &AccessError::Unauthenticated);
    }
}
