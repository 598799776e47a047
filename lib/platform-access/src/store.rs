//! Storage seams for sessions and account roles.
//!
//! The web server backs these with Postgres; [`crate::memory`] provides
//! in-process implementations for tests and local tooling.

use async_trait::async_trait;
use mentor_portal_core::{Result, UserId};

use crate::error::StoreError;
use crate::role::{Role, RoleSet};
use crate::session::{Session, SessionId};

/// Ephemeral per-session state.
///
/// The active role is the only value the access layer keeps in a session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Looks up a session by ID.
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Returns the session's active role, if one has been set.
    async fn get_active_role(&self, id: &SessionId) -> Result<Option<Role>, StoreError>;

    /// Sets the session's active role.
    async fn put_active_role(&self, id: &SessionId, role: Role) -> Result<(), StoreError>;

    /// Deletes a session (logout). Deleting a missing session is not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), StoreError>;

    /// Deletes expired sessions, returning how many were removed.
    async fn delete_expired(&self) -> Result<u64, StoreError>;
}

/// Durable role data for accounts.
#[async_trait]
pub trait UserRoleDirectory: Send + Sync {
    /// Returns the roles an account holds. Unknown accounts hold nothing.
    async fn held_roles(&self, user_id: UserId) -> Result<RoleSet, StoreError>;

    /// Returns the role the account last acted under.
    async fn last_active_role(&self, user_id: UserId) -> Result<Option<Role>, StoreError>;

    /// Records the role the account last acted under.
    async fn set_last_active_role(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<(), StoreError>;
}
