//! Portal accounts.
//!
//! An account owns the roles it holds and the role it last used. Identity
//! attributes (name, email) are carried for display only and play no part in
//! access decisions.

use chrono::{DateTime, Utc};
use mentor_portal_core::UserId;
use serde::{Deserialize, Serialize};

use crate::role::{Role, RoleSet};

/// A portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: UserId,
    name: String,
    email: String,
    /// Roles granted to the account. Never empty.
    held_roles: RoleSet,
    /// Role restored on the next login when the session has none.
    last_active_role: Option<Role>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account holding only the student role.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            held_roles: RoleSet::for_new_account(),
            last_active_role: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes an account from storage.
    #[must_use]
    pub fn with_all_fields(
        id: UserId,
        name: String,
        email: String,
        held_roles: RoleSet,
        last_active_role: Option<Role>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            held_roles,
            last_active_role,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn held_roles(&self) -> &RoleSet {
        &self.held_roles
    }

    #[must_use]
    pub fn last_active_role(&self) -> Option<Role> {
        self.last_active_role
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Grants an additional role.
    pub fn grant(&mut self, role: Role) {
        if self.held_roles.insert(role) {
            self.updated_at = Utc::now();
        }
    }

    /// Revokes a role. The student role cannot be revoked.
    ///
    /// Returns false if the role was not held or is the student role.
    pub fn revoke(&mut self, role: Role) -> bool {
        if role == Role::DEFAULT || !self.held_roles.remove(role) {
            return false;
        }
        self.updated_at = Utc::now();
        true
    }

    pub fn set_last_active_role(&mut self, role: Role) {
        self.last_active_role = Some(role);
        self.updated_at = Utc::now();
    }
}
