//! Request identities.
//!
//! A [`Principal`] is what the authentication layer attaches to a request:
//! which account is calling and through which session. Once the role gate
//! has run, handlers work with an [`ActiveRole`] instead.

use mentor_portal_core::UserId;
use serde::Serialize;

use crate::role::Role;
use crate::session::SessionId;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    session_id: SessionId,
}

impl Principal {
    #[must_use]
    pub fn new(user_id: UserId, session_id: SessionId) -> Self {
        Self {
            user_id,
            session_id,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

/// An account acting under a resolved role for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveRole {
    user_id: UserId,
    role: Role,
}

impl ActiveRole {
    #[must_use]
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

/// What a role switcher shows: the current role and the roles on offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleOverview {
    pub active_role: Role,
    pub available_roles: Vec<Role>,
}
