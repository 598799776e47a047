//! In-process store implementations.

use async_trait::async_trait;
use mentor_portal_core::UserId;
use rootcause::Report;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::account::Account;
use crate::error::StoreError;
use crate::role::{Role, RoleSet};
use crate::session::{Session, SessionId};
use crate::store::{SessionStore, UserRoleDirectory};

/// Session store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a session, replacing any session with the same ID.
    pub fn insert(&self, session: Session) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id().clone(), session);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<StoreError>> {
        Ok(self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    async fn get_active_role(&self, id: &SessionId) -> Result<Option<Role>, Report<StoreError>> {
        Ok(self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .and_then(Session::active_role))
    }

    async fn put_active_role(&self, id: &SessionId, role: Role) -> Result<(), Report<StoreError>> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(id) {
            Some(session) => {
                session.set_active_role(role);
                Ok(())
            }
            None => Err(StoreError::Unavailable {
                details: format!("session '{id}' does not exist"),
            }
            .into()),
        }
    }

    async fn delete(&self, id: &SessionId) -> Result<(), Report<StoreError>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, Report<StoreError>> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| session.is_valid());
        Ok((before - sessions.len()) as u64)
    }
}

/// Account directory backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryUserRoleDirectory {
    accounts: Mutex<HashMap<UserId, Account>>,
}

impl InMemoryUserRoleDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an account, replacing any account with the same ID.
    pub fn insert(&self, account: Account) {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(account.id(), account);
    }

    /// Returns a snapshot of an account.
    #[must_use]
    pub fn account(&self, user_id: UserId) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .cloned()
    }

    /// Applies `update` to a stored account. Returns false if it does not exist.
    pub fn update(&self, user_id: UserId, update: impl FnOnce(&mut Account)) -> bool {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        match accounts.get_mut(&user_id) {
            Some(account) => {
                update(account);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserRoleDirectory for InMemoryUserRoleDirectory {
    async fn held_roles(&self, user_id: UserId) -> Result<RoleSet, Report<StoreError>> {
        Ok(self
            .account(user_id)
            .map(|account| account.held_roles().clone())
            .unwrap_or_default())
    }

    async fn last_active_role(&self, user_id: UserId) -> Result<Option<Role>, Report<StoreError>> {
        Ok(self
            .account(user_id)
            .and_then(|account| account.last_active_role()))
    }

    async fn set_last_active_role(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<(), Report<StoreError>> {
        if self.update(user_id, |account| account.set_last_active_role(role)) {
            Ok(())
        } else {
            Err(StoreError::Unavailable {
                details: format!("account '{user_id}' does not exist"),
            }
            .into())
        }
    }
}
