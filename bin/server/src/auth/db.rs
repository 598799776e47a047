//! Database repositories for account roles and sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mentor_portal_core::UserId;
use mentor_portal_platform_access::{
    Role, RoleSet, Session, SessionId, SessionStore, StoreError, UserRoleDirectory,
};
use rootcause::Report;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

use crate::db::{corrupt, unavailable};

/// Row type for session queries.
#[derive(FromRow)]
struct SessionRow {
    id: String,
    user_id: String,
    active_role: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn try_into_session(self) -> Result<Session, Report<StoreError>> {
        let user_id = UserId::from_str(&self.user_id)
            .map_err(|e| corrupt(format!("invalid user id '{}': {}", self.user_id, e)))?;
        Ok(Session::with_all_fields(
            SessionId::new(self.id),
            user_id,
            parse_stored_role(self.active_role.as_deref()),
            self.created_at,
            self.expires_at,
        ))
    }
}

/// Parses a role column. Unrecognized values are treated as unset.
fn parse_stored_role(value: Option<&str>) -> Option<Role> {
    let value = value?;
    match value.parse() {
        Ok(role) => Some(role),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unrecognized stored role");
            None
        }
    }
}

/// Repository for account role data.
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Creates a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRoleDirectory for AccountRepository {
    async fn held_roles(&self, user_id: UserId) -> Result<RoleSet, Report<StoreError>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT role
            FROM account_roles
            WHERE account_id = $1
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(rows
            .iter()
            .filter_map(|(role,)| parse_stored_role(Some(role.as_str())))
            .collect())
    }

    async fn last_active_role(&self, user_id: UserId) -> Result<Option<Role>, Report<StoreError>> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            r#"
            SELECT last_active_role
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.and_then(|(role,)| parse_stored_role(role.as_deref())))
    }

    async fn set_last_active_role(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<(), Report<StoreError>> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET last_active_role = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id.to_string())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Unavailable {
                details: format!("account '{user_id}' does not exist"),
            }
            .into());
        }
        Ok(())
    }
}

/// Repository for session operations.
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<StoreError>> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, active_role, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(SessionRow::try_into_session).transpose()
    }

    async fn get_active_role(&self, id: &SessionId) -> Result<Option<Role>, Report<StoreError>> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            r#"
            SELECT active_role
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.and_then(|(role,)| parse_stored_role(role.as_deref())))
    }

    async fn put_active_role(&self, id: &SessionId, role: Role) -> Result<(), Report<StoreError>> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET active_role = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Unavailable {
                details: format!("session '{id}' does not exist"),
            }
            .into());
        }
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), Report<StoreError>> {
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, Report<StoreError>> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < NOW()
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(result.rows_affected())
    }
}
