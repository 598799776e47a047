//! Authentication extractors for Axum.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::CookieJar;
use mentor_portal_platform_access::{AccessError, Principal, SessionId};
use rootcause::Report;
use std::sync::Arc;

use super::AppState;
use crate::error::AccessRejection;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Resolves the session cookie in `headers` to a principal.
///
/// Returns `None` without a cookie or for an unknown or expired session.
/// Expired sessions are deleted on sight.
///
/// # Errors
///
/// [`AccessError::Unavailable`] if the session store cannot be read.
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Principal>, Report<AccessError>> {
    let jar = CookieJar::from_headers(headers);
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let session_id = SessionId::new(cookie.value().to_string());

    let Some(session) = state
        .sessions
        .find(&session_id)
        .await
        .map_err(AccessError::unavailable)?
    else {
        tracing::debug!(%session_id, "unknown session");
        return Ok(None);
    };

    if session.is_expired() {
        if let Err(e) = state.sessions.delete(&session_id).await {
            tracing::warn!(error = %e, %session_id, "failed to delete expired session");
        }
        return Ok(None);
    }

    Ok(Some(Principal::new(session.user_id(), session_id)))
}

/// Extractor for requiring an authenticated user.
///
/// Unauthenticated requests are rejected with 401.
pub struct RequireAuth(pub Principal);

impl<S> FromRequestParts<S> for RequireAuth
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AccessRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        authenticate(&app_state, &parts.headers)
            .await?
            .map(RequireAuth)
            .ok_or_else(|| AccessError::Unauthenticated.into())
    }
}
