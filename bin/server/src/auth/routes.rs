//! Session routes.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use mentor_portal_platform_access::SessionId;
use std::sync::Arc;
use time::Duration as TimeDuration;

use super::{AppState, middleware::SESSION_COOKIE};

/// Ends the session, dropping its active role, and clears the cookie.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        let session_id = SessionId::new(session_cookie.value().to_string());
        if let Err(e) = state.sessions.delete(&session_id).await {
            tracing::warn!(error = %e, %session_id, "failed to delete session on logout");
        }
    }

    let remove_session = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(state.session_config.secure_cookies)
        .max_age(TimeDuration::ZERO);

    (jar.add(remove_session), Redirect::to("/"))
}
