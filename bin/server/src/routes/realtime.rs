//! Realtime channel subscription endpoint.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mentor_portal_platform_access::AccessError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AppState, RequireAuth};
use crate::error::AccessRejection;

#[derive(Debug, Deserialize)]
pub struct ChannelAuthForm {
    pub channel_name: String,
}

#[derive(Debug, Serialize)]
struct ChannelGrant {
    channel: String,
}

/// Answers a broadcaster's subscription check: 200 to allow, 403 to deny.
///
/// Not behind the role gate; the actor is whatever role the session
/// currently resolves to, and nothing is written back.
pub async fn authorize_channel(
    State(state): State<Arc<AppState>>,
    RequireAuth(principal): RequireAuth,
    Form(form): Form<ChannelAuthForm>,
) -> Result<Response, AccessRejection> {
    let actor = state.roles.current(&principal).await?;
    let allowed = state
        .realtime
        .authorize(&actor, &form.channel_name)
        .await
        .map_err(AccessError::unavailable)?;

    if !allowed {
        return Err(AccessError::forbidden("channel subscription denied").into());
    }
    Ok((
        StatusCode::OK,
        Json(ChannelGrant {
            channel: form.channel_name,
        }),
    )
        .into_response())
}
