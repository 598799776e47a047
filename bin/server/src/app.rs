//! Router assembly.

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState, role_gate::require_roles};
use crate::routes::{downloads, portal, realtime};

/// Builds the portal router.
///
/// `/portal`, `/role`, `/role/switch`, and `/broadcasting/auth` only need a
/// session; landing routes and downloads also pass the role gate.
pub fn build_router(state: Arc<AppState>) -> Router {
    let student = Router::new()
        .route("/student/dashboard", get(portal::student_dashboard))
        .route_layer(require_roles(&state, &["student|examiner"]));

    let lecturer = Router::new()
        .route("/lecturer/dashboard", get(portal::lecturer_dashboard))
        .route_layer(require_roles(&state, &["lecturer"]));

    let admin = Router::new()
        .route("/admin/dashboard", get(portal::admin_dashboard))
        .route_layer(require_roles(&state, &["admin"]));

    let files = Router::new()
        .route(
            "/chat/messages/{id}/attachment",
            get(downloads::chat_attachment),
        )
        .route("/documents/{id}/download", get(downloads::document))
        .route_layer(require_roles(&state, &["student|lecturer", "admin"]));

    Router::new()
        .route("/health", get(health))
        .route("/portal", get(portal::enter))
        .route("/role", get(portal::overview))
        .route("/role/switch", post(portal::switch_role))
        .route("/broadcasting/auth", post(realtime::authorize_channel))
        .route("/logout", get(auth::logout))
        .merge(student)
        .merge(lecturer)
        .merge(admin)
        .merge(files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}
