//! Portal entry, role switching, and the per-role landing routes.

use axum::{
    Extension, Form, Json,
    extract::State,
    response::Redirect,
};
use mentor_portal_core::UserId;
use mentor_portal_platform_access::{ActiveRole, Role, RoleOverview};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AppState, RequireAuth};
use crate::error::AccessRejection;

/// Sends the user to the landing route of their resolved role.
pub async fn enter(
    State(state): State<Arc<AppState>>,
    RequireAuth(principal): RequireAuth,
) -> Result<Redirect, AccessRejection> {
    let route = state.roles.enter(&principal).await?;
    Ok(Redirect::to(route))
}

/// Form body for [`switch_role`].
#[derive(Debug, Deserialize)]
pub struct SwitchRoleForm {
    pub role: String,
}

pub async fn switch_role(
    State(state): State<Arc<AppState>>,
    RequireAuth(principal): RequireAuth,
    Form(form): Form<SwitchRoleForm>,
) -> Result<Redirect, AccessRejection> {
    let route = state.roles.switch_role(&principal, &form.role).await?;
    Ok(Redirect::to(route))
}

/// The active role and the roles a role switcher offers.
pub async fn overview(
    State(state): State<Arc<AppState>>,
    RequireAuth(principal): RequireAuth,
) -> Result<Json<RoleOverview>, AccessRejection> {
    Ok(Json(state.roles.overview(&principal).await?))
}

/// Minimal stand-in for a dashboard page.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub dashboard: Role,
    pub user_id: UserId,
    pub active_role: Role,
}

fn dashboard(kind: Role, active: ActiveRole) -> Json<Dashboard> {
    Json(Dashboard {
        dashboard: kind,
        user_id: active.user_id(),
        active_role: active.role(),
    })
}

pub async fn student_dashboard(Extension(active): Extension<ActiveRole>) -> Json<Dashboard> {
    dashboard(Role::Student, active)
}

pub async fn lecturer_dashboard(Extension(active): Extension<ActiveRole>) -> Json<Dashboard> {
    dashboard(Role::Lecturer, active)
}

pub async fn admin_dashboard(Extension(active): Extension<ActiveRole>) -> Json<Dashboard> {
    dashboard(Role::Admin, active)
}
