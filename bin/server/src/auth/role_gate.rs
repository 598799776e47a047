//! Route-level role requirements.
//!
//! ```ignore
//! Router::new()
//!     .route("/lecturer/dashboard", get(lecturer_dashboard))
//!     .route_layer(role_gate::require_roles(&state, &["lecturer"]))
//! ```
//!
//! Admitted requests carry the resolved [`ActiveRole`] and the caller's
//! [`Principal`](mentor_portal_platform_access::Principal) as request
//! extensions.
//!
//! [`ActiveRole`]: mentor_portal_platform_access::ActiveRole

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use mentor_portal_platform_access::RoleRequirement;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use super::{AppState, middleware::authenticate};
use crate::error::AccessRejection;

/// Guards routes with a role requirement.
///
/// Each token may list alternatives separated by `|`.
pub fn require_roles(state: &Arc<AppState>, tokens: &[&str]) -> RoleGateLayer {
    RoleGateLayer {
        state: Arc::clone(state),
        requirement: Arc::new(RoleRequirement::parse(tokens)),
    }
}

#[derive(Clone)]
pub struct RoleGateLayer {
    state: Arc<AppState>,
    requirement: Arc<RoleRequirement>,
}

impl<S> Layer<S> for RoleGateLayer {
    type Service = RoleGate<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleGate {
            inner,
            state: Arc::clone(&self.state),
            requirement: Arc::clone(&self.requirement),
        }
    }
}

/// Service wrapper for [`RoleGateLayer`].
#[derive(Clone)]
pub struct RoleGate<S> {
    inner: S,
    state: Arc<AppState>,
    requirement: Arc<RoleRequirement>,
}

impl<S> Service<Request> for RoleGate<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        // The ready service goes into the future; a fresh clone stays behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let state = Arc::clone(&self.state);
        let requirement = Arc::clone(&self.requirement);

        Box::pin(async move {
            let principal = match authenticate(&state, req.headers()).await {
                Ok(principal) => principal,
                Err(report) => return Ok(AccessRejection(report).into_response()),
            };

            match state.roles.enforce(principal.as_ref(), &requirement).await {
                Ok(active) => {
                    tracing::debug!(
                        user_id = %active.user_id(),
                        role = %active.role(),
                        path = %req.uri().path(),
                        "role check passed"
                    );
                    req.extensions_mut().insert(active);
                    if let Some(principal) = principal {
                        req.extensions_mut().insert(principal);
                    }
                    inner.call(req).await
                }
                Err(report) => Ok(AccessRejection(report).into_response()),
            }
        })
    }
}
