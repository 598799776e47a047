//! HTTP mapping of access failures.
//!
//! Responses never carry the reason for a denial: 401 points the client at
//! the login page, 403 and 404 have fixed bodies, and store failures are
//! logged and answered with 500.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use mentor_portal_platform_access::AccessError;
use rootcause::Report;

/// Where unauthenticated clients are sent.
pub const LOGIN_PATH: &str = "/login";

/// An access failure on its way out as a response.
#[derive(Debug)]
pub struct AccessRejection(pub Report<AccessError>);

impl From<Report<AccessError>> for AccessRejection {
    fn from(report: Report<AccessError>) -> Self {
        Self(report)
    }
}

impl From<AccessError> for AccessRejection {
    fn from(error: AccessError) -> Self {
        Self(error.into())
    }
}

impl AccessRejection {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0.current_context() {
            AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AccessError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AccessError::NotFound { .. } => StatusCode::NOT_FOUND,
            AccessError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccessRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::debug!(error = %self.0, "rejecting unauthenticated request");
                (
                    status,
                    [(header::LOCATION, LOGIN_PATH)],
                    "Authentication required",
                )
                    .into_response()
            }
            StatusCode::FORBIDDEN => {
                tracing::debug!(error = %self.0, "rejecting forbidden request");
                (status, "Forbidden").into_response()
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(error = %self.0, "resource not found");
                (status, "Not found").into_response()
            }
            _ => {
                tracing::error!(error = %self.0, "request failed");
                (status, "Internal server error").into_response()
            }
        }
    }
}
