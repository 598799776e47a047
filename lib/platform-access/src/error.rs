//! Error types for the platform-access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `AccessError`: the outcome of an access decision, mapped to HTTP statuses
//!   at the web boundary
//! - `StoreError`: failures of the session, account and relationship stores

use rootcause::Report;
use std::fmt;

/// Reasons a request cannot proceed.
///
/// Messages are for logs only. The web layer renders every `Forbidden` and
/// every `NotFound` identically so responses never reveal why access failed
/// or whether a protected resource exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No identity is attached to the request.
    Unauthenticated,
    /// The identity lacks the required role or relationship.
    Forbidden { reason: String },
    /// The referenced entity or stored artifact does not exist.
    NotFound { resource: String },
    /// A store needed for the decision could not be read.
    Unavailable,
}

impl AccessError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Converts a store failure into an access failure, keeping the store
    /// report as the cause.
    pub fn unavailable(report: Report<StoreError>) -> Report<AccessError> {
        tracing::error!(error = %report, "store failure during access decision");
        report.context(AccessError::Unavailable)
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::Forbidden { reason } => write!(f, "forbidden: {reason}"),
            Self::NotFound { resource } => write!(f, "{resource} not found"),
            Self::Unavailable => write!(f, "access decision unavailable"),
        }
    }
}

impl std::error::Error for AccessError {}

/// Errors from session, account and relationship stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed.
    Unavailable { details: String },
    /// A stored value could not be decoded.
    Corrupt { details: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { details } => write!(f, "store unavailable: {details}"),
            Self::Corrupt { details } => write!(f, "corrupt stored value: {details}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_display_includes_reason() {
        let err = AccessError::forbidden("role not held");
        assert!(err.to_string().contains("forbidden"));
        assert!(err.to_string().contains("role not held"));
    }

    #[test]
    fn not_found_display_names_resource() {
        let err = AccessError::not_found("document doc_123");
        assert!(err.to_string().contains("doc_123"));
    }

    #[test]
    fn unauthenticated_display() {
        assert_eq!(AccessError::Unauthenticated.to_string(), "not authenticated");
    }

    #[test]
    fn store_error_display() {
        let err = StoreError::Unavailable {
            details: "connection reset".to_string(),
        };
        assert!(err.to_string().contains("connection reset"));
    }
}
