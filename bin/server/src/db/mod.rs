//! Database repositories for the mentor portal.
//!
//! This module provides data access for mentorship assignments, chat
//! threads and messages, and mentorship documents. Account and session
//! repositories live in [`crate::auth::db`].

pub mod mentorship;

pub use mentorship::MentorshipRepository;

use mentor_portal_platform_access::StoreError;
use rootcause::Report;

/// Wraps a database failure.
pub(crate) fn unavailable(error: sqlx::Error) -> Report<StoreError> {
    StoreError::Unavailable {
        details: error.to_string(),
    }
    .into()
}

/// Reports a row that cannot be turned into a domain value.
pub(crate) fn corrupt(details: String) -> Report<StoreError> {
    StoreError::Corrupt { details }.into()
}
