//! Core domain types and utilities for the mentor-portal platform.
//!
//! This crate provides the foundational identifier types and error handling
//! shared by the access-control crates and the web server.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{AssignmentId, ChatMessageId, DocumentId, ParseIdError, ThreadId, UserId};
