//! mentor-portal web server.
//!
//! HTTP boundary for role resolution and mentorship-scoped authorization:
//! portal entry, role switching, role-gated landing routes, realtime
//! channel authorization, and guarded file downloads.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod storage;
