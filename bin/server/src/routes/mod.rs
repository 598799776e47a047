//! HTTP handlers.

pub mod downloads;
pub mod portal;
pub mod realtime;
