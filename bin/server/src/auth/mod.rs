//! Authentication and role enforcement for the portal server.
//!
//! This module provides:
//! - Database-backed sessions and account roles ([`db`])
//! - Session extractors for Axum routes ([`middleware`])
//! - The route-level role gate ([`role_gate`])
//! - Logout ([`routes`])
//!
//! Sessions are created by the external login flow; this server only reads
//! them, records the active role in them, and deletes them on logout.

pub mod db;
pub mod middleware;
pub mod role_gate;
pub mod routes;

use mentor_portal_authz::{
    ArtifactStore, AssignmentStore, DocumentStore, MessageStore, RealtimeChannelAuthorizer,
    ResourceDownloadGuard, ThreadStore,
};
use mentor_portal_platform_access::{ActiveRoleService, SessionStore, UserRoleDirectory};
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::{SessionConfig, StorageConfig};
use crate::db::MentorshipRepository;
use crate::storage::LocalDiskArtifactStore;
use db::{AccountRepository, SessionRepository};

pub use middleware::RequireAuth;
pub use routes::logout;

/// The storage backends the server runs against.
#[derive(Clone)]
pub struct Backends {
    pub sessions: Arc<dyn SessionStore>,
    pub directory: Arc<dyn UserRoleDirectory>,
    pub assignments: Arc<dyn AssignmentStore>,
    pub threads: Arc<dyn ThreadStore>,
    pub messages: Arc<dyn MessageStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub artifacts: Arc<dyn ArtifactStore>,
}

impl Backends {
    /// Postgres for records, local disks for files.
    pub fn postgres(pool: PgPool, storage: &StorageConfig) -> Self {
        let mentorship = Arc::new(MentorshipRepository::new(pool.clone()));
        Self {
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            directory: Arc::new(AccountRepository::new(pool)),
            assignments: mentorship.clone(),
            threads: mentorship.clone(),
            messages: mentorship.clone(),
            documents: mentorship,
            artifacts: Arc::new(LocalDiskArtifactStore::new(storage.disks.clone())),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Session lookup for the auth extractors.
    pub sessions: Arc<dyn SessionStore>,
    /// Active role resolution and enforcement.
    pub roles: ActiveRoleService,
    pub realtime: RealtimeChannelAuthorizer,
    pub downloads: ResourceDownloadGuard,
    /// File storage, for streaming authorized downloads.
    pub artifacts: Arc<dyn ArtifactStore>,
    /// Session configuration.
    pub session_config: SessionConfig,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(backends: Backends, session_config: SessionConfig) -> Self {
        let Backends {
            sessions,
            directory,
            assignments,
            threads,
            messages,
            documents,
            artifacts,
        } = backends;

        Self {
            roles: ActiveRoleService::new(directory, sessions.clone()),
            realtime: RealtimeChannelAuthorizer::new(threads.clone(), assignments.clone()),
            downloads: ResourceDownloadGuard::new(
                assignments,
                threads,
                messages,
                documents,
                artifacts.clone(),
            ),
            sessions,
            artifacts,
            session_config,
        }
    }
}
