//! Mentorship-scoped authorization for mentor-portal.
//!
//! Chat threads, chat attachments, documents, and realtime channels all
//! belong to a student. Who else may reach them is decided by one shared
//! relationship check ([`relationship::check`]), used from three entry
//! points:
//!
//! - [`MentorshipAccessService`] for ordinary thread access
//! - [`RealtimeChannelAuthorizer`] for channel subscriptions
//! - [`ResourceDownloadGuard`] for file downloads

pub mod access;
pub mod download;
pub mod memory;
pub mod realtime;
pub mod relationship;
pub mod store;
pub mod types;

pub use access::MentorshipAccessService;
pub use download::ResourceDownloadGuard;
pub use realtime::{Channel, RealtimeChannelAuthorizer};
pub use relationship::{check, AdminPolicy, Decision, MentorshipResource};
pub use store::{
    ArtifactReader, ArtifactStore, AssignmentStore, DocumentStore, MessageStore, ThreadStore,
};
pub use types::{
    AdvisorType, ArtifactRef, AssignmentStatus, ChatMessage, ChatThread, MentorshipAssignment,
    MentorshipDocument, StoredArtifact,
};
