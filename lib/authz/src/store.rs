//! Storage seams for mentorship data and stored files.

use async_trait::async_trait;
use mentor_portal_core::{ChatMessageId, DocumentId, Result, ThreadId, UserId};
use mentor_portal_platform_access::StoreError;
use tokio::io::AsyncRead;

use crate::types::{ChatMessage, ChatThread, MentorshipDocument, StoredArtifact};

/// Student–lecturer assignments.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Returns true if the lecturer currently advises the student, as
    /// primary or secondary advisor.
    async fn has_active_assignment(
        &self,
        student_id: UserId,
        lecturer_id: UserId,
    ) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn find_thread(&self, id: ThreadId) -> Result<Option<ChatThread>, StoreError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn find_message(
        &self,
        id: ChatMessageId,
    ) -> Result<Option<ChatMessage>, StoreError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_document(
        &self,
        id: DocumentId,
    ) -> Result<Option<MentorshipDocument>, StoreError>;
}

/// A readable stream over an artifact's bytes.
pub type ArtifactReader = Box<dyn AsyncRead + Send + Unpin>;

/// File storage keyed by disk name and path.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Returns true if the artifact's file exists on its disk.
    ///
    /// Unknown disks and paths that escape the disk root do not exist.
    async fn exists(&self, artifact: &StoredArtifact) -> Result<bool, StoreError>;

    /// Opens the artifact's file for streaming.
    async fn open(&self, artifact: &StoredArtifact) -> Result<ArtifactReader, StoreError>;
}
