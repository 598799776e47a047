//! Local-disk artifact storage.
//!
//! Each configured disk maps a name to a root directory. Artifact paths are
//! relative to that root and may not leave it.

use async_trait::async_trait;
use mentor_portal_authz::{ArtifactReader, ArtifactStore, StoredArtifact};
use mentor_portal_platform_access::StoreError;
use rootcause::Report;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Serves artifacts from directories on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalDiskArtifactStore {
    disks: HashMap<String, PathBuf>,
}

impl LocalDiskArtifactStore {
    pub fn new(disks: HashMap<String, PathBuf>) -> Self {
        Self { disks }
    }

    /// Returns the file backing `artifact`, or `None` for an unknown disk or
    /// a path that is absolute or climbs out of the disk root.
    fn locate(&self, artifact: &StoredArtifact) -> Option<PathBuf> {
        let root = self.disks.get(&artifact.disk)?;
        let relative = Path::new(&artifact.path);
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !contained {
            tracing::warn!(
                disk = %artifact.disk,
                path = %artifact.path,
                "rejecting artifact path outside its disk"
            );
            return None;
        }
        Some(root.join(relative))
    }
}

#[async_trait]
impl ArtifactStore for LocalDiskArtifactStore {
    async fn exists(&self, artifact: &StoredArtifact) -> Result<bool, Report<StoreError>> {
        let Some(path) = self.locate(artifact) else {
            return Ok(false);
        };
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Unavailable {
                details: format!("failed to inspect '{}': {}", path.display(), e),
            }
            .into()),
        }
    }

    async fn open(&self, artifact: &StoredArtifact) -> Result<ArtifactReader, Report<StoreError>> {
        let path = self.locate(artifact).ok_or_else(|| StoreError::Unavailable {
            details: format!("no readable file for {}:{}", artifact.disk, artifact.path),
        })?;
        let file = tokio::fs::File::open(&path)
            .await
            .map_err(|e| StoreError::Unavailable {
                details: format!("failed to open '{}': {}", path.display(), e),
            })?;
        Ok(Box::new(file))
    }
}
