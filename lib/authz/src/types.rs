//! Mentorship data model.

use mentor_portal_core::{AssignmentId, ChatMessageId, DocumentId, ThreadId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a lecturer advises a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorType {
    Primary,
    Secondary,
}

impl AdvisorType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for AdvisorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an assignment. Only active assignments grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Ended,
}

impl AssignmentStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lecturer assigned to advise a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorshipAssignment {
    pub id: AssignmentId,
    pub student_id: UserId,
    pub lecturer_id: UserId,
    pub advisor_type: AdvisorType,
    pub status: AssignmentStatus,
}

impl MentorshipAssignment {
    /// Creates an active assignment.
    #[must_use]
    pub fn active(student_id: UserId, lecturer_id: UserId, advisor_type: AdvisorType) -> Self {
        Self {
            id: AssignmentId::new(),
            student_id,
            lecturer_id,
            advisor_type,
            status: AssignmentStatus::Active,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }
}

/// A file kept on a named storage disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArtifact {
    /// Name of the configured storage disk.
    pub disk: String,
    /// Path relative to the disk root.
    pub path: String,
    /// File name offered to the downloading user.
    pub display_name: String,
}

/// Optional artifact columns as they are stored on messages and documents.
///
/// Either the disk or the path may be missing; such a resource has nothing to
/// download.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub disk: Option<String>,
    pub path: Option<String>,
    pub name: Option<String>,
}

impl ArtifactRef {
    #[must_use]
    pub fn on_disk(disk: impl Into<String>, path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            disk: Some(disk.into()),
            path: Some(path.into()),
            name: Some(name.into()),
        }
    }

    /// Returns the artifact if both disk and path are set.
    ///
    /// Without a display name the last path segment is offered instead.
    #[must_use]
    pub fn artifact(&self) -> Option<StoredArtifact> {
        let disk = self.disk.as_deref().filter(|disk| !disk.is_empty())?;
        let path = self.path.as_deref().filter(|path| !path.is_empty())?;
        let display_name = self
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| path.rsplit('/').next().unwrap_or(path));
        Some(StoredArtifact {
            disk: disk.to_string(),
            path: path.to_string(),
            display_name: display_name.to_string(),
        })
    }
}

/// A chat thread between a student and their lecturers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatThread {
    pub id: ThreadId,
    /// The student who owns the thread.
    pub student_id: UserId,
    /// Set once the thread has been escalated to administrators.
    pub is_escalated: bool,
}

/// A message posted in a chat thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub thread_id: ThreadId,
    pub sender_id: UserId,
    pub attachment: ArtifactRef,
}

/// A document exchanged between a student and a lecturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorshipDocument {
    pub id: DocumentId,
    pub student_id: UserId,
    /// The reviewing lecturer, if one has been set.
    pub lecturer_id: Option<UserId>,
    pub title: String,
    pub file: ArtifactRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_requires_disk_and_path() {
        let missing_disk = ArtifactRef {
            disk: None,
            path: Some("docs/a.pdf".to_string()),
            name: None,
        };
        assert_eq!(missing_disk.artifact(), None);

        let empty_path = ArtifactRef {
            disk: Some("local".to_string()),
            path: Some(String::new()),
            name: Some("a.pdf".to_string()),
        };
        assert_eq!(empty_path.artifact(), None);
        assert_eq!(ArtifactRef::default().artifact(), None);
    }

    #[test]
    fn artifact_display_name_falls_back_to_file_name() {
        let file = ArtifactRef {
            disk: Some("local".to_string()),
            path: Some("theses/draft-2.pdf".to_string()),
            name: None,
        };
        let artifact = file.artifact().unwrap();
        assert_eq!(artifact.display_name, "draft-2.pdf");
        assert_eq!(artifact.disk, "local");
    }

    #[test]
    fn only_active_assignments_are_active() {
        let mut assignment =
            MentorshipAssignment::active(UserId::new(), UserId::new(), AdvisorType::Secondary);
        assert!(assignment.is_active());
        assignment.status = AssignmentStatus::Ended;
        assert!(!assignment.is_active());
        assert_eq!(assignment.status.to_string(), "ended");
    }
}
