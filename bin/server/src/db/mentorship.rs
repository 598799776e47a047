//! Database repository for mentorship assignments, threads, messages, and documents.

use async_trait::async_trait;
use mentor_portal_authz::{
    ArtifactRef, AssignmentStore, ChatMessage, ChatThread, DocumentStore, MentorshipDocument,
    MessageStore, ThreadStore,
};
use mentor_portal_core::{ChatMessageId, DocumentId, ThreadId, UserId};
use mentor_portal_platform_access::StoreError;
use rootcause::Report;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

use super::{corrupt, unavailable};

fn parse_id<T>(column: &str, value: &str) -> Result<T, Report<StoreError>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(value).map_err(|e| corrupt(format!("invalid {column} '{value}': {e}")))
}

#[derive(FromRow)]
struct ThreadRow {
    id: String,
    student_id: String,
    is_escalated: bool,
}

impl ThreadRow {
    fn try_into_thread(self) -> Result<ChatThread, Report<StoreError>> {
        Ok(ChatThread {
            id: parse_id("thread id", &self.id)?,
            student_id: parse_id("student id", &self.student_id)?,
            is_escalated: self.is_escalated,
        })
    }
}

#[derive(FromRow)]
struct MessageRow {
    id: String,
    thread_id: String,
    sender_id: String,
    attachment_disk: Option<String>,
    attachment_path: Option<String>,
    attachment_name: Option<String>,
}

impl MessageRow {
    fn try_into_message(self) -> Result<ChatMessage, Report<StoreError>> {
        Ok(ChatMessage {
            id: parse_id("message id", &self.id)?,
            thread_id: parse_id("thread id", &self.thread_id)?,
            sender_id: parse_id("sender id", &self.sender_id)?,
            attachment: ArtifactRef {
                disk: self.attachment_disk,
                path: self.attachment_path,
                name: self.attachment_name,
            },
        })
    }
}

#[derive(FromRow)]
struct DocumentRow {
    id: String,
    student_id: String,
    lecturer_id: Option<String>,
    title: String,
    file_disk: Option<String>,
    file_path: Option<String>,
    file_name: Option<String>,
}

impl DocumentRow {
    fn try_into_document(self) -> Result<MentorshipDocument, Report<StoreError>> {
        let lecturer_id = self
            .lecturer_id
            .as_deref()
            .map(|id| parse_id("lecturer id", id))
            .transpose()?;
        Ok(MentorshipDocument {
            id: parse_id("document id", &self.id)?,
            student_id: parse_id("student id", &self.student_id)?,
            lecturer_id,
            title: self.title,
            file: ArtifactRef {
                disk: self.file_disk,
                path: self.file_path,
                name: self.file_name,
            },
        })
    }
}

/// Repository for mentorship data.
pub struct MentorshipRepository {
    pool: PgPool,
}

impl MentorshipRepository {
    /// Creates a new mentorship repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for MentorshipRepository {
    async fn has_active_assignment(
        &self,
        student_id: UserId,
        lecturer_id: UserId,
    ) -> Result<bool, Report<StoreError>> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM mentorship_assignments
                WHERE student_id = $1 AND lecturer_id = $2 AND status = 'active'
            )
            "#,
        )
        .bind(student_id.to_string())
        .bind(lecturer_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(exists)
    }
}

#[async_trait]
impl ThreadStore for MentorshipRepository {
    async fn find_thread(&self, id: ThreadId) -> Result<Option<ChatThread>, Report<StoreError>> {
        let row: Option<ThreadRow> = sqlx::query_as(
            r#"
            SELECT id, student_id, is_escalated
            FROM chat_threads
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(ThreadRow::try_into_thread).transpose()
    }
}

#[async_trait]
impl MessageStore for MentorshipRepository {
    async fn find_message(
        &self,
        id: ChatMessageId,
    ) -> Result<Option<ChatMessage>, Report<StoreError>> {
        let row: Option<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, thread_id, sender_id, attachment_disk, attachment_path, attachment_name
            FROM chat_messages
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(MessageRow::try_into_message).transpose()
    }
}

#[async_trait]
impl DocumentStore for MentorshipRepository {
    async fn find_document(
        &self,
        id: DocumentId,
    ) -> Result<Option<MentorshipDocument>, Report<StoreError>> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            SELECT id, student_id, lecturer_id, title, file_disk, file_path, file_name
            FROM mentorship_documents
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(DocumentRow::try_into_document).transpose()
    }
}
