//! Guarded file downloads.

use axum::{
    Extension,
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use mentor_portal_authz::StoredArtifact;
use mentor_portal_core::{ChatMessageId, DocumentId};
use mentor_portal_platform_access::{AccessError, ActiveRole};
use rootcause::Report;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::auth::AppState;
use crate::error::AccessRejection;

/// Query string accepted by download routes.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    /// Administrator request for escalated access (`1`, `true`, `yes`, `on`).
    pub escalate: Option<String>,
}

impl DownloadQuery {
    fn escalate(&self) -> bool {
        self.escalate.as_deref().is_some_and(|value| {
            ["1", "true", "yes", "on"]
                .iter()
                .any(|truthy| value.trim().eq_ignore_ascii_case(truthy))
        })
    }
}

pub async fn chat_attachment(
    State(state): State<Arc<AppState>>,
    Extension(active): Extension<ActiveRole>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AccessRejection> {
    let message_id: ChatMessageId = id
        .parse()
        .map_err(|_| AccessError::not_found("chat message"))?;
    let artifact = state
        .downloads
        .chat_attachment(Some(&active), message_id, query.escalate())
        .await?;
    stream(&state, artifact).await
}

/// Serves a mentorship document's file.
///
/// A document the caller may not open answers exactly like one that does not
/// exist.
pub async fn document(
    State(state): State<Arc<AppState>>,
    Extension(active): Extension<ActiveRole>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AccessRejection> {
    let document_id: DocumentId = id.parse().map_err(|_| AccessError::not_found("document"))?;
    let artifact = state
        .downloads
        .document(Some(&active), document_id, query.escalate())
        .await
        .map_err(conceal_denial)?;
    stream(&state, artifact).await
}

fn conceal_denial(report: Report<AccessError>) -> Report<AccessError> {
    if matches!(report.current_context(), AccessError::Forbidden { .. }) {
        report.context(AccessError::not_found("document"))
    } else {
        report
    }
}

async fn stream(state: &AppState, artifact: StoredArtifact) -> Result<Response, AccessRejection> {
    let reader = state
        .artifacts
        .open(&artifact)
        .await
        .map_err(AccessError::unavailable)?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&artifact.display_name),
            ),
        ],
        body,
    )
        .into_response())
}

/// Builds an `attachment` disposition with a header-safe file name.
fn content_disposition(display_name: &str) -> String {
    let filename: String = display_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename=\"{filename}\"")
}
