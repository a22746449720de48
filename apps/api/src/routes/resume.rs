//! Resume pipeline handlers: upload → extract, enhance, serialize → download.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::enhance::Backend;
use crate::errors::AppError;
use crate::pipeline::{extract, serialize, DocumentFormat};
use crate::state::AppState;
use crate::storage;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub format: DocumentFormat,
    /// Extracted sections in document order.
    pub sections: Vec<String>,
    /// Sections joined with blank lines, ready for the editing view.
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub content: String,
    pub ai_service: String,
    #[serde(default)]
    pub objective: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub content: String,
    pub ai_service: String,
    /// User-facing message when enhancement failed; `content` then echoes
    /// the submitted text unchanged.
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub content: String,
    pub format: DocumentFormat,
    #[serde(default)]
    pub original_filename: Option<String>,
}

/// POST /api/v1/resume/upload
///
/// Multipart upload (`resume` field). Stages the file, extracts its text,
/// and returns the sections for editing. Extraction runs on the uploaded
/// bytes, never on the staged file, so stored files are never mutated.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((filename, bytes));
        break;
    }

    let Some((filename, bytes)) = upload else {
        return Err(AppError::Validation("No file part".to_string()));
    };
    if filename.is_empty() {
        return Err(AppError::Validation("No selected file".to_string()));
    }

    let format = DocumentFormat::from_filename(&filename)?;
    let staged = storage::stage_upload(&state.config.upload_dir, &filename, &bytes).await?;
    info!(
        filename = %filename,
        format = %format,
        bytes = bytes.len(),
        staged = %staged.display(),
        "resume uploaded"
    );

    let extracted = extract::extract(&bytes, format)?;

    Ok(Json(UploadResponse {
        filename,
        format,
        content: extracted.text(),
        sections: extracted.sections,
    }))
}

/// POST /api/v1/resume/enhance
///
/// Dispatches the edited content to the selected backend. Enhancement
/// failures are never a 5xx: the response echoes the submitted content and
/// carries the user-facing message in `error`.
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(req): Json<EnhanceRequest>,
) -> Json<EnhanceResponse> {
    let outcome = match Backend::parse(&req.ai_service) {
        Ok(backend) => {
            state
                .enhancer
                .enhance(&req.content, req.objective.as_deref(), backend)
                .await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(content) => Json(EnhanceResponse {
            content,
            ai_service: req.ai_service,
            error: None,
        }),
        Err(e) => {
            warn!(ai_service = %req.ai_service, "enhancement failed: {e}");
            Json(EnhanceResponse {
                content: req.content,
                ai_service: req.ai_service,
                error: Some(e.user_message()),
            })
        }
    }
}

/// POST /api/v1/resume/download
///
/// Serializes the final content into the requested format, writes it to the
/// output directory under a per-request filename, and streams it back as an
/// attachment.
pub async fn handle_download(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = serialize::serialize(&req.content, req.format)?;

    let original = req.original_filename.as_deref().unwrap_or("resume");
    let filename = serialize::output_filename(original, req.format);
    let written = storage::write_output(&state.config.output_dir, &filename, &bytes).await?;
    info!(
        filename = %filename,
        format = %req.format,
        bytes = bytes.len(),
        written = %written.display(),
        "resume serialized"
    );

    let headers = [
        (header::CONTENT_TYPE, req.format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, Bytes::from(bytes)))
}
