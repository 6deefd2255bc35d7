use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use futures::StreamExt;
use std::time::Instant;
use tokio_util::io::ReaderStream;
use tracing::{info, warn, error};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id;
use crate::models::CreatePdfRequest;
use crate::services::{download_filename, TempArtifact};
use crate::state::AppState;

/// `POST /api/create-pdf`
///
/// The body is parsed as JSON regardless of the declared content type.
pub async fn create_pdf_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Response> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let body = body.map_err(|e| {
        warn!(request_id = %request_id, "Failed to read create-pdf body: {}", e);
        body_error(e, state.config.max_file_size_mb)
    })?;

    let request: CreatePdfRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(request_id = %request_id, "Invalid create-pdf body: {}", e);
        AppError::from(e)
    })?;

    let source_name = request.source_name().to_string();
    let text = match request.text {
        Some(text) if !text.is_empty() => text,
        _ => {
            warn!(request_id = %request_id, "Create-pdf request without text");
            return Err(AppError::validation("Text is required"));
        }
    };

    info!(request_id = %request_id, source_name = %source_name, text_chars = text.chars().count(), "Creating new PDF from text");

    let generator = state.generator.clone();
    let title_source = source_name.clone();
    let pdf = match tokio::task::spawn_blocking(move || generator.generate(&text, Some(&title_source))).await? {
        Ok(pdf) => pdf,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Error in PDF creation");
            return Err(e);
        }
    };
    let size = pdf.len();

    let temp_dir = state.config.temp_dir.clone();
    let delay = state.config.cleanup_delay();
    let artifact = tokio::task::spawn_blocking(move || TempArtifact::write(temp_dir.as_deref(), &pdf, delay)).await??;

    // If opening fails the artifact is dropped here, which removes the file.
    let file = tokio::fs::File::open(artifact.path())
        .await
        .map_err(|e| AppError::filesystem(format!("Failed to reopen temporary file: {}", e)))?;

    // The artifact lives as long as the body stream: once the body is finished
    // or abandoned by the client, its drop schedules the file's removal.
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _owner = &artifact;
        chunk
    });

    let filename = download_filename(&source_name);
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Failed to build response: {}", e)))?;

    info!(
        request_id = %request_id,
        size_bytes = size,
        download_filename = %filename,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Returning PDF"
    );

    Ok(response)
}

fn body_error(err: BytesRejection, limit_mb: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { limit: limit_mb }
    } else {
        AppError::validation(format!("Failed to read request body: {}", err.body_text()))
    }
}
