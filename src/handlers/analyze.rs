use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    response::Json,
};
use std::time::Instant;
use tracing::{info, warn, error};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id;
use crate::models::{has_pdf_extension, AnalyzeResponse, UploadedFile};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// `POST /api/analyze-cv`
pub async fn analyze_cv_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    info!(request_id = %request_id, "Starting CV analysis request");

    let mut multipart = multipart.map_err(|e| {
        warn!(request_id = %request_id, "Rejected non-multipart upload: {}", e);
        AppError::invalid_file(format!("Expected a multipart upload: {}", e.body_text()))
    })?;

    let file = extract_file_from_multipart(&mut multipart, state.config.max_file_size_mb).await?;
    info!(
        request_id = %request_id,
        file_name = %file.name,
        file_size = file.size,
        mime_type = ?file.mime_type,
        "Received file"
    );

    let extractor = state.extractor.clone();
    let content = file.content.clone();
    let extracted = match tokio::task::spawn_blocking(move || extractor.extract(&content)).await? {
        Ok(extracted) => extracted,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "PDF text extraction failed");
            return Err(e);
        }
    };

    if extracted.is_blank() {
        warn!(request_id = %request_id, pages = extracted.pages, "No text could be extracted from PDF");
        return Err(AppError::invalid_file("Could not extract text from PDF"));
    }

    let analyzed = match state.anonymizer.request(&extracted.text).await {
        Ok(analyzed) => analyzed,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Error in AI analysis");
            return Err(e);
        }
    };

    info!(
        request_id = %request_id,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Request completed successfully"
    );

    Ok(Json(AnalyzeResponse::new(analyzed)))
}

/// Reads the `file` field. The extension is checked before the content is
/// read, and empty content is rejected, so neither case reaches extraction.
async fn extract_file_from_multipart(multipart: &mut Multipart, limit_mb: usize) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit_mb))?
    {
        if field.name().unwrap_or("") != FILE_FIELD {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        if !has_pdf_extension(&file_name) {
            warn!(file_name = %file_name, "Invalid file type received");
            return Err(AppError::invalid_file("Only PDF files are accepted"));
        }

        let content_type = field.content_type().map(|ct| ct.to_string());
        let data = field.bytes().await.map_err(|e| multipart_error(e, limit_mb))?;

        let mut file = UploadedFile::new(file_name, data);
        if let Some(mime_type) = content_type {
            file = file.with_mime_type(mime_type);
        }

        if file.is_empty() {
            warn!(file_name = %file.name, "Received empty file");
            return Err(AppError::invalid_file("The uploaded file is empty"));
        }

        return Ok(file);
    }

    Err(AppError::MissingFile)
}

fn multipart_error(err: MultipartError, limit_mb: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { limit: limit_mb }
    } else {
        AppError::invalid_file(format!("Failed to read multipart field: {}", err))
    }
}
