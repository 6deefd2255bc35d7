//! Unit tests for individual components

use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use pdf_anonymizer::{
    config::{Config, DEFAULT_API_BASE, DEFAULT_MODEL},
    error::AppError,
    models::{has_pdf_extension, CreatePdfRequest, UploadedFile},
    services::{download_filename, PdfGenerator, TextExtractor},
};
use std::collections::HashMap;
use std::time::Duration;

fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_source(|key| vars.get(key).cloned())
}

#[test]
fn test_config_defaults() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config.server_host, "0.0.0.0");
    assert_eq!(config.server_port, 8001);
    assert_eq!(config.max_file_size_mb, 10);
    assert_eq!(config.api_key, None);
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert_eq!(config.model, DEFAULT_MODEL);
    assert_eq!(config.allowed_origins(), vec!["http://localhost:3000".to_string()]);
    assert_eq!(config.cleanup_delay(), Duration::from_secs(1));
    assert!(config.temp_dir.is_none());
}

#[test]
fn test_config_from_values() {
    let config = config_from(&[
        ("SERVER_HOST", "127.0.0.1"),
        ("SERVER_PORT", "9000"),
        ("MAX_FILE_SIZE_MB", "5"),
        ("OPENAI_API_KEY", " sk-test "),
        ("OPENAI_API_BASE", "https://api.example.com/v1/"),
        ("OPENAI_MODEL", "mistral-small"),
        ("FRONTEND_URL", "https://app.example.com"),
        ("ADDITIONAL_ORIGINS", "https://a.example.com, ,https://app.example.com,https://b.example.com"),
        ("PDF_CLEANUP_DELAY_MS", "250"),
        ("TEMP_DIR", "/var/tmp/anonymizer"),
    ])
    .unwrap();

    assert_eq!(config.bind_address(), "127.0.0.1:9000");
    assert_eq!(config.max_body_bytes(), 5 * 1024 * 1024);
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.api_base, "https://api.example.com/v1");
    assert_eq!(config.model, "mistral-small");
    assert_eq!(
        config.allowed_origins(),
        vec![
            "https://app.example.com".to_string(),
            "https://a.example.com".to_string(),
            "https://b.example.com".to_string(),
        ]
    );
    assert_eq!(config.cleanup_delay(), Duration::from_millis(250));
    assert_eq!(config.temp_dir.unwrap().to_str(), Some("/var/tmp/anonymizer"));
}

#[test]
fn test_config_port_overrides_server_port() {
    let config = config_from(&[("SERVER_PORT", "9000"), ("PORT", "7000")]).unwrap();
    assert_eq!(config.server_port, 7000);
}

#[test]
fn test_config_unparseable_number_falls_back() {
    let config = config_from(&[("MAX_FILE_SIZE_MB", "lots")]).unwrap();
    assert_eq!(config.max_file_size_mb, 10);
}

#[test]
fn test_config_validation() {
    assert!(config_from(&[("SERVER_PORT", "0")]).is_err());
    assert!(config_from(&[("MAX_FILE_SIZE_MB", "0")]).is_err());
    assert!(config_from(&[("OPENAI_API_BASE", "")]).is_err());
}

#[test]
fn test_config_debug_hides_api_key() {
    let config = config_from(&[("OPENAI_API_KEY", "sk-secret")]).unwrap();
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn test_error_status_codes() {
    assert_eq!(AppError::validation("x").status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::invalid_file("x").status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::MissingFile.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::extraction("x").status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::FileTooLarge { limit: 10 }.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(AppError::upstream("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(AppError::generation("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(AppError::filesystem("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(AppError::config("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_error_codes() {
    assert_eq!(AppError::validation("x").error_code(), "VALIDATION_ERROR");
    assert_eq!(AppError::extraction("x").error_code(), "EXTRACTION_ERROR");
    assert_eq!(AppError::upstream("x").error_code(), "UPSTREAM_ERROR");
    assert_eq!(AppError::generation("x").error_code(), "GENERATION_ERROR");
    assert_eq!(AppError::filesystem("x").error_code(), "FILESYSTEM_ERROR");
}

#[tokio::test]
async fn test_error_response_is_single_message() {
    let response = AppError::generation("bad glyph").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Error creating PDF: bad glyph" }));
}

#[test]
fn test_error_conversions() {
    let app_error: AppError = anyhow::anyhow!("Test error").into();
    match app_error {
        AppError::Internal { message } => assert!(message.contains("Test error")),
        _ => panic!("Expected Internal error"),
    }

    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::FilesystemError { .. }));

    let json_error = serde_json::from_str::<serde_json::Value>("{invalid json").unwrap_err();
    let app_error: AppError = json_error.into();
    match app_error {
        AppError::ValidationError { message } => assert!(message.contains("JSON parsing error")),
        _ => panic!("Expected ValidationError"),
    }
}

#[test]
fn test_pdf_extension_check() {
    assert!(has_pdf_extension("cv.pdf"));
    assert!(has_pdf_extension("CV.Pdf"));
    assert!(!has_pdf_extension("cv.pdf.exe"));
    assert!(!has_pdf_extension("pdf"));
    assert!(!has_pdf_extension(""));

    let file = UploadedFile::new("Lebenslauf.PDF".to_string(), bytes::Bytes::new())
        .with_mime_type("application/octet-stream".to_string());
    assert!(file.has_pdf_extension());
    assert!(file.is_empty());
}

#[test]
fn test_create_pdf_request_source_name() {
    let request: CreatePdfRequest = serde_json::from_str(r#"{"text":"x"}"#).unwrap();
    assert_eq!(request.source_name(), "lebenslauf");

    let request: CreatePdfRequest = serde_json::from_str(r#"{"text":"x","filename":null}"#).unwrap();
    assert_eq!(request.source_name(), "lebenslauf");

    let request: CreatePdfRequest = serde_json::from_str(r#"{"text":"x","filename":"Anna.pdf"}"#).unwrap();
    assert_eq!(request.source_name(), "Anna.pdf");
    assert_eq!(download_filename(request.source_name()), "anna_anonymisiert.pdf");
}

#[test]
fn test_generated_pdf_text_is_extractable() {
    let bytes = PdfGenerator::new()
        .generate("Berufserfahrung\n\n  \nSenior Entwickler bei Beispiel GmbH", Some("cv.pdf"))
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let extracted = TextExtractor::new().extract(&bytes).unwrap();
    assert_eq!(extracted.pages, 1);
    assert!(!extracted.is_blank());
    assert!(extracted.text.contains("Berufserfahrung"));
}

#[test]
fn test_generate_rejects_unencodable_title() {
    let err = PdfGenerator::new().generate("Hallo", Some("简历.pdf")).unwrap_err();
    assert!(matches!(err, AppError::GenerationError { .. }));
}
