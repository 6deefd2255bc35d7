use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// The only document extension accepted for analysis.
pub const PDF_EXTENSION: &str = ".pdf";

/// Filename used when a create-pdf request does not name the source document.
pub const DEFAULT_SOURCE_NAME: &str = "lebenslauf";

/// Body of `POST /api/create-pdf`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePdfRequest {
    pub text: Option<String>,
    pub filename: Option<String>,
}

impl CreatePdfRequest {
    pub fn source_name(&self) -> &str {
        self.filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SOURCE_NAME)
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: String, content: Bytes) -> Self {
        let size = content.len();
        Self {
            name,
            size,
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Extension check only; the declared MIME type is not trusted.
    pub fn has_pdf_extension(&self) -> bool {
        has_pdf_extension(&self.name)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

pub fn has_pdf_extension(name: &str) -> bool {
    name.to_lowercase().ends_with(PDF_EXTENSION)
}
