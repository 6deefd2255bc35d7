use std::time::Instant;
use lopdf::Document;

use crate::error::{AppError, AppResult};

/// Plain text recovered from an uploaded PDF.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub pages: usize,
    pub processing_time_ms: u64,
}

impl ExtractedText {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Concatenates the text of every page in page order.
    ///
    /// Fails only when the bytes are not a parseable PDF. A document without a
    /// text layer yields blank text; deciding what to do with that is up to the
    /// caller.
    pub fn extract(&self, content: &[u8]) -> AppResult<ExtractedText> {
        let start = Instant::now();

        let doc = Document::load_mem(content).map_err(|e| {
            tracing::warn!("PDF structure could not be parsed: {}", e);
            AppError::extraction(e.to_string())
        })?;

        let pages = doc.get_pages();
        let page_count = pages.len();
        let mut text = String::new();

        for (index, page_num) in pages.keys().enumerate() {
            tracing::debug!("Processing page {} of {}", index + 1, page_count);
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    tracing::warn!(page = *page_num, "Skipping page without extractable text: {}", e);
                }
            }
        }

        if text.trim().is_empty() && page_count > 0 {
            tracing::debug!("Page-level extraction produced no text, trying pdf-extract");
            match pdf_extract::extract_text_from_mem(content) {
                Ok(fallback) => text = fallback,
                Err(e) => tracing::warn!("pdf-extract fallback failed: {}", e),
            }
        }

        let result = ExtractedText {
            text,
            pages: page_count,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            pages = result.pages,
            characters = result.char_count(),
            processing_time_ms = result.processing_time_ms,
            "Extracted text from PDF"
        );

        Ok(result)
    }
}
