use std::sync::Arc;

use crate::config::Config;
use crate::services::{Anonymizer, PdfGenerator, TextExtractor};

/// Immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: TextExtractor,
    pub anonymizer: Anonymizer,
    pub generator: PdfGenerator,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let anonymizer = Anonymizer::new(&config);
        Self {
            config: Arc::new(config),
            extractor: TextExtractor::new(),
            anonymizer,
            generator: PdfGenerator::new(),
        }
    }
}
