pub mod anonymizer;
pub mod artifact;
pub mod pdf_generator;
pub mod prompt;
pub mod text_extractor;

pub use anonymizer::Anonymizer;
pub use artifact::TempArtifact;
pub use pdf_generator::{download_filename, PdfGenerator};
pub use text_extractor::{ExtractedText, TextExtractor};
