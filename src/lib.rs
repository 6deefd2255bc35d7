//! PDF Anonymizer Service
//!
//! Extracts the text of an uploaded CV, has an OpenAI-compatible completion
//! service rewrite it with personal data replaced by placeholders, and renders
//! arbitrary text back into a downloadable PDF.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use state::AppState;
