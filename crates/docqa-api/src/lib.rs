//! docqa API library
//!
//! HTTP handlers, authentication, the ingestion pipeline and application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod telemetry;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::ingestion::{IngestionOutcome, IngestionPipeline, IngestionStage};
pub use state::AppState;
