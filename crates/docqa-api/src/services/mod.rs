//! Request-scoped services used by the handlers

pub mod ingestion;
pub mod upload_source;

pub use ingestion::{IngestionOutcome, IngestionPipeline, IngestionStage};
pub use upload_source::{MultipartUpload, UploadSource};
