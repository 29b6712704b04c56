//! docqa core library
//!
//! Domain models, error types and configuration shared by every docqa crate.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, DocQaConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileRecord, Role, User};
