//! Transient on-disk storage for uploads that only live for one request.

pub mod error;
pub mod transient;

pub use error::{StorageError, StorageResult};
pub use transient::{TransientFile, TransientStorage};
