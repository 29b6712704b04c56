//! Document text extraction.

pub mod document;

pub use document::{
    extract, extract_blocking, extract_text, file_extension, DocumentFormat, ExtractionError,
};
