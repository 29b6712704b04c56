//! Plain-text extraction for uploaded documents.
//!
//! The format is decided by the extension of the client-supplied filename, never
//! by sniffing the bytes. Text files are returned verbatim; PDFs go through
//! `pdf-extract`, whose panics are caught and reported as extraction failures.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Txt,
    Pdf,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Pdf => "pdf",
        }
    }

    /// Resolve the format from a declared extension such as `"PDF"` or `"txt"`.
    pub fn from_extension(extension: &str) -> Result<Self, ExtractionError> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Ok(DocumentFormat::Txt),
            "pdf" => Ok(DocumentFormat::Pdf),
            other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Resolve the format from a filename. A name without a `.` has no extension.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = file_extension(filename)
            .ok_or_else(|| ExtractionError::UnsupportedFormat(String::new()))?;
        Self::from_extension(&extension)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Text document is not valid UTF-8")]
    InvalidText(#[source] std::string::FromUtf8Error),

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("PDF parser panicked: {0}")]
    ParserPanic(String),

    #[error("Extraction task failed: {0}")]
    TaskFailed(String),
}

impl ExtractionError {
    /// True when the document itself was rejected by format, as opposed to failing
    /// during parsing.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, ExtractionError::UnsupportedFormat(_))
    }
}

/// Last `.`-separated segment of `filename`, lowercased.
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Extract text from `bytes` according to the declared extension.
pub fn extract(bytes: &[u8], declared_extension: &str) -> Result<String, ExtractionError> {
    let format = DocumentFormat::from_extension(declared_extension)?;
    extract_text(bytes, format)
}

pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Txt => {
            String::from_utf8(bytes.to_vec()).map_err(ExtractionError::InvalidText)
        }
        DocumentFormat::Pdf => extract_pdf(bytes),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match result {
        Ok(Ok(text)) => {
            if text.trim().is_empty() {
                tracing::debug!("PDF contains no extractable text");
            }
            Ok(text)
        }
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(payload) => Err(ExtractionError::ParserPanic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run [`extract_text`] on the blocking thread pool.
pub async fn extract_blocking(
    bytes: Vec<u8>,
    format: DocumentFormat,
) -> Result<String, ExtractionError> {
    let size_bytes = bytes.len();
    let start = std::time::Instant::now();

    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, format))
        .await
        .map_err(|e| {
            if e.is_panic() {
                ExtractionError::ParserPanic(panic_message(e.into_panic().as_ref()))
            } else {
                ExtractionError::TaskFailed(e.to_string())
            }
        })??;

    tracing::debug!(
        format = %format,
        size_bytes,
        text_len = text.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Document text extracted"
    );

    Ok(text)
}
