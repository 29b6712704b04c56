//! Answering model abstraction.
//!
//! The engine is a black box `document text × question → answer`. The whole
//! document is embedded in a single grounding prompt; there is no chunking,
//! streaming or retry.

mod gemini;

pub use gemini::{GeminiAnswerEngine, GeminiConfig};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("Failed to reach answering model: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Answering model returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed answering model response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait AnswerEngine: Send + Sync {
    /// Answer `question` using only `document_text` as context.
    async fn answer(&self, document_text: &str, question: &str) -> Result<String, AnswerError>;
}

/// The prompt sent to the model for one document and one question.
pub fn build_grounding_prompt(document_text: &str, question: &str) -> String {
    format!(
        "Based on the contents of the following document: {}, please answer the question: {}",
        document_text, question
    )
}
