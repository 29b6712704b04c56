//! Gemini `generateContent` client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use super::{build_grounding_prompt, AnswerEngine, AnswerError};

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model name, e.g. `gemini-2.0-flash`
    pub model: String,
    /// API root without trailing slash, e.g. `https://generativelanguage.googleapis.com`
    pub base_url: String,
}

impl Debug for GeminiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub struct GeminiAnswerEngine {
    http_client: reqwest::Client,
    config: GeminiConfig,
}

impl Debug for GeminiAnswerEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiAnswerEngine")
            .field("model", &self.config.model)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiAnswerEngine {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client for Gemini API")?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn first_text(response: GenerateContentResponse) -> Result<String, AnswerError> {
        if response.candidates.is_empty() {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .map(|reason| format!("prompt blocked: {}", reason))
                .unwrap_or_else(|| "response has no candidates".to_string());
            return Err(AnswerError::MalformedResponse(reason));
        }

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                AnswerError::MalformedResponse(
                    "first candidate has no text part".to_string(),
                )
            })
    }
}

#[async_trait]
impl AnswerEngine for GeminiAnswerEngine {
    #[tracing::instrument(skip_all, fields(model = %self.config.model, document_len = document_text.len()))]
    async fn answer(&self, document_text: &str, question: &str) -> Result<String, AnswerError> {
        let start = std::time::Instant::now();
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_grounding_prompt(document_text, question),
                }],
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AnswerError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = %status, "Gemini API request failed");
            return Err(AnswerError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnswerError::MalformedResponse(e.to_string()))?;

        let answer = Self::first_text(parsed)?;

        tracing::info!(
            answer_len = answer.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Gemini answer received"
        );

        Ok(answer)
    }
}
