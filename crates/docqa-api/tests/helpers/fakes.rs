//! Fake collaborators.

use async_trait::async_trait;
use docqa_core::models::FileRecord;
use docqa_api::error::storage_error;
use docqa_api::services::UploadSource;
use docqa_core::AppError;
use docqa_db::{FileRegistry, InMemoryFileRegistry};
use docqa_storage::{TransientFile, TransientStorage};
use docqa_services::{build_grounding_prompt, AnswerEngine, AnswerError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineCall {
    pub document_text: String,
    pub question: String,
}

impl EngineCall {
    pub fn prompt(&self) -> String {
        build_grounding_prompt(&self.document_text, &self.question)
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Answer(String),
    Status(u16),
    Hang,
}

/// Answer engine that records every call and replies with a canned result.
#[derive(Debug)]
pub struct RecordingEngine {
    reply: Reply,
    calls: Mutex<Vec<EngineCall>>,
}

impl RecordingEngine {
    pub fn answering(answer: &str) -> Self {
        Self::with_reply(Reply::Answer(answer.to_string()))
    }

    /// Fails every call with an HTTP status, like a quota error from the API.
    pub fn failing(status: u16) -> Self {
        Self::with_reply(Reply::Status(status))
    }

    /// Never answers within any reasonable timeout.
    pub fn hanging() -> Self {
        Self::with_reply(Reply::Hang)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AnswerEngine for RecordingEngine {
    async fn answer(&self, document_text: &str, question: &str) -> Result<String, AnswerError> {
        self.calls.lock().unwrap().push(EngineCall {
            document_text: document_text.to_string(),
            question: question.to_string(),
        });

        match &self.reply {
            Reply::Answer(answer) => Ok(answer.clone()),
            Reply::Status(status) => Err(AnswerError::Status {
                status: *status,
                body: "quota exceeded".to_string(),
            }),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }
}

/// Registry whose upserts fail. Reads and deletes go to the wrapped registry.
pub struct FailingRegistry {
    inner: Arc<InMemoryFileRegistry>,
}

impl FailingRegistry {
    pub fn new(inner: Arc<InMemoryFileRegistry>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl FileRegistry for FailingRegistry {
    async fn upsert(&self, _filename: &str, _uploader: &str) -> Result<FileRecord, AppError> {
        Err(AppError::Registry("connection reset".to_string()))
    }

    async fn delete(&self, filename: &str, uploader: Option<&str>) -> Result<FileRecord, AppError> {
        self.inner.delete(filename, uploader).await
    }

    async fn list(&self) -> Result<Vec<FileRecord>, AppError> {
        self.inner.list().await
    }
}

/// Upload source holding the document in memory, for driving the pipeline
/// without an HTTP request.
#[derive(Debug, Clone, Default)]
pub struct BufferedUpload {
    pub document: Option<(String, Vec<u8>)>,
}

impl BufferedUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Some((filename.into(), bytes.into())),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UploadSource for BufferedUpload {
    async fn materialize(
        &mut self,
        storage: &TransientStorage,
    ) -> Result<Option<TransientFile>, AppError> {
        let Some((filename, bytes)) = self.document.take() else {
            return Ok(None);
        };

        let mut file = storage.create(&filename).await.map_err(storage_error)?;
        file.write_chunk(&bytes).await.map_err(storage_error)?;
        file.finish().await.map_err(storage_error)?;
        Ok(Some(file))
    }
}
