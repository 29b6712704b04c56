//! Upload pipeline: authorize → materialize → extract → answer → persist → release
//!
//! One awaited state machine per request. The transient file has a single release
//! point after processing, reached on success and on every failure once the file
//! exists. Stage transitions are logged at debug level, failures at the stage they
//! happened in.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use docqa_core::models::FileRecord;
use docqa_core::AppError;
use docqa_db::FileRegistry;
use docqa_processing::{extract_blocking, DocumentFormat};
use docqa_services::AnswerEngine;
use docqa_storage::{TransientFile, TransientStorage};

use crate::auth::guard::{authorize, Operation};
use crate::auth::models::AuthContext;
use crate::error::{answer_error, extraction_error, storage_error};
use crate::services::upload_source::UploadSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionStage {
    Authorizing,
    Materializing,
    Extracting,
    Answering,
    Persisting,
    Releasing,
    Done,
}

impl IngestionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionStage::Authorizing => "authorizing",
            IngestionStage::Materializing => "materializing",
            IngestionStage::Extracting => "extracting",
            IngestionStage::Answering => "answering",
            IngestionStage::Persisting => "persisting",
            IngestionStage::Releasing => "releasing",
            IngestionStage::Done => "done",
        }
    }
}

impl fmt::Display for IngestionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    pub answer: String,
    pub record: FileRecord,
}

#[derive(Clone)]
pub struct IngestionPipeline {
    storage: TransientStorage,
    engine: Arc<dyn AnswerEngine>,
    registry: Arc<dyn FileRegistry>,
    answer_timeout: Duration,
}

impl IngestionPipeline {
    pub fn new(
        storage: TransientStorage,
        engine: Arc<dyn AnswerEngine>,
        registry: Arc<dyn FileRegistry>,
        answer_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            engine,
            registry,
            answer_timeout,
        }
    }

    #[tracing::instrument(skip_all, fields(username = %caller.username, role = %caller.role))]
    pub async fn run<S: UploadSource>(
        &self,
        caller: &AuthContext,
        question: Option<&str>,
        mut source: S,
    ) -> Result<IngestionOutcome, AppError> {
        let start = std::time::Instant::now();

        enter(IngestionStage::Authorizing);
        authorize(caller.role, Operation::Upload)
            .map_err(|e| failed(IngestionStage::Authorizing, e))?;

        enter(IngestionStage::Materializing);
        let file = match source.materialize(&self.storage).await {
            Ok(Some(file)) => file,
            Ok(None) => return Err(failed(IngestionStage::Materializing, AppError::MissingFile)),
            Err(e) => return Err(failed(IngestionStage::Materializing, e)),
        };

        let result = self.process(caller, question, &file).await;

        enter(IngestionStage::Releasing);
        file.release().await;

        match result {
            Ok(outcome) => {
                enter(IngestionStage::Done);
                tracing::info!(
                    filename = %outcome.record.filename,
                    answer_len = outcome.answer.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Document answered"
                );
                Ok(outcome)
            }
            Err((stage, e)) => Err(failed(stage, e)),
        }
    }

    /// Everything between materializing and releasing. Errors carry the stage
    /// they happened in.
    async fn process(
        &self,
        caller: &AuthContext,
        question: Option<&str>,
        file: &TransientFile,
    ) -> Result<IngestionOutcome, (IngestionStage, AppError)> {
        let question = question
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or((IngestionStage::Materializing, AppError::MissingQuestion))?;

        enter(IngestionStage::Extracting);
        let at_extracting = |e| (IngestionStage::Extracting, e);
        let format = DocumentFormat::from_filename(file.original_filename())
            .map_err(|e| at_extracting(extraction_error(e)))?;
        let bytes = file
            .read_all()
            .await
            .map_err(|e| at_extracting(storage_error(e)))?;
        let text = extract_blocking(bytes, format)
            .await
            .map_err(|e| at_extracting(extraction_error(e)))?;

        enter(IngestionStage::Answering);
        let answer = tokio::time::timeout(self.answer_timeout, self.engine.answer(&text, question))
            .await
            .map_err(|_| {
                (
                    IngestionStage::Answering,
                    AppError::Upstream(format!(
                        "Answer engine timed out after {}s",
                        self.answer_timeout.as_secs_f64()
                    )),
                )
            })?
            .map_err(|e| (IngestionStage::Answering, answer_error(e)))?;

        enter(IngestionStage::Persisting);
        let record = self
            .registry
            .upsert(file.original_filename(), &caller.username)
            .await
            .map_err(|e| (IngestionStage::Persisting, e))?;

        Ok(IngestionOutcome { answer, record })
    }
}

fn enter(stage: IngestionStage) {
    tracing::debug!(stage = %stage, "Ingestion stage");
}

fn failed(stage: IngestionStage, error: AppError) -> AppError {
    tracing::warn!(stage = %stage, error = %error, "Ingestion failed");
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::storage_error;
    use async_trait::async_trait;
    use docqa_core::models::Role;
    use docqa_db::InMemoryFileRegistry;
    use docqa_services::AnswerError;
    use tempfile::tempdir;

    struct InMemoryDocument(Option<(&'static str, &'static str)>);

    #[async_trait]
    impl UploadSource for InMemoryDocument {
        async fn materialize(
            &mut self,
            storage: &TransientStorage,
        ) -> Result<Option<TransientFile>, AppError> {
            let Some((filename, text)) = self.0.take() else {
                return Ok(None);
            };
            let mut file = storage.create(filename).await.map_err(storage_error)?;
            file.write_chunk(text.as_bytes()).await.map_err(storage_error)?;
            file.finish().await.map_err(storage_error)?;
            Ok(Some(file))
        }
    }

    struct SlowEngine;

    #[async_trait]
    impl AnswerEngine for SlowEngine {
        async fn answer(&self, _text: &str, _question: &str) -> Result<String, AnswerError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    struct EchoEngine;

    #[async_trait]
    impl AnswerEngine for EchoEngine {
        async fn answer(&self, text: &str, question: &str) -> Result<String, AnswerError> {
            Ok(format!("{} / {}", text, question))
        }
    }

    fn admin() -> AuthContext {
        AuthContext {
            username: "alice".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn test_answer_timeout_is_upstream_failure() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(InMemoryFileRegistry::new());
        let pipeline = IngestionPipeline::new(
            TransientStorage::new(dir.path()).await.unwrap(),
            Arc::new(SlowEngine),
            registry.clone(),
            Duration::from_millis(50),
        );

        let err = pipeline
            .run(&admin(), Some("why?"), InMemoryDocument(Some(("a.txt", "text"))))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upstream(ref msg) if msg.contains("timed out")));
        assert!(registry.list().await.unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_question_is_trimmed() {
        let dir = tempdir().unwrap();
        let pipeline = IngestionPipeline::new(
            TransientStorage::new(dir.path()).await.unwrap(),
            Arc::new(EchoEngine),
            Arc::new(InMemoryFileRegistry::new()),
            Duration::from_secs(5),
        );

        let outcome = pipeline
            .run(&admin(), Some("  why?  "), InMemoryDocument(Some(("a.txt", "text"))))
            .await
            .unwrap();
        assert_eq!(outcome.answer, "text / why?");
        assert_eq!(outcome.record.filename, "a.txt");
        assert_eq!(outcome.record.uploader, "alice");
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(IngestionStage::Authorizing.to_string(), "authorizing");
        assert_eq!(IngestionStage::Done.as_str(), "done");
    }
}
