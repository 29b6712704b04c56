//! Service and repository wiring

use anyhow::{Context, Result};
use docqa_core::Config;
use docqa_db::{FileRecordRepository, UserRepository};
use docqa_services::{GeminiAnswerEngine, GeminiConfig};
use docqa_storage::TransientStorage;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::jwt::TokenService;
use crate::auth::service::AuthService;
use crate::services::ingestion::IngestionPipeline;
use crate::state::AppState;

pub async fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let tokens = Arc::new(
        TokenService::new(config.jwt_secret(), config.jwt_expiry_hours())
            .context("Failed to initialize token service")?,
    );

    let users = Arc::new(UserRepository::new(pool.clone()));
    let files = Arc::new(FileRecordRepository::new(pool));

    let storage = TransientStorage::new(config.upload_dir())
        .await
        .context("Failed to initialize upload directory")?;
    // Uploads from a process that crashed mid-request
    match storage.sweep_orphans().await {
        Ok(removed) => tracing::debug!(removed, "Upload directory swept"),
        Err(e) => tracing::warn!(error = %e, "Failed to sweep upload directory"),
    }

    let engine = Arc::new(
        GeminiAnswerEngine::new(GeminiConfig {
            api_key: config.gemini_api_key().to_string(),
            model: config.gemini_model().to_string(),
            base_url: config.gemini_api_base().to_string(),
        })
        .context("Failed to initialize Gemini client")?,
    );

    tracing::info!(
        model = %config.gemini_model(),
        upload_dir = %storage.root().display(),
        answer_timeout_secs = config.answer_timeout_secs(),
        open_registration = config.open_registration(),
        "Services initialized"
    );

    let ingestion = IngestionPipeline::new(
        storage,
        engine,
        files.clone(),
        Duration::from_secs(config.answer_timeout_secs()),
    );

    Ok(Arc::new(AppState {
        auth: AuthService::new(users, tokens.clone(), config.bcrypt_cost()),
        tokens,
        files,
        ingestion,
        open_registration: config.open_registration(),
    }))
}
