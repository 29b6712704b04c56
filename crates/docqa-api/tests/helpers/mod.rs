//! Test helpers: build AppState and router for integration tests.
//!
//! Stores are in-memory and the answer engine is a recording fake, so these
//! tests need neither Postgres nor network access. Run with
//! `cargo test -p docqa-api`.

#![allow(dead_code)]

pub mod auth;
pub mod fakes;
pub mod fixtures;

use axum_test::TestServer;
use docqa_api::auth::{AuthService, TokenService};
use docqa_api::services::IngestionPipeline;
use docqa_api::setup::routes;
use docqa_api::state::AppState;
use docqa_core::models::Role;
use docqa_db::{CredentialStore, FileRegistry, InMemoryCredentialStore, InMemoryFileRegistry};
use docqa_services::AnswerEngine;
use docqa_storage::TransientStorage;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower_http::cors::CorsLayer;

use fakes::{FailingRegistry, RecordingEngine};

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars";
pub const TEST_BCRYPT_COST: u32 = 4;
pub const TEST_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Test application: server plus handles on every injected dependency.
pub struct TestApp {
    pub server: TestServer,
    pub tokens: Arc<TokenService>,
    pub engine: Arc<RecordingEngine>,
    pub registry: Arc<InMemoryFileRegistry>,
    pub users: Arc<InMemoryCredentialStore>,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Mint a token without going through /register and /login.
    pub fn token_for(&self, username: &str, role: Role) -> String {
        self.tokens.issue(username, role).expect("issue token")
    }

    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Number of entries left in the upload directory.
    pub fn transient_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("read upload dir")
            .count()
    }
}

/// Knobs for [`setup_test_app_with`].
pub struct TestOptions {
    pub open_registration: bool,
    pub engine: RecordingEngine,
    /// Replace the registry with one whose upserts always fail
    pub failing_registry: bool,
    pub answer_timeout: Duration,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            open_registration: true,
            engine: RecordingEngine::answering("Paris."),
            failing_registry: false,
            answer_timeout: Duration::from_secs(5),
        }
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let upload_dir = TempDir::new().expect("create upload dir");
    let storage = TransientStorage::new(upload_dir.path())
        .await
        .expect("create transient storage");

    let tokens = Arc::new(TokenService::new(TEST_JWT_SECRET, None).expect("token service"));
    let users = Arc::new(InMemoryCredentialStore::new());
    let registry = Arc::new(InMemoryFileRegistry::new());
    let engine = Arc::new(options.engine);

    let files: Arc<dyn FileRegistry> = if options.failing_registry {
        Arc::new(FailingRegistry::new(registry.clone()))
    } else {
        registry.clone()
    };
    let credentials: Arc<dyn CredentialStore> = users.clone();
    let answer_engine: Arc<dyn AnswerEngine> = engine.clone();

    let state = Arc::new(AppState {
        auth: AuthService::new(credentials, tokens.clone(), TEST_BCRYPT_COST),
        tokens: tokens.clone(),
        files: files.clone(),
        ingestion: IngestionPipeline::new(storage, answer_engine, files, options.answer_timeout),
        open_registration: options.open_registration,
    });

    let router = routes::app_router(state, CorsLayer::permissive(), TEST_MAX_BODY_BYTES);
    let server = TestServer::new(router).expect("start test server");

    TestApp {
        server,
        tokens,
        engine,
        registry,
        users,
        upload_dir,
    }
}
