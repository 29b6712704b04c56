use std::sync::Arc;

use docqa_db::FileRegistry;

use crate::auth::jwt::TokenService;
use crate::auth::service::AuthService;
use crate::services::ingestion::IngestionPipeline;

/// Process-wide dependencies shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tokens: Arc<TokenService>,
    pub files: Arc<dyn FileRegistry>,
    pub ingestion: IngestionPipeline,
    /// When false, only `Worker` accounts may self-register
    pub open_registration: bool,
}
