//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::auth::models;
use crate::error;
use crate::handlers;
use docqa_core::models::{FileRecord, Role};

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "docqa API",
        version = "0.1.0",
        description = "Upload a text or PDF document, ask a question about it and get an AI-generated answer. Uploads are tracked per user and access is role based."
    ),
    paths(
        handlers::health::health,
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        // Documents
        handlers::upload::upload_document,
        // Files
        handlers::files::list_files,
        handlers::files::delete_file,
    ),
    components(
        schemas(
            Role,
            FileRecord,
            models::RegisterRequest,
            models::LoginRequest,
            models::LoginResponse,
            handlers::upload::UploadResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration and login"),
        (name = "documents", description = "Document upload and question answering"),
        (name = "files", description = "Uploaded file records")
    )
)]
pub struct ApiDoc;
