use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload_source::MultipartUpload;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Question to answer from the uploaded document
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub answer: String,
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "documents",
    params(UploadQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Field `document`: a .txt or .pdf file"),
    responses(
        (status = 200, description = "Answer generated", body = UploadResponse),
        (status = 400, description = "Missing file or question, unsupported or unreadable document", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role may not upload", body = ErrorResponse),
        (status = 500, description = "Answering or registry failure", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    caller: AuthContext,
    Query(query): Query<UploadQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    // A non-multipart body is reported as a missing file, after the role check.
    let source = MultipartUpload(multipart.ok());

    let outcome = state
        .ingestion
        .run(&caller, query.question.as_deref(), source)
        .await?;

    Ok(Json(UploadResponse {
        answer: outcome.answer,
    }))
}
