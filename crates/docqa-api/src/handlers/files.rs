use crate::auth::guard::{authorize, Operation};
use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use docqa_core::models::FileRecord;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteFileQuery {
    /// Only delete the record uploaded by this user
    pub uploader: Option<String>,
}

#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "All file records", body = Vec<FileRecord>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role may not list files", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(username = %caller.username))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    caller: AuthContext,
) -> Result<Json<Vec<FileRecord>>, HttpAppError> {
    authorize(caller.role, Operation::ListFiles)?;
    let records = state.files.list().await?;
    Ok(Json(records))
}

#[utoipa::path(
    delete,
    path = "/files/{file_name}",
    tag = "files",
    params(
        ("file_name" = String, Path, description = "Filename of the record to delete"),
        DeleteFileQuery
    ),
    responses(
        (status = 200, description = "File deleted", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role may not delete files", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(username = %caller.username, file_name = %file_name))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    caller: AuthContext,
    Path(file_name): Path<String>,
    Query(query): Query<DeleteFileQuery>,
) -> Result<&'static str, HttpAppError> {
    authorize(caller.role, Operation::DeleteFile)?;
    let removed = state
        .files
        .delete(&file_name, query.uploader.as_deref())
        .await?;
    tracing::info!(filename = %removed.filename, uploader = %removed.uploader, "File record deleted");
    Ok("File deleted")
}
