use crate::auth::guard::{authorize_registration, registration_requires_caller};
use crate::auth::middleware::parse_bearer;
use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::HeaderMap, Json};
use docqa_core::AppError;
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Token required to register this role", body = ErrorResponse),
        (status = 403, description = "Caller may not register this role", body = ErrorResponse),
        (status = 500, description = "Username already registered or storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(username = %request.username, role = %request.role))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<&'static str, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let caller = if registration_requires_caller(state.open_registration, request.role) {
        match parse_bearer(&headers)? {
            Some(token) => Some(state.tokens.verify(token)?),
            None => None,
        }
    } else {
        None
    };
    authorize_registration(state.open_registration, request.role, caller.as_ref())?;

    state
        .auth
        .register(&request.username, &request.password, request.role)
        .await?;

    Ok("User registered")
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token", body = LoginResponse),
        (status = 400, description = "Unknown user or wrong password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(username = %request.username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpAppError> {
    let token = state
        .auth
        .authenticate(&request.username, &request.password)
        .await?;
    Ok(Json(LoginResponse { token }))
}
