use crate::auth::jwt::TokenService;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use docqa_core::AppError;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

/// Token from an `Authorization: Bearer <token>` header.
///
/// Returns `Ok(None)` when the header is absent.
pub fn parse_bearer(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| {
        AppError::InvalidToken("Authorization header is not valid ASCII".to_string())
    })?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(Some)
        .ok_or_else(|| AppError::InvalidToken("Invalid authorization header format".to_string()))
}

/// Verify the bearer token and attach the caller's [`AuthContext`](crate::auth::AuthContext).
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match parse_bearer(request.headers()) {
        Ok(Some(token)) => token,
        Ok(None) => {
            return HttpAppError(AppError::MissingToken(
                "Access Denied: No token provided".to_string(),
            ))
            .into_response();
        }
        Err(e) => return HttpAppError(e).into_response(),
    };

    match tokens.verify(token) {
        Ok(ctx) => {
            tracing::debug!(username = %ctx.username, role = %ctx.role, "Request authenticated");
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_bearer(&headers).unwrap(), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(parse_bearer(&headers).unwrap(), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(matches!(
            parse_bearer(&headers),
            Err(AppError::InvalidToken(_))
        ));
    }
}
