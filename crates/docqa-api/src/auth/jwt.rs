//! HS256 session tokens.
//!
//! Tokens carry `{ sub, role, iat, exp? }`. `exp` is only written when an expiry is
//! configured; when present it is enforced on verification.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use docqa_core::models::Role;
use docqa_core::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::models::AuthContext;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username
    pub sub: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp), absent for non-expiring tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Option<Duration>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl TokenService {
    /// Fails when `expiry_hours` is not a positive, representable duration.
    pub fn new(secret: &str, expiry_hours: Option<i64>) -> Result<Self, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;

        let expiry = expiry_hours
            .map(|hours| {
                Duration::try_hours(hours)
                    .filter(|expiry| *expiry > Duration::zero())
                    .ok_or_else(|| {
                        AppError::Internal(format!("Token expiry of {} hours is out of range", hours))
                    })
            })
            .transpose()?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry,
        })
    }

    /// Mint a token for `username` with `role`.
    pub fn issue(&self, username: &str, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: self
                .expiry
                .map(|expiry| {
                    now.checked_add_signed(expiry)
                        .map(|exp| exp.timestamp())
                        .ok_or_else(|| AppError::Internal("Token expiry overflowed".to_string()))
                })
                .transpose()?,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    /// Check signature and structure and return the caller identity.
    pub fn verify(&self, token: &str) -> Result<AuthContext, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::MissingToken(
                "Access Denied: No token provided".to_string(),
            ));
        }

        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AppError::InvalidToken(e.to_string())
            })?;

        Ok(AuthContext {
            username: data.claims.sub,
            role: data.claims.role,
        })
    }
}
