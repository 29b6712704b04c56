//! Registration and login.

use std::sync::Arc;

use docqa_core::models::{Role, User};
use docqa_core::AppError;
use docqa_db::CredentialStore;

use crate::auth::jwt::TokenService;

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }

    /// Store a new user with a bcrypt hash of `password`.
    #[tracing::instrument(skip(self, password), fields(role = %role))]
    pub async fn register(&self, username: &str, password: &str, role: Role) -> Result<(), AppError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

        self.store
            .insert_user(User {
                username: username.to_string(),
                password_hash,
                role,
            })
            .await?;

        tracing::debug!(username = %username, "Registration complete");
        Ok(())
    }

    /// Check `password` against the stored hash and mint a session token.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .store
            .find_user(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        let password = password.to_string();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Stored password hash could not be verified");
                false
            });

        if !matches {
            return Err(AppError::InvalidCredentials(username.to_string()));
        }

        let token = self.tokens.issue(&user.username, user.role)?;
        tracing::info!(username = %user.username, role = %user.role, "User logged in");
        Ok(token)
    }
}
