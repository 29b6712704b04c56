//! Store abstractions injected into the API layer.
//!
//! Handlers and the ingestion pipeline only see these traits, so tests can swap
//! the Postgres repositories for the in-memory stores.

use async_trait::async_trait;
use docqa_core::models::{FileRecord, User};
use docqa_core::AppError;

/// Durable mapping from username to credential and role.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user. Fails with `AppError::Duplicate` if the username exists.
    async fn insert_user(&self, user: User) -> Result<(), AppError>;

    /// Look up a user by username.
    async fn find_user(&self, username: &str) -> Result<Option<User>, AppError>;
}

/// Keyed store of `(filename, uploader)` records.
#[async_trait]
pub trait FileRegistry: Send + Sync {
    /// Insert the record or refresh its timestamp if the pair already exists.
    /// Atomic with respect to concurrent upserts of the same pair.
    async fn upsert(&self, filename: &str, uploader: &str) -> Result<FileRecord, AppError>;

    /// Remove exactly one record matching `filename` (and `uploader` when given),
    /// choosing the oldest. Fails with `AppError::NotFound` when nothing matches.
    async fn delete(&self, filename: &str, uploader: Option<&str>)
        -> Result<FileRecord, AppError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<FileRecord>, AppError>;
}
