//! In-memory store implementations for tests and local runs without Postgres.
//!
//! Each store keeps its data behind a `std::sync::RwLock`. Every operation takes the
//! lock once, so an upsert is a single critical section just like the
//! `ON CONFLICT` statement in Postgres.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use docqa_core::models::{FileRecord, User};
use docqa_core::AppError;

use crate::store_traits::{CredentialStore, FileRegistry};

fn poisoned(store: &str) -> AppError {
    AppError::Registry(format!("{} lock poisoned", store))
}

/// In-memory credential store keyed by username.
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert_user(&self, user: User) -> Result<(), AppError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| poisoned("credential store"))?;
        if users.contains_key(&user.username) {
            return Err(AppError::Duplicate(
                "Username already registered".to_string(),
            ));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self
            .users
            .read()
            .map_err(|_| poisoned("credential store"))?;
        Ok(users.get(username).cloned())
    }
}

/// In-memory file registry. Records are kept in insertion order, so the first
/// match is always the oldest.
pub struct InMemoryFileRegistry {
    records: RwLock<Vec<FileRecord>>,
}

impl InMemoryFileRegistry {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<FileRecord>>, AppError> {
        self.records.read().map_err(|_| poisoned("file registry"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<FileRecord>>, AppError> {
        self.records.write().map_err(|_| poisoned("file registry"))
    }
}

impl Default for InMemoryFileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileRegistry for InMemoryFileRegistry {
    async fn upsert(&self, filename: &str, uploader: &str) -> Result<FileRecord, AppError> {
        let mut records = self.write()?;
        let now = Utc::now();

        if let Some(existing) = records
            .iter_mut()
            .find(|r| r.filename == filename && r.uploader == uploader)
        {
            existing.uploaded_at = now;
            return Ok(existing.clone());
        }

        let record = FileRecord {
            filename: filename.to_string(),
            uploader: uploader.to_string(),
            uploaded_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn delete(
        &self,
        filename: &str,
        uploader: Option<&str>,
    ) -> Result<FileRecord, AppError> {
        let mut records = self.write()?;
        let position = records
            .iter()
            .position(|r| r.filename == filename && uploader.map_or(true, |u| r.uploader == u));

        match position {
            Some(index) => Ok(records.remove(index)),
            None => Err(AppError::NotFound("File not found".to_string())),
        }
    }

    async fn list(&self) -> Result<Vec<FileRecord>, AppError> {
        Ok(self.read()?.clone())
    }
}
