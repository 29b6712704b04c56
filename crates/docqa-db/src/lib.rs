//! docqa database layer
//!
//! Persistence for user credentials and file records. Each store is exposed as a
//! trait with a Postgres repository for production and an in-memory implementation
//! for tests and local experiments.

pub mod db;
pub mod memory;
pub mod store_traits;

pub use db::{FileRecordRepository, UserRepository};
pub use memory::{InMemoryCredentialStore, InMemoryFileRegistry};
pub use store_traits::{CredentialStore, FileRegistry};
