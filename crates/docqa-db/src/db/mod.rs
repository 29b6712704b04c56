//! Postgres repositories

pub mod file_record;
pub mod user;

pub use file_record::FileRecordRepository;
pub use user::UserRepository;
