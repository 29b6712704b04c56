//! Data models for the application

mod file_record;
mod role;
mod user;

pub use file_record::FileRecord;
pub use role::{ParseRoleError, Role};
pub use user::User;
