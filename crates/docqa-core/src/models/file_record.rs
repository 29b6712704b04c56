use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Metadata kept for every document that was successfully answered.
///
/// At most one record exists per `(filename, uploader)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileRecord {
    pub filename: String,
    pub uploader: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(filename: impl Into<String>, uploader: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            uploader: uploader.into(),
            uploaded_at: Utc::now(),
        }
    }
}
