//! Where the uploaded document comes from.
//!
//! The pipeline only pulls bytes out of a source after the caller has been
//! authorized, so an unread multipart body is never written to disk for a denied
//! request.

use async_trait::async_trait;
use axum::extract::Multipart;
use docqa_core::AppError;
use docqa_storage::{TransientFile, TransientStorage};

use crate::constants::UPLOAD_FIELD_NAME;
use crate::error::storage_error;

#[async_trait]
pub trait UploadSource: Send {
    /// Write the document into a fresh transient file.
    ///
    /// Returns `Ok(None)` when the request carries no document.
    async fn materialize(
        &mut self,
        storage: &TransientStorage,
    ) -> Result<Option<TransientFile>, AppError>;
}

/// Unread multipart body. `None` when the request was not multipart at all.
pub struct MultipartUpload(pub Option<Multipart>);

#[async_trait]
impl UploadSource for MultipartUpload {
    async fn materialize(
        &mut self,
        storage: &TransientStorage,
    ) -> Result<Option<TransientFile>, AppError> {
        let Some(multipart) = self.0.as_mut() else {
            return Ok(None);
        };

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
        {
            if field.name() != Some(UPLOAD_FIELD_NAME) {
                continue;
            }

            let original_filename = field.file_name().unwrap_or_default().to_string();
            let mut file = storage.create(&original_filename).await.map_err(storage_error)?;

            // On error the half-written file is removed when `file` drops.
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?
            {
                file.write_chunk(&chunk).await.map_err(storage_error)?;
            }
            file.finish().await.map_err(storage_error)?;

            return Ok(Some(file));
        }

        Ok(None)
    }
}
