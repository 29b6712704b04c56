//! Per-request upload files.
//!
//! A [`TransientFile`] is created under the storage root with a unique name, filled
//! chunk by chunk, read back once for extraction and then released. Release is
//! explicit on every normal exit path; the `Drop` impl removes the file when the
//! owning request future is dropped before reaching it.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// Name prefix of every transient file, matching the multipart field it came from.
const FILE_PREFIX: &str = "document-";
const MAX_EXTENSION_LEN: usize = 16;

/// Root directory for transient uploads.
#[derive(Clone, Debug)]
pub struct TransientStorage {
    root: PathBuf,
}

impl TransientStorage {
    /// Create the storage, making sure the root directory exists.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(TransientStorage { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate a fresh, empty file for an upload named `original_filename`.
    ///
    /// The on-disk name is `document-<unix-millis>-<uuid>[.<ext>]`; only the
    /// extension of the client-supplied name is kept, and only when it is a short
    /// alphanumeric token.
    pub async fn create(&self, original_filename: &str) -> StorageResult<TransientFile> {
        let name = match safe_extension(original_filename) {
            Some(ext) => format!(
                "{}{}-{}.{}",
                FILE_PREFIX,
                Utc::now().timestamp_millis(),
                Uuid::new_v4(),
                ext
            ),
            None => format!(
                "{}{}-{}",
                FILE_PREFIX,
                Utc::now().timestamp_millis(),
                Uuid::new_v4()
            ),
        };
        let path = self.root.join(name);

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        tracing::debug!(path = %path.display(), original_filename, "Transient file created");

        Ok(TransientFile {
            path,
            original_filename: original_filename.to_string(),
            writer: Some(file),
            size_bytes: 0,
            released: false,
        })
    }

    /// Remove transient files left behind by a previous process.
    ///
    /// Returns the number of files removed.
    pub async fn sweep_orphans(&self) -> StorageResult<usize> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let is_transient = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(FILE_PREFIX));
            if !is_transient || !entry.file_type().await?.is_file() {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::IoError(e)),
            }
        }

        if removed > 0 {
            tracing::warn!(
                root = %self.root.display(),
                removed,
                "Removed orphaned transient uploads"
            );
        }

        Ok(removed)
    }
}

fn safe_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// An upload materialized on disk for the duration of one request.
#[derive(Debug)]
pub struct TransientFile {
    path: PathBuf,
    original_filename: String,
    writer: Option<fs::File>,
    size_bytes: u64,
    released: bool,
}

impl TransientFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename as supplied by the client.
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Append a chunk of the upload.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StorageResult<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            StorageError::WriteFailed(format!("{} is already finished", self.path.display()))
        })?;
        writer.write_all(chunk).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        self.size_bytes += chunk.len() as u64;
        Ok(())
    }

    /// Flush and close the writer. Further writes fail.
    pub async fn finish(&mut self) -> StorageResult<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to flush file {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
            writer.sync_all().await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to sync file {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Read the whole file back.
    pub async fn read_all(&self) -> StorageResult<Vec<u8>> {
        fs::read(&self.path).await.map_err(|e| {
            StorageError::ReadFailed(format!(
                "Failed to read file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Delete the file. A file that is already gone is logged and ignored.
    pub async fn release(mut self) {
        self.released = true;
        // Close the handle first so removal also works on platforms that lock open files.
        drop(self.writer.take());

        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Transient file released");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "Transient file already removed");
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to release transient file"
                );
            }
        }
    }
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        drop(self.writer.take());
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Transient file removed on drop without explicit release"
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove transient file on drop"
                );
            }
        }
    }
}
