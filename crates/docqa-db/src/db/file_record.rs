use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docqa_core::models::FileRecord;
use docqa_core::AppError;
use sqlx::{FromRow, PgPool, Postgres};

use crate::store_traits::FileRegistry;

#[derive(Debug, Clone, FromRow)]
struct FileRecordRow {
    file_name: String,
    uploader: String,
    uploaded_at: DateTime<Utc>,
}

impl From<FileRecordRow> for FileRecord {
    fn from(row: FileRecordRow) -> Self {
        FileRecord {
            filename: row.file_name,
            uploader: row.uploader,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(Clone)]
pub struct FileRecordRepository {
    pool: PgPool,
}

impl FileRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRegistry for FileRecordRepository {
    #[tracing::instrument(skip(self), fields(db.table = "file_records", db.operation = "upsert"))]
    async fn upsert(&self, filename: &str, uploader: &str) -> Result<FileRecord, AppError> {
        let row = sqlx::query_as::<Postgres, FileRecordRow>(
            r#"
            INSERT INTO file_records (file_name, uploader, uploaded_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (file_name, uploader)
            DO UPDATE SET uploaded_at = EXCLUDED.uploaded_at
            RETURNING file_name, uploader, uploaded_at
            "#,
        )
        .bind(filename)
        .bind(uploader)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to upsert file record");
            AppError::Database(e)
        })?;

        tracing::info!(
            file_name = %row.file_name,
            uploader = %row.uploader,
            uploaded_at = %row.uploaded_at,
            "File record upserted"
        );

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_records", db.operation = "delete"))]
    async fn delete(
        &self,
        filename: &str,
        uploader: Option<&str>,
    ) -> Result<FileRecord, AppError> {
        let row = sqlx::query_as::<Postgres, FileRecordRow>(
            r#"
            DELETE FROM file_records
            WHERE id = (
                SELECT id FROM file_records
                WHERE file_name = $1
                  AND ($2::TEXT IS NULL OR uploader = $2)
                ORDER BY id
                LIMIT 1
            )
            RETURNING file_name, uploader, uploaded_at
            "#,
        )
        .bind(filename)
        .bind(uploader)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to delete file record");
            AppError::Database(e)
        })?;

        match row {
            Some(row) => {
                tracing::info!(file_name = %row.file_name, uploader = %row.uploader, "File record deleted");
                Ok(row.into())
            }
            None => Err(AppError::NotFound("File not found".to_string())),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_records", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<FileRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, FileRecordRow>(
            r#"
            SELECT file_name, uploader, uploaded_at
            FROM file_records
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list file records");
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(FileRecord::from).collect())
    }
}
