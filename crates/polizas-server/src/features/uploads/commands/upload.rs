//! The upload orchestrator
//!
//! Owns the raw upload and the stored-file side effect: validates the
//! request, writes the file to the bucket optimistically, runs the
//! ingestion pipeline, and deletes the stored object if ingestion fails.
//! The two failure domains are NOT kept consistent: cleanup covers the
//! file, never the already-committed batches.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;

use crate::config::IngestConfig;
use crate::ingest::{ingest_csv, IngestError, PgRecordSink, TargetTable};
use crate::storage::{build_object_key, Storage};

#[derive(Debug, Clone)]
pub struct UploadCsvCommand {
    pub table: TargetTable,
    pub filename: String,
    pub content: Vec<u8>,
    pub user_email: String,
    pub user_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadCsvResponse {
    pub file_name: String,
    pub records_processed: usize,
    pub file_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadCsvError {
    #[error("No file provided")]
    FileRequired,
    #[error("User email is required")]
    EmailRequired,
    #[error("User role is required")]
    RoleRequired,
    #[error("Only CSV files are allowed")]
    InvalidExtension,
    #[error("Failed to upload file to storage")]
    Storage(#[source] anyhow::Error),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl UploadCsvCommand {
    /// Fail-fast validation, in contract order: file, email, role,
    /// extension. An empty file passes here: it is stored, then rejected
    /// by the pipeline as an empty CSV, then deleted again.
    pub fn validate(&self) -> Result<(), UploadCsvError> {
        if self.filename.is_empty() {
            return Err(UploadCsvError::FileRequired);
        }
        if self.user_email.trim().is_empty() {
            return Err(UploadCsvError::EmailRequired);
        }
        if self.user_role.trim().is_empty() {
            return Err(UploadCsvError::RoleRequired);
        }
        if !self.filename.to_lowercase().ends_with(".csv") {
            return Err(UploadCsvError::InvalidExtension);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(db, storage, config, command), fields(table = %command.table, filename = %command.filename))]
pub async fn handle(
    db: &PgPool,
    storage: &Storage,
    config: &IngestConfig,
    command: UploadCsvCommand,
) -> Result<UploadCsvResponse, UploadCsvError> {
    command.validate()?;

    let key = build_object_key(
        command.table.key_prefix(),
        &command.user_email,
        &command.filename,
        Utc::now(),
    );

    // Decode before the content moves into the storage request. The legacy
    // importer decoded lossily as well; a stray invalid byte must not fail
    // the whole file.
    let csv_text = String::from_utf8_lossy(&command.content).into_owned();

    storage
        .upload(&key, command.content, Some("text/csv".to_string()))
        .await
        .map_err(UploadCsvError::Storage)?;

    let sink = PgRecordSink::new(db.clone());
    match ingest_csv(&sink, command.table, &csv_text, config.batch_size).await {
        Ok(records_processed) => Ok(UploadCsvResponse {
            file_name: key.clone(),
            records_processed,
            file_url: key,
        }),
        Err(err) => {
            // Best-effort cleanup of the stored file; a deletion failure is
            // logged but never escalated over the ingestion error.
            if let Err(delete_err) = storage.delete(&key).await {
                warn!(
                    key = %key,
                    error = %delete_err,
                    "Failed to delete stored file after ingestion failure"
                );
            }
            Err(err.into())
        },
    }
}
