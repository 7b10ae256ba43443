//! Batched record insertion
//!
//! Records go to the store in fixed-size batches, sequentially; the first
//! failed batch aborts the run. Prior batches are NOT rolled back — a
//! failed ingestion may leave rows behind, and the caller's cleanup only
//! covers the stored raw file.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use super::normalize::NormalizedRecord;
use super::profile::TargetTable;
use super::IngestError;

/// Error detail from a sink's failed batch insert.
#[derive(Debug, Error)]
#[error("{detail}")]
pub struct SinkError {
    pub detail: String,
}

impl SinkError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Destination for normalized records. The PostgreSQL implementation is
/// [`PgRecordSink`]; tests substitute their own.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn insert_batch(
        &self,
        table: TargetTable,
        batch: &[NormalizedRecord],
    ) -> Result<(), SinkError>;
}

/// Insert `records` into `table` through `sink`, `batch_size` at a time.
///
/// Returns the total record count on success. On the first failing batch,
/// returns [`IngestError::Insert`] naming the 1-based batch and carrying
/// the sink's detail; remaining batches are not attempted.
pub async fn insert_in_batches(
    sink: &dyn RecordSink,
    table: TargetTable,
    records: &[NormalizedRecord],
    batch_size: usize,
) -> Result<usize, IngestError> {
    let total_batches = records.len().div_ceil(batch_size);

    for (index, batch) in records.chunks(batch_size).enumerate() {
        debug!(
            table = %table,
            batch = index + 1,
            total_batches,
            rows = batch.len(),
            "Inserting batch"
        );

        sink.insert_batch(table, batch)
            .await
            .map_err(|e| IngestError::Insert {
                batch: index + 1,
                detail: e.detail,
            })?;
    }

    Ok(records.len())
}

/// PostgreSQL-backed record sink.
///
/// Records are bound as one jsonb array and expanded server-side with
/// `jsonb_populate_recordset`, the same expansion the legacy store's REST
/// layer performed for batch inserts. Only the columns present in the
/// records are named, so table defaults still apply to the rest.
pub struct PgRecordSink {
    pool: PgPool,
}

impl PgRecordSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordSink for PgRecordSink {
    async fn insert_batch(
        &self,
        table: TargetTable,
        batch: &[NormalizedRecord],
    ) -> Result<(), SinkError> {
        let Some(first) = batch.first() else {
            return Ok(());
        };

        let columns = first
            .keys()
            .map(|name| quote_ident(name))
            .collect::<Vec<_>>()
            .join(", ");

        let payload =
            serde_json::to_value(batch).map_err(|e| SinkError::new(e.to_string()))?;

        let sql = format!(
            "INSERT INTO {table} ({columns}) SELECT {columns} \
             FROM jsonb_populate_recordset(NULL::{table}, $1)",
            table = table.table_name(),
            columns = columns,
        );

        sqlx::query(&sql)
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(|e| SinkError::new(e.to_string()))?;

        Ok(())
    }
}

/// Quote a CSV header as a SQL identifier.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
