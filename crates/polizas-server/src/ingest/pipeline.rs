//! The end-to-end ingestion pipeline: parse, validate, normalize, insert.

use tracing::{info, instrument};

use super::batch::{insert_in_batches, RecordSink};
use super::normalize::{normalize_row, NormalizedRecord};
use super::parser::parse_table;
use super::profile::TargetTable;
use super::IngestError;

/// Run the full pipeline for one decoded CSV payload.
///
/// Returns the number of records processed. Any error means zero or more
/// batches may already be persisted (see [`super::batch`]); the caller
/// owns cleanup of the stored raw file.
#[instrument(skip(sink, csv_text), fields(table = %table))]
pub async fn ingest_csv(
    sink: &dyn RecordSink,
    table: TargetTable,
    csv_text: &str,
    batch_size: usize,
) -> Result<usize, IngestError> {
    let parsed = parse_table(csv_text)?;
    let profile = table.profile();

    let missing = profile.missing_columns(&parsed.headers);
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let records: Vec<NormalizedRecord> = parsed
        .rows
        .iter()
        .map(|row| normalize_row(&parsed.headers, row, profile))
        .collect();

    if records.is_empty() {
        return Err(IngestError::NoRecords);
    }

    info!(records = records.len(), batch_size, "Ingesting CSV records");

    insert_in_batches(sink, table, &records, batch_size).await
}
