//! CSV ingestion pipeline
//!
//! One generic pipeline handles every destination table:
//!
//! 1. [`tokenizer`] splits a raw line into fields, quote-aware
//! 2. [`parser`] turns the full text into headers + reconciled rows
//! 3. [`normalize`] maps each row to a record per the table's
//!    [`TableProfile`] (null literals, numeric coercion, required columns)
//! 4. [`batch`] inserts records into PostgreSQL in fixed-size batches,
//!    aborting on the first failed batch
//!
//! The pipeline is deliberately forgiving about row shape (rows are padded
//! or truncated to the header count, never rejected) and deliberately
//! strict about nothing else the legacy importer wasn't strict about.

pub mod batch;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod profile;
pub mod tokenizer;

pub use batch::{PgRecordSink, RecordSink, SinkError};
pub use normalize::{FieldValue, NormalizedRecord};
pub use parser::ParsedTable;
pub use pipeline::ingest_csv;
pub use profile::{TableProfile, TargetTable};

use thiserror::Error;

/// Failures the ingestion pipeline can surface.
///
/// Everything here maps to a 400 at the HTTP boundary; already-inserted
/// batches are not rolled back, so callers must treat an [`IngestError`]
/// as "zero or more records may already be persisted".
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV file must have at least header and one data row")]
    EmptyInput,

    #[error("CSV must contain the following required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No valid records found in CSV file")]
    NoRecords,

    #[error("Failed to insert records (batch {batch}): {detail}")]
    Insert { batch: usize, detail: String },
}
