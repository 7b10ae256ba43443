//! Polizas back-office server.
//!
//! HTTP service behind the insurance-policy dashboard:
//!
//! - **CSV ingestion**: multipart uploads are written verbatim to
//!   S3-compatible object storage, parsed, normalized per destination
//!   table, and batch-inserted into PostgreSQL. A failed ingestion deletes
//!   the stored object (already-committed batches are not rolled back).
//! - **Dashboard queries**: filterable `auto` policy listings, renewal
//!   alerts over `renovaciones`, and per-user upload history.
//!
//! # Architecture
//!
//! Feature slices live under [`features`], each with its own `commands/`,
//! `queries/`, and `routes.rs`. The ingestion pipeline itself is in
//! [`ingest`] and is parameterized by a [`ingest::TableProfile`] so the
//! three destination tables share one tokenizer/parser/normalizer/ingestor
//! path.
//!
//! # Framework Stack
//!
//! - **Axum** for routing and multipart extraction
//! - **SQLx** for PostgreSQL access
//! - **aws-sdk-s3** for the raw-file bucket (MinIO-friendly)
//! - **Tower / tower-http** for CORS, compression, and request tracing

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;
pub mod storage;

// Re-export commonly used types
pub use error::{AppError, AppResult};
