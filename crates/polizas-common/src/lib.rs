//! Shared types and infrastructure for the polizas back-office.
//!
//! Holds the pieces every component needs: the common error taxonomy and
//! the tracing/logging bootstrap. Server-specific concerns (HTTP, storage,
//! ingestion) live in `polizas-server`.

pub mod error;
pub mod logging;

pub use error::{PolizasError, Result};
