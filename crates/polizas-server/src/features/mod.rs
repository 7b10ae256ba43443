//! Feature modules implementing the back-office API
//!
//! Each feature is a vertical slice with its own `commands/`, `queries/`,
//! and `routes.rs`:
//!
//! - **uploads**: CSV upload orchestration (the ingestion boundary) and
//!   the per-user upload history
//! - **policies**: dashboard read side — filterable `auto` listings and
//!   renewal alerts over `renovaciones`

pub mod policies;
pub mod uploads;

use axum::Router;

use crate::config::IngestConfig;
use crate::storage::Storage;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// S3-compatible bucket holding the raw CSV files
    pub storage: Storage,
    /// Ingestion tuning (batch size)
    pub ingest: IngestConfig,
}

/// Creates the main API router with all feature routes mounted
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/upload", uploads::upload_routes().with_state(state.clone()))
        .nest("/uploads", uploads::history_routes().with_state(state.clone()))
        .nest("/autos", policies::autos_routes().with_state(state.db.clone()))
        .nest(
            "/renovaciones",
            policies::renovaciones_routes().with_state(state.db.clone()),
        )
}
