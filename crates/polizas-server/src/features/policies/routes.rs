//! HTTP routes for the dashboard read side

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;

use super::queries::{
    list_autos::{self, ListAutosQuery},
    renewal_alerts::{self, RenewalAlertsQuery},
};
use crate::error::AppError;

pub fn autos_routes() -> Router<PgPool> {
    Router::new().route("/", get(list_autos_handler))
}

pub fn renovaciones_routes() -> Router<PgPool> {
    Router::new().route("/alerts", get(renewal_alerts_handler))
}

#[tracing::instrument(skip(db))]
async fn list_autos_handler(
    State(db): State<PgPool>,
    Query(query): Query<ListAutosQuery>,
) -> Result<Response, AppError> {
    let rows = list_autos::handle(&db, query).await?;
    Ok(Json(json!({ "autos": rows })).into_response())
}

#[tracing::instrument(skip(db))]
async fn renewal_alerts_handler(
    State(db): State<PgPool>,
    Query(query): Query<RenewalAlertsQuery>,
) -> Result<Response, AppError> {
    let rows = renewal_alerts::handle(&db, query).await?;
    Ok(Json(json!({ "alerts": rows })).into_response())
}
