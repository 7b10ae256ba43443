//! Renewal alerts over `renovaciones`
//!
//! A policy is alerting when its `VIGENCIA AUTO` falls within the next N
//! days (today inclusive, horizon exclusive).

use serde::Deserialize;
use sqlx::PgPool;

pub const DEFAULT_WINDOW_DAYS: i32 = 30;
const MAX_WINDOW_DAYS: i32 = 365;

#[derive(Debug, Clone, Deserialize)]
pub struct RenewalAlertsQuery {
    pub days: Option<i32>,
}

pub async fn handle(
    db: &PgPool,
    query: RenewalAlertsQuery,
) -> Result<Vec<serde_json::Value>, sqlx::Error> {
    let days = query
        .days
        .unwrap_or(DEFAULT_WINDOW_DAYS)
        .clamp(1, MAX_WINDOW_DAYS);

    sqlx::query_scalar::<_, serde_json::Value>(
        "SELECT to_jsonb(r) FROM renovaciones r \
         WHERE r.\"VIGENCIA AUTO\" >= CURRENT_DATE \
           AND r.\"VIGENCIA AUTO\" < CURRENT_DATE + $1 \
         ORDER BY r.\"VIGENCIA AUTO\" ASC",
    )
    .bind(days)
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_defaults_and_clamps() {
        let query: RenewalAlertsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.days, None);

        let query: RenewalAlertsQuery = serde_json::from_str(r#"{"days":45}"#).unwrap();
        assert_eq!(query.days, Some(45));
    }
}
