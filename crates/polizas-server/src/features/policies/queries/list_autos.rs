//! Filterable `auto` policy listing
//!
//! Rows come back as whole-row JSON (`to_jsonb`) because the table's
//! column set mirrors whatever the CSV loads carried; the dashboard
//! renders the columns it finds. The free-text search matches anywhere in
//! the row, which is what the dashboard's client-side search did.

use serde::Deserialize;
use sqlx::PgPool;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Clone, Deserialize)]
pub struct ListAutosQuery {
    /// Exact CLASIFICACION match; alianza users see only their alianza.
    pub classification: Option<String>,
    /// Case-insensitive substring match across the whole row.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn handle(
    db: &PgPool,
    query: ListAutosQuery,
) -> Result<Vec<serde_json::Value>, sqlx::Error> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let mut sql = String::from("SELECT to_jsonb(a) FROM auto a");
    let mut conditions: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if let Some(classification) = query.classification.filter(|c| !c.trim().is_empty()) {
        binds.push(classification);
        conditions.push(format!("a.\"CLASIFICACION\" = ${}", binds.len()));
    }

    if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
        binds.push(format!("%{}%", search));
        conditions.push(format!("to_jsonb(a)::text ILIKE ${}", binds.len()));
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(&format!(
        " ORDER BY a.\"FECHA\" DESC NULLS LAST LIMIT {} OFFSET {}",
        limit, offset
    ));

    let mut statement = sqlx::query_scalar::<_, serde_json::Value>(&sql);
    for bind in binds {
        statement = statement.bind(bind);
    }

    statement.fetch_all(db).await
}
