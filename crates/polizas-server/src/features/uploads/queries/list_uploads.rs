//! Per-user upload history
//!
//! The history is derived from the bucket itself rather than kept in
//! memory: object keys embed the destination table and the uploader's
//! email local part, so listing by prefix recovers the caller's uploads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::ingest::TargetTable;
use crate::storage::Storage;

const MAX_HISTORY_KEYS: i32 = 200;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUploadsQuery {
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadHistoryEntry {
    pub table: String,
    pub key: String,
}

pub async fn handle(
    storage: &Storage,
    query: ListUploadsQuery,
) -> Result<Vec<UploadHistoryEntry>> {
    let user_identifier = query
        .user_email
        .split('@')
        .next()
        .unwrap_or(query.user_email.as_str());

    let tables = [
        TargetTable::Auto,
        TargetTable::Renovaciones,
        TargetTable::Validaciones,
    ];

    let mut entries = Vec::new();
    for table in tables {
        let prefix = format!("{}_{}_", table.key_prefix(), user_identifier);
        let keys = storage.list(&prefix, Some(MAX_HISTORY_KEYS)).await?;
        entries.extend(keys.into_iter().map(|key| UploadHistoryEntry {
            table: table.table_name().to_string(),
            key,
        }));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_serialization() {
        let entry = UploadHistoryEntry {
            table: "renovaciones".to_string(),
            key: "renovaciones_ana_2026-01-15T10-30-45-000Z_enero.csv".to_string(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["table"], "renovaciones");
        assert!(value["key"].as_str().unwrap().starts_with("renovaciones_ana_"));
    }
}
