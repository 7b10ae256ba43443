//! HTTP routes for CSV uploads and upload history
//!
//! Multipart contract (fixed by the dashboard frontend): `file`,
//! `userEmail`, `userRole`. Non-POST methods on the upload routes get the
//! router's 405.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::commands::{self, UploadCsvCommand, UploadCsvError};
use super::queries::{self, ListUploadsQuery};
use crate::api::response::{error_body, UploadSuccess};
use crate::features::FeatureState;
use crate::ingest::TargetTable;

pub fn upload_routes() -> Router<FeatureState> {
    Router::new()
        .route("/renovaciones", post(upload_renovaciones))
        .route("/validaciones", post(upload_validaciones))
}

pub fn history_routes() -> Router<FeatureState> {
    Router::new().route("/", get(list_uploads))
}

#[tracing::instrument(skip(state, multipart))]
async fn upload_renovaciones(
    State(state): State<FeatureState>,
    multipart: Multipart,
) -> Response {
    process_upload(
        state,
        TargetTable::Renovaciones,
        "Renovaciones file uploaded and processed successfully",
        multipart,
    )
    .await
}

#[tracing::instrument(skip(state, multipart))]
async fn upload_validaciones(
    State(state): State<FeatureState>,
    multipart: Multipart,
) -> Response {
    process_upload(
        state,
        TargetTable::Validaciones,
        "File uploaded and processed successfully",
        multipart,
    )
    .await
}

async fn process_upload(
    state: FeatureState,
    table: TargetTable,
    success_message: &str,
    mut multipart: Multipart,
) -> Response {
    let mut filename = String::new();
    let mut content: Vec<u8> = Vec::new();
    let mut user_email = String::new();
    let mut user_role = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart field");
                return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            },
        };

        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                filename = field.file_name().unwrap_or("").to_string();
                match field.bytes().await {
                    Ok(bytes) => content = bytes.to_vec(),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read file bytes");
                        return error_body(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "Internal server error",
                        );
                    },
                }
            },
            "userEmail" => user_email = field.text().await.unwrap_or_default(),
            "userRole" => user_role = field.text().await.unwrap_or_default(),
            _ => {},
        }
    }

    let command = UploadCsvCommand {
        table,
        filename,
        content,
        user_email,
        user_role,
    };

    match commands::upload::handle(&state.db, &state.storage, &state.ingest, command).await {
        Ok(response) => {
            tracing::info!(
                file_name = %response.file_name,
                records = response.records_processed,
                "CSV uploaded and ingested"
            );
            UploadSuccess::new(
                success_message,
                response.file_name,
                response.records_processed,
                response.file_url,
            )
            .into_response()
        },
        Err(err) => upload_error_response(err),
    }
}

fn upload_error_response(err: UploadCsvError) -> Response {
    match &err {
        UploadCsvError::FileRequired
        | UploadCsvError::EmailRequired
        | UploadCsvError::RoleRequired
        | UploadCsvError::InvalidExtension
        | UploadCsvError::Ingest(_) => error_body(StatusCode::BAD_REQUEST, err.to_string()),
        UploadCsvError::Storage(source) => {
            tracing::error!(error = %source, "Storage error during CSV upload");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to upload file to storage",
            )
        },
    }
}

#[tracing::instrument(skip(state))]
async fn list_uploads(
    State(state): State<FeatureState>,
    Query(query): Query<ListUploadsQuery>,
) -> Response {
    if query.user_email.trim().is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "User email is required");
    }

    match queries::list_uploads::handle(&state.storage, query).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "uploads": entries }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list uploads");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list uploads")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::IngestError;

    #[test]
    fn test_validation_errors_map_to_400() {
        let response = upload_error_response(UploadCsvError::FileRequired);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = upload_error_response(UploadCsvError::InvalidExtension);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_ingest_errors_map_to_400() {
        let err = UploadCsvError::Ingest(IngestError::MissingColumns(vec![
            "SOLICITUD".to_string(),
        ]));
        let response = upload_error_response(err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_errors_map_to_500() {
        let err = UploadCsvError::Storage(anyhow::anyhow!("bucket unavailable"));
        let response = upload_error_response(err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
