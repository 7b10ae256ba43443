//! API response types
//!
//! Wire shapes for the upload endpoints. The dashboard frontend predates
//! this server and expects exactly these bodies, so they are fixed here
//! rather than wrapped in a generic envelope:
//!
//! - success: `{ "success": true, "message", "fileName", "recordsProcessed", "fileUrl" }`
//! - failure: `{ "error": "<reason>" }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Successful upload response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSuccess {
    pub success: bool,
    pub message: String,
    pub file_name: String,
    pub records_processed: usize,
    pub file_url: String,
}

impl UploadSuccess {
    pub fn new(
        message: impl Into<String>,
        file_name: impl Into<String>,
        records_processed: usize,
        file_url: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            file_name: file_name.into(),
            records_processed,
            file_url: file_url.into(),
        }
    }
}

impl IntoResponse for UploadSuccess {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Build the `{ "error": ... }` body used by every failure path
pub fn error_body(status: StatusCode, reason: impl Into<String>) -> Response {
    (status, Json(json!({ "error": reason.into() }))).into_response()
}
