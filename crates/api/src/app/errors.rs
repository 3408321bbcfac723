use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use helios_infra::{AuditError, DbError};

/// `{"error": <message>, "code": <code>}` with the given status.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}

pub fn db_error_to_response(err: DbError) -> Response {
    tracing::error!(error = %err, "database request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "database_error", err.to_string())
}

pub fn audit_error_to_response(err: AuditError) -> Response {
    tracing::error!(error = %err, "audit log request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "audit_error", err.to_string())
}
