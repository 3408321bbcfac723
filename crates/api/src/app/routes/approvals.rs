use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use helios_core::ApprovalStatus;
use helios_infra::AppContext;

use crate::app::dto::ApprovalsQuery;
use crate::app::errors::{audit_error_to_response, json_error};

/// Read-only listing; approval status is changed outside this service.
pub async fn list(
    Extension(ctx): Extension<Arc<AppContext>>,
    Query(query): Query<ApprovalsQuery>,
) -> Response {
    let status = match query.status.as_deref().map(str::parse::<ApprovalStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => return json_error(StatusCode::BAD_REQUEST, "invalid_status", e.to_string()),
    };

    match ctx.audit.list_approvals(status).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => audit_error_to_response(err),
    }
}
