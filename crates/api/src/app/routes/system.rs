use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use helios_infra::AppContext;

use crate::app::errors::db_error_to_response;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to the Helios Dynamics ERP API!" }))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn system_info(Extension(ctx): Extension<Arc<AppContext>>) -> axum::response::Response {
    match ctx.router.system_info().await {
        Ok(info) => Json(info).into_response(),
        Err(err) => db_error_to_response(err),
    }
}
