use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use tracing::info;

use helios_core::{SessionId, UserId};
use helios_infra::AppContext;

use crate::app::dto::{ChatRequest, ChatResponse};
use crate::app::errors::json_error;

pub async fn chat(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(req): Json<ChatRequest>,
) -> axum::response::Response {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "validation_error", "prompt is required");
    }

    let session_id = match req.session_id.as_deref() {
        Some(raw) => match SessionId::new(raw) {
            Ok(id) => id,
            Err(e) => return json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        },
        None => ctx.config.session_id.clone(),
    };
    let user_id = match req.user_id.as_deref() {
        Some(raw) => match UserId::new(raw) {
            Ok(id) => id,
            Err(e) => return json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        },
        None => ctx.config.user_id.clone(),
    };

    let outcome = ctx.router.route(prompt, &session_id, &user_id).await;
    info!(session = %session_id, domain = %outcome.domain(), failed = outcome.is_failure(), "chat handled");

    if outcome.is_failure() {
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, "agent_error", outcome.message());
    }

    Json(ChatResponse {
        response: outcome.message(),
    })
    .into_response()
}
