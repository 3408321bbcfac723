//! HTTP API application wiring (Axum router + shared context).
//!
//! - `routes/`: HTTP handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use helios_infra::AppContext;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(ctx: AppContext) -> Router {
    let ctx = Arc::new(ctx);

    Router::new()
        .route("/", get(routes::system::root))
        .route("/health", get(routes::system::health))
        .route("/api/system", get(routes::system::system_info))
        .route("/api/chat", post(routes::chat::chat))
        .route("/api/approvals", get(routes::approvals::list))
        .layer(Extension(ctx))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(CorsLayer::permissive()),
        )
}
