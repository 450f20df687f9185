//! Liveness check for the ledger API.
//!
//! Answers without touching the database so a load balancer can tell a
//! running process from a reachable one.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Which service answered.
    pub service: &'static str,
    /// Crate version of the running binary.
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "skledger-ledger",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mounts `/health`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
