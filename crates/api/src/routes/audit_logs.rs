//! Audit trail routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use skledger_core::audit::{AuditLogEntry, ListEntriesQuery};

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};

/// Creates the audit log routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/audit-logs", get(list_audit_logs))
}

/// GET /audit-logs?limit=
async fn list_audit_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListEntriesQuery>,
) -> ApiResult<Json<Vec<AuditLogEntry>>> {
    let entries = state
        .audit_log
        .list_entries(auth.actor_id(), &query)
        .await?;
    Ok(Json(entries))
}
