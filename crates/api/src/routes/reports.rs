//! Report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use skledger_core::reports::{MonthlySpend, OverviewReport};
use skledger_shared::types::TenantId;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/overview", get(overview))
        .route("/reports/monthly-spend", get(monthly_spend))
}

/// Query parameters for monthly spend.
#[derive(Debug, Deserialize)]
pub struct MonthlySpendQuery {
    /// Restrict to one tenant; omitted means every tenant.
    pub tenant_id: Option<Uuid>,
}

/// GET /reports/overview
async fn overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<OverviewReport>> {
    let report = state.reports.overview(auth.actor_id()).await?;
    Ok(Json(report))
}

/// GET /reports/monthly-spend?tenant_id=
async fn monthly_spend(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthlySpendQuery>,
) -> ApiResult<Json<Vec<MonthlySpend>>> {
    let rows = state
        .reports
        .monthly_spend(auth.actor_id(), query.tenant_id.map(TenantId::from_uuid))
        .await?;
    Ok(Json(rows))
}
