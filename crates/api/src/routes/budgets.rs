//! Cross-tenant budget routes.

use axum::{Json, Router, extract::State, routing::post};

use super::tenants::BudgetResponse;
use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/budgets/reset", post(reset_all_budgets))
}

/// POST /budgets/reset
async fn reset_all_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<BudgetResponse>>> {
    let accounts = state.ledger.reset_all_budgets(auth.actor_id()).await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}
