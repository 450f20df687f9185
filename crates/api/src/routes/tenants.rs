//! Tenant-scoped routes: budget, transactions, and members.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skledger_core::authz::Actor;
use skledger_core::ledger::{BudgetAccount, SubmitTransactionInput, Transaction, TransactionType};
use skledger_core::members::CreateMemberInput;
use skledger_core::reports::utilization_percent;
use skledger_core::tenant::Tenant;
use skledger_shared::AppError;
use skledger_shared::types::{PageRequest, PageResponse, TenantId};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};

/// Creates the tenant routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(list_tenants))
        .route("/tenants/{tenant_id}", get(get_tenant))
        .route("/tenants/{tenant_id}/budget", get(get_budget))
        .route("/tenants/{tenant_id}/budget/reset", post(reset_budget))
        .route(
            "/tenants/{tenant_id}/transactions",
            get(list_transactions).post(submit_transaction),
        )
        .route("/tenants/{tenant_id}/members", post(create_member))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Amount as sent by clients: a decimal string, or a bare JSON number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// `"250.50"`
    Text(String),
    /// `250.50`
    Number(serde_json::Number),
}

impl AmountInput {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Request body for submitting a transaction.
#[derive(Debug, Deserialize)]
pub struct SubmitTransactionRequest {
    /// `add` or `deduct`.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Positive amount with at most two decimals.
    pub amount: AmountInput,
    /// Optional note.
    pub description: Option<String>,
}

/// Budget account with derived figures.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// Tenant ID.
    pub tenant_id: TenantId,
    /// Total budget.
    pub total_budget: Decimal,
    /// Available budget.
    pub available_budget: Decimal,
    /// Total minus available.
    pub spent: Decimal,
    /// Spent as a percentage of total.
    pub utilization_percent: Decimal,
    /// Last balance change.
    pub updated_at: DateTime<Utc>,
}

impl From<BudgetAccount> for BudgetResponse {
    fn from(account: BudgetAccount) -> Self {
        Self {
            tenant_id: account.tenant_id,
            total_budget: account.total_budget,
            available_budget: account.available_budget,
            spent: account.spent(),
            utilization_percent: utilization_percent(&account),
            updated_at: account.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tenants
async fn list_tenants(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Tenant>>> {
    let tenants = state.tenants.list_tenants(auth.actor_id()).await?;
    Ok(Json(tenants))
}

/// GET /tenants/{tenant_id}
async fn get_tenant(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<Tenant>> {
    let tenant = state
        .tenants
        .find_tenant(auth.actor_id(), TenantId::from_uuid(tenant_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tenant {tenant_id}")))?;
    Ok(Json(tenant))
}

/// GET /tenants/{tenant_id}/budget
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<BudgetResponse>> {
    let account = state
        .ledger
        .get_budget(auth.actor_id(), TenantId::from_uuid(tenant_id))
        .await?;
    Ok(Json(account.into()))
}

/// POST /tenants/{tenant_id}/transactions
async fn submit_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tenant_id): Path<Uuid>,
    Json(req): Json<SubmitTransactionRequest>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let input = SubmitTransactionInput {
        transaction_type: req.transaction_type,
        amount: req.amount.into_text(),
        description: req.description,
    };

    let transaction = state
        .ledger
        .submit_transaction(auth.actor_id(), TenantId::from_uuid(tenant_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /tenants/{tenant_id}/transactions
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tenant_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<Transaction>>> {
    let page = state
        .ledger
        .list_transactions(auth.actor_id(), TenantId::from_uuid(tenant_id), &page)
        .await?;
    Ok(Json(page))
}

/// POST /tenants/{tenant_id}/budget/reset
async fn reset_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Json<BudgetResponse>> {
    let account = state
        .ledger
        .reset_budget(auth.actor_id(), TenantId::from_uuid(tenant_id))
        .await?;
    Ok(Json(account.into()))
}

/// POST /tenants/{tenant_id}/members
async fn create_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tenant_id): Path<Uuid>,
    Json(input): Json<CreateMemberInput>,
) -> ApiResult<(StatusCode, Json<Actor>)> {
    let member = state
        .members
        .create_member(auth.actor_id(), TenantId::from_uuid(tenant_id), input)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}
