//! Report data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skledger_shared::types::TenantId;

use crate::ledger::BudgetAccount;
use crate::tenant::Tenant;

/// A tenant together with its account, if one was ever created.
#[derive(Debug, Clone)]
pub struct TenantBudget {
    /// The tenant.
    pub tenant: Tenant,
    /// Its budget account; `None` reads as zero balances.
    pub account: Option<BudgetAccount>,
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantBudgetRow {
    /// Tenant ID.
    pub tenant_id: TenantId,
    /// Tenant name.
    pub tenant_name: String,
    /// Tenant code.
    pub tenant_code: String,
    /// Total budget.
    pub total_budget: Decimal,
    /// Available budget.
    pub available_budget: Decimal,
    /// Total minus available.
    pub spent: Decimal,
    /// Spent as a percentage of total, 2 dp.
    pub utilization_percent: Decimal,
}

/// Totals across every tenant plus the per-tenant rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewReport {
    /// Σ total budget.
    pub overall_budget: Decimal,
    /// Σ available budget.
    pub overall_available: Decimal,
    /// Σ spent.
    pub overall_spent: Decimal,
    /// Overall spent / overall budget.
    pub overall_utilization: Decimal,
    /// Overall utilization as a percentage, 2 dp.
    pub overall_utilization_percent: Decimal,
    /// Rows ordered by tenant name.
    pub tenants: Vec<TenantBudgetRow>,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
}

/// Spend of one tenant in one calendar month (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySpend {
    /// Tenant ID.
    pub tenant_id: TenantId,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Σ deduct amounts.
    pub total_spent: Decimal,
    /// Number of deducts.
    pub transaction_count: u64,
}
