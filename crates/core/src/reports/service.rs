//! Report generation service.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use skledger_shared::types::{ActorId, TenantId};

use super::error::ReportError;
use super::types::{MonthlySpend, OverviewReport, TenantBudget, TenantBudgetRow};
use crate::authz::{ActorDirectory, Operation, authorize_actor};
use crate::ledger::{BudgetAccount, Transaction, TransactionType};
use crate::tenant::compare_by_name;

/// Repository trait for report inputs.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ReportRepository: Send + Sync {
    /// Every tenant with its account, if any.
    fn tenant_budgets(&self) -> impl Future<Output = Result<Vec<TenantBudget>, ReportError>> + Send;

    /// Deduct transactions, optionally restricted to one tenant.
    fn list_deductions(
        &self,
        tenant_id: Option<TenantId>,
    ) -> impl Future<Output = Result<Vec<Transaction>, ReportError>> + Send;
}

/// `(total - available) / total`, or zero for an empty account.
#[must_use]
pub fn utilization(account: &BudgetAccount) -> Decimal {
    ratio(account.spent(), account.total_budget)
}

/// Utilization as a percentage rounded to 2 dp (banker's rounding).
#[must_use]
pub fn utilization_percent(account: &BudgetAccount) -> Decimal {
    percent(utilization(account))
}

fn ratio(spent: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        spent / total
    }
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Builds the overview from tenants and their accounts.
#[must_use]
pub fn build_overview(mut budgets: Vec<TenantBudget>) -> OverviewReport {
    budgets.sort_by(|a, b| compare_by_name(&a.tenant, &b.tenant));

    let rows: Vec<TenantBudgetRow> = budgets
        .into_iter()
        .map(|TenantBudget { tenant, account }| {
            let account =
                account.unwrap_or_else(|| BudgetAccount::empty(tenant.id, Utc::now()));
            TenantBudgetRow {
                tenant_id: tenant.id,
                tenant_name: tenant.name,
                tenant_code: tenant.code,
                total_budget: account.total_budget,
                available_budget: account.available_budget,
                spent: account.spent(),
                utilization_percent: utilization_percent(&account),
            }
        })
        .collect();

    let overall_budget: Decimal = rows.iter().map(|r| r.total_budget).sum();
    let overall_available: Decimal = rows.iter().map(|r| r.available_budget).sum();
    let overall_spent = overall_budget - overall_available;
    let overall_utilization = ratio(overall_spent, overall_budget);

    OverviewReport {
        overall_budget,
        overall_available,
        overall_spent,
        overall_utilization,
        overall_utilization_percent: percent(overall_utilization),
        tenants: rows,
        generated_at: Utc::now(),
    }
}

/// Groups deducts by tenant and calendar month (UTC).
///
/// Adds are never spend and are skipped. Output is ordered by tenant, then
/// year and month.
#[must_use]
pub fn monthly_spend(transactions: &[Transaction]) -> Vec<MonthlySpend> {
    let mut groups: BTreeMap<(TenantId, i32, u32), (Decimal, u64)> = BTreeMap::new();

    for tx in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Deduct)
    {
        let key = (tx.tenant_id, tx.created_at.year(), tx.created_at.month());
        let entry = groups.entry(key).or_insert((Decimal::ZERO, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((tenant_id, year, month), (total_spent, transaction_count))| MonthlySpend {
            tenant_id,
            year,
            month,
            total_spent,
            transaction_count,
        })
        .collect()
}

/// Service for generating budget reports.
pub struct ReportService<R: ReportRepository, D: ActorDirectory> {
    repo: Arc<R>,
    directory: Arc<D>,
}

impl<R: ReportRepository, D: ActorDirectory> ReportService<R, D> {
    /// Create a new report service.
    #[must_use]
    pub fn new(repo: Arc<R>, directory: Arc<D>) -> Self {
        Self { repo, directory }
    }

    /// Overall totals and per-tenant utilization.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Authz` unless the actor is a main admin.
    pub async fn overview(&self, actor_id: ActorId) -> Result<OverviewReport, ReportError> {
        authorize_actor(
            self.directory.as_ref(),
            actor_id,
            &Operation::ViewOverallReports,
        )
        .await?;
        Ok(build_overview(self.repo.tenant_budgets().await?))
    }

    /// Monthly spend for one tenant, or for every tenant when `tenant_id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Authz` if the actor may not read the requested scope.
    pub async fn monthly_spend(
        &self,
        actor_id: ActorId,
        tenant_id: Option<TenantId>,
    ) -> Result<Vec<MonthlySpend>, ReportError> {
        let operation = tenant_id.map_or(Operation::ViewOverallReports, Operation::ViewTenant);
        authorize_actor(self.directory.as_ref(), actor_id, &operation).await?;

        let deductions = self.repo.list_deductions(tenant_id).await?;
        Ok(monthly_spend(&deductions))
    }
}
