//! Report repository for database operations.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use skledger_core::ledger::Transaction;
use skledger_core::reports::{ReportError, ReportRepository as ReportRepoTrait, TenantBudget};
use skledger_shared::types::TenantId;

use super::ledger::{account_to_domain, transaction_to_domain};
use super::tenant;
use crate::entities::{budget_accounts, sea_orm_active_enums::TransactionType, tenants, transactions};

/// Read-only queries feeding the dashboard reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReportRepoTrait for ReportRepository {
    async fn tenant_budgets(&self) -> Result<Vec<TenantBudget>, ReportError> {
        let tenant_models = tenants::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ReportError::Storage(e.to_string()))?;

        let mut accounts: HashMap<_, _> = budget_accounts::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ReportError::Storage(e.to_string()))?
            .into_iter()
            .map(|m| (m.tenant_id, m))
            .collect();

        Ok(tenant_models
            .into_iter()
            .map(|model| {
                let account = accounts.remove(&model.id).map(account_to_domain);
                TenantBudget {
                    tenant: tenant::to_domain(model),
                    account,
                }
            })
            .collect())
    }

    async fn list_deductions(
        &self,
        tenant_id: Option<TenantId>,
    ) -> Result<Vec<Transaction>, ReportError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::TransactionType.eq(TransactionType::Deduct));
        if let Some(tenant_id) = tenant_id {
            query = query.filter(transactions::Column::TenantId.eq(tenant_id.into_inner()));
        }

        let models = query
            .order_by_asc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ReportError::Storage(e.to_string()))?;

        Ok(models.into_iter().map(transaction_to_domain).collect())
    }
}
