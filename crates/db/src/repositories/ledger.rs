//! Ledger repository for database operations.
//!
//! Every balance change runs inside one database transaction that holds a
//! row lock (`SELECT ... FOR UPDATE`) on the tenant's `budget_accounts` row,
//! so concurrent writers for the same tenant are serialized while other
//! tenants proceed in parallel.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use skledger_core::ledger::{
    AccountReset, BudgetAccount, LedgerError, LedgerRepository as LedgerRepoTrait,
    NewTransaction, Transaction,
};
use skledger_shared::types::{ActorId, PageRequest, TenantId, TransactionId};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{budget_accounts, tenants, transactions};

/// Budget accounts and their transaction history.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn storage(e: DbErr) -> LedgerError {
    LedgerError::Storage(e.to_string())
}

/// Inserts a zero-balance account unless one already exists.
async fn ensure_account<C: ConnectionTrait>(conn: &C, tenant_id: TenantId) -> Result<(), DbErr> {
    let zero = Decimal::new(0, 2);
    let account = budget_accounts::ActiveModel {
        tenant_id: Set(tenant_id.into_inner()),
        total_budget: Set(zero),
        available_budget: Set(zero),
        updated_at: Set(Utc::now().into()),
    };

    let inserted = budget_accounts::Entity::insert(account)
        .on_conflict(
            OnConflict::column(budget_accounts::Column::TenantId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    if inserted > 0 {
        debug!(tenant_id = %tenant_id, "Budget account created");
    }
    Ok(())
}

/// Reads the account row holding an exclusive lock until the transaction ends.
async fn lock_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
) -> Result<budget_accounts::Model, LedgerError> {
    budget_accounts::Entity::find_by_id(tenant_id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(storage)?
        .ok_or(LedgerError::TenantNotFound(tenant_id))
}

/// Writes the balances of `account` over the locked row.
async fn store_account<C: ConnectionTrait>(
    conn: &C,
    row: budget_accounts::Model,
    account: &BudgetAccount,
) -> Result<(), DbErr> {
    let mut active = row.into_active_model();
    active.total_budget = Set(account.total_budget);
    active.available_budget = Set(account.available_budget);
    active.updated_at = Set(account.updated_at.into());
    active.update(conn).await?;
    Ok(())
}

impl LedgerRepoTrait for LedgerRepository {
    async fn tenant_exists(&self, tenant_id: TenantId) -> Result<bool, LedgerError> {
        let count = tenants::Entity::find_by_id(tenant_id.into_inner())
            .count(&self.db)
            .await
            .map_err(storage)?;

        Ok(count > 0)
    }

    async fn get_or_create(&self, tenant_id: TenantId) -> Result<BudgetAccount, LedgerError> {
        ensure_account(&self.db, tenant_id).await.map_err(storage)?;

        budget_accounts::Entity::find_by_id(tenant_id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage)?
            .map(account_to_domain)
            .ok_or(LedgerError::TenantNotFound(tenant_id))
    }

    async fn apply_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<(BudgetAccount, Transaction), LedgerError> {
        let tenant_id = transaction.tenant_id;
        let txn = self.db.begin().await.map_err(storage)?;

        ensure_account(&txn, tenant_id).await.map_err(storage)?;
        let row = lock_account(&txn, tenant_id).await?;

        let now = Utc::now();
        let mut account = account_to_domain(row.clone());
        // A rejected deduct returns here and the dropped transaction rolls back.
        account.apply(transaction.transaction_type, transaction.amount, now)?;

        store_account(&txn, row, &account)
            .await
            .map_err(storage)?;

        let record = transaction.into_transaction(now);
        transactions::ActiveModel {
            id: Set(record.id.into_inner()),
            tenant_id: Set(record.tenant_id.into_inner()),
            amount: Set(record.amount),
            transaction_type: Set(record.transaction_type.into()),
            description: Set(record.description.clone()),
            created_by: Set(record.created_by.into_inner()),
            created_at: Set(record.created_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(storage)?;

        txn.commit().await.map_err(storage)?;

        Ok((account, record))
    }

    async fn reset(&self, tenant_id: TenantId) -> Result<AccountReset, LedgerError> {
        let txn = self.db.begin().await.map_err(storage)?;

        ensure_account(&txn, tenant_id).await.map_err(storage)?;
        let row = lock_account(&txn, tenant_id).await?;

        let before = account_to_domain(row.clone());
        let mut after = before.clone();
        after.reset(Utc::now());
        store_account(&txn, row, &after).await.map_err(storage)?;

        txn.commit().await.map_err(storage)?;

        Ok(AccountReset { before, after })
    }

    async fn reset_all(&self) -> Result<Vec<AccountReset>, LedgerError> {
        let txn = self.db.begin().await.map_err(storage)?;

        let tenant_ids: Vec<Uuid> = tenants::Entity::find()
            .select_only()
            .column(tenants::Column::Id)
            .order_by_asc(tenants::Column::Id)
            .into_tuple()
            .all(&txn)
            .await
            .map_err(storage)?;
        for id in tenant_ids {
            ensure_account(&txn, TenantId::from_uuid(id))
                .await
                .map_err(storage)?;
        }

        let rows = budget_accounts::Entity::find()
            .order_by_asc(budget_accounts::Column::TenantId)
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(storage)?;

        let now = Utc::now();
        let mut resets = Vec::with_capacity(rows.len());
        for row in rows {
            let before = account_to_domain(row.clone());
            let mut after = before.clone();
            after.reset(now);
            store_account(&txn, row, &after).await.map_err(storage)?;
            resets.push(AccountReset { before, after });
        }

        txn.commit().await.map_err(storage)?;

        Ok(resets)
    }

    async fn list_transactions(
        &self,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> Result<(Vec<Transaction>, u64), LedgerError> {
        let query = transactions::Entity::find()
            .filter(transactions::Column::TenantId.eq(tenant_id.into_inner()));

        let total = query.clone().count(&self.db).await.map_err(storage)?;

        let models = query
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(storage)?;

        Ok((models.into_iter().map(transaction_to_domain).collect(), total))
    }
}

pub(crate) fn account_to_domain(model: budget_accounts::Model) -> BudgetAccount {
    BudgetAccount {
        tenant_id: TenantId::from_uuid(model.tenant_id),
        total_budget: model.total_budget,
        available_budget: model.available_budget,
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn transaction_to_domain(model: transactions::Model) -> Transaction {
    Transaction {
        id: TransactionId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        amount: model.amount,
        transaction_type: model.transaction_type.into(),
        description: model.description,
        created_by: ActorId::from_uuid(model.created_by),
        created_at: model.created_at.with_timezone(&Utc),
    }
}
