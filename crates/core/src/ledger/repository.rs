//! Ledger store port.

use std::future::Future;

use skledger_shared::types::{PageRequest, TenantId};

use super::error::LedgerError;
use super::types::{AccountReset, BudgetAccount, NewTransaction, Transaction};

/// Repository trait for budget accounts and their transactions.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait LedgerRepository: Send + Sync {
    /// Returns true if the tenant exists.
    fn tenant_exists(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<bool, LedgerError>> + Send;

    /// Returns the tenant's account, creating a zero-balance one if absent.
    ///
    /// Must be idempotent under concurrent first access.
    fn get_or_create(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<BudgetAccount, LedgerError>> + Send;

    /// Applies a transaction and records it as one atomic unit.
    ///
    /// Implementations serialize this per tenant: lock the account, apply the
    /// change with [`BudgetAccount::apply`], write the balances, and insert the
    /// transaction. A rejected deduct must leave no trace.
    fn apply_transaction(
        &self,
        transaction: NewTransaction,
    ) -> impl Future<Output = Result<(BudgetAccount, Transaction), LedgerError>> + Send;

    /// Zeroes one tenant's account. Transactions are kept.
    fn reset(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<AccountReset, LedgerError>> + Send;

    /// Zeroes every tenant's account in one atomic unit.
    ///
    /// Tenants that never had an account get a zeroed one, so the result
    /// holds one entry per tenant.
    fn reset_all(&self) -> impl Future<Output = Result<Vec<AccountReset>, LedgerError>> + Send;

    /// Lists a tenant's transactions, most recent first, with the total count.
    fn list_transactions(
        &self,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> impl Future<Output = Result<(Vec<Transaction>, u64), LedgerError>> + Send;
}
