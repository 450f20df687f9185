//! Transaction processor.
//!
//! A submission moves through `Validating → Applying → Committed` or ends in
//! `Rejected`. Validation order:
//! 1. amount (well-formed, positive, two decimals, within the ceiling)
//! 2. description length
//! 3. authorization of the actor for the tenant
//! 4. available funds, checked by the store inside the per-tenant lock
//!
//! Only a committed transaction is audited.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use skledger_shared::types::{ActorId, Amount, PageRequest, PageResponse, TenantId, TransactionId};
use tracing::{debug, error, info, warn};

use super::error::LedgerError;
use super::repository::LedgerRepository;
use super::types::{
    AccountReset, BudgetAccount, NewTransaction, SubmitTransactionInput, Transaction,
};
use super::validation::normalize_description;
use crate::audit::{AuditAction, AuditEvent, AuditRecorder};
use crate::authz::{ActorDirectory, Operation, authorize_actor};

const TRANSACTIONS_TABLE: &str = "transactions";
const BUDGET_ACCOUNTS_TABLE: &str = "budget_accounts";

/// Processing stage of a submission, used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Checking amount, description, and authorization.
    Validating,
    /// Inside the store's atomic unit.
    Applying,
    /// Balance written and transaction recorded.
    Committed,
    /// Refused; no state changed.
    Rejected,
}

impl ProcessingStage {
    /// Returns the stage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Applying => "applying",
            Self::Committed => "committed",
            Self::Rejected => "rejected",
        }
    }
}

/// Ledger service: the only writer of budget accounts.
pub struct LedgerService<R: LedgerRepository, D: ActorDirectory> {
    repo: Arc<R>,
    directory: Arc<D>,
    audit: AuditRecorder,
    max_amount: Decimal,
}

impl<R: LedgerRepository, D: ActorDirectory> LedgerService<R, D> {
    /// Create a new ledger service.
    #[must_use]
    pub fn new(repo: Arc<R>, directory: Arc<D>, audit: AuditRecorder, max_amount: Decimal) -> Self {
        Self {
            repo,
            directory,
            audit,
            max_amount,
        }
    }

    /// Validates and applies an add or deduct.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` / `InvalidDescription` for bad input
    /// - `Authz` if the actor may not mutate this tenant's budget
    /// - `TenantNotFound` if the tenant does not exist
    /// - `InsufficientFunds` if a deduct exceeds the available balance
    /// - `Storage` if the store fails; nothing is committed in that case
    pub async fn submit_transaction(
        &self,
        actor_id: ActorId,
        tenant_id: TenantId,
        input: SubmitTransactionInput,
    ) -> Result<Transaction, LedgerError> {
        debug!(
            stage = ProcessingStage::Validating.as_str(),
            tenant_id = %tenant_id,
            actor_id = %actor_id,
            transaction_type = %input.transaction_type,
            "Processing transaction"
        );

        let new = match self.validate(actor_id, tenant_id, input).await {
            Ok(new) => new,
            Err(e) => return Err(Self::rejected(tenant_id, actor_id, e)),
        };

        debug!(
            stage = ProcessingStage::Applying.as_str(),
            tenant_id = %tenant_id,
            transaction_id = %new.id,
            "Applying transaction"
        );

        let (account, transaction) = match self.repo.apply_transaction(new).await {
            Ok(applied) => applied,
            Err(e) => return Err(Self::rejected(tenant_id, actor_id, e)),
        };

        info!(
            stage = ProcessingStage::Committed.as_str(),
            tenant_id = %tenant_id,
            transaction_id = %transaction.id,
            transaction_type = %transaction.transaction_type,
            amount = %transaction.amount,
            available_budget = %account.available_budget,
            "Transaction committed"
        );

        self.audit.record(
            AuditEvent::new(
                actor_id,
                transaction.transaction_type.audit_action(),
                TRANSACTIONS_TABLE,
            )
            .record(transaction.id)
            .tenant(tenant_id)
            .details(json!({
                "amount": transaction.amount.to_string(),
                "description": transaction.description,
            })),
        );

        Ok(transaction)
    }

    async fn validate(
        &self,
        actor_id: ActorId,
        tenant_id: TenantId,
        input: SubmitTransactionInput,
    ) -> Result<NewTransaction, LedgerError> {
        let amount = Amount::parse(&input.amount, self.max_amount)?;
        let description = normalize_description(input.description.as_deref())?;

        authorize_actor(
            self.directory.as_ref(),
            actor_id,
            &Operation::MutateBudget(tenant_id),
        )
        .await?;
        self.ensure_tenant(tenant_id).await?;

        Ok(NewTransaction {
            id: TransactionId::new(),
            tenant_id,
            transaction_type: input.transaction_type,
            amount,
            description,
            created_by: actor_id,
        })
    }

    fn rejected(tenant_id: TenantId, actor_id: ActorId, err: LedgerError) -> LedgerError {
        if err.is_rejection() {
            warn!(
                stage = ProcessingStage::Rejected.as_str(),
                tenant_id = %tenant_id,
                actor_id = %actor_id,
                code = err.error_code(),
                reason = %err,
                "Transaction rejected"
            );
        } else {
            error!(
                stage = ProcessingStage::Rejected.as_str(),
                tenant_id = %tenant_id,
                actor_id = %actor_id,
                error = %err,
                "Transaction failed"
            );
        }
        err
    }

    async fn ensure_tenant(&self, tenant_id: TenantId) -> Result<(), LedgerError> {
        if self.repo.tenant_exists(tenant_id).await? {
            Ok(())
        } else {
            Err(LedgerError::TenantNotFound(tenant_id))
        }
    }

    /// Returns a tenant's account, creating an empty one on first access.
    ///
    /// # Errors
    ///
    /// Returns `Authz` if the actor may not read this tenant, `TenantNotFound`
    /// for unknown tenants, or `Storage`.
    pub async fn get_budget(
        &self,
        actor_id: ActorId,
        tenant_id: TenantId,
    ) -> Result<BudgetAccount, LedgerError> {
        authorize_actor(
            self.directory.as_ref(),
            actor_id,
            &Operation::ViewTenant(tenant_id),
        )
        .await?;
        self.ensure_tenant(tenant_id).await?;
        self.repo.get_or_create(tenant_id).await
    }

    /// Lists a tenant's transactions, most recent first.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_budget`].
    pub async fn list_transactions(
        &self,
        actor_id: ActorId,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> Result<PageResponse<Transaction>, LedgerError> {
        authorize_actor(
            self.directory.as_ref(),
            actor_id,
            &Operation::ViewTenant(tenant_id),
        )
        .await?;
        self.ensure_tenant(tenant_id).await?;

        let page = page.clamped();
        let (data, total) = self.repo.list_transactions(tenant_id, &page).await?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Zeroes one tenant's balances. History is kept.
    ///
    /// # Errors
    ///
    /// Returns `Authz` unless the actor is a main admin, `TenantNotFound`, or `Storage`.
    pub async fn reset_budget(
        &self,
        actor_id: ActorId,
        tenant_id: TenantId,
    ) -> Result<BudgetAccount, LedgerError> {
        authorize_actor(
            self.directory.as_ref(),
            actor_id,
            &Operation::ResetBudget(tenant_id),
        )
        .await?;
        self.ensure_tenant(tenant_id).await?;

        let AccountReset { before, after } = self.repo.reset(tenant_id).await?;

        info!(
            tenant_id = %tenant_id,
            actor_id = %actor_id,
            previous_total = %before.total_budget,
            previous_available = %before.available_budget,
            "Budget reset"
        );

        self.audit.record(
            AuditEvent::new(actor_id, AuditAction::BudgetReset, BUDGET_ACCOUNTS_TABLE)
                .tenant(tenant_id)
                .details(json!({
                    "previous_total": before.total_budget.to_string(),
                    "previous_available": before.available_budget.to_string(),
                })),
        );

        Ok(after)
    }

    /// Zeroes every tenant's balances in one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns `Authz` unless the actor is a main admin, or `Storage`; on
    /// storage failure no account is reset.
    pub async fn reset_all_budgets(
        &self,
        actor_id: ActorId,
    ) -> Result<Vec<BudgetAccount>, LedgerError> {
        authorize_actor(
            self.directory.as_ref(),
            actor_id,
            &Operation::ResetAllBudgets,
        )
        .await?;

        let resets = self.repo.reset_all().await?;
        let cleared_total: Decimal = resets.iter().map(|r| r.before.total_budget).sum();

        info!(
            actor_id = %actor_id,
            accounts = resets.len(),
            cleared_total = %cleared_total,
            "All budgets reset"
        );

        self.audit.record(
            AuditEvent::new(actor_id, AuditAction::BudgetResetAll, BUDGET_ACCOUNTS_TABLE)
                .details(json!({
                    "accounts": resets.len(),
                    "cleared_total": cleared_total.to_string(),
                })),
        );

        Ok(resets.into_iter().map(|r| r.after).collect())
    }
}
