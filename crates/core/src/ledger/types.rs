//! Ledger domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skledger_shared::types::{ActorId, Amount, TenantId, TransactionId};

use crate::audit::AuditAction;

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Increases both total and available budget.
    Add,
    /// Decreases available budget only.
    Deduct,
}

impl TransactionType {
    /// Returns the type as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Deduct => "deduct",
        }
    }

    /// Returns the audit action recorded for this type.
    #[must_use]
    pub const fn audit_action(&self) -> AuditAction {
        match self {
            Self::Add => AuditAction::BudgetAdd,
            Self::Deduct => AuditAction::BudgetDeduct,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "deduct" => Ok(Self::Deduct),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}

/// The two running balances of one tenant.
///
/// Invariant: `0 <= available_budget <= total_budget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAccount {
    /// Owning tenant; at most one account per tenant.
    pub tenant_id: TenantId,
    /// Sum of additions since the last reset.
    pub total_budget: Decimal,
    /// Funds not yet deducted.
    pub available_budget: Decimal,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Affected tenant.
    pub tenant_id: TenantId,
    /// Positive amount with two decimal places.
    pub amount: Decimal,
    /// Add or deduct.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Optional note, at most 500 characters.
    pub description: Option<String>,
    /// Actor who submitted the transaction.
    pub created_by: ActorId,
    /// Commit time.
    pub created_at: DateTime<Utc>,
}

/// A validated transaction ready to be applied by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Pre-generated transaction ID.
    pub id: TransactionId,
    /// Affected tenant.
    pub tenant_id: TenantId,
    /// Add or deduct.
    pub transaction_type: TransactionType,
    /// Validated amount.
    pub amount: Amount,
    /// Normalized description.
    pub description: Option<String>,
    /// Submitting actor.
    pub created_by: ActorId,
}

impl NewTransaction {
    /// Builds the stored record once the store has assigned a commit time.
    #[must_use]
    pub fn into_transaction(self, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: self.id,
            tenant_id: self.tenant_id,
            amount: self.amount.value(),
            transaction_type: self.transaction_type,
            description: self.description,
            created_by: self.created_by,
            created_at,
        }
    }
}

/// Raw transaction request as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitTransactionInput {
    /// Add or deduct.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Amount in its textual form, e.g. `"250.50"`.
    pub amount: String,
    /// Optional note.
    #[serde(default)]
    pub description: Option<String>,
}

/// Balances of one account before and after a reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReset {
    /// Balances before the reset.
    pub before: BudgetAccount,
    /// Balances after the reset (both zero).
    pub after: BudgetAccount,
}
