//! Budget account arithmetic.
//!
//! Every store applies mutations through these functions so the add/deduct
//! rules have exactly one definition:
//! - add: `total += amount`, `available += amount`
//! - deduct: `available -= amount`, rejected when `amount > available`
//! - reset: `total = 0`, `available = 0`

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use skledger_shared::types::{AMOUNT_SCALE, Amount, TenantId};

use super::error::LedgerError;
use super::types::{BudgetAccount, TransactionType};

/// Largest total budget an account may hold, in centavos.
///
/// Matches the `NUMERIC(20, 2)` balance columns.
const MAX_BALANCE_CENTS: i128 = 99_999_999_999_999_999_999;

/// Largest total budget an account may hold.
#[must_use]
pub fn max_balance() -> Decimal {
    Decimal::from_i128_with_scale(MAX_BALANCE_CENTS, AMOUNT_SCALE)
}

impl BudgetAccount {
    /// A zero-balance account, as created on first access.
    #[must_use]
    pub fn empty(tenant_id: TenantId, now: DateTime<Utc>) -> Self {
        Self {
            tenant_id,
            total_budget: zero(),
            available_budget: zero(),
            updated_at: now,
        }
    }

    /// Applies one transaction in place.
    ///
    /// On error the account is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientFunds` when a deduct exceeds the
    /// available balance, and `LedgerError::BalanceLimitExceeded` when an add
    /// would push the total past [`max_balance`].
    pub fn apply(
        &mut self,
        transaction_type: TransactionType,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let amount = amount.value();
        match transaction_type {
            TransactionType::Add => {
                let limit = max_balance();
                if self.total_budget + amount > limit {
                    return Err(LedgerError::BalanceLimitExceeded { limit });
                }
                self.total_budget += amount;
                self.available_budget += amount;
            }
            TransactionType::Deduct => {
                if amount > self.available_budget {
                    return Err(LedgerError::InsufficientFunds {
                        requested: amount,
                        available: self.available_budget,
                    });
                }
                self.available_budget -= amount;
            }
        }
        self.updated_at = now;
        Ok(())
    }

    /// Zeroes both balances.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.total_budget = zero();
        self.available_budget = zero();
        self.updated_at = now;
    }

    /// Amount deducted since the last reset.
    #[must_use]
    pub fn spent(&self) -> Decimal {
        self.total_budget - self.available_budget
    }

    /// Returns true if `0 <= available <= total`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.available_budget >= Decimal::ZERO && self.available_budget <= self.total_budget
    }
}

fn zero() -> Decimal {
    Decimal::new(0, AMOUNT_SCALE)
}
