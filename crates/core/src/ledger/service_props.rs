//! Property-based tests for the ledger.
//!
//! - Balance bounds: `0 <= available <= total` after any sequence of operations
//! - Conservation: Σadd − Σdeduct since the last reset equals available
//! - Total only moves on add (+amount) and reset (→ 0)
//! - Rejections change nothing

use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use skledger_shared::types::{Amount, TenantId};

use super::error::LedgerError;
use super::service::LedgerService;
use super::testing::MemoryLedger;
use super::types::{BudgetAccount, SubmitTransactionInput, TransactionType};
use crate::audit::AuditRecorder;
use crate::authz::ActorRole;
use crate::authz::testing::{StaticDirectory, actor};

const CEILING: Decimal = dec!(1000000000);

#[derive(Debug, Clone)]
enum Op {
    Add(Decimal),
    Deduct(Decimal),
    Reset,
}

/// Strategy to generate valid amounts (0.01 to 10,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => amount().prop_map(Op::Add),
        5 => amount().prop_map(Op::Deduct),
        1 => Just(Op::Reset),
    ]
}

fn valid(value: Decimal) -> Amount {
    Amount::new(value, CEILING).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any sequence of operations the account stays within bounds, and
    /// available equals adds minus accepted deducts since the last reset.
    #[test]
    fn prop_bounds_and_conservation(ops in prop::collection::vec(op(), 1..60)) {
        let mut account = BudgetAccount::empty(TenantId::new(), Utc::now());
        let mut added = Decimal::ZERO;
        let mut deducted = Decimal::ZERO;

        for op in ops {
            let before = account.clone();
            match op {
                Op::Add(v) => {
                    account.apply(TransactionType::Add, valid(v), Utc::now()).unwrap();
                    added += v;
                    prop_assert_eq!(account.total_budget, before.total_budget + v);
                }
                Op::Deduct(v) => {
                    match account.apply(TransactionType::Deduct, valid(v), Utc::now()) {
                        Ok(()) => {
                            deducted += v;
                            prop_assert_eq!(account.total_budget, before.total_budget);
                        }
                        Err(LedgerError::InsufficientFunds { .. }) => {
                            prop_assert!(v > before.available_budget);
                            prop_assert_eq!(&account, &before);
                        }
                        Err(e) => prop_assert!(false, "unexpected error: {e}"),
                    }
                }
                Op::Reset => {
                    account.reset(Utc::now());
                    added = Decimal::ZERO;
                    deducted = Decimal::ZERO;
                }
            }

            prop_assert!(account.is_consistent());
            prop_assert_eq!(account.available_budget, added - deducted);
            prop_assert_eq!(account.total_budget, added);
        }
    }

    /// Amounts with more than two decimals never reach the store.
    #[test]
    fn prop_sub_cent_amounts_rejected(mills in 1i64..10_000_000i64) {
        prop_assume!(mills % 10 != 0);
        let value = Decimal::new(mills, 3);
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let tenant = TenantId::new();
        let admin = actor(ActorRole::MainAdmin, None);
        let ledger = Arc::new(MemoryLedger::with_tenants(&[tenant]));
        let (audit, _rx) = AuditRecorder::channel(8);
        let service = LedgerService::new(
            Arc::clone(&ledger),
            Arc::new(StaticDirectory::with(vec![admin.clone()])),
            audit,
            CEILING,
        );

        let result = rt.block_on(service.submit_transaction(
            admin.id,
            tenant,
            SubmitTransactionInput {
                transaction_type: TransactionType::Add,
                amount: value.to_string(),
                description: None,
            },
        ));

        prop_assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
        prop_assert!(ledger.account(tenant).is_none());
        prop_assert!(ledger.transactions(tenant).is_empty());
    }
}
