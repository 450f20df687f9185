use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use skledger_shared::types::{ActorId, AmountError, PageRequest, TenantId};
use tokio::sync::mpsc;

use super::testing::MemoryLedger;
use super::*;
use crate::audit::{AuditAction, AuditEvent, AuditRecorder};
use crate::authz::testing::{StaticDirectory, actor};
use crate::authz::{Actor, ActorRole, AuthzError, DenyReason};
use crate::reports::utilization_percent;

const CEILING: Decimal = dec!(1000000000);

struct Harness {
    service: Arc<LedgerService<MemoryLedger, StaticDirectory>>,
    ledger: Arc<MemoryLedger>,
    directory: Arc<StaticDirectory>,
    audit_rx: mpsc::Receiver<AuditEvent>,
    tenant: TenantId,
    other_tenant: TenantId,
    admin: Actor,
    chairman: Actor,
}

impl Harness {
    fn new() -> Self {
        let tenant = TenantId::new();
        let other_tenant = TenantId::new();
        let admin = actor(ActorRole::MainAdmin, None);
        let chairman = actor(ActorRole::SkChairman, Some(tenant));

        let ledger = Arc::new(MemoryLedger::with_tenants(&[tenant, other_tenant]));
        let directory = Arc::new(StaticDirectory::with(vec![admin.clone(), chairman.clone()]));
        let (audit, audit_rx) = AuditRecorder::channel(256);
        let service = Arc::new(LedgerService::new(
            Arc::clone(&ledger),
            Arc::clone(&directory),
            audit,
            CEILING,
        ));

        Self {
            service,
            ledger,
            directory,
            audit_rx,
            tenant,
            other_tenant,
            admin,
            chairman,
        }
    }

    async fn submit(
        &self,
        actor_id: ActorId,
        transaction_type: TransactionType,
        amount: &str,
    ) -> Result<Transaction, LedgerError> {
        self.service
            .submit_transaction(
                actor_id,
                self.tenant,
                SubmitTransactionInput {
                    transaction_type,
                    amount: amount.to_string(),
                    description: None,
                },
            )
            .await
    }

    fn audit_events(&mut self) -> Vec<AuditEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.audit_rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn available(&self) -> Decimal {
        self.ledger
            .account(self.tenant)
            .map_or(Decimal::ZERO, |a| a.available_budget)
    }
}

#[tokio::test]
async fn test_add_to_fresh_tenant() {
    let mut h = Harness::new();

    let tx = h
        .submit(h.chairman.id, TransactionType::Add, "1000.00")
        .await
        .unwrap();

    let account = h.service.get_budget(h.chairman.id, h.tenant).await.unwrap();
    assert_eq!(account.total_budget, dec!(1000.00));
    assert_eq!(account.available_budget, dec!(1000.00));
    assert_eq!(tx.amount, dec!(1000.00));
    assert_eq!(tx.transaction_type, TransactionType::Add);
    assert_eq!(tx.created_by, h.chairman.id);
    assert_eq!(h.ledger.transactions(h.tenant).len(), 1);

    let events = h.audit_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::BudgetAdd);
    assert_eq!(events[0].table_name, "transactions");
    assert_eq!(events[0].record_id, Some(tx.id.into()));
    assert_eq!(events[0].tenant_id, Some(h.tenant));
    assert_eq!(events[0].details["amount"], "1000.00");
}

#[tokio::test]
async fn test_deduct_updates_available_and_utilization() {
    let h = Harness::new();
    h.submit(h.chairman.id, TransactionType::Add, "1000.00")
        .await
        .unwrap();

    h.submit(h.chairman.id, TransactionType::Deduct, "250.50")
        .await
        .unwrap();

    let account = h.ledger.account(h.tenant).unwrap();
    assert_eq!(account.available_budget, dec!(749.50));
    assert_eq!(account.total_budget, dec!(1000.00));
    assert_eq!(utilization_percent(&account), dec!(25.05));
}

#[tokio::test]
async fn test_overdraft_rejected_without_trace() {
    let mut h = Harness::new();
    h.submit(h.chairman.id, TransactionType::Add, "1000.00")
        .await
        .unwrap();
    h.submit(h.chairman.id, TransactionType::Deduct, "250.50")
        .await
        .unwrap();
    h.audit_events();

    let err = h
        .submit(h.chairman.id, TransactionType::Deduct, "10000.00")
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(err.field(), Some("amount"));
    assert_eq!(h.available(), dec!(749.50));
    assert_eq!(h.ledger.transactions(h.tenant).len(), 2);
    assert!(h.audit_events().is_empty());
}

#[tokio::test]
async fn test_reset_keeps_history() {
    let mut h = Harness::new();
    let add = h
        .submit(h.chairman.id, TransactionType::Add, "1000.00")
        .await
        .unwrap();
    let deduct = h
        .submit(h.chairman.id, TransactionType::Deduct, "250.50")
        .await
        .unwrap();
    h.audit_events();

    let account = h.service.reset_budget(h.admin.id, h.tenant).await.unwrap();

    assert_eq!(account.total_budget, dec!(0));
    assert_eq!(account.available_budget, dec!(0));
    assert_eq!(h.ledger.transactions(h.tenant), vec![add, deduct]);

    let events = h.audit_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::BudgetReset);
    assert_eq!(events[0].details["previous_total"], "1000.00");
    assert_eq!(events[0].details["previous_available"], "749.50");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deducts_never_overdraw() {
    let h = Harness::new();
    h.submit(h.chairman.id, TransactionType::Add, "500.00")
        .await
        .unwrap();

    let mut handles = Vec::with_capacity(50);
    for _ in 0..50 {
        let service = Arc::clone(&h.service);
        let actor_id = h.chairman.id;
        let tenant = h.tenant;
        handles.push(tokio::spawn(async move {
            service
                .submit_transaction(
                    actor_id,
                    tenant,
                    SubmitTransactionInput {
                        transaction_type: TransactionType::Deduct,
                        amount: "20.00".to_string(),
                        description: None,
                    },
                )
                .await
        }));
    }

    let mut committed = 0;
    let mut insufficient = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(LedgerError::InsufficientFunds { .. }) => insufficient += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(committed, 25);
    assert_eq!(insufficient, 25);
    assert_eq!(h.available(), dec!(0.00));
}

#[tokio::test]
async fn test_chairman_cannot_touch_other_tenant() {
    let mut h = Harness::new();

    let err = h
        .service
        .submit_transaction(
            h.chairman.id,
            h.other_tenant,
            SubmitTransactionInput {
                transaction_type: TransactionType::Add,
                amount: "100.00".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Authz(AuthzError::Forbidden(DenyReason::OutsideTenant))
    ));
    assert!(h.ledger.account(h.other_tenant).is_none());
    assert!(h.ledger.transactions(h.other_tenant).is_empty());
    assert!(h.audit_events().is_empty());
}

#[tokio::test]
async fn test_forbidden_before_funds_check() {
    let h = Harness::new();
    let kagawad = actor(ActorRole::Kagawad, Some(h.tenant));
    h.directory.insert(kagawad.clone());

    let err = h
        .submit(kagawad.id, TransactionType::Deduct, "999999.00")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::Authz(AuthzError::Forbidden(DenyReason::RoleNotPermitted))
    ));
}

#[tokio::test]
async fn test_invalid_input_rejected_before_authorization() {
    let h = Harness::new();
    let stranger = ActorId::new();

    let err = h
        .submit(stranger, TransactionType::Add, "10.001")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidAmount(AmountError::TooManyDecimals)
    ));

    let err = h
        .service
        .submit_transaction(
            stranger,
            h.tenant,
            SubmitTransactionInput {
                transaction_type: TransactionType::Add,
                amount: "10.00".to_string(),
                description: Some("x".repeat(501)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDescription { length: 501 }));
}

#[tokio::test]
async fn test_amount_ceiling() {
    let h = Harness::new();

    assert!(
        h.submit(h.admin.id, TransactionType::Add, "1000000000.00")
            .await
            .is_ok()
    );
    let err = h
        .submit(h.admin.id, TransactionType::Add, "1000000000.01")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidAmount(AmountError::ExceedsCeiling { .. })
    ));
}

#[tokio::test]
async fn test_unknown_tenant_is_not_found_for_admin() {
    let h = Harness::new();
    let missing = TenantId::new();

    let err = h.service.get_budget(h.admin.id, missing).await.unwrap_err();
    assert!(matches!(err, LedgerError::TenantNotFound(id) if id == missing));
    assert!(h.ledger.account(missing).is_none());
}

#[tokio::test]
async fn test_only_main_admin_resets() {
    let h = Harness::new();
    h.submit(h.chairman.id, TransactionType::Add, "50.00")
        .await
        .unwrap();

    let err = h
        .service
        .reset_budget(h.chairman.id, h.tenant)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Authz(_)));
    assert_eq!(h.available(), dec!(50.00));

    let err = h
        .service
        .reset_all_budgets(h.chairman.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Authz(_)));
}

#[tokio::test]
async fn test_reset_all() {
    let mut h = Harness::new();
    h.submit(h.admin.id, TransactionType::Add, "300.00")
        .await
        .unwrap();
    h.service
        .submit_transaction(
            h.admin.id,
            h.other_tenant,
            SubmitTransactionInput {
                transaction_type: TransactionType::Add,
                amount: "200.00".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    h.audit_events();

    let accounts = h.service.reset_all_budgets(h.admin.id).await.unwrap();

    assert_eq!(accounts.len(), 2);
    assert!(
        accounts
            .iter()
            .all(|a| a.total_budget.is_zero() && a.available_budget.is_zero())
    );

    let events = h.audit_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::BudgetResetAll);
    assert_eq!(events[0].details["cleared_total"], "500.00");
}

#[tokio::test]
async fn test_reset_all_lists_tenants_without_account() {
    let h = Harness::new();
    h.submit(h.admin.id, TransactionType::Add, "300.00")
        .await
        .unwrap();
    assert!(h.ledger.account(h.other_tenant).is_none());

    let accounts = h.service.reset_all_budgets(h.admin.id).await.unwrap();

    let mut tenants: Vec<TenantId> = accounts.iter().map(|a| a.tenant_id).collect();
    tenants.sort_unstable();
    let mut expected = vec![h.tenant, h.other_tenant];
    expected.sort_unstable();
    assert_eq!(tenants, expected);

    let untouched = h.ledger.account(h.other_tenant).unwrap();
    assert_eq!(untouched.total_budget.to_string(), "0.00");
    assert_eq!(untouched.available_budget.to_string(), "0.00");
}

#[tokio::test]
async fn test_storage_failure_is_not_committed() {
    let mut h = Harness::new();
    h.ledger.fail_writes(true);

    let err = h
        .submit(h.chairman.id, TransactionType::Add, "10.00")
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::Storage(_)));
    assert!(!err.is_rejection());
    assert!(h.ledger.transactions(h.tenant).is_empty());
    assert!(h.audit_events().is_empty());
}

#[tokio::test]
async fn test_stopped_audit_worker_does_not_fail_commit() {
    let h = Harness::new();
    let Harness {
        ledger,
        directory,
        chairman,
        tenant,
        ..
    } = h;
    let (audit, rx) = AuditRecorder::channel(1);
    drop(rx);
    let service = LedgerService::new(Arc::clone(&ledger), directory, audit, CEILING);

    let tx = service
        .submit_transaction(
            chairman.id,
            tenant,
            SubmitTransactionInput {
                transaction_type: TransactionType::Add,
                amount: "10.00".to_string(),
                description: Some("Sports fest".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(tx.description.as_deref(), Some("Sports fest"));
    assert_eq!(ledger.transactions(tenant).len(), 1);
}

#[tokio::test]
async fn test_role_change_applies_immediately() {
    let h = Harness::new();
    h.submit(h.chairman.id, TransactionType::Add, "10.00")
        .await
        .unwrap();

    h.directory.set_role(h.chairman.id, ActorRole::SkSecretary);

    let err = h
        .submit(h.chairman.id, TransactionType::Add, "10.00")
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Authz(_)));
    assert_eq!(h.available(), dec!(10.00));
}

#[tokio::test]
async fn test_list_transactions_most_recent_first() {
    let h = Harness::new();
    for amount in ["1.00", "2.00", "3.00"] {
        h.submit(h.chairman.id, TransactionType::Add, amount)
            .await
            .unwrap();
    }
    let kagawad = actor(ActorRole::Kagawad, Some(h.tenant));
    h.directory.insert(kagawad.clone());

    let page = h
        .service
        .list_transactions(
            kagawad.id,
            h.tenant,
            &PageRequest {
                page: 1,
                per_page: 2,
            },
        )
        .await
        .unwrap();

    let amounts: Vec<Decimal> = page.data.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![dec!(3.00), dec!(2.00)]);
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);

    let outsider = actor(ActorRole::Kagawad, Some(h.other_tenant));
    h.directory.insert(outsider.clone());
    assert!(
        h.service
            .list_transactions(outsider.id, h.tenant, &PageRequest::default())
            .await
            .is_err()
    );
}
