//! In-memory ledger store for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use skledger_shared::types::{PageRequest, TenantId};

use super::error::LedgerError;
use super::repository::LedgerRepository;
use super::types::{AccountReset, BudgetAccount, NewTransaction, Transaction};

#[derive(Default)]
struct State {
    tenants: HashSet<TenantId>,
    accounts: HashMap<TenantId, BudgetAccount>,
    transactions: Vec<Transaction>,
}

/// One mutex over all state, so every call is atomic.
#[derive(Default)]
pub(crate) struct MemoryLedger {
    state: Mutex<State>,
    fail_writes: AtomicBool,
}

impl MemoryLedger {
    pub(crate) fn with_tenants(tenants: &[TenantId]) -> Self {
        let ledger = Self::default();
        ledger
            .state
            .lock()
            .unwrap()
            .tenants
            .extend(tenants.iter().copied());
        ledger
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn account(&self, tenant_id: TenantId) -> Option<BudgetAccount> {
        self.state.lock().unwrap().accounts.get(&tenant_id).cloned()
    }

    pub(crate) fn transactions(&self, tenant_id: TenantId) -> Vec<Transaction> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .filter(|t| t.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    fn check_writable(&self) -> Result<(), LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(LedgerError::Storage("write failed".into()))
        } else {
            Ok(())
        }
    }
}

impl LedgerRepository for MemoryLedger {
    async fn tenant_exists(&self, tenant_id: TenantId) -> Result<bool, LedgerError> {
        Ok(self.state.lock().unwrap().tenants.contains(&tenant_id))
    }

    async fn get_or_create(&self, tenant_id: TenantId) -> Result<BudgetAccount, LedgerError> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .entry(tenant_id)
            .or_insert_with(|| BudgetAccount::empty(tenant_id, Utc::now()))
            .clone())
    }

    async fn apply_transaction(
        &self,
        transaction: NewTransaction,
    ) -> Result<(BudgetAccount, Transaction), LedgerError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();

        let mut account = state
            .accounts
            .get(&transaction.tenant_id)
            .cloned()
            .unwrap_or_else(|| BudgetAccount::empty(transaction.tenant_id, now));
        account.apply(transaction.transaction_type, transaction.amount, now)?;

        let record = transaction.into_transaction(now);
        state.accounts.insert(account.tenant_id, account.clone());
        state.transactions.push(record.clone());
        Ok((account, record))
    }

    async fn reset(&self, tenant_id: TenantId) -> Result<AccountReset, LedgerError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();

        let before = state
            .accounts
            .get(&tenant_id)
            .cloned()
            .unwrap_or_else(|| BudgetAccount::empty(tenant_id, now));
        let mut after = before.clone();
        after.reset(now);
        state.accounts.insert(tenant_id, after.clone());
        Ok(AccountReset { before, after })
    }

    async fn reset_all(&self) -> Result<Vec<AccountReset>, LedgerError> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();

        let State { tenants, accounts, .. } = &mut *state;
        let mut ids: Vec<TenantId> = tenants.iter().chain(accounts.keys()).copied().collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(ids
            .into_iter()
            .map(|tenant_id| {
                let account = accounts
                    .entry(tenant_id)
                    .or_insert_with(|| BudgetAccount::empty(tenant_id, now));
                let before = account.clone();
                account.reset(now);
                AccountReset {
                    before,
                    after: account.clone(),
                }
            })
            .collect())
    }

    async fn list_transactions(
        &self,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> Result<(Vec<Transaction>, u64), LedgerError> {
        let mut all = self.transactions(tenant_id);
        all.reverse();
        let total = u64::try_from(all.len()).unwrap();
        let offset = usize::try_from(page.offset()).unwrap();
        let limit = usize::try_from(page.limit()).unwrap();
        Ok((all.into_iter().skip(offset).take(limit).collect(), total))
    }
}
