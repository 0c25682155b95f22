use crate::domain::account::{OrganizationAccount, SubAccount, Subscription};
use crate::domain::ledger::{
    CommitOutcome, ExternalTransactionRecord, LedgerEntry, PaymentLogRecord, PaymentRecord,
};
use crate::domain::ports::{AccountDirectory, LedgerStore, SubscriptionStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().expect("store lock poisoned")
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().expect("store lock poisoned")
}

/// In-memory account directory.
///
/// `Clone` shares the underlying state, so tests and callers can keep a
/// seeding handle next to the boxed port the engine owns.
#[derive(Default, Clone)]
pub struct InMemoryDirectory {
    inner: Arc<RwLock<DirectoryState>>,
}

#[derive(Default)]
struct DirectoryState {
    organizations: HashMap<u64, OrganizationAccount>,
    sub_accounts: HashMap<u64, SubAccount>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_organization(&self, organization: OrganizationAccount) {
        write_lock(&self.inner)
            .organizations
            .insert(organization.reg_no, organization);
    }

    pub fn insert_sub_account(&self, sub_account: SubAccount) {
        write_lock(&self.inner)
            .sub_accounts
            .insert(sub_account.reg_no, sub_account);
    }
}

#[async_trait]
impl AccountDirectory for InMemoryDirectory {
    async fn find_organization(&self, reg_no: u64) -> Result<Option<OrganizationAccount>> {
        Ok(read_lock(&self.inner).organizations.get(&reg_no).cloned())
    }

    async fn organization_sub_accounts(&self, reg_no: u64) -> Result<Vec<SubAccount>> {
        let state = read_lock(&self.inner);
        let mut subs: Vec<SubAccount> = state
            .sub_accounts
            .values()
            .filter(|sub| sub.organization == reg_no)
            .cloned()
            .collect();
        subs.sort_by_key(|sub| sub.reg_no);
        Ok(subs)
    }

    async fn find_sub_account(&self, reg_no: u64) -> Result<Option<SubAccount>> {
        Ok(read_lock(&self.inner).sub_accounts.get(&reg_no).cloned())
    }
}

/// In-memory transactional ledger.
///
/// All ledger rows and the subscriptions live under one lock, so a commit is
/// a single critical section: the duplicate check, the row inserts, and the
/// subscription updates happen with no interleaving. Two concurrent commits
/// for the same external transaction id serialize here, and exactly one of
/// them wins.
#[derive(Clone)]
pub struct InMemoryLedger {
    inner: Arc<RwLock<LedgerState>>,
}

#[derive(Default)]
struct LedgerState {
    next_log_id: u64,
    logs: Vec<PaymentLogRecord>,
    payments: Vec<PaymentRecord>,
    externals: HashMap<String, ExternalTransactionRecord>,
    subscriptions: HashMap<u64, Subscription>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LedgerState {
                next_log_id: 1,
                ..LedgerState::default()
            })),
        }
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryLedger {
    async fn subscription(&self, account_reference: u64) -> Result<Option<Subscription>> {
        Ok(read_lock(&self.inner)
            .subscriptions
            .get(&account_reference)
            .cloned())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn commit(&self, mut entry: LedgerEntry) -> Result<CommitOutcome> {
        let mut state = write_lock(&self.inner);

        if let Some(external) = &entry.external
            && state.externals.contains_key(&external.transaction_id)
        {
            return Ok(CommitOutcome::DuplicateTransaction);
        }

        let log_id = state.next_log_id;
        state.next_log_id += 1;

        entry.log.id = log_id;
        state.logs.push(entry.log);

        for mut payment in entry.payments {
            payment.log_id = log_id;
            state.payments.push(payment);
        }

        if let Some(mut external) = entry.external {
            external.log_id = log_id;
            state
                .externals
                .insert(external.transaction_id.clone(), external);
        }

        for update in entry.subscription_updates {
            let subscription = Subscription {
                account_reference: update.account_reference,
                due_date: update.due_date,
                last_payment_date: Some(update.paid_at),
            };
            state
                .subscriptions
                .insert(update.account_reference, subscription);
        }

        Ok(CommitOutcome::Committed { log_id })
    }

    async fn payment_logs(&self) -> Result<Vec<PaymentLogRecord>> {
        Ok(read_lock(&self.inner).logs.clone())
    }

    async fn payments(&self) -> Result<Vec<PaymentRecord>> {
        Ok(read_lock(&self.inner).payments.clone())
    }

    async fn external_transactions(&self) -> Result<Vec<ExternalTransactionRecord>> {
        Ok(read_lock(&self.inner).externals.values().cloned().collect())
    }
}
