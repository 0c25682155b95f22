use crate::domain::account::Subscription;
use crate::domain::ledger::{
    CommitOutcome, ExternalTransactionRecord, LedgerEntry, PaymentLogRecord, PaymentRecord,
};
use crate::domain::ports::{LedgerStore, SubscriptionStore};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Column Family for payment log rows.
pub const CF_LOGS: &str = "payment_logs";
/// Column Family for per-account fan-out payment rows.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family for raw gateway transaction rows, keyed by the external
/// transaction id. Key presence is the idempotency anchor.
pub const CF_EXTERNALS: &str = "external_transactions";
/// Column Family for per sub-account subscription windows.
pub const CF_SUBSCRIPTIONS: &str = "subscriptions";

/// A persistent ledger backed by RocksDB.
///
/// One commit is one `WriteBatch`: the log row, the fan-out payments, the
/// external transaction row, and the subscription windows land together or
/// not at all. The duplicate check and the batch write run under a single
/// mutex, so concurrent deliveries of the same external id serialize and
/// exactly one commits.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbLedger {
    db: Arc<DB>,
    next_log_id: Arc<AtomicU64>,
    commit_lock: Arc<Mutex<()>>,
}

fn cf_missing(name: &str) -> PaymentError {
    PaymentError::Internal(Box::new(std::io::Error::other(format!(
        "{name} column family not found"
    ))))
}

impl RocksDbLedger {
    /// Opens or creates the database at `path`, ensuring all column families
    /// exist, and resumes log id assignment after the highest committed id.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_LOGS, CF_PAYMENTS, CF_EXTERNALS, CF_SUBSCRIPTIONS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        let last_id = {
            let cf = db.cf_handle(CF_LOGS).ok_or_else(|| cf_missing(CF_LOGS))?;
            match db.iterator_cf(&cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _) = item?;
                    let bytes: [u8; 8] = key.as_ref().try_into().map_err(|_| {
                        PaymentError::Internal(Box::new(std::io::Error::other(
                            "malformed payment log key",
                        )))
                    })?;
                    u64::from_be_bytes(bytes)
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            next_log_id: Arc::new(AtomicU64::new(last_id + 1)),
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    fn collect_cf<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let cf = self.db.cf_handle(name).ok_or_else(|| cf_missing(name))?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_key, value) = item?;
            rows.push(serde_json::from_slice(&value)?);
        }
        Ok(rows)
    }
}

#[async_trait]
impl SubscriptionStore for RocksDbLedger {
    async fn subscription(&self, account_reference: u64) -> Result<Option<Subscription>> {
        let cf = self
            .db
            .cf_handle(CF_SUBSCRIPTIONS)
            .ok_or_else(|| cf_missing(CF_SUBSCRIPTIONS))?;
        match self.db.get_cf(&cf, account_reference.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LedgerStore for RocksDbLedger {
    async fn commit(&self, mut entry: LedgerEntry) -> Result<CommitOutcome> {
        let _guard = self.commit_lock.lock().await;

        let externals_cf = self
            .db
            .cf_handle(CF_EXTERNALS)
            .ok_or_else(|| cf_missing(CF_EXTERNALS))?;
        if let Some(external) = &entry.external
            && self
                .db
                .get_pinned_cf(&externals_cf, external.transaction_id.as_bytes())?
                .is_some()
        {
            return Ok(CommitOutcome::DuplicateTransaction);
        }

        let logs_cf = self
            .db
            .cf_handle(CF_LOGS)
            .ok_or_else(|| cf_missing(CF_LOGS))?;
        let payments_cf = self
            .db
            .cf_handle(CF_PAYMENTS)
            .ok_or_else(|| cf_missing(CF_PAYMENTS))?;
        let subscriptions_cf = self
            .db
            .cf_handle(CF_SUBSCRIPTIONS)
            .ok_or_else(|| cf_missing(CF_SUBSCRIPTIONS))?;

        let log_id = self.next_log_id.fetch_add(1, Ordering::SeqCst);
        let mut batch = WriteBatch::default();

        entry.log.id = log_id;
        batch.put_cf(&logs_cf, log_id.to_be_bytes(), serde_json::to_vec(&entry.log)?);

        for mut payment in entry.payments {
            payment.log_id = log_id;
            let mut key = [0u8; 16];
            key[..8].copy_from_slice(&log_id.to_be_bytes());
            key[8..].copy_from_slice(&payment.account_reference.to_be_bytes());
            batch.put_cf(&payments_cf, key, serde_json::to_vec(&payment)?);
        }

        if let Some(mut external) = entry.external {
            external.log_id = log_id;
            batch.put_cf(
                &externals_cf,
                external.transaction_id.as_bytes(),
                serde_json::to_vec(&external)?,
            );
        }

        for update in entry.subscription_updates {
            let subscription = Subscription {
                account_reference: update.account_reference,
                due_date: update.due_date,
                last_payment_date: Some(update.paid_at),
            };
            batch.put_cf(
                &subscriptions_cf,
                update.account_reference.to_be_bytes(),
                serde_json::to_vec(&subscription)?,
            );
        }

        self.db.write(batch)?;
        Ok(CommitOutcome::Committed { log_id })
    }

    async fn payment_logs(&self) -> Result<Vec<PaymentLogRecord>> {
        self.collect_cf(CF_LOGS)
    }

    async fn payments(&self) -> Result<Vec<PaymentRecord>> {
        self.collect_cf(CF_PAYMENTS)
    }

    async fn external_transactions(&self) -> Result<Vec<ExternalTransactionRecord>> {
        self.collect_cf(CF_EXTERNALS)
    }
}
