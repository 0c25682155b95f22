use super::account::{OrganizationAccount, SubAccount, Subscription};
use super::ledger::{
    CommitOutcome, ExternalTransactionRecord, LedgerEntry, PaymentLogRecord, PaymentRecord,
};
use super::payment::BillingPeriod;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Read-only directory mapping external references to billed entities.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_organization(&self, reg_no: u64) -> Result<Option<OrganizationAccount>>;
    async fn organization_sub_accounts(&self, reg_no: u64) -> Result<Vec<SubAccount>>;
    async fn find_sub_account(&self, reg_no: u64) -> Result<Option<SubAccount>>;
}

/// External pricing collaborator: the one correct total for a
/// (duration, account-count) pair. Totals for the supported tiers are
/// price-disjoint for any fixed count.
#[async_trait]
pub trait PricingOracle: Send + Sync {
    async fn total_price(&self, period: BillingPeriod, accounts: u32) -> Result<Decimal>;
}

/// Read side of the per sub-account billing window.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn subscription(&self, account_reference: u64) -> Result<Option<Subscription>>;
}

/// Transactional ledger. `commit` persists the whole entry or nothing:
/// log row, fan-out payments, raw gateway record, and subscription updates
/// land in one atomic unit, with the external transaction id enforced
/// unique across all entries ever committed.
#[async_trait]
pub trait LedgerStore: SubscriptionStore {
    async fn commit(&self, entry: LedgerEntry) -> Result<CommitOutcome>;

    async fn payment_logs(&self) -> Result<Vec<PaymentLogRecord>>;
    async fn payments(&self) -> Result<Vec<PaymentRecord>>;
    async fn external_transactions(&self) -> Result<Vec<ExternalTransactionRecord>>;
}

pub type DirectoryBox = Box<dyn AccountDirectory>;
pub type OracleBox = Box<dyn PricingOracle>;
pub type LedgerBox = Box<dyn LedgerStore>;
