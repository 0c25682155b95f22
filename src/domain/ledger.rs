use super::account::{OrganizationAccount, SubAccount};
use super::payment::{Amount, BillingPeriod, GatewayDetails, PaymentMethod};
use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Row type recorded on every fan-out payment row.
pub const ACCOUNT_TYPE: &str = "account";

/// One row per accepted confirmation event, gateway or manual.
/// Immutable once committed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentLogRecord {
    /// Assigned by the ledger store at commit time.
    pub id: u64,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    /// The gateway's transaction id; absent for manual payments.
    pub external_transaction_ref: Option<String>,
    /// "single account" or "multiple accounts (N)".
    pub payment_type_label: String,
    pub payer_email: String,
    /// The reference the event targeted, organization or sub-account.
    pub billed_reference: u64,
    pub duration_months: u32,
    pub created_at: DateTime<Utc>,
}

/// One row per credited sub-account, linked to its [`PaymentLogRecord`].
///
/// The shares of one log always sum back to the log's amount.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRecord {
    /// Stamped by the ledger store at commit time.
    pub log_id: u64,
    pub amount_share: Decimal,
    pub paid_at: DateTime<Utc>,
    /// Owning organization's reg_no when the billed target was an
    /// organization; absent for individually billed sub-accounts.
    pub parent_reference: Option<u64>,
    pub account_reference: u64,
    pub account_type: String,
    pub duration_months: u32,
}

/// One row per accepted gateway event. The transaction id is globally unique
/// across all rows ever committed; that uniqueness is the idempotency anchor.
/// Never created for manual payments.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ExternalTransactionRecord {
    pub transaction_id: String,
    /// Stamped by the ledger store at commit time.
    pub log_id: u64,
    pub payload: String,
    pub received_at: DateTime<Utc>,
}

/// Pending subscription mutation applied inside the same commit as the
/// ledger rows. The new due date replaces the previous one outright.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SubscriptionUpdate {
    pub account_reference: u64,
    pub paid_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Result of attempting to commit a [`LedgerEntry`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CommitOutcome {
    Committed { log_id: u64 },
    /// The external transaction id was already claimed; nothing was written.
    DuplicateTransaction,
}

/// The full write burst for one accepted confirmation: one log row, one
/// payment row per credited sub-account, the raw gateway record when one
/// exists, and the subscription updates. Stores commit it atomically or not
/// at all.
#[derive(Debug, PartialEq, Clone)]
pub struct LedgerEntry {
    pub log: PaymentLogRecord,
    pub payments: Vec<PaymentRecord>,
    pub external: Option<ExternalTransactionRecord>,
    pub subscription_updates: Vec<SubscriptionUpdate>,
}

impl LedgerEntry {
    /// Entry crediting a single sub-account billed on its own reference.
    pub fn for_single(
        sub_account: &SubAccount,
        period: BillingPeriod,
        amount: Amount,
        payer_email: String,
        gateway: Option<&GatewayDetails>,
        paid_at: DateTime<Utc>,
    ) -> Self {
        let log = log_record(
            amount,
            "single account".to_string(),
            payer_email,
            sub_account.reg_no,
            period,
            gateway,
            paid_at,
        );
        let payments = vec![payment_record(
            amount.value(),
            sub_account.reg_no,
            None,
            period,
            paid_at,
        )];
        let subscription_updates = vec![subscription_update(sub_account.reg_no, period, paid_at)];

        Self {
            log,
            payments,
            external: external_record(gateway, paid_at),
            subscription_updates,
        }
    }

    /// Entry fanning one payment out across all of an organization's
    /// sub-accounts in equal shares.
    pub fn for_organization(
        organization: &OrganizationAccount,
        sub_accounts: &[SubAccount],
        period: BillingPeriod,
        amount: Amount,
        payer_email: String,
        gateway: Option<&GatewayDetails>,
        paid_at: DateTime<Utc>,
    ) -> Self {
        let n = sub_accounts.len() as u32;
        let share = amount.split_equally(n);
        if share * Decimal::from(n) != amount.value() {
            tracing::warn!(
                total = %amount.value(),
                accounts = n,
                "payment total does not divide evenly across sub-accounts"
            );
        }

        let log = log_record(
            amount,
            format!("multiple accounts ({n})"),
            payer_email,
            organization.reg_no,
            period,
            gateway,
            paid_at,
        );
        let payments = sub_accounts
            .iter()
            .map(|sub| {
                payment_record(share, sub.reg_no, Some(organization.reg_no), period, paid_at)
            })
            .collect();
        let subscription_updates = sub_accounts
            .iter()
            .map(|sub| subscription_update(sub.reg_no, period, paid_at))
            .collect();

        Self {
            log,
            payments,
            external: external_record(gateway, paid_at),
            subscription_updates,
        }
    }
}

fn log_record(
    amount: Amount,
    payment_type_label: String,
    payer_email: String,
    billed_reference: u64,
    period: BillingPeriod,
    gateway: Option<&GatewayDetails>,
    paid_at: DateTime<Utc>,
) -> PaymentLogRecord {
    PaymentLogRecord {
        id: 0,
        amount: amount.value(),
        payment_method: match gateway {
            Some(_) => PaymentMethod::MobileMoney,
            None => PaymentMethod::Manual,
        },
        external_transaction_ref: gateway.map(|g| g.transaction_id.clone()),
        payment_type_label,
        payer_email,
        billed_reference,
        duration_months: period.months(),
        created_at: paid_at,
    }
}

fn payment_record(
    amount_share: Decimal,
    account_reference: u64,
    parent_reference: Option<u64>,
    period: BillingPeriod,
    paid_at: DateTime<Utc>,
) -> PaymentRecord {
    PaymentRecord {
        log_id: 0,
        amount_share,
        paid_at,
        parent_reference,
        account_reference,
        account_type: ACCOUNT_TYPE.to_string(),
        duration_months: period.months(),
    }
}

fn external_record(
    gateway: Option<&GatewayDetails>,
    paid_at: DateTime<Utc>,
) -> Option<ExternalTransactionRecord> {
    gateway.map(|g| ExternalTransactionRecord {
        transaction_id: g.transaction_id.clone(),
        log_id: 0,
        payload: g.payload.clone(),
        received_at: paid_at,
    })
}

fn subscription_update(
    account_reference: u64,
    period: BillingPeriod,
    paid_at: DateTime<Utc>,
) -> SubscriptionUpdate {
    SubscriptionUpdate {
        account_reference,
        paid_at,
        due_date: paid_at + Months::new(period.months()),
    }
}
