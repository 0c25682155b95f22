use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The top-level billed entity. Owns zero or more [`SubAccount`]s.
///
/// Created and destroyed by the surrounding account-management system; the
/// engine only reads it when resolving an inbound payment reference.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct OrganizationAccount {
    /// The unique registration number used as the external account reference.
    pub reg_no: u64,
    /// Owner contact, used for display and as the payer fallback on ledger rows.
    pub owner_email: String,
}

/// An individually billed seat. Belongs to exactly one [`OrganizationAccount`]
/// and owns exactly one [`Subscription`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SubAccount {
    /// The sub-account's own unique registration number.
    pub reg_no: u64,
    /// `reg_no` of the owning organization.
    pub organization: u64,
}

/// Per sub-account billing window.
///
/// Mutated only as a direct consequence of a successfully committed payment:
/// `due_date` is always replaced with `paid_at + period`, never extended from
/// the previous value.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Subscription {
    pub account_reference: u64,
    pub due_date: DateTime<Utc>,
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_date
    }

    /// Whole days remaining before expiry, floored at zero.
    pub fn days_to_go(&self, now: DateTime<Utc>) -> i64 {
        (self.due_date - now).num_days().max(0)
    }
}
