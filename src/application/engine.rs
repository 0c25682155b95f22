use super::matcher::{AmountMatcher, MatchResult};
use super::resolver::{AccountResolver, ResolveResult};
use crate::domain::ledger::{CommitOutcome, LedgerEntry};
use crate::domain::outcome::{IgnoreReason, Outcome, Rejection};
use crate::domain::payment::{Amount, PaymentMethod, PaymentRequest, RequestType};
use crate::domain::ports::{DirectoryBox, LedgerBox, OracleBox};
use crate::error::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

/// The AcceptPayment orchestrator.
///
/// One call per inbound event, gateway callback or administrative action.
/// Every business failure is folded into the returned [`Outcome`]; `Err` only
/// surfaces infrastructure faults. Persistence happens if and only if the
/// request is a confirmation and the outcome is accepted, and then as one
/// atomic commit through the ledger port.
pub struct PaymentEngine {
    directory: DirectoryBox,
    oracle: OracleBox,
    ledger: LedgerBox,
}

impl PaymentEngine {
    pub fn new(directory: DirectoryBox, oracle: OracleBox, ledger: LedgerBox) -> Self {
        Self {
            directory,
            oracle,
            ledger,
        }
    }

    pub async fn accept_payment(&self, request: PaymentRequest) -> Result<Outcome> {
        let Some(method) = PaymentMethod::parse(&request.payment_method) else {
            debug!(method = %request.payment_method, "dropping event with unrecognized payment method");
            return Ok(Outcome::Ignored(IgnoreReason::UnknownPaymentMethod));
        };

        let Some(amount) = Amount::parse(&request.amount) else {
            debug!(amount = %request.amount, "dropping event with unparseable amount");
            return Ok(Outcome::Ignored(IgnoreReason::MalformedInput));
        };

        let resolver = AccountResolver::new(self.directory.as_ref());
        let resolved = match resolver.resolve(&request.account_ref).await? {
            ResolveResult::Malformed => {
                debug!(reference = %request.account_ref, "dropping event with unparseable account reference");
                return Ok(Outcome::Ignored(IgnoreReason::MalformedInput));
            }
            ResolveResult::NotFound => {
                warn!(reference = %request.account_ref, "account reference not recognized");
                return Ok(Outcome::Rejected(Rejection::UnknownAccount));
            }
            found => found,
        };

        let account_count = match &resolved {
            ResolveResult::Organization { sub_accounts, .. } => sub_accounts.len() as u32,
            _ => 1,
        };
        // An organization with no sub-accounts has nothing to bill; no oracle
        // price can exist for it.
        if account_count == 0 {
            warn!(reference = %request.account_ref, "organization has no sub-accounts to credit");
            return Ok(Outcome::Rejected(Rejection::UnknownAccount));
        }

        let matcher = AmountMatcher::new(self.oracle.as_ref());
        let period = match matcher.match_amount(amount, account_count).await? {
            MatchResult::Matched(period) => period,
            MatchResult::Mismatch => {
                warn!(
                    amount = %amount.value(),
                    accounts = account_count,
                    "submitted amount matches no priced tier"
                );
                return Ok(Outcome::Rejected(Rejection::WrongAmount));
            }
        };

        if request.request_type == RequestType::Validation {
            return Ok(Outcome::Accepted { persisted: false });
        }

        // Confirmation path. Gateway payments must carry their external
        // transaction fields; a mobile-money confirmation without them is a
        // boundary defect and is dropped like any other malformed input.
        let gateway = match method {
            PaymentMethod::MobileMoney => match request.gateway.as_ref() {
                Some(details) => Some(details),
                None => {
                    debug!("mobile money confirmation without transaction details");
                    return Ok(Outcome::Ignored(IgnoreReason::MalformedInput));
                }
            },
            PaymentMethod::Manual => None,
        };

        let paid_at = Utc::now();
        let entry = match resolved {
            ResolveResult::Organization {
                organization,
                sub_accounts,
            } => {
                let payer_email = request
                    .payer_email
                    .clone()
                    .unwrap_or_else(|| organization.owner_email.clone());
                LedgerEntry::for_organization(
                    &organization,
                    &sub_accounts,
                    period,
                    amount,
                    payer_email,
                    gateway,
                    paid_at,
                )
            }
            ResolveResult::Single(sub_account) => LedgerEntry::for_single(
                &sub_account,
                period,
                amount,
                request.payer_email.clone().unwrap_or_default(),
                gateway,
                paid_at,
            ),
            // Both handled above.
            ResolveResult::NotFound | ResolveResult::Malformed => unreachable!(),
        };

        match self.ledger.commit(entry).await? {
            CommitOutcome::Committed { log_id } => {
                info!(
                    log_id,
                    reference = %request.account_ref,
                    amount = %amount.value(),
                    months = period.months(),
                    accounts = account_count,
                    "payment confirmed"
                );
                Ok(Outcome::Accepted { persisted: true })
            }
            CommitOutcome::DuplicateTransaction => {
                debug!(reference = %request.account_ref, "duplicate gateway transaction ignored");
                Ok(Outcome::Ignored(IgnoreReason::DuplicateTransaction))
            }
        }
    }
}
