use crate::domain::payment::{GatewayDetails, PaymentRequest, RequestType};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Read};

/// Raw mobile-money gateway callback, field names as delivered on the wire.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct GatewayCallback {
    #[serde(rename = "TransactionType", default)]
    pub transaction_type: String,
    #[serde(rename = "TransID")]
    pub trans_id: String,
    #[serde(rename = "TransTime", default)]
    pub trans_time: String,
    #[serde(rename = "TransAmount")]
    pub trans_amount: String,
    #[serde(rename = "BusinessShortCode", default)]
    pub business_short_code: String,
    /// The account reference the payer typed in; resolves to an organization
    /// or sub-account registration number.
    #[serde(rename = "BillRefNumber")]
    pub bill_ref_number: String,
    #[serde(rename = "InvoiceNumber", default)]
    pub invoice_number: String,
    #[serde(rename = "OrgAccountBalance", default)]
    pub org_account_balance: String,
    #[serde(rename = "ThirdPartyTransID", default)]
    pub third_party_trans_id: String,
    #[serde(rename = "MSISDN", default)]
    pub msisdn: String,
    #[serde(rename = "FirstName", default)]
    pub first_name: String,
    #[serde(rename = "MiddleName", default)]
    pub middle_name: String,
    #[serde(rename = "LastName", default)]
    pub last_name: String,
}

impl GatewayCallback {
    /// Normalizes the callback into the orchestrator's request shape,
    /// preserving the full payload for the raw-transaction row.
    pub fn into_request(self, request_type: RequestType) -> Result<PaymentRequest> {
        let payload = serde_json::to_string(&self)?;
        Ok(PaymentRequest {
            payment_method: "mobile_money".to_string(),
            request_type,
            account_ref: self.bill_ref_number,
            amount: self.trans_amount,
            payer_email: None,
            gateway: Some(GatewayDetails {
                transaction_id: self.trans_id,
                payload,
            }),
        })
    }
}

/// One inbound event as read from the boundary: a gateway callback in either
/// phase, or an administrator-entered manual payment.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    Validation {
        #[serde(flatten)]
        callback: GatewayCallback,
    },
    Confirmation {
        #[serde(flatten)]
        callback: GatewayCallback,
    },
    ManualPayment {
        account_ref: String,
        amount: String,
        #[serde(default)]
        payer_email: Option<String>,
    },
}

impl InboundEvent {
    pub fn into_request(self) -> Result<PaymentRequest> {
        match self {
            Self::Validation { callback } => callback.into_request(RequestType::Validation),
            Self::Confirmation { callback } => callback.into_request(RequestType::Confirmation),
            Self::ManualPayment {
                account_ref,
                amount,
                payer_email,
            } => Ok(PaymentRequest {
                payment_method: "manual".to_string(),
                request_type: RequestType::Confirmation,
                account_ref,
                amount,
                payer_email,
                gateway: None,
            }),
        }
    }
}

/// Reads inbound events from a line-delimited JSON source.
///
/// Wraps any `Read` and yields `Result<InboundEvent>` lazily, so large event
/// files stream without being loaded whole.
pub struct CallbackReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> CallbackReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Iterator over the events in the source. Blank lines are skipped.
    pub fn events(self) -> impl Iterator<Item = Result<InboundEvent>> {
        self.reader
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|line| {
                let line = line.map_err(PaymentError::from)?;
                serde_json::from_str(&line).map_err(PaymentError::from)
            })
    }
}
