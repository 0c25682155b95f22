use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the payment reached us.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Mobile-money gateway callback, carries an external transaction id.
    MobileMoney,
    /// Administrator-initiated payment, no external id exists.
    Manual,
}

impl PaymentMethod {
    /// Parses the raw method field from the boundary. Anything unrecognized
    /// is `None` and must be dropped silently by the orchestrator.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "mobile_money" => Some(Self::MobileMoney),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// Gateway callbacks arrive in two phases: validation pre-checks without
/// persisting, confirmation persists.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Validation,
    Confirmation,
}

/// A submitted monetary amount.
///
/// Wraps `rust_decimal::Decimal`; gateway amounts arrive as strings and are
/// parsed here, so a non-numeric amount never reaches the matcher.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Decimal::from_str(raw.trim()).ok().map(Self)
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// Equal division across `n` credited accounts. The pricing catalog is
    /// expected to produce totals that divide evenly for every supported tier.
    pub fn split_equally(self, n: u32) -> Decimal {
        self.0 / Decimal::from(n)
    }
}

/// The supported subscription duration tiers.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    OneMonth,
    SixMonths,
    TwelveMonths,
}

impl BillingPeriod {
    pub const ALL: [BillingPeriod; 3] = [Self::OneMonth, Self::SixMonths, Self::TwelveMonths];

    pub fn months(self) -> u32 {
        match self {
            Self::OneMonth => 1,
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
        }
    }

    pub fn from_months(months: u32) -> Option<Self> {
        match months {
            1 => Some(Self::OneMonth),
            6 => Some(Self::SixMonths),
            12 => Some(Self::TwelveMonths),
            _ => None,
        }
    }
}

/// External transaction fields carried by gateway-originated payments.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct GatewayDetails {
    /// The gateway's transaction id, the idempotency key.
    pub transaction_id: String,
    /// Full raw callback payload, preserved verbatim for audit.
    pub payload: String,
}

/// The normalized request the boundary hands to the orchestrator, one per
/// inbound event. Account reference and amount stay raw strings; parsing them
/// is the orchestrator's first stage.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct PaymentRequest {
    pub payment_method: String,
    pub request_type: RequestType,
    pub account_ref: String,
    pub amount: String,
    pub payer_email: Option<String>,
    pub gateway: Option<GatewayDetails>,
}
