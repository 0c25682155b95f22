use crate::domain::payment::BillingPeriod;
use crate::domain::ports::PricingOracle;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rate-table pricing oracle.
///
/// Holds one per-account rate per billing period; the total for a target is
/// `rate * account_count`. Because the total scales linearly with the count,
/// every total divides evenly back into per-account shares, which the ledger
/// fan-out relies on. Rates must be pairwise distinct so that at most one
/// period can match a submitted amount.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TierPricing {
    pub one_month: Decimal,
    pub six_months: Decimal,
    pub twelve_months: Decimal,
}

impl Default for TierPricing {
    fn default() -> Self {
        Self {
            one_month: dec!(1500),
            six_months: dec!(7500),
            twelve_months: dec!(12000),
        }
    }
}

impl TierPricing {
    pub fn rate(&self, period: BillingPeriod) -> Decimal {
        match period {
            BillingPeriod::OneMonth => self.one_month,
            BillingPeriod::SixMonths => self.six_months,
            BillingPeriod::TwelveMonths => self.twelve_months,
        }
    }
}

#[async_trait]
impl PricingOracle for TierPricing {
    async fn total_price(&self, period: BillingPeriod, accounts: u32) -> Result<Decimal> {
        Ok(self.rate(period) * Decimal::from(accounts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_total_scales_with_account_count() {
        let pricing = TierPricing::default();

        assert_eq!(
            pricing
                .total_price(BillingPeriod::OneMonth, 1)
                .await
                .unwrap(),
            dec!(1500)
        );
        assert_eq!(
            pricing
                .total_price(BillingPeriod::OneMonth, 4)
                .await
                .unwrap(),
            dec!(6000)
        );
        assert_eq!(
            pricing
                .total_price(BillingPeriod::TwelveMonths, 2)
                .await
                .unwrap(),
            dec!(24000)
        );
    }

    #[tokio::test]
    async fn test_totals_divide_evenly_for_every_tier() {
        let pricing = TierPricing::default();

        for period in BillingPeriod::ALL {
            for accounts in 1..=10u32 {
                let total = pricing.total_price(period, accounts).await.unwrap();
                let share = total / Decimal::from(accounts);
                assert_eq!(share * Decimal::from(accounts), total);
                assert_eq!(share, pricing.rate(period));
            }
        }
    }

    #[test]
    fn test_rates_are_price_disjoint() {
        let pricing = TierPricing::default();
        assert_ne!(pricing.one_month, pricing.six_months);
        assert_ne!(pricing.six_months, pricing.twelve_months);
        assert_ne!(pricing.one_month, pricing.twelve_months);
    }

    #[test]
    fn test_deserializes_from_config_json() {
        let pricing: TierPricing = serde_json::from_str(
            r#"{"one_month":"990","six_months":"4990","twelve_months":"8990"}"#,
        )
        .unwrap();
        assert_eq!(pricing.one_month, dec!(990));
    }
}
