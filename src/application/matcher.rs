use crate::domain::payment::{Amount, BillingPeriod};
use crate::domain::ports::PricingOracle;
use crate::error::Result;

/// Result of reverse-matching a submitted amount against the priced tiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MatchResult {
    Matched(BillingPeriod),
    Mismatch,
}

/// Finds the unique billing period whose oracle total equals the submitted
/// amount for the resolved account count. The tiers are price-disjoint, so
/// the first match is the only match.
pub struct AmountMatcher<'a> {
    oracle: &'a dyn PricingOracle,
}

impl<'a> AmountMatcher<'a> {
    pub fn new(oracle: &'a dyn PricingOracle) -> Self {
        Self { oracle }
    }

    pub async fn match_amount(&self, amount: Amount, accounts: u32) -> Result<MatchResult> {
        for period in BillingPeriod::ALL {
            let expected = self.oracle.total_price(period, accounts).await?;
            if expected == amount.value() {
                return Ok(MatchResult::Matched(period));
            }
        }
        Ok(MatchResult::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pricing::TierPricing;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_matches_each_tier() {
        let oracle = TierPricing::default();
        let matcher = AmountMatcher::new(&oracle);

        assert_eq!(
            matcher
                .match_amount(Amount::new(dec!(1500)), 1)
                .await
                .unwrap(),
            MatchResult::Matched(BillingPeriod::OneMonth)
        );
        assert_eq!(
            matcher
                .match_amount(Amount::new(dec!(7500)), 1)
                .await
                .unwrap(),
            MatchResult::Matched(BillingPeriod::SixMonths)
        );
        assert_eq!(
            matcher
                .match_amount(Amount::new(dec!(12000)), 1)
                .await
                .unwrap(),
            MatchResult::Matched(BillingPeriod::TwelveMonths)
        );
    }

    #[tokio::test]
    async fn test_scales_with_account_count() {
        let oracle = TierPricing::default();
        let matcher = AmountMatcher::new(&oracle);

        assert_eq!(
            matcher
                .match_amount(Amount::new(dec!(3000)), 2)
                .await
                .unwrap(),
            MatchResult::Matched(BillingPeriod::OneMonth)
        );
        // The single-account total is not a valid two-account total.
        assert_eq!(
            matcher
                .match_amount(Amount::new(dec!(1500)), 2)
                .await
                .unwrap(),
            MatchResult::Mismatch
        );
    }

    #[tokio::test]
    async fn test_off_by_one_amount_is_a_mismatch() {
        let oracle = TierPricing::default();
        let matcher = AmountMatcher::new(&oracle);

        assert_eq!(
            matcher
                .match_amount(Amount::new(dec!(1499)), 1)
                .await
                .unwrap(),
            MatchResult::Mismatch
        );
        assert_eq!(
            matcher
                .match_amount(Amount::new(dec!(0)), 1)
                .await
                .unwrap(),
            MatchResult::Mismatch
        );
    }
}
