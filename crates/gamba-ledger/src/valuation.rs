use gamba_models::{AggregateTotals, CostConfig};
use gamba_prices::{ItemPrices, PriceCache};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Per-hand cost of playing: a flat gold fee plus a number of ectos valued
/// at the cached ecto price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub flat_gold_per_hand: Decimal,
    pub ectos_per_hand: Decimal,
}

impl From<&CostConfig> for CostModel {
    fn from(config: &CostConfig) -> Self {
        Self {
            flat_gold_per_hand: Decimal::from(config.flat_gold_per_hand),
            ectos_per_hand: Decimal::from(config.ectos_per_hand),
        }
    }
}

/// Net and per-hand value of a group of sessions, in gold.
///
/// Full precision is kept internally; rounding to two decimal places
/// happens only at the display boundary via [`Valuation::rounded`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Valuation {
    pub net: Decimal,
    pub average: Decimal,
}

impl Valuation {
    pub fn rounded(&self) -> (Decimal, Decimal) {
        (self.net.round_dp(2), self.average.round_dp(2))
    }
}

/// Value totals against a fixed price view.
///
/// With zero hands the average is defined as zero rather than an error, so
/// empty aggregates rank neutrally instead of failing the whole query.
pub fn valuate(totals: &AggregateTotals, prices: &ItemPrices, cost: &CostModel) -> Valuation {
    let hands = Decimal::from(totals.hands);
    let spent = hands * (cost.flat_gold_per_hand + cost.ectos_per_hand * prices.ectoplasm);
    let gained = Decimal::from(totals.gold)
        + Decimal::from(totals.ectoplasm) * prices.ectoplasm
        + Decimal::from(totals.runes) * prices.rune;
    let net = gained - spent;
    let average = if totals.hands == 0 {
        Decimal::ZERO
    } else {
        net / hands
    };
    Valuation { net, average }
}

/// Value totals against the current cached prices, refreshing stale
/// entries through the cache's source.
pub async fn valuate_cached(
    totals: &AggregateTotals,
    cache: &PriceCache,
    cost: &CostModel,
) -> Result<Valuation, LedgerError> {
    let prices = cache.snapshot().await?;
    Ok(valuate(totals, &prices, cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    fn totals(hands: u64, gold: u64, ectos: u64, runes: u64) -> AggregateTotals {
        AggregateTotals {
            user: "silver".to_string(),
            hands,
            gold,
            ectoplasm: ectos,
            runes,
            last_recorded_at: DateTime::<Utc>::from_timestamp(100, 0).unwrap(),
        }
    }

    fn default_cost() -> CostModel {
        CostModel::from(&CostConfig::default())
    }

    #[test]
    fn reference_scenario() {
        // 2 hands, 200 gold, 650 ectos, 1 rune at ecto=1.0, rune=5.0:
        // spent = 2 * (100 + 250 * 1.0) = 700
        // gained = 200 + 650 * 1.0 + 1 * 5.0 = 855
        let prices = ItemPrices {
            ectoplasm: dec!(1.0),
            rune: dec!(5.0),
        };
        let valuation = valuate(&totals(2, 200, 650, 1), &prices, &default_cost());
        assert_eq!(valuation.net, dec!(155));
        assert_eq!(valuation.average, dec!(77.5));
    }

    #[test]
    fn valuate_is_deterministic_for_fixed_prices() {
        let prices = ItemPrices {
            ectoplasm: dec!(0.2551),
            rune: dec!(4.87),
        };
        let t = totals(7, 123, 2045, 3);
        let first = valuate(&t, &prices, &default_cost());
        let second = valuate(&t, &prices, &default_cost());
        assert_eq!(first, second);
    }

    #[test]
    fn zero_hands_average_is_zero() {
        let prices = ItemPrices {
            ectoplasm: dec!(1.0),
            rune: dec!(5.0),
        };
        let valuation = valuate(&totals(0, 100, 0, 0), &prices, &default_cost());
        assert_eq!(valuation.net, dec!(100));
        assert_eq!(valuation.average, Decimal::ZERO);
    }

    #[test]
    fn rounding_is_display_only() {
        let prices = ItemPrices {
            ectoplasm: dec!(0.3333),
            rune: dec!(5.0),
        };
        // 1 hand, 1 ecto won: net = 1 * 0.3333 - (100 + 250 * 0.3333)
        let valuation = valuate(&totals(1, 0, 1, 0), &prices, &default_cost());
        assert_eq!(valuation.net, dec!(-182.9917));

        let (net, average) = valuation.rounded();
        assert_eq!(net, dec!(-182.99));
        assert_eq!(average, dec!(-182.99));
    }

    #[test]
    fn cost_model_from_config() {
        let cost = default_cost();
        assert_eq!(cost.flat_gold_per_hand, dec!(100));
        assert_eq!(cost.ectos_per_hand, dec!(250));
    }
}
