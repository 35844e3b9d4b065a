use gamba_models::AggregateTotals;
use gamba_prices::{ItemPrices, PriceCache};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::valuation::{valuate, CostModel, Valuation};

/// Which valuation field a leaderboard sorts on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    Net,
    Average,
}

/// Descending selects winners; ascending selects the deepest losers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    Descending,
    Ascending,
}

/// One leaderboard row: the totals plus their valuation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEntry {
    pub totals: AggregateTotals,
    pub valuation: Valuation,
}

/// Rank totals by net or average value against a fixed price view.
///
/// The sort is stable: entries with equal values keep their input order.
pub fn rank(
    totals: &[AggregateTotals],
    prices: &ItemPrices,
    cost: &CostModel,
    by: RankBy,
    order: RankOrder,
    limit: usize,
) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = totals
        .iter()
        .map(|t| RankedEntry {
            totals: t.clone(),
            valuation: valuate(t, prices, cost),
        })
        .collect();

    entries.sort_by(|a, b| {
        let (x, y) = match by {
            RankBy::Net => (a.valuation.net, b.valuation.net),
            RankBy::Average => (a.valuation.average, b.valuation.average),
        };
        match order {
            RankOrder::Descending => y.cmp(&x),
            RankOrder::Ascending => x.cmp(&y),
        }
    });

    entries.truncate(limit);
    entries
}

/// Rank totals against the current cached prices.
pub async fn rank_cached(
    totals: &[AggregateTotals],
    cache: &PriceCache,
    cost: &CostModel,
    by: RankBy,
    order: RankOrder,
    limit: usize,
) -> Result<Vec<RankedEntry>, LedgerError> {
    let prices = cache.snapshot().await?;
    let entries = rank(totals, &prices, cost, by, order, limit);
    tracing::debug!(candidates = totals.len(), ranked = entries.len(), "Ranked leaderboard");
    Ok(entries)
}
