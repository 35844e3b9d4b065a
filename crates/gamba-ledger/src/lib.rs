//! Aggregation and valuation over gamble sessions: merging session totals,
//! valuing them against cached item prices, and ranking for leaderboards.

pub mod error;
pub mod rank;
pub mod totals;
pub mod valuation;

pub use error::LedgerError;
pub use rank::{rank, rank_cached, RankBy, RankOrder, RankedEntry};
pub use totals::merge;
pub use valuation::{valuate, valuate_cached, CostModel, Valuation};
