use gamba_models::AggregateTotals;

use crate::error::LedgerError;

/// Merge two totals belonging to the same user: field-wise sums, with the
/// later timestamp winning.
///
/// Associative and commutative over the numeric fields, so incremental
/// aggregation is safe regardless of merge order. A user mismatch is a
/// collaborator-layer bug and always surfaces as an error.
pub fn merge(a: &AggregateTotals, b: &AggregateTotals) -> Result<AggregateTotals, LedgerError> {
    if a.user != b.user {
        return Err(LedgerError::UserMismatch {
            left: a.user.clone(),
            right: b.user.clone(),
        });
    }
    Ok(AggregateTotals {
        user: a.user.clone(),
        hands: a.hands + b.hands,
        gold: a.gold + b.gold,
        ectoplasm: a.ectoplasm + b.ectoplasm,
        runes: a.runes + b.runes,
        last_recorded_at: a.last_recorded_at.max(b.last_recorded_at),
    })
}
