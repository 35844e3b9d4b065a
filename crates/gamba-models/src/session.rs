use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved pseudo-user under which bot-wide aggregates are reported.
pub const GLOBAL_USER: &str = "*";

/// One logged batch of plays and the resources it yielded.
///
/// Immutable once persisted. Aggregation only ever derives new totals from
/// stored sessions, it never rewrites them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user: String,
    /// Number of individual gambles in this session.
    pub hands: u64,
    /// Raw gold won, in whole gold.
    pub gold: u64,
    pub ectoplasm: u64,
    pub runes: u64,
    pub recorded_at: DateTime<Utc>,
}

/// Field-wise sums over a group of sessions belonging to one user.
///
/// Derived on demand from the store; never independently persisted.
/// `last_recorded_at` is the maximum timestamp in the group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateTotals {
    pub user: String,
    pub hands: u64,
    pub gold: u64,
    pub ectoplasm: u64,
    pub runes: u64,
    pub last_recorded_at: DateTime<Utc>,
}

impl From<Session> for AggregateTotals {
    fn from(session: Session) -> Self {
        Self {
            user: session.user,
            hands: session.hands,
            gold: session.gold,
            ectoplasm: session.ectoplasm,
            runes: session.runes,
            last_recorded_at: session.recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_session() -> Session {
        Session {
            user: "silver".to_string(),
            hands: 2,
            gold: 200,
            ectoplasm: 650,
            runes: 1,
            recorded_at: Utc.with_ymd_and_hms(2024, 6, 1, 20, 15, 0).unwrap(),
        }
    }

    #[test]
    fn roundtrip_session() {
        let session = sample_session();
        let json = serde_json::to_string(&session).unwrap();
        let deserialized: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(session, deserialized);
    }

    #[test]
    fn totals_from_session() {
        let session = sample_session();
        let totals = AggregateTotals::from(session.clone());
        assert_eq!(totals.user, session.user);
        assert_eq!(totals.hands, session.hands);
        assert_eq!(totals.gold, session.gold);
        assert_eq!(totals.ectoplasm, session.ectoplasm);
        assert_eq!(totals.runes, session.runes);
        assert_eq!(totals.last_recorded_at, session.recorded_at);
    }

    #[test]
    fn roundtrip_totals() {
        let totals = AggregateTotals::from(sample_session());
        let json = serde_json::to_string(&totals).unwrap();
        let deserialized: AggregateTotals = serde_json::from_str(&json).unwrap();
        assert_eq!(totals, deserialized);
    }
}
