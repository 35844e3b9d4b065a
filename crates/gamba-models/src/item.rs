use serde::{Deserialize, Serialize};

/// The fixed set of tradeable items the ledger prices sessions against.
///
/// Each variant maps to a trading-post API id. Quantities of anything else
/// won during a session are counted as raw gold by the front-end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Ectoplasm,
    Rune,
}

impl Item {
    pub const ALL: [Item; 2] = [Item::Ectoplasm, Item::Rune];

    /// Trading-post API id used when fetching a quote for this item.
    pub fn api_id(&self) -> u32 {
        match self {
            Item::Ectoplasm => 19_721,
            Item::Rune => 83_410,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Item::Ectoplasm => "ectoplasm",
            Item::Rune => "rune",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_ids() {
        assert_eq!(Item::Ectoplasm.api_id(), 19_721);
        assert_eq!(Item::Rune.api_id(), 83_410);
    }

    #[test]
    fn item_serialization() {
        assert_eq!(
            serde_json::to_string(&Item::Ectoplasm).unwrap(),
            "\"ectoplasm\""
        );
        assert_eq!(serde_json::to_string(&Item::Rune).unwrap(), "\"rune\"");
    }

    #[test]
    fn all_covers_every_variant() {
        assert_eq!(Item::ALL.len(), 2);
        assert!(Item::ALL.contains(&Item::Ectoplasm));
        assert!(Item::ALL.contains(&Item::Rune));
    }
}
