use serde::{Deserialize, Serialize};

/// Top-level configuration for gamba.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GambaConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub prices: PricesConfig,
    #[serde(default)]
    pub costs: CostConfig,
}

/// Configuration for the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite session database.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sqlite_path: default_sqlite_path(),
        }
    }
}

/// Configuration for the price cache and its external source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricesConfig {
    /// Base URL of the trading-post price endpoint. The item API id is
    /// appended as a path segment.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// How long a fetched price stays fresh before the next request
    /// triggers a refresh.
    #[serde(default = "default_price_ttl")]
    pub ttl_seconds: u64,
    /// Bound on a single price fetch round-trip.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// When true, a failed refresh falls back to the previously cached
    /// value instead of erroring. Off by default: stale prices are served
    /// only on explicit opt-in.
    #[serde(default)]
    pub serve_stale_on_error: bool,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            ttl_seconds: default_price_ttl(),
            request_timeout_seconds: default_request_timeout(),
            serve_stale_on_error: false,
        }
    }
}

/// Per-hand cost of playing, in the two resources a hand consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostConfig {
    /// Flat gold paid per hand.
    #[serde(default = "default_flat_gold_per_hand")]
    pub flat_gold_per_hand: u64,
    /// Ectos paid per hand, valued at the cached ecto price.
    #[serde(default = "default_ectos_per_hand")]
    pub ectos_per_hand: u64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            flat_gold_per_hand: default_flat_gold_per_hand(),
            ectos_per_hand: default_ectos_per_hand(),
        }
    }
}

fn default_sqlite_path() -> String {
    "data/gamba.db".to_string()
}
fn default_api_base_url() -> String {
    "https://api.guildwars2.com/v2/commerce/prices".to_string()
}
fn default_price_ttl() -> u64 {
    1800
}
fn default_request_timeout() -> u64 {
    10
}
fn default_flat_gold_per_hand() -> u64 {
    100
}
fn default_ectos_per_hand() -> u64 {
    250
}
