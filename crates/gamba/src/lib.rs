//! gamba - a gamble session ledger.
//!
//! Records gambling sessions, persists them in SQLite, and derives totals
//! and leaderboards valued against cached trading-post prices.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use gamba::models::{GambaConfig, Session};
//! use gamba::ledger::{valuate_cached, CostModel};
//! use gamba::{build_price_cache, open_store};
//! ```

pub use gamba_ledger as ledger;
pub use gamba_models as models;
pub use gamba_prices as prices;
pub use gamba_store as store;

use std::sync::Arc;
use std::time::Duration;

use gamba_models::GambaConfig;
use gamba_prices::{PriceCache, PriceError, SystemClock, TradingPostSource};
use gamba_store::{SessionStore, StoreError};

/// Build the price cache from configuration, wired to the live
/// trading-post API and the system clock.
pub fn build_price_cache(config: &GambaConfig) -> Result<PriceCache, PriceError> {
    let source = TradingPostSource::new(
        config.prices.api_base_url.clone(),
        Duration::from_secs(config.prices.request_timeout_seconds),
    )?;
    Ok(PriceCache::with_policy(
        Arc::new(source),
        Arc::new(SystemClock),
        Duration::from_secs(config.prices.ttl_seconds),
        config.prices.serve_stale_on_error,
    ))
}

/// Open the session store at the configured path.
pub fn open_store(config: &GambaConfig) -> Result<SessionStore, StoreError> {
    SessionStore::open(&config.store.sqlite_path)
}
