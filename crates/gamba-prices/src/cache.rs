use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use gamba_models::Item;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::error::PriceError;
use crate::source::PriceSource;

/// A cached quote: the price and the instant it was fetched.
/// The pair is only ever replaced as a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedItem {
    pub price: Decimal,
    pub fetched_at: DateTime<Utc>,
}

/// A fixed view of both tradeable item prices, taken from the cache in one
/// call. Valuation against one snapshot is deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPrices {
    pub ectoplasm: Decimal,
    pub rune: Decimal,
}

impl ItemPrices {
    pub fn price_of(&self, item: Item) -> Decimal {
        match item {
            Item::Ectoplasm => self.ectoplasm,
            Item::Rune => self.rune,
        }
    }
}

/// Time-bounded cache of item prices.
///
/// One entry per item for the process lifetime. An entry is stale once the
/// time since its fetch exceeds the TTL; the first request for an item
/// always fetches. Refresh happens lazily on the read path - there is no
/// background refresh task.
///
/// Each entry sits behind its own async mutex, so concurrent readers of the
/// same stale item are single-flighted: the first holder fetches, the rest
/// see the refreshed entry.
pub struct PriceCache {
    source: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    serve_stale_on_error: bool,
    ectoplasm: Mutex<Option<PricedItem>>,
    rune: Mutex<Option<PricedItem>>,
}

impl PriceCache {
    pub fn new(
        source: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
        ttl: std::time::Duration,
    ) -> Self {
        Self::with_policy(source, clock, ttl, false)
    }

    /// Like [`PriceCache::new`], with the serve-stale-on-error fallback as
    /// an explicit opt-in. By default a failed refresh is loud rather than
    /// silently serving possibly-ancient data.
    pub fn with_policy(
        source: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
        ttl: std::time::Duration,
        serve_stale_on_error: bool,
    ) -> Self {
        Self {
            source,
            clock,
            ttl: Duration::seconds(ttl.as_secs() as i64),
            serve_stale_on_error,
            ectoplasm: Mutex::new(None),
            rune: Mutex::new(None),
        }
    }

    fn entry(&self, item: Item) -> &Mutex<Option<PricedItem>> {
        match item {
            Item::Ectoplasm => &self.ectoplasm,
            Item::Rune => &self.rune,
        }
    }

    /// Current price of an item in gold, refreshing through the source when
    /// the cached entry is missing or stale.
    pub async fn price_of(&self, item: Item) -> Result<Decimal, PriceError> {
        let mut entry = self.entry(item).lock().await;
        let now = self.clock.now();

        if let Some(cached) = entry.as_ref() {
            if now - cached.fetched_at <= self.ttl {
                return Ok(cached.price);
            }
        }

        match self.source.fetch(item).await {
            Ok(price) => {
                *entry = Some(PricedItem {
                    price,
                    fetched_at: self.clock.now(),
                });
                tracing::debug!(
                    item = item.label(),
                    %price,
                    source = self.source.name(),
                    "Refreshed item price"
                );
                Ok(price)
            }
            Err(e) => {
                if self.serve_stale_on_error {
                    if let Some(cached) = entry.as_ref() {
                        tracing::warn!(
                            item = item.label(),
                            error = %e,
                            "Price refresh failed, serving stale value"
                        );
                        return Ok(cached.price);
                    }
                }
                Err(e)
            }
        }
    }

    /// The cached entry for an item, if any, without triggering a fetch.
    pub async fn peek(&self, item: Item) -> Option<PricedItem> {
        *self.entry(item).lock().await
    }

    /// Read-through both item prices as one fixed view.
    pub async fn snapshot(&self) -> Result<ItemPrices, PriceError> {
        Ok(ItemPrices {
            ectoplasm: self.price_of(Item::Ectoplasm).await?,
            rune: self.price_of(Item::Rune).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ManualClock, MockPriceSource};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    const TTL: std::time::Duration = std::time::Duration::from_secs(1800);

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn setup() -> (Arc<MockPriceSource>, Arc<ManualClock>, PriceCache) {
        let source = Arc::new(
            MockPriceSource::new()
                .with_price(Item::Ectoplasm, dec!(0.25))
                .with_price(Item::Rune, dec!(5.0)),
        );
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = PriceCache::new(source.clone(), clock.clone(), TTL);
        (source, clock, cache)
    }

    #[tokio::test]
    async fn first_request_fetches() {
        let (source, _clock, cache) = setup();
        assert_eq!(source.fetch_count(Item::Ectoplasm), 0);

        let price = cache.price_of(Item::Ectoplasm).await.unwrap();
        assert_eq!(price, dec!(0.25));
        assert_eq!(source.fetch_count(Item::Ectoplasm), 1);
    }

    #[tokio::test]
    async fn fresh_entry_skips_fetch() {
        let (source, clock, cache) = setup();
        cache.price_of(Item::Ectoplasm).await.unwrap();

        // Just inside the TTL: still fresh, no second fetch.
        clock.advance(Duration::seconds(1799));
        cache.price_of(Item::Ectoplasm).await.unwrap();
        assert_eq!(source.fetch_count(Item::Ectoplasm), 1);

        // Exactly at the TTL boundary an entry is still fresh.
        clock.advance(Duration::seconds(1));
        cache.price_of(Item::Ectoplasm).await.unwrap();
        assert_eq!(source.fetch_count(Item::Ectoplasm), 1);
    }

    #[tokio::test]
    async fn stale_entry_refetches_once() {
        let (source, clock, cache) = setup();
        cache.price_of(Item::Ectoplasm).await.unwrap();

        clock.advance(Duration::seconds(1801));
        source.set_price(Item::Ectoplasm, dec!(0.30));

        let price = cache.price_of(Item::Ectoplasm).await.unwrap();
        assert_eq!(price, dec!(0.30));
        assert_eq!(source.fetch_count(Item::Ectoplasm), 2);
    }

    #[tokio::test]
    async fn refresh_replaces_price_and_fetch_time_together() {
        let (source, clock, cache) = setup();
        cache.price_of(Item::Ectoplasm).await.unwrap();

        clock.advance(Duration::seconds(3600));
        source.set_price(Item::Ectoplasm, dec!(0.40));
        cache.price_of(Item::Ectoplasm).await.unwrap();

        let entry = cache.peek(Item::Ectoplasm).await.unwrap();
        assert_eq!(entry.price, dec!(0.40));
        assert_eq!(entry.fetched_at, clock.now());
    }

    #[tokio::test]
    async fn failed_fetch_is_loud() {
        let (source, _clock, cache) = setup();
        source.fail_with(Item::Ectoplasm, "HTTP 503");

        let result = cache.price_of(Item::Ectoplasm).await;
        assert!(matches!(result, Err(PriceError::Unavailable(_))));
        assert!(cache.peek(Item::Ectoplasm).await.is_none());
    }

    #[tokio::test]
    async fn failed_refresh_leaves_previous_entry_untouched() {
        let (source, clock, cache) = setup();
        cache.price_of(Item::Ectoplasm).await.unwrap();
        let before = cache.peek(Item::Ectoplasm).await.unwrap();

        clock.advance(Duration::seconds(1801));
        source.fail_with(Item::Ectoplasm, "HTTP 503");

        assert!(cache.price_of(Item::Ectoplasm).await.is_err());
        assert_eq!(cache.peek(Item::Ectoplasm).await.unwrap(), before);
    }

    #[tokio::test]
    async fn failure_on_one_item_leaves_other_item_alone() {
        let (source, _clock, cache) = setup();
        cache.price_of(Item::Rune).await.unwrap();

        source.fail_with(Item::Ectoplasm, "HTTP 503");
        assert!(cache.price_of(Item::Ectoplasm).await.is_err());

        // Rune entry is fresh and unaffected by the ecto failure.
        assert_eq!(cache.price_of(Item::Rune).await.unwrap(), dec!(5.0));
        assert_eq!(source.fetch_count(Item::Rune), 1);
    }

    #[tokio::test]
    async fn serve_stale_on_error_returns_previous_value() {
        let source = Arc::new(MockPriceSource::new().with_price(Item::Ectoplasm, dec!(0.25)));
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = PriceCache::with_policy(source.clone(), clock.clone(), TTL, true);

        cache.price_of(Item::Ectoplasm).await.unwrap();
        clock.advance(Duration::seconds(1801));
        source.fail_with(Item::Ectoplasm, "HTTP 503");

        let price = cache.price_of(Item::Ectoplasm).await.unwrap();
        assert_eq!(price, dec!(0.25));
    }

    #[tokio::test]
    async fn serve_stale_with_empty_cache_still_errors() {
        let source = Arc::new(MockPriceSource::new());
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = PriceCache::with_policy(source, clock, TTL, true);

        assert!(cache.price_of(Item::Ectoplasm).await.is_err());
    }

    #[tokio::test]
    async fn snapshot_reads_both_items() {
        let (source, _clock, cache) = setup();

        let prices = cache.snapshot().await.unwrap();
        assert_eq!(prices.ectoplasm, dec!(0.25));
        assert_eq!(prices.rune, dec!(5.0));
        assert_eq!(prices.price_of(Item::Ectoplasm), dec!(0.25));
        assert_eq!(source.fetch_count(Item::Ectoplasm), 1);
        assert_eq!(source.fetch_count(Item::Rune), 1);

        // A second snapshot within the TTL is served entirely from cache.
        cache.snapshot().await.unwrap();
        assert_eq!(source.fetch_count(Item::Ectoplasm), 1);
        assert_eq!(source.fetch_count(Item::Rune), 1);
    }
}
