//! Test doubles for the price cache: a settable clock and a scripted price
//! source that counts fetches. Used by this crate's tests and by downstream
//! crates that valuate against controlled prices.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use gamba_models::Item;
use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::error::PriceError;
use crate::source::PriceSource;

/// Clock whose current time is set explicitly by the test.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Price source that serves scripted quotes and counts fetches per item.
///
/// Items without a scripted quote, and items scripted to fail, return
/// `PriceError::Unavailable`.
#[derive(Default)]
pub struct MockPriceSource {
    quotes: Mutex<HashMap<Item, Result<Decimal, String>>>,
    fetch_counts: Mutex<HashMap<Item, usize>>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(self, item: Item, price: Decimal) -> Self {
        self.set_price(item, price);
        self
    }

    pub fn set_price(&self, item: Item, price: Decimal) {
        self.quotes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(item, Ok(price));
    }

    pub fn fail_with(&self, item: Item, reason: &str) {
        self.quotes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(item, Err(reason.to_string()));
    }

    pub fn fetch_count(&self, item: Item) -> usize {
        self.fetch_counts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&item)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, item: Item) -> Result<Decimal, PriceError> {
        *self
            .fetch_counts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(item)
            .or_insert(0) += 1;

        match self
            .quotes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&item)
        {
            Some(Ok(price)) => Ok(*price),
            Some(Err(reason)) => Err(PriceError::Unavailable(reason.clone())),
            None => Err(PriceError::Unavailable(format!(
                "no quote scripted for {}",
                item.label()
            ))),
        }
    }
}
