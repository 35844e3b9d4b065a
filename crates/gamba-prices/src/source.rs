use async_trait::async_trait;
use gamba_models::Item;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::PriceError;

/// Copper units per gold on the trading post.
const COPPER_PER_GOLD: u64 = 10_000;

/// External quote source. Mockable for testing.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the current sell price of an item, in gold.
    async fn fetch(&self, item: Item) -> Result<Decimal, PriceError>;
}

/// Wire shape of the trading-post price endpoint. Only the sell side is
/// read; valuation uses the minimum sell listing.
#[derive(Debug, Deserialize)]
struct PriceBody {
    sells: SellQuote,
}

#[derive(Debug, Deserialize)]
struct SellQuote {
    /// Price of the cheapest sell listing, in copper.
    unit_price: u64,
}

fn copper_to_gold(unit_price: u64) -> Decimal {
    Decimal::from(unit_price) / Decimal::from(COPPER_PER_GOLD)
}

/// Price source backed by the trading-post HTTP API.
///
/// Issues `GET {base_url}/{api_id}` and reads the sell-side unit price from
/// the JSON body. The request timeout bounds the whole round-trip.
pub struct TradingPostSource {
    client: reqwest::Client,
    base_url: String,
}

impl TradingPostSource {
    pub fn new(
        base_url: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, PriceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PriceError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceSource for TradingPostSource {
    fn name(&self) -> &str {
        "trading-post"
    }

    async fn fetch(&self, item: Item) -> Result<Decimal, PriceError> {
        let url = format!("{}/{}", self.base_url, item.api_id());
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Unavailable(format!("{url}: HTTP {status}")));
        }

        let body: PriceBody = response.json().await.map_err(|e| PriceError::Malformed {
            item: item.label().to_string(),
            reason: e.to_string(),
        })?;

        if body.sells.unit_price == 0 {
            return Err(PriceError::Malformed {
                item: item.label().to_string(),
                reason: "no sell listings".to_string(),
            });
        }

        Ok(copper_to_gold(body.sells.unit_price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn copper_conversion() {
        assert_eq!(copper_to_gold(10_000), dec!(1));
        assert_eq!(copper_to_gold(2_551), dec!(0.2551));
        assert_eq!(copper_to_gold(48_750_000), dec!(4875));
    }

    #[test]
    fn parse_price_body() {
        let json = r#"{
            "id": 19721,
            "whitelisted": false,
            "buys": { "quantity": 100, "unit_price": 2450 },
            "sells": { "quantity": 200, "unit_price": 2551 }
        }"#;
        let body: PriceBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.sells.unit_price, 2551);
    }

    #[test]
    fn parse_price_body_missing_sells() {
        let json = r#"{ "id": 19721, "buys": { "unit_price": 2450 } }"#;
        let result: Result<PriceBody, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let source = TradingPostSource::new(
            "https://api.example.com/prices/",
            std::time::Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(source.base_url, "https://api.example.com/prices");
    }
}
