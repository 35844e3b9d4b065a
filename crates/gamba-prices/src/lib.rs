pub mod cache;
pub mod clock;
pub mod error;
pub mod source;
pub mod test_support;

pub use cache::{ItemPrices, PriceCache, PricedItem};
pub use clock::{Clock, SystemClock};
pub use error::PriceError;
pub use source::{PriceSource, TradingPostSource};
