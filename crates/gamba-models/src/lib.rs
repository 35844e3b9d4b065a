pub mod config;
pub mod item;
pub mod session;
pub mod store_schema;

pub use config::{CostConfig, GambaConfig, PricesConfig, StoreConfig};
pub use item::Item;
pub use session::{AggregateTotals, Session, GLOBAL_USER};
pub use store_schema::SESSIONS_TABLE_DDL;
