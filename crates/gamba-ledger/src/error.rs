use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("cannot merge totals for different users: {left} vs {right}")]
    UserMismatch { left: String, right: String },

    #[error("price error: {0}")]
    Price(#[from] gamba_prices::PriceError),
}
