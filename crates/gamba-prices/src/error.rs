use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("price source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed price response for {item}: {reason}")]
    Malformed { item: String, reason: String },
}

impl From<reqwest::Error> for PriceError {
    fn from(e: reqwest::Error) -> Self {
        PriceError::Unavailable(e.to_string())
    }
}
