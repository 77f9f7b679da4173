//! Error types for the market-odds crate.
//!
//! Conversion itself never fails for numeric input (out-of-range cents are
//! clamped). Errors come from non-finite prices, invalid odds values, and
//! provider payloads that cannot be interpreted.

use thiserror::Error;

/// The main error type for this crate
#[derive(Debug, Error)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Price is not a finite number (NaN or infinite)
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// American odds value outside the valid domain (|odds| < 100)
    #[error("Invalid American odds: {0}")]
    InvalidOdds(i64),

    /// Odds string could not be parsed
    #[error("Cannot parse odds from {0:?}")]
    ParseOdds(String),

    /// Market ticker does not follow a recognized layout
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A provider record is missing data needed for normalization
    #[error("Malformed market {id}: {reason}")]
    MalformedMarket {
        /// Provider identifier of the record
        id: String,
        /// What was wrong with it
        reason: String,
    },
}

impl Error {
    /// Build a [`Error::MalformedMarket`] from an id and a reason
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedMarket {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
