//! # market-odds
//!
//! Convert prediction-market contract prices into sportsbook American odds,
//! and compare them across providers.
//!
//! ## Features
//!
//! - **Cents to odds** - Exact integer conversion for every price from 1 to 99 cents
//! - **Normalization** - Kalshi, Polymarket and sportsbook payloads into one game model
//! - **Aggregation** - Best price per side, moneyline arbitrage and exchange
//!   mispricing against a reference sportsbook
//! - **Fees and P&L** - Kalshi fee schedule, fill/settlement reconciliation
//!   and daily P&L
//!
//! ## Quick Start
//!
//! ```rust
//! use market_odds::{cents_to_american_odds, AmericanOdds};
//!
//! // A 65 cent YES contract is a -186 favorite
//! assert_eq!(cents_to_american_odds(65).value(), -186);
//!
//! // A 35 cent contract is a +186 underdog
//! let dog = cents_to_american_odds(35);
//! assert_eq!(dog.to_string(), "+186");
//!
//! // Out-of-range prices are clamped rather than rejected
//! assert_eq!(cents_to_american_odds(0), AmericanOdds::new(9900).unwrap());
//! assert_eq!(cents_to_american_odds(150), AmericanOdds::new(-9900).unwrap());
//! ```
//!
//! ## Price Representation
//!
//! A binary contract pays 100 cents if it wins, so its price in cents is the
//! implied probability in percent:
//! - 50 cents = even money = `-100`
//! - 65 cents = 65% favorite = `-186`
//! - 35 cents = 35% underdog = `+186`
//!
//! Conversion works in whole cents. Real-valued prices are rounded to the
//! nearest cent first (see [`odds::price_to_american_odds`]).
//!
//! ## Architecture
//!
//! This crate is organized into several modules:
//!
//! - [`odds`] - American odds and the cents conversion
//! - [`types`] - Provider wire types and the normalized game model
//! - [`normalize`] - Per-provider payload normalization
//! - [`aggregator`] - Thread-safe cross-provider game store
//! - [`fees`] - Kalshi trading fees
//! - [`pnl`] - Fill and settlement reconciliation
//! - [`config`] - Configuration
//! - [`error`] - Error types for the crate
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (skipped records, provider status,
//! reconciliation mismatches) and never installs a subscriber itself.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod aggregator;
pub mod config;
pub mod error;
pub mod fees;
pub mod normalize;
pub mod odds;
pub mod pnl;
pub mod types;

// Re-export main types at crate root for convenience
pub use aggregator::Aggregator;
pub use config::Config;
pub use error::Error;
pub use odds::{american_odds_to_cents, cents_to_american_odds, AmericanOdds};
pub use types::Cents;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
