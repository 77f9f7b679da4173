//! Normalization, fee and aggregation settings.
//!
//! This module provides the [`Config`] struct. Everything has a usable
//! default, so most callers only override one or two fields.

use crate::error::Error;
use crate::types::Provider;

/// Which Kalshi quote becomes a market's price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceSource {
    /// Lowest offer, i.e. what a taker pays right now
    #[default]
    Ask,
    /// Highest bid
    Bid,
    /// Midpoint of bid and ask
    Mid,
    /// Last traded price
    Last,
}

/// Encoding of sportsbook prices from the odds aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OddsFormat {
    /// Signed American odds (`-110`, `+145`)
    #[default]
    American,
    /// Decimal odds (`1.91`, `2.45`)
    Decimal,
}

/// Kalshi trading fee rates in basis points of `C * P * (1 - P)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    /// Rate charged to the aggressing order
    pub taker_bps: u32,
    /// Rate charged to the resting order
    pub maker_bps: u32,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            taker_bps: 700,
            maker_bps: 175,
        }
    }
}

/// Configuration for normalization, fees and aggregation
///
/// # Example
///
/// ```rust
/// use market_odds::config::{OddsFormat, PriceSource};
/// use market_odds::Config;
///
/// let config = Config::default()
///     .with_price_source(PriceSource::Mid)
///     .with_odds_format(OddsFormat::Decimal)
///     .with_min_arbitrage_margin(0.01);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Kalshi quote used as the price
    price_source: PriceSource,

    /// Odds aggregator price encoding
    odds_format: OddsFormat,

    /// Kalshi fee rates
    fee_schedule: FeeSchedule,

    /// Smallest `1 - sum(implied probability)` reported as arbitrage
    min_arbitrage_margin: f64,

    /// Smallest gap in American odds points reported as a mispricing
    min_mispricing_delta: u32,

    /// Providers the aggregator accepts
    providers: Vec<Provider>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            price_source: PriceSource::default(),
            odds_format: OddsFormat::default(),
            fee_schedule: FeeSchedule::default(),
            min_arbitrage_margin: 0.0,
            min_mispricing_delta: 20,
            providers: Provider::ALL.to_vec(),
        }
    }
}

impl Config {
    /// Set the Kalshi price source
    #[must_use]
    pub fn with_price_source(mut self, price_source: PriceSource) -> Self {
        self.price_source = price_source;
        self
    }

    /// Set the odds aggregator price format
    #[must_use]
    pub fn with_odds_format(mut self, odds_format: OddsFormat) -> Self {
        self.odds_format = odds_format;
        self
    }

    /// Set the Kalshi fee schedule
    #[must_use]
    pub fn with_fee_schedule(mut self, fee_schedule: FeeSchedule) -> Self {
        self.fee_schedule = fee_schedule;
        self
    }

    /// Set the minimum arbitrage margin (0 reports any arbitrage)
    #[must_use]
    pub fn with_min_arbitrage_margin(mut self, margin: f64) -> Self {
        self.min_arbitrage_margin = margin;
        self
    }

    /// Set the minimum mispricing gap in odds points
    #[must_use]
    pub fn with_min_mispricing_delta(mut self, points: u32) -> Self {
        self.min_mispricing_delta = points;
        self
    }

    /// Restrict the aggregator to these providers
    #[must_use]
    pub fn with_providers(mut self, providers: impl IntoIterator<Item = Provider>) -> Self {
        self.providers = providers.into_iter().collect();
        self.providers.sort();
        self.providers.dedup();
        self
    }

    /// Get the Kalshi price source
    pub fn price_source(&self) -> PriceSource {
        self.price_source
    }

    /// Get the odds aggregator price format
    pub fn odds_format(&self) -> OddsFormat {
        self.odds_format
    }

    /// Get the Kalshi fee schedule
    pub fn fee_schedule(&self) -> FeeSchedule {
        self.fee_schedule
    }

    /// Get the minimum arbitrage margin
    pub fn min_arbitrage_margin(&self) -> f64 {
        self.min_arbitrage_margin
    }

    /// Get the minimum mispricing gap in odds points
    pub fn min_mispricing_delta(&self) -> u32 {
        self.min_mispricing_delta
    }

    /// Get the enabled providers
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Whether `provider` is enabled
    pub fn is_enabled(&self, provider: Provider) -> bool {
        self.providers.contains(&provider)
    }

    /// Check that every value is in range
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..1.0).contains(&self.min_arbitrage_margin) {
            return Err(Error::Config(format!(
                "min_arbitrage_margin must be in [0, 1), got {}",
                self.min_arbitrage_margin
            )));
        }
        if self.fee_schedule.taker_bps > 10_000 || self.fee_schedule.maker_bps > 10_000 {
            return Err(Error::Config(format!(
                "fee rates must be at most 10000 bps, got taker {} / maker {}",
                self.fee_schedule.taker_bps, self.fee_schedule.maker_bps
            )));
        }
        if self.providers.is_empty() {
            return Err(Error::Config("at least one provider must be enabled".into()));
        }
        Ok(())
    }
}
