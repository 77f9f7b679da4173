//! Wire and domain types.
//!
//! - [`market`] - Kalshi markets, fills and settlements
//! - [`order`] - Contract side and trade action
//! - [`polymarket`] - Polymarket Gamma markets
//! - [`odds_api`] - Sportsbook odds aggregator events
//! - [`game`] - The normalized game/quote model every provider maps into
//! - [`time`] - Lenient timestamp parsing

pub mod game;
pub mod market;
pub mod odds_api;
pub mod order;
pub mod polymarket;
pub mod time;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use game::{Game, GameKey, Line, Orientation, Quote};
pub use market::{Fill, Market, MarketStatus, Settlement};
pub use order::{Action, Side};

/// Price of a binary contract in whole cents, always within 1-99.
///
/// A contract pays 100 cents if its outcome happens, so the price doubles as
/// an implied probability percentage. Every constructor clamps: anything at
/// or below zero becomes 1, anything at or above 100 becomes 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Cents(u8);

impl Cents {
    /// Lowest representable price
    pub const MIN: Cents = Cents(1);
    /// Highest representable price
    pub const MAX: Cents = Cents(99);
    /// Even money
    pub const EVEN: Cents = Cents(50);

    /// Clamp an integer into 1-99
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        Cents(value.clamp(1, 99) as u8)
    }

    /// Round a real-valued price to the nearest cent, then clamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrice`] for NaN or infinite input.
    pub fn from_f64(value: f64) -> Result<Self, Error> {
        if !value.is_finite() {
            return Err(Error::InvalidPrice(value.to_string()));
        }
        Ok(Cents(value.round().clamp(1.0, 99.0) as u8))
    }

    /// Convert a 0-1 probability price (Polymarket style) into cents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrice`] for NaN or infinite input.
    pub fn from_probability(probability: f64) -> Result<Self, Error> {
        if !probability.is_finite() {
            return Err(Error::InvalidPrice(probability.to_string()));
        }
        Self::from_f64(probability * 100.0)
    }

    /// Raw value in cents
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Price of the opposite contract (`100 - self`)
    #[must_use]
    pub const fn complement(self) -> Self {
        Cents(100 - self.0)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}¢", self.0)
    }
}

impl<'de> Deserialize<'de> for Cents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(Cents::clamped(raw))
    }
}

/// Source of a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Sportsbook odds aggregator
    OddsApi,
    /// Kalshi prediction market
    Kalshi,
    /// Polymarket prediction market
    Polymarket,
}

impl Provider {
    /// Every provider, in display order
    pub const ALL: [Provider; 3] = [Provider::OddsApi, Provider::Kalshi, Provider::Polymarket];

    /// Prediction-market exchange rather than a sportsbook feed
    pub fn is_exchange(self) -> bool {
        matches!(self, Provider::Kalshi | Provider::Polymarket)
    }

    /// Stable lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OddsApi => "odds_api",
            Provider::Kalshi => "kalshi",
            Provider::Polymarket => "polymarket",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// League a game belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    /// National Football League
    Nfl,
    /// National Basketball Association
    Nba,
    /// Major League Baseball
    Mlb,
    /// National Hockey League
    Nhl,
}

impl Sport {
    /// The key each provider uses for this league
    pub fn provider_key(self, provider: Provider) -> &'static str {
        match (provider, self) {
            (Provider::OddsApi, Sport::Nfl) => "americanfootball_nfl",
            (Provider::OddsApi, Sport::Nba) => "basketball_nba",
            (Provider::OddsApi, Sport::Mlb) => "baseball_mlb",
            (Provider::OddsApi, Sport::Nhl) => "icehockey_nhl",
            (Provider::Kalshi, Sport::Nfl) => "nfl",
            (Provider::Kalshi, Sport::Nba) => "nba",
            (Provider::Kalshi, Sport::Mlb) => "mlb",
            (Provider::Kalshi, Sport::Nhl) => "nhl",
            (Provider::Polymarket, Sport::Nfl) => "NFL",
            (Provider::Polymarket, Sport::Nba) => "NBA",
            (Provider::Polymarket, Sport::Mlb) => "MLB",
            (Provider::Polymarket, Sport::Nhl) => "NHL",
        }
    }

    /// Reverse of [`Sport::provider_key`]
    pub fn from_provider_key(provider: Provider, key: &str) -> Option<Sport> {
        [Sport::Nfl, Sport::Nba, Sport::Mlb, Sport::Nhl]
            .into_iter()
            .find(|sport| sport.provider_key(provider) == key)
    }
}

/// Kind of wager a quote prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    /// Straight winner
    Moneyline,
    /// Point spread
    Spread,
    /// Over/under on combined score
    Total,
}

/// Side of a two-way line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Home team (moneyline or spread)
    Home,
    /// Away team (moneyline or spread)
    Away,
    /// Over the total
    Over,
    /// Under the total
    Under,
}

/// Quantity of contracts
pub type Quantity = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cents_clamps() {
        assert_eq!(Cents::clamped(0), Cents::MIN);
        assert_eq!(Cents::clamped(-40), Cents::MIN);
        assert_eq!(Cents::clamped(100), Cents::MAX);
        assert_eq!(Cents::clamped(250), Cents::MAX);
        assert_eq!(Cents::clamped(42).get(), 42);
    }

    #[test]
    fn test_cents_from_f64() {
        assert_eq!(Cents::from_f64(52.5).unwrap().get(), 53);
        assert_eq!(Cents::from_f64(0.4).unwrap(), Cents::MIN);
        assert_eq!(Cents::from_f64(99.6).unwrap(), Cents::MAX);
        assert!(Cents::from_f64(f64::NAN).is_err());
        assert!(Cents::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn test_cents_from_probability() {
        assert_eq!(Cents::from_probability(0.35).unwrap().get(), 35);
        assert_eq!(Cents::from_probability(0.657).unwrap().get(), 66);
        assert_eq!(Cents::from_probability(1.0).unwrap(), Cents::MAX);
        assert!(Cents::from_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_complement() {
        assert_eq!(Cents::clamped(65).complement().get(), 35);
        assert_eq!(Cents::EVEN.complement(), Cents::EVEN);
    }

    #[test]
    fn test_cents_deserialize_clamps() {
        let c: Cents = serde_json::from_str("0").unwrap();
        assert_eq!(c, Cents::MIN);
        let c: Cents = serde_json::from_str("57").unwrap();
        assert_eq!(c.get(), 57);
    }

    #[test]
    fn test_sport_keys_roundtrip() {
        for provider in Provider::ALL {
            for sport in [Sport::Nfl, Sport::Nba, Sport::Mlb, Sport::Nhl] {
                let key = sport.provider_key(provider);
                assert_eq!(Sport::from_provider_key(provider, key), Some(sport));
            }
        }
        assert_eq!(Sport::from_provider_key(Provider::OddsApi, "soccer_epl"), None);
    }
}
