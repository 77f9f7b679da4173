//! Sportsbook odds aggregator types.
//!
//! One event carries a list of bookmakers, each with `h2h`, `spreads` and
//! `totals` markets. Prices are American or decimal depending on the
//! `oddsFormat` the request used (see [`crate::config::OddsFormat`]).

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A scheduled game with bookmaker prices
#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiEvent {
    /// Event id
    pub id: String,

    /// League key (e.g., "americanfootball_nfl")
    pub sport_key: String,

    /// Kickoff/tipoff time
    pub commence_time: Option<DateTime<Utc>>,

    /// Home team name
    pub home_team: String,

    /// Away team name
    pub away_team: String,

    /// Per-book prices
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

/// One sportsbook's prices for an event
#[derive(Debug, Clone, Deserialize)]
pub struct Bookmaker {
    /// Book key (e.g., "pinnacle")
    pub key: String,

    /// Display name
    #[serde(default)]
    pub title: String,

    /// Last update
    pub last_update: Option<DateTime<Utc>>,

    /// Markets offered
    #[serde(default)]
    pub markets: Vec<OddsMarket>,
}

/// A market offered by a book
#[derive(Debug, Clone, Deserialize)]
pub struct OddsMarket {
    /// Market key: "h2h", "spreads" or "totals"
    pub key: String,

    /// Priced outcomes
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

/// A priced outcome within a market
#[derive(Debug, Clone, Deserialize)]
pub struct Outcome {
    /// Team name, or "Over"/"Under" for totals
    pub name: String,

    /// Price in the requested odds format
    pub price: f64,

    /// Handicap or total line, when the market has one
    pub point: Option<f64>,
}

impl OddsMarket {
    /// Find an outcome by name, ignoring ASCII case
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
    }
}
