//! Provider payloads to normalized [`Game`]s.
//!
//! Each provider gets a [`Normalize`] implementation:
//!
//! - [`kalshi::KalshiNormalizer`] - YES/NO contract prices in cents
//! - [`polymarket::PolymarketNormalizer`] - 0-1 outcome prices
//! - [`odds_api::OddsApiNormalizer`] - sportsbook American or decimal odds
//!
//! Team names are resolved through [`team_name`] so that every provider
//! spells a team the same way and games line up across providers.
//!
//! A batch never fails as a whole. Records that are filtered out (closed
//! markets, unsupported leagues) are dropped quietly; malformed records are
//! dropped with a warning.
//!
//! # Example
//!
//! ```rust
//! use market_odds::normalize::{kalshi::KalshiNormalizer, Normalize};
//! use market_odds::types::market::GetMarketsResponse;
//! use market_odds::types::Sport;
//! use market_odds::Config;
//!
//! let body = r#"{"markets":[{
//!     "ticker": "NFLGAME-25SEP08-DAL-PHI",
//!     "title": "Dallas Cowboys vs Philadelphia Eagles",
//!     "status": "open",
//!     "yes_ask": 65,
//!     "no_ask": 35
//! }],"cursor":null}"#;
//! let response: GetMarketsResponse = serde_json::from_str(body).unwrap();
//!
//! let normalizer = KalshiNormalizer::new(&Config::default(), Sport::Nfl);
//! let games = normalizer.normalize(&response.markets);
//! assert_eq!(games[0].home_team, "Philadelphia Eagles");
//! ```

pub mod kalshi;
pub mod odds_api;
pub mod polymarket;
mod teams;

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::types::{Game, Provider, Sport};

pub use teams::{nfl_team_name, resolve_nfl_team};

/// Turns one provider's wire records into games
pub trait Normalize {
    /// Wire record type
    type Record;

    /// Provider this normalizer handles
    const PROVIDER: Provider;

    /// Identifier of a record, for log messages
    fn record_id(record: &Self::Record) -> &str;

    /// Normalize one record.
    ///
    /// `Ok(None)` means the record was deliberately filtered out.
    ///
    /// # Errors
    ///
    /// Returns an error when the record lacks data needed for a game.
    fn normalize_one(&self, record: &Self::Record) -> Result<Option<Game>, Error>;

    /// Normalize a batch, skipping records that fail
    fn normalize(&self, records: &[Self::Record]) -> Vec<Game> {
        let mut games = Vec::with_capacity(records.len());
        for record in records {
            match self.normalize_one(record) {
                Ok(Some(game)) => games.push(game),
                Ok(None) => {
                    debug!(provider = %Self::PROVIDER, id = Self::record_id(record), "filtered");
                }
                Err(e) => {
                    warn!(provider = %Self::PROVIDER, id = Self::record_id(record), error = %e, "skipping record");
                }
            }
        }
        info!(
            provider = %Self::PROVIDER,
            records = records.len(),
            games = games.len(),
            "normalized"
        );
        games
    }
}

/// One spelling per team: the full name for known NFL forms ("DAL",
/// "Cowboys", "Dallas"), otherwise the trimmed input
pub fn team_name(sport: Sport, raw: &str) -> String {
    let resolved = match sport {
        Sport::Nfl => resolve_nfl_team(raw),
        _ => None,
    };
    resolved.map_or_else(|| raw.trim().to_string(), str::to_string)
}

/// Split "A vs B", "A vs. B", "A @ B" or "A at B" into `(first, second)`
pub(crate) fn split_matchup(text: &str) -> Option<(&str, &str)> {
    const SEPARATORS: [&str; 4] = [" vs. ", " vs ", " @ ", " at "];
    SEPARATORS.iter().find_map(|sep| {
        let (a, b) = text.split_once(sep)?;
        let (a, b) = (a.trim(), b.trim().trim_end_matches('?').trim());
        (!a.is_empty() && !b.is_empty()).then_some((a, b))
    })
}
