//! Polymarket Gamma API market type.
//!
//! Gamma encodes `outcomes` and `outcomePrices` as JSON arrays wrapped in a
//! string (`"[\"Cowboys\", \"Eagles\"]"`). Both the wrapped and the plain
//! array form are accepted.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::Deserialize;

use super::time::parse_timestamp;
use crate::error::Error;

/// A Polymarket market as returned by the Gamma API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolymarketMarket {
    /// Market id
    pub id: String,

    /// Market question (e.g., "Cowboys vs. Eagles")
    #[serde(default)]
    pub question: String,

    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,

    /// Outcome labels, index-aligned with `outcome_prices`
    #[serde(default, deserialize_with = "string_or_seq")]
    pub outcomes: Vec<String>,

    /// Outcome prices as decimal strings in 0-1
    #[serde(default, deserialize_with = "string_or_seq")]
    pub outcome_prices: Vec<String>,

    /// Whether the market is active
    #[serde(default)]
    pub active: bool,

    /// Whether the market is closed
    #[serde(default)]
    pub closed: bool,

    /// Resolution date
    pub end_date: Option<String>,

    /// Scheduled game start, when the market is tied to a game
    /// (`"2025-09-05 00:20:00+00"`)
    pub game_start_time: Option<String>,
}

impl PolymarketMarket {
    /// Outcome names paired with their parsed 0-1 price
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedMarket`] when the arrays differ in length or a
    /// price is not a number.
    pub fn priced_outcomes(&self) -> Result<Vec<(&str, f64)>, Error> {
        if self.outcomes.len() != self.outcome_prices.len() {
            return Err(Error::malformed(
                &self.id,
                format!(
                    "{} outcomes but {} prices",
                    self.outcomes.len(),
                    self.outcome_prices.len()
                ),
            ));
        }
        self.outcomes
            .iter()
            .zip(&self.outcome_prices)
            .map(|(name, price)| {
                price
                    .trim()
                    .parse::<f64>()
                    .map(|p| (name.as_str(), p))
                    .map_err(|_| Error::malformed(&self.id, format!("bad price {price:?}")))
            })
            .collect()
    }

    /// Start time: game start if it parses, otherwise the end date
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.game_start_time
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.end_date.as_deref().and_then(parse_timestamp))
    }
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Encoded(String),
        Plain(Vec<serde_json::Value>),
    }

    let values = match Raw::deserialize(deserializer)? {
        Raw::Encoded(s) if s.trim().is_empty() => Vec::new(),
        Raw::Encoded(s) => {
            serde_json::from_str::<Vec<serde_json::Value>>(&s).map_err(D::Error::custom)?
        }
        Raw::Plain(values) => values,
    };

    Ok(values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}
