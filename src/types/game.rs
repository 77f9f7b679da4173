//! Normalized games and quotes.
//!
//! Every provider maps its payloads into [`Game`]s carrying [`Quote`]s, so
//! the aggregator can compare a Kalshi contract with a sportsbook line
//! directly.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::{BetType, Provider, Selection, Sport};
use crate::odds::AmericanOdds;

/// A priced two-way line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Line {
    /// Straight winner
    Moneyline {
        /// Home team odds
        home: AmericanOdds,
        /// Away team odds
        away: AmericanOdds,
    },
    /// Point spread; `point` is the home team's handicap
    Spread {
        /// Home handicap (negative when home is favored)
        point: f64,
        /// Home team odds
        home: AmericanOdds,
        /// Away team odds
        away: AmericanOdds,
    },
    /// Combined score over/under
    Total {
        /// Total points line
        point: f64,
        /// Over odds
        over: AmericanOdds,
        /// Under odds
        under: AmericanOdds,
    },
}

impl Line {
    /// Kind of wager this line prices
    pub fn bet_type(&self) -> BetType {
        match self {
            Line::Moneyline { .. } => BetType::Moneyline,
            Line::Spread { .. } => BetType::Spread,
            Line::Total { .. } => BetType::Total,
        }
    }

    /// Odds for one side, if this line offers it
    pub fn price(&self, selection: Selection) -> Option<AmericanOdds> {
        match (self, selection) {
            (Line::Moneyline { home, .. } | Line::Spread { home, .. }, Selection::Home) => {
                Some(*home)
            }
            (Line::Moneyline { away, .. } | Line::Spread { away, .. }, Selection::Away) => {
                Some(*away)
            }
            (Line::Total { over, .. }, Selection::Over) => Some(*over),
            (Line::Total { under, .. }, Selection::Under) => Some(*under),
            _ => None,
        }
    }

    /// The favored side of a moneyline, if there is one
    pub fn favorite(&self) -> Option<Selection> {
        match self {
            Line::Moneyline { home, away } => {
                let (h, a) = (home.implied_probability(), away.implied_probability());
                if h > a {
                    Some(Selection::Home)
                } else if a > h {
                    Some(Selection::Away)
                } else {
                    None
                }
            }
            Line::Spread { point, .. } if *point < 0.0 => Some(Selection::Home),
            Line::Spread { point, .. } if *point > 0.0 => Some(Selection::Away),
            _ => None,
        }
    }

    /// The same line with home and away exchanged
    #[must_use]
    pub fn swapped(self) -> Line {
        match self {
            Line::Moneyline { home, away } => Line::Moneyline {
                home: away,
                away: home,
            },
            Line::Spread { point, home, away } => Line::Spread {
                point: -point,
                home: away,
                away: home,
            },
            total @ Line::Total { .. } => total,
        }
    }
}

/// One book's price for a game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Where the price came from
    pub provider: Provider,
    /// Sportsbook key, or the provider name for exchanges
    pub bookmaker: String,
    /// The priced line
    pub line: Line,
    /// When the book last updated the price
    pub last_update: Option<DateTime<Utc>>,
}

impl Quote {
    /// Create a quote with no update timestamp
    pub fn new(provider: Provider, bookmaker: impl Into<String>, line: Line) -> Self {
        Self {
            provider,
            bookmaker: bookmaker.into(),
            line,
            last_update: None,
        }
    }

    fn slot(&self) -> (Provider, &str, BetType) {
        (self.provider, self.bookmaker.as_str(), self.line.bet_type())
    }
}

/// Providers disagree on game dates by up to a day: Kalshi tickers carry the
/// US local date, sportsbooks a UTC kickoff.
const DATE_TOLERANCE_DAYS: i64 = 1;

/// How two keys for the same game line up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Same home and away
    Same,
    /// Home and away reversed
    Swapped,
}

/// Identity used to recognize the same game across providers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameKey {
    sport: Sport,
    home: String,
    away: String,
    date: Option<NaiveDate>,
}

impl GameKey {
    /// Build a key from league, team names and game date.
    ///
    /// Teams compare case-insensitively. Names should already be resolved
    /// to one spelling per team (see [`crate::normalize::team_name`]).
    pub fn new(sport: Sport, home: &str, away: &str, date: Option<NaiveDate>) -> Self {
        Self {
            sport,
            home: home.trim().to_ascii_lowercase(),
            away: away.trim().to_ascii_lowercase(),
            date,
        }
    }

    /// Whether two keys name the same game.
    ///
    /// Dates may differ by one day. A key without a date matches any date.
    pub fn matches(&self, other: &GameKey) -> Option<Orientation> {
        if self.sport != other.sport {
            return None;
        }
        if let (Some(a), Some(b)) = (self.date, other.date) {
            if (a - b).num_days().abs() > DATE_TOLERANCE_DAYS {
                return None;
            }
        }
        if self.home == other.home && self.away == other.away {
            Some(Orientation::Same)
        } else if self.home == other.away && self.away == other.home {
            Some(Orientation::Swapped)
        } else {
            None
        }
    }
}

/// A game with quotes from one or more providers
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    /// Id of the first provider record seen for this game
    pub id: String,
    /// League
    pub sport: Sport,
    /// Home team display name
    pub home_team: String,
    /// Away team display name
    pub away_team: String,
    /// Kickoff, when a provider knows it
    pub start_time: Option<DateTime<Utc>>,
    /// Game date; the UTC date of `start_time` unless a provider only knows
    /// the date
    pub date: Option<NaiveDate>,
    /// Provider-specific ids
    pub provider_ids: FxHashMap<Provider, String>,
    /// Quotes, at most one per (provider, bookmaker, bet type)
    pub quotes: Vec<Quote>,
}

impl Game {
    /// Create a game with no quotes
    pub fn new(
        id: impl Into<String>,
        sport: Sport,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        start_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            sport,
            home_team: home_team.into(),
            away_team: away_team.into(),
            start_time,
            date: start_time.map(|t| t.date_naive()),
            provider_ids: FxHashMap::default(),
            quotes: Vec::new(),
        }
    }

    /// Set the game date when the kickoff time is unknown
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Cross-provider identity of this game
    pub fn key(&self) -> GameKey {
        GameKey::new(self.sport, &self.home_team, &self.away_team, self.date)
    }

    /// Record a provider-specific id
    pub fn add_provider_id(&mut self, provider: Provider, id: impl Into<String>) {
        self.provider_ids.insert(provider, id.into());
    }

    /// Add a quote, replacing any earlier quote from the same book for the
    /// same bet type
    pub fn add_quote(&mut self, quote: Quote) {
        match self.quotes.iter_mut().find(|q| q.slot() == quote.slot()) {
            Some(existing) => *existing = quote,
            None => self.quotes.push(quote),
        }
    }

    /// Exchange home and away, flipping every quote to match
    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.home_team, &mut self.away_team);
        for quote in &mut self.quotes {
            quote.line = quote.line.swapped();
        }
    }

    /// Fold another provider's view of the same game into this one.
    ///
    /// `other` must already share this game's orientation. A known kickoff
    /// replaces a date-only start.
    pub fn merge(&mut self, other: Game) {
        self.provider_ids.extend(other.provider_ids);
        if self.start_time.is_none() && other.start_time.is_some() {
            self.start_time = other.start_time;
            self.date = other.date;
        } else if self.date.is_none() {
            self.date = other.date;
        }
        for quote in other.quotes {
            self.add_quote(quote);
        }
    }

    /// Quotes of one bet type
    pub fn quotes_for(&self, bet_type: BetType) -> impl Iterator<Item = &Quote> {
        self.quotes
            .iter()
            .filter(move |q| q.line.bet_type() == bet_type)
    }

    /// Quotes from one provider
    pub fn quotes_from(&self, provider: Provider) -> impl Iterator<Item = &Quote> {
        self.quotes.iter().filter(move |q| q.provider == provider)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.away_team, self.home_team)?;
        match (self.start_time, self.date) {
            (Some(start), _) => write!(f, " ({})", start.format("%Y-%m-%d %H:%M UTC")),
            (None, Some(date)) => write!(f, " ({date})"),
            (None, None) => Ok(()),
        }
    }
}
