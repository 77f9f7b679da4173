//! Kalshi game markets to moneyline quotes.
//!
//! A Kalshi game market is a YES/NO contract on one team winning. The YES
//! price is that team's implied probability in cents and converts directly
//! to American odds; the other team is priced from the NO side.
//!
//! The game date comes from the ticker. `close_time` on game markets is set
//! well after the game and is not used as a start time.

use chrono::NaiveDate;

use super::teams::split_abbreviations;
use super::{split_matchup, team_name, Normalize};
use crate::config::{Config, PriceSource};
use crate::error::Error;
use crate::types::market::Market;
use crate::types::{Game, Line, Provider, Quote, Sport};

/// Teams and date encoded in a game ticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerInfo {
    /// Away team abbreviation
    pub away: String,
    /// Home team abbreviation
    pub home: String,
    /// Team the YES contract backs, when the ticker names one
    pub yes_team: Option<String>,
    /// Game date (US local, as Kalshi lists it)
    pub date: Option<NaiveDate>,
}

/// Parse a Kalshi game ticker.
///
/// Two layouts are recognized:
///
/// - `NFLGAME-25SEP08-DAL-PHI`: away and home as the last two segments
/// - `KXNFLGAME-25SEP08DALPHI-PHI`: date and both teams fused into one
///   segment, optionally followed by the YES team
///
/// # Errors
///
/// Returns [`Error::InvalidTicker`] when neither layout matches.
pub fn parse_ticker(ticker: &str) -> Result<TickerInfo, Error> {
    let parts: Vec<&str> = ticker.split('-').collect();

    if parts.len() >= 4 {
        let away = parts[parts.len() - 2];
        let home = parts[parts.len() - 1];
        if is_abbreviation(away) && is_abbreviation(home) {
            return Ok(TickerInfo {
                away: away.to_string(),
                home: home.to_string(),
                yes_team: None,
                date: parts.get(1).and_then(|d| parse_date(d)),
            });
        }
    }

    if let Some(event) = parts.get(1).filter(|e| e.len() > 7 && e.is_char_boundary(7)) {
        let (date, run) = event.split_at(7);
        if let (Some(date), Some((away, home))) = (parse_date(date), split_abbreviations(run)) {
            let yes_team = parts
                .get(2)
                .filter(|t| t.eq_ignore_ascii_case(away) || t.eq_ignore_ascii_case(home))
                .map(|t| t.to_ascii_uppercase());
            return Ok(TickerInfo {
                away: away.to_string(),
                home: home.to_string(),
                yes_team,
                date: Some(date),
            });
        }
    }

    Err(Error::InvalidTicker(ticker.to_string()))
}

fn is_abbreviation(s: &str) -> bool {
    (2..=3).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_uppercase())
}

/// `25SEP08`
fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 7 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%y%b%d").ok()
}

/// Normalizes Kalshi markets into moneyline quotes
#[derive(Debug, Clone)]
pub struct KalshiNormalizer {
    price_source: PriceSource,
    sport: Sport,
}

struct Matchup {
    home: String,
    away: String,
    yes_is_home: bool,
    date: Option<NaiveDate>,
}

impl KalshiNormalizer {
    /// Create a normalizer for markets in one league
    pub fn new(config: &Config, sport: Sport) -> Self {
        Self {
            price_source: config.price_source(),
            sport,
        }
    }

    fn matchup(&self, market: &Market) -> Result<Matchup, Error> {
        let (home, away, yes_team, date) = match parse_ticker(&market.ticker) {
            Ok(info) => (
                team_name(self.sport, &info.home),
                team_name(self.sport, &info.away),
                info.yes_team,
                info.date,
            ),
            Err(e) => {
                let (away, home) = split_matchup(&market.title).ok_or(e)?;
                (team_name(self.sport, home), team_name(self.sport, away), None, None)
            }
        };

        // Without a team in the ticker, the YES subtitle may still name it.
        let yes_team = yes_team.or_else(|| {
            market
                .yes_sub_title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        });
        let yes_is_home = match yes_team {
            None => true,
            Some(team) => self.side_of(&team, &home, &away).ok_or_else(|| {
                Error::malformed(
                    &market.ticker,
                    format!("YES team {team:?} is neither {away} nor {home}"),
                )
            })?,
        };

        Ok(Matchup {
            home,
            away,
            yes_is_home,
            date,
        })
    }

    /// `Some(true)` for home, `Some(false)` for away. Short names ("Kansas
    /// City") resolve through the team table, then by substring of exactly
    /// one side.
    fn side_of(&self, team: &str, home: &str, away: &str) -> Option<bool> {
        let resolved = team_name(self.sport, team);
        if resolved.eq_ignore_ascii_case(home) {
            return Some(true);
        }
        if resolved.eq_ignore_ascii_case(away) {
            return Some(false);
        }
        let needle = team.trim().to_ascii_lowercase();
        match (
            home.to_ascii_lowercase().contains(&needle),
            away.to_ascii_lowercase().contains(&needle),
        ) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }
}

impl Normalize for KalshiNormalizer {
    type Record = Market;

    const PROVIDER: Provider = Provider::Kalshi;

    fn record_id(record: &Market) -> &str {
        &record.ticker
    }

    fn normalize_one(&self, market: &Market) -> Result<Option<Game>, Error> {
        if market.result.is_some() || !market.is_tradeable() {
            return Ok(None);
        }

        let matchup = self.matchup(market)?;
        let yes = market
            .yes_price(self.price_source)
            .ok_or_else(|| Error::malformed(&market.ticker, "no YES quote"))?;
        let no = market
            .no_price(self.price_source)
            .unwrap_or_else(|| yes.complement());
        let (home, away) = if matchup.yes_is_home { (yes, no) } else { (no, yes) };

        let id = if market.event_ticker.is_empty() {
            &market.ticker
        } else {
            &market.event_ticker
        };

        let mut game = Game::new(id, self.sport, matchup.home, matchup.away, None);
        if let Some(date) = matchup.date {
            game = game.with_date(date);
        }
        game.add_provider_id(Provider::Kalshi, &market.ticker);
        game.add_quote(Quote::new(
            Provider::Kalshi,
            Provider::Kalshi.as_str(),
            Line::Moneyline {
                home: home.to_american_odds(),
                away: away.to_american_odds(),
            },
        ));
        Ok(Some(game))
    }
}
