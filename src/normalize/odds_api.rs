//! Sportsbook odds aggregator events.

use tracing::warn;

use super::{team_name, Normalize};
use crate::config::{Config, OddsFormat};
use crate::error::Error;
use crate::odds::AmericanOdds;
use crate::types::odds_api::{OddsApiEvent, OddsMarket, Outcome};
use crate::types::{Game, Line, Provider, Quote, Sport};

/// Normalizes aggregator events into one quote per bookmaker and market
#[derive(Debug, Clone)]
pub struct OddsApiNormalizer {
    odds_format: OddsFormat,
}

impl OddsApiNormalizer {
    /// Create a normalizer reading prices in the configured format
    pub fn new(config: &Config) -> Self {
        Self {
            odds_format: config.odds_format(),
        }
    }

    fn odds(&self, outcome: &Outcome) -> Result<AmericanOdds, Error> {
        match self.odds_format {
            OddsFormat::American => {
                if !outcome.price.is_finite() {
                    return Err(Error::InvalidPrice(outcome.price.to_string()));
                }
                AmericanOdds::new(outcome.price.round() as i64)
            }
            OddsFormat::Decimal => AmericanOdds::from_decimal(outcome.price),
        }
    }

    fn point(event: &OddsApiEvent, market: &OddsMarket, outcome: &Outcome) -> Result<f64, Error> {
        outcome.point.ok_or_else(|| {
            Error::malformed(&event.id, format!("{} outcome has no point", market.key))
        })
    }

    fn outcome<'a>(
        event: &OddsApiEvent,
        market: &'a OddsMarket,
        name: &str,
    ) -> Result<&'a Outcome, Error> {
        market.outcome(name).ok_or_else(|| {
            Error::malformed(&event.id, format!("{} has no {name:?} outcome", market.key))
        })
    }

    fn line(&self, event: &OddsApiEvent, market: &OddsMarket) -> Result<Option<Line>, Error> {
        let line = match market.key.as_str() {
            "h2h" => {
                let home = Self::outcome(event, market, &event.home_team)?;
                let away = Self::outcome(event, market, &event.away_team)?;
                Line::Moneyline {
                    home: self.odds(home)?,
                    away: self.odds(away)?,
                }
            }
            "spreads" => {
                let home = Self::outcome(event, market, &event.home_team)?;
                let away = Self::outcome(event, market, &event.away_team)?;
                Line::Spread {
                    point: Self::point(event, market, home)?,
                    home: self.odds(home)?,
                    away: self.odds(away)?,
                }
            }
            "totals" => {
                let over = Self::outcome(event, market, "Over")?;
                let under = Self::outcome(event, market, "Under")?;
                Line::Total {
                    point: Self::point(event, market, over)?,
                    over: self.odds(over)?,
                    under: self.odds(under)?,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(line))
    }
}

impl Normalize for OddsApiNormalizer {
    type Record = OddsApiEvent;

    const PROVIDER: Provider = Provider::OddsApi;

    fn record_id(record: &OddsApiEvent) -> &str {
        &record.id
    }

    fn normalize_one(&self, event: &OddsApiEvent) -> Result<Option<Game>, Error> {
        let Some(sport) = Sport::from_provider_key(Provider::OddsApi, &event.sport_key) else {
            return Ok(None);
        };
        if event.home_team.trim().is_empty() || event.away_team.trim().is_empty() {
            return Err(Error::malformed(&event.id, "missing team names"));
        }

        let mut game = Game::new(
            &event.id,
            sport,
            team_name(sport, &event.home_team),
            team_name(sport, &event.away_team),
            event.commence_time,
        );
        game.add_provider_id(Provider::OddsApi, &event.id);

        for bookmaker in &event.bookmakers {
            for market in &bookmaker.markets {
                // One bad market should not cost the rest of the book.
                match self.line(event, market) {
                    Ok(Some(line)) => game.add_quote(Quote {
                        provider: Provider::OddsApi,
                        bookmaker: bookmaker.key.clone(),
                        line,
                        last_update: bookmaker.last_update,
                    }),
                    Ok(None) => {}
                    Err(e) => {
                        warn!(event = %event.id, bookmaker = %bookmaker.key, error = %e, "skipping market");
                    }
                }
            }
        }
        Ok(Some(game))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BetType, Selection};

    const EVENT: &str = r#"{
        "id": "ev1",
        "sport_key": "americanfootball_nfl",
        "commence_time": "2025-09-05T00:20:00Z",
        "home_team": "Philadelphia Eagles",
        "away_team": "Dallas Cowboys",
        "bookmakers": [{
            "key": "draftkings",
            "title": "DraftKings",
            "last_update": "2025-09-04T12:00:00Z",
            "markets": [
                {"key": "h2h", "outcomes": [
                    {"name": "Dallas Cowboys", "price": 240},
                    {"name": "Philadelphia Eagles", "price": -298}
                ]},
                {"key": "spreads", "outcomes": [
                    {"name": "Dallas Cowboys", "price": -110, "point": 7.0},
                    {"name": "Philadelphia Eagles", "price": -110, "point": -7.0}
                ]},
                {"key": "totals", "outcomes": [
                    {"name": "Over", "price": -112, "point": 47.5},
                    {"name": "Under", "price": -108, "point": 47.5}
                ]},
                {"key": "h2h_lay", "outcomes": []}
            ]
        }]
    }"#;

    fn event(json: &str) -> OddsApiEvent {
        serde_json::from_str(json).unwrap()
    }

    fn odds(v: i64) -> AmericanOdds {
        AmericanOdds::new(v).unwrap()
    }

    #[test]
    fn test_all_markets() {
        let n = OddsApiNormalizer::new(&Config::default());
        let game = n.normalize_one(&event(EVENT)).unwrap().unwrap();
        assert_eq!(game.sport, Sport::Nfl);
        assert_eq!(game.quotes.len(), 3);

        let ml = game.quotes_for(BetType::Moneyline).next().unwrap();
        assert_eq!(ml.bookmaker, "draftkings");
        assert_eq!(
            ml.last_update.map(|t| t.to_rfc3339()).as_deref(),
            Some("2025-09-04T12:00:00+00:00")
        );
        assert_eq!(ml.line.price(Selection::Home), Some(odds(-298)));

        let spread = game.quotes_for(BetType::Spread).next().unwrap();
        assert!(matches!(spread.line, Line::Spread { point, .. } if point == -7.0));

        let total = game.quotes_for(BetType::Total).next().unwrap();
        assert_eq!(total.line.price(Selection::Under), Some(odds(-108)));
    }

    #[test]
    fn test_decimal_format() {
        let json = r#"{"id":"ev2","sport_key":"basketball_nba","home_team":"Celtics",
            "away_team":"Knicks","bookmakers":[{"key":"pinnacle","title":"Pinnacle",
            "markets":[{"key":"h2h","outcomes":[
                {"name":"Celtics","price":1.5},{"name":"Knicks","price":2.8}]}]}]}"#;
        let n = OddsApiNormalizer::new(&Config::default().with_odds_format(OddsFormat::Decimal));
        let game = n.normalize_one(&event(json)).unwrap().unwrap();
        let line = game.quotes[0].line;
        assert_eq!(line.price(Selection::Home), Some(odds(-200)));
        assert_eq!(line.price(Selection::Away), Some(odds(180)));
    }

    #[test]
    fn test_bad_market_is_skipped() {
        let json = r#"{"id":"ev3","sport_key":"americanfootball_nfl","home_team":"A",
            "away_team":"B","bookmakers":[{"key":"fanduel","title":"FanDuel","markets":[
                {"key":"h2h","outcomes":[{"name":"A","price":50},{"name":"B","price":-120}]},
                {"key":"totals","outcomes":[
                    {"name":"Over","price":-110,"point":40.5},
                    {"name":"Under","price":-110,"point":40.5}]}]}]}"#;
        let n = OddsApiNormalizer::new(&Config::default());
        let game = n.normalize_one(&event(json)).unwrap().unwrap();
        assert_eq!(game.quotes.len(), 1);
        assert_eq!(game.quotes[0].line.bet_type(), BetType::Total);
    }

    #[test]
    fn test_unknown_sport_is_filtered() {
        let json = r#"{"id":"ev4","sport_key":"soccer_epl","home_team":"A","away_team":"B"}"#;
        let n = OddsApiNormalizer::new(&Config::default());
        assert!(n.normalize_one(&event(json)).unwrap().is_none());
    }
}
