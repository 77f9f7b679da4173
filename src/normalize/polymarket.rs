//! Polymarket two-outcome game markets.

use super::{split_matchup, team_name, Normalize};
use crate::error::Error;
use crate::types::polymarket::PolymarketMarket;
use crate::types::{Cents, Game, Line, Provider, Quote, Sport};

/// Normalizes Polymarket Gamma markets into moneyline quotes.
///
/// The question names the teams away first (`"Cowboys vs. Eagles"`). Each
/// outcome is matched to a team by name; when the names differ from the
/// question, outcome order is taken to follow question order.
#[derive(Debug, Clone)]
pub struct PolymarketNormalizer {
    sport: Sport,
}

impl PolymarketNormalizer {
    /// Create a normalizer for markets in one league
    pub fn new(sport: Sport) -> Self {
        Self { sport }
    }
}

impl Normalize for PolymarketNormalizer {
    type Record = PolymarketMarket;

    const PROVIDER: Provider = Provider::Polymarket;

    fn record_id(record: &PolymarketMarket) -> &str {
        &record.id
    }

    fn normalize_one(&self, market: &PolymarketMarket) -> Result<Option<Game>, Error> {
        if market.closed {
            return Ok(None);
        }

        let outcomes = market.priced_outcomes()?;
        let [(first, first_price), (second, second_price)] = outcomes[..] else {
            return Err(Error::malformed(
                &market.id,
                format!("expected 2 outcomes, got {}", outcomes.len()),
            ));
        };
        let (away, home) = split_matchup(&market.question).unwrap_or((first, second));

        let (away_price, home_price) =
            if first.eq_ignore_ascii_case(home) || second.eq_ignore_ascii_case(away) {
                (second_price, first_price)
            } else {
                (first_price, second_price)
            };

        let line = Line::Moneyline {
            home: Cents::from_probability(home_price)?.to_american_odds(),
            away: Cents::from_probability(away_price)?.to_american_odds(),
        };

        let mut game = Game::new(
            &market.id,
            self.sport,
            team_name(self.sport, home),
            team_name(self.sport, away),
            market.start_time(),
        );
        game.add_provider_id(Provider::Polymarket, &market.id);
        game.add_quote(Quote::new(
            Provider::Polymarket,
            Provider::Polymarket.as_str(),
            line,
        ));
        Ok(Some(game))
    }
}
