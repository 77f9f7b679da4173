//! Cross-provider game aggregation.
//!
//! This module provides [`Aggregator`], a thread-safe store that merges the
//! normalized games of every provider into one view per matchup.
//!
//! # Design
//!
//! Games are keyed by [`GameKey`] (league, teams and date) inside a
//! `parking_lot::RwLock`, so readers never block each other. An incoming game
//! joins a held one when [`GameKey::matches`] says they are the same game:
//! dates within a day, home and away in either order. Provider ids and
//! quotes are merged; a newer quote from the same book replaces the older
//! one.
//!
//! # Example
//!
//! ```rust
//! use market_odds::aggregator::{best_price, Aggregator};
//! use market_odds::odds::AmericanOdds;
//! use market_odds::types::{BetType, Game, Line, Provider, Quote, Selection, Sport};
//! use market_odds::Config;
//!
//! let aggregator = Aggregator::new(Config::default());
//!
//! let mut game = Game::new("ev1", Sport::Nfl, "Eagles", "Cowboys", None);
//! game.add_quote(Quote::new(
//!     Provider::OddsApi,
//!     "pinnacle",
//!     Line::Moneyline {
//!         home: AmericanOdds::new(-190).unwrap(),
//!         away: AmericanOdds::new(170).unwrap(),
//!     },
//! ));
//! aggregator.ingest(Provider::OddsApi, vec![game]);
//!
//! let games = aggregator.games();
//! let best = best_price(&games[0], BetType::Moneyline, Selection::Away).unwrap();
//! assert_eq!(best.odds.to_string(), "+170");
//! ```

use std::cmp::Ordering;
use std::collections::hash_map::Entry;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::odds::AmericanOdds;
use crate::types::{BetType, Cents, Game, GameKey, Line, Orientation, Provider, Selection};

/// Slack for implied probabilities that sum to exactly one on paper
const PROBABILITY_EPSILON: f64 = 1e-9;

/// Lines longer than this are left out of mispricing checks
const MAX_COMPARABLE_ODDS: u32 = 1000;

/// Best available price for one side of a game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestPrice {
    /// Provider offering it
    pub provider: Provider,
    /// Book offering it
    pub bookmaker: String,
    /// The odds
    pub odds: AmericanOdds,
    /// Handicap or total line, for spreads and totals
    pub point: Option<f64>,
}

/// Highest-paying quote for `selection` among the game's `bet_type` quotes.
///
/// Ties keep the first quote seen.
pub fn best_price(game: &Game, bet_type: BetType, selection: Selection) -> Option<BestPrice> {
    let mut best: Option<BestPrice> = None;
    for quote in game.quotes_for(bet_type) {
        let Some(odds) = quote.line.price(selection) else {
            continue;
        };
        if best.as_ref().is_some_and(|b| !odds.pays_more_than(b.odds)) {
            continue;
        }
        let point = match quote.line {
            Line::Moneyline { .. } => None,
            Line::Spread { point, .. } => Some(match selection {
                Selection::Away => -point,
                _ => point,
            }),
            Line::Total { point, .. } => Some(point),
        };
        best = Some(BestPrice {
            provider: quote.provider,
            bookmaker: quote.bookmaker.clone(),
            odds,
            point,
        });
    }
    best
}

/// One side of an arbitrage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageLeg {
    /// Side to back
    pub selection: Selection,
    /// Where to place it
    pub price: BestPrice,
    /// Share of the total stake for this leg
    pub stake_fraction: f64,
}

/// A moneyline where backing both sides at the best prices locks in a profit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arbitrage {
    /// Game id
    pub game_id: String,
    /// Home then away
    pub legs: [ArbitrageLeg; 2],
    /// Sum of the legs' implied probabilities (below 1)
    pub implied_total: f64,
    /// `1 - implied_total`
    pub margin: f64,
}

impl Arbitrage {
    /// Guaranteed profit per unit staked across both legs
    pub fn return_on_stake(&self) -> f64 {
        1.0 / self.implied_total - 1.0
    }
}

/// Which way an exchange price leans against the reference book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MispricingDirection {
    /// The exchange pays more than the reference book
    ExchangeBetter,
    /// The exchange pays less than the reference book
    ExchangeWorse,
}

/// An exchange moneyline that strays from a sharp book's price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mispricing {
    /// Game id
    pub game_id: String,
    /// Side being priced
    pub selection: Selection,
    /// Exchange offering the price
    pub provider: Provider,
    /// Book taken as the fair price
    pub reference_book: String,
    /// Reference book's odds
    pub reference_odds: AmericanOdds,
    /// Exchange odds
    pub exchange_odds: AmericanOdds,
    /// Gap in odds points
    pub delta_points: u32,
    /// Whether the exchange pays more or less
    pub direction: MispricingDirection,
    /// Reference odds as a contract price
    pub reference_cents: Cents,
    /// Exchange odds as a contract price
    pub exchange_cents: Cents,
    /// Gap in implied probability, percentage points
    pub probability_gap: f64,
    /// Expected profit per unit staked on the exchange, taking the reference
    /// book's implied probability as the truth
    pub expected_value: f64,
}

fn mispricing(
    game: &Game,
    selection: Selection,
    provider: Provider,
    reference_book: &str,
    reference: AmericanOdds,
    exchange: AmericanOdds,
) -> Mispricing {
    let p_ref = reference.implied_probability();
    Mispricing {
        game_id: game.id.clone(),
        selection,
        provider,
        reference_book: reference_book.to_string(),
        reference_odds: reference,
        exchange_odds: exchange,
        delta_points: reference.points_from(exchange),
        direction: if exchange.pays_more_than(reference) {
            MispricingDirection::ExchangeBetter
        } else {
            MispricingDirection::ExchangeWorse
        },
        reference_cents: reference.to_cents(),
        exchange_cents: exchange.to_cents(),
        probability_gap: (p_ref - exchange.implied_probability()).abs() * 100.0,
        expected_value: p_ref * exchange.profit(1.0) - (1.0 - p_ref),
    }
}

fn none_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Whether a provider is currently feeding data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderState {
    /// Last fetch delivered data
    Active,
    /// Never fetched, or the last fetch failed
    Unavailable,
}

/// Status of one configured provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    /// The provider
    pub provider: Provider,
    /// Current state
    pub state: ProviderState,
    /// Games in the last ingested batch
    pub games: usize,
    /// Reason for the last failure
    pub last_error: Option<String>,
}

impl ProviderStatus {
    fn unavailable(provider: Provider) -> Self {
        Self {
            provider,
            state: ProviderState::Unavailable,
            games: 0,
            last_error: None,
        }
    }
}

/// Thread-safe store of games merged across providers.
///
/// Share it across threads via `Arc<Aggregator>`.
#[derive(Debug)]
pub struct Aggregator {
    config: Config,
    games: RwLock<FxHashMap<GameKey, Game>>,
    status: RwLock<FxHashMap<Provider, ProviderStatus>>,
}

impl Aggregator {
    /// Create an empty aggregator
    pub fn new(config: Config) -> Self {
        Self {
            config,
            games: RwLock::new(FxHashMap::default()),
            status: RwLock::new(FxHashMap::default()),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Merge a provider's games into the store.
    ///
    /// Returns how many games were accepted; batches from providers that are
    /// not enabled are ignored.
    pub fn ingest(&self, provider: Provider, games: Vec<Game>) -> usize {
        if !self.config.is_enabled(provider) {
            debug!(%provider, "provider disabled, ignoring batch");
            return 0;
        }

        let count = games.len();
        {
            let mut store = self.games.write();
            for mut game in games {
                let key = game.key();
                let held = if store.contains_key(&key) {
                    Some((key.clone(), Orientation::Same))
                } else {
                    store
                        .keys()
                        .find_map(|k| k.matches(&key).map(|o| (k.clone(), o)))
                };

                let Some((held_key, orientation)) = held else {
                    store.insert(key, game);
                    continue;
                };
                let Some(mut existing) = store.remove(&held_key) else {
                    continue;
                };
                if orientation == Orientation::Swapped {
                    game.swap_sides();
                }
                debug!(%provider, game = %existing, ?orientation, "merging");
                existing.merge(game);

                // A merge can firm up the date, so re-key.
                match store.entry(existing.key()) {
                    Entry::Occupied(mut slot) => slot.get_mut().merge(existing),
                    Entry::Vacant(slot) => {
                        slot.insert(existing);
                    }
                }
            }
        }

        self.status.write().insert(
            provider,
            ProviderStatus {
                provider,
                state: ProviderState::Active,
                games: count,
                last_error: None,
            },
        );
        info!(%provider, games = count, "ingested");
        count
    }

    /// Record that fetching from `provider` failed
    pub fn mark_unavailable(&self, provider: Provider, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%provider, %reason, "provider unavailable");
        let mut status = self.status.write();
        let entry = status
            .entry(provider)
            .or_insert_with(|| ProviderStatus::unavailable(provider));
        entry.state = ProviderState::Unavailable;
        entry.last_error = Some(reason);
    }

    /// Snapshot of every game by date, then kickoff. Unknown dates and
    /// times sort last.
    pub fn games(&self) -> Vec<Game> {
        let store = self.games.read();
        let mut games: Vec<Game> = store.values().cloned().collect();
        games.sort_by(|a, b| {
            none_last(a.date, b.date)
                .then_with(|| none_last(a.start_time, b.start_time))
                .then_with(|| a.key().cmp(&b.key()))
        });
        games
    }

    /// Snapshot of one game
    pub fn game(&self, key: &GameKey) -> Option<Game> {
        self.games.read().get(key).cloned()
    }

    /// Number of games held
    pub fn len(&self) -> usize {
        self.games.read().len()
    }

    /// Whether no games are held
    pub fn is_empty(&self) -> bool {
        self.games.read().is_empty()
    }

    /// Moneyline arbitrage for one game at the best available prices
    pub fn find_arbitrage(&self, game: &Game) -> Option<Arbitrage> {
        let home = best_price(game, BetType::Moneyline, Selection::Home)?;
        let away = best_price(game, BetType::Moneyline, Selection::Away)?;

        let p_home = home.odds.implied_probability();
        let p_away = away.odds.implied_probability();
        let implied_total = p_home + p_away;
        if implied_total >= 1.0 - self.config.min_arbitrage_margin() - PROBABILITY_EPSILON {
            return None;
        }

        debug!(game = %game, implied_total, "arbitrage found");
        Some(Arbitrage {
            game_id: game.id.clone(),
            legs: [
                ArbitrageLeg {
                    selection: Selection::Home,
                    price: home,
                    stake_fraction: p_home / implied_total,
                },
                ArbitrageLeg {
                    selection: Selection::Away,
                    price: away,
                    stake_fraction: p_away / implied_total,
                },
            ],
            implied_total,
            margin: 1.0 - implied_total,
        })
    }

    /// Arbitrage across every held game, widest margin first
    pub fn arbitrage_opportunities(&self) -> Vec<Arbitrage> {
        let mut found: Vec<Arbitrage> = self
            .games()
            .iter()
            .filter_map(|g| self.find_arbitrage(g))
            .collect();
        found.sort_by(|a, b| b.margin.total_cmp(&a.margin));
        found
    }

    /// Exchange moneylines at least `min_mispricing_delta` points away from
    /// `reference_book`, largest gap first.
    ///
    /// Lines beyond +/-1000 on either side are skipped. A game the reference
    /// book does not price yields nothing.
    pub fn find_mispricing(&self, game: &Game, reference_book: &str) -> Vec<Mispricing> {
        let Some(reference) = game.quotes_for(BetType::Moneyline).find(|q| {
            !q.provider.is_exchange() && q.bookmaker.eq_ignore_ascii_case(reference_book)
        }) else {
            return Vec::new();
        };

        let min_delta = self.config.min_mispricing_delta();
        let mut found = Vec::new();
        for quote in game
            .quotes_for(BetType::Moneyline)
            .filter(|q| q.provider.is_exchange())
        {
            for selection in [Selection::Home, Selection::Away] {
                let (Some(r), Some(x)) = (
                    reference.line.price(selection),
                    quote.line.price(selection),
                ) else {
                    continue;
                };
                if r.value().unsigned_abs() > MAX_COMPARABLE_ODDS
                    || x.value().unsigned_abs() > MAX_COMPARABLE_ODDS
                    || r.points_from(x) < min_delta
                {
                    continue;
                }
                let m = mispricing(game, selection, quote.provider, &reference.bookmaker, r, x);
                debug!(game = %game, provider = %m.provider, delta = m.delta_points, "mispricing found");
                found.push(m);
            }
        }
        found.sort_by(|a, b| b.delta_points.cmp(&a.delta_points));
        found
    }

    /// Mispricing across every held game, largest gap first
    pub fn mispricing_opportunities(&self, reference_book: &str) -> Vec<Mispricing> {
        let mut found: Vec<Mispricing> = self
            .games()
            .iter()
            .flat_map(|g| self.find_mispricing(g, reference_book))
            .collect();
        found.sort_by(|a, b| b.delta_points.cmp(&a.delta_points));
        found
    }

    /// Status of each enabled provider
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        let status = self.status.read();
        self.config
            .providers()
            .iter()
            .map(|&p| {
                status
                    .get(&p)
                    .cloned()
                    .unwrap_or_else(|| ProviderStatus::unavailable(p))
            })
            .collect()
    }

    /// Drop every game and provider status
    pub fn clear(&self) {
        self.games.write().clear();
        self.status.write().clear();
    }
}
