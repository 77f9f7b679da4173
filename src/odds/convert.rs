//! Cents to American odds.
//!
//! The computed formula below is the only conversion in the crate; there is
//! no lookup table to drift out of sync with it.
//!
//! For a price of `c` cents the contract wins `100 - c`:
//!
//! - `c >= 50` (favorite): `-(c / (100 - c) * 100)`
//! - `c < 50` (underdog): `(100 - c) / c * 100`
//!
//! Both are rounded half away from zero in integer arithmetic, so the result
//! is exact and 50 cents is always `-100`. Out-of-range input is clamped to
//! 1 or 99 before either denominator is formed.

use super::AmericanOdds;
use crate::error::Error;
use crate::types::Cents;

/// Odds for a price already known to be in 1-99
const fn odds_for(cents: u8) -> i32 {
    let c = cents as i32;
    let win = 100 - c;
    if c >= 50 {
        // round(100c / win), half up
        -((200 * c + win) / (2 * win))
    } else {
        (200 * win + c) / (2 * c)
    }
}

/// Convert an integer price in cents into American odds.
///
/// Values at or below zero are treated as 1 cent and values at or above 100
/// as 99 cents.
///
/// # Example
///
/// ```rust
/// use market_odds::odds::cents_to_american_odds;
///
/// assert_eq!(cents_to_american_odds(53).value(), -113);
/// assert_eq!(cents_to_american_odds(48).value(), 108);
/// assert_eq!(cents_to_american_odds(50).value(), -100);
/// assert_eq!(cents_to_american_odds(0), cents_to_american_odds(1));
/// ```
#[must_use]
pub fn cents_to_american_odds(cents: i64) -> AmericanOdds {
    Cents::clamped(cents).to_american_odds()
}

/// Convert a real-valued price in cents into American odds.
///
/// The price is rounded to the nearest whole cent, then clamped like
/// [`cents_to_american_odds`].
///
/// # Errors
///
/// Returns [`Error::InvalidPrice`] for NaN or infinite input.
pub fn price_to_american_odds(cents: f64) -> Result<AmericanOdds, Error> {
    Ok(Cents::from_f64(cents)?.to_american_odds())
}

/// Approximate price in cents implied by American odds.
///
/// Lossy: converting back after [`cents_to_american_odds`] lands within a
/// tenth of a cent of the input, but is rarely a whole number.
#[must_use]
pub fn american_odds_to_cents(odds: AmericanOdds) -> f64 {
    odds.implied_probability() * 100.0
}

impl Cents {
    /// American odds for this price
    #[must_use]
    pub const fn to_american_odds(self) -> AmericanOdds {
        AmericanOdds::from_raw(odds_for(self.get()))
    }
}

impl AmericanOdds {
    /// Nearest whole-cent price implied by these odds
    #[must_use]
    pub fn to_cents(self) -> Cents {
        Cents::clamped(american_odds_to_cents(self).round() as i64)
    }
}
