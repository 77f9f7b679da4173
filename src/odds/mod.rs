//! Odds representations and conversions.
//!
//! Every provider price in this crate ends up as [`AmericanOdds`]:
//!
//! - prediction-market prices in cents go through [`cents_to_american_odds`]
//! - 0-1 probability prices go through [`Cents::from_probability`] first
//! - decimal sportsbook prices go through [`AmericanOdds::from_decimal`]
//!
//! # Example
//!
//! ```rust
//! use market_odds::odds::{american_odds_to_cents, cents_to_american_odds};
//!
//! let odds = cents_to_american_odds(65);
//! assert_eq!(odds.to_string(), "-186");
//! assert!((american_odds_to_cents(odds) - 65.0).abs() < 1.0);
//! ```
//!
//! [`Cents::from_probability`]: crate::types::Cents::from_probability

mod convert;
mod table;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use convert::{american_odds_to_cents, cents_to_american_odds, price_to_american_odds};
pub use table::{ConversionRow, ConversionTable};

/// Signed American odds.
///
/// Negative values are favorites (stake needed to win 100), positive values
/// are underdogs (winnings on a 100 stake). Valid odds satisfy `|v| >= 100`;
/// `+100` and `-100` both mean even money.
///
/// Ordering is numeric. Apart from `-100` vs `+100`, which pay the same,
/// numeric order is also payout order: any positive line beats any negative
/// one, and within a sign the larger number pays more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    /// Even money, favorite convention
    pub const EVEN: AmericanOdds = AmericanOdds(-100);

    /// Validate a raw odds value
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOdds`] if `|value| < 100` or the value does not
    /// fit in an `i32`.
    pub fn new(value: i64) -> Result<Self, Error> {
        if value.unsigned_abs() < 100 || i32::try_from(value).is_err() {
            return Err(Error::InvalidOdds(value));
        }
        Ok(AmericanOdds(value as i32))
    }

    pub(crate) const fn from_raw(value: i32) -> Self {
        AmericanOdds(value)
    }

    /// Convert decimal (European) odds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrice`] if `decimal` is not finite or not above
    /// 1.0, and [`Error::InvalidOdds`] if the result overflows.
    pub fn from_decimal(decimal: f64) -> Result<Self, Error> {
        if !decimal.is_finite() || decimal <= 1.0 {
            return Err(Error::InvalidPrice(decimal.to_string()));
        }
        let raw = if decimal >= 2.0 {
            ((decimal - 1.0) * 100.0).round()
        } else {
            (-100.0 / (decimal - 1.0)).round()
        };
        if raw.abs() > f64::from(i32::MAX) {
            return Err(Error::InvalidOdds(raw as i64));
        }
        Self::new(raw as i64)
    }

    /// Raw signed value
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Negative line (price at or above 50 cents)
    #[must_use]
    pub const fn is_favorite(self) -> bool {
        self.0 < 0
    }

    /// Decimal odds: total return per unit staked
    #[must_use]
    pub fn to_decimal(self) -> f64 {
        let v = f64::from(self.0);
        if self.0 > 0 {
            v / 100.0 + 1.0
        } else {
            100.0 / v.abs() + 1.0
        }
    }

    /// Implied probability in 0-1, vig included
    #[must_use]
    pub fn implied_probability(self) -> f64 {
        let v = f64::from(self.0);
        if self.0 > 0 {
            100.0 / (v + 100.0)
        } else {
            v.abs() / (v.abs() + 100.0)
        }
    }

    /// Winnings on `stake`, excluding the returned stake
    #[must_use]
    pub fn profit(self, stake: f64) -> f64 {
        stake * (self.to_decimal() - 1.0)
    }

    /// Whether a bettor would rather take `self` than `other`
    #[must_use]
    pub fn pays_more_than(self, other: AmericanOdds) -> bool {
        self.to_decimal() > other.to_decimal()
    }

    /// Distance from `other` in odds points, with `-100` and `+100` as the
    /// same line (so `-105` to `+105` is 10 points)
    #[must_use]
    pub fn points_from(self, other: AmericanOdds) -> u32 {
        if (self.0 > 0) == (other.0 > 0) {
            self.0.abs_diff(other.0)
        } else {
            (self.0.unsigned_abs() - 100) + (other.0.unsigned_abs() - 100)
        }
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for AmericanOdds {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let value: i64 = digits
            .parse()
            .map_err(|_| Error::ParseOdds(s.to_string()))?;
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for AmericanOdds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        AmericanOdds::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odds(v: i64) -> AmericanOdds {
        AmericanOdds::new(v).unwrap()
    }

    #[test]
    fn test_new_rejects_small_magnitudes() {
        assert!(AmericanOdds::new(0).is_err());
        assert!(AmericanOdds::new(99).is_err());
        assert!(AmericanOdds::new(-99).is_err());
        assert!(AmericanOdds::new(i64::MIN).is_err());
        assert!(AmericanOdds::new(100).is_ok());
        assert!(AmericanOdds::new(-100).is_ok());
    }

    #[test]
    fn test_decimal_conversions() {
        assert!((odds(150).to_decimal() - 2.5).abs() < 1e-12);
        assert!((odds(-200).to_decimal() - 1.5).abs() < 1e-12);
        assert_eq!(AmericanOdds::from_decimal(2.5).unwrap(), odds(150));
        assert_eq!(AmericanOdds::from_decimal(1.5).unwrap(), odds(-200));
        assert_eq!(AmericanOdds::from_decimal(1.91).unwrap(), odds(-110));
        assert_eq!(AmericanOdds::from_decimal(2.0).unwrap().value(), 100);
        assert!(AmericanOdds::from_decimal(1.0).is_err());
        assert!(AmericanOdds::from_decimal(f64::NAN).is_err());
    }

    #[test]
    fn test_implied_probability() {
        assert!((odds(100).implied_probability() - 0.5).abs() < 1e-12);
        assert!((odds(-100).implied_probability() - 0.5).abs() < 1e-12);
        assert!((odds(-300).implied_probability() - 0.75).abs() < 1e-12);
        assert!((odds(300).implied_probability() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_profit() {
        assert!((odds(150).profit(10.0) - 15.0).abs() < 1e-9);
        assert!((odds(-110).profit(110.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_from() {
        assert_eq!(odds(-160).points_from(odds(-130)), 30);
        assert_eq!(odds(-130).points_from(odds(-160)), 30);
        assert_eq!(odds(150).points_from(odds(120)), 30);
        assert_eq!(odds(-105).points_from(odds(105)), 10);
        assert_eq!(AmericanOdds::EVEN.points_from(odds(100)), 0);
    }

    #[test]
    fn test_ordering_follows_payout() {
        assert!(odds(-110).pays_more_than(odds(-120)));
        assert!(odds(120).pays_more_than(odds(110)));
        assert!(odds(101).pays_more_than(odds(-101)));
        assert!(!odds(-100).pays_more_than(odds(100)));
        assert!(!odds(100).pays_more_than(odds(-100)));
        assert!(odds(-100) < odds(100));
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(odds(108).to_string(), "+108");
        assert_eq!(odds(-113).to_string(), "-113");
        assert_eq!("+108".parse::<AmericanOdds>().unwrap(), odds(108));
        assert_eq!(" -113 ".parse::<AmericanOdds>().unwrap(), odds(-113));
        assert_eq!("250".parse::<AmericanOdds>().unwrap(), odds(250));
        assert!(matches!(
            "even".parse::<AmericanOdds>(),
            Err(Error::ParseOdds(_))
        ));
        assert!(matches!(
            "+50".parse::<AmericanOdds>(),
            Err(Error::InvalidOdds(50))
        ));
    }

    #[test]
    fn test_serde_validates() {
        let o: AmericanOdds = serde_json::from_str("-145").unwrap();
        assert_eq!(o.value(), -145);
        assert!(serde_json::from_str::<AmericanOdds>("12").is_err());
        assert_eq!(serde_json::to_string(&o).unwrap(), "-145");
    }
}
