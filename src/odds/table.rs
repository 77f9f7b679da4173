//! Printable cents-to-odds reference table.

use std::fmt;

use super::AmericanOdds;
use crate::types::Cents;

/// One row of the reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRow {
    /// Contract price
    pub cents: Cents,
    /// Odds for that price
    pub odds: AmericanOdds,
}

/// Cents-to-odds rows for a contiguous price range.
///
/// # Example
///
/// ```rust
/// use market_odds::odds::ConversionTable;
///
/// let table = ConversionTable::range(45, 55);
/// assert_eq!(table.rows().len(), 11);
/// println!("{table}");
/// ```
#[derive(Debug, Clone)]
pub struct ConversionTable {
    rows: Vec<ConversionRow>,
}

impl ConversionTable {
    /// Every price from 1 to 99
    #[must_use]
    pub fn full() -> Self {
        Self::range(1, 99)
    }

    /// Prices from `start` to `end` inclusive, clamped to 1-99.
    ///
    /// An inverted range yields an empty table.
    #[must_use]
    pub fn range(start: i64, end: i64) -> Self {
        let start = Cents::clamped(start).get();
        let end = Cents::clamped(end).get();
        let rows = (start..=end)
            .map(|c| {
                let cents = Cents::clamped(i64::from(c));
                ConversionRow {
                    cents,
                    odds: cents.to_american_odds(),
                }
            })
            .collect();
        Self { rows }
    }

    /// Rows in ascending price order
    pub fn rows(&self) -> &[ConversionRow] {
        &self.rows
    }

    /// Odds for `cents`, if the table covers it
    pub fn lookup(&self, cents: Cents) -> Option<AmericanOdds> {
        self.rows.iter().find(|r| r.cents == cents).map(|r| r.odds)
    }
}

impl fmt::Display for ConversionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8}{:<15}{:<15}", "Cents", "American Odds", "Implied Prob")?;
        writeln!(f, "{:-<38}", "")?;
        for row in &self.rows {
            let c = row.cents.get();
            // digits, the cent sign and padding fill 8 columns
            let pad = if c < 10 { 6 } else { 5 };
            writeln!(f, "{c}¢{:pad$}{:<+15}{c}%", "", row.odds.value())?;
        }
        Ok(())
    }
}
