//! Kalshi trading fees.
//!
//! Kalshi charges `rate * C * P * (1 - P)` dollars per fill, rounded up to
//! the next cent, where `C` is the contract count and `P` the price in
//! dollars. In cents with the rate in basis points that is
//!
//! ```text
//! ceil(bps * C * p * (100 - p) / 1_000_000)
//! ```

use crate::config::FeeSchedule;
use crate::types::{Cents, Quantity};

/// Which side of the match a fill was on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeRole {
    /// Aggressing order
    Taker,
    /// Resting order
    Maker,
}

impl FeeRole {
    /// Role from a fill's `is_taker` flag
    pub fn from_is_taker(is_taker: bool) -> Self {
        if is_taker {
            FeeRole::Taker
        } else {
            FeeRole::Maker
        }
    }

    /// Rate for this role in basis points
    pub fn rate_bps(self, schedule: &FeeSchedule) -> u32 {
        match self {
            FeeRole::Taker => schedule.taker_bps,
            FeeRole::Maker => schedule.maker_bps,
        }
    }
}

/// Fee in cents for `contracts` filled at `price`.
///
/// # Example
///
/// ```rust
/// use market_odds::config::FeeSchedule;
/// use market_odds::fees::{fee_cents, FeeRole};
/// use market_odds::types::Cents;
///
/// // 0.07 * 100 * 0.50 * 0.50 = $1.75
/// let fee = fee_cents(Cents::EVEN, 100, FeeRole::Taker, &FeeSchedule::default());
/// assert_eq!(fee, 175);
/// ```
pub fn fee_cents(price: Cents, contracts: Quantity, role: FeeRole, schedule: &FeeSchedule) -> i64 {
    let p = u128::from(price.get());
    // u32 rate times u32 count times at most 2500 fits in u128
    let numerator = u128::from(role.rate_bps(schedule)) * u128::from(contracts) * p * (100 - p);
    // ceil without floats
    i64::try_from(numerator.div_ceil(1_000_000)).unwrap_or(i64::MAX)
}
