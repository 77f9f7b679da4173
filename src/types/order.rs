//! Contract side and trade action.

use serde::{Deserialize, Serialize};

/// Contract side (Yes or No)
///
/// Every Kalshi market is a binary contract where you can buy/sell
/// either YES or NO contracts. The prices always sum to 100 cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Yes contracts - pay out $1 if the event happens
    Yes,
    /// No contracts - pay out $1 if the event doesn't happen
    No,
}

/// Trade action (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Buy contracts
    Buy,
    /// Sell contracts
    Sell,
}
