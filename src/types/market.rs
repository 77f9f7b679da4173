//! Kalshi market, fill and settlement types.
//!
//! Prices on these records are whole cents. A zero quote means the book has
//! no order on that side, so accessors treat zero as missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::{Action, Side};
use super::{Cents, Quantity};
use crate::config::PriceSource;

/// Market status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    /// Market has not yet opened for trading
    Unopened,
    /// Market is open for trading
    Open,
    /// Market is active (alias for open)
    Active,
    /// Market is closed (no more trading)
    Closed,
    /// Market has been settled
    Settled,
    /// Market has been finalized after settlement
    Finalized,
}

/// Settlement result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementResult {
    /// Yes contracts paid out
    Yes,
    /// No contracts paid out
    No,
}

impl SettlementResult {
    /// The side whose contracts paid out
    pub fn winning_side(self) -> Side {
        match self {
            SettlementResult::Yes => Side::Yes,
            SettlementResult::No => Side::No,
        }
    }
}

/// Deserialize helper that treats empty strings as None
fn deserialize_optional_settlement<'de, D>(
    deserializer: D,
) -> Result<Option<SettlementResult>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::IntoDeserializer;

    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => SettlementResult::deserialize(s.into_deserializer()).map(Some),
    }
}

fn quote(raw: Option<i64>) -> Option<Cents> {
    raw.filter(|&c| c > 0 && c < 100).map(Cents::clamped)
}

/// A Kalshi market (binary contract)
#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    /// Unique market ticker (e.g., "KXNFLGAME-25SEP08DALPHI-PHI")
    pub ticker: String,

    /// Event ticker this market belongs to
    #[serde(default)]
    pub event_ticker: String,

    /// Series ticker this market belongs to
    #[serde(default)]
    pub series_ticker: Option<String>,

    /// Market title/question
    #[serde(default)]
    pub title: String,

    /// Subtitle (short description)
    #[serde(default)]
    pub subtitle: String,

    /// Market status
    pub status: MarketStatus,

    /// Yes bid in cents
    pub yes_bid: Option<i64>,

    /// Yes ask in cents
    pub yes_ask: Option<i64>,

    /// No bid in cents
    pub no_bid: Option<i64>,

    /// No ask in cents
    pub no_ask: Option<i64>,

    /// Last trade price in cents
    pub last_price: Option<i64>,

    /// 24h volume (number of contracts traded)
    #[serde(default)]
    pub volume: i64,

    /// Open interest (contracts outstanding)
    #[serde(default)]
    pub open_interest: i64,

    /// When trading opens
    pub open_time: Option<DateTime<Utc>>,

    /// When trading closes; for game markets often well after the game
    pub close_time: Option<DateTime<Utc>>,

    /// Expected expiration
    pub expected_expiration_time: Option<DateTime<Utc>>,

    /// Settlement result (if settled)
    #[serde(default, deserialize_with = "deserialize_optional_settlement")]
    pub result: Option<SettlementResult>,

    /// Yes sub-title (usually the team the YES contract backs)
    pub yes_sub_title: Option<String>,

    /// No sub-title
    pub no_sub_title: Option<String>,
}

impl Market {
    /// Mid price in cents (average of yes bid and ask)
    pub fn mid_price(&self) -> Option<Cents> {
        match (quote(self.yes_bid), quote(self.yes_ask)) {
            (Some(bid), Some(ask)) => Some(Cents::clamped(
                (i64::from(bid.get()) + i64::from(ask.get()) + 1) / 2,
            )),
            _ => None,
        }
    }

    /// Check if the market is tradeable
    pub fn is_tradeable(&self) -> bool {
        matches!(self.status, MarketStatus::Open | MarketStatus::Active)
    }

    /// YES price according to `source`
    pub fn yes_price(&self, source: PriceSource) -> Option<Cents> {
        match source {
            PriceSource::Ask => quote(self.yes_ask),
            PriceSource::Bid => quote(self.yes_bid),
            PriceSource::Mid => self.mid_price(),
            PriceSource::Last => quote(self.last_price),
        }
    }

    /// NO price according to `source`, falling back to the YES complement
    pub fn no_price(&self, source: PriceSource) -> Option<Cents> {
        let direct = match source {
            PriceSource::Ask => quote(self.no_ask),
            PriceSource::Bid => quote(self.no_bid),
            PriceSource::Mid | PriceSource::Last => None,
        };
        direct.or_else(|| self.yes_price(source).map(Cents::complement))
    }
}

/// Response from GetMarkets endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GetMarketsResponse {
    /// List of markets
    pub markets: Vec<Market>,

    /// Cursor for pagination
    pub cursor: Option<String>,
}

/// A fill (your order matched)
#[derive(Debug, Clone, Deserialize)]
pub struct Fill {
    /// Trade ID
    pub trade_id: Option<String>,

    /// Order ID
    #[serde(default)]
    pub order_id: String,

    /// Market ticker
    pub ticker: String,

    /// Side (yes or no)
    pub side: Side,

    /// Action (buy or sell)
    pub action: Action,

    /// Number of contracts filled
    pub count: Quantity,

    /// Yes price in cents
    pub yes_price: Cents,

    /// No price in cents
    pub no_price: Cents,

    /// Whether you were the taker
    #[serde(default)]
    pub is_taker: bool,

    /// Timestamp when fill occurred
    pub created_time: Option<DateTime<Utc>>,
}

impl Fill {
    /// Price paid or received per contract on the filled side
    pub fn side_price(&self) -> Cents {
        match self.side {
            Side::Yes => self.yes_price,
            Side::No => self.no_price,
        }
    }

    /// Notional value in cents (`count * side price`)
    pub fn notional_cents(&self) -> i64 {
        i64::from(self.count) * i64::from(self.side_price().get())
    }
}

/// Response from GetFills endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GetFillsResponse {
    /// List of fills
    pub fills: Vec<Fill>,

    /// Cursor for pagination
    pub cursor: Option<String>,
}

/// Settlement record
#[derive(Debug, Clone, Deserialize)]
pub struct Settlement {
    /// Market ticker
    pub ticker: String,

    /// Settlement result (yes or no)
    #[serde(
        default,
        alias = "result",
        deserialize_with = "deserialize_optional_settlement"
    )]
    pub market_result: Option<SettlementResult>,

    /// YES contracts held at settlement, as reported by the exchange
    pub yes_count: Option<i64>,

    /// NO contracts held at settlement, as reported by the exchange
    pub no_count: Option<i64>,

    /// Revenue from settlement in cents
    #[serde(default)]
    pub revenue: i64,

    /// Timestamp when settled
    pub settled_time: Option<DateTime<Utc>>,
}

/// Response from GetSettlements endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GetSettlementsResponse {
    /// List of settlements
    pub settlements: Vec<Settlement>,

    /// Cursor for pagination
    pub cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(yes_bid: Option<i64>, yes_ask: Option<i64>) -> Market {
        Market {
            ticker: "TEST".to_string(),
            event_ticker: "TEST-EVENT".to_string(),
            series_ticker: None,
            title: "Test".to_string(),
            subtitle: "Test".to_string(),
            status: MarketStatus::Open,
            yes_bid,
            yes_ask,
            no_bid: None,
            no_ask: None,
            last_price: Some(50),
            volume: 1000,
            open_interest: 100,
            open_time: None,
            close_time: None,
            expected_expiration_time: None,
            result: None,
            yes_sub_title: None,
            no_sub_title: None,
        }
    }

    #[test]
    fn test_market_mid_price() {
        let m = market(Some(45), Some(55));
        assert_eq!(m.mid_price(), Some(Cents::EVEN));
        assert!(m.is_tradeable());
    }

    #[test]
    fn test_only_open_markets_trade() {
        for status in [MarketStatus::Unopened, MarketStatus::Closed, MarketStatus::Settled] {
            let mut m = market(Some(45), Some(55));
            m.status = status;
            assert!(!m.is_tradeable(), "{status:?}");
        }
    }

    #[test]
    fn test_zero_quote_is_missing() {
        let m = market(Some(0), Some(0));
        assert_eq!(m.yes_price(PriceSource::Ask), None);
        assert_eq!(m.mid_price(), None);
        assert_eq!(m.yes_price(PriceSource::Last), Some(Cents::EVEN));
    }

    #[test]
    fn test_no_price_falls_back_to_complement() {
        let m = market(Some(60), Some(62));
        assert_eq!(m.no_price(PriceSource::Ask), Some(Cents::clamped(38)));

        let mut m = market(Some(60), Some(62));
        m.no_ask = Some(40);
        assert_eq!(m.no_price(PriceSource::Ask), Some(Cents::clamped(40)));
    }

    #[test]
    fn test_market_status_serde() {
        let json = serde_json::to_string(&MarketStatus::Open).unwrap();
        assert_eq!(json, "\"open\"");
    }

    #[test]
    fn test_settlement_empty_result() {
        let s: Settlement =
            serde_json::from_str(r#"{"ticker":"T","market_result":"","revenue":0}"#).unwrap();
        assert_eq!(s.market_result, None);

        let s: Settlement = serde_json::from_str(
            r#"{"ticker":"T","result":"no","revenue":300,"settled_time":"2025-09-05T04:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(s.market_result, Some(SettlementResult::No));
        assert_eq!(
            s.settled_time.map(|t| t.date_naive().to_string()).as_deref(),
            Some("2025-09-05")
        );
    }

    #[test]
    fn test_fill_notional() {
        let fill: Fill = serde_json::from_str(
            r#"{"ticker":"T","side":"no","action":"buy","count":10,
                "yes_price":35,"no_price":65,"is_taker":true}"#,
        )
        .unwrap();
        assert_eq!(fill.side_price().get(), 65);
        assert_eq!(fill.notional_cents(), 650);
    }
}
