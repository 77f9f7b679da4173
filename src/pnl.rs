//! Profit and loss from Kalshi fills and settlements.
//!
//! Fills are folded per ticker into cash flows and open contracts. A
//! settlement pays 100 cents per open contract on the winning side; that
//! computed payout is kept next to the exchange-reported revenue so the two
//! can be reconciled. Realized P&L is also bucketed by the UTC date the
//! exchange settled each market.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::FeeSchedule;
use crate::fees::{fee_cents, FeeRole};
use crate::types::market::SettlementResult;
use crate::types::{Action, Fill, Settlement, Side};

/// Cents paid per winning contract
const PAYOUT_CENTS: i64 = 100;

/// Cash flows and position for one market. All amounts are cents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarketPnl {
    /// Market ticker
    pub ticker: String,
    /// Number of fills
    pub fills: usize,
    /// YES contracts bought
    pub yes_bought: i64,
    /// YES contracts sold
    pub yes_sold: i64,
    /// NO contracts bought
    pub no_bought: i64,
    /// NO contracts sold
    pub no_sold: i64,
    /// Paid for buys
    pub cash_out: i64,
    /// Received from sells
    pub cash_in: i64,
    /// Estimated trading fees
    pub fees: i64,
    /// Contracts filled as taker
    pub taker_volume: i64,
    /// Contracts filled as maker
    pub maker_volume: i64,
    /// Settlement outcome, once settled
    pub result: Option<SettlementResult>,
    /// Payout computed from the open position at settlement
    pub payout: i64,
    /// Revenue the exchange reported for the settlement
    pub reported_revenue: Option<i64>,
    /// When the exchange settled the market
    pub settled_time: Option<DateTime<Utc>>,
}

impl MarketPnl {
    fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            ..Self::default()
        }
    }

    fn apply_fill(&mut self, fill: &Fill, schedule: &FeeSchedule) {
        let count = i64::from(fill.count);
        let notional = fill.notional_cents();
        match (fill.side, fill.action) {
            (Side::Yes, Action::Buy) => self.yes_bought += count,
            (Side::Yes, Action::Sell) => self.yes_sold += count,
            (Side::No, Action::Buy) => self.no_bought += count,
            (Side::No, Action::Sell) => self.no_sold += count,
        }
        match fill.action {
            Action::Buy => self.cash_out += notional,
            Action::Sell => self.cash_in += notional,
        }

        let role = FeeRole::from_is_taker(fill.is_taker);
        self.fees += fee_cents(fill.side_price(), fill.count, role, schedule);
        match role {
            FeeRole::Taker => self.taker_volume += count,
            FeeRole::Maker => self.maker_volume += count,
        }
        self.fills += 1;
    }

    fn apply_settlement(&mut self, settlement: &Settlement, result: SettlementResult) {
        let winners = match result.winning_side() {
            Side::Yes => self.open_yes(),
            Side::No => self.open_no(),
        };
        self.result = Some(result);
        self.payout = winners.max(0) * PAYOUT_CENTS;
        self.reported_revenue = Some(settlement.revenue);
        self.settled_time = settlement.settled_time;
    }

    /// YES contracts still held
    pub fn open_yes(&self) -> i64 {
        self.yes_bought - self.yes_sold
    }

    /// NO contracts still held
    pub fn open_no(&self) -> i64 {
        self.no_bought - self.no_sold
    }

    /// Whether the market has settled
    pub fn is_settled(&self) -> bool {
        self.result.is_some()
    }

    /// `cash_in + payout - cash_out - fees`, once settled
    pub fn realized(&self) -> Option<i64> {
        self.is_settled()
            .then(|| self.cash_in + self.payout - self.cash_out - self.fees)
    }

    /// Reported revenue minus computed payout, once settled
    pub fn revenue_discrepancy(&self) -> Option<i64> {
        self.reported_revenue.map(|r| r - self.payout)
    }
}

/// Realized P&L of the markets settled on one UTC date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPnl {
    /// Settlement date
    pub date: NaiveDate,
    /// Realized P&L that day
    pub realized: i64,
    /// Markets settled that day with positive P&L
    pub wins: usize,
    /// Markets settled that day with negative P&L
    pub losses: usize,
    /// Markets settled that day
    pub markets: usize,
    /// Running total through this day
    pub cumulative: i64,
}

impl DailyPnl {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            realized: 0,
            wins: 0,
            losses: 0,
            markets: 0,
            cumulative: 0,
        }
    }

    /// Share of the day's non-flat markets that made money
    pub fn win_rate(&self) -> Option<f64> {
        let decided = self.wins + self.losses;
        (decided > 0).then(|| self.wins as f64 / decided as f64)
    }
}

/// Portfolio-level P&L
#[derive(Debug, Clone, Default, Serialize)]
pub struct PnlSummary {
    /// Per-market results, sorted by ticker
    pub markets: Vec<MarketPnl>,
    /// Sum of realized P&L over settled markets
    pub realized: i64,
    /// Sum of estimated fees
    pub fees: i64,
    /// Settled markets with positive P&L
    pub wins: usize,
    /// Settled markets with negative P&L
    pub losses: usize,
    /// Sum of winning P&L
    pub gross_profit: i64,
    /// Sum of losing P&L (non-positive)
    pub gross_loss: i64,
    /// Contracts filled as taker
    pub taker_volume: i64,
    /// Contracts filled as maker
    pub maker_volume: i64,
    /// Traded tickers without a settlement
    pub unsettled: Vec<String>,
    /// Settlements for tickers with no fills
    pub unmatched_settlements: Vec<String>,
    /// Realized P&L per settlement date, oldest first. Markets settled
    /// without a timestamp are left out.
    pub daily: Vec<DailyPnl>,
}

impl PnlSummary {
    /// Share of settled, non-flat markets that made money
    pub fn win_rate(&self) -> Option<f64> {
        let decided = self.wins + self.losses;
        (decided > 0).then(|| self.wins as f64 / decided as f64)
    }

    /// Gross profit over gross loss; `None` without losses
    pub fn profit_factor(&self) -> Option<f64> {
        (self.gross_loss < 0).then(|| self.gross_profit as f64 / -(self.gross_loss as f64))
    }

    /// Largest fall of the daily running total from an earlier peak, with
    /// the starting balance of zero counting as a peak
    pub fn max_drawdown(&self) -> i64 {
        let mut peak = 0;
        let mut worst = 0;
        for day in &self.daily {
            peak = peak.max(day.cumulative);
            worst = worst.max(peak - day.cumulative);
        }
        worst
    }

    /// Up to `n` settled markets with the highest realized P&L, best first
    pub fn best_markets(&self, n: usize) -> Vec<&MarketPnl> {
        let mut settled = self.settled();
        settled.sort_by_key(|m| std::cmp::Reverse(m.realized()));
        settled.truncate(n);
        settled
    }

    /// Up to `n` settled markets with the lowest realized P&L, worst first
    pub fn worst_markets(&self, n: usize) -> Vec<&MarketPnl> {
        let mut settled = self.settled();
        settled.sort_by_key(|m| m.realized());
        settled.truncate(n);
        settled
    }

    fn settled(&self) -> Vec<&MarketPnl> {
        self.markets.iter().filter(|m| m.is_settled()).collect()
    }

    /// Look up one market
    pub fn market(&self, ticker: &str) -> Option<&MarketPnl> {
        self.markets
            .binary_search_by(|m| m.ticker.as_str().cmp(ticker))
            .ok()
            .map(|i| &self.markets[i])
    }
}

/// Reconcile fills against settlements.
///
/// # Example
///
/// ```rust
/// use market_odds::config::FeeSchedule;
/// use market_odds::pnl::reconcile;
/// use market_odds::types::{Fill, Settlement};
///
/// let fills: Vec<Fill> = serde_json::from_str(r#"[{"ticker":"T","side":"yes",
///     "action":"buy","count":10,"yes_price":40,"no_price":60,"is_taker":false}]"#).unwrap();
/// let settlements: Vec<Settlement> =
///     serde_json::from_str(r#"[{"ticker":"T","market_result":"yes","revenue":1000}]"#).unwrap();
///
/// let summary = reconcile(&fills, &settlements, &FeeSchedule::default());
/// // 1000 payout - 400 cost - 5 maker fee
/// assert_eq!(summary.realized, 595);
/// ```
pub fn reconcile(fills: &[Fill], settlements: &[Settlement], schedule: &FeeSchedule) -> PnlSummary {
    let mut by_ticker: FxHashMap<&str, MarketPnl> = FxHashMap::default();
    for fill in fills {
        by_ticker
            .entry(fill.ticker.as_str())
            .or_insert_with(|| MarketPnl::new(&fill.ticker))
            .apply_fill(fill, schedule);
    }

    let mut unmatched_settlements = Vec::new();
    for settlement in settlements {
        let Some(market) = by_ticker.get_mut(settlement.ticker.as_str()) else {
            warn!(ticker = %settlement.ticker, revenue = settlement.revenue, "settlement without fills");
            unmatched_settlements.push(settlement.ticker.clone());
            continue;
        };
        let Some(result) = settlement.market_result else {
            debug!(ticker = %settlement.ticker, "settlement without result");
            continue;
        };
        market.apply_settlement(settlement, result);
        if let Some(diff) = market.revenue_discrepancy().filter(|&d| d != 0) {
            warn!(
                ticker = %market.ticker,
                payout = market.payout,
                revenue = settlement.revenue,
                diff,
                "settlement revenue does not match position"
            );
        }
    }

    let mut markets: Vec<MarketPnl> = by_ticker.into_values().collect();
    markets.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    let mut summary = PnlSummary {
        unmatched_settlements,
        ..PnlSummary::default()
    };
    let mut days: BTreeMap<NaiveDate, DailyPnl> = BTreeMap::new();
    for market in &markets {
        summary.fees += market.fees;
        summary.taker_volume += market.taker_volume;
        summary.maker_volume += market.maker_volume;
        match market.realized() {
            None => summary.unsettled.push(market.ticker.clone()),
            Some(pnl) => {
                if let Some(settled) = market.settled_time {
                    let date = settled.date_naive();
                    let day = days.entry(date).or_insert_with(|| DailyPnl::new(date));
                    day.realized += pnl;
                    day.markets += 1;
                    if pnl > 0 {
                        day.wins += 1;
                    } else if pnl < 0 {
                        day.losses += 1;
                    }
                }
                summary.realized += pnl;
                if pnl > 0 {
                    summary.wins += 1;
                    summary.gross_profit += pnl;
                } else if pnl < 0 {
                    summary.losses += 1;
                    summary.gross_loss += pnl;
                }
            }
        }
    }
    summary.markets = markets;

    let mut running = 0;
    summary.daily = days
        .into_values()
        .map(|mut day| {
            running += day.realized;
            day.cumulative = running;
            day
        })
        .collect();

    info!(
        markets = summary.markets.len(),
        realized = summary.realized,
        fees = summary.fees,
        unsettled = summary.unsettled.len(),
        "reconciled"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(ticker: &str, side: &str, action: &str, count: u32, yes: i64, taker: bool) -> Fill {
        serde_json::from_value(serde_json::json!({
            "ticker": ticker,
            "side": side,
            "action": action,
            "count": count,
            "yes_price": yes,
            "no_price": 100 - yes,
            "is_taker": taker,
        }))
        .unwrap()
    }

    fn settlement(ticker: &str, result: &str, revenue: i64) -> Settlement {
        serde_json::from_value(serde_json::json!({
            "ticker": ticker,
            "market_result": result,
            "revenue": revenue,
        }))
        .unwrap()
    }

    fn settled_at(ticker: &str, result: &str, revenue: i64, time: &str) -> Settlement {
        serde_json::from_value(serde_json::json!({
            "ticker": ticker,
            "market_result": result,
            "revenue": revenue,
            "settled_time": time,
        }))
        .unwrap()
    }

    #[test]
    fn test_winning_yes_position() {
        let fills = [fill("A", "yes", "buy", 10, 40, true)];
        let summary = reconcile(&fills, &[settlement("A", "yes", 1000)], &FeeSchedule::default());

        let a = summary.market("A").unwrap();
        assert_eq!(a.cash_out, 400);
        // 7 * 10 * 40 * 60 / 10000 = 16.8 -> 17
        assert_eq!(a.fees, 17);
        assert_eq!(a.payout, 1000);
        assert_eq!(a.revenue_discrepancy(), Some(0));
        assert_eq!(a.realized(), Some(1000 - 400 - 17));
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.profit_factor(), None);
    }

    #[test]
    fn test_losing_no_position() {
        let fills = [fill("B", "no", "buy", 5, 30, false)];
        let summary = reconcile(&fills, &[settlement("B", "yes", 0)], &FeeSchedule::default());

        let b = summary.market("B").unwrap();
        assert_eq!(b.cash_out, 350);
        assert_eq!(b.open_no(), 5);
        assert_eq!(b.payout, 0);
        // maker fee on the NO price: 175 * 5 * 70 * 30 / 1_000_000 = 1.84 -> 2
        assert_eq!(b.fees, 2);
        assert_eq!(b.realized(), Some(-352));
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.win_rate(), Some(0.0));
        assert_eq!(summary.maker_volume, 5);
    }

    #[test]
    fn test_partial_exit_before_settlement() {
        let fills = [
            fill("C", "yes", "buy", 10, 50, true),
            fill("C", "yes", "sell", 4, 70, true),
        ];
        let summary = reconcile(&fills, &[settlement("C", "yes", 600)], &FeeSchedule::default());
        let c = summary.market("C").unwrap();
        assert_eq!(c.open_yes(), 6);
        assert_eq!(c.cash_in, 280);
        assert_eq!(c.payout, 600);
        // fees: ceil(7*10*50*50/10000)=18, ceil(7*4*70*30/10000)=6
        assert_eq!(c.fees, 24);
        assert_eq!(c.realized(), Some(280 + 600 - 500 - 24));
        assert_eq!(summary.taker_volume, 14);
    }

    #[test]
    fn test_revenue_discrepancy() {
        let fills = [fill("D", "yes", "buy", 3, 20, true)];
        let summary = reconcile(&fills, &[settlement("D", "yes", 250)], &FeeSchedule::default());
        assert_eq!(summary.market("D").unwrap().revenue_discrepancy(), Some(-50));
    }

    #[test]
    fn test_unsettled_and_unmatched() {
        let fills = [
            fill("E", "yes", "buy", 1, 60, true),
            fill("F", "yes", "buy", 2, 10, true),
        ];
        let settlements = [settlement("F", "no", 0), settlement("Z", "yes", 100)];
        let summary = reconcile(&fills, &settlements, &FeeSchedule::default());

        assert_eq!(summary.unsettled, vec!["E".to_string()]);
        assert_eq!(summary.unmatched_settlements, vec!["Z".to_string()]);
        assert!(summary.market("E").unwrap().realized().is_none());
        assert_eq!(summary.markets.len(), 2);
    }

    #[test]
    fn test_profit_factor() {
        let fills = [
            fill("G", "yes", "buy", 10, 50, false),
            fill("H", "yes", "buy", 10, 50, false),
        ];
        let settlements = [settlement("G", "yes", 1000), settlement("H", "no", 0)];
        let summary = reconcile(&fills, &settlements, &FeeSchedule::default());
        // maker fee: ceil(175*10*2500/1e6) = 5; G = 1000-500-5, H = -505
        assert_eq!(summary.gross_profit, 495);
        assert_eq!(summary.gross_loss, -505);
        assert_eq!(summary.win_rate(), Some(0.5));
        let pf = summary.profit_factor().unwrap();
        assert!((pf - 495.0 / 505.0).abs() < 1e-12);
    }

    #[test]
    fn test_daily_buckets_and_drawdown() {
        let fills = [
            fill("G", "yes", "buy", 10, 50, false),
            fill("H", "yes", "buy", 10, 50, false),
            fill("I", "yes", "buy", 10, 50, false),
            fill("J", "yes", "buy", 10, 50, false),
        ];
        let settlements = [
            settled_at("G", "yes", 1000, "2025-09-05T03:00:00Z"),
            settled_at("H", "no", 0, "2025-09-05T23:59:00Z"),
            settled_at("I", "no", 0, "2025-09-08T01:00:00Z"),
            // no timestamp: counted in the totals, not in any day
            settlement("J", "yes", 1000),
        ];
        let summary = reconcile(&fills, &settlements, &FeeSchedule::default());

        assert_eq!(summary.daily.len(), 2);
        let first = &summary.daily[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 9, 5).unwrap());
        assert_eq!(first.markets, 2);
        assert_eq!(first.realized, 495 - 505);
        assert_eq!(first.win_rate(), Some(0.5));
        let second = &summary.daily[1];
        assert_eq!(second.realized, -505);
        assert_eq!(second.cumulative, -10 - 505);
        assert_eq!(summary.max_drawdown(), 515);
        assert_eq!(summary.realized, 495 - 505 - 505 + 495);
    }

    #[test]
    fn test_best_and_worst_markets() {
        let fills = [
            fill("G", "yes", "buy", 10, 50, false),
            fill("H", "yes", "buy", 10, 50, false),
            fill("K", "yes", "buy", 1, 50, false),
        ];
        let settlements = [settlement("G", "yes", 1000), settlement("H", "no", 0)];
        let summary = reconcile(&fills, &settlements, &FeeSchedule::default());

        let best: Vec<_> = summary.best_markets(5).iter().map(|m| m.ticker.as_str()).collect();
        assert_eq!(best, ["G", "H"]);
        let worst: Vec<_> = summary.worst_markets(1).iter().map(|m| m.ticker.as_str()).collect();
        assert_eq!(worst, ["H"]);
        assert!(summary.best_markets(0).is_empty());
    }
}
