//! Integration tests for the cents to American odds conversion.
//!
//! The expected values are the exact integer results, with ties rounded
//! away from zero, for every price from 1 to 99 cents.
//!
//! # Running
//!
//! ```bash
//! cargo test --test golden_table
//! ```

use market_odds::odds::{price_to_american_odds, ConversionTable};
use market_odds::{american_odds_to_cents, cents_to_american_odds, AmericanOdds, Cents};

/// Expected odds for 1..=99 cents
const GOLDEN: [i32; 99] = [
    9900, 4900, 3233, 2400, 1900, 1567, 1329, 1150, 1011, 900, //
    809, 733, 669, 614, 567, 525, 488, 456, 426, 400, //
    376, 355, 335, 317, 300, 285, 270, 257, 245, 233, //
    223, 213, 203, 194, 186, 178, 170, 163, 156, 150, //
    144, 138, 133, 127, 122, 117, 113, 108, 104, -100, //
    -104, -108, -113, -117, -122, -127, -133, -138, -144, -150, //
    -156, -163, -170, -178, -186, -194, -203, -213, -223, -233, //
    -245, -257, -270, -285, -300, -317, -335, -355, -376, -400, //
    -426, -456, -488, -525, -567, -614, -669, -733, -809, -900, //
    -1011, -1150, -1329, -1567, -1900, -2400, -3233, -4900, -9900,
];

fn golden(cents: i64) -> i32 {
    GOLDEN[(cents - 1) as usize]
}

#[test]
fn test_every_price_matches_table() {
    for cents in 1..=99 {
        assert_eq!(
            cents_to_american_odds(cents).value(),
            golden(cents),
            "mismatch at {cents} cents"
        );
    }
}

#[test]
fn test_conversion_table_matches() {
    let table = ConversionTable::full();
    for row in table.rows() {
        assert_eq!(row.odds.value(), golden(i64::from(row.cents.get())));
    }
}

#[test]
fn test_sign_follows_favorite() {
    for cents in 1..=49 {
        assert!(cents_to_american_odds(cents).value() >= 100, "{cents}");
    }
    for cents in 50..=99 {
        assert!(cents_to_american_odds(cents).value() <= -100, "{cents}");
    }
}

#[test]
fn test_payout_shrinks_as_price_rises() {
    for cents in 1..99 {
        let cheaper = cents_to_american_odds(cents);
        let dearer = cents_to_american_odds(cents + 1);
        assert!(
            cheaper.to_decimal() > dearer.to_decimal(),
            "{cents} -> {}",
            cents + 1
        );
    }
}

#[test]
fn test_mirror_prices_mirror_odds() {
    for cents in 1..=99 {
        if cents == 50 {
            continue;
        }
        assert_eq!(golden(cents), -golden(100 - cents), "{cents}");
    }
}

#[test]
fn test_out_of_range_clamps() {
    assert_eq!(cents_to_american_odds(0).value(), golden(1));
    assert_eq!(cents_to_american_odds(-25).value(), golden(1));
    assert_eq!(cents_to_american_odds(100).value(), golden(99));
    assert_eq!(cents_to_american_odds(i64::MAX).value(), golden(99));
    assert_eq!(cents_to_american_odds(i64::MIN).value(), golden(1));
}

#[test]
fn test_real_prices_round_to_nearest_cent() {
    assert_eq!(price_to_american_odds(64.6).unwrap().value(), golden(65));
    assert_eq!(price_to_american_odds(64.4).unwrap().value(), golden(64));
    assert_eq!(price_to_american_odds(0.2).unwrap().value(), golden(1));
    assert_eq!(price_to_american_odds(99.9).unwrap().value(), golden(99));
    assert!(price_to_american_odds(f64::NAN).is_err());
    assert!(price_to_american_odds(f64::NEG_INFINITY).is_err());
}

#[test]
fn test_round_trip_within_a_tenth_of_a_cent() {
    for cents in 1..=99 {
        let back = american_odds_to_cents(cents_to_american_odds(cents));
        assert!(
            (back - cents as f64).abs() < 0.1,
            "{cents} came back as {back}"
        );
        let odds = cents_to_american_odds(cents);
        assert_eq!(odds.to_cents(), Cents::clamped(cents));
    }
}

#[test]
fn test_even_money() {
    assert_eq!(cents_to_american_odds(50), AmericanOdds::EVEN);
    assert_eq!(Cents::EVEN.to_american_odds(), AmericanOdds::EVEN);
    assert!((american_odds_to_cents(AmericanOdds::EVEN) - 50.0).abs() < 1e-12);
}
