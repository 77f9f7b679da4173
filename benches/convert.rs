//! Benchmarks for price conversion and aggregation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use market_odds::aggregator::best_price;
use market_odds::odds::price_to_american_odds;
use market_odds::types::{BetType, Game, Line, Provider, Quote, Selection, Sport};
use market_odds::{cents_to_american_odds, AmericanOdds};

fn bench_cents_to_odds(c: &mut Criterion) {
    c.bench_function("cents_to_american_odds", |b| {
        b.iter(|| {
            for cents in 0..=100 {
                black_box(cents_to_american_odds(black_box(cents)));
            }
        });
    });

    c.bench_function("price_to_american_odds", |b| {
        b.iter(|| price_to_american_odds(black_box(64.6)));
    });
}

fn bench_best_price(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_price");

    for books in [3usize, 10, 40].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(books), books, |b, &books| {
            let mut game = Game::new("bench", Sport::Nfl, "Home", "Away", None);
            for i in 0..books {
                let cents = 40 + (i % 20) as i64;
                game.add_quote(Quote::new(
                    Provider::OddsApi,
                    format!("book{i}"),
                    Line::Moneyline {
                        home: cents_to_american_odds(cents),
                        away: cents_to_american_odds(100 - cents),
                    },
                ));
            }

            b.iter(|| best_price(black_box(&game), BetType::Moneyline, Selection::Home));
        });
    }

    group.finish();
}

fn bench_parse_odds(c: &mut Criterion) {
    c.bench_function("parse_american_odds", |b| {
        b.iter(|| black_box("+186").parse::<AmericanOdds>());
    });
}

criterion_group!(benches, bench_cents_to_odds, bench_best_price, bench_parse_odds);
criterion_main!(benches);
