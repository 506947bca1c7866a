use crate::valuation::rates::RateTables;
use crate::valuation::transaction::{procurement_range, transaction_prices};

#[test]
fn derives_four_prices_from_fair_market_value() {
    let rates = RateTables::standard().transaction;
    let prices = transaction_prices(&rates, 500_000.0);

    assert_eq!(prices.c2c, 500_000.0);
    assert!((prices.c2b - 440_000.0).abs() < 1e-6);
    // 500,000 + 60,000 margin + 10,800 tax on margin
    assert!((prices.b2c - 570_800.0).abs() < 1e-6);
    assert!((prices.b2b - 400_000.0).abs() < 1e-6);
}

#[test]
fn retail_is_fmv_times_one_point_one_four_one_six() {
    let rates = RateTables::standard().transaction;
    let prices = transaction_prices(&rates, 612_345.67);
    assert!((prices.b2c - 612_345.67 * 1.1416).abs() < 1e-6);
}

#[test]
fn procurement_window_spans_five_percent_below_trade_in() {
    let rates = RateTables::standard().transaction;
    let range = procurement_range(&rates, 440_000.0);
    assert!((range.min - 418_000.0).abs() < 1e-6);
    assert_eq!(range.max, 440_000.0);
}
