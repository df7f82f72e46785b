#![allow(dead_code)]

use statrs::distribution::{ContinuousCDF, Normal};
use vix_lib::{QuoteTable, RawQuoteRow};

/// Path of the CSV snapshot shipped with the tests
pub const SAMPLE_QUOTES: &str = "tests/data/quotes_20240102.csv";

/// Build one raw row with sensible liquid defaults.
pub fn raw_row(
    date: &str,
    expiry: &str,
    days: i64,
    strike: f64,
    pc: u8,
    bid: f64,
    ask: f64,
) -> RawQuoteRow {
    RawQuoteRow {
        date: date.to_string(),
        expr_date: expiry.to_string(),
        strike,
        pc,
        bid,
        ask,
        volume: if bid > 0.0 { 100 } else { 0 },
        days_to_expiry: days,
        rate_pct: 0.0,
    }
}

/// A call and a put at `strike` sharing the same quotes.
pub fn straddle_rows(
    date: &str,
    expiry: &str,
    days: i64,
    strike: f64,
    bid: f64,
    ask: f64,
) -> Vec<RawQuoteRow> {
    vec![
        raw_row(date, expiry, days, strike, 1, bid, ask),
        raw_row(date, expiry, days, strike, 2, bid, ask),
    ]
}

/// Black-Scholes call and put prices.
#[allow(non_snake_case)]
pub fn bs_prices(S: f64, K: f64, r: f64, T: f64, sigma: f64) -> (f64, f64) {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let d1 = ((S / K).ln() + (r + 0.5 * sigma * sigma) * T) / (sigma * T.sqrt());
    let d2 = d1 - sigma * T.sqrt();
    let df = (-r * T).exp();
    let call = S * normal.cdf(d1) - K * df * normal.cdf(d2);
    let put = K * df * normal.cdf(-d2) - S * normal.cdf(-d1);
    (call, put)
}

/// Option chain priced at a single flat volatility with zero spread.
///
/// Strikes run from 50 to 170 in steps of 1 around a spot of 100.
pub fn flat_vol_chain(
    date: &str,
    expiry: &str,
    days: i64,
    rate_pct: f64,
    sigma: f64,
) -> Vec<RawQuoteRow> {
    let spot = 100.0;
    let t = days as f64 / 365.0;
    let mut rows = Vec::new();

    for i in 0..=120 {
        let strike = 50.0 + i as f64;
        let (call, put) = bs_prices(spot, strike, rate_pct / 100.0, t, sigma);
        for (pc, price) in [(1u8, call.max(0.0)), (2u8, put.max(0.0))] {
            let mut row = raw_row(date, expiry, days, strike, pc, price, price);
            row.rate_pct = rate_pct;
            rows.push(row);
        }
    }
    rows
}

pub fn load_sample_table() -> QuoteTable {
    QuoteTable::from_path(SAMPLE_QUOTES).expect("Failed to load sample quotes")
}
