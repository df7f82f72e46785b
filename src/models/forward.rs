//! Forward price and at-the-money strike from put-call parity.

use crate::calculation::types::{Quote, Term};
use crate::error::{VixError, VixResult};
use crate::models::utils::strike_cmp;

/// Forward price `F` and at-the-money strike `K0` of one term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardEstimate {
    pub forward: f64,
    pub k0: f64,
}

/// A strike quoted with a live bid on both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParityPair {
    pub strike: f64,
    pub call_mid: f64,
    pub put_mid: f64,
}

impl ParityPair {
    pub fn spread(&self) -> f64 {
        (self.call_mid - self.put_mid).abs()
    }
}

/// Inner join of live calls and live puts on identical strike.
///
/// Zero-bid quotes are dropped before matching. Pairs come out in ascending
/// strike order; duplicate strikes pair every call with every put, calls
/// first, each side in its original row order.
pub fn paired_strikes(quotes: &[&Quote]) -> Vec<ParityPair> {
    let mut calls: Vec<&Quote> = quotes
        .iter()
        .copied()
        .filter(|q| q.is_call() && q.bid > 0.0)
        .collect();
    let mut puts: Vec<&Quote> = quotes
        .iter()
        .copied()
        .filter(|q| q.is_put() && q.bid > 0.0)
        .collect();
    calls.sort_by(|a, b| strike_cmp(a.strike, b.strike));
    puts.sort_by(|a, b| strike_cmp(a.strike, b.strike));

    let mut pairs = Vec::new();
    for call in &calls {
        for put in puts.iter().filter(|p| p.strike == call.strike) {
            pairs.push(ParityPair {
                strike: call.strike,
                call_mid: call.mid,
                put_mid: put.mid,
            });
        }
    }
    pairs
}

/// Compute `F` and `K0` for a term.
///
/// `K0` starts at the strike where call and put mids are closest (first one
/// in ascending strike order on ties) and
/// `F = K0 + exp(rT) * (call_mid - put_mid)`. When that strike sits above
/// `F`, `K0` moves down to the highest paired strike below `F`; if there is
/// none it stays where it is.
pub fn compute_forward(term: &Term<'_>) -> VixResult<ForwardEstimate> {
    let pairs = paired_strikes(&term.quotes);

    let mut best: Option<&ParityPair> = None;
    for pair in &pairs {
        if best.map_or(true, |b| pair.spread() < b.spread()) {
            best = Some(pair);
        }
    }
    let best = best.ok_or(VixError::NoPairedContracts {
        expiry: term.expiry,
    })?;

    let forward = best.strike + term.growth_factor() * (best.call_mid - best.put_mid);
    let mut k0 = best.strike;

    if k0 > forward {
        let below = pairs
            .iter()
            .map(|p| p.strike)
            .filter(|&k| k < forward)
            .max_by(|a, b| strike_cmp(*a, *b));
        match below {
            Some(k) => k0 = k,
            None => tracing::warn!(
                expiry = %term.expiry,
                forward,
                k0,
                "no paired strike below forward, keeping K0 above F"
            ),
        }
    }

    tracing::debug!(expiry = %term.expiry, forward, k0, pairs = pairs.len(), "forward solved");
    Ok(ForwardEstimate { forward, k0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::types::OptionType;
    use chrono::NaiveDate;

    fn quote(strike: f64, option_type: OptionType, bid: f64, ask: f64) -> Quote {
        Quote {
            trade_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2024, 1, 19).unwrap(),
            strike,
            option_type,
            bid,
            ask,
            mid: (bid + ask) / 2.0,
            volume: 10,
            days_to_expiry: 17,
            rate_pct: 5.0,
        }
    }

    fn term(quotes: &[Quote]) -> Term<'_> {
        let refs: Vec<&Quote> = quotes.iter().collect();
        Term::from_day_rows(NaiveDate::from_ymd_opt(2024, 1, 19).unwrap(), &refs).unwrap()
    }

    #[test]
    fn test_single_pair_equal_mids() {
        let quotes = vec![
            quote(100.0, OptionType::Call, 2.0, 2.2),
            quote(100.0, OptionType::Put, 2.0, 2.2),
        ];
        let est = compute_forward(&term(&quotes)).unwrap();
        assert_eq!(est.forward, 100.0);
        assert_eq!(est.k0, 100.0);
    }

    #[test]
    fn test_forward_from_min_spread_strike() {
        let quotes = vec![
            quote(95.0, OptionType::Call, 6.0, 6.4),
            quote(95.0, OptionType::Put, 1.0, 1.2),
            quote(100.0, OptionType::Call, 3.0, 3.2),
            quote(100.0, OptionType::Put, 2.6, 2.8),
            quote(105.0, OptionType::Call, 1.0, 1.2),
            quote(105.0, OptionType::Put, 5.4, 5.8),
        ];
        let t = term(&quotes);
        let est = compute_forward(&t).unwrap();
        let expected = 100.0 + t.growth_factor() * (3.1 - 2.7);
        assert!((est.forward - expected).abs() < 1e-12);
        assert_eq!(est.k0, 100.0);
    }

    #[test]
    fn test_k0_moves_below_forward() {
        // Put richer than call at 100 puts F below 100.
        let quotes = vec![
            quote(95.0, OptionType::Call, 4.0, 4.4),
            quote(95.0, OptionType::Put, 1.0, 1.4),
            quote(100.0, OptionType::Call, 2.0, 2.2),
            quote(100.0, OptionType::Put, 2.4, 2.6),
        ];
        let est = compute_forward(&term(&quotes)).unwrap();
        assert!(est.forward < 100.0);
        assert_eq!(est.k0, 95.0);
    }

    #[test]
    fn test_k0_kept_when_nothing_below_forward() {
        let quotes = vec![
            quote(100.0, OptionType::Call, 2.0, 2.2),
            quote(100.0, OptionType::Put, 2.4, 2.6),
        ];
        let est = compute_forward(&term(&quotes)).unwrap();
        assert!(est.forward < 100.0);
        assert_eq!(est.k0, 100.0);
    }

    #[test]
    fn test_tie_resolved_by_lowest_strike() {
        // Row order deliberately descending.
        let quotes = vec![
            quote(110.0, OptionType::Call, 1.0, 1.0),
            quote(110.0, OptionType::Put, 1.0, 1.0),
            quote(90.0, OptionType::Call, 1.0, 1.0),
            quote(90.0, OptionType::Put, 1.0, 1.0),
        ];
        let est = compute_forward(&term(&quotes)).unwrap();
        assert_eq!(est.k0, 90.0);
        assert_eq!(est.forward, 90.0);
    }

    #[test]
    fn test_zero_bid_excluded_from_pairs() {
        let quotes = vec![
            quote(100.0, OptionType::Call, 0.0, 0.5),
            quote(100.0, OptionType::Put, 2.0, 2.2),
            quote(105.0, OptionType::Call, 1.0, 1.2),
        ];
        assert!(paired_strikes(&quotes.iter().collect::<Vec<_>>()).is_empty());
        assert_eq!(
            compute_forward(&term(&quotes)).unwrap_err(),
            VixError::NoPairedContracts {
                expiry: NaiveDate::from_ymd_opt(2024, 1, 19).unwrap()
            }
        );
    }
}
