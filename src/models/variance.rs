//! Discretised variance replication for a single term.
//!
//! The term variance is
//!
//! ```text
//! σ² = (2/T) Σ (ΔKᵢ / Kᵢ²) e^{rT} Q(Kᵢ) − (1/T) (F/K0 − 1)²
//! ```
//!
//! summed over out-of-the-money puts below `K0`, every quote at `K0`, and
//! out-of-the-money calls above `K0`. Each wing is walked away from `K0` and
//! cut off at the first two consecutive illiquid quotes.

use crate::calculation::types::{Quote, Term};
use crate::error::{VixError, VixResult};
use crate::models::forward::ForwardEstimate;
use crate::models::utils::strike_cmp;

/// Variance contribution of one term and the strikes it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct TermVariance {
    pub sigma_sq: f64,
    /// Strikes of the rows in the sum, ascending
    pub strikes: Vec<f64>,
}

/// Keep the liquid quotes of one wing, walking outward from `K0`.
///
/// `wing` must already be ordered away from the money. Illiquid quotes
/// (no bid or no volume) are never kept; two in a row end the walk.
pub fn truncate_wing<'a>(wing: &[&'a Quote]) -> Vec<&'a Quote> {
    let mut kept = Vec::with_capacity(wing.len());
    let mut streak = 0usize;

    for &quote in wing {
        if quote.is_illiquid() {
            streak += 1;
            if streak >= 2 {
                break;
            }
        } else {
            streak = 0;
            kept.push(quote);
        }
    }
    kept
}

/// Strike spacing weights by centred difference, one-sided at both ends.
pub fn delta_k(strikes: &[f64]) -> Option<Vec<f64>> {
    let n = strikes.len();
    if n < 2 {
        return None;
    }

    let weights = (0..n)
        .map(|i| {
            if i == 0 {
                strikes[1] - strikes[0]
            } else if i == n - 1 {
                strikes[n - 1] - strikes[n - 2]
            } else {
                (strikes[i + 1] - strikes[i - 1]) / 2.0
            }
        })
        .collect();
    Some(weights)
}

/// Quotes entering the variance sum, in ascending strike order.
///
/// Puts strictly below `K0`, then the quotes at `K0` (puts before calls,
/// no liquidity filter), then calls strictly above `K0`.
pub fn select_strip<'a>(quotes: &[&'a Quote], k0: f64) -> Vec<&'a Quote> {
    let mut otm_calls: Vec<&Quote> = quotes
        .iter()
        .copied()
        .filter(|q| q.is_call() && q.strike > k0)
        .collect();
    otm_calls.sort_by(|a, b| strike_cmp(a.strike, b.strike));

    let mut otm_puts: Vec<&Quote> = quotes
        .iter()
        .copied()
        .filter(|q| q.is_put() && q.strike < k0)
        .collect();
    otm_puts.sort_by(|a, b| strike_cmp(b.strike, a.strike));

    let mut atm: Vec<&Quote> = quotes.iter().copied().filter(|q| q.strike == k0).collect();
    atm.sort_by_key(|q| q.is_call());

    let mut strip = truncate_wing(&otm_puts);
    strip.reverse();
    strip.extend(atm);
    strip.extend(truncate_wing(&otm_calls));
    strip
}

/// σ² for a term given its forward estimate.
pub fn compute_sigma_sq(term: &Term<'_>, estimate: &ForwardEstimate) -> VixResult<TermVariance> {
    let ForwardEstimate { forward, k0 } = *estimate;
    let strip = select_strip(&term.quotes, k0);
    let strikes: Vec<f64> = strip.iter().map(|q| q.strike).collect();

    let weights = delta_k(&strikes).ok_or(VixError::InsufficientStrikes {
        expiry: term.expiry,
        found: strikes.len(),
    })?;

    let t = term.t_years;
    let growth = term.growth_factor();
    let sum: f64 = strip
        .iter()
        .zip(&weights)
        .map(|(q, dk)| dk / (q.strike * q.strike) * growth * q.mid)
        .sum();

    let sigma_sq = (2.0 / t) * sum - (1.0 / t) * (forward / k0 - 1.0).powi(2);

    tracing::debug!(
        expiry = %term.expiry,
        strikes = strikes.len(),
        sigma_sq,
        "term variance computed"
    );
    Ok(TermVariance { sigma_sq, strikes })
}
