//! Interpolation of two term variances to the constant 30-day horizon.
//!
//! With `N1`, `N2` the raw day counts of the near and next term,
//!
//! ```text
//! VIX = 100 · sqrt( [T1 σ1² (N2 − 30) + T2 σ2² (30 − N1)] / (N2 − N1) · 365/30 )
//! ```
//!
//! This is linear interpolation of total variance `σ²T` in calendar days,
//! re-annualised over 30 days.

use serde::{Deserialize, Serialize};

use crate::calculation::types::DAYS_PER_YEAR;
use crate::error::{VixError, VixResult};

/// Target horizon of the index in calendar days
pub const TARGET_DAYS: f64 = 30.0;

/// Inputs from one term needed by the interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermPoint {
    /// Time to expiry in years
    pub t_years: f64,
    /// Term variance contribution
    pub sigma_sq: f64,
    /// Raw days to expiry
    pub days: i64,
}

/// Combine the near and next term into the index value.
pub fn interpolate_vix(near: TermPoint, next: TermPoint) -> VixResult<f64> {
    if near.days == next.days {
        return Err(VixError::DegenerateInterpolation { days: near.days });
    }

    let n1 = near.days as f64;
    let n2 = next.days as f64;

    let numerator = near.t_years * near.sigma_sq * (n2 - TARGET_DAYS)
        + next.t_years * next.sigma_sq * (TARGET_DAYS - n1);
    let variance = numerator / (n2 - n1) * (DAYS_PER_YEAR / TARGET_DAYS);

    if variance < 0.0 {
        return Err(VixError::NegativeVariance { value: variance });
    }

    Ok(100.0 * variance.sqrt())
}
