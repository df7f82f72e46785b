use chrono::NaiveDate;

use crate::calculation::config::VixConfig;
use crate::calculation::types::{Quote, Term, TermSnapshot, VixBreakdown};
use crate::error::{VixError, VixResult};
use crate::models::forward::compute_forward;
use crate::models::selector::{nearest_two_expiries, select_day};
use crate::models::temporal::{interpolate_vix, TermPoint};
use crate::models::variance::compute_sigma_sq;
use crate::table::QuoteTable;

/// Parse a query date given as `YYYY-MM-DD` or `YYYYMMDD`.
pub fn parse_query_date(input: &str) -> VixResult<NaiveDate> {
    let text = input.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| crate::table::parse_compact_date(text).ok())
        .ok_or_else(|| VixError::InvalidDate {
            input: input.to_string(),
        })
}

/// Forward and variance of one term.
fn evaluate_term(expiry: NaiveDate, day_rows: &[&Quote]) -> VixResult<TermSnapshot> {
    let term = Term::from_day_rows(expiry, day_rows)?;
    let estimate = compute_forward(&term)?;
    let variance = compute_sigma_sq(&term, &estimate)?;

    Ok(TermSnapshot {
        expiry,
        days: term.days,
        t_years: term.t_years,
        rate: term.rate,
        forward: estimate.forward,
        k0: estimate.k0,
        sigma_sq: variance.sigma_sq,
        strikes_used: variance.strikes.len(),
    })
}

/// Runs the index calculation against one quote table.
///
/// The calculator holds no state between calls; the same table and date
/// always give the same result.
pub struct VixCalculator<'a> {
    table: &'a QuoteTable,
    config: VixConfig,
}

impl<'a> VixCalculator<'a> {
    pub fn new(table: &'a QuoteTable) -> Self {
        Self {
            table,
            config: VixConfig::default(),
        }
    }

    pub fn with_config(mut self, config: VixConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &VixConfig {
        &self.config
    }

    /// Index value for `date`.
    pub fn calculate(&self, date: NaiveDate) -> VixResult<f64> {
        self.calculate_detailed(date).map(|b| b.vix)
    }

    /// Index value for a date given as text.
    pub fn calculate_str(&self, date: &str) -> VixResult<f64> {
        self.calculate(parse_query_date(date)?)
    }

    /// Index value together with the per-term values it was built from.
    ///
    /// Stages run in order and the first failure is returned as is.
    pub fn calculate_detailed(&self, date: NaiveDate) -> VixResult<VixBreakdown> {
        let day_rows = select_day(self.table, date)?;
        tracing::debug!(%date, rows = day_rows.len(), "quotes found for trade date");

        let (near_expiry, next_expiry) = nearest_two_expiries(&day_rows)?;
        tracing::debug!(%date, near = %near_expiry, next = %next_expiry, "terms selected");

        let (near, next) = if self.config.parallel_terms {
            rayon::join(
                || evaluate_term(near_expiry, &day_rows),
                || evaluate_term(next_expiry, &day_rows),
            )
        } else {
            (
                evaluate_term(near_expiry, &day_rows),
                evaluate_term(next_expiry, &day_rows),
            )
        };
        // Near-term failures take precedence, as in sequential evaluation.
        let near = near?;
        let next = next?;

        let vix = interpolate_vix(
            TermPoint {
                t_years: near.t_years,
                sigma_sq: near.sigma_sq,
                days: near.days,
            },
            TermPoint {
                t_years: next.t_years,
                sigma_sq: next.sigma_sq,
                days: next.days,
            },
        )?;
        tracing::info!(%date, vix, "VIX computed");

        Ok(VixBreakdown {
            trade_date: date,
            rows: day_rows.len(),
            near,
            next,
            vix,
        })
    }

    /// One result per trade date present in the table, ascending by date.
    pub fn calculate_all(&self) -> Vec<(NaiveDate, VixResult<f64>)> {
        self.table
            .trade_dates()
            .into_iter()
            .map(|date| (date, self.calculate(date)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_query_date("2024-03-15").unwrap(), expected);
        assert_eq!(parse_query_date("20240315").unwrap(), expected);
        assert_eq!(parse_query_date(" 2024-03-15 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_query_date_rejects_garbage() {
        for input in ["15/03/2024", "2024-02-30", "", "2024315"] {
            assert_eq!(
                parse_query_date(input).unwrap_err(),
                VixError::InvalidDate {
                    input: input.to_string()
                }
            );
        }
    }
}
