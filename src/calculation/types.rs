use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{VixError, VixResult};

/// Calendar days in the year used to annualise days-to-expiry.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Option right. The source table encodes calls as `1` and puts as `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Decode the numeric `PC` column.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(OptionType::Call),
            2 => Some(OptionType::Put),
            _ => None,
        }
    }
}

/// One row of the raw quote table, column names as they appear in the source data.
///
/// Dates are kept as text so that both integer (`20240105`) and string
/// (`"20240105"`) encodings deserialize; they are validated when the row
/// enters a [`QuoteTable`](crate::QuoteTable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuoteRow {
    /// Trade date, `YYYYMMDD`
    #[serde(rename = "date")]
    pub date: String,
    /// Expiration date, `YYYYMMDD`
    #[serde(rename = "expr_date")]
    pub expr_date: String,
    /// Strike price
    #[serde(rename = "K")]
    pub strike: f64,
    /// 1 = call, 2 = put
    #[serde(rename = "PC")]
    pub pc: u8,
    #[serde(rename = "L_BID")]
    pub bid: f64,
    #[serde(rename = "L_ASK")]
    pub ask: f64,
    #[serde(rename = "VOL")]
    pub volume: u64,
    /// Calendar days to expiry
    #[serde(rename = "T")]
    pub days_to_expiry: i64,
    /// Risk-free rate in percentage points
    #[serde(rename = "rf")]
    pub rate_pct: f64,
}

/// Normalised option quote with its mid price computed once at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub trade_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub strike: f64,
    pub option_type: OptionType,
    pub bid: f64,
    pub ask: f64,
    /// `(bid + ask) / 2`
    pub mid: f64,
    pub volume: u64,
    pub days_to_expiry: i64,
    pub rate_pct: f64,
}

impl Quote {
    pub fn is_call(&self) -> bool {
        self.option_type == OptionType::Call
    }

    pub fn is_put(&self) -> bool {
        self.option_type == OptionType::Put
    }

    /// A quote with no bid or no traded volume.
    pub fn is_illiquid(&self) -> bool {
        self.bid <= 0.0 || self.volume == 0
    }
}

/// The option chain of one expiry on one trade date.
///
/// Borrows its quotes from the owning table; only the derived scalars are owned.
#[derive(Debug, Clone)]
pub struct Term<'a> {
    pub expiry: NaiveDate,
    pub quotes: Vec<&'a Quote>,
    /// Raw days to expiry (N1 / N2 in the interpolation)
    pub days: i64,
    /// `days / 365`
    pub t_years: f64,
    /// Continuously compounded rate as a decimal
    pub rate: f64,
}

impl<'a> Term<'a> {
    /// Collect the rows of `day_rows` expiring on `expiry`.
    ///
    /// Days-to-expiry and rate are constant within a term, so the first
    /// matching row supplies both. An expiry with no rows is an empty strike
    /// strip and reports `InsufficientStrikes` with `found: 0`.
    pub fn from_day_rows(expiry: NaiveDate, day_rows: &[&'a Quote]) -> VixResult<Self> {
        let quotes: Vec<&'a Quote> = day_rows
            .iter()
            .copied()
            .filter(|q| q.expiry_date == expiry)
            .collect();

        let first = quotes
            .first()
            .ok_or(VixError::InsufficientStrikes { expiry, found: 0 })?;
        let days = first.days_to_expiry;
        if days <= 0 {
            return Err(VixError::InvalidTimeToExpiry { expiry, days });
        }
        let rate = first.rate_pct / 100.0;

        Ok(Self {
            expiry,
            quotes,
            days,
            t_years: days as f64 / DAYS_PER_YEAR,
            rate,
        })
    }

    /// `exp(r * T)`, the forward growth factor applied to option mids.
    pub fn growth_factor(&self) -> f64 {
        (self.rate * self.t_years).exp()
    }
}

/// Computed values for one term, as reported alongside the final index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSnapshot {
    pub expiry: NaiveDate,
    pub days: i64,
    pub t_years: f64,
    pub rate: f64,
    /// Forward price implied by put-call parity
    pub forward: f64,
    /// At-the-money strike
    pub k0: f64,
    /// Term variance contribution
    pub sigma_sq: f64,
    /// Rows that entered the variance sum
    pub strikes_used: usize,
}

/// Full result of one date's calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VixBreakdown {
    pub trade_date: NaiveDate,
    /// Number of quotes on the trade date
    pub rows: usize,
    pub near: TermSnapshot,
    pub next: TermSnapshot,
    /// Index value in volatility percentage points
    pub vix: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(expiry: NaiveDate, days: i64) -> Quote {
        Quote {
            trade_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            expiry_date: expiry,
            strike: 100.0,
            option_type: OptionType::Call,
            bid: 1.0,
            ask: 1.2,
            mid: 1.1,
            volume: 10,
            days_to_expiry: days,
            rate_pct: 4.0,
        }
    }

    #[test]
    fn test_term_scalars_from_first_row() {
        let expiry = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let quotes = vec![quote(other, 59), quote(expiry, 35), quote(expiry, 35)];
        let refs: Vec<&Quote> = quotes.iter().collect();

        let term = Term::from_day_rows(expiry, &refs).unwrap();
        assert_eq!(term.quotes.len(), 2);
        assert_eq!(term.days, 35);
        assert_eq!(term.t_years, 35.0 / 365.0);
        assert_eq!(term.rate, 0.04);
    }

    #[test]
    fn test_missing_expiry_has_no_strikes() {
        let expiry = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();
        let quotes = vec![quote(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 59)];
        let refs: Vec<&Quote> = quotes.iter().collect();

        assert_eq!(
            Term::from_day_rows(expiry, &refs).unwrap_err(),
            VixError::InsufficientStrikes { expiry, found: 0 }
        );
        assert_eq!(
            Term::from_day_rows(expiry, &[]).unwrap_err(),
            VixError::InsufficientStrikes { expiry, found: 0 }
        );
    }

    #[test]
    fn test_zero_day_term_rejected() {
        let expiry = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let quotes = vec![quote(expiry, 0)];
        let refs: Vec<&Quote> = quotes.iter().collect();

        assert_eq!(
            Term::from_day_rows(expiry, &refs).unwrap_err(),
            VixError::InvalidTimeToExpiry { expiry, days: 0 }
        );
    }
}
