use chrono::NaiveDate;

/// Per-date outcomes that prevent a VIX value from being produced.
///
/// Every variant is an expected result for a given snapshot and date, not a
/// fault in the process. The pipeline stops at the first one it meets and
/// hands it back unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VixError {
    #[error("no quotes found for trade date {date}")]
    NoDataForDate { date: NaiveDate },

    #[error("trade date {date} has {found} distinct expiration(s), need at least 2")]
    InsufficientExpirations { date: NaiveDate, found: usize },

    #[error("no strike with both a live call and a live put for expiry {expiry}")]
    NoPairedContracts { expiry: NaiveDate },

    #[error("only {found} strike row(s) survive filtering for expiry {expiry}, need at least 2")]
    InsufficientStrikes { expiry: NaiveDate, found: usize },

    #[error("near and next terms share the same day count ({days})")]
    DegenerateInterpolation { days: i64 },

    #[error("interpolated 30-day variance is negative: {value}")]
    NegativeVariance { value: f64 },

    #[error("cannot parse trade date {input:?}, expected YYYY-MM-DD or YYYYMMDD")]
    InvalidDate { input: String },

    #[error("expiry {expiry} has non-positive days to expiry ({days})")]
    InvalidTimeToExpiry { expiry: NaiveDate, days: i64 },
}

pub type VixResult<T> = Result<T, VixError>;
