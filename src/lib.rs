//! # VIX-Lib: 30-Day Volatility Index from Option Quotes
//!
//! `vix-lib` computes a CBOE-style volatility index for one trade date from a
//! snapshot of index option quotes. The two expiries closest to the trade
//! date are each turned into a model-free variance estimate, and the two
//! estimates are interpolated to a constant 30-day horizon.
//!
//! ## Core Features
//!
//! - **Quote table**: typed, validated rows loaded from CSV or built in memory
//! - **Forward and ATM strike**: put-call parity at the tightest call/put pair
//! - **Variance replication**: discretised OTM strip with the two-zero-bid cutoff
//! - **30-day interpolation**: near/next term blending in total variance
//! - **Typed outcomes**: every reason a date has no index value is a [`VixError`] variant
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vix_lib::{compute_vix_str, QuoteTable};
//!
//! let table = QuoteTable::from_path("quotes.csv")?;
//! match compute_vix_str(&table, "2024-01-02") {
//!     Ok(vix) => println!("VIX = {:.2}", vix),
//!     Err(reason) => println!("no index value: {}", reason),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Input Columns
//!
//! | column      | meaning                              |
//! |-------------|--------------------------------------|
//! | `date`      | trade date, `YYYYMMDD`               |
//! | `expr_date` | expiry date, `YYYYMMDD`              |
//! | `K`         | strike                               |
//! | `PC`        | `1` = call, `2` = put                |
//! | `L_BID`     | bid                                  |
//! | `L_ASK`     | ask                                  |
//! | `VOL`       | traded volume                        |
//! | `T`         | calendar days to expiry              |
//! | `rf`        | risk-free rate, percentage points    |

// ================================================================================================
// MODULES
// ================================================================================================

pub mod calculation;
pub mod error;
pub mod models;
pub mod table;

// ================================================================================================
// IMPORTS
// ================================================================================================

use chrono::NaiveDate;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Input data
pub use calculation::types::{OptionType, Quote, RawQuoteRow, Term};
pub use table::QuoteTable;

// Configuration and results
pub use calculation::{
    config::{CsvConfig, VixConfig},
    pipeline::parse_query_date,
    types::{TermSnapshot, VixBreakdown},
};
pub use error::{VixError, VixResult};

// Individual stages
pub use models::{
    forward::{compute_forward, paired_strikes, ForwardEstimate, ParityPair},
    selector::{nearest_two_expiries, select_day},
    temporal::{interpolate_vix, TermPoint, TARGET_DAYS},
    variance::{compute_sigma_sq, delta_k, select_strip, truncate_wing, TermVariance},
};

pub use calculation::pipeline::VixCalculator;

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured calculator settings.
///
/// - [`sequential()`]: both terms evaluated on the calling thread
/// - [`parallel()`]: near and next term evaluated concurrently
pub mod default_configs {
    use crate::calculation::config::VixConfig;

    /// Single-threaded evaluation. This is the default.
    ///
    /// ```rust
    /// use vix_lib::default_configs;
    ///
    /// let config = default_configs::sequential();
    /// assert!(!config.parallel_terms);
    /// ```
    pub fn sequential() -> VixConfig {
        VixConfig::sequential()
    }

    /// Near and next term evaluated with `rayon::join`. Results are identical to
    /// [`sequential()`].
    pub fn parallel() -> VixConfig {
        VixConfig::parallel()
    }
}

/// Compute the index for one trade date.
///
/// # Errors
///
/// Returns the first [`VixError`] raised by any stage:
/// no quotes on `date`, fewer than two expiries, a term without a call/put
/// pair, a term with fewer than two usable strikes, equal near/next day
/// counts, or a negative interpolated variance.
///
/// # Example
///
/// ```rust,no_run
/// use chrono::NaiveDate;
/// use vix_lib::{compute_vix, QuoteTable, VixError};
///
/// let table = QuoteTable::from_path("quotes.csv")?;
/// let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// match compute_vix(&table, date) {
///     Ok(vix) => println!("{:.2}", vix),
///     Err(VixError::NoDataForDate { .. }) => println!("market closed"),
///     Err(e) => eprintln!("{}", e),
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn compute_vix(table: &QuoteTable, date: NaiveDate) -> VixResult<f64> {
    VixCalculator::new(table).calculate(date)
}

/// [`compute_vix`] with the date given as `YYYY-MM-DD` or `YYYYMMDD`.
pub fn compute_vix_str(table: &QuoteTable, date: &str) -> VixResult<f64> {
    VixCalculator::new(table).calculate_str(date)
}

/// [`compute_vix`] returning the forward, ATM strike and variance of both
/// terms alongside the index value.
pub fn compute_vix_detailed(table: &QuoteTable, date: NaiveDate) -> VixResult<VixBreakdown> {
    VixCalculator::new(table).calculate_detailed(date)
}
