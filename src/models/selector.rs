use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::calculation::types::Quote;
use crate::error::{VixError, VixResult};
use crate::table::QuoteTable;

/// All quotes traded on `date`, in table order.
pub fn select_day(table: &QuoteTable, date: NaiveDate) -> VixResult<Vec<&Quote>> {
    let rows: Vec<&Quote> = table
        .quotes()
        .iter()
        .filter(|q| q.trade_date == date)
        .collect();

    if rows.is_empty() {
        return Err(VixError::NoDataForDate { date });
    }
    Ok(rows)
}

/// The two earliest distinct expiries among `day_rows`, as `(near, next)`.
///
/// The result depends only on the set of expiries present, never on row order.
pub fn nearest_two_expiries(day_rows: &[&Quote]) -> VixResult<(NaiveDate, NaiveDate)> {
    let expiries: BTreeSet<NaiveDate> = day_rows.iter().map(|q| q.expiry_date).collect();
    let mut ascending = expiries.iter().copied();

    match (ascending.next(), ascending.next()) {
        (Some(near), Some(next)) => Ok((near, next)),
        _ => Err(VixError::InsufficientExpirations {
            // Callers pass rows of a single trade date.
            date: day_rows.first().map_or(NaiveDate::MIN, |q| q.trade_date),
            found: expiries.len(),
        }),
    }
}
