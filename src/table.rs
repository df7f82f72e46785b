//! Immutable in-memory quote table.
//!
//! The table is built once from raw rows (usually a CSV export) and then
//! shared by reference with every calculation. Construction is the only
//! place where input is validated; a table that exists is well-formed.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::calculation::config::CsvConfig;
use crate::calculation::types::{OptionType, Quote, RawQuoteRow};

/// Parse an 8-digit `YYYYMMDD` date.
pub fn parse_compact_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(anyhow!("expected an 8-digit YYYYMMDD date, got {:?}", text));
    }
    NaiveDate::parse_from_str(text, "%Y%m%d")
        .with_context(|| format!("invalid calendar date {:?}", text))
}

fn normalize_row(raw: RawQuoteRow) -> Result<Quote> {
    let trade_date = parse_compact_date(&raw.date).context("column `date`")?;
    let expiry_date = parse_compact_date(&raw.expr_date).context("column `expr_date`")?;

    let option_type = OptionType::from_code(raw.pc)
        .ok_or_else(|| anyhow!("column `PC` must be 1 (call) or 2 (put), got {}", raw.pc))?;

    if !raw.strike.is_finite() || raw.strike <= 0.0 {
        return Err(anyhow!("strike must be positive, got {}", raw.strike));
    }
    if !raw.bid.is_finite() || !raw.ask.is_finite() || raw.bid < 0.0 || raw.ask < 0.0 {
        return Err(anyhow!(
            "bid/ask must be finite and non-negative, got {}/{}",
            raw.bid,
            raw.ask
        ));
    }
    if !raw.rate_pct.is_finite() {
        return Err(anyhow!("rate must be finite, got {}", raw.rate_pct));
    }

    Ok(Quote {
        trade_date,
        expiry_date,
        strike: raw.strike,
        option_type,
        bid: raw.bid,
        ask: raw.ask,
        mid: (raw.bid + raw.ask) / 2.0,
        volume: raw.volume,
        days_to_expiry: raw.days_to_expiry,
        rate_pct: raw.rate_pct,
    })
}

/// All quotes of one underlying, normalised and read-only.
#[derive(Debug, Clone, Default)]
pub struct QuoteTable {
    quotes: Vec<Quote>,
}

impl QuoteTable {
    /// Validate and normalise raw rows.
    ///
    /// Fails on the first row whose dates are not `YYYYMMDD`, whose `PC`
    /// code is unknown, or whose prices are out of range. The error names
    /// the offending row (zero-based).
    pub fn new(rows: Vec<RawQuoteRow>) -> Result<Self> {
        let quotes = rows
            .into_iter()
            .enumerate()
            .map(|(i, raw)| normalize_row(raw).with_context(|| format!("quote row {}", i)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(rows = quotes.len(), "quote table built");
        Ok(Self { quotes })
    }

    /// Read a comma-separated table with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_config(reader, &CsvConfig::default())
    }

    pub fn from_reader_with_config<R: Read>(reader: R, config: &CsvConfig) -> Result<Self> {
        let delimiter = u8::try_from(config.delimiter)
            .map_err(|_| anyhow!("CSV delimiter must be a single-byte character"))?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(config.has_headers)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (i, record) in csv_reader.deserialize().enumerate() {
            let row: RawQuoteRow = record.with_context(|| format!("CSV record {}", i))?;
            rows.push(row);
        }

        Self::new(rows)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with_config(path, &CsvConfig::default())
    }

    pub fn from_path_with_config<P: AsRef<Path>>(path: P, config: &CsvConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening quote file {}", path.display()))?;
        Self::from_reader_with_config(file, config)
            .with_context(|| format!("loading quote file {}", path.display()))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Distinct trade dates present, ascending.
    pub fn trade_dates(&self) -> Vec<NaiveDate> {
        self.quotes
            .iter()
            .map(|q| q.trade_date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
