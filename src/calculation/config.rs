use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// CSV dialect of the quote file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CsvConfig {
    /// Field separator (must be a single-byte character)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Whether the first record holds column names
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_headers: default_has_headers(),
        }
    }
}

/// Main configuration struct for the VIX calculator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VixConfig {
    /// Evaluate the near and next term concurrently on the rayon pool.
    ///
    /// The two terms are independent until the final interpolation, so
    /// this never changes the result.
    #[serde(default)]
    pub parallel_terms: bool,

    /// Input file dialect
    #[serde(default)]
    pub csv: CsvConfig,
}

impl Default for VixConfig {
    fn default() -> Self {
        Self::sequential()
    }
}

impl VixConfig {
    /// Single-threaded evaluation, standard comma-separated input
    pub fn sequential() -> Self {
        Self {
            parallel_terms: false,
            csv: CsvConfig::default(),
        }
    }

    /// Near and next term computed concurrently
    pub fn parallel() -> Self {
        Self {
            parallel_terms: true,
            ..Self::sequential()
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    ///
    /// ```rust
    /// # use vix_lib::VixConfig;
    /// let config = VixConfig::from_toml_str(r#"
    ///     parallel_terms = true
    ///     [csv]
    ///     delimiter = ";"
    /// "#).unwrap();
    /// assert!(config.parallel_terms);
    /// assert_eq!(config.csv.delimiter, ';');
    /// assert!(config.csv.has_headers);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing VIX configuration")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}

fn default_delimiter() -> char {
    ','
}

fn default_has_headers() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = VixConfig::from_toml_str("").unwrap();
        assert_eq!(config, VixConfig::default());
        assert!(!config.parallel_terms);
    }

    #[test]
    fn test_partial_csv_section() {
        let config = VixConfig::from_toml_str("[csv]\nhas_headers = false\n").unwrap();
        assert_eq!(config.csv.delimiter, ',');
        assert!(!config.csv.has_headers);
    }

    #[test]
    fn test_rejects_wrong_type() {
        assert!(VixConfig::from_toml_str("parallel_terms = \"yes\"").is_err());
    }
}
