// src/transform/rates.rs

use serde::Deserialize;
use std::{collections::HashMap, io::Read, path::Path};
use tracing::{debug, warn};

use crate::error::{EtlError, Result};

/// Currency code → multiplier from USD.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: Option<String>,
    #[serde(rename = "Rate")]
    rate: Option<String>,
}

impl RateTable {
    /// Load a `Currency,Rate` CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| EtlError::RateSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Read rates from CSV. Rates that do not parse as a positive finite
    /// number are dropped; a repeated currency keeps its last rate.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self> {
        let source_err = |reason: String| EtlError::RateSource {
            path: source_name.to_string(),
            reason,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers().map_err(|e| source_err(e.to_string()))?;
        for required in ["Currency", "Rate"] {
            if !headers.iter().any(|h| h == required) {
                return Err(source_err(format!("missing `{required}` column")));
            }
        }

        let mut rates = HashMap::new();
        for row in rdr.deserialize::<RateRow>() {
            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    warn!(source = source_name, error = %e, "skipping unreadable rate row");
                    continue;
                }
            };
            let Some(currency) = row.currency.map(|c| c.trim().to_string()) else {
                continue;
            };
            match row.rate.as_deref().and_then(parse_rate) {
                Some(rate) => {
                    rates.insert(currency, rate);
                }
                None => debug!(%currency, rate = ?row.rate, "dropping unparseable rate"),
            }
        }

        Ok(Self { rates })
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

fn parse_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_currency_rate_csv() {
        let csv = "Currency,Rate\nEUR,0.93\nGBP, 0.8\nINR,82.95\n";
        let table = RateTable::from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("GBP"), Some(0.8));
        assert_eq!(table.get("INR"), Some(82.95));
    }

    #[test]
    fn drops_bad_rates_and_keeps_last_duplicate() {
        let csv = "Currency,Rate\nEUR,abc\nGBP,0.7\nGBP,0.8\nJPY,\nCHF,-1\n USD ,1\n";
        let table = RateTable::from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(table.get("EUR"), None);
        assert_eq!(table.get("GBP"), Some(0.8));
        assert_eq!(table.get("JPY"), None);
        assert_eq!(table.get("CHF"), None);
        assert_eq!(table.get("USD"), Some(1.0));
    }

    #[test]
    fn missing_rate_column_is_rate_source_error() {
        let csv = "Currency,Value\nEUR,0.9\n";
        let err = RateTable::from_reader(csv.as_bytes(), "inline").unwrap_err();
        assert!(matches!(err, EtlError::RateSource { .. }), "got {err:?}");
    }

    #[test]
    fn loads_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "Currency,Rate").unwrap();
        writeln!(tmp, "EUR,0.9").unwrap();
        let table = RateTable::from_path(tmp.path()).unwrap();
        assert_eq!(table.get("EUR"), Some(0.9));
    }

    #[test]
    fn missing_file_is_rate_source_error() {
        let err = RateTable::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, EtlError::RateSource { .. }));
        assert_eq!(err.stage(), "convert");
    }
}
