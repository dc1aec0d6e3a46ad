// src/config.rs

use clap::Parser;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_URL: &str = "https://en.wikipedia.org/wiki/List_of_largest_banks";
pub const DEFAULT_RATES: &str = "data/exchange_rates.csv";
pub const DEFAULT_OUT_CSV: &str = "outputs/largest_banks.csv";
pub const DEFAULT_DB: &str = "outputs/largest_banks.duckdb";
pub const DEFAULT_TABLE: &str = "Largest_banks";
pub const DEFAULT_LOG: &str = "etl_project_log.txt";

/// Where to read from and write to. Nothing in the pipeline interprets these
/// beyond passing them to the stage that owns them.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Largest banks ETL (Wikipedia -> CSV + DuckDB)"
)]
pub struct Config {
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,
    #[arg(long, default_value = DEFAULT_RATES)]
    pub rates: PathBuf,
    #[arg(long, default_value = DEFAULT_OUT_CSV)]
    pub out_csv: PathBuf,
    #[arg(long, default_value = DEFAULT_DB)]
    pub db: PathBuf,
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,
    #[arg(long, default_value = DEFAULT_LOG)]
    pub log: PathBuf,
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["bankscraper"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.url, DEFAULT_URL);
        assert_eq!(cfg.table, "Largest_banks");
        assert_eq!(cfg.out_csv, PathBuf::from("outputs/largest_banks.csv"));
        assert_eq!(cfg.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn defaults_come_from_shared_consts() {
        let cfg = Config::default();
        assert_eq!(cfg.rates, PathBuf::from(DEFAULT_RATES));
        assert_eq!(cfg.out_csv, PathBuf::from(DEFAULT_OUT_CSV));
        assert_eq!(cfg.db, PathBuf::from(DEFAULT_DB));
        assert_eq!(cfg.table, DEFAULT_TABLE);
        assert_eq!(cfg.log, PathBuf::from(DEFAULT_LOG));
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = Config::parse_from([
            "bankscraper",
            "--table",
            "banks",
            "--timeout-secs",
            "5",
            "--rates",
            "/tmp/rates.csv",
        ]);
        assert_eq!(cfg.table, "banks");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.rates, PathBuf::from("/tmp/rates.csv"));
    }
}
