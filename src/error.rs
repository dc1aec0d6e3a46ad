// src/error.rs

use thiserror::Error;

/// Every way a pipeline run can fail. Row-level parse failures are not here:
/// those rows are dropped where they occur and never surface as errors.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("GET {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid source URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("could not find the 'By market capitalization' section on the page")]
    SectionNotFound,

    #[error("found the 'By market capitalization' section but no wikitable follows it")]
    TableNotFound,

    #[error("could not detect a usable column: {0}")]
    ColumnNotFound(String),

    #[error("missing exchange rate for {currency} in {source_path}")]
    MissingRate {
        currency: String,
        source_path: String,
    },

    #[error("reading rate source {path}: {reason}")]
    RateSource { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Db(#[from] duckdb::Error),
}

impl EtlError {
    /// Pipeline stage the error aborted.
    pub fn stage(&self) -> &'static str {
        match self {
            EtlError::Fetch { .. } | EtlError::InvalidUrl { .. } => "fetch",
            EtlError::SectionNotFound | EtlError::TableNotFound => "locate",
            EtlError::ColumnNotFound(_) => "select",
            EtlError::MissingRate { .. } | EtlError::RateSource { .. } => "convert",
            EtlError::Io(_) | EtlError::Csv(_) => "load",
            EtlError::Db(_) => "store",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
