// src/types.rs

/// One bank after its name and market cap cells have been cleaned.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    pub company: String,
    pub mc_usd_billion: f64,
}

/// A `CompanyRecord` at its position in the descending market-cap ranking.
/// `rank` is zero-based.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord {
    pub rank: usize,
    pub company: String,
    pub mc_usd_billion: f64,
}

/// A ranked record with its market cap converted into every target currency,
/// each rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub rank: usize,
    pub company: String,
    pub mc_usd_billion: f64,
    pub mc_gbp_billion: f64,
    pub mc_eur_billion: f64,
    pub mc_inr_billion: f64,
}

/// Output column order shared by the CSV file and the DuckDB table.
pub const OUTPUT_COLUMNS: [&str; 5] = [
    "company",
    "mc_usd_billion",
    "mc_gbp_billion",
    "mc_eur_billion",
    "mc_inr_billion",
];
