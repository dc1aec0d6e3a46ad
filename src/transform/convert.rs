// src/transform/convert.rs

use tracing::debug;

use super::rates::RateTable;
use crate::error::{EtlError, Result};
use crate::types::{EnrichedRecord, RankedRecord};

/// Currencies every record is converted into, in output column order.
pub const TARGET_CURRENCIES: [&str; 3] = ["GBP", "EUR", "INR"];

/// Round to 2 decimal places, halves away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Add GBP, EUR and INR market caps to each record.
///
/// Fails with `MissingRate` on the first target currency the table lacks,
/// before any record is converted.
pub fn convert(
    records: &[RankedRecord],
    rates: &RateTable,
    source_name: &str,
) -> Result<Vec<EnrichedRecord>> {
    let mut factors = [0.0f64; 3];
    for (slot, currency) in factors.iter_mut().zip(TARGET_CURRENCIES) {
        *slot = rates.get(currency).ok_or_else(|| EtlError::MissingRate {
            currency: currency.to_string(),
            source_path: source_name.to_string(),
        })?;
    }
    let [gbp, eur, inr] = factors;
    debug!(gbp, eur, inr, "conversion rates");

    Ok(records
        .iter()
        .map(|r| EnrichedRecord {
            rank: r.rank,
            company: r.company.clone(),
            mc_usd_billion: r.mc_usd_billion,
            mc_gbp_billion: round2(r.mc_usd_billion * gbp),
            mc_eur_billion: round2(r.mc_usd_billion * eur),
            mc_inr_billion: round2(r.mc_usd_billion * inr),
        })
        .collect())
}
