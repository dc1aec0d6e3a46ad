// src/extract/rank.rs

use crate::types::{CompanyRecord, RankedRecord};

pub const TOP_N: usize = 10;

/// Sort by market cap descending, keeping source order among equal values,
/// and keep the first `n`. Ranks are assigned from 0.
pub fn top_n(mut records: Vec<CompanyRecord>, n: usize) -> Vec<RankedRecord> {
    records.sort_by(|a, b| b.mc_usd_billion.total_cmp(&a.mc_usd_billion));
    records
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(rank, r)| RankedRecord {
            rank,
            company: r.company,
            mc_usd_billion: r.mc_usd_billion,
        })
        .collect()
}
