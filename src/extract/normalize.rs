// src/extract/normalize.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::columns::ColumnSelection;
use super::raw_table::RawTable;
use crate::types::CompanyRecord;

static FOOTNOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").expect("footnote regex"));
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.\-]").expect("numeric regex"));

/// Remove bracketed citation markers such as `[1]` or `[note 2]`.
pub fn strip_footnotes(raw: &str) -> String {
    FOOTNOTE.replace_all(raw, "").into_owned()
}

/// Clean a scraped cell down to a number: drop footnotes, drop comma
/// separators, trim, keep only digits, `.` and `-`, then parse.
pub fn clean_numeric(raw: &str) -> Option<f64> {
    let no_notes = strip_footnotes(raw);
    let no_commas = no_notes.replace(',', "");
    let digits = NON_NUMERIC.replace_all(no_commas.trim(), "");
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Company name with footnotes removed and whitespace trimmed; `None` if nothing is left.
pub fn clean_name(raw: &str) -> Option<String> {
    let name = strip_footnotes(raw).trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// Turn the selected name/value columns into records, in source order.
/// Rows whose name or value does not clean are dropped.
pub fn normalize_rows(table: &RawTable, selection: &ColumnSelection) -> Vec<CompanyRecord> {
    let mut dropped = 0usize;
    let records: Vec<CompanyRecord> = table
        .column(selection.name)
        .zip(table.column(selection.value))
        .filter_map(|(name, value)| {
            let rec = clean_name(name).zip(clean_numeric(value)).map(
                |(company, mc_usd_billion)| CompanyRecord {
                    company,
                    mc_usd_billion,
                },
            );
            if rec.is_none() {
                dropped += 1;
                debug!(company = name, value, "dropping row");
            }
            rec
        })
        .collect();

    debug!(kept = records.len(), dropped, "normalized rows");
    records
}
