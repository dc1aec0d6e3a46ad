// src/load/flat_file.rs

use std::{io::Write, path::Path};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::types::{EnrichedRecord, OUTPUT_COLUMNS};

/// Amount as written to the CSV: 2 decimal places, trailing zeros dropped
/// but always one digit after the point (`1000.0`, `79.5`, `342.01`).
pub fn format_amount(v: f64) -> String {
    let fixed = format!("{:.2}", v);
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

/// Serialize records as CSV into `w`, header first.
pub fn write_records<W: Write>(w: W, records: &[EnrichedRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(OUTPUT_COLUMNS)?;
    for r in records {
        wtr.write_record([
            r.company.clone(),
            format_amount(r.mc_usd_billion),
            format_amount(r.mc_gbp_billion),
            format_amount(r.mc_eur_billion),
            format_amount(r.mc_inr_billion),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the CSV to a temporary file next to `path`. Nothing at `path`
/// changes until the returned file is persisted.
pub fn stage_csv(path: &Path, records: &[EnrichedRecord]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write_records(tmp.as_file_mut(), records)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Move a staged CSV over `path`, replacing whatever was there.
pub fn commit_csv(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
