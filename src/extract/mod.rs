// src/extract/mod.rs

pub mod columns;
pub mod locate;
pub mod normalize;
pub mod rank;
pub mod raw_table;

pub use columns::{select_columns, ColumnSelection, NameStrategy, ValueStrategy};
pub use locate::find_market_cap_table;
pub use normalize::{clean_name, clean_numeric, normalize_rows};
pub use rank::{top_n, TOP_N};
pub use raw_table::{parse_table, RawTable};

use tracing::instrument;

use crate::error::Result;
use crate::types::RankedRecord;

/// Page markup to the top banks by market cap: locate the table, parse it,
/// pick the columns, clean the rows and rank them.
#[instrument(level = "info", skip(html))]
pub fn extract_ranked(html: &str) -> Result<Vec<RankedRecord>> {
    let table_html = find_market_cap_table(html)?;
    let table = parse_table(&table_html);
    let selection = select_columns(&table)?;
    let records = normalize_rows(&table, &selection);
    Ok(top_n(records, TOP_N))
}
