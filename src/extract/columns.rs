// src/extract/columns.rs

use tracing::{debug, info};

use super::normalize::clean_numeric;
use super::raw_table::RawTable;
use crate::error::{EtlError, Result};

const NAME_KEYWORDS: &[&str] = &["bank", "company", "name"];
const MARKET_CAP_KEYWORD: &str = "market cap";
const UNIT_KEYWORDS: &[&str] = &["us$", "usd", "us$ billion", "billion"];

/// Ways of picking the bank-name column, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStrategy {
    /// Header contains one of "bank", "company", "name".
    NameKeyword,
    /// The table's first column.
    FirstColumn,
}

/// Ways of picking the market-cap column, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStrategy {
    /// Header contains "market cap" and a currency/unit marker.
    MarketCapHeader,
    /// Column whose cells most often clean to a number.
    NumericScore,
}

pub const NAME_STRATEGIES: [NameStrategy; 2] = [NameStrategy::NameKeyword, NameStrategy::FirstColumn];
pub const VALUE_STRATEGIES: [ValueStrategy; 2] =
    [ValueStrategy::MarketCapHeader, ValueStrategy::NumericScore];

impl NameStrategy {
    pub fn apply(self, table: &RawTable) -> Option<usize> {
        match self {
            NameStrategy::NameKeyword => first_header_matching(table, |h| {
                NAME_KEYWORDS.iter().any(|k| h.contains(k))
            }),
            NameStrategy::FirstColumn => (table.width() > 0).then_some(0),
        }
    }
}

impl ValueStrategy {
    pub fn apply(self, table: &RawTable) -> Option<usize> {
        match self {
            ValueStrategy::MarketCapHeader => first_header_matching(table, |h| {
                h.contains(MARKET_CAP_KEYWORD) && UNIT_KEYWORDS.iter().any(|k| h.contains(k))
            }),
            ValueStrategy::NumericScore => best_numeric_column(&numeric_scores(table)),
        }
    }
}

/// The chosen column pair and which value strategy found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub name: usize,
    pub value: usize,
    pub value_strategy: ValueStrategy,
}

/// Pick the name and market-cap columns of `table`.
pub fn select_columns(table: &RawTable) -> Result<ColumnSelection> {
    if table.width() == 0 {
        return Err(EtlError::ColumnNotFound("table has no columns".into()));
    }

    let name = NAME_STRATEGIES
        .iter()
        .find_map(|s| s.apply(table))
        .ok_or_else(|| EtlError::ColumnNotFound("no name column".into()))?;

    let (value, value_strategy) = VALUE_STRATEGIES
        .iter()
        .find_map(|s| s.apply(table).map(|idx| (idx, *s)))
        .ok_or_else(|| {
            EtlError::ColumnNotFound(format!(
                "no market cap column among {:?}",
                table.headers
            ))
        })?;

    info!(
        name = %table.headers[name],
        value = %table.headers[value],
        strategy = ?value_strategy,
        "selected columns"
    );
    Ok(ColumnSelection {
        name,
        value,
        value_strategy,
    })
}

/// Number of cells in each column that clean to a number, in column order.
pub fn numeric_scores(table: &RawTable) -> Vec<usize> {
    (0..table.width())
        .map(|idx| {
            table
                .column(idx)
                .filter(|cell| clean_numeric(cell).is_some())
                .count()
        })
        .collect()
}

/// Index of the highest score, earliest column on ties. `None` if every score is zero.
pub fn best_numeric_column(scores: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((idx, score));
        }
    }
    debug!(?scores, ?best, "numeric column scores");
    best.filter(|(_, score)| *score > 0).map(|(idx, _)| idx)
}

fn first_header_matching(table: &RawTable, pred: impl Fn(&str) -> bool) -> Option<usize> {
    table
        .headers
        .iter()
        .position(|h| pred(&h.to_lowercase()))
}
