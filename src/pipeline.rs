// src/pipeline.rs

use duckdb::Connection;
use reqwest::Client;
use std::{path::Path, time::Duration};
use tracing::instrument;

use crate::config::Config;
use crate::duck;
use crate::error::Result;
use crate::extract::extract_ranked;
use crate::fetch::fetch_html;
use crate::load::flat_file::{commit_csv, stage_csv};
use crate::progress::ProgressLog;
use crate::transform::{convert, RateTable};
use crate::types::{EnrichedRecord, RankedRecord};

/// Fetch the page and reduce it to the top banks by market cap.
pub async fn extract(
    client: &Client,
    url: &str,
    timeout: Duration,
    log: &dyn ProgressLog,
) -> Result<Vec<RankedRecord>> {
    log.log("extract", "Starting extraction");
    let html = fetch_html(client, url, timeout).await?;
    let ranked = extract_ranked(&html)?;
    log.log(
        "extract",
        &format!("Extraction complete: {} rows", ranked.len()),
    );
    Ok(ranked)
}

/// Add GBP, EUR and INR columns using the rates in `rates_path`.
pub fn transform(
    records: &[RankedRecord],
    rates_path: &Path,
    log: &dyn ProgressLog,
) -> Result<Vec<EnrichedRecord>> {
    log.log("transform", "Starting transformation");
    let rates = RateTable::from_path(rates_path)?;
    let enriched = convert(records, &rates, &rates_path.display().to_string())?;
    log.log("transform", "Transformation complete");
    Ok(enriched)
}

/// Write both outputs. The CSV is staged first and only moved into place
/// after the table replacement commits, so either both change or neither does.
#[instrument(level = "info", skip(records, conn, log), fields(rows = records.len()))]
pub fn load(
    records: &[EnrichedRecord],
    csv_path: &Path,
    conn: &mut Connection,
    table: &str,
    log: &dyn ProgressLog,
) -> Result<()> {
    log.log("load", &format!("Saving CSV to {}", csv_path.display()));
    let staged = stage_csv(csv_path, records)?;

    log.log("load", &format!("Loading to DB table: {table}"));
    duck::replace_table(conn, table, records)?;

    commit_csv(staged, csv_path)?;
    log.log("load", "CSV saved");
    log.log("load", "DB load complete");
    Ok(())
}

/// Run an ad-hoc query, noting it in the progress log.
pub fn query(conn: &Connection, sql: &str, log: &dyn ProgressLog) -> Result<duck::QueryResult> {
    log.log("query", &format!("Running query: {sql}"));
    duck::run_query(conn, sql)
}

/// Extract, transform and load once, end to end. Any failure aborts before
/// either output has been touched.
pub async fn run(
    config: &Config,
    client: &Client,
    log: &dyn ProgressLog,
) -> Result<Vec<EnrichedRecord>> {
    log.log("setup", "Preliminaries complete. Initiating ETL process");

    let ranked = extract(client, &config.url, config.timeout(), log).await?;
    let enriched = transform(&ranked, &config.rates, log)?;

    let mut conn = duck::open_disk_db(&config.db)?;
    load(&enriched, &config.out_csv, &mut conn, &config.table, log)?;
    Ok(enriched)
}
