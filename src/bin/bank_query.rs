use anyhow::{Context, Result};
use bankscraper::config::{DEFAULT_DB, DEFAULT_LOG};
use bankscraper::{duck, pipeline, FileProgressLog};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Run one query against the bank table store and print the rows.
#[derive(Parser)]
#[command(author, version, about = "Query the largest banks DuckDB store")]
struct Args {
    /// SQL to execute as-is; only pass trusted text.
    #[arg(long)]
    sql: String,
    #[arg(long, default_value = DEFAULT_DB)]
    db: PathBuf,
    #[arg(long, default_value = DEFAULT_LOG)]
    log: PathBuf,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if !args.db.exists() {
        anyhow::bail!(
            "store {} not found; run `bankscraper` first",
            args.db.display()
        );
    }

    let conn = duck::open_disk_db(&args.db)
        .with_context(|| format!("opening {}", args.db.display()))?;
    let log = FileProgressLog::new(&args.log);
    let result = pipeline::query(&conn, &args.sql, &log).context("query failed")?;

    if result.rows.is_empty() {
        println!("(no rows)");
    } else {
        result.to_table().printstd();
    }
    tracing::info!(rows = result.rows.len(), "query finished");
    Ok(())
}
