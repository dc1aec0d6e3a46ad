use anyhow::{Context, Result};
use bankscraper::{duck, fetch, pipeline, Config, FileProgressLog, ProgressLog};
use clap::Parser;
use std::{fs, path::Path};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Regional office reports printed after each load: (title, columns).
const REPORTS: &[(&str, &str)] = &[
    ("FULL TABLE", "*"),
    ("London Office (GBP)", "company, mc_gbp_billion"),
    ("Berlin Office (EUR)", "company, mc_eur_billion"),
    ("New Delhi Office (INR)", "company, mc_inr_billion"),
];

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    let config = Config::parse();

    // ─── 2) configure dirs ───────────────────────────────────────────
    for p in [&config.out_csv, &config.db, &config.log] {
        if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let log = FileProgressLog::new(&config.log);
    let client = fetch::build_client()?;

    // ─── 3) extract → transform → load ───────────────────────────────
    let records = pipeline::run(&config, &client, &log).await.map_err(|e| {
        let stage = e.stage();
        error!(stage, error = %e, "ETL run failed");
        anyhow::Error::new(e).context(format!("{stage} stage failed"))
    })?;
    info!(rows = records.len(), "ETL run finished");

    // ─── 4) reports ──────────────────────────────────────────────────
    print_reports(&config.db, &config.table, &log)?;

    log.log("done", "Process Complete.");
    Ok(())
}

fn print_reports(db: &Path, table: &str, log: &dyn ProgressLog) -> Result<()> {
    let conn = duck::open_disk_db(db)?;
    let ident = duck::quote_ident(table);
    for (title, columns) in REPORTS {
        let sql = format!("SELECT {columns} FROM {ident};");
        let result = pipeline::query(&conn, &sql, log)
            .with_context(|| format!("running report {title}"))?;
        println!("\n--- {title} ---");
        result.to_table().printstd();
    }
    Ok(())
}
