use duckdb::types::Value as DuckValue;
use duckdb::{Connection, ToSql};
use prettytable::{format, Cell, Row, Table};
use std::{fmt, path::Path, time::Instant};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::types::EnrichedRecord;

/// Open a DuckDB database on disk at `path`, creating the file if it doesn't exist.
pub fn open_disk_db(path: impl AsRef<Path>) -> Result<Connection> {
    Ok(Connection::open(path)?)
}

/// Open a DuckDB in‐memory database
pub fn open_mem_db() -> Result<Connection> {
    Ok(Connection::open_in_memory()?)
}

/// Quote `name` as a SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Replace `table` with `records`: drop, recreate and bulk insert inside one
/// transaction, so readers see either the old table or the complete new one.
#[instrument(level = "info", skip(conn, records), fields(rows = records.len()))]
pub fn replace_table(conn: &mut Connection, table: &str, records: &[EnrichedRecord]) -> Result<()> {
    let start = Instant::now();
    let ident = quote_ident(table);
    let tx = conn.transaction()?;

    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {ident};
         CREATE TABLE {ident}(
            company VARCHAR,
            mc_usd_billion DOUBLE,
            mc_gbp_billion DOUBLE,
            mc_eur_billion DOUBLE,
            mc_inr_billion DOUBLE
        );"
    ))?;

    {
        let mut appender = tx.appender(table)?;
        appender.append_rows(records.iter().map(|r| {
            [
                &r.company as &dyn ToSql,
                &r.mc_usd_billion as &dyn ToSql,
                &r.mc_gbp_billion as &dyn ToSql,
                &r.mc_eur_billion as &dyn ToSql,
                &r.mc_inr_billion as &dyn ToSql,
            ]
        }))?;
        appender.flush()?;
    }

    tx.commit()?;
    debug!(elapsed = ?start.elapsed(), "table replaced");
    Ok(())
}

/// A single value from a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Any other DuckDB type (dates, blobs, lists...), in its debug form.
    Other(String),
}

impl From<DuckValue> for CellValue {
    fn from(value: DuckValue) -> Self {
        match value {
            DuckValue::Null => CellValue::Null,
            DuckValue::Boolean(v) => CellValue::Integer(i64::from(v)),
            DuckValue::TinyInt(v) => CellValue::Integer(v.into()),
            DuckValue::SmallInt(v) => CellValue::Integer(v.into()),
            DuckValue::Int(v) => CellValue::Integer(v.into()),
            DuckValue::BigInt(v) => CellValue::Integer(v),
            DuckValue::UTinyInt(v) => CellValue::Integer(v.into()),
            DuckValue::USmallInt(v) => CellValue::Integer(v.into()),
            DuckValue::UInt(v) => CellValue::Integer(v.into()),
            DuckValue::UBigInt(v) => match i64::try_from(v) {
                Ok(v) => CellValue::Integer(v),
                Err(_) => CellValue::Text(v.to_string()),
            },
            DuckValue::HugeInt(v) => match i64::try_from(v) {
                Ok(v) => CellValue::Integer(v),
                Err(_) => CellValue::Text(v.to_string()),
            },
            DuckValue::Float(v) => CellValue::Real(v.into()),
            DuckValue::Double(v) => CellValue::Real(v),
            DuckValue::Text(v) => CellValue::Text(v),
            other => CellValue::Other(format!("{other:?}")),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Integer(v) => write!(f, "{v}"),
            CellValue::Real(v) => write!(f, "{v}"),
            CellValue::Text(v) | CellValue::Other(v) => f.write_str(v),
        }
    }
}

/// Column names plus rows of a query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(Row::new(
            self.columns
                .iter()
                .map(|c| Cell::new(c).style_spec("bFg"))
                .collect(),
        ));
        for row in &self.rows {
            table.add_row(Row::new(
                row.iter()
                    .map(|v| match v {
                        CellValue::Integer(_) | CellValue::Real(_) => {
                            Cell::new(&v.to_string()).style_spec("r")
                        }
                        _ => Cell::new(&v.to_string()),
                    })
                    .collect(),
            ));
        }
        table
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

/// Run `sql` as given and collect every row. The text is trusted: there is no
/// read-only check, so callers must not pass untrusted input.
#[instrument(level = "info", skip(conn))]
pub fn run_query(conn: &Connection, sql: &str) -> Result<QueryResult> {
    let mut statement = conn.prepare(sql.trim())?;

    // executes exactly once; column metadata is read off the running statement
    let mut cursor = statement.query([] as [&dyn ToSql; 0])?;
    let columns: Vec<String> = cursor
        .as_ref()
        .map(|stmt| stmt.column_names())
        .unwrap_or_default();
    let column_count = columns.len();

    let mut rows = Vec::new();
    while let Some(row) = cursor.next()? {
        let mut out = Vec::with_capacity(column_count);
        for index in 0..column_count {
            let value: DuckValue = row.get(index)?;
            out.push(CellValue::from(value));
        }
        rows.push(out);
    }

    info!(rows = rows.len(), "query complete");
    Ok(QueryResult { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn record(company: &str, usd: f64) -> EnrichedRecord {
        EnrichedRecord {
            rank: 0,
            company: company.into(),
            mc_usd_billion: usd,
            mc_gbp_billion: usd * 0.5,
            mc_eur_billion: usd * 0.25,
            mc_inr_billion: usd * 2.0,
        }
    }

    #[test]
    fn replace_then_query() -> Result<()> {
        let mut conn = open_mem_db()?;
        replace_table(
            &mut conn,
            "Largest_banks",
            &[record("Bank A", 1000.0), record("Bank C", 500.0)],
        )?;

        let res = run_query(&conn, "SELECT company, MC_GBP_Billion FROM Largest_banks;")?;
        assert_eq!(res.columns.len(), 2);
        assert_eq!(res.columns[0], "company");
        assert_eq!(
            res.rows,
            vec![
                vec![CellValue::Text("Bank A".into()), CellValue::Real(500.0)],
                vec![CellValue::Text("Bank C".into()), CellValue::Real(250.0)],
            ]
        );
        Ok(())
    }

    #[test]
    fn replace_drops_previous_contents() -> Result<()> {
        let mut conn = open_mem_db()?;
        replace_table(&mut conn, "banks", &[record("Old", 1.0), record("Older", 2.0)])?;
        replace_table(&mut conn, "banks", &[record("New", 3.0)])?;

        let res = run_query(&conn, "SELECT * FROM banks")?;
        assert_eq!(
            res.columns,
            vec![
                "company",
                "mc_usd_billion",
                "mc_gbp_billion",
                "mc_eur_billion",
                "mc_inr_billion"
            ]
        );
        assert_eq!(res.rows.len(), 1);
        assert_eq!(res.rows[0][0], CellValue::Text("New".into()));
        Ok(())
    }

    #[test]
    fn replace_also_replaces_a_different_schema() -> Result<()> {
        let mut conn = open_mem_db()?;
        conn.execute_batch("CREATE TABLE banks(x INTEGER); INSERT INTO banks VALUES (7);")?;
        replace_table(&mut conn, "banks", &[record("A", 1.0)])?;
        let res = run_query(&conn, "SELECT count(*) AS n FROM banks")?;
        assert_eq!(res.rows, vec![vec![CellValue::Integer(1)]]);
        Ok(())
    }

    #[test]
    fn persists_on_disk() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("banks.duckdb");
        {
            let mut conn = open_disk_db(&path)?;
            replace_table(&mut conn, "Largest_banks", &[record("A", 1.0)])?;
        }
        let conn = open_disk_db(&path)?;
        let res = run_query(&conn, "SELECT company FROM Largest_banks")?;
        assert_eq!(res.rows, vec![vec![CellValue::Text("A".into())]]);
        Ok(())
    }

    #[test]
    fn insert_runs_once() -> Result<()> {
        let mut conn = open_mem_db()?;
        replace_table(&mut conn, "banks", &[])?;

        run_query(&conn, "INSERT INTO banks VALUES ('X', 1, 1, 1, 1)")?;
        let res = run_query(&conn, "SELECT count(*) AS n FROM banks")?;
        assert_eq!(res.columns, vec!["n"]);
        assert_eq!(res.rows, vec![vec![CellValue::Integer(1)]]);
        Ok(())
    }

    #[test]
    fn create_table_as_runs_once() -> Result<()> {
        let conn = open_mem_db()?;
        run_query(&conn, "CREATE TABLE t2 AS SELECT 1 AS x")?;
        let res = run_query(&conn, "SELECT x FROM t2")?;
        assert_eq!(res.rows, vec![vec![CellValue::Integer(1)]]);
        Ok(())
    }

    #[test]
    fn unmapped_types_become_other() -> Result<()> {
        let conn = open_mem_db()?;
        let res = run_query(&conn, "SELECT DATE '2024-01-02' AS d, 'plain' AS t")?;
        assert!(matches!(res.rows[0][0], CellValue::Other(_)));
        assert_eq!(res.rows[0][1], CellValue::Text("plain".into()));
        assert_eq!(
            CellValue::from(DuckValue::Blob(vec![1, 2])),
            CellValue::Other("Blob([1, 2])".into())
        );
        Ok(())
    }

    #[test]
    fn bad_sql_is_an_error() {
        let conn = open_mem_db().unwrap();
        let err = run_query(&conn, "SELECT * FROM nowhere").unwrap_err();
        assert_eq!(err.stage(), "store");
    }

    #[test]
    fn renders_as_text_table() {
        let res = QueryResult {
            columns: vec!["company".into(), "mc_usd_billion".into()],
            rows: vec![vec![CellValue::Text("Bank A".into()), CellValue::Real(1000.5)]],
        };
        let text = res.to_string();
        assert!(text.contains("company"));
        assert!(text.contains("Bank A"));
        assert!(text.contains("1000.5"));
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("Largest_banks"), "\"Largest_banks\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
