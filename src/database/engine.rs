//! DuckDB-based summary engine
//!
//! Reads the written tables back through DuckDB and runs the
//! validation queries: row counts, format breakdowns, top batters and the
//! wicket-kind distribution. The tables can optionally be materialized into
//! a DuckDB database file for ad-hoc analysis.

use crate::error::{Error, Result};
use crate::output::table_schema;
use crate::types::{OutputFormat, Table};
use arrow::datatypes::DataType;
use duckdb::{params, Connection, Row};
use serde::Serialize;
use std::path::Path;

fn db_error(context: &str) -> impl FnOnce(duckdb::Error) -> Error + '_ {
    move |e| Error::database(format!("{context}: {e}"))
}

/// Quote a string as a SQL literal
fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// DuckDB column type for an Arrow column type
fn duckdb_type(data_type: &DataType) -> Result<&'static str> {
    match data_type {
        DataType::Utf8 => Ok("VARCHAR"),
        DataType::Int64 => Ok("BIGINT"),
        DataType::Float64 => Ok("DOUBLE"),
        DataType::Boolean => Ok("BOOLEAN"),
        other => Err(Error::database(format!("No DuckDB column type for {other}"))),
    }
}

/// Table function reading every part of a table
fn table_scan(root: &str, table: Table, format: OutputFormat) -> Result<String> {
    let glob = sql_literal(&format!(
        "{root}/{}/*.{}",
        table.name(),
        format.extension()
    ));

    match format {
        OutputFormat::Parquet => Ok(format!("read_parquet({glob})")),
        OutputFormat::Jsonl => {
            // Lines omit null columns, so types come from the table schema
            let columns = table_schema(table)
                .fields()
                .iter()
                .map(|field| {
                    Ok(format!(
                        "{}: {}",
                        sql_literal(field.name()),
                        sql_literal(duckdb_type(field.data_type())?)
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(format!(
                "read_json({glob}, format = 'newline_delimited', columns = {{{}}})",
                columns.join(", ")
            ))
        }
    }
}

/// Rows in one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: String,
    pub rows: i64,
}

/// A count grouped by a nullable key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: Option<String>,
    pub count: i64,
}

/// Career runs for one batter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatterRuns {
    pub batter: Option<String>,
    pub total_runs: i64,
    pub balls_faced: i64,
}

/// Everything the `summary` command prints
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub row_counts: Vec<TableCount>,
    pub matches_by_type: Vec<GroupCount>,
    pub deliveries_by_type: Vec<GroupCount>,
    pub top_batters: Vec<BatterRuns>,
    pub wicket_kinds: Vec<GroupCount>,
}

/// Query engine over a directory of written tables
pub struct SummaryEngine {
    conn: Connection,
    /// Root the tables were read from (for logging)
    root: String,
}

impl SummaryEngine {
    /// Open the tables under `root` as in-memory views
    pub fn open(root: &str, format: OutputFormat) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(db_error("Failed to create DuckDB connection"))?;
        Self::register(conn, root, format, "VIEW")
    }

    /// Copy the tables under `root` into a DuckDB database file
    ///
    /// Existing tables of the same names are replaced.
    pub fn materialize(root: &str, format: OutputFormat, database: &Path) -> Result<Self> {
        let conn = Connection::open(database).map_err(|e| {
            Error::database(format!(
                "Failed to open DuckDB database '{}': {e}",
                database.display()
            ))
        })?;
        Self::register(conn, root, format, "TABLE")
    }

    fn register(conn: Connection, root: &str, format: OutputFormat, kind: &str) -> Result<Self> {
        let root = root.trim_end_matches('/').to_string();
        let engine = Self { conn, root };

        if is_remote(&engine.root) {
            engine.configure_cloud_storage()?;
        }

        for table in Table::ALL {
            let sql = format!(
                "CREATE OR REPLACE {kind} {} AS SELECT * FROM {};",
                table.name(),
                table_scan(&engine.root, table, format)?
            );
            tracing::debug!("Registering table: {}", sql);
            engine
                .conn
                .execute_batch(&sql)
                .map_err(|e| Error::database(format!("Failed to read table '{table}': {e}")))?;
        }

        Ok(engine)
    }

    /// Configure cloud storage credentials (S3, R2, GCS) from the environment
    fn configure_cloud_storage(&self) -> Result<()> {
        self.conn
            .execute_batch("INSTALL httpfs; LOAD httpfs;")
            .map_err(db_error("Failed to load httpfs extension"))?;

        if let (Ok(key_id), Ok(secret)) = (
            std::env::var("AWS_ACCESS_KEY_ID"),
            std::env::var("AWS_SECRET_ACCESS_KEY"),
        ) {
            let region =
                std::env::var("AWS_DEFAULT_REGION").unwrap_or_else(|_| "us-east-1".to_string());
            self.conn
                .execute_batch(&format!(
                    "SET s3_access_key_id = {}; SET s3_secret_access_key = {}; SET s3_region = {};",
                    sql_literal(&key_id),
                    sql_literal(&secret),
                    sql_literal(&region)
                ))
                .map_err(db_error("Failed to configure S3"))?;

            // R2, MinIO and other S3-compatible endpoints
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                let host = endpoint
                    .trim_start_matches("https://")
                    .trim_start_matches("http://");
                self.conn
                    .execute_batch(&format!(
                        "SET s3_endpoint = {}; SET s3_url_style = 'path';",
                        sql_literal(host)
                    ))
                    .map_err(db_error("Failed to configure S3 endpoint"))?;
            }
        }

        if let Ok(service_account) = std::env::var("GOOGLE_SERVICE_ACCOUNT") {
            self.conn
                .execute_batch(&format!(
                    "SET gcs_credentials_file = {};",
                    sql_literal(&service_account)
                ))
                .map_err(db_error("Failed to configure GCS"))?;
        }

        Ok(())
    }

    /// Where the tables were read from
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Row count of every table
    pub fn row_counts(&self) -> Result<Vec<TableCount>> {
        Table::ALL
            .iter()
            .map(|table| {
                let rows = self
                    .conn
                    .query_row(&format!("SELECT COUNT(*) FROM {}", table.name()), [], |row| {
                        row.get(0)
                    })
                    .map_err(db_error("Failed to count rows"))?;
                Ok(TableCount {
                    table: table.name().to_string(),
                    rows,
                })
            })
            .collect()
    }

    /// Number of matches per format
    pub fn matches_by_type(&self) -> Result<Vec<GroupCount>> {
        self.group_counts(
            "SELECT match_type, COUNT(*) AS matches
             FROM matches
             GROUP BY match_type
             ORDER BY matches DESC, match_type",
        )
    }

    /// Number of deliveries per format
    pub fn deliveries_by_type(&self) -> Result<Vec<GroupCount>> {
        self.group_counts(
            "SELECT m.match_type, COUNT(*) AS deliveries
             FROM deliveries d
             JOIN matches m ON d.match_id = m.match_id
             GROUP BY m.match_type
             ORDER BY deliveries DESC, m.match_type",
        )
    }

    /// Dismissals per wicket kind
    pub fn wicket_kinds(&self) -> Result<Vec<GroupCount>> {
        self.group_counts(
            "SELECT wicket_kind, COUNT(*) AS count
             FROM deliveries
             WHERE is_wicket
             GROUP BY wicket_kind
             ORDER BY count DESC, wicket_kind",
        )
    }

    /// The `limit` highest run scorers
    ///
    /// Wides do not count as balls faced.
    pub fn top_batters(&self, limit: usize) -> Result<Vec<BatterRuns>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT batter,
                        CAST(SUM(runs_batter) AS BIGINT) AS total_runs,
                        COUNT(CASE WHEN extras_wides = 0 THEN 1 END) AS balls_faced
                 FROM deliveries
                 WHERE extras_wides = 0 OR runs_batter > 0
                 GROUP BY batter
                 ORDER BY total_runs DESC, batter
                 LIMIT ?",
            )
            .map_err(db_error("Failed to prepare query"))?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(BatterRuns {
                    batter: row.get(0)?,
                    total_runs: row.get(1)?,
                    balls_faced: row.get(2)?,
                })
            })
            .map_err(db_error("Failed to query top batters"))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_error("Failed to read top batters"))
    }

    /// Run every validation query
    pub fn summary(&self, top: usize) -> Result<Summary> {
        Ok(Summary {
            row_counts: self.row_counts()?,
            matches_by_type: self.matches_by_type()?,
            deliveries_by_type: self.deliveries_by_type()?,
            top_batters: self.top_batters(top)?,
            wicket_kinds: self.wicket_kinds()?,
        })
    }

    fn group_counts(&self, sql: &str) -> Result<Vec<GroupCount>> {
        fn group_count(row: &Row<'_>) -> duckdb::Result<GroupCount> {
            Ok(GroupCount {
                key: row.get(0)?,
                count: row.get(1)?,
            })
        }

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(db_error("Failed to prepare query"))?;
        let rows = stmt
            .query_map([], group_count)
            .map_err(db_error("Failed to run query"))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_error("Failed to read query results"))
    }
}

fn is_remote(root: &str) -> bool {
    ["s3://", "r2://", "gs://", "gcs://", "az://", "https://"]
        .iter()
        .any(|scheme| root.starts_with(scheme))
}
