//! SQLite access.
//!
//! Every operation opens its own connection from the shared
//! [`SqliteConnectOptions`]; SQLite serialises concurrent writers. Read-only
//! queries run on a connection opened with `read_only(true)`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Row, TypeInfo, ValueRef};
use thiserror::Error;
use tracing::{debug, info, warn};

use helios_ai::retrieval::Document;

use crate::schema::{BUSINESS_TABLES, DEMO_SEED, ORCHESTRATION_TABLES};

/// Tables counted in system info.
pub const KEY_TABLES: &[&str] = &["customers", "orders", "products", "invoices", "leads", "stock"];

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Table name plus its column names, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

/// Snapshot returned by the `system` command and `GET /api/system`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub database: String,
    pub tables: Vec<String>,
    pub record_counts: BTreeMap<String, i64>,
    pub agents: Vec<String>,
}

/// True when `sql` has a `;` outside string literals and quoted identifiers.
fn has_unquoted_semicolon(sql: &str) -> bool {
    let mut quote: Option<char> = None;
    for c in sql.chars() {
        match (quote, c) {
            (None, ';') => return true,
            (None, '\'' | '"' | '`') => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            _ => {}
        }
    }
    false
}

/// Check that `sql` is a single `SELECT`/`WITH` statement.
///
/// A trailing semicolon is allowed; any other `;` outside quotes counts as a
/// second statement.
pub fn ensure_read_only(sql: &str) -> Result<&str, DbError> {
    let statement = sql.trim().trim_end_matches(';').trim_end();
    if statement.is_empty() {
        return Err(DbError::Rejected("empty query".to_string()));
    }
    if has_unquoted_semicolon(statement) {
        return Err(DbError::Rejected(
            "multiple statements are not allowed".to_string(),
        ));
    }

    let first = statement
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
        .to_uppercase();
    if first != "SELECT" && first != "WITH" {
        return Err(DbError::Rejected(
            "only SELECT or WITH queries are allowed".to_string(),
        ));
    }

    Ok(statement)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn cell_to_json(row: &SqliteRow, index: usize) -> Result<JsonValue, DbError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(JsonValue::Null);
    }

    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => JsonValue::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" | "NUMERIC" => JsonValue::from(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            JsonValue::from(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => JsonValue::from(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

/// One JSON object per row, keyed by column name.
pub fn row_to_json(row: &SqliteRow) -> Result<JsonValue, DbError> {
    let mut object = JsonMap::new();
    for (index, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), cell_to_json(row, index)?);
    }
    Ok(JsonValue::Object(object))
}

/// Handle to the ERP database file.
#[derive(Debug, Clone)]
pub struct Database {
    options: SqliteConnectOptions,
    path: PathBuf,
}

impl Database {
    /// Point at `path`; the file is created on first connection if missing.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .foreign_keys(true);
        Self { options, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn connect(&self) -> Result<SqliteConnection, DbError> {
        Ok(self.options.connect().await?)
    }

    pub async fn connect_read_only(&self) -> Result<SqliteConnection, DbError> {
        let options = self.options.clone().create_if_missing(false).read_only(true);
        Ok(options.connect().await?)
    }

    async fn run_all(&self, statements: &[&str]) -> Result<(), DbError> {
        let mut conn = self.connect().await?;
        for statement in statements {
            sqlx::query(statement).execute(&mut conn).await?;
        }
        conn.close().await?;
        Ok(())
    }

    /// Create the `conversations`, `tool_calls` and `approvals` tables.
    pub async fn bootstrap(&self) -> Result<(), DbError> {
        self.run_all(ORCHESTRATION_TABLES).await?;
        debug!(path = %self.path.display(), "orchestration tables ready");
        Ok(())
    }

    /// Create every business table and the orchestration tables.
    pub async fn setup_schema(&self) -> Result<(), DbError> {
        self.run_all(BUSINESS_TABLES).await?;
        self.bootstrap().await
    }

    /// Insert demo rows into each empty business table. Returns the tables seeded.
    pub async fn seed_demo(&self) -> Result<Vec<String>, DbError> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;
        let mut seeded = Vec::new();

        for (table, insert) in DEMO_SEED {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(1) FROM {}", quote_ident(table)))
                .fetch_one(&mut *tx)
                .await?;
            if count == 0 {
                sqlx::query(insert).execute(&mut *tx).await?;
                seeded.push(table.to_string());
            }
        }

        tx.commit().await?;
        info!(path = %self.path.display(), seeded = ?seeded, "demo data seeded");
        Ok(seeded)
    }

    pub async fn table_names(&self) -> Result<Vec<String>, DbError> {
        let mut conn = self.connect().await?;
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&mut conn)
        .await?;
        Ok(names)
    }

    /// Row count of `table`, or 0 when the table does not exist.
    pub async fn count_rows(&self, table: &str) -> Result<i64, DbError> {
        let tables = self.table_names().await?;
        if !tables.iter().any(|t| t == table) {
            return Ok(0);
        }

        let mut conn = self.connect().await?;
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(1) FROM {}", quote_ident(table)))
            .fetch_one(&mut conn)
            .await?;
        Ok(count)
    }

    pub async fn schema(&self) -> Result<Vec<TableSchema>, DbError> {
        let tables = self.table_names().await?;
        let mut conn = self.connect().await?;
        let mut out = Vec::with_capacity(tables.len());

        for name in tables {
            let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_ident(&name)))
                .fetch_all(&mut conn)
                .await?;
            let columns = rows
                .iter()
                .map(|r| r.try_get::<String, _>("name"))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(TableSchema { name, columns });
        }

        Ok(out)
    }

    /// Table names and key-table row counts. `agents` is left for the caller.
    pub async fn system_info(&self) -> Result<SystemInfo, DbError> {
        let tables = self.table_names().await?;
        let mut record_counts = BTreeMap::new();
        for table in KEY_TABLES {
            record_counts.insert(table.to_string(), self.count_rows(table).await?);
        }

        Ok(SystemInfo {
            database: self.path.display().to_string(),
            tables,
            record_counts,
            agents: Vec::new(),
        })
    }

    /// Run a guarded read-only query and return its rows as JSON objects.
    pub async fn query_json(&self, sql: &str) -> Result<Vec<JsonValue>, DbError> {
        let statement = ensure_read_only(sql)?;
        let mut conn = self.connect_read_only().await?;
        let rows = sqlx::query(statement).fetch_all(&mut conn).await?;
        rows.iter().map(row_to_json).collect()
    }

    /// Run arbitrary SQL in one transaction; rolled back on any error.
    pub async fn execute_write(&self, sql: &str) -> Result<u64, DbError> {
        if sql.trim().is_empty() {
            return Err(DbError::Rejected("empty statement".to_string()));
        }

        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;
        match sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(sql)).await {
            Ok(result) => {
                tx.commit().await?;
                Ok(result.rows_affected())
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(err.into())
            }
        }
    }

    /// Quantities from `stock_movements` for one product, oldest first.
    pub async fn stock_history(&self, product_id: &str) -> Result<Vec<f64>, DbError> {
        let mut conn = self.connect_read_only().await?;
        let quantities: Vec<f64> = sqlx::query_scalar(
            "SELECT CAST(quantity AS REAL) FROM stock_movements WHERE product_id = ? ORDER BY date, id",
        )
        .bind(product_id)
        .fetch_all(&mut conn)
        .await?;
        Ok(quantities)
    }

    /// Documents whose category is one of `categories`.
    pub async fn documents_in(&self, categories: &[&str]) -> Result<Vec<Document>, DbError> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; categories.len()].join(", ");
        let sql = format!(
            "SELECT doc_id, title, body, category FROM documents WHERE category IN ({placeholders}) ORDER BY doc_id"
        );

        let mut conn = self.connect_read_only().await?;
        let mut query = sqlx::query(&sql);
        for category in categories {
            query = query.bind(*category);
        }
        let rows = query.fetch_all(&mut conn).await?;
        rows.iter()
            .map(|r| -> Result<Document, DbError> {
                Ok(Document {
                    doc_id: r.try_get("doc_id")?,
                    title: r.try_get("title")?,
                    body: r.try_get("body")?,
                    category: r.try_get("category")?,
                })
            })
            .collect()
    }

    pub async fn monthly_sales(&self) -> Result<Vec<MonthlyTotal>, DbError> {
        let mut conn = self.connect_read_only().await?;
        let rows = sqlx::query(
            "SELECT strftime('%Y-%m', created_at) AS month, CAST(SUM(total) AS REAL) AS total
             FROM orders GROUP BY month ORDER BY month",
        )
        .fetch_all(&mut conn)
        .await?;

        rows.iter()
            .map(|r| -> Result<MonthlyTotal, DbError> {
                Ok(MonthlyTotal {
                    month: r.try_get::<Option<String>, _>("month")?.unwrap_or_default(),
                    total: r.try_get::<Option<f64>, _>("total")?.unwrap_or(0.0),
                })
            })
            .collect()
    }
}
