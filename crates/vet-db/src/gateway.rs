//! # Query Execution Gateway
//!
//! One awaitable call per SQL statement, shared by every repository.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    gateway.execute(sql, params)                         │
//! │                                                                         │
//! │  sql     "INSERT INTO bulls (name, ...) VALUES (?1, ...)"              │
//! │  params  [Text("Буян"), Null, ...]  ← positional, count not checked    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  acquire one pooled connection                                         │
//! │       │                                                                 │
//! │       ├──► run statement, collect rows                                 │
//! │       ├──► writes: SELECT changes()                                    │
//! │       └──► inserts: SELECT last_insert_rowid()                         │
//! │       │   (same connection, so the values belong to this statement)    │
//! │       ▼                                                                 │
//! │  ResultSet { rows, insert_id, rows_affected }                          │
//! │                                                                         │
//! │  Errors: propagated as DbError, no retry, no rollback of its own.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no cache: every read goes to SQLite and sees the latest write.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};
use tracing::debug;
use vet_core::{Gender, OperationType};

use crate::error::DbResult;

// =============================================================================
// Parameter Values
// =============================================================================

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

/// Calendar dates are stored as `YYYY-MM-DD` so text order is date order.
impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Text(value.format("%Y-%m-%d").to_string())
    }
}

/// Timestamps are stored as ISO-8601 with milliseconds and a `Z` suffix.
impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Text(value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<Gender> for SqlValue {
    fn from(value: Gender) -> Self {
        SqlValue::Text(value.as_str().to_string())
    }
}

impl From<OperationType> for SqlValue {
    fn from(value: OperationType) -> Self {
        SqlValue::Text(value.label().to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

// =============================================================================
// Result Set
// =============================================================================

/// Outcome of one statement.
#[derive(Default)]
pub struct ResultSet {
    rows: Vec<SqliteRow>,
    insert_id: Option<i64>,
    rows_affected: u64,
}

// SqliteRow has no Debug impl
impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("rows", &self.rows.len())
            .field("insert_id", &self.insert_id)
            .field("rows_affected", &self.rows_affected)
            .finish()
    }
}

impl ResultSet {
    /// Number of rows returned.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Indexed row access.
    pub fn row(&self, index: usize) -> Option<&SqliteRow> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SqliteRow] {
        &self.rows
    }

    /// Identity assigned by an INSERT, `None` for every other statement.
    pub fn insert_id(&self) -> Option<i64> {
        self.insert_id
    }

    /// Rows changed by an INSERT/UPDATE/DELETE, zero for reads.
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Decodes every row into `T`.
    pub fn map_rows<T>(&self) -> DbResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow>,
    {
        self.rows
            .iter()
            .map(|row| T::from_row(row).map_err(Into::into))
            .collect()
    }

    /// Decodes the first row into `T`, if any.
    pub fn first<T>(&self) -> DbResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow>,
    {
        self.rows
            .first()
            .map(|row| T::from_row(row))
            .transpose()
            .map_err(Into::into)
    }
}

// =============================================================================
// Statement Classification
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    Insert,
    Write,
    Other,
}

impl StatementKind {
    fn of(sql: &str) -> Self {
        let keyword = sql
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        match keyword.as_str() {
            "INSERT" | "REPLACE" => StatementKind::Insert,
            "UPDATE" | "DELETE" => StatementKind::Write,
            _ => StatementKind::Other,
        }
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &SqlValue,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Integer(v) => query.bind(*v),
        SqlValue::Real(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
    }
}

// =============================================================================
// Gateway
// =============================================================================

/// Statement executor over the shared connection pool.
#[derive(Debug, Clone)]
pub struct QueryGateway {
    pool: SqlitePool,
}

impl QueryGateway {
    pub fn new(pool: SqlitePool) -> Self {
        QueryGateway { pool }
    }

    /// Executes one parameterized statement.
    ///
    /// ## Arguments
    /// * `sql` - Statement with positional placeholders (`?` or `?N`)
    /// * `params` - Values in placeholder order
    ///
    /// ## Returns
    /// * `Ok(ResultSet)` - Rows, plus insert id / affected count for writes
    /// * `Err(DbError)` - Engine error, unchanged apart from categorisation
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<ResultSet> {
        let kind = StatementKind::of(sql);
        debug!(?kind, params = params.len(), "Executing statement");

        let mut conn = self.pool.acquire().await?;

        let query = params
            .iter()
            .fold(sqlx::query(sql), |query, value| bind_value(query, value));
        let rows = query.fetch_all(&mut *conn).await?;

        let mut result = ResultSet {
            rows,
            ..ResultSet::default()
        };

        if matches!(kind, StatementKind::Insert | StatementKind::Write) {
            let changes: i64 = sqlx::query_scalar("SELECT changes()")
                .fetch_one(&mut *conn)
                .await?;
            result.rows_affected = changes.max(0) as u64;
        }

        if kind == StatementKind::Insert {
            let id: i64 = sqlx::query_scalar("SELECT last_insert_rowid()")
                .fetch_one(&mut *conn)
                .await?;
            result.insert_id = Some(id);
        }

        Ok(result)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
