//! # Schema Initializer
//!
//! Creates the seven tables on first run.
//!
//! ## Startup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Initialization                              │
//! │                                                                         │
//! │  App Start                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  schema::initialize(pool)                                              │
//! │       │                                                                 │
//! │       ├──► CREATE TABLE IF NOT EXISTS animals                          │
//! │       ├──► CREATE TABLE IF NOT EXISTS operations  (FK → animals,       │
//! │       │                                            ON DELETE CASCADE)  │
//! │       ├──► executors, diseases, bulls, vaccines, medicines             │
//! │       └──► indexes on operations(animal_id), operations(date)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repositories ready                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Limitations
//! There is no schema versioning. A table that already exists is left as
//! is, so a column added here never reaches an installed database; schema
//! changes need a fresh database file.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Tables owned by the application, in creation order.
pub const TABLES: [&str; 7] = [
    "animals",
    "operations",
    "executors",
    "diseases",
    "bulls",
    "vaccines",
    "medicines",
];

const CREATE_STATEMENTS: [&str; 9] = [
    r#"
    CREATE TABLE IF NOT EXISTS animals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        number TEXT NOT NULL,
        responder TEXT,
        group_name TEXT,
        birth_date TEXT,
        gender TEXT NOT NULL,
        type TEXT NOT NULL,
        last_delivery_date TEXT,
        next_delivery_date TEXT,
        last_insemination_date TEXT,
        lactation_number INTEGER,
        insemination_count INTEGER,
        average_milk REAL,
        milk_by_lactation REAL,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS operations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        animal_id INTEGER NOT NULL,
        type TEXT NOT NULL,
        date TEXT NOT NULL,
        diagnosis TEXT,
        medicine TEXT,
        dose TEXT,
        bull TEXT,
        vaccine TEXT,
        executor_id INTEGER,
        result TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (animal_id) REFERENCES animals (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS executors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        position TEXT,
        contact TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS diseases (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        symptoms TEXT,
        treatment TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bulls (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        number TEXT,
        breed TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vaccines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        manufacturer TEXT,
        dosage TEXT,
        instructions TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS medicines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        active_ingredient TEXT,
        manufacturer TEXT,
        dosage TEXT,
        instructions TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_operations_animal_id ON operations (animal_id)",
    "CREATE INDEX IF NOT EXISTS idx_operations_date ON operations (date)",
];

/// Creates all tables and indexes that do not exist yet.
///
/// ## Safety
/// - Idempotent: safe to run on every start
/// - Existing tables and rows are never touched
pub async fn initialize(pool: &SqlitePool) -> DbResult<()> {
    info!("Ensuring database schema");

    for statement in CREATE_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DbError::SchemaFailed(e.to_string()))?;
    }

    debug!(tables = TABLES.len(), "Schema ready");
    Ok(())
}

/// Returns which application tables exist, in [`TABLES`] order.
///
/// ## Usage
/// For diagnostics and health checks.
pub async fn existing_tables(pool: &SqlitePool) -> DbResult<Vec<String>> {
    let names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(pool)
            .await?;

    Ok(TABLES
        .iter()
        .filter(|table| names.iter().any(|name| name == *table))
        .map(|table| table.to_string())
        .collect())
}
