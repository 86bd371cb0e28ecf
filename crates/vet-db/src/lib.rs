//! # vet-db: Database Layer for Vet Records
//!
//! This crate provides on-device storage for Vet Records.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vet Records Data Flow                            │
//! │                                                                         │
//! │  Screen (animal list, operation form, export)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vet-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │  (7 tables)   │    │ (schema.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ AnimalRepo    │    │ CREATE TABLE │  │   │
//! │  │   │ QueryGateway  │◄───│ OperationRepo │    │ IF NOT EXISTS│  │   │
//! │  │   │               │    │ ...           │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   workflow.rs: record_operation     export.rs: CSV             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   vet_assistant.db (or VET_DB_PATH)                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Database handle and configuration
//! - [`gateway`] - Single entry point for SQL statements
//! - [`schema`] - Idempotent table creation
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//! - [`workflow`] - Operation form save (operation + animal card)
//! - [`export`] - CSV export of animals and operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vet_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env("vet_assistant.db")).await?;
//!
//! let cows = db.animals().search("012").await?;
//! let history = db.operations().get_by_animal_id(cows[0].id.unwrap()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod export;
pub mod gateway;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use export::OperationExportRow;
pub use gateway::{QueryGateway, ResultSet, SqlValue};
pub use pool::{Database, DbConfig, DB_PATH_ENV};

// Repository re-exports for convenience
pub use repository::{
    AnimalRepository, BullRepository, DiseaseRepository, ExecutorRepository, MedicineRepository,
    OperationRepository, VaccineRepository,
};
