//! # Repository Module
//!
//! One repository per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Screen                                                                │
//! │       │  db.animals().search("A00")                                    │
//! │       ▼                                                                 │
//! │  AnimalRepository                                                      │
//! │  ├── add(&animal)          → id        stamps created_at = updated_at  │
//! │  ├── update(&animal)       → ()        fails fast without id           │
//! │  ├── delete(id)            → ()        no error when absent            │
//! │  ├── get_by_id(id)         → Option                                    │
//! │  └── get_all()             → Vec       ordered by display key          │
//! │       │                                                                 │
//! │       │  SQL + positional params          (snake_case columns)         │
//! │       ▼                                                                 │
//! │  QueryGateway ──► SQLite                                               │
//! │       │                                                                 │
//! │       ▼  rows decoded through private *Row structs                     │
//! │  Animal { birth_date, ... }               (camelCase on the wire)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Column names never leave this module: each repository owns a private
//! `FromRow` struct mirroring its table and converts it into the domain
//! type.
//!
//! Updates rewrite every column from the given record (no partial patch).
//! Repositories neither retry nor pre-validate; errors surface
//! unchanged from the gateway.

pub mod animal;
pub mod bull;
pub mod disease;
pub mod executor;
pub mod medicine;
pub mod operation;
pub mod vaccine;

pub use animal::AnimalRepository;
pub use bull::BullRepository;
pub use disease::DiseaseRepository;
pub use executor::ExecutorRepository;
pub use medicine::MedicineRepository;
pub use operation::OperationRepository;
pub use vaccine::VaccineRepository;

use crate::error::{DbError, DbResult};
use crate::gateway::QueryGateway;

/// Case-insensitive (Unicode) substring test used by free-text search.
///
/// SQLite's `LIKE` only folds ASCII, which would miss `"корова"` vs
/// `"Корова"`, so matching happens here instead.
pub(crate) fn contains_ignore_case(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack.is_some_and(|value| value.to_lowercase().contains(needle_lower))
}

/// Shared `SELECT COUNT(*)` for a table.
pub(crate) async fn count_rows(gateway: &QueryGateway, table: &str) -> DbResult<i64> {
    let result = gateway
        .execute(&format!("SELECT COUNT(*) AS total FROM {table}"), &[])
        .await?;

    let row = result
        .row(0)
        .ok_or_else(|| DbError::Internal(format!("COUNT on {table} returned no row")))?;
    Ok(sqlx::Row::try_get(row, "total")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case(Some("A0017"), "a00"));
        assert!(contains_ignore_case(Some("Бурёнка"), "бур"));
        assert!(!contains_ignore_case(None, "a"));
        assert!(contains_ignore_case(Some("x"), ""));
    }
}
