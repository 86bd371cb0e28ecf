//! # Validation Module
//!
//! Form-level validation rules for Vet Records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Forms (THIS MODULE)                                          │
//! │  ├── Required names and numbers                                        │
//! │  └── Operation-type specific fields (diagnosis, bull, vaccine)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories (vet-db)                                        │
//! │  └── No pre-validation, rows written as given                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key operations.animal_id → animals.id                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use vet_core::validation::{validate_name, validate_operation};
//! use vet_core::{Operation, OperationType};
//!
//! validate_name("name", "Пенициллин").unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let mut op = Operation::new(1, OperationType::Vaccination, date);
//! assert!(validate_operation(&op).is_err());
//! op.vaccine = Some("VaxA".to_string());
//! assert!(validate_operation(&op).is_ok());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{Operation, OperationType};
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a directory name or animal number.
///
/// ## Rules
/// - Must not be blank
/// - Must be at most [`MAX_NAME_LENGTH`] characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

// =============================================================================
// Operation Validators
// =============================================================================

/// Validates the fields an operation form requires for its type.
///
/// ## Rules
/// - Treatment needs a `diagnosis`
/// - Insemination needs a `bull`
/// - Vaccination needs a `vaccine`
pub fn validate_operation(operation: &Operation) -> ValidationResult<()> {
    let missing = match operation.kind {
        OperationType::Treatment if is_blank(&operation.diagnosis) => Some("diagnosis"),
        OperationType::Insemination if is_blank(&operation.bull) => Some("bull"),
        OperationType::Vaccination if is_blank(&operation.vaccine) => Some("vaccine"),
        _ => None,
    };

    match missing {
        Some(field) => Err(ValidationError::RequiredFor {
            field: field.to_string(),
            operation: operation.kind.label().to_string(),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Validates an inclusive export/calendar period.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvertedRange {
            start_field: "startDate".to_string(),
            end_field: "endDate".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Пенициллин").is_ok());
        assert_eq!(
            validate_name("name", "   "),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
        assert!(validate_name("name", &"я".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_name("name", &"я".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_treatment_requires_diagnosis() {
        let mut op = Operation::new(1, OperationType::Treatment, date(2024, 3, 1));
        let err = validate_operation(&op).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RequiredFor {
                field: "diagnosis".to_string(),
                operation: "Лечение".to_string(),
            }
        );

        op.diagnosis = Some("Мастит".to_string());
        assert!(validate_operation(&op).is_ok());
    }

    #[test]
    fn test_insemination_requires_bull() {
        let mut op = Operation::new(1, OperationType::Insemination, date(2024, 3, 1));
        op.bull = Some("  ".to_string());
        assert!(validate_operation(&op).is_err());

        op.bull = Some("Буян".to_string());
        assert!(validate_operation(&op).is_ok());
    }

    #[test]
    fn test_other_types_need_nothing_extra() {
        for kind in [
            OperationType::Examination,
            OperationType::PregnancyCheck,
            OperationType::Birth,
            OperationType::Surgery,
            OperationType::Other,
        ] {
            let op = Operation::new(1, kind, date(2024, 3, 1));
            assert!(validate_operation(&op).is_ok(), "{kind} should pass");
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("date", "2024-03-01").unwrap(), date(2024, 3, 1));
        assert!(parse_date("date", "01.03.2024").is_err());
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(date(2024, 3, 1), date(2024, 3, 1)).is_ok());
        assert!(validate_date_range(date(2024, 3, 2), date(2024, 3, 1)).is_err());
    }
}
