//! # Operation Logging Workflow
//!
//! What the operation form does on save.
//!
//! ```text
//! record_operation(op)
//!     │
//!     ├──► validate_operation(op)         form rules, nothing written on error
//!     ├──► operations().add(op)           statement 1
//!     ├──► animals().get_by_id(animal)
//!     └──► apply_operation(animal, op)
//!              └─ Some(card) ──► animals().update(card)   statement 2
//! ```
//!
//! The two writes are independent. If the animal update fails the
//! operation stays recorded and the error is returned.

use tracing::{debug, info};
use vet_core::reproduction::apply_operation;
use vet_core::validation::validate_operation;
use vet_core::Operation;

use crate::error::DbResult;
use crate::pool::Database;

impl Database {
    /// Validates and stores an operation, then updates the reproductive
    /// fields of its animal when the operation implies a change.
    ///
    /// ## Returns
    /// * `Ok(id)` - Id of the new operation
    /// * `Err(DbError::Validation)` - A field required by the operation type is missing
    /// * `Err(DbError::ForeignKeyViolation)` - The animal does not exist
    pub async fn record_operation(&self, operation: &Operation) -> DbResult<i64> {
        validate_operation(operation)?;

        let id = self.operations().add(operation).await?;
        info!(
            id = %id,
            animal_id = %operation.animal_id,
            kind = %operation.kind,
            "Operation recorded"
        );

        let animals = self.animals();
        let Some(animal) = animals.get_by_id(operation.animal_id).await? else {
            return Ok(id);
        };

        if let Some(updated) = apply_operation(&animal, operation) {
            debug!(animal_id = %operation.animal_id, "Updating reproductive fields");
            animals.update(&updated).await?;
        }

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DbConfig, DbError};
    use chrono::NaiveDate;
    use vet_core::{Animal, Gender, OperationType, ValidationError};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn db_with(animal: Animal) -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let id = db.animals().add(&animal).await.unwrap();
        (db, id)
    }

    #[tokio::test]
    async fn test_insemination_updates_female_card() {
        let (db, animal_id) = db_with(Animal::new("01217", Gender::Female, "Корова")).await;

        let mut op = Operation::new(animal_id, OperationType::Insemination, date("2024-03-10"));
        op.bull = Some("Буян".to_string());
        db.record_operation(&op).await.unwrap();
        op.date = date("2024-04-02");
        db.record_operation(&op).await.unwrap();

        let cow = db.animals().get_by_id(animal_id).await.unwrap().unwrap();
        assert_eq!(cow.insemination_count, Some(2));
        assert_eq!(cow.last_insemination_date, Some(date("2024-04-02")));
        assert_eq!(db.operations().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_birth_increments_lactation() {
        let mut cow = Animal::new("01217", Gender::Female, "Корова");
        cow.lactation_number = Some(2);
        let (db, animal_id) = db_with(cow).await;

        db.record_operation(&Operation::new(animal_id, OperationType::Birth, date("2024-05-01")))
            .await
            .unwrap();

        let cow = db.animals().get_by_id(animal_id).await.unwrap().unwrap();
        assert_eq!(cow.lactation_number, Some(3));
        assert_eq!(cow.last_delivery_date, Some(date("2024-05-01")));
    }

    #[tokio::test]
    async fn test_male_card_unchanged() {
        let (db, animal_id) = db_with(Animal::new("B-7", Gender::Male, "Бык")).await;
        let before = db.animals().get_by_id(animal_id).await.unwrap().unwrap();

        let mut op = Operation::new(animal_id, OperationType::Insemination, date("2024-03-10"));
        op.bull = Some("Буян".to_string());
        db.record_operation(&op).await.unwrap();

        let after = db.animals().get_by_id(animal_id).await.unwrap().unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_invalid_form_writes_nothing() {
        let (db, animal_id) = db_with(Animal::new("01217", Gender::Female, "Корова")).await;

        let err = db
            .record_operation(&Operation::new(
                animal_id,
                OperationType::Treatment,
                date("2024-03-10"),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::RequiredFor { ref field, .. }) if field == "diagnosis"
        ));
        assert_eq!(db.operations().count().await.unwrap(), 0);
    }
}
