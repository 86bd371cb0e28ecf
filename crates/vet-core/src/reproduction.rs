//! # Reproductive Bookkeeping
//!
//! Derives the animal-card changes implied by a newly logged operation.
//!
//! ```text
//! Insemination (female) ──► last_insemination_date = date
//!                           insemination_count     += 1   (absent ⇒ 1)
//!
//! Birth (female)        ──► last_delivery_date     = date
//!                           lactation_number       += 1   (absent ⇒ 1)
//! ```
//!
//! The caller persists the result as a separate update; there is no
//! atomicity between the operation insert and the animal update.

use crate::types::{Animal, Operation, OperationType};

/// Returns the updated animal card, or `None` when the operation does not
/// touch it (male animal, or any other operation type).
pub fn apply_operation(animal: &Animal, operation: &Operation) -> Option<Animal> {
    if !animal.is_female() {
        return None;
    }

    let mut updated = animal.clone();
    match operation.kind {
        OperationType::Insemination => {
            updated.last_insemination_date = Some(operation.date);
            updated.insemination_count = Some(animal.insemination_count.map_or(1, |n| n + 1));
        }
        OperationType::Birth => {
            updated.last_delivery_date = Some(operation.date);
            updated.lactation_number = Some(animal.lactation_number.map_or(1, |n| n + 1));
        }
        _ => return None,
    }

    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_insemination_starts_count() {
        let cow = Animal::new("01217", Gender::Female, "Корова");
        let op = Operation::new(1, OperationType::Insemination, date(2024, 3, 1));

        let updated = apply_operation(&cow, &op).unwrap();
        assert_eq!(updated.insemination_count, Some(1));
        assert_eq!(updated.last_insemination_date, Some(date(2024, 3, 1)));
        assert_eq!(updated.lactation_number, None);
    }

    #[test]
    fn test_birth_increments_lactation() {
        let mut cow = Animal::new("01217", Gender::Female, "Корова");
        cow.lactation_number = Some(2);
        let op = Operation::new(1, OperationType::Birth, date(2024, 6, 12));

        let updated = apply_operation(&cow, &op).unwrap();
        assert_eq!(updated.lactation_number, Some(3));
        assert_eq!(updated.last_delivery_date, Some(date(2024, 6, 12)));
    }

    #[test]
    fn test_male_and_unrelated_operations_are_ignored() {
        let bull = Animal::new("B-7", Gender::Male, "Бык");
        let op = Operation::new(1, OperationType::Insemination, date(2024, 3, 1));
        assert!(apply_operation(&bull, &op).is_none());

        let cow = Animal::new("01217", Gender::Female, "Корова");
        let op = Operation::new(1, OperationType::Examination, date(2024, 3, 1));
        assert!(apply_operation(&cow, &op).is_none());
    }
}
