//! # Operation Repository
//!
//! Medical and reproductive events logged against animals.
//!
//! Dates are stored as `YYYY-MM-DD` text, so `BETWEEN` on the `date`
//! column is an inclusive calendar range and text order is date order.
//! Listings are newest first; rows sharing a date keep insertion order
//! reversed (`id DESC`).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use tracing::debug;
use vet_core::{now_timestamp, Operation, OperationType, Record};

use super::count_rows;
use crate::error::DbResult;
use crate::gateway::{QueryGateway, SqlValue};

const SELECT_COLUMNS: &str = "id, animal_id, type, date, diagnosis, medicine, dose, bull, \
    vaccine, executor_id, result, notes, created_at, updated_at";

const NEWEST_FIRST: &str = "ORDER BY date DESC, id DESC";

#[derive(Debug, FromRow)]
struct OperationRow {
    id: i64,
    animal_id: i64,
    #[sqlx(rename = "type")]
    kind: OperationType,
    date: NaiveDate,
    diagnosis: Option<String>,
    medicine: Option<String>,
    dose: Option<String>,
    bull: Option<String>,
    vaccine: Option<String>,
    executor_id: Option<i64>,
    result: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OperationRow> for Operation {
    fn from(row: OperationRow) -> Self {
        Operation {
            id: Some(row.id),
            animal_id: row.animal_id,
            kind: row.kind,
            date: row.date,
            diagnosis: row.diagnosis,
            medicine: row.medicine,
            dose: row.dose,
            bull: row.bull,
            vaccine: row.vaccine,
            executor_id: row.executor_id,
            result: row.result,
            notes: row.notes,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn column_values(operation: &Operation) -> Vec<SqlValue> {
    vec![
        operation.animal_id.into(),
        operation.kind.into(),
        operation.date.into(),
        operation.diagnosis.as_deref().into(),
        operation.medicine.as_deref().into(),
        operation.dose.as_deref().into(),
        operation.bull.as_deref().into(),
        operation.vaccine.as_deref().into(),
        operation.executor_id.into(),
        operation.result.as_deref().into(),
        operation.notes.as_deref().into(),
    ]
}

fn into_operations(rows: Vec<OperationRow>) -> Vec<Operation> {
    rows.into_iter().map(Operation::from).collect()
}

/// Repository for operation database operations.
///
/// Inserting an operation for an unknown `animal_id` fails with
/// [`DbError::ForeignKeyViolation`](crate::DbError::ForeignKeyViolation).
/// `executor_id` is a soft reference and is not checked.
#[derive(Debug, Clone)]
pub struct OperationRepository {
    gateway: QueryGateway,
}

impl OperationRepository {
    /// Creates a new OperationRepository.
    pub fn new(gateway: QueryGateway) -> Self {
        OperationRepository { gateway }
    }

    /// Inserts an operation and returns its assigned id.
    ///
    /// Stores the record as given. Form rules and reproduction counters are
    /// applied by [`Database::record_operation`](crate::Database::record_operation).
    pub async fn add(&self, operation: &Operation) -> DbResult<i64> {
        debug!(
            animal_id = %operation.animal_id,
            kind = %operation.kind,
            date = %operation.date,
            "Inserting operation"
        );

        let now = now_timestamp();
        let mut params = column_values(operation);
        params.push(now.into());
        params.push(now.into());

        let result = self
            .gateway
            .execute(
                r#"
                INSERT INTO operations (
                    animal_id, type, date, diagnosis, medicine, dose, bull,
                    vaccine, executor_id, result, notes, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                &params,
            )
            .await?;

        Ok(result.insert_id().unwrap_or_default())
    }

    /// Rewrites every column of an existing operation.
    pub async fn update(&self, operation: &Operation) -> DbResult<()> {
        let id = operation.require_id()?;
        debug!(id = %id, "Updating operation");

        let mut params = column_values(operation);
        params.push(operation.next_updated_at().into());
        params.push(id.into());

        self.gateway
            .execute(
                r#"
                UPDATE operations SET
                    animal_id = ?1,
                    type = ?2,
                    date = ?3,
                    diagnosis = ?4,
                    medicine = ?5,
                    dose = ?6,
                    bull = ?7,
                    vaccine = ?8,
                    executor_id = ?9,
                    result = ?10,
                    notes = ?11,
                    updated_at = ?12
                WHERE id = ?13
                "#,
                &params,
            )
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting operation");

        self.gateway
            .execute("DELETE FROM operations WHERE id = ?1", &[id.into()])
            .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Operation>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM operations WHERE id = ?1"),
                &[id.into()],
            )
            .await?;

        Ok(result.first::<OperationRow>()?.map(Operation::from))
    }

    /// Every operation, newest first.
    pub async fn get_all(&self) -> DbResult<Vec<Operation>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM operations {NEWEST_FIRST}"),
                &[],
            )
            .await?;

        Ok(into_operations(result.map_rows()?))
    }

    /// History of one animal, newest first.
    pub async fn get_by_animal_id(&self, animal_id: i64) -> DbResult<Vec<Operation>> {
        let result = self
            .gateway
            .execute(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM operations WHERE animal_id = ?1 {NEWEST_FIRST}"
                ),
                &[animal_id.into()],
            )
            .await?;

        Ok(into_operations(result.map_rows()?))
    }

    /// Operations dated within `start..=end`, newest first.
    ///
    /// An inverted range (`start > end`) matches nothing.
    pub async fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<Operation>> {
        debug!(%start, %end, "Loading operations by date range");

        let result = self
            .gateway
            .execute(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM operations WHERE date BETWEEN ?1 AND ?2 {NEWEST_FIRST}"
                ),
                &[start.into(), end.into()],
            )
            .await?;

        Ok(into_operations(result.map_rows()?))
    }

    /// Operations of one type dated within `start..=end`, newest first.
    pub async fn get_by_type_and_date_range(
        &self,
        kind: OperationType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<Operation>> {
        debug!(%kind, %start, %end, "Loading operations by type and date range");

        let result = self
            .gateway
            .execute(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM operations \
                     WHERE type = ?1 AND date BETWEEN ?2 AND ?3 {NEWEST_FIRST}"
                ),
                &[kind.into(), start.into(), end.into()],
            )
            .await?;

        Ok(into_operations(result.map_rows()?))
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.gateway, "operations").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use vet_core::{Animal, Gender};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let animal_id = db
            .animals()
            .add(&Animal::new("01217", Gender::Female, "Корова"))
            .await
            .unwrap();
        (db, animal_id)
    }

    #[tokio::test]
    async fn test_add_and_get_by_id() {
        let (db, animal_id) = setup().await;
        let repo = db.operations();

        let mut input = Operation::new(animal_id, OperationType::Treatment, date("2024-03-01"));
        input.diagnosis = Some("Мастит".to_string());
        input.dose = Some("10 мл".to_string());

        let id = repo.add(&input).await.unwrap();
        let stored = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(stored.kind, OperationType::Treatment);
        assert_eq!(stored.date, date("2024-03-01"));
        assert_eq!(stored.diagnosis.as_deref(), Some("Мастит"));
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn test_unknown_animal_is_rejected() {
        let (db, _) = setup().await;

        let err = db
            .operations()
            .add(&Operation::new(999, OperationType::Examination, date("2024-03-01")))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_get_by_animal_id_newest_first() {
        let (db, animal_id) = setup().await;
        let other_id = db
            .animals()
            .add(&Animal::new("02000", Gender::Female, "Корова"))
            .await
            .unwrap();
        let repo = db.operations();

        for day in ["2024-01-10", "2024-03-05", "2024-02-01"] {
            repo.add(&Operation::new(animal_id, OperationType::Examination, date(day)))
                .await
                .unwrap();
        }
        repo.add(&Operation::new(other_id, OperationType::Examination, date("2024-05-01")))
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = repo
            .get_by_animal_id(animal_id)
            .await
            .unwrap()
            .into_iter()
            .map(|op| op.date)
            .collect();
        assert_eq!(
            dates,
            vec![date("2024-03-05"), date("2024-02-01"), date("2024-01-10")]
        );
        assert_eq!(repo.count().await.unwrap(), 4);
        assert_eq!(repo.get_all().await.unwrap()[0].animal_id, other_id);
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let (db, animal_id) = setup().await;
        let repo = db.operations();

        for day in ["2024-02-29", "2024-03-01", "2024-03-15", "2024-03-31", "2024-04-01"] {
            repo.add(&Operation::new(animal_id, OperationType::Examination, date(day)))
                .await
                .unwrap();
        }

        let dates: Vec<NaiveDate> = repo
            .get_by_date_range(date("2024-03-01"), date("2024-03-31"))
            .await
            .unwrap()
            .into_iter()
            .map(|op| op.date)
            .collect();
        assert_eq!(
            dates,
            vec![date("2024-03-31"), date("2024-03-15"), date("2024-03-01")]
        );

        let inverted = repo
            .get_by_date_range(date("2024-03-31"), date("2024-03-01"))
            .await
            .unwrap();
        assert!(inverted.is_empty());
    }

    #[tokio::test]
    async fn test_type_and_date_range() {
        let (db, animal_id) = setup().await;
        let repo = db.operations();

        let mut insemination =
            Operation::new(animal_id, OperationType::Insemination, date("2024-03-10"));
        insemination.bull = Some("Буян".to_string());
        repo.add(&insemination).await.unwrap();
        repo.add(&Operation::new(animal_id, OperationType::Examination, date("2024-03-11")))
            .await
            .unwrap();

        let found = repo
            .get_by_type_and_date_range(
                OperationType::Insemination,
                date("2024-03-01"),
                date("2024-03-31"),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].bull.as_deref(), Some("Буян"));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (db, animal_id) = setup().await;
        let repo = db.operations();

        let id = repo
            .add(&Operation::new(animal_id, OperationType::Examination, date("2024-03-01")))
            .await
            .unwrap();
        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        stored.result = Some("Здорова".to_string());
        repo.update(&stored).await.unwrap();

        assert_eq!(
            repo.get_by_id(id).await.unwrap().unwrap().result.as_deref(),
            Some("Здорова")
        );

        let err = repo
            .update(&Operation::new(animal_id, OperationType::Examination, date("2024-03-01")))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingId { entity: "Operation" }));

        repo.delete(id).await.unwrap();
        assert!(repo.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_animal_cascades() {
        let (db, animal_id) = setup().await;
        let repo = db.operations();
        repo.add(&Operation::new(animal_id, OperationType::Examination, date("2024-03-01")))
            .await
            .unwrap();

        db.animals().delete(animal_id).await.unwrap();

        assert!(repo.get_by_animal_id(animal_id).await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
