//! # Executor Repository
//!
//! Staff who perform operations. Operations point at executors through
//! `executor_id` without a foreign key, so deleting an executor leaves
//! historic operations untouched.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;
use vet_core::{now_timestamp, Executor, Record};

use super::count_rows;
use crate::error::DbResult;
use crate::gateway::{QueryGateway, SqlValue};

const SELECT_COLUMNS: &str = "id, name, position, contact, notes, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ExecutorRow {
    id: i64,
    name: String,
    position: Option<String>,
    contact: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ExecutorRow> for Executor {
    fn from(row: ExecutorRow) -> Self {
        Executor {
            id: Some(row.id),
            name: row.name,
            position: row.position,
            contact: row.contact,
            notes: row.notes,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn column_values(executor: &Executor) -> Vec<SqlValue> {
    vec![
        executor.name.as_str().into(),
        executor.position.as_deref().into(),
        executor.contact.as_deref().into(),
        executor.notes.as_deref().into(),
    ]
}

/// Repository for executor database operations.
#[derive(Debug, Clone)]
pub struct ExecutorRepository {
    gateway: QueryGateway,
}

impl ExecutorRepository {
    /// Creates a new ExecutorRepository.
    pub fn new(gateway: QueryGateway) -> Self {
        ExecutorRepository { gateway }
    }

    /// Inserts an executor and returns its assigned id.
    pub async fn add(&self, executor: &Executor) -> DbResult<i64> {
        debug!(name = %executor.name, "Inserting executor");

        let now = now_timestamp();
        let mut params = column_values(executor);
        params.push(now.into());
        params.push(now.into());

        let result = self
            .gateway
            .execute(
                "INSERT INTO executors (name, position, contact, notes, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &params,
            )
            .await?;

        Ok(result.insert_id().unwrap_or_default())
    }

    /// Rewrites every column of an existing executor.
    pub async fn update(&self, executor: &Executor) -> DbResult<()> {
        let id = executor.require_id()?;
        debug!(id = %id, "Updating executor");

        let mut params = column_values(executor);
        params.push(executor.next_updated_at().into());
        params.push(id.into());

        self.gateway
            .execute(
                "UPDATE executors SET name = ?1, position = ?2, contact = ?3, notes = ?4, \
                 updated_at = ?5 WHERE id = ?6",
                &params,
            )
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting executor");

        self.gateway
            .execute("DELETE FROM executors WHERE id = ?1", &[id.into()])
            .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Executor>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM executors WHERE id = ?1"),
                &[id.into()],
            )
            .await?;

        Ok(result.first::<ExecutorRow>()?.map(Executor::from))
    }

    /// All executors ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Executor>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM executors ORDER BY name ASC, id ASC"),
                &[],
            )
            .await?;

        let rows: Vec<ExecutorRow> = result.map_rows()?;
        Ok(rows.into_iter().map(Executor::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.gateway, "executors").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};
    use chrono::NaiveDate;
    use vet_core::{Animal, Gender, Operation, OperationType};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_crud() {
        let db = db().await;
        let repo = db.executors();

        let mut input = Executor::new("Иванов И.И.");
        input.position = Some("Ветврач".to_string());
        let id = repo.add(&input).await.unwrap();

        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.position.as_deref(), Some("Ветврач"));

        stored.contact = Some("+7 900 000-00-00".to_string());
        repo.update(&stored).await.unwrap();
        assert_eq!(
            repo.get_by_id(id).await.unwrap().unwrap().contact.as_deref(),
            Some("+7 900 000-00-00")
        );

        repo.delete(id).await.unwrap();
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_all_ordered_by_name() {
        let db = db().await;
        let repo = db.executors();
        for name in ["Сидоров", "Алексеев", "Петров"] {
            repo.add(&Executor::new(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Алексеев", "Петров", "Сидоров"]);
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let db = db().await;
        let err = db
            .executors()
            .update(&Executor::new("Без id"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingId { entity: "Executor" }));
    }

    #[tokio::test]
    async fn test_delete_keeps_operations_referencing_executor() {
        let db = db().await;
        let executor_id = db.executors().add(&Executor::new("Петров")).await.unwrap();
        let animal_id = db
            .animals()
            .add(&Animal::new("1", Gender::Female, "Корова"))
            .await
            .unwrap();

        let mut op = Operation::new(
            animal_id,
            OperationType::Examination,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        op.executor_id = Some(executor_id);
        let op_id = db.operations().add(&op).await.unwrap();

        db.executors().delete(executor_id).await.unwrap();

        let kept = db.operations().get_by_id(op_id).await.unwrap().unwrap();
        assert_eq!(kept.executor_id, Some(executor_id));
    }
}
