//! # Bull Repository
//!
//! Sires used for insemination. Insemination operations record the bull by
//! name, so the directory mainly feeds the operation form and its search.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;
use vet_core::{now_timestamp, Bull, Record};

use super::{contains_ignore_case, count_rows};
use crate::error::DbResult;
use crate::gateway::{QueryGateway, SqlValue};

const SELECT_COLUMNS: &str = "id, name, number, breed, notes, created_at, updated_at";

#[derive(Debug, FromRow)]
struct BullRow {
    id: i64,
    name: String,
    number: Option<String>,
    breed: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BullRow> for Bull {
    fn from(row: BullRow) -> Self {
        Bull {
            id: Some(row.id),
            name: row.name,
            number: row.number,
            breed: row.breed,
            notes: row.notes,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn column_values(bull: &Bull) -> Vec<SqlValue> {
    vec![
        bull.name.as_str().into(),
        bull.number.as_deref().into(),
        bull.breed.as_deref().into(),
        bull.notes.as_deref().into(),
    ]
}

/// Repository for bull database operations.
#[derive(Debug, Clone)]
pub struct BullRepository {
    gateway: QueryGateway,
}

impl BullRepository {
    /// Creates a new BullRepository.
    pub fn new(gateway: QueryGateway) -> Self {
        BullRepository { gateway }
    }

    /// Inserts a bull and returns its assigned id.
    pub async fn add(&self, bull: &Bull) -> DbResult<i64> {
        debug!(name = %bull.name, "Inserting bull");

        let now = now_timestamp();
        let mut params = column_values(bull);
        params.push(now.into());
        params.push(now.into());

        let result = self
            .gateway
            .execute(
                "INSERT INTO bulls (name, number, breed, notes, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &params,
            )
            .await?;

        Ok(result.insert_id().unwrap_or_default())
    }

    /// Rewrites every column of an existing bull.
    pub async fn update(&self, bull: &Bull) -> DbResult<()> {
        let id = bull.require_id()?;
        debug!(id = %id, "Updating bull");

        let mut params = column_values(bull);
        params.push(bull.next_updated_at().into());
        params.push(id.into());

        self.gateway
            .execute(
                "UPDATE bulls SET name = ?1, number = ?2, breed = ?3, notes = ?4, \
                 updated_at = ?5 WHERE id = ?6",
                &params,
            )
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting bull");

        self.gateway
            .execute("DELETE FROM bulls WHERE id = ?1", &[id.into()])
            .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Bull>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM bulls WHERE id = ?1"),
                &[id.into()],
            )
            .await?;

        Ok(result.first::<BullRow>()?.map(Bull::from))
    }

    /// All bulls ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Bull>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM bulls ORDER BY name ASC, id ASC"),
                &[],
            )
            .await?;

        let rows: Vec<BullRow> = result.map_rows()?;
        Ok(rows.into_iter().map(Bull::from).collect())
    }

    /// Bulls whose name or number contains `term`, ignoring case.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Bull>> {
        debug!(term = %term, "Searching bulls");

        let needle = term.to_lowercase();
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|bull| {
                contains_ignore_case(Some(&bull.name), &needle)
                    || contains_ignore_case(bull.number.as_deref(), &needle)
            })
            .collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.gateway, "bulls").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};

    async fn repo() -> BullRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().bulls()
    }

    #[tokio::test]
    async fn test_crud() {
        let repo = repo().await;

        let mut input = Bull::new("Буян");
        input.number = Some("RU-7731".to_string());
        let id = repo.add(&input).await.unwrap();

        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.number.as_deref(), Some("RU-7731"));

        stored.breed = Some("Голштинская".to_string());
        repo.update(&stored).await.unwrap();
        assert_eq!(
            repo.get_by_id(id).await.unwrap().unwrap().breed.as_deref(),
            Some("Голштинская")
        );

        let err = repo.update(&Bull::new("Гром")).await.unwrap_err();
        assert!(matches!(err, DbError::MissingId { entity: "Bull" }));

        repo.delete(id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_by_name_or_number() {
        let repo = repo().await;

        let mut grom = Bull::new("Гром");
        grom.number = Some("ru-100".to_string());
        repo.add(&grom).await.unwrap();
        repo.add(&Bull::new("Буян")).await.unwrap();
        repo.add(&Bull::new("Руслан")).await.unwrap();

        let names: Vec<String> = repo
            .search("РУ")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Руслан"]);

        let names: Vec<String> = repo
            .search("RU")
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Гром"]);

        assert_eq!(repo.search("").await.unwrap().len(), 3);
    }
}
