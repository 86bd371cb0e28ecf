//! Vaccine directory.
//!
//! Vaccination operations store the vaccine by name, not by id, so renaming
//! or deleting an entry here does not rewrite history.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;
use vet_core::{now_timestamp, Record, Vaccine};

use super::count_rows;
use crate::error::DbResult;
use crate::gateway::{QueryGateway, SqlValue};

const SELECT_COLUMNS: &str = "id, name, manufacturer, dosage, instructions, created_at, updated_at";

#[derive(Debug, FromRow)]
struct VaccineRow {
    id: i64,
    name: String,
    manufacturer: Option<String>,
    dosage: Option<String>,
    instructions: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VaccineRow> for Vaccine {
    fn from(row: VaccineRow) -> Self {
        Vaccine {
            id: Some(row.id),
            name: row.name,
            manufacturer: row.manufacturer,
            dosage: row.dosage,
            instructions: row.instructions,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn column_values(vaccine: &Vaccine) -> Vec<SqlValue> {
    vec![
        vaccine.name.as_str().into(),
        vaccine.manufacturer.as_deref().into(),
        vaccine.dosage.as_deref().into(),
        vaccine.instructions.as_deref().into(),
    ]
}

/// Repository for vaccine database operations.
#[derive(Debug, Clone)]
pub struct VaccineRepository {
    gateway: QueryGateway,
}

impl VaccineRepository {
    pub fn new(gateway: QueryGateway) -> Self {
        VaccineRepository { gateway }
    }

    pub async fn add(&self, vaccine: &Vaccine) -> DbResult<i64> {
        debug!(name = %vaccine.name, "Inserting vaccine");

        let now = now_timestamp();
        let mut params = column_values(vaccine);
        params.push(now.into());
        params.push(now.into());

        let result = self
            .gateway
            .execute(
                "INSERT INTO vaccines (name, manufacturer, dosage, instructions, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &params,
            )
            .await?;

        Ok(result.insert_id().unwrap_or_default())
    }

    pub async fn update(&self, vaccine: &Vaccine) -> DbResult<()> {
        let id = vaccine.require_id()?;
        debug!(id = %id, "Updating vaccine");

        let mut params = column_values(vaccine);
        params.push(vaccine.next_updated_at().into());
        params.push(id.into());

        self.gateway
            .execute(
                "UPDATE vaccines SET name = ?1, manufacturer = ?2, dosage = ?3, instructions = ?4, \
                 updated_at = ?5 WHERE id = ?6",
                &params,
            )
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting vaccine");

        self.gateway
            .execute("DELETE FROM vaccines WHERE id = ?1", &[id.into()])
            .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Vaccine>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM vaccines WHERE id = ?1"),
                &[id.into()],
            )
            .await?;

        Ok(result.first::<VaccineRow>()?.map(Vaccine::from))
    }

    /// All vaccines ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Vaccine>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM vaccines ORDER BY name ASC, id ASC"),
                &[],
            )
            .await?;

        let rows: Vec<VaccineRow> = result.map_rows()?;
        Ok(rows.into_iter().map(Vaccine::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.gateway, "vaccines").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_crud_and_ordering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.vaccines();

        let id = repo.add(&Vaccine::new("Эмульцин")).await.unwrap();
        repo.add(&Vaccine::new("Бовилис")).await.unwrap();

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["Бовилис", "Эмульцин"]);

        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        stored.dosage = Some("2 мл".to_string());
        repo.update(&stored).await.unwrap();
        assert_eq!(
            repo.get_by_id(id).await.unwrap().unwrap().dosage.as_deref(),
            Some("2 мл")
        );

        repo.delete(id).await.unwrap();
        assert!(repo.get_by_id(id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
