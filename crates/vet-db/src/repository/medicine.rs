//! Medicine directory.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;
use vet_core::{now_timestamp, Medicine, Record};

use super::count_rows;
use crate::error::DbResult;
use crate::gateway::{QueryGateway, SqlValue};

const SELECT_COLUMNS: &str =
    "id, name, active_ingredient, manufacturer, dosage, instructions, created_at, updated_at";

#[derive(Debug, FromRow)]
struct MedicineRow {
    id: i64,
    name: String,
    active_ingredient: Option<String>,
    manufacturer: Option<String>,
    dosage: Option<String>,
    instructions: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MedicineRow> for Medicine {
    fn from(row: MedicineRow) -> Self {
        Medicine {
            id: Some(row.id),
            name: row.name,
            active_ingredient: row.active_ingredient,
            manufacturer: row.manufacturer,
            dosage: row.dosage,
            instructions: row.instructions,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn column_values(medicine: &Medicine) -> Vec<SqlValue> {
    vec![
        medicine.name.as_str().into(),
        medicine.active_ingredient.as_deref().into(),
        medicine.manufacturer.as_deref().into(),
        medicine.dosage.as_deref().into(),
        medicine.instructions.as_deref().into(),
    ]
}

/// Repository for medicine database operations.
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    gateway: QueryGateway,
}

impl MedicineRepository {
    pub fn new(gateway: QueryGateway) -> Self {
        MedicineRepository { gateway }
    }

    pub async fn add(&self, medicine: &Medicine) -> DbResult<i64> {
        debug!(name = %medicine.name, "Inserting medicine");

        let now = now_timestamp();
        let mut params = column_values(medicine);
        params.push(now.into());
        params.push(now.into());

        let result = self
            .gateway
            .execute(
                r#"
                INSERT INTO medicines (
                    name, active_ingredient, manufacturer, dosage, instructions,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                &params,
            )
            .await?;

        Ok(result.insert_id().unwrap_or_default())
    }

    pub async fn update(&self, medicine: &Medicine) -> DbResult<()> {
        let id = medicine.require_id()?;
        debug!(id = %id, "Updating medicine");

        let mut params = column_values(medicine);
        params.push(medicine.next_updated_at().into());
        params.push(id.into());

        self.gateway
            .execute(
                r#"
                UPDATE medicines SET
                    name = ?1,
                    active_ingredient = ?2,
                    manufacturer = ?3,
                    dosage = ?4,
                    instructions = ?5,
                    updated_at = ?6
                WHERE id = ?7
                "#,
                &params,
            )
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting medicine");

        self.gateway
            .execute("DELETE FROM medicines WHERE id = ?1", &[id.into()])
            .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Medicine>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM medicines WHERE id = ?1"),
                &[id.into()],
            )
            .await?;

        Ok(result.first::<MedicineRow>()?.map(Medicine::from))
    }

    /// All medicines ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Medicine>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM medicines ORDER BY name ASC, id ASC"),
                &[],
            )
            .await?;

        let rows: Vec<MedicineRow> = result.map_rows()?;
        Ok(rows.into_iter().map(Medicine::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.gateway, "medicines").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};

    #[tokio::test]
    async fn test_crud_and_ordering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medicines();

        let mut input = Medicine::new("Пенициллин");
        input.active_ingredient = Some("Бензилпенициллин".to_string());
        let id = repo.add(&input).await.unwrap();
        repo.add(&Medicine::new("Окситоцин")).await.unwrap();

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Окситоцин", "Пенициллин"]);

        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.active_ingredient.as_deref(), Some("Бензилпенициллин"));
        stored.manufacturer = Some("Биохимик".to_string());
        repo.update(&stored).await.unwrap();

        let reloaded = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.manufacturer.as_deref(), Some("Биохимик"));
        assert_eq!(reloaded.created_at, stored.created_at);

        repo.delete(id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .medicines()
            .update(&Medicine::new("Окситоцин"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingId { entity: "Medicine" }));
    }
}
