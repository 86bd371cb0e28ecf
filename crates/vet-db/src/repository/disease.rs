//! Disease directory.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;
use vet_core::{now_timestamp, Disease, Record};

use super::count_rows;
use crate::error::DbResult;
use crate::gateway::{QueryGateway, SqlValue};

const SELECT_COLUMNS: &str = "id, name, description, symptoms, treatment, created_at, updated_at";

#[derive(Debug, FromRow)]
struct DiseaseRow {
    id: i64,
    name: String,
    description: Option<String>,
    symptoms: Option<String>,
    treatment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DiseaseRow> for Disease {
    fn from(row: DiseaseRow) -> Self {
        Disease {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            symptoms: row.symptoms,
            treatment: row.treatment,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

fn column_values(disease: &Disease) -> Vec<SqlValue> {
    vec![
        disease.name.as_str().into(),
        disease.description.as_deref().into(),
        disease.symptoms.as_deref().into(),
        disease.treatment.as_deref().into(),
    ]
}

/// Repository for disease database operations.
#[derive(Debug, Clone)]
pub struct DiseaseRepository {
    gateway: QueryGateway,
}

impl DiseaseRepository {
    pub fn new(gateway: QueryGateway) -> Self {
        DiseaseRepository { gateway }
    }

    pub async fn add(&self, disease: &Disease) -> DbResult<i64> {
        debug!(name = %disease.name, "Inserting disease");

        let now = now_timestamp();
        let mut params = column_values(disease);
        params.push(now.into());
        params.push(now.into());

        let result = self
            .gateway
            .execute(
                "INSERT INTO diseases (name, description, symptoms, treatment, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                &params,
            )
            .await?;

        Ok(result.insert_id().unwrap_or_default())
    }

    pub async fn update(&self, disease: &Disease) -> DbResult<()> {
        let id = disease.require_id()?;
        debug!(id = %id, "Updating disease");

        let mut params = column_values(disease);
        params.push(disease.next_updated_at().into());
        params.push(id.into());

        self.gateway
            .execute(
                "UPDATE diseases SET name = ?1, description = ?2, symptoms = ?3, treatment = ?4, \
                 updated_at = ?5 WHERE id = ?6",
                &params,
            )
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting disease");

        self.gateway
            .execute("DELETE FROM diseases WHERE id = ?1", &[id.into()])
            .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Disease>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM diseases WHERE id = ?1"),
                &[id.into()],
            )
            .await?;

        Ok(result.first::<DiseaseRow>()?.map(Disease::from))
    }

    /// All diseases ordered by name.
    pub async fn get_all(&self) -> DbResult<Vec<Disease>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM diseases ORDER BY name ASC, id ASC"),
                &[],
            )
            .await?;

        let rows: Vec<DiseaseRow> = result.map_rows()?;
        Ok(rows.into_iter().map(Disease::from).collect())
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.gateway, "diseases").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_crud_and_ordering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.diseases();

        let mut mastitis = Disease::new("Мастит");
        mastitis.symptoms = Some("Отёк вымени".to_string());
        let id = repo.add(&mastitis).await.unwrap();
        repo.add(&Disease::new("Кетоз")).await.unwrap();

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Кетоз", "Мастит"]);

        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.symptoms.as_deref(), Some("Отёк вымени"));
        stored.treatment = Some("Антибиотик".to_string());
        repo.update(&stored).await.unwrap();
        assert_eq!(
            repo.get_by_id(id).await.unwrap().unwrap().treatment.as_deref(),
            Some("Антибиотик")
        );

        repo.delete(id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
