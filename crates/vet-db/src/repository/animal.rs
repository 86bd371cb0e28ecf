//! # Animal Repository
//!
//! Database operations for animals.
//!
//! ## Column Mapping
//! ```text
//! animals (SQLite)            Animal (application)
//! ─────────────────────       ──────────────────────
//! group_name              ──► group
//! type                    ──► animal_type   ("type" on the wire)
//! birth_date              ──► birth_date    ("birthDate")
//! last_delivery_date      ──► last_delivery_date
//! ...                         ...
//! ```
//!
//! Deleting an animal cascades to its operations (foreign key
//! `operations.animal_id ON DELETE CASCADE`).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use tracing::debug;
use vet_core::{now_timestamp, Animal, Gender, Record};

use super::{contains_ignore_case, count_rows};
use crate::error::DbResult;
use crate::gateway::{QueryGateway, SqlValue};

const SELECT_COLUMNS: &str = "id, number, responder, group_name, birth_date, gender, type, \
    last_delivery_date, next_delivery_date, last_insemination_date, lactation_number, \
    insemination_count, average_milk, milk_by_lactation, notes, created_at, updated_at";

/// Row shape of the `animals` table.
#[derive(Debug, FromRow)]
struct AnimalRow {
    id: i64,
    number: String,
    responder: Option<String>,
    group_name: Option<String>,
    birth_date: Option<NaiveDate>,
    gender: Gender,
    #[sqlx(rename = "type")]
    animal_type: String,
    last_delivery_date: Option<NaiveDate>,
    next_delivery_date: Option<NaiveDate>,
    last_insemination_date: Option<NaiveDate>,
    lactation_number: Option<i64>,
    insemination_count: Option<i64>,
    average_milk: Option<f64>,
    milk_by_lactation: Option<f64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AnimalRow> for Animal {
    fn from(row: AnimalRow) -> Self {
        Animal {
            id: Some(row.id),
            number: row.number,
            responder: row.responder,
            group: row.group_name,
            birth_date: row.birth_date,
            gender: row.gender,
            animal_type: row.animal_type,
            last_delivery_date: row.last_delivery_date,
            next_delivery_date: row.next_delivery_date,
            last_insemination_date: row.last_insemination_date,
            lactation_number: row.lactation_number,
            insemination_count: row.insemination_count,
            average_milk: row.average_milk,
            milk_by_lactation: row.milk_by_lactation,
            notes: row.notes,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

/// Every writable column except the timestamps, in statement order.
fn column_values(animal: &Animal) -> Vec<SqlValue> {
    vec![
        animal.number.as_str().into(),
        animal.responder.as_deref().into(),
        animal.group.as_deref().into(),
        animal.birth_date.into(),
        animal.gender.into(),
        animal.animal_type.as_str().into(),
        animal.last_delivery_date.into(),
        animal.next_delivery_date.into(),
        animal.last_insemination_date.into(),
        animal.lactation_number.into(),
        animal.insemination_count.into(),
        animal.average_milk.into(),
        animal.milk_by_lactation.into(),
        animal.notes.as_deref().into(),
    ]
}

/// Repository for animal database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.animals();
/// let id = repo.add(&Animal::new("01217", Gender::Female, "Корова")).await?;
/// let found = repo.search("012").await?;
/// ```
#[derive(Debug, Clone)]
pub struct AnimalRepository {
    gateway: QueryGateway,
}

impl AnimalRepository {
    /// Creates a new AnimalRepository.
    pub fn new(gateway: QueryGateway) -> Self {
        AnimalRepository { gateway }
    }

    /// Inserts a new animal and returns its assigned id.
    ///
    /// `id`, `created_at` and `updated_at` on the input are ignored; both
    /// timestamps are stamped with the same instant.
    pub async fn add(&self, animal: &Animal) -> DbResult<i64> {
        debug!(number = %animal.number, "Inserting animal");

        let now = now_timestamp();
        let mut params = column_values(animal);
        params.push(now.into());
        params.push(now.into());

        let result = self
            .gateway
            .execute(
                r#"
                INSERT INTO animals (
                    number, responder, group_name, birth_date, gender, type,
                    last_delivery_date, next_delivery_date, last_insemination_date,
                    lactation_number, insemination_count, average_milk,
                    milk_by_lactation, notes, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
                &params,
            )
            .await?;

        Ok(result.insert_id().unwrap_or_default())
    }

    /// Rewrites every column of an existing animal.
    ///
    /// ## Returns
    /// * `Ok(())` - Row rewritten (or no row with that id)
    /// * `Err(DbError::MissingId)` - `animal.id` is `None`; nothing was written
    pub async fn update(&self, animal: &Animal) -> DbResult<()> {
        let id = animal.require_id()?;
        debug!(id = %id, "Updating animal");

        let mut params = column_values(animal);
        params.push(animal.next_updated_at().into());
        params.push(id.into());

        self.gateway
            .execute(
                r#"
                UPDATE animals SET
                    number = ?1,
                    responder = ?2,
                    group_name = ?3,
                    birth_date = ?4,
                    gender = ?5,
                    type = ?6,
                    last_delivery_date = ?7,
                    next_delivery_date = ?8,
                    last_insemination_date = ?9,
                    lactation_number = ?10,
                    insemination_count = ?11,
                    average_milk = ?12,
                    milk_by_lactation = ?13,
                    notes = ?14,
                    updated_at = ?15
                WHERE id = ?16
                "#,
                &params,
            )
            .await?;

        Ok(())
    }

    /// Hard-deletes an animal and, by cascade, all of its operations.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting animal");

        self.gateway
            .execute("DELETE FROM animals WHERE id = ?1", &[id.into()])
            .await?;

        Ok(())
    }

    /// Gets an animal by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Animal))` - Animal found
    /// * `Ok(None)` - Animal not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Animal>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM animals WHERE id = ?1"),
                &[id.into()],
            )
            .await?;

        Ok(result.first::<AnimalRow>()?.map(Animal::from))
    }

    /// All animals ordered by number.
    pub async fn get_all(&self) -> DbResult<Vec<Animal>> {
        let result = self
            .gateway
            .execute(
                &format!("SELECT {SELECT_COLUMNS} FROM animals ORDER BY number ASC, id ASC"),
                &[],
            )
            .await?;

        Ok(into_animals(result.map_rows()?))
    }

    /// Animals of one herd group, ordered by number.
    pub async fn get_by_group(&self, group: &str) -> DbResult<Vec<Animal>> {
        let result = self
            .gateway
            .execute(
                &format!(
                    "SELECT {SELECT_COLUMNS} FROM animals WHERE group_name = ?1 ORDER BY number ASC, id ASC"
                ),
                &[group.into()],
            )
            .await?;

        Ok(into_animals(result.map_rows()?))
    }

    /// Animals whose number or responder contains `term`, ignoring case.
    ///
    /// Ordered by number, like [`get_all`](Self::get_all). An empty term
    /// matches every animal.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Animal>> {
        debug!(term = %term, "Searching animals");

        let needle = term.to_lowercase();
        let animals: Vec<Animal> = self
            .get_all()
            .await?
            .into_iter()
            .filter(|animal| {
                contains_ignore_case(Some(&animal.number), &needle)
                    || contains_ignore_case(animal.responder.as_deref(), &needle)
            })
            .collect();

        debug!(count = animals.len(), "Search returned animals");
        Ok(animals)
    }

    /// Counts stored animals.
    pub async fn count(&self) -> DbResult<i64> {
        count_rows(&self.gateway, "animals").await
    }
}

fn into_animals(rows: Vec<AnimalRow>) -> Vec<Animal> {
    rows.into_iter().map(Animal::from).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
