//! # Spreadsheet Export
//!
//! Renders animals and operations as CSV for spreadsheet tools.
//!
//! ## Layout
//! ```text
//! animals_2024-03-01.csv
//! ┌───────┬───────────┬────────┬──────┬────────┬───────────────┬─────┐
//! │ Номер │ Респондер │ Группа │ Пол  │ Тип    │ Дата рождения │ ... │
//! ├───────┼───────────┼────────┼──────┼────────┼───────────────┼─────┤
//! │ 01217 │ R-88      │ Дойные │ Жен. │ Корова │ 2020-05-17    │     │
//! └───────┴───────────┴────────┴──────┴────────┴───────────────┴─────┘
//!
//! operations_2024-03-01_2024-03-31.csv
//!   Дата │ Тип операции │ Номер животного │ Группа │ Диагноз │ ...
//! ```
//!
//! Output is UTF-8 with a byte-order mark so spreadsheet tools detect the
//! Cyrillic headers. Absent values are empty cells; the writer quotes any
//! cell containing the delimiter, quotes or line breaks.

use chrono::NaiveDate;
use csv::Writer;
use tracing::{debug, info};
use vet_core::validation::validate_date_range;
use vet_core::{Animal, Gender, Operation, OperationType};

use crate::error::{DbError, DbResult};
use crate::pool::Database;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Animal number shown when an operation's animal no longer exists.
pub const UNKNOWN_ANIMAL: &str = "Неизвестно";

const ANIMAL_HEADERS: [&str; 14] = [
    "Номер",
    "Респондер",
    "Группа",
    "Пол",
    "Тип",
    "Дата рождения",
    "Дата последнего отёла",
    "Дата следующего отёла",
    "Дата последнего осеменения",
    "Лактация",
    "Кол-во осеменений",
    "Средний удой",
    "Молоко по лактации",
    "Примечания",
];

const OPERATION_HEADERS: [&str; 11] = [
    "Дата",
    "Тип операции",
    "Номер животного",
    "Группа",
    "Диагноз",
    "Лекарство",
    "Доза",
    "Бык",
    "Вакцина",
    "Результат",
    "Примечания",
];

// =============================================================================
// Export Rows
// =============================================================================

/// An operation joined with the animal it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationExportRow {
    pub operation: Operation,
    /// Animal number, or [`UNKNOWN_ANIMAL`].
    pub animal_number: String,
    pub animal_group: Option<String>,
}

impl OperationExportRow {
    pub fn new(operation: Operation, animal: Option<&Animal>) -> Self {
        OperationExportRow {
            operation,
            animal_number: animal
                .map(|a| a.number.clone())
                .unwrap_or_else(|| UNKNOWN_ANIMAL.to_string()),
            animal_group: animal.and_then(|a| a.group.clone()),
        }
    }
}

// =============================================================================
// Cell Formatting
// =============================================================================

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "Муж.",
        Gender::Female => "Жен.",
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(writer: Writer<Vec<u8>>) -> DbResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| DbError::Export(e.to_string()))
}

fn new_writer() -> Writer<Vec<u8>> {
    Writer::from_writer(UTF8_BOM.to_vec())
}

// =============================================================================
// Renderers
// =============================================================================

/// Renders the animal list, one row per animal in the given order.
pub fn animals_csv(animals: &[Animal]) -> DbResult<Vec<u8>> {
    let mut writer = new_writer();
    writer.write_record(ANIMAL_HEADERS)?;

    for animal in animals {
        writer.write_record([
            animal.number.clone(),
            text(&animal.responder),
            text(&animal.group),
            gender_label(animal.gender).to_string(),
            animal.animal_type.clone(),
            cell(animal.birth_date),
            cell(animal.last_delivery_date),
            cell(animal.next_delivery_date),
            cell(animal.last_insemination_date),
            cell(animal.lactation_number),
            cell(animal.insemination_count),
            cell(animal.average_milk),
            cell(animal.milk_by_lactation),
            text(&animal.notes),
        ])?;
    }

    finish(writer)
}

/// Renders joined operations, one row per operation in the given order.
pub fn operations_csv(rows: &[OperationExportRow]) -> DbResult<Vec<u8>> {
    let mut writer = new_writer();
    writer.write_record(OPERATION_HEADERS)?;

    for row in rows {
        let op = &row.operation;
        writer.write_record([
            op.date.to_string(),
            op.kind.label().to_string(),
            row.animal_number.clone(),
            text(&row.animal_group),
            text(&op.diagnosis),
            text(&op.medicine),
            text(&op.dose),
            text(&op.bull),
            text(&op.vaccine),
            text(&op.result),
            text(&op.notes),
        ])?;
    }

    finish(writer)
}

/// `animals_<date>.csv`
pub fn animals_file_name(date: NaiveDate) -> String {
    format!("animals_{}.csv", date.format("%Y-%m-%d"))
}

/// `operations_<start>_<end>.csv`
pub fn operations_file_name(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "operations_{}_{}.csv",
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

// =============================================================================
// Database Queries
// =============================================================================

impl Database {
    /// Loads operations dated within `start..=end` (optionally of one type)
    /// joined with their animals, newest first.
    ///
    /// Animals are looked up one operation at a time.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - `start` is after `end`
    pub async fn export_operations(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        kind: Option<OperationType>,
    ) -> DbResult<Vec<OperationExportRow>> {
        validate_date_range(start, end)?;

        let operations = match kind {
            Some(kind) => {
                self.operations()
                    .get_by_type_and_date_range(kind, start, end)
                    .await?
            }
            None => self.operations().get_by_date_range(start, end).await?,
        };

        let animals = self.animals();
        let mut rows = Vec::with_capacity(operations.len());
        for operation in operations {
            let animal = animals.get_by_id(operation.animal_id).await?;
            rows.push(OperationExportRow::new(operation, animal.as_ref()));
        }

        info!(%start, %end, rows = rows.len(), "Prepared operations export");
        Ok(rows)
    }

    /// Renders every animal as CSV.
    pub async fn export_animals_csv(&self) -> DbResult<Vec<u8>> {
        let animals = self.animals().get_all().await?;
        debug!(count = animals.len(), "Exporting animals");
        animals_csv(&animals)
    }
}
