//! # Domain Types
//!
//! The seven record types kept by Vet Records.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1    * ┌─────────────────┐  *   0..1 ┌──────────┐ │
//! │  │     Animal      │◄────────│    Operation    │──────────►│ Executor │ │
//! │  │  ─────────────  │ cascade │  ─────────────  │   soft    └──────────┘ │
//! │  │  number         │         │  animal_id (FK) │                        │
//! │  │  gender         │         │  kind           │   copied by value:     │
//! │  │  animal_type    │         │  date           │   diagnosis ← Disease  │
//! │  └─────────────────┘         │  diagnosis ...  │   medicine  ← Medicine │
//! │                              └─────────────────┘   bull      ← Bull     │
//! │                                                    vaccine   ← Vaccine  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity and Timestamps
//! Every record has:
//! - `id`: `None` until the record is first stored, then assigned by SQLite
//!   and never changed
//! - `created_at`: stamped once at insertion
//! - `updated_at`: stamped at insertion and on every update
//!
//! Callers never set timestamps; repositories overwrite whatever they carry.
//!
//! ## Copy-by-Value Directory References
//! `Operation::diagnosis`, `medicine`, `bull` and `vaccine` hold the directory
//! entry's name as plain text. Renaming or deleting the directory entry later
//! leaves historical operations untouched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

/// Returns the current time at the millisecond precision used for storage.
///
/// Stored timestamps carry milliseconds (`2024-03-01T08:15:00.123Z`), so a
/// value stamped in memory compares equal to the one read back.
pub fn now_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Stamp for a rewrite of a record last stamped at `previous`.
///
/// Always later than `previous`, even when the clock has not moved past
/// it at millisecond precision.
pub fn timestamp_after(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = now_timestamp();
    match previous {
        Some(previous) if now <= previous => previous.trunc_subsecs(3) + Duration::milliseconds(1),
        _ => now,
    }
}

// =============================================================================
// Record Trait
// =============================================================================

/// Common identity behaviour of the seven stored record types.
pub trait Record {
    /// Human-readable entity name used in errors and logs.
    const ENTITY: &'static str;

    /// Storage-assigned identity, `None` before the first insert.
    fn id(&self) -> Option<i64>;

    /// Last stamp the record was loaded with, `None` before the first insert.
    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// `updated_at` to write when rewriting this record.
    fn next_updated_at(&self) -> DateTime<Utc> {
        timestamp_after(self.updated_at())
    }

    /// Returns the identity or the precondition error raised by `update`.
    fn require_id(&self) -> CoreResult<i64> {
        self.id().ok_or(CoreError::MissingId {
            entity: Self::ENTITY,
        })
    }
}

// =============================================================================
// Gender
// =============================================================================

/// Sex of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ValidationError::NotAllowed {
                field: "gender".to_string(),
                allowed: vec!["male".to_string(), "female".to_string()],
            }),
        }
    }
}

// =============================================================================
// Operation Type
// =============================================================================

/// Kind of medical or reproductive operation.
///
/// The Russian label is both the stored value and the serialized value, so
/// exports and screens show it without translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum OperationType {
    #[serde(rename = "Лечение")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Лечение"))]
    Treatment,
    #[serde(rename = "Осеменение")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Осеменение"))]
    Insemination,
    #[serde(rename = "Вакцинация")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Вакцинация"))]
    Vaccination,
    #[serde(rename = "Осмотр")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Осмотр"))]
    Examination,
    #[serde(rename = "Проверка стельности")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Проверка стельности"))]
    PregnancyCheck,
    #[serde(rename = "Отёл")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Отёл"))]
    Birth,
    #[serde(rename = "Хирургическая операция")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Хирургическая операция"))]
    Surgery,
    #[serde(rename = "Другое")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Другое"))]
    Other,
}

impl OperationType {
    /// All operation types in form display order.
    pub const ALL: [OperationType; 8] = [
        OperationType::Treatment,
        OperationType::Insemination,
        OperationType::Vaccination,
        OperationType::Examination,
        OperationType::PregnancyCheck,
        OperationType::Birth,
        OperationType::Surgery,
        OperationType::Other,
    ];

    /// Stored (and displayed) label.
    pub const fn label(&self) -> &'static str {
        match self {
            OperationType::Treatment => "Лечение",
            OperationType::Insemination => "Осеменение",
            OperationType::Vaccination => "Вакцинация",
            OperationType::Examination => "Осмотр",
            OperationType::PregnancyCheck => "Проверка стельности",
            OperationType::Birth => "Отёл",
            OperationType::Surgery => "Хирургическая операция",
            OperationType::Other => "Другое",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OperationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationType::ALL
            .iter()
            .copied()
            .find(|kind| kind.label() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: OperationType::ALL
                    .iter()
                    .map(|kind| kind.label().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Animal
// =============================================================================

/// A registered animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    /// Storage-assigned identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,

    /// Ear-tag / herd-book number, the display key.
    pub number: String,

    /// Responder (collar transponder) number.
    pub responder: Option<String>,

    /// Herd group.
    pub group: Option<String>,

    #[ts(as = "Option<String>")]
    pub birth_date: Option<NaiveDate>,

    pub gender: Gender,

    /// Species/category label, free text (see [`crate::ANIMAL_TYPES`]).
    #[serde(rename = "type")]
    pub animal_type: String,

    #[ts(as = "Option<String>")]
    pub last_delivery_date: Option<NaiveDate>,

    #[ts(as = "Option<String>")]
    pub next_delivery_date: Option<NaiveDate>,

    #[ts(as = "Option<String>")]
    pub last_insemination_date: Option<NaiveDate>,

    pub lactation_number: Option<i64>,

    pub insemination_count: Option<i64>,

    /// Average daily milk yield.
    pub average_milk: Option<f64>,

    /// Milk yield over the current lactation.
    pub milk_by_lactation: Option<f64>,

    pub notes: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Animal {
    /// Creates an unsaved animal with only the required fields set.
    pub fn new(number: impl Into<String>, gender: Gender, animal_type: impl Into<String>) -> Self {
        Animal {
            id: None,
            number: number.into(),
            responder: None,
            group: None,
            birth_date: None,
            gender,
            animal_type: animal_type.into(),
            last_delivery_date: None,
            next_delivery_date: None,
            last_insemination_date: None,
            lactation_number: None,
            insemination_count: None,
            average_milk: None,
            milk_by_lactation: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[inline]
    pub fn is_female(&self) -> bool {
        self.gender == Gender::Female
    }
}

impl Record for Animal {
    const ENTITY: &'static str = "Animal";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

// =============================================================================
// Operation
// =============================================================================

/// A medical or reproductive event logged against one animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,

    /// Owning animal; the operation is deleted together with it.
    pub animal_id: i64,

    #[serde(rename = "type")]
    pub kind: OperationType,

    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Disease name, copied from the directory.
    pub diagnosis: Option<String>,

    /// Medicine name, copied from the directory.
    pub medicine: Option<String>,

    pub dose: Option<String>,

    /// Bull name, copied from the directory.
    pub bull: Option<String>,

    /// Vaccine name, copied from the directory.
    pub vaccine: Option<String>,

    /// Soft reference to an executor; not enforced by storage.
    pub executor_id: Option<i64>,

    pub result: Option<String>,

    pub notes: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Operation {
    /// Creates an unsaved operation with only the required fields set.
    pub fn new(animal_id: i64, kind: OperationType, date: NaiveDate) -> Self {
        Operation {
            id: None,
            animal_id,
            kind,
            date,
            diagnosis: None,
            medicine: None,
            dose: None,
            bull: None,
            vaccine: None,
            executor_id: None,
            result: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Record for Operation {
    const ENTITY: &'static str = "Operation";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

// =============================================================================
// Executor
// =============================================================================

/// A person who performs operations (veterinarian, technician).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Executor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,
    /// Full name.
    pub name: String,
    pub position: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Executor {
    pub fn new(name: impl Into<String>) -> Self {
        Executor {
            id: None,
            name: name.into(),
            position: None,
            contact: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Record for Executor {
    const ENTITY: &'static str = "Executor";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

// =============================================================================
// Directories
// =============================================================================

/// Disease directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub symptoms: Option<String>,
    pub treatment: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Disease {
    pub fn new(name: impl Into<String>) -> Self {
        Disease {
            id: None,
            name: name.into(),
            description: None,
            symptoms: None,
            treatment: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Record for Disease {
    const ENTITY: &'static str = "Disease";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Breeding bull directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bull {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,
    pub name: String,
    /// Herd-book number.
    pub number: Option<String>,
    pub breed: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Bull {
    pub fn new(name: impl Into<String>) -> Self {
        Bull {
            id: None,
            name: name.into(),
            number: None,
            breed: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Record for Bull {
    const ENTITY: &'static str = "Bull";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Vaccine directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Vaccine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,
    pub name: String,
    pub manufacturer: Option<String>,
    pub dosage: Option<String>,
    pub instructions: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Vaccine {
    pub fn new(name: impl Into<String>) -> Self {
        Vaccine {
            id: None,
            name: name.into(),
            manufacturer: None,
            dosage: None,
            instructions: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Record for Vaccine {
    const ENTITY: &'static str = "Vaccine";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Medicine directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<i64>,
    pub name: String,
    pub active_ingredient: Option<String>,
    pub manufacturer: Option<String>,
    pub dosage: Option<String>,
    pub instructions: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Medicine {
    pub fn new(name: impl Into<String>) -> Self {
        Medicine {
            id: None,
            name: name.into(),
            active_ingredient: None,
            manufacturer: None,
            dosage: None,
            instructions: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl Record for Medicine {
    const ENTITY: &'static str = "Medicine";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
