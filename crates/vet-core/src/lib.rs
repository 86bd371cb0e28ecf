//! # vet-core: Pure Domain Model for Vet Records
//!
//! This crate holds the record types and form rules of Vet Records with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Vet Records Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation Layer (screens)                    │   │
//! │  │   Animal list ──► Animal card ──► Operation form ──► Export     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ camelCase DTOs                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ vet-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌──────────────┐             │   │
//! │  │   │   types   │  │ validation  │  │ reproduction │             │   │
//! │  │   │  Animal   │  │ form rules  │  │ insemination │             │   │
//! │  │   │ Operation │  │ date ranges │  │ birth        │             │   │
//! │  │   └───────────┘  └─────────────┘  └──────────────┘             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vet-db (Database Layer)                      │   │
//! │  │          SQLite schema, gateway, repositories, export           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (Animal, Operation, directories)
//! - [`error`] - Domain error types
//! - [`validation`] - Form-level validation
//! - [`reproduction`] - Animal card changes implied by operations

pub mod error;
pub mod reproduction;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

/// Maximum length of a directory name or animal number.
pub const MAX_NAME_LENGTH: usize = 200;

/// Suggested labels for `Animal::animal_type`. The field itself is free text.
pub const ANIMAL_TYPES: [&str; 10] = [
    "Корова", "Бык", "Телёнок", "Свинья", "Овца", "Коза", "Лошадь", "Собака", "Кошка", "Другое",
];
