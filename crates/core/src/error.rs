//! # Error Taxonomy
//!
//! `StoreError` is what the persistence layer can report; `PizzeriaError` is
//! what the catalog and assembler surface to callers.

use thiserror::Error;

use crate::models::IngredientKind;

/// Failures raised by a `DataStore` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// The active-ingredient uniqueness constraint rejected an insert
    #[error("an active ingredient with this name and type already exists")]
    Duplicate,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store connection lock poisoned: {0}")]
    Poisoned(String),

    #[error("store connection is closed")]
    Closed,
}

impl StoreError {
    /// Map a rusqlite error, recognising unique-constraint violations
    pub fn from_insert(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Duplicate
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// What could not be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Ingredient { kind: IngredientKind, name: String },
    Pizza { id: String },
}

impl std::fmt::Display for Missing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Missing::Ingredient { kind, name } => {
                write!(f, "could not find {} named {}", kind.label(), name)
            }
            Missing::Pizza { id } => write!(f, "could not find pizza with ID {}", id),
        }
    }
}

#[derive(Debug, Error)]
pub enum PizzeriaError {
    #[error("failed to add {} {name} since it already exists", .kind.label())]
    Conflict { kind: IngredientKind, name: String },

    #[error("{0}")]
    NotFound(Missing),

    #[error("{0}")]
    InvalidComposition(String),

    /// Malformed input: empty names, unknown enum values
    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("store unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

impl PizzeriaError {
    pub fn coverage() -> Self {
        PizzeriaError::InvalidComposition(
            "pizza sauces and toppings must cover entire pizza".to_string(),
        )
    }

    pub fn ingredient_not_found(kind: IngredientKind, name: &str) -> Self {
        PizzeriaError::NotFound(Missing::Ingredient {
            kind,
            name: name.to_string(),
        })
    }

    pub fn pizza_not_found(id: &str) -> Self {
        PizzeriaError::NotFound(Missing::Pizza { id: id.to_string() })
    }

    /// Short machine-readable tag for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PizzeriaError::Conflict { .. } => "conflict",
            PizzeriaError::NotFound(_) => "not_found",
            PizzeriaError::InvalidComposition(_) => "invalid_composition",
            PizzeriaError::Invalid(_) => "invalid",
            PizzeriaError::Unavailable(_) => "unavailable",
        }
    }
}

pub type Result<T, E = PizzeriaError> = std::result::Result<T, E>;
