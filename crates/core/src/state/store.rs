//! # DataStore
//!
//! The persistence contract consumed by the catalog and the assembler.
//! Ingredient lookups by name only ever see active (non-deleted) rows.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{Ingredient, IngredientKind, NewAssociation, Pizza, PizzaSize};

pub trait DataStore: Send + Sync {
    /// Active ingredient with this exact (normalized) name and kind
    fn find_ingredient(
        &self,
        name: &str,
        kind: IngredientKind,
    ) -> Result<Option<Ingredient>, StoreError>;

    /// Any ingredient by identifier, including soft-deleted ones
    fn find_ingredient_by_id(&self, id: &str) -> Result<Option<Ingredient>, StoreError>;

    /// Insert a new active ingredient. Fails with `StoreError::Duplicate` when
    /// an active ingredient with the same name and kind already exists.
    fn insert_ingredient(&self, name: &str, kind: IngredientKind)
        -> Result<Ingredient, StoreError>;

    /// Stamp `deleted_at` on an active ingredient. Returns false when the
    /// ingredient was not active.
    fn soft_delete_ingredient(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StoreError>;

    /// Active ingredients of one kind
    fn list_ingredients(&self, kind: IngredientKind) -> Result<Vec<Ingredient>, StoreError>;

    /// Create the pizza row and all association rows in one transaction
    fn create_pizza_with_associations(
        &self,
        size: PizzaSize,
        associations: &[NewAssociation],
    ) -> Result<Pizza, StoreError>;

    fn find_pizza(&self, id: &str) -> Result<Option<Pizza>, StoreError>;

    /// Delete a pizza and its associations atomically. Returns false when no
    /// pizza had this identifier.
    fn delete_pizza(&self, id: &str) -> Result<bool, StoreError>;
}
