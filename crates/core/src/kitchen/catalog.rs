//! # Ingredient Catalog
//!
//! Authoritative list of which sauces and toppings can currently be ordered.
//! Names are compared in their normalized (trimmed, lowercase) form.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{PizzeriaError, Result, StoreError};
use crate::models::{Ingredient, IngredientKind};
use crate::state::DataStore;

/// Canonical form of an ingredient name
pub fn normalize_name(name: &str) -> Result<String> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(PizzeriaError::Invalid(
            "ingredient name must not be empty".to_string(),
        ));
    }
    Ok(normalized)
}

#[derive(Clone)]
pub struct IngredientCatalog {
    store: Arc<dyn DataStore>,
}

impl IngredientCatalog {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Active ingredients of one kind
    pub fn list_active(&self, kind: IngredientKind) -> Result<Vec<Ingredient>> {
        let ingredients = self.store.list_ingredients(kind)?;
        tracing::debug!("Listed {} active {}s", ingredients.len(), kind);
        Ok(ingredients)
    }

    /// Add a new ingredient. Fails with `Conflict` when an active ingredient
    /// with the same normalized name and kind exists.
    pub fn add(&self, name: &str, kind: IngredientKind) -> Result<Ingredient> {
        let name = normalize_name(name)?;

        if self.store.find_ingredient(&name, kind)?.is_some() {
            tracing::warn!("Rejected duplicate {} '{}'", kind, name);
            return Err(PizzeriaError::Conflict { kind, name });
        }

        // A concurrent add can slip past the lookup; the store's active-name
        // constraint is the final word.
        let ingredient = self
            .store
            .insert_ingredient(&name, kind)
            .map_err(|e| match e {
                StoreError::Duplicate => PizzeriaError::Conflict {
                    kind,
                    name: name.clone(),
                },
                other => PizzeriaError::Unavailable(other),
            })?;

        tracing::info!("Added {} '{}' ({})", kind, ingredient.name, ingredient.id);
        Ok(ingredient)
    }

    /// Soft-delete the active ingredient with this name and kind, returning
    /// the record with its deletion timestamp set.
    pub fn soft_delete(&self, name: &str, kind: IngredientKind) -> Result<Ingredient> {
        let name = normalize_name(name)?;

        let mut ingredient = self
            .store
            .find_ingredient(&name, kind)?
            .ok_or_else(|| PizzeriaError::ingredient_not_found(kind, &name))?;

        let now = Utc::now();
        if !self.store.soft_delete_ingredient(&ingredient.id, now)? {
            return Err(PizzeriaError::ingredient_not_found(kind, &name));
        }
        ingredient.deleted_at = Some(now);

        tracing::info!("Soft-deleted {} '{}' ({})", kind, name, ingredient.id);
        Ok(ingredient)
    }

    /// Resolve every name to the identifier of its active ingredient. The
    /// whole batch fails on the first name that does not resolve.
    pub fn resolve_many<'a, I>(
        &self,
        names: I,
        kind: IngredientKind,
    ) -> Result<HashMap<String, String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut resolved = HashMap::new();

        for name in names {
            let name = normalize_name(name)?;
            if resolved.contains_key(&name) {
                continue;
            }

            let ingredient = self
                .store
                .find_ingredient(&name, kind)?
                .ok_or_else(|| PizzeriaError::ingredient_not_found(kind, &name))?;
            resolved.insert(name, ingredient.id);
        }

        Ok(resolved)
    }
}
