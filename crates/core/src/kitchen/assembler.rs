//! # Pizza Assembler
//!
//! Validates a requested composition and persists it. Nothing is written
//! until defaulting, coverage and catalog resolution have all succeeded.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::catalog::{normalize_name, IngredientCatalog};
use super::coverage::check_coverage;
use crate::error::{PizzeriaError, Result};
use crate::models::{
    IngredientKind, NewAssociation, Pizza, PizzaSize, Placement, PlacementRequest,
};
use crate::state::DataStore;

/// A full pizza request: size plus sauce and topping placements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PizzaOrder {
    pub size: PizzaSize,
    pub sauces: Vec<PlacementRequest>,
    pub toppings: Vec<PlacementRequest>,
}

/// Fill in default amount/section and normalize the name
pub fn apply_defaults(request: &PlacementRequest) -> Result<Placement> {
    Ok(Placement {
        name: normalize_name(&request.name)?,
        amount: request.amount.unwrap_or_default(),
        section: request.section.unwrap_or_default(),
    })
}

#[derive(Clone)]
pub struct PizzaAssembler {
    store: Arc<dyn DataStore>,
    catalog: IngredientCatalog,
}

impl PizzaAssembler {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            catalog: IngredientCatalog::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn create_order(&self, order: &PizzaOrder) -> Result<Pizza> {
        self.create_pizza(order.size, &order.sauces, &order.toppings)
    }

    /// Validate and persist a pizza. Sauces are stored before toppings, each
    /// in request order.
    pub fn create_pizza(
        &self,
        size: PizzaSize,
        sauces: &[PlacementRequest],
        toppings: &[PlacementRequest],
    ) -> Result<Pizza> {
        let sauces = sauces
            .iter()
            .map(apply_defaults)
            .collect::<Result<Vec<_>>>()?;
        let toppings = toppings
            .iter()
            .map(apply_defaults)
            .collect::<Result<Vec<_>>>()?;

        for placements in [&sauces, &toppings] {
            if let Err(e) = check_coverage(placements.iter().map(|p| p.section)) {
                tracing::warn!("Rejected {} pizza: {}", size.as_str(), e);
                return Err(e);
            }
        }

        let mut associations = self.resolve(&sauces, IngredientKind::Sauce)?;
        associations.extend(self.resolve(&toppings, IngredientKind::Topping)?);

        let pizza = self
            .store
            .create_pizza_with_associations(size, &associations)
            .map_err(|e| {
                tracing::error!("Failed to persist pizza: {}", e);
                PizzeriaError::Unavailable(e)
            })?;

        tracing::info!(
            "Created {} pizza {} with {} ingredients",
            size.as_str(),
            pizza.id,
            pizza.ingredients.len()
        );
        Ok(pizza)
    }

    fn resolve(
        &self,
        placements: &[Placement],
        kind: IngredientKind,
    ) -> Result<Vec<NewAssociation>> {
        let ids = self
            .catalog
            .resolve_many(placements.iter().map(|p| p.name.as_str()), kind)?;

        placements
            .iter()
            .map(|p| -> Result<NewAssociation> {
                let ingredient_id = ids
                    .get(&p.name)
                    .cloned()
                    .ok_or_else(|| PizzeriaError::ingredient_not_found(kind, &p.name))?;
                Ok(NewAssociation {
                    ingredient_id,
                    amount: p.amount,
                    section: p.section,
                })
            })
            .collect()
    }

    pub fn find_pizza(&self, id: &str) -> Result<Pizza> {
        self.store
            .find_pizza(id)?
            .ok_or_else(|| PizzeriaError::pizza_not_found(id))
    }

    /// Delete a pizza and its ingredient associations
    pub fn delete_pizza(&self, id: &str) -> Result<()> {
        if !self.store.delete_pizza(id)? {
            return Err(PizzeriaError::pizza_not_found(id));
        }

        tracing::info!("Deleted pizza {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientAmount, IngredientSection};
    use crate::state::{PizzeriaDb, SqliteStore};

    struct Kitchen {
        db: PizzeriaDb,
        catalog: IngredientCatalog,
        assembler: PizzaAssembler,
    }

    impl Kitchen {
        fn new() -> Self {
            let db = PizzeriaDb::open_in_memory().unwrap();
            let store: Arc<dyn DataStore> = Arc::new(SqliteStore::new(&db));
            let catalog = IngredientCatalog::new(Arc::clone(&store));
            for sauce in ["tomato", "bbq"] {
                catalog.add(sauce, IngredientKind::Sauce).unwrap();
            }
            for topping in ["cheese", "olives"] {
                catalog.add(topping, IngredientKind::Topping).unwrap();
            }
            Self {
                db,
                catalog,
                assembler: PizzaAssembler::new(store),
            }
        }

        fn rows(&self, table: &str) -> i64 {
            self.db
                .with_conn(|conn| {
                    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                        row.get(0)
                    })?)
                })
                .unwrap()
        }
    }

    fn placed(name: &str, section: IngredientSection) -> PlacementRequest {
        PlacementRequest::new(name).on(section)
    }

    #[test]
    fn test_apply_defaults() {
        let placement = apply_defaults(&PlacementRequest::new("Tomato")).unwrap();
        assert_eq!(placement.name, "tomato");
        assert_eq!(placement.amount, IngredientAmount::Regular);
        assert_eq!(placement.section, IngredientSection::Whole);

        let placement = apply_defaults(
            &PlacementRequest::new("olives")
                .on(IngredientSection::Left)
                .with_amount(IngredientAmount::Light),
        )
        .unwrap();
        assert_eq!(placement.amount, IngredientAmount::Light);
        assert_eq!(placement.section, IngredientSection::Left);
    }

    #[test]
    fn test_create_pizza_with_split_toppings() {
        let kitchen = Kitchen::new();

        let pizza = kitchen
            .assembler
            .create_pizza(
                PizzaSize::Medium,
                &[placed("tomato", IngredientSection::Whole)],
                &[
                    placed("cheese", IngredientSection::Left),
                    placed("olives", IngredientSection::Right),
                ],
            )
            .unwrap();

        assert_eq!(pizza.size, PizzaSize::Medium);
        let names: Vec<_> = pizza
            .ingredients
            .iter()
            .map(|pi| pi.ingredient.name.as_str())
            .collect();
        assert_eq!(names, vec!["tomato", "cheese", "olives"]);
        assert_eq!(pizza.sauces().count(), 1);
        assert_eq!(pizza.toppings().count(), 2);
        assert_eq!(kitchen.assembler.find_pizza(&pizza.id).unwrap(), pizza);
    }

    #[test]
    fn test_defaults_applied_on_create() {
        let kitchen = Kitchen::new();

        let pizza = kitchen
            .assembler
            .create_pizza(
                PizzaSize::Personal,
                &[PlacementRequest::new("TOMATO")],
                &[PlacementRequest::new("Cheese").with_amount(IngredientAmount::Extra)],
            )
            .unwrap();

        assert_eq!(pizza.ingredients[0].amount, IngredientAmount::Regular);
        assert_eq!(pizza.ingredients[0].section, IngredientSection::Whole);
        assert_eq!(pizza.ingredients[1].amount, IngredientAmount::Extra);
    }

    #[test]
    fn test_half_sauce_is_invalid_and_writes_nothing() {
        let kitchen = Kitchen::new();

        let err = kitchen
            .assembler
            .create_pizza(
                PizzaSize::Small,
                &[placed("tomato", IngredientSection::Left)],
                &[placed("cheese", IngredientSection::Whole)],
            )
            .unwrap_err();

        assert!(matches!(err, PizzeriaError::InvalidComposition(_)));
        assert_eq!(err.to_string(), "pizza sauces and toppings must cover entire pizza");
        assert_eq!(kitchen.rows("pizzas"), 0);
        assert_eq!(kitchen.rows("pizza_ingredients"), 0);
    }

    #[test]
    fn test_toppings_checked_independently() {
        let kitchen = Kitchen::new();

        // Sauces cover the pizza, toppings only the right half
        let err = kitchen
            .assembler
            .create_pizza(
                PizzaSize::Large,
                &[
                    placed("tomato", IngredientSection::Left),
                    placed("bbq", IngredientSection::Right),
                ],
                &[placed("olives", IngredientSection::Right)],
            )
            .unwrap_err();
        assert!(matches!(err, PizzeriaError::InvalidComposition(_)));

        let err = kitchen
            .assembler
            .create_pizza(PizzaSize::Large, &[placed("tomato", IngredientSection::Whole)], &[])
            .unwrap_err();
        assert!(matches!(err, PizzeriaError::InvalidComposition(_)));
    }

    #[test]
    fn test_unknown_ingredient_is_not_found_and_writes_nothing() {
        let kitchen = Kitchen::new();

        let err = kitchen
            .assembler
            .create_pizza(
                PizzaSize::Xl,
                &[placed("tomato", IngredientSection::Whole)],
                &[
                    placed("cheese", IngredientSection::Whole),
                    placed("pineapple", IngredientSection::Left),
                ],
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "could not find topping named pineapple");
        assert_eq!(kitchen.rows("pizzas"), 0);
        assert_eq!(kitchen.rows("pizza_ingredients"), 0);
    }

    #[test]
    fn test_sauce_name_is_not_a_topping() {
        let kitchen = Kitchen::new();

        let err = kitchen
            .assembler
            .create_pizza(
                PizzaSize::Small,
                &[placed("tomato", IngredientSection::Whole)],
                &[placed("bbq", IngredientSection::Whole)],
            )
            .unwrap_err();
        assert!(matches!(err, PizzeriaError::NotFound(_)));
    }

    #[test]
    fn test_soft_deleted_ingredient_cannot_be_ordered() {
        let kitchen = Kitchen::new();
        kitchen
            .catalog
            .soft_delete("olives", IngredientKind::Topping)
            .unwrap();

        let err = kitchen
            .assembler
            .create_pizza(
                PizzaSize::Small,
                &[placed("tomato", IngredientSection::Whole)],
                &[placed("olives", IngredientSection::Whole)],
            )
            .unwrap_err();
        assert!(matches!(err, PizzeriaError::NotFound(_)));
    }

    #[test]
    fn test_existing_pizza_keeps_soft_deleted_ingredient() {
        let kitchen = Kitchen::new();
        let pizza = kitchen
            .assembler
            .create_pizza(
                PizzaSize::Small,
                &[placed("bbq", IngredientSection::Whole)],
                &[placed("cheese", IngredientSection::Whole)],
            )
            .unwrap();

        kitchen
            .catalog
            .soft_delete("bbq", IngredientKind::Sauce)
            .unwrap();

        let reloaded = kitchen.assembler.find_pizza(&pizza.id).unwrap();
        assert_eq!(reloaded.ingredients[0].ingredient.name, "bbq");
        assert!(reloaded.ingredients[0].ingredient.deleted_at.is_some());
    }

    #[test]
    fn test_delete_pizza() {
        let kitchen = Kitchen::new();

        let err = kitchen.assembler.delete_pizza("missing").unwrap_err();
        assert_eq!(err.to_string(), "could not find pizza with ID missing");

        let pizza = kitchen
            .assembler
            .create_order(&PizzaOrder {
                size: PizzaSize::Small,
                sauces: vec![placed("tomato", IngredientSection::Whole)],
                toppings: vec![placed("cheese", IngredientSection::Whole)],
            })
            .unwrap();
        assert_eq!(kitchen.rows("pizza_ingredients"), 2);

        kitchen.assembler.delete_pizza(&pizza.id).unwrap();
        assert!(matches!(
            kitchen.assembler.find_pizza(&pizza.id),
            Err(PizzeriaError::NotFound(_))
        ));
        assert_eq!(kitchen.rows("pizza_ingredients"), 0);
        // Catalog is untouched by pizza deletion
        assert_eq!(kitchen.rows("ingredients"), 4);

        // Second delete of the same pizza reports it missing
        let err = kitchen.assembler.delete_pizza(&pizza.id).unwrap_err();
        assert!(matches!(err, PizzeriaError::NotFound(_)));
    }

    #[test]
    fn test_order_deserializes_with_defaults() {
        let order: PizzaOrder = serde_json::from_str(
            r#"{"size":"PERSONAL","sauces":[{"name":"tomato"}],"toppings":[{"name":"cheese","section":"LEFT"},{"name":"olives","section":"RIGHT","amount":"EXTRA"}]}"#,
        )
        .unwrap();

        assert_eq!(order.size, PizzaSize::Personal);
        assert_eq!(order.toppings[1].amount, Some(IngredientAmount::Extra));
        assert!(Kitchen::new().assembler.create_order(&order).is_ok());
    }
}
