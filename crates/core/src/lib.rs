//! # Pizzeria Core
//!
//! Business logic and persistence for composing pizzas from a soft-deletable
//! catalog of sauces and toppings.
//!
//! ## Architecture
//!
//! - `models` - Ingredient, placement and pizza types
//! - `error` - Store and domain error taxonomy
//! - `state/` - SQLite database handle, schema, seed data, `DataStore`
//! - `kitchen/` - `IngredientCatalog` and `PizzaAssembler`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pizzeria_core::kitchen::{IngredientCatalog, PizzaAssembler};
//! use pizzeria_core::state::{PizzeriaDb, SqliteStore};
//!
//! let db = PizzeriaDb::open_at(".pizzeria/pizzeria.db")?;
//! let store = Arc::new(SqliteStore::new(&db));
//! let catalog = IngredientCatalog::new(store.clone());
//! catalog.add("pesto", IngredientKind::Sauce)?;
//! ```

pub mod error;
pub mod kitchen;
pub mod models;
pub mod state;

pub use error::{Missing, PizzeriaError, StoreError};
