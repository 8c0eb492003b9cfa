//! # Kitchen
//!
//! Ingredient catalog lifecycle and pizza assembly on top of a `DataStore`.

pub mod assembler;
pub mod catalog;
pub mod coverage;

pub use assembler::{apply_defaults, PizzaAssembler, PizzaOrder};
pub use catalog::{normalize_name, IngredientCatalog};
pub use coverage::{check_coverage, covers_whole_pizza};
