//! # Pizzeria Models
//!
//! Domain types shared by the catalog, the assembler, and the HTTP layer.
//! Every enum serializes as the SCREAMING_CASE string that is also stored in SQLite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PizzeriaError;

/// Category of a catalog ingredient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientKind {
    Sauce,
    Topping,
}

impl IngredientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sauce => "SAUCE",
            Self::Topping => "TOPPING",
        }
    }

    /// Lowercase label used in user-facing messages ("sauce", "topping")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sauce => "sauce",
            Self::Topping => "topping",
        }
    }
}

impl FromStr for IngredientKind {
    type Err = PizzeriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SAUCE" => Ok(Self::Sauce),
            "TOPPING" => Ok(Self::Topping),
            other => Err(PizzeriaError::Invalid(format!(
                "unknown ingredient kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How much of an ingredient goes on the pizza
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientAmount {
    Light,
    #[default]
    Regular,
    Extra,
}

impl IngredientAmount {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "LIGHT",
            Self::Regular => "REGULAR",
            Self::Extra => "EXTRA",
        }
    }
}

impl FromStr for IngredientAmount {
    type Err = PizzeriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIGHT" => Ok(Self::Light),
            "REGULAR" => Ok(Self::Regular),
            "EXTRA" => Ok(Self::Extra),
            other => Err(PizzeriaError::Invalid(format!(
                "unknown ingredient amount '{}'",
                other
            ))),
        }
    }
}

/// Which part of the pizza surface an ingredient covers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngredientSection {
    #[default]
    Whole,
    Left,
    Right,
}

impl IngredientSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whole => "WHOLE",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

impl FromStr for IngredientSection {
    type Err = PizzeriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WHOLE" => Ok(Self::Whole),
            "LEFT" => Ok(Self::Left),
            "RIGHT" => Ok(Self::Right),
            other => Err(PizzeriaError::Invalid(format!(
                "unknown ingredient section '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PizzaSize {
    Personal,
    Small,
    Medium,
    Large,
    #[serde(rename = "XL")]
    Xl,
}

impl PizzaSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
            Self::Xl => "XL",
        }
    }
}

impl FromStr for PizzaSize {
    type Err = PizzeriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERSONAL" => Ok(Self::Personal),
            "SMALL" => Ok(Self::Small),
            "MEDIUM" => Ok(Self::Medium),
            "LARGE" => Ok(Self::Large),
            "XL" => Ok(Self::Xl),
            other => Err(PizzeriaError::Invalid(format!(
                "unknown pizza size '{}'",
                other
            ))),
        }
    }
}

/// A sauce or topping in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Stable identifier, never reused after soft deletion
    pub id: String,
    /// Normalized (lowercase) name
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IngredientKind,
    /// Set once the ingredient is soft-deleted
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A placement as submitted by a caller; missing fields get defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacementRequest {
    pub name: String,
    #[serde(default)]
    pub amount: Option<IngredientAmount>,
    #[serde(default)]
    pub section: Option<IngredientSection>,
}

impl PlacementRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: None,
            section: None,
        }
    }

    pub fn on(mut self, section: IngredientSection) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_amount(mut self, amount: IngredientAmount) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// A placement after defaulting and name normalization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub name: String,
    pub amount: IngredientAmount,
    pub section: IngredientSection,
}

/// A placement resolved to a concrete catalog identifier, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssociation {
    pub ingredient_id: String,
    pub amount: IngredientAmount,
    pub section: IngredientSection,
}

/// One ingredient row attached to a pizza
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PizzaIngredient {
    pub id: String,
    pub ingredient: Ingredient,
    pub amount: IngredientAmount,
    pub section: IngredientSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pizza {
    pub id: String,
    pub size: PizzaSize,
    pub created_at: DateTime<Utc>,
    /// Associations in request order: sauces first, then toppings
    pub ingredients: Vec<PizzaIngredient>,
}

impl Pizza {
    pub fn sauces(&self) -> impl Iterator<Item = &PizzaIngredient> {
        self.ingredients
            .iter()
            .filter(|pi| pi.ingredient.kind == IngredientKind::Sauce)
    }

    pub fn toppings(&self) -> impl Iterator<Item = &PizzaIngredient> {
        self.ingredients
            .iter()
            .filter(|pi| pi.ingredient.kind == IngredientKind::Topping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(
            serde_json::to_string(&IngredientKind::Topping).unwrap(),
            "\"TOPPING\""
        );
        assert_eq!(serde_json::to_string(&PizzaSize::Xl).unwrap(), "\"XL\"");
        let size: PizzaSize = serde_json::from_str("\"PERSONAL\"").unwrap();
        assert_eq!(size, PizzaSize::Personal);
    }

    #[test]
    fn test_as_str_matches_from_str() {
        for size in [
            PizzaSize::Personal,
            PizzaSize::Small,
            PizzaSize::Medium,
            PizzaSize::Large,
            PizzaSize::Xl,
        ] {
            assert_eq!(size.as_str().parse::<PizzaSize>().unwrap(), size);
        }
        assert_eq!(
            "RIGHT".parse::<IngredientSection>().unwrap(),
            IngredientSection::Right
        );
    }

    #[test]
    fn test_unknown_enum_is_rejected() {
        assert!("HALF".parse::<IngredientSection>().is_err());
        assert!("GIANT".parse::<PizzaSize>().is_err());
        assert!(serde_json::from_str::<IngredientAmount>("\"TONS\"").is_err());
    }

    #[test]
    fn test_placement_request_defaults_missing_fields() {
        let req: PlacementRequest = serde_json::from_str(r#"{"name":"Tomato"}"#).unwrap();
        assert_eq!(req.amount, None);
        assert_eq!(req.section, None);
        assert_eq!(IngredientAmount::default(), IngredientAmount::Regular);
        assert_eq!(IngredientSection::default(), IngredientSection::Whole);
    }
}
