//! # SQLite DataStore
//!
//! `DataStore` backed by the shared `PizzeriaDb` connection. Multi-row writes
//! run inside a rusqlite transaction so a failure leaves nothing behind.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;

use super::db::PizzeriaDb;
use super::store::DataStore;
use crate::error::StoreError;
use crate::models::{
    Ingredient, IngredientKind, NewAssociation, Pizza, PizzaIngredient, PizzaSize,
};

const INGREDIENT_COLUMNS: &str = "id, name, kind, deleted_at";

/// SQLite-backed store using the shared PizzeriaDb connection
#[derive(Clone)]
pub struct SqliteStore {
    db: PizzeriaDb,
}

impl SqliteStore {
    /// Create from a PizzeriaDb handle
    pub fn new(db: &PizzeriaDb) -> Self {
        Self { db: db.clone() }
    }

    pub fn db(&self) -> &PizzeriaDb {
        &self.db
    }
}

impl DataStore for SqliteStore {
    fn find_ingredient(
        &self,
        name: &str,
        kind: IngredientKind,
    ) -> Result<Option<Ingredient>, StoreError> {
        self.db.with_conn(|conn| {
            let ingredient = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM ingredients WHERE name = ?1 AND kind = ?2 AND deleted_at IS NULL",
                        INGREDIENT_COLUMNS
                    ),
                    params![name, kind.as_str()],
                    |row| row_to_ingredient(row, 0),
                )
                .optional()?;
            Ok(ingredient)
        })
    }

    fn find_ingredient_by_id(&self, id: &str) -> Result<Option<Ingredient>, StoreError> {
        self.db.with_conn(|conn| {
            let ingredient = conn
                .query_row(
                    &format!("SELECT {} FROM ingredients WHERE id = ?1", INGREDIENT_COLUMNS),
                    params![id],
                    |row| row_to_ingredient(row, 0),
                )
                .optional()?;
            Ok(ingredient)
        })
    }

    fn insert_ingredient(
        &self,
        name: &str,
        kind: IngredientKind,
    ) -> Result<Ingredient, StoreError> {
        let ingredient = Ingredient {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            kind,
            deleted_at: None,
        };

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO ingredients (id, name, kind, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    ingredient.id,
                    ingredient.name,
                    kind.as_str(),
                    Utc::now().to_rfc3339()
                ],
            )
            .map_err(StoreError::from_insert)?;
            Ok(())
        })?;

        Ok(ingredient)
    }

    fn soft_delete_ingredient(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE ingredients SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
                params![at.to_rfc3339(), id],
            )?;
            Ok(affected > 0)
        })
    }

    fn list_ingredients(&self, kind: IngredientKind) -> Result<Vec<Ingredient>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM ingredients WHERE kind = ?1 AND deleted_at IS NULL ORDER BY created_at, rowid",
                INGREDIENT_COLUMNS
            ))?;

            let ingredients = stmt
                .query_map(params![kind.as_str()], |row| row_to_ingredient(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ingredients)
        })
    }

    fn create_pizza_with_associations(
        &self,
        size: PizzaSize,
        associations: &[NewAssociation],
    ) -> Result<Pizza, StoreError> {
        let pizza_id = uuid::Uuid::new_v4().to_string();

        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO pizzas (id, size, created_at) VALUES (?1, ?2, ?3)",
                params![pizza_id, size.as_str(), Utc::now().to_rfc3339()],
            )?;

            for (position, association) in associations.iter().enumerate() {
                tx.execute(
                    r#"
                    INSERT INTO pizza_ingredients (id, pizza_id, ingredient_id, amount, section, position)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        uuid::Uuid::new_v4().to_string(),
                        pizza_id,
                        association.ingredient_id,
                        association.amount.as_str(),
                        association.section.as_str(),
                        position as i64,
                    ],
                )?;
            }

            let pizza = load_pizza(&tx, &pizza_id)?.ok_or(StoreError::Sqlite(
                rusqlite::Error::QueryReturnedNoRows,
            ))?;

            tx.commit()?;
            Ok(pizza)
        })
    }

    fn find_pizza(&self, id: &str) -> Result<Option<Pizza>, StoreError> {
        self.db.with_conn(|conn| load_pizza(conn, id))
    }

    fn delete_pizza(&self, id: &str) -> Result<bool, StoreError> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM pizza_ingredients WHERE pizza_id = ?1",
                params![id],
            )?;
            let affected = tx.execute("DELETE FROM pizzas WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(affected > 0)
        })
    }
}

fn load_pizza(conn: &Connection, id: &str) -> Result<Option<Pizza>, StoreError> {
    let header = conn
        .query_row(
            "SELECT id, size, created_at FROM pizzas WHERE id = ?1",
            params![id],
            |row| {
                let id: String = row.get(0)?;
                let size: PizzaSize = parse_column(row, 1)?;
                let created_at = parse_timestamp(row, 2)?;
                Ok((id, size, created_at))
            },
        )
        .optional()?;

    let Some((id, size, created_at)) = header else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        r#"
        SELECT pi.id, pi.amount, pi.section, i.id, i.name, i.kind, i.deleted_at
        FROM pizza_ingredients pi
        JOIN ingredients i ON i.id = pi.ingredient_id
        WHERE pi.pizza_id = ?1
        ORDER BY pi.position
        "#,
    )?;

    let ingredients = stmt
        .query_map(params![id], |row| {
            Ok(PizzaIngredient {
                id: row.get(0)?,
                amount: parse_column(row, 1)?,
                section: parse_column(row, 2)?,
                ingredient: row_to_ingredient(row, 3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Pizza {
        id,
        size,
        created_at,
        ingredients,
    }))
}

/// Read `id, name, kind, deleted_at` starting at column `offset`
fn row_to_ingredient(row: &Row, offset: usize) -> rusqlite::Result<Ingredient> {
    let deleted_at: Option<String> = row.get(offset + 3)?;
    let deleted_at = match deleted_at {
        Some(raw) => Some(parse_rfc3339(offset + 3, &raw)?),
        None => None,
    };

    Ok(Ingredient {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        kind: parse_column(row, offset + 2)?,
        deleted_at,
    })
}

fn parse_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_rfc3339(idx, &raw)
}

fn parse_rfc3339(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
