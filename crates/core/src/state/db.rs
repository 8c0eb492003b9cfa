//! # Pizzeria Database
//!
//! Single SQLite database holding the ingredient catalog and composed pizzas.
//! The handle is constructed explicitly and closed explicitly; there is no
//! process-wide connection.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::seed;
use crate::error::StoreError;
use crate::models::IngredientKind;

/// Schema version for migrations
const SCHEMA_VERSION: i32 = 1;

type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database handle shared by the store implementation
#[derive(Clone)]
pub struct PizzeriaDb {
    conn: SharedConnection,
}

impl PizzeriaDb {
    /// Open or create the database at `path`, creating parent directories
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {:?}", parent)
                })?;
            }
        }

        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open pizzeria database {:?}", path.as_ref()))?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database (tests, throwaway runs)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Cascading pizza deletes rely on this; it is per-connection in SQLite
        conn.pragma_update(None, "foreign_keys", true)?;

        let db = Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Run `f` against the live connection
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        f(conn)
    }

    pub fn is_open(&self) -> bool {
        self.conn.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    /// Close the underlying connection. Later calls on any clone of this
    /// handle fail with `StoreError::Closed`.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
            tracing::info!("PizzeriaDb closed");
        }
        Ok(())
    }

    /// Run schema migrations
    fn run_migrations(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
                [],
            )?;

            let current_version: i32 = conn.query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )?;

            if current_version < 1 {
                migrate_v1(conn)?;
                conn.execute(
                    "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                    [1],
                )?;
            }
            Ok(())
        })
        .context("Failed to run schema migrations")
    }

    // =========================================================================
    // Seed Methods
    // =========================================================================

    /// Insert the default sauces and toppings for every category that has
    /// no active ingredients. Returns the number of rows inserted.
    pub fn seed_ingredients(&self) -> Result<usize> {
        let inserted = self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;

            for (kind, names) in [
                (IngredientKind::Sauce, seed::SAUCES),
                (IngredientKind::Topping, seed::TOPPINGS),
            ] {
                let count: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM ingredients WHERE kind = ?1 AND deleted_at IS NULL",
                    params![kind.as_str()],
                    |row| row.get(0),
                )?;

                if count > 0 {
                    tracing::debug!("{} catalog already seeded ({} found)", kind, count);
                    continue;
                }

                let now = Utc::now().to_rfc3339();
                for name in names {
                    tx.execute(
                        "INSERT INTO ingredients (id, name, kind, created_at) VALUES (?1, ?2, ?3, ?4)",
                        params![uuid::Uuid::new_v4().to_string(), *name, kind.as_str(), now],
                    )?;
                    inserted += 1;
                }
            }

            tx.commit()?;
            Ok(inserted)
        })?;

        tracing::info!("Seeded {} default ingredients", inserted);
        Ok(inserted)
    }
}

/// Migration to version 1 - complete schema
fn migrate_v1(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS ingredients (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('SAUCE', 'TOPPING')),
            created_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
        [],
    )?;

    // At most one active ingredient per (name, kind); deleted rows are exempt
    conn.execute(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_ingredients_active_name
        ON ingredients(name, kind) WHERE deleted_at IS NULL
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS pizzas (
            id TEXT PRIMARY KEY,
            size TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS pizza_ingredients (
            id TEXT PRIMARY KEY,
            pizza_id TEXT NOT NULL REFERENCES pizzas(id) ON DELETE CASCADE,
            ingredient_id TEXT NOT NULL REFERENCES ingredients(id),
            amount TEXT NOT NULL,
            section TEXT NOT NULL,
            position INTEGER NOT NULL
        )
        "#,
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_pizza_ingredients_pizza ON pizza_ingredients(pizza_id)",
        [],
    )?;

    tracing::info!(
        "PizzeriaDb initialized with schema version {}",
        SCHEMA_VERSION
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(db: &PizzeriaDb) -> Vec<String> {
        db.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
        .unwrap()
    }

    #[test]
    fn test_open_creates_tables() {
        let db = PizzeriaDb::open_in_memory().unwrap();
        let tables = table_names(&db);

        assert!(tables.contains(&"ingredients".to_string()));
        assert!(tables.contains(&"pizzas".to_string()));
        assert!(tables.contains(&"pizza_ingredients".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_schema_version_tracking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("pizzeria.db");

        // Open twice - should not fail on second open
        let db1 = PizzeriaDb::open_at(&path).unwrap();
        db1.close().unwrap();

        let db2 = PizzeriaDb::open_at(&path).unwrap();
        let version: i32 = db2
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();

        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let db = PizzeriaDb::open_in_memory().unwrap();

        let count = db.seed_ingredients().unwrap();
        assert_eq!(count, seed::SAUCES.len() + seed::TOPPINGS.len());

        let count2 = db.seed_ingredients().unwrap();
        assert_eq!(count2, 0, "Should not re-seed");
    }

    #[test]
    fn test_active_name_index_rejects_duplicates() {
        let db = PizzeriaDb::open_in_memory().unwrap();
        let insert = |id: &str, deleted_at: Option<&str>| {
            db.with_conn(|conn| {
                conn.execute(
                    "INSERT INTO ingredients (id, name, kind, created_at, deleted_at) VALUES (?1, 'pesto', 'SAUCE', 'now', ?2)",
                    params![id, deleted_at],
                )
                .map_err(StoreError::from_insert)
            })
        };

        insert("a", Some("yesterday")).unwrap();
        insert("b", None).unwrap();
        assert!(matches!(insert("c", None), Err(StoreError::Duplicate)));
    }

    #[test]
    fn test_closed_handle_is_unusable() {
        let db = PizzeriaDb::open_in_memory().unwrap();
        let clone = db.clone();
        db.close().unwrap();

        assert!(!clone.is_open());
        assert!(matches!(
            clone.with_conn(|_| Ok(())),
            Err(StoreError::Closed)
        ));
        // Closing twice is a no-op
        clone.close().unwrap();
    }
}
