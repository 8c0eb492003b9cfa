pub mod db;
pub mod seed;
pub mod sqlite_store;
pub mod store;

pub use db::PizzeriaDb;
pub use sqlite_store::SqliteStore;
pub use store::DataStore;
