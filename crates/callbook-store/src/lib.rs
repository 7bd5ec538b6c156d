pub mod backend;
pub mod clock;
pub mod db;
pub mod document;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod sqlite;
mod store;

pub use backend::{DocumentBackend, Precondition, SortDirection};
pub use error::{Result, StoreError, StoreErrorKind};
pub use sqlite::SqliteBackend;
pub use store::CallStore;
