pub mod config_io;
pub mod migrate;
pub mod sqlite;
pub mod state;
pub mod store;

pub use sqlite::SqliteStore;
pub use store::{Store, StoreError};
