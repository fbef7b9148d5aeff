pub mod json;
pub mod migration;
pub mod ops;
pub mod schema;
pub mod sqlite;

use rusqlite::Connection;
use std::path::Path;

use wishr_core::config::{StoreBackend, WishrConfig};
use wishr_core::error::WishrError;
use wishr_core::store::Store;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;

/// Open (or create) the wishr database at the given path and run migrations.
pub fn open_db(path: &Path) -> anyhow::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    migration::run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database for testing.
pub fn open_memory_db() -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migration::run_migrations(&conn)?;
    Ok(conn)
}

/// Open the store selected by `config`.
pub fn open_store(config: &WishrConfig) -> Result<Box<dyn Store>, WishrError> {
    let path = config.resolved_data_path()?;
    tracing::debug!(backend = %config.backend, path = %path.display(), "opening store");
    match config.backend {
        StoreBackend::Json => Ok(Box::new(JsonFileStore::new(path))),
        StoreBackend::Sqlite => Ok(Box::new(SqliteStore::open(&path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_store_per_backend() {
        let dir = tempfile::tempdir().unwrap();
        for (backend, file) in [
            (StoreBackend::Json, "wishes.json"),
            (StoreBackend::Sqlite, "wishes.db"),
        ] {
            let config = WishrConfig {
                backend,
                data_path: Some(dir.path().join(file)),
                ..WishrConfig::default()
            };
            let store = open_store(&config).unwrap();
            assert!(store.load().unwrap().is_empty());
        }
    }
}
