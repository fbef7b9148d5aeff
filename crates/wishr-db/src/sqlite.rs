use rusqlite::Connection;
use std::path::{Path, PathBuf};

use wishr_core::error::WishrError;
use wishr_core::models::item::{ItemRecord, WishlistItem};
use wishr_core::store::{check_unique_ids, Store};

use crate::ops;

/// The wishlist kept in an embedded SQLite database.
///
/// Each save rewrites the whole collection inside one transaction.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, WishrError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = crate::open_db(path).map_err(database_error)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// In-memory database for testing.
    pub fn open_in_memory() -> Result<Self, WishrError> {
        let conn = crate::open_memory_db().map_err(database_error)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    fn corrupt(&self, message: impl Into<String>) -> WishrError {
        WishrError::CorruptStore {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

fn database_error(e: anyhow::Error) -> WishrError {
    WishrError::Database(e.to_string())
}

impl Store for SqliteStore {
    fn load(&self) -> Result<Vec<WishlistItem>, WishrError> {
        let records = ops::list_items(&self.conn).map_err(|e| {
            let unreadable_row = matches!(
                e.downcast_ref::<rusqlite::Error>(),
                Some(rusqlite::Error::FromSqlConversionFailure(..))
            );
            if unreadable_row {
                self.corrupt(e.to_string())
            } else {
                database_error(e)
            }
        })?;
        let items = records
            .into_iter()
            .map(WishlistItem::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|m| self.corrupt(m))?;
        check_unique_ids(&items).map_err(|m| self.corrupt(m))?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "loaded database");
        Ok(items)
    }

    fn save(&self, items: &[WishlistItem]) -> Result<(), WishrError> {
        let records: Vec<ItemRecord> = items.iter().cloned().map(ItemRecord::from).collect();
        ops::replace_items(&self.conn, &records).map_err(database_error)?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "saved database");
        Ok(())
    }
}
