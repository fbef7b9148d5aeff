use std::io::Write;
use std::path::{Path, PathBuf};

use wishr_core::error::WishrError;
use wishr_core::models::item::WishlistItem;
use wishr_core::store::{check_unique_ids, Store};

/// The wishlist as one JSON array on disk.
///
/// Saves go through a temporary file in the same directory that is renamed
/// over the document, so readers see either the old or the new collection.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, message: impl Into<String>) -> WishrError {
        WishrError::CorruptStore {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Vec<WishlistItem>, WishrError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no wishlist document yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let items: Vec<WishlistItem> =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;
        check_unique_ids(&items).map_err(|m| self.corrupt(m))?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "loaded document");
        Ok(items)
    }

    fn save(&self, items: &[WishlistItem]) -> Result<(), WishrError> {
        let dir = self.dir();
        std::fs::create_dir_all(dir)?;

        let bytes =
            serde_json::to_vec_pretty(items).map_err(|e| WishrError::Serialization(e.to_string()))?;
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(&bytes)?;
        temp.write_all(b"\n")?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| WishrError::Io(e.error))?;
        sync_dir(dir)?;

        tracing::debug!(path = %self.path.display(), count = items.len(), "saved document");
        Ok(())
    }
}

/// Flush the directory entry so the rename survives a power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<(), WishrError> {
    std::fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<(), WishrError> {
    Ok(())
}
