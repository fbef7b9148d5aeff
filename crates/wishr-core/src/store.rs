use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::WishrError;
use crate::models::item::WishlistItem;

/// Whole-document persistence for the wishlist collection.
///
/// `save` must be all-or-nothing: after a failed save the previously saved
/// collection is still what `load` returns. No locking is implied; with
/// several writers the last save wins.
pub trait Store: Send {
    /// Read the persisted collection. An absent document is an empty list.
    fn load(&self) -> Result<Vec<WishlistItem>, WishrError>;

    /// Replace the persisted collection with `items`.
    fn save(&self, items: &[WishlistItem]) -> Result<(), WishrError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn load(&self) -> Result<Vec<WishlistItem>, WishrError> {
        (**self).load()
    }

    fn save(&self, items: &[WishlistItem]) -> Result<(), WishrError> {
        (**self).save(items)
    }
}

impl<S: Store + Sync> Store for &S {
    fn load(&self) -> Result<Vec<WishlistItem>, WishrError> {
        (**self).load()
    }

    fn save(&self, items: &[WishlistItem]) -> Result<(), WishrError> {
        (**self).save(items)
    }
}

/// Collection-level checks a backend runs on load. Per-record invariants
/// are enforced when each record is decoded.
pub fn check_unique_ids(items: &[WishlistItem]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(format!("duplicate item id {}", item.id()));
        }
    }
    Ok(())
}

/// In-memory store for testing.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<Vec<WishlistItem>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<WishlistItem>) -> Self {
        Self {
            items: Mutex::new(items),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make every following `save` fail as if the disk were full.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The last successfully saved collection.
    pub fn snapshot(&self) -> Vec<WishlistItem> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Vec<WishlistItem>, WishrError> {
        Ok(self.snapshot())
    }

    fn save(&self, items: &[WishlistItem]) -> Result<(), WishrError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(WishrError::Io(std::io::Error::other("simulated write failure")));
        }
        *self
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = items.to_vec();
        Ok(())
    }
}
