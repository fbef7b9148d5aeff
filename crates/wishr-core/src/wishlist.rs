use chrono::NaiveDate;

use crate::error::WishrError;
use crate::models::item::{ItemId, WishlistItem};
use crate::models::session::{Role, Session};
use crate::store::Store;

/// Source of "today" for `dateAdded` and `purchaseDate`.
pub trait Clock: Send {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the running machine.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

impl Clock for NaiveDate {
    fn today(&self) -> NaiveDate {
        *self
    }
}

/// Purchase summary shown to viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub bought: usize,
    pub unbought: usize,
}

/// The wishlist collection and its role-gated operations.
///
/// Every mutation persists the full collection through the [`Store`]. When
/// the save fails the in-memory change is undone, so `items()` always
/// matches the last successful save.
pub struct Wishlist<S: Store> {
    store: S,
    items: Vec<WishlistItem>,
    clock: Box<dyn Clock>,
}

impl<S: Store> Wishlist<S> {
    /// Load the collection from `store`.
    pub fn open(store: S) -> Result<Self, WishrError> {
        let items = store.load()?;
        tracing::debug!(count = items.len(), "loaded wishlist");
        Ok(Self {
            store,
            items,
            clock: Box::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Current collection, in insertion order.
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&WishlistItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn stats(&self) -> Stats {
        let bought = self.items.iter().filter(|item| item.is_bought()).count();
        Stats {
            total: self.items.len(),
            bought,
            unbought: self.items.len() - bought,
        }
    }

    /// Re-read the collection from the store.
    pub fn reload(&mut self) -> Result<(), WishrError> {
        self.items = self.store.load()?;
        tracing::debug!(count = self.items.len(), "reloaded wishlist");
        Ok(())
    }

    /// Find the item with a full id or a unique id prefix.
    pub fn resolve(&self, prefix: &str) -> Result<&WishlistItem, WishrError> {
        let prefix = prefix.trim().to_lowercase();
        if let Ok(id) = prefix.parse::<ItemId>() {
            if let Some(item) = self.get(&id) {
                return Ok(item);
            }
        }
        let matches: Vec<&WishlistItem> = self
            .items
            .iter()
            .filter(|item| !prefix.is_empty() && item.id().to_string().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [item] => Ok(*item),
            [] => Err(WishrError::NotFound { id: prefix }),
            _ => Err(WishrError::AmbiguousId {
                matches: matches.len(),
                prefix,
            }),
        }
    }

    /// Add a new item. Owner only.
    pub fn create(
        &mut self,
        session: &Session,
        name: &str,
        description: Option<&str>,
        url: Option<&str>,
    ) -> Result<WishlistItem, WishrError> {
        session.require(Role::Owner, "add items")?;

        let mut id = ItemId::new();
        while self.get(&id).is_some() {
            id = ItemId::new();
        }
        let item = WishlistItem::create(id, name, description, url, self.clock.today())?;

        self.items.push(item.clone());
        if let Err(e) = self.store.save(&self.items) {
            self.items.pop();
            tracing::warn!(error = %e, "save failed, add rolled back");
            return Err(e);
        }
        tracing::info!(id = %item.id(), name = item.name(), "item added");
        Ok(item)
    }

    /// Delete an item permanently. Owner only.
    pub fn remove(&mut self, session: &Session, id: &ItemId) -> Result<WishlistItem, WishrError> {
        session.require(Role::Owner, "remove items")?;

        let index = self.position(id)?;
        let removed = self.items.remove(index);
        if let Err(e) = self.store.save(&self.items) {
            self.items.insert(index, removed);
            tracing::warn!(error = %e, "save failed, removal rolled back");
            return Err(e);
        }
        tracing::info!(id = %removed.id(), name = removed.name(), "item removed");
        Ok(removed)
    }

    /// Record that `buyer_name` bought the item. Viewer only.
    pub fn mark_bought(
        &mut self,
        session: &Session,
        id: &ItemId,
        buyer_name: &str,
    ) -> Result<WishlistItem, WishrError> {
        session.require(Role::Viewer, "mark items bought")?;

        let index = self.position(id)?;
        let today = self.clock.today();
        let previous = self.items[index].clone();
        self.items[index].mark_bought(buyer_name, today)?;
        if let Err(e) = self.store.save(&self.items) {
            self.items[index] = previous;
            tracing::warn!(error = %e, "save failed, purchase rolled back");
            return Err(e);
        }
        let item = self.items[index].clone();
        tracing::info!(id = %item.id(), "item marked bought");
        Ok(item)
    }

    fn position(&self, id: &ItemId) -> Result<usize, WishrError> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| WishrError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 24).unwrap()
    }

    fn owner() -> Session {
        Session::new(Role::Owner, Some("Emilie".into()))
    }

    fn viewer() -> Session {
        Session::new(Role::Viewer, Some("Bob".into()))
    }

    fn open(store: &MemoryStore) -> Wishlist<&MemoryStore> {
        Wishlist::open(store).unwrap().with_clock(today())
    }

    #[test]
    fn test_create_assigns_fresh_ids_and_persists() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        let a = list.create(&owner(), "Bike", None, Some("http://x")).unwrap();
        let b = list.create(&owner(), "Bike", None, None).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.date_added(), today());
        assert!(!a.is_bought());
        assert_eq!(store.snapshot(), list.items());
        assert_eq!(list.items().len(), 2);
    }

    #[test]
    fn test_create_blank_name_leaves_collection_unchanged() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        list.create(&owner(), "Book", None, None).unwrap();
        for name in ["", "   "] {
            let err = list.create(&owner(), name, Some("d"), Some("u")).unwrap_err();
            assert!(matches!(err, WishrError::Validation { .. }));
        }
        assert_eq!(list.items().len(), 1);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        let keep = list.create(&owner(), "Book", None, None).unwrap();
        let gone = list.create(&owner(), "Lamp", None, None).unwrap();

        list.remove(&owner(), gone.id()).unwrap();
        assert_eq!(list.items().len(), 1);
        assert!(list.get(gone.id()).is_none());
        assert_eq!(list.items()[0].id(), keep.id());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_remove_unknown_id() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        list.create(&owner(), "Book", None, None).unwrap();
        let err = list.remove(&owner(), &ItemId::new()).unwrap_err();
        assert!(matches!(err, WishrError::NotFound { .. }));
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn test_mark_bought_then_again() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        let item = list.create(&owner(), "Scarf", None, None).unwrap();

        let bought = list.mark_bought(&viewer(), item.id(), "Alice").unwrap();
        assert!(bought.is_bought());
        let purchase = bought.purchase().unwrap();
        assert_eq!(purchase.bought_by, "Alice");
        assert_eq!(purchase.purchase_date, today());

        let err = list.mark_bought(&viewer(), item.id(), "Carol").unwrap_err();
        assert!(matches!(err, WishrError::AlreadyBought { .. }));
        assert_eq!(list.get(item.id()), Some(&bought));
        assert_eq!(store.snapshot()[0], bought);
    }

    #[test]
    fn test_mark_bought_errors() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        let item = list.create(&owner(), "Scarf", None, None).unwrap();

        let err = list.mark_bought(&viewer(), &ItemId::new(), "Alice").unwrap_err();
        assert!(matches!(err, WishrError::NotFound { .. }));

        let err = list.mark_bought(&viewer(), item.id(), " ").unwrap_err();
        assert!(matches!(err, WishrError::Validation { .. }));
        assert!(!list.get(item.id()).unwrap().is_bought());
    }

    #[test]
    fn test_role_enforcement() {
        let store = MemoryStore::new();
        let mut list = open(&store);

        let err = list.create(&viewer(), "Bike", None, None).unwrap_err();
        assert!(matches!(err, WishrError::Forbidden { role: Role::Viewer, .. }));

        let item = list.create(&owner(), "Bike", None, None).unwrap();
        let err = list.remove(&viewer(), item.id()).unwrap_err();
        assert!(matches!(err, WishrError::Forbidden { .. }));

        let err = list.mark_bought(&owner(), item.id(), "Emilie").unwrap_err();
        assert!(matches!(err, WishrError::Forbidden { role: Role::Owner, .. }));
        assert!(!list.get(item.id()).unwrap().is_bought());
    }

    #[test]
    fn test_failed_save_rolls_back_every_mutation() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        let item = list.create(&owner(), "Bike", None, None).unwrap();
        let saved = store.snapshot();

        store.set_fail_saves(true);
        assert!(matches!(
            list.create(&owner(), "Lamp", None, None),
            Err(WishrError::Io(_))
        ));
        assert!(matches!(list.remove(&owner(), item.id()), Err(WishrError::Io(_))));
        assert!(matches!(
            list.mark_bought(&viewer(), item.id(), "Bob"),
            Err(WishrError::Io(_))
        ));
        assert_eq!(list.items(), saved.as_slice());
        assert_eq!(store.snapshot(), saved);

        store.set_fail_saves(false);
        list.mark_bought(&viewer(), item.id(), "Bob").unwrap();
    }

    #[test]
    fn test_stats() {
        let store = MemoryStore::new();
        let mut list = open(&store);
        let a = list.create(&owner(), "A", None, None).unwrap();
        list.create(&owner(), "B", None, None).unwrap();
        list.create(&owner(), "C", None, None).unwrap();
        list.mark_bought(&viewer(), a.id(), "Bob").unwrap();
        assert_eq!(
            list.stats(),
            Stats {
                total: 3,
                bought: 1,
                unbought: 2
            }
        );
    }

    #[test]
    fn test_resolve_prefix() {
        let item = |id: &str, name: &str| {
            WishlistItem::create(id.parse().unwrap(), name, None, None, today()).unwrap()
        };
        let store = MemoryStore::with_items(vec![
            item("aaaa1111-0000-4000-8000-000000000001", "Bike"),
            item("aaaa2222-0000-4000-8000-000000000002", "Lamp"),
        ]);
        let list = open(&store);
        let bike = list.items()[0].id().clone();

        assert_eq!(list.resolve("aaaa1111-0000-4000-8000-000000000001").unwrap().id(), &bike);
        assert_eq!(list.resolve("AAAA1").unwrap().name(), "Bike");
        assert!(matches!(
            list.resolve("aaaa"),
            Err(WishrError::AmbiguousId { matches: 2, .. })
        ));
        assert!(matches!(list.resolve("bbbb"), Err(WishrError::NotFound { .. })));
        assert!(matches!(list.resolve(""), Err(WishrError::NotFound { .. })));
    }

    #[test]
    fn test_reload_sees_other_writer() {
        let store = MemoryStore::new();
        let mut first = open(&store);
        let mut second = open(&store);
        first.create(&owner(), "Bike", None, None).unwrap();
        assert!(second.items().is_empty());
        second.reload().unwrap();
        assert_eq!(second.items().len(), 1);
    }
}
