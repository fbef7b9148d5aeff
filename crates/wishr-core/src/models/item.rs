use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WishrError;

/// Unique identifier for a wishlist item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(ItemId)
            .map_err(|e| format!("invalid item id '{s}': {e}"))
    }
}

/// Who bought an item, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub bought_by: String,
    pub purchase_date: NaiveDate,
}

/// One wished-for gift.
///
/// Fields are private so the only way to change an item after creation is
/// [`WishlistItem::mark_bought`]. A bought item never changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub struct WishlistItem {
    id: ItemId,
    name: String,
    description: Option<String>,
    url: Option<String>,
    date_added: NaiveDate,
    purchase: Option<Purchase>,
}

impl WishlistItem {
    /// Build a fresh, unbought item. Text inputs are trimmed; optional inputs
    /// that trim to empty are stored as unset.
    pub fn create(
        id: ItemId,
        name: &str,
        description: Option<&str>,
        url: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, WishrError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WishrError::validation("name", "name must not be empty"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
            description: non_blank(description),
            url: non_blank(url),
            date_added: today,
            purchase: None,
        })
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn date_added(&self) -> NaiveDate {
        self.date_added
    }

    pub fn purchase(&self) -> Option<&Purchase> {
        self.purchase.as_ref()
    }

    pub fn is_bought(&self) -> bool {
        self.purchase.is_some()
    }

    /// The single `Unbought -> Bought` transition.
    pub fn mark_bought(&mut self, buyer_name: &str, today: NaiveDate) -> Result<(), WishrError> {
        if let Some(purchase) = &self.purchase {
            return Err(WishrError::AlreadyBought {
                id: self.id.to_string(),
                bought_by: purchase.bought_by.clone(),
            });
        }
        let buyer = buyer_name.trim();
        if buyer.is_empty() {
            return Err(WishrError::validation("buyer name", "buyer name must not be empty"));
        }
        self.purchase = Some(Purchase {
            bought_by: buyer.to_string(),
            purchase_date: today,
        });
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Flat persisted form of a [`WishlistItem`].
///
/// Both the camelCase field names and the older snake_case names are
/// accepted on read; null and missing optional fields both mean unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(alias = "date_added")]
    pub date_added: NaiveDate,
    #[serde(alias = "is_bought")]
    pub is_bought: bool,
    #[serde(alias = "bought_by", default)]
    pub bought_by: Option<String>,
    #[serde(alias = "purchase_date", default)]
    pub purchase_date: Option<NaiveDate>,
}

impl From<WishlistItem> for ItemRecord {
    fn from(item: WishlistItem) -> Self {
        let (is_bought, bought_by, purchase_date) = match item.purchase {
            Some(p) => (true, Some(p.bought_by), Some(p.purchase_date)),
            None => (false, None, None),
        };
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            url: item.url,
            date_added: item.date_added,
            is_bought,
            bought_by,
            purchase_date,
        }
    }
}

impl TryFrom<ItemRecord> for WishlistItem {
    type Error = String;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        if record.name.trim().is_empty() {
            return Err(format!("item {id} has an empty name"));
        }
        let bought_by = record.bought_by.filter(|b| !b.trim().is_empty());
        let purchase = match (record.is_bought, bought_by, record.purchase_date) {
            (false, None, None) => None,
            (true, Some(bought_by), Some(purchase_date)) => Some(Purchase {
                bought_by,
                purchase_date,
            }),
            (true, _, None) => return Err(format!("bought item {id} has no purchase date")),
            (true, None, _) => return Err(format!("bought item {id} has no buyer")),
            (false, _, _) => {
                return Err(format!("unbought item {id} carries purchase details"))
            }
        };
        Ok(Self {
            id,
            name: record.name,
            description: record.description.filter(|d| !d.trim().is_empty()),
            url: record.url.filter(|u| !u.trim().is_empty()),
            date_added: record.date_added,
            purchase,
        })
    }
}
