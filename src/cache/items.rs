//! Item catalog

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::reference::ReferenceCache;
use super::storage::SnapshotStorage;
use super::CacheTtl;
use crate::client::models::ItemsResponse;
use crate::client::{Credential, TornApi, paths};
use crate::error::{ApiError, Result};
use crate::models::category::{matches_category, normalize_category};
use crate::models::{UNKNOWN, parse_id, text_or};

/// One catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub id: u64,
    pub name: String,
    /// Source item type, e.g. "Melee"
    pub item_type: String,
    /// Display category, e.g. "Weapons"
    pub category: String,
    pub market_value: i64,
}

pub type ItemCatalog = ReferenceCache<ItemInfo>;

/// Create the item catalog cache.
pub fn item_catalog(api: Arc<dyn TornApi>, storage: Option<Arc<SnapshotStorage>>) -> ItemCatalog {
    ReferenceCache::new(
        "items",
        paths::torn("items"),
        parse_items,
        CacheTtl::REFERENCE,
        api,
        storage,
    )
}

fn parse_items(value: Value) -> Result<HashMap<u64, ItemInfo>> {
    let response: ItemsResponse = serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidResponse(format!("Unexpected items payload: {}", e)))?;

    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|(key, item)| {
            let id = parse_id(&key);
            let item_type = item.item_type.unwrap_or_default();
            let info = ItemInfo {
                id,
                name: text_or(item.name, UNKNOWN),
                category: normalize_category(&item_type),
                item_type,
                market_value: item.market_value.unwrap_or_default(),
            };
            (id, info)
        })
        .filter(|(id, _)| *id != 0)
        .collect())
}

impl ReferenceCache<ItemInfo> {
    pub async fn get(&self, credential: &Credential, id: u64) -> Option<ItemInfo> {
        self.entries(credential).await.get(&id).cloned()
    }

    /// Items whose category matches `category`, sorted by name.
    pub async fn by_category(&self, credential: &Credential, category: &str) -> Vec<ItemInfo> {
        let mut items: Vec<ItemInfo> = self
            .entries(credential)
            .await
            .values()
            .filter(|i| matches_category(&i.category, category))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTornApi;
    use serde_json::json;

    fn catalog() -> ItemCatalog {
        let api = MockTornApi::new().with_json(
            "/torn/?selections=items",
            json!({"items": {
                "1": {"name": "Hammer", "type": "Melee", "market_value": 40},
                "2": {"name": "Baseball Bat", "type": "Melee", "market_value": 60},
                "206": {"name": "Xanax", "type": "Drug", "market_value": 830000},
                "9": {}
            }}),
        );
        item_catalog(Arc::new(api), None)
    }

    #[tokio::test]
    async fn test_get_item() {
        let catalog = catalog();
        let cred = Credential::new("k");
        let xanax = catalog.get(&cred, 206).await.unwrap();
        assert_eq!(xanax.name, "Xanax");
        assert_eq!(xanax.category, "Drugs");
        assert_eq!(xanax.market_value, 830000);
        assert!(catalog.get(&cred, 404).await.is_none());
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let catalog = catalog();
        let item = catalog.get(&Credential::new("k"), 9).await.unwrap();
        assert_eq!(item.name, "Unknown");
        assert_eq!(item.category, "Miscellaneous");
        assert_eq!(item.market_value, 0);
    }

    #[tokio::test]
    async fn test_by_category_uses_synonyms() {
        let catalog = catalog();
        let weapons = catalog.by_category(&Credential::new("k"), "Weapons").await;
        let names: Vec<&str> = weapons.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Baseball Bat", "Hammer"]);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(parse_items(json!({"items": [1, 2]})).is_err());
    }
}
