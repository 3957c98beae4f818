//! Bazaar listings, filters and sorting

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::category::{matches_category, normalize_category};
use super::{UNKNOWN, text_or};
use crate::cache::ItemInfo;
use crate::client::models::BazaarEntry;

/// Pseudo-category meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All";

/// Percentage a listing sits below its market value.
///
/// Negative when the listing is priced above market; 0 when the market value
/// is unknown.
pub fn percent_below_market(price: i64, market_value: i64) -> f64 {
    if market_value > 0 {
        (market_value - price) as f64 * 100.0 / market_value as f64
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BazaarListing {
    pub item_id: u64,
    pub item_name: String,
    pub category: String,
    pub price: i64,
    pub quantity: u64,
    pub market_value: i64,
    pub percent_below_market: f64,
    pub seller_id: u64,
    pub seller_name: String,
}

impl BazaarListing {
    /// Normalize one bazaar entry, filling gaps from the item catalog.
    pub fn from_entry(
        entry: BazaarEntry,
        seller_id: u64,
        seller_name: &str,
        catalog: &HashMap<u64, ItemInfo>,
    ) -> Self {
        let item_id = entry.id.unwrap_or_default();
        let known = catalog.get(&item_id);

        let price = entry.price.unwrap_or_default();
        let market_value = entry
            .market_price
            .filter(|v| *v > 0)
            .or_else(|| known.map(|i| i.market_value))
            .unwrap_or_default();
        let raw_type = entry
            .item_type
            .or_else(|| known.map(|i| i.item_type.clone()))
            .unwrap_or_default();

        Self {
            item_id,
            item_name: text_or(entry.name.or_else(|| known.map(|i| i.name.clone())), UNKNOWN),
            category: normalize_category(&raw_type),
            price,
            quantity: entry.quantity.unwrap_or_default(),
            market_value,
            percent_below_market: percent_below_market(price, market_value),
            seller_id,
            seller_name: seller_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BazaarSort {
    #[default]
    PriceAsc,
    PriceDesc,
    QuantityDesc,
    /// Largest percentage below market first
    Value,
}

impl FromStr for BazaarSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price_asc" | "price" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "quantity_desc" | "quantity" => Ok(Self::QuantityDesc),
            "value" => Ok(Self::Value),
            other => Err(format!(
                "unknown sort '{}' (expected price_asc, price_desc, quantity_desc or value)",
                other
            )),
        }
    }
}

impl fmt::Display for BazaarSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::QuantityDesc => "quantity_desc",
            Self::Value => "value",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BazaarFilter {
    /// `None` or "All" disables the category filter
    pub category: Option<String>,
    /// Case-insensitive substring of the item or seller name
    pub search: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort: BazaarSort,
}

impl BazaarFilter {
    pub fn category(category: Option<&str>) -> Self {
        Self {
            category: category.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn matches(&self, listing: &BazaarListing) -> bool {
        if let Some(category) = self.category.as_deref()
            && !category.trim().is_empty()
            && !category.eq_ignore_ascii_case(ALL_CATEGORIES)
            && !matches_category(&listing.category, category)
        {
            return false;
        }

        if let Some(search) = self.search.as_deref() {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty()
                && !listing.item_name.to_lowercase().contains(&needle)
                && !listing.seller_name.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| listing.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| listing.price > max) {
            return false;
        }

        true
    }

    /// Filter then sort. Ties keep item id order.
    pub fn apply(&self, listings: Vec<BazaarListing>) -> Vec<BazaarListing> {
        let mut kept: Vec<BazaarListing> = listings.into_iter().filter(|l| self.matches(l)).collect();
        kept.sort_by_key(|l| l.item_id);
        match self.sort {
            BazaarSort::PriceAsc => kept.sort_by_key(|l| l.price),
            BazaarSort::PriceDesc => kept.sort_by_key(|l| std::cmp::Reverse(l.price)),
            BazaarSort::QuantityDesc => kept.sort_by_key(|l| std::cmp::Reverse(l.quantity)),
            BazaarSort::Value => kept.sort_by(|a, b| {
                b.percent_below_market.total_cmp(&a.percent_below_market)
            }),
        }
        kept
    }
}

/// Listings plus the category list for a filter dropdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BazaarItems {
    pub items: Vec<BazaarListing>,
    pub categories: Vec<String>,
}

/// "All" followed by the distinct categories, sorted.
pub fn category_list(listings: &[BazaarListing]) -> Vec<String> {
    let distinct: BTreeSet<&str> = listings.iter().map(|l| l.category.as_str()).collect();
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}
