//! Bazaar listing display model

use serde::Serialize;
use tabled::Tabled;

use super::common::{format_money, format_number, truncate_string};
use crate::models::BazaarListing;

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ListingDisplay {
    #[tabled(rename = "ITEM")]
    pub item: String,

    #[tabled(rename = "CATEGORY")]
    pub category: String,

    #[tabled(rename = "QTY")]
    pub quantity: String,

    #[tabled(rename = "PRICE")]
    pub price: String,

    #[tabled(rename = "MARKET")]
    pub market_value: String,

    /// Positive when cheaper than market
    #[tabled(rename = "VS MARKET")]
    pub vs_market: String,

    #[tabled(rename = "SELLER")]
    pub seller: String,
}

/// A tracked seller
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct SellerDisplay {
    #[tabled(rename = "PLAYER ID")]
    pub id: u64,

    #[tabled(rename = "")]
    pub note: String,
}

impl From<&BazaarListing> for ListingDisplay {
    fn from(l: &BazaarListing) -> Self {
        let vs_market = if l.market_value > 0 {
            format!("{:+.1}%", l.percent_below_market)
        } else {
            "-".to_string()
        };

        Self {
            item: truncate_string(&l.item_name, 32),
            category: l.category.clone(),
            quantity: format_number(l.quantity as i64),
            price: format_money(l.price),
            market_value: format_money(l.market_value),
            vs_market,
            seller: format!("{} [{}]", l.seller_name, l.seller_id),
        }
    }
}
