//! `/torn/` reference payloads

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `/torn/?selections=items`, keyed by item id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Option<HashMap<String, Item>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub weapon_type: Option<String>,
    pub market_value: Option<i64>,
    pub sell_price: Option<i64>,
    pub buy_price: Option<i64>,
    pub circulation: Option<i64>,
}

/// `/torn/?selections=companies`, keyed by company type id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompaniesResponse {
    pub companies: Option<HashMap<String, CompanyType>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyType {
    pub name: Option<String>,
    pub cost: Option<i64>,
    pub default_employees: Option<u32>,
}
