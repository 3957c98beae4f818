//! Company endpoint payloads

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::common::{LastAction, Status};

/// `/company/` payload for the `profile`, `employees` and `detailed`
/// selections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub company: Option<CompanyProfile>,
    pub company_employees: Option<HashMap<String, CompanyEmployee>>,
    pub company_detailed: Option<CompanyDetailed>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(rename = "ID", alias = "id")]
    pub id: Option<u64>,
    pub company_type: Option<u32>,
    pub rating: Option<u32>,
    pub name: Option<String>,
    pub director: Option<u64>,
    pub employees_hired: Option<u32>,
    pub employees_capacity: Option<u32>,
    pub daily_income: Option<i64>,
    pub daily_customers: Option<i64>,
    pub weekly_income: Option<i64>,
    pub weekly_customers: Option<i64>,
    pub days_old: Option<u32>,
    /// Public roster, keyed by player id
    pub employees: Option<HashMap<String, CompanyEmployee>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyEmployee {
    pub name: Option<String>,
    pub position: Option<String>,
    pub days_in_company: Option<u32>,
    pub wage: Option<i64>,
    pub effectiveness: Option<Effectiveness>,
    pub last_action: Option<LastAction>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effectiveness {
    pub total: Option<i64>,
}

/// Director-only company figures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyDetailed {
    #[serde(rename = "ID", alias = "id")]
    pub id: Option<u64>,
    pub company_funds: Option<i64>,
    pub company_bank: Option<i64>,
    pub popularity: Option<i64>,
    pub efficiency: Option<i64>,
    pub environment: Option<i64>,
    pub trains_available: Option<i64>,
    pub advertising_budget: Option<i64>,
    pub value: Option<i64>,
}
