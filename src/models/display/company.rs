//! Company employee display model

use serde::Serialize;
use tabled::Tabled;

use super::common::format_money;
use crate::models::EmployeeRecord;

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct EmployeeDisplay {
    #[tabled(rename = "ID")]
    pub id: u64,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "POSITION")]
    pub position: String,

    #[tabled(rename = "DAYS")]
    pub days: u32,

    #[tabled(rename = "WAGE")]
    pub wage: String,

    #[tabled(rename = "EFF")]
    pub effectiveness: i64,

    #[tabled(rename = "LAST ACTION")]
    pub last_action: String,
}

impl From<&EmployeeRecord> for EmployeeDisplay {
    fn from(e: &EmployeeRecord) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            position: e.position.clone(),
            days: e.days_in_company,
            wage: format_money(e.wage),
            effectiveness: e.effectiveness,
            last_action: e.last_action.clone(),
        }
    }
}
