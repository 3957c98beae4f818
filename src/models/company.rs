//! Company records

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{NO_COMPANY, NOT_AVAILABLE, UNKNOWN, parse_id, text_or};
use crate::client::models::{CompanyDetailed, CompanyEmployee, CompanyProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: u64,
    pub name: String,
    pub company_type: u32,
    pub type_name: String,
    pub rating: u32,
    pub director_id: u64,
    pub employees_hired: u32,
    pub employees_capacity: u32,
    pub daily_income: i64,
    pub daily_customers: i64,
    pub weekly_income: i64,
    pub weekly_customers: i64,
    pub days_old: u32,
}

impl CompanyRecord {
    /// Sentinel for a player without a job.
    pub fn none() -> Self {
        Self {
            id: 0,
            name: NO_COMPANY.to_string(),
            company_type: 0,
            type_name: NOT_AVAILABLE.to_string(),
            rating: 0,
            director_id: 0,
            employees_hired: 0,
            employees_capacity: 0,
            daily_income: 0,
            daily_customers: 0,
            weekly_income: 0,
            weekly_customers: 0,
            days_old: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.id == 0
    }

    /// Normalize a company profile. `type_name` comes from the company type
    /// reference cache.
    pub fn from_profile(profile: CompanyProfile, fallback_id: u64, type_name: Option<String>) -> Self {
        Self {
            id: profile.id.unwrap_or(fallback_id),
            name: text_or(profile.name, UNKNOWN),
            company_type: profile.company_type.unwrap_or_default(),
            type_name: text_or(type_name, UNKNOWN),
            rating: profile.rating.unwrap_or_default(),
            director_id: profile.director.unwrap_or_default(),
            employees_hired: profile.employees_hired.unwrap_or_default(),
            employees_capacity: profile.employees_capacity.unwrap_or_default(),
            daily_income: profile.daily_income.unwrap_or_default(),
            daily_customers: profile.daily_customers.unwrap_or_default(),
            weekly_income: profile.weekly_income.unwrap_or_default(),
            weekly_customers: profile.weekly_customers.unwrap_or_default(),
            days_old: profile.days_old.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: u64,
    pub name: String,
    pub position: String,
    pub days_in_company: u32,
    pub wage: i64,
    pub effectiveness: i64,
    pub last_action: String,
    pub online: bool,
    pub status: String,
}

impl EmployeeRecord {
    fn from_raw(id: u64, raw: CompanyEmployee) -> Self {
        let last_action = raw.last_action.unwrap_or_default();
        Self {
            id,
            name: text_or(raw.name, UNKNOWN),
            position: text_or(raw.position, NOT_AVAILABLE),
            days_in_company: raw.days_in_company.unwrap_or_default(),
            wage: raw.wage.unwrap_or_default(),
            effectiveness: raw
                .effectiveness
                .and_then(|e| e.total)
                .unwrap_or_default(),
            online: last_action.is_online(),
            last_action: text_or(last_action.relative, UNKNOWN),
            status: text_or(raw.status.and_then(|s| s.description), UNKNOWN),
        }
    }

    /// Roster keyed by player id, sorted by id.
    pub fn roster(raw: HashMap<String, CompanyEmployee>) -> Vec<Self> {
        let mut employees: Vec<Self> = raw
            .into_iter()
            .map(|(id, e)| Self::from_raw(parse_id(&id), e))
            .collect();
        employees.sort_by_key(|e| e.id);
        employees
    }
}

/// Company profile plus the director-only figures and the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetailRecord {
    pub company: CompanyRecord,
    pub funds: i64,
    pub popularity: i64,
    pub efficiency: i64,
    pub environment: i64,
    pub trains_available: i64,
    pub advertising_budget: i64,
    pub employees: Vec<EmployeeRecord>,
}

impl CompanyDetailRecord {
    pub fn none() -> Self {
        Self::assemble(CompanyRecord::none(), None, Vec::new())
    }

    /// `detailed` is `None` when the key owner is not the director or the
    /// call failed; the figures then default to 0.
    pub fn assemble(
        company: CompanyRecord,
        detailed: Option<CompanyDetailed>,
        employees: Vec<EmployeeRecord>,
    ) -> Self {
        let d = detailed.unwrap_or_default();
        Self {
            company,
            funds: d.company_funds.or(d.company_bank).unwrap_or_default(),
            popularity: d.popularity.unwrap_or_default(),
            efficiency: d.efficiency.unwrap_or_default(),
            environment: d.environment.unwrap_or_default(),
            trains_available: d.trains_available.unwrap_or_default(),
            advertising_budget: d.advertising_budget.unwrap_or_default(),
            employees,
        }
    }

    pub fn online_employees(&self) -> usize {
        self.employees.iter().filter(|e| e.online).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sentinel() {
        let none = CompanyRecord::none();
        assert_eq!(none.id, 0);
        assert_eq!(none.name, "No Company");
        assert!(none.is_none());
    }

    #[test]
    fn test_sparse_profile_defaults() {
        let record = CompanyRecord::from_profile(CompanyProfile::default(), 77, None);
        assert_eq!(record.id, 77);
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.type_name, "Unknown");
        assert_eq!(record.rating, 0);
        assert_eq!(record.daily_income, 0);
        assert_eq!(record.employees_capacity, 0);
    }

    #[test]
    fn test_roster_sorted_with_defaults() {
        let raw: HashMap<String, CompanyEmployee> = serde_json::from_value(json!({
            "30": {"name": "Bob", "last_action": {"status": "Online", "relative": "now"}},
            "12": {}
        }))
        .unwrap();
        let roster = EmployeeRecord::roster(raw);
        assert_eq!(roster[0].id, 12);
        assert_eq!(roster[0].name, "Unknown");
        assert_eq!(roster[0].position, "N/A");
        assert_eq!(roster[0].effectiveness, 0);
        assert!(roster[1].online);
    }

    #[test]
    fn test_detail_without_director_figures() {
        let detail = CompanyDetailRecord::assemble(CompanyRecord::none(), None, Vec::new());
        assert_eq!(detail.funds, 0);
        assert_eq!(detail.online_employees(), 0);
    }
}
