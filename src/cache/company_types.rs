//! Company type names

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::reference::ReferenceCache;
use super::storage::SnapshotStorage;
use super::CacheTtl;
use crate::client::models::CompaniesResponse;
use crate::client::{Credential, TornApi, paths};
use crate::error::{ApiError, Result};
use crate::models::{UNKNOWN, parse_id, text_or};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyTypeInfo {
    pub id: u32,
    pub name: String,
    pub cost: i64,
    pub default_employees: u32,
}

pub type CompanyTypes = ReferenceCache<CompanyTypeInfo>;

/// Create the company type cache.
pub fn company_types(api: Arc<dyn TornApi>, storage: Option<Arc<SnapshotStorage>>) -> CompanyTypes {
    ReferenceCache::new(
        "company_types",
        paths::torn("companies"),
        parse_company_types,
        CacheTtl::REFERENCE,
        api,
        storage,
    )
}

fn parse_company_types(value: Value) -> Result<HashMap<u64, CompanyTypeInfo>> {
    let response: CompaniesResponse = serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidResponse(format!("Unexpected companies payload: {}", e)))?;

    Ok(response
        .companies
        .unwrap_or_default()
        .into_iter()
        .map(|(key, raw)| {
            let id = parse_id(&key);
            let info = CompanyTypeInfo {
                id: id as u32,
                name: text_or(raw.name, UNKNOWN),
                cost: raw.cost.unwrap_or_default(),
                default_employees: raw.default_employees.unwrap_or_default(),
            };
            (id, info)
        })
        .filter(|(id, _)| *id != 0)
        .collect())
}

impl ReferenceCache<CompanyTypeInfo> {
    /// Name for a company type id, `None` when unknown.
    pub async fn name_of(&self, credential: &Credential, type_id: u32) -> Option<String> {
        self.entries(credential)
            .await
            .get(&u64::from(type_id))
            .map(|t| t.name.clone())
    }
}
