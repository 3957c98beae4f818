//! Raw Torn API payloads
//!
//! Every field is optional: the API omits fields depending on the key's
//! access level and the selections requested, and the normalizers in
//! `crate::models` fill in defaults.

mod common;
mod company;
mod faction;
mod torn;
mod user;

pub use common::{Bar, LastAction, Status};
pub use company::{CompanyDetailed, CompanyEmployee, CompanyProfile, CompanyResponse, Effectiveness};
pub use faction::{
    FactionBasic, FactionMember, FactionMembersResponse, FactionSummary, FactionSummaryResponse,
    RankedWar, RankedWarsResponse, Territory, TerritoryResponse, WarFaction,
};
pub use torn::{CompaniesResponse, CompanyType, Item, ItemsResponse};
pub use user::{BazaarEntry, BazaarPayload, FactionMembership, Job, UserProfile};
