//! Reference data caches
//!
//! The item catalog and the company type names change rarely and are large,
//! so they are fetched once a day and persisted in a SQLite snapshot store.

pub mod company_types;
pub mod items;
pub mod reference;
pub mod storage;

use std::time::Duration;

/// Cache TTL configuration per data type
pub struct CacheTtl;

impl CacheTtl {
    /// Item catalog and company types
    pub const REFERENCE: Duration = Duration::from_secs(24 * 60 * 60); // 24 hr
}

// Re-export main types
pub use company_types::{CompanyTypeInfo, CompanyTypes, company_types};
pub use items::{ItemCatalog, ItemInfo, item_catalog};
pub use reference::{CacheState, CacheStatus, ReferenceCache};
pub use storage::SnapshotStorage;
