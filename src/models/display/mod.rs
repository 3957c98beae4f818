//! Display models for table and JSON output
//!
//! Display models flatten the normalized records into CLI-friendly rows with
//! column names and pre-formatted values.

mod bazaar;
mod common;
mod company;
mod crawler;
mod faction;

pub use bazaar::{ListingDisplay, SellerDisplay};
pub use common::{FieldRow, format_money, format_number, format_time, truncate_string};
pub use company::EmployeeDisplay;
pub use crawler::{CacheDisplay, CrawlLogDisplay, CrawlRunDisplay, IndexedPlayerDisplay};
pub use faction::{MemberDisplay, WarDisplay};
