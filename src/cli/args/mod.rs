//! Shared CLI argument types
//!
//! Reusable argument structs, flattened into commands.

mod common;
mod filters;
mod global;

pub use common::OutputFormat;
pub use filters::{BazaarArgs, CrawlerConfigArgs, SearchArgs};
pub use global::GlobalOptions;
