//! tornboard - Torn API dashboard core
//!
//! - [`client`]: the rate-limited request queue and the API transport
//! - [`dashboard`]: player, company, faction, bazaar and key-check fetchers
//! - [`cache`]: 24h reference caches (items, company types) persisted to disk
//! - [`crawler`]: the resumable player index crawler
//! - [`store`]: the crawler's durable state

pub mod cache;
pub mod client;
pub mod config;
pub mod crawler;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod store;

pub use error::{Error, Result};
