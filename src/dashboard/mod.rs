//! Domain fetchers
//!
//! [`Dashboard`] turns one caller request ("company data for this key") into
//! the upstream calls it needs and normalizes the answers into the records in
//! [`crate::models`]. Every method takes the caller's [`Credential`] and
//! holds no per-credential state between calls; the only shared state is the
//! reference caches, which are identity-independent.

mod bazaar;
mod company;
mod faction;
mod key;
mod player;

use std::sync::Arc;

use log::warn;
use serde::de::DeserializeOwned;

use crate::cache::{CompanyTypes, ItemCatalog};
use crate::client::models::UserProfile;
use crate::client::{Credential, TornApi, fetch, paths};
use crate::error::Result;

/// Domain fetchers over a [`TornApi`] transport
#[derive(Clone)]
pub struct Dashboard {
    api: Arc<dyn TornApi>,
    items: Arc<ItemCatalog>,
    company_types: Arc<CompanyTypes>,
    bazaar_sellers: Vec<u64>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn TornApi>, items: Arc<ItemCatalog>, company_types: Arc<CompanyTypes>) -> Self {
        Self {
            api,
            items,
            company_types,
            bazaar_sellers: Vec::new(),
        }
    }

    /// Sellers whose bazaars are listed. Empty means the key owner's own.
    pub fn with_bazaar_sellers(mut self, sellers: Vec<u64>) -> Self {
        self.bazaar_sellers = sellers;
        self
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, credential: &Credential) -> Result<T> {
        fetch(self.api.as_ref(), path, credential).await
    }

    /// The key owner's `/user/` payload for `selections`.
    async fn owner(&self, credential: &Credential, selections: &str) -> Result<UserProfile> {
        self.get(&paths::user(None, selections), credential).await
    }

    /// Fetch `path`, mapping "incorrect id" to `None`.
    async fn get_entity<T: DeserializeOwned>(&self, path: &str, credential: &Credential) -> Result<Option<T>> {
        match self.get(path, credential).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.as_api().is_some_and(|a| a.is_incorrect_id()) => {
                log::debug!("{} does not resolve: {}", crate::client::strip_query(path), e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Keep a secondary call's value, or log and fall back to `None`.
fn secondary<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} unavailable, using defaults: {}", what, e);
            None
        }
    }
}
