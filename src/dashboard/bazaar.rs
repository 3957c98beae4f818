use futures::future::join_all;
use log::{debug, warn};

use super::Dashboard;
use crate::client::models::UserProfile;
use crate::client::{Credential, paths};
use crate::error::{Error, Result};
use crate::models::bazaar::category_list;
use crate::models::{BazaarFilter, BazaarItems, BazaarListing, UNKNOWN, text_or};

const BAZAAR_SELECTIONS: &str = "profile,bazaar";

impl Dashboard {
    /// Bazaar listings of the tracked sellers, filtered and sorted.
    ///
    /// `categories` is computed before filtering so it always offers every
    /// category on sale. A seller whose bazaar cannot be read is skipped;
    /// the call fails only when every seller failed.
    pub async fn get_bazaar_listings(&self, credential: &Credential, filter: &BazaarFilter) -> Result<BazaarItems> {
        let sellers: Vec<Option<u64>> = if self.bazaar_sellers.is_empty() {
            vec![None]
        } else {
            self.bazaar_sellers.iter().copied().map(Some).collect()
        };

        let responses = join_all(sellers.iter().map(|seller| async move {
            let path = paths::user(*seller, BAZAAR_SELECTIONS);
            (*seller, self.get::<UserProfile>(&path, credential).await)
        }))
        .await;

        let catalog = self.items.entries(credential).await;
        let mut listings: Vec<BazaarListing> = Vec::new();
        let mut last_error: Option<Error> = None;
        let mut succeeded = 0usize;

        for (seller, response) in responses {
            let profile = match response {
                Ok(profile) => profile,
                Err(e) => {
                    warn!("Skipping bazaar of seller {}: {}", seller.unwrap_or_default(), e);
                    last_error = Some(e);
                    continue;
                }
            };
            succeeded += 1;

            let seller_id = profile.player_id.or(seller).unwrap_or_default();
            let seller_name = text_or(profile.name, UNKNOWN);
            let entries = profile.bazaar.map(|b| b.into_entries()).unwrap_or_default();
            debug!("Seller {} lists {} items", seller_id, entries.len());

            listings.extend(
                entries
                    .into_iter()
                    .map(|entry| BazaarListing::from_entry(entry, seller_id, &seller_name, &catalog)),
            );
        }

        if succeeded == 0
            && let Some(e) = last_error
        {
            return Err(e);
        }

        let categories = category_list(&listings);
        Ok(BazaarItems {
            items: filter.apply(listings),
            categories,
        })
    }

    /// Listings in `category` (`None` or "All" for everything), cheapest
    /// first.
    pub async fn get_bazaar_items(&self, credential: &Credential, category: Option<&str>) -> Result<BazaarItems> {
        self.get_bazaar_listings(credential, &BazaarFilter::category(category))
            .await
    }
}
