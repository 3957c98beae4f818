//! Command execution context
//!
//! Loads the config once and wires the request queue, the API client, the
//! reference caches and the dashboard so handlers stay free of setup code.

use std::sync::Arc;

use log::{debug, warn};

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use tornboard::Result;
use tornboard::cache::{SnapshotStorage, company_types, item_catalog};
use tornboard::client::{Credential, RequestQueue, TornApi, TornClient};
use tornboard::config::AppConfig;
use tornboard::crawler::{Crawler, PlayerIndexer};
use tornboard::dashboard::Dashboard;
use tornboard::error::{ConfigError, CrawlerError};
use tornboard::store::StateStore;

/// Context for command execution: config, API client and output format.
pub struct CommandContext {
    /// Loaded config with flag and environment overrides applied
    pub config: AppConfig,
    pub api: Arc<dyn TornApi>,
    pub dashboard: Dashboard,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Build the context. A missing config file is only an error when no
    /// key was given on the command line or in the environment.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Self::load_config(opts)?;

        let queue = RequestQueue::new(config.queue.settings());
        let client = TornClient::with_host(queue, Some(config.api_host()), config.queue.request_timeout())?;
        let api: Arc<dyn TornApi> = Arc::new(client);

        let storage = match SnapshotStorage::open() {
            Ok(storage) => Some(Arc::new(storage)),
            Err(e) => {
                warn!("Reference cache unavailable, continuing in memory: {}", e);
                None
            }
        };

        let items = Arc::new(item_catalog(api.clone(), storage.clone()));
        let types = Arc::new(company_types(api.clone(), storage));
        let dashboard =
            Dashboard::new(api.clone(), items, types).with_bazaar_sellers(config.bazaar.sellers.clone());

        Ok(Self {
            config,
            api,
            dashboard,
            format: opts.format,
        })
    }

    fn load_config(opts: &GlobalOptions) -> Result<AppConfig> {
        let mut config = match AppConfig::load_at(opts.config_ref()) {
            Ok(config) => config,
            Err(tornboard::Error::Config(ConfigError::NotFound)) if opts.api_key.is_some() => {
                debug!("No config file, using the key from the command line");
                AppConfig::default()
            }
            Err(e) => return Err(e),
        };

        if let Some(key) = &opts.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(host) = &opts.api_host {
            config.api_host = Some(host.clone());
        }
        Ok(config)
    }

    /// The key every dashboard call is made with
    pub fn credential(&self) -> Result<Credential> {
        self.config.credential()
    }

    /// Open the crawler state store.
    pub fn state_store(&self) -> Result<Arc<StateStore>> {
        let store = match self.config.data_dir() {
            Some(dir) => StateStore::open_at(&dir)?,
            None => StateStore::open()?,
        };
        Ok(Arc::new(store))
    }

    /// Crawler over the state store. Commands that only read state may run
    /// without a key; fetching requires one.
    pub fn crawler(&self, require_key: bool) -> Result<Crawler> {
        let store = self.state_store()?;
        let credential = match self.config.credential() {
            Ok(credential) => credential,
            Err(_) if require_key => return Err(CrawlerError::MissingCredential.into()),
            Err(_) => Credential::new(""),
        };
        let worker = Arc::new(PlayerIndexer::new(self.api.clone(), store.clone(), credential));
        Ok(Crawler::new(store, worker))
    }
}
