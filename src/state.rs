//! Shared application state.

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use crate::cache::CacheDb;
use crate::config::Config;
use crate::enrichment::photos::CachedPhoto;

/// State shared by the dashboard, the widget loaders, and the refresh poller.
pub struct AppState {
    pub config: RwLock<Option<Config>>,
    /// Enrichment cache; None when the db failed to open (fallback disabled).
    pub cache: Mutex<Option<CacheDb>>,
    /// City-photo cache, keyed `city-{name}`. Process lifetime; entries
    /// expire by TTL check on read, never by background eviction.
    pub photo_cache: DashMap<String, CachedPhoto>,
    /// Shared HTTP client with the enrichment timeout applied.
    pub http: reqwest::Client,
}

impl AppState {
    /// Load config and open the cache from `~/.roadbook/`.
    pub fn new() -> Self {
        let config = match crate::config::load_config() {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("No configuration loaded: {}", e);
                None
            }
        };

        let cache = match CacheDb::open() {
            Ok(db) => Some(db),
            Err(e) => {
                log::warn!("Failed to open enrichment cache: {}. Offline fallback disabled.", e);
                None
            }
        };

        Self::assemble(config, cache)
    }

    /// Build state from explicit parts. Used by embedders and tests that
    /// must not touch the home directory.
    pub fn with_parts(config: Option<Config>, cache: Option<CacheDb>) -> Self {
        Self::assemble(config, cache)
    }

    fn assemble(config: Option<Config>, cache: Option<CacheDb>) -> Self {
        Self {
            config: RwLock::new(config),
            cache: Mutex::new(cache),
            photo_cache: DashMap::new(),
            http: crate::enrichment::http_client(),
        }
    }

    /// Snapshot of the current config, if loaded.
    pub fn config_snapshot(&self) -> Option<Config> {
        self.config.read().clone()
    }

    /// Run a closure against the cache db, if open.
    pub fn with_cache<T>(&self, f: impl FnOnce(&CacheDb) -> T) -> Option<T> {
        let guard = self.cache.lock();
        guard.as_ref().map(f)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
