use ahash::AHashSet;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use super::api::CocktailDbApi;
use crate::config::SearchConfig;
use crate::error::MixologyError;
use crate::matcher;

/// Name search over the remote catalog, widened with fuzzy matches from a
/// cached copy of the full name list.
///
/// The cache starts empty, is only ever replaced wholesale, and may be read
/// stale by concurrent searches.
pub struct SearchClient {
    client: reqwest::Client,
    base_url: Url,
    search_path: String,
    list_url: Url,
    timeout: Duration,
    max_distance: usize,
    cache: ArcSwap<Vec<String>>,
}

impl SearchClient {
    /// Builds a client with its own connection pool from `cfg`.
    pub fn new(cfg: &SearchConfig) -> Result<Self, MixologyError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("mixology/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout());

        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        Self::with_client(cfg, builder.build()?)
    }

    /// Uses a caller-provided `reqwest::Client`; the per-call timeout from `cfg` still applies.
    pub fn with_client(cfg: &SearchConfig, client: reqwest::Client) -> Result<Self, MixologyError> {
        let list_url = CocktailDbApi::list_url(&cfg.base_url, &cfg.list_path)?;
        // Fail on a bad search path now rather than on the first search.
        CocktailDbApi::search_url(&cfg.base_url, &cfg.search_path, "")?;

        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
            search_path: cfg.search_path.clone(),
            list_url,
            timeout: cfg.timeout(),
            max_distance: cfg.max_distance,
            cache: ArcSwap::from_pointee(Vec::new()),
        })
    }

    /// Current cache contents.
    pub fn cached_names(&self) -> Arc<Vec<String>> {
        self.cache.load_full()
    }

    /// Replaces the cache with the full remote catalog; returns the number of names.
    ///
    /// On failure the previous cache is kept.
    pub async fn populate_cache(&self) -> Result<usize, MixologyError> {
        let start = Instant::now();
        let names = CocktailDbApi::fetch_names(&self.client, self.list_url.clone(), self.timeout).await?;
        let count = names.len();
        self.cache.store(Arc::new(names));

        info!(
            count,
            took_ms = start.elapsed().as_millis() as u64,
            "[Search] Catalog cache populated"
        );
        Ok(count)
    }

    /// Searches the remote catalog for `query`.
    ///
    /// With a warm cache, cached names within the configured edit distance are
    /// merged into the exact matches and the union is returned sorted. With a
    /// cold cache the exact matches are returned in upstream order and become
    /// the cache contents.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, MixologyError> {
        let url = CocktailDbApi::search_url(&self.base_url, &self.search_path, query)?;
        let exact = CocktailDbApi::fetch_names(&self.client, url, self.timeout).await?;

        let cached = self.cache.load_full();
        if cached.is_empty() {
            let seeded = self.seed_cold_cache(&cached, &exact);
            debug!(
                query = %query,
                exact = exact.len(),
                seeded,
                "[Search] Cache cold, seeding it from exact matches"
            );
            return Ok(exact);
        }

        let exact_set: AHashSet<&str> = exact.iter().map(String::as_str).collect();
        let near = matcher::filter_near(
            query,
            cached
                .iter()
                .map(String::as_str)
                .filter(|name| !exact_set.contains(name)),
            self.max_distance,
        );

        let mut merged: Vec<String> = exact_set
            .iter()
            .copied()
            .chain(near.iter().copied())
            .collect::<AHashSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        merged.sort();

        debug!(
            query = %query,
            exact = exact.len(),
            near = near.len(),
            merged = merged.len(),
            "[Search] Merged exact and near matches"
        );
        Ok(merged)
    }

    /// Stores `exact` only if the cache still holds the `observed` snapshot,
    /// so a catalog loaded by a concurrent `populate_cache` is never overwritten.
    fn seed_cold_cache(&self, observed: &Arc<Vec<String>>, exact: &[String]) -> bool {
        let previous = self
            .cache
            .compare_and_swap(observed, Arc::new(exact.to_vec()));
        Arc::ptr_eq(observed, &previous)
    }
}
