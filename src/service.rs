//! Caller-side facade tying the search client to the store.

use backon::{ExponentialBuilder, Retryable};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::db::{OwnerFilter, StoreHandle};
use crate::error::{IsRetryable, MixologyError};
use crate::search::SearchClient;
use crate::snapshot::{CollectionSnapshot, ItemSnapshot, OwnerSnapshot};

const DEFAULT_WARMUP_RETRY_MAX_TIMES: usize = 3;

/// Everything a screen needs after a mutation, loaded in one go.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overview {
    pub items: Vec<ItemSnapshot>,
    pub collections: Vec<CollectionSnapshot>,
    pub owners: Vec<OwnerSnapshot>,
}

#[derive(Clone)]
pub struct Mixology {
    store: StoreHandle,
    search: Arc<SearchClient>,
    warmup_retry_max_times: usize,
}

impl Mixology {
    pub fn new(store: StoreHandle, search: Arc<SearchClient>) -> Self {
        Self {
            store,
            search,
            warmup_retry_max_times: DEFAULT_WARMUP_RETRY_MAX_TIMES,
        }
    }

    pub fn with_warmup_retries(mut self, max_times: usize) -> Self {
        self.warmup_retry_max_times = max_times;
        self
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn search_client(&self) -> &Arc<SearchClient> {
        &self.search
    }

    /// Fills the search cache on a background task.
    ///
    /// Retryable failures are retried with exponential backoff; the final
    /// outcome is only logged, so searches keep working against a cold cache.
    pub fn warm_cache_in_background(&self) -> JoinHandle<()> {
        let search = self.search.clone();
        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_delay(Duration::from_secs(2))
            .with_max_times(self.warmup_retry_max_times)
            .with_jitter();

        tokio::spawn(async move {
            let op = move || {
                let search = search.clone();
                async move { search.populate_cache().await }
            };

            match op
                .retry(retry_policy)
                .when(|err: &MixologyError| err.is_retryable())
                .notify(|err, dur: Duration| {
                    warn!("Cache warm-up retrying after error {} in {:?}", err, dur);
                })
                .await
            {
                Ok(count) => info!(count, "Background task: catalog cache populated."),
                Err(e) => warn!(error = %e, "Background task: failed to populate catalog cache."),
            }
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<String>, MixologyError> {
        let results = self.search.search(query).await?;
        info!(query = %query, results = results.len(), "[Mixology] Search finished");
        Ok(results)
    }

    /// Files a search result under `collection`, creating the item on first use.
    pub async fn add_to_collection(&self, item: &str, collection: &str) -> Result<(), MixologyError> {
        self.store.link_item_to_collection(item, collection).await
    }

    pub async fn remove_from_collection(
        &self,
        item: &str,
        collection: &str,
    ) -> Result<(), MixologyError> {
        self.store.unlink_item_from_collection(item, collection).await
    }

    /// Creates a collection for the selected owner, or a shared one when none is selected.
    pub async fn create_collection_for(
        &self,
        name: &str,
        owner: Option<&str>,
    ) -> Result<(), MixologyError> {
        self.store.create_collection(name, owner).await
    }

    /// Loads items, the filtered collections and owners concurrently.
    ///
    /// The three reads still run one after another inside the store actor.
    pub async fn refresh(&self, filter: OwnerFilter) -> Result<Overview, MixologyError> {
        let (items, collections, owners) = tokio::try_join!(
            self.store.list_items(),
            self.store.list_collections(filter),
            self.store.list_owners(),
        )?;
        Ok(Overview {
            items,
            collections,
            owners,
        })
    }
}

/// Waits for a background warm-up task. A panicked or cancelled task is logged
/// and reported as `false` instead of being dropped silently.
pub async fn join_warm_up(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, panicked = e.is_panic(), "Background cache warm-up task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join_warm_up_reports_completed_task() {
        assert!(join_warm_up(tokio::spawn(async {})).await);
    }

    #[tokio::test]
    async fn join_warm_up_reports_panicked_task() {
        let handle = tokio::spawn(async { panic!("warm-up exploded") });
        assert!(!join_warm_up(handle).await);
    }

    #[tokio::test]
    async fn join_warm_up_reports_aborted_task() {
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        assert!(!join_warm_up(handle).await);
    }
}
