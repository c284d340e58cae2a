use mimalloc::MiMalloc;
use mixology::service::join_warm_up;
use mixology::{Mixology, OwnerFilter, SearchClient};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = &mixology::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        search_base_url = %cfg.search.base_url,
        proxy = %cfg.search.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        max_distance = cfg.search.max_distance,
    );

    let store = mixology::db::spawn(&cfg.basic.database_url).await?;
    let search = Arc::new(SearchClient::new(&cfg.search)?);
    let app = Mixology::new(store, search)
        .with_warmup_retries(cfg.search.warmup_retry_max_times);

    // Searches issued before the warm-up completes simply see a cold cache.
    let warmup = app.warm_cache_in_background();

    let queries: Vec<String> = std::env::args().skip(1).collect();
    if !queries.is_empty() {
        join_warm_up(warmup).await;
    }
    for query in &queries {
        match app.search(query).await {
            Ok(names) => info!(query = %query, results = ?names, "Search results"),
            Err(e) => warn!(query = %query, error = %e, "Search failed"),
        }
    }

    let overview = app.refresh(OwnerFilter::All).await?;
    info!(
        owners = ?overview.owners.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(),
        collections = ?overview.collections.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        items = ?overview.items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
        "Store overview"
    );

    app.store().clone().shutdown().await?;
    Ok(())
}
