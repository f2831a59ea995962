//! Result Cache - demo driver
//!
//! Builds a cache from environment configuration, pages through an in-memory
//! list via the cached range source and logs the resulting statistics.

use std::collections::HashMap;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use result_cache::paging::{
    CachedRangeSource, PageRequest, DEFAULT_PAGE_LENGTH, DEFAULT_START_VAR,
};
use result_cache::{CacheConfig, ResultCache};

/// Entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared result cache
/// 4. Page through a list twice; the second pass is served from the cache
/// 5. Log cache statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "result_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: capacity={}, group_policy={}",
        config.capacity, config.group_policy
    );

    let cache = ResultCache::from_config(&config);
    let articles: Vec<String> = (1..=42).map(|i| format!("Article #{}", i)).collect();
    let source = CachedRangeSource::new(articles, cache.clone(), "articles")?;

    for pass in 1..=2 {
        let mut params = HashMap::new();
        params.insert(DEFAULT_START_VAR.to_string(), "0".to_string());

        loop {
            let request = PageRequest::from_params(&params, DEFAULT_START_VAR, DEFAULT_PAGE_LENGTH)
                .context("invalid page request")?;
            let page = source.page(request).await?;
            info!(
                pass,
                page = page.current_page(),
                of = page.total_pages(),
                first = page.first_item(),
                last = page.last_item(),
                "Fetched page"
            );

            match page.next_start() {
                Some(next) => {
                    params.insert(DEFAULT_START_VAR.to_string(), next.to_string());
                }
                None => break,
            }
        }
    }

    let stats = cache.stats().await;
    info!(
        "Cache stats: {}",
        serde_json::to_string(&stats).context("failed to encode stats")?
    );
    info!(hit_rate = stats.hit_rate(), "Demo complete");

    Ok(())
}
