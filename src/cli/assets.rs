//! CLI `assets install` — fill the versioned asset cache from the origin.

use anyhow::{Context, Result};

use brewlog::config::BrewlogConfig;

pub async fn install(config: &BrewlogConfig) -> Result<()> {
    let worker = brewlog::server::build_worker(config)?;

    println!(
        "Caching {} assets from {} into {}...",
        worker.assets().len(),
        config.assets.origin,
        worker.cache_name()
    );
    worker.install().await.context("asset install failed")?;

    println!("Asset cache {} is active.", worker.cache_name());
    Ok(())
}
