//! Offline asset worker.
//!
//! [`AssetWorker`] pre-caches a fixed, versioned list of static assets and
//! answers requests cache-first:
//!
//! ```text
//! uninstalled ──install()──▶ installing ──all assets cached──▶ active
//!                                 │
//!                                 └── any fetch fails: stays installing
//! ```
//!
//! While active, a request that exactly matches a cached one is served from
//! the cache; anything else goes to the network and is not written back.
//! Before activation every request goes to the network.

pub mod cache;
pub mod fetch;

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

pub use cache::AssetCache;
pub use fetch::{Fetcher, HttpFetcher};

/// Failure inside the asset worker. Never affects the journal.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("install failed while caching {url}: {reason}")]
    InstallFailed { url: String, reason: String },

    #[error("network request for {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("asset cache storage error: {0}")]
    Storage(String),
}

/// An intercepted request. `url` is whatever the client asked for, usually an
/// origin-relative path such as `/index.html`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRequest {
    pub method: String,
    pub url: String,
}

impl AssetRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Uninstalled,
    Installing,
    Active,
}

/// Build the cache name for a prefix and version tag, e.g. `brewlog-v1`.
pub fn cache_name(prefix: &str, version: &str) -> String {
    format!("{prefix}-{version}")
}

/// Cache-first worker over a fixed asset list.
#[derive(Debug)]
pub struct AssetWorker<F> {
    cache: AssetCache,
    fetcher: F,
    cache_name: String,
    assets: Vec<String>,
    state: RwLock<WorkerState>,
}

impl<F: Fetcher> AssetWorker<F> {
    pub fn new(cache: AssetCache, fetcher: F, cache_name: String, assets: Vec<String>) -> Self {
        Self {
            cache,
            fetcher,
            cache_name,
            assets,
            state: RwLock::new(WorkerState::Uninstalled),
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: WorkerState) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if *state != next {
            tracing::info!(from = ?*state, to = ?next, cache = %self.cache_name, "asset worker state");
            *state = next;
        }
    }

    /// Fetch every asset and store them all under the versioned cache name.
    /// On any failure nothing is stored and the worker stays `Installing`.
    ///
    /// A cache left complete by an earlier install of the same version is
    /// reused without touching the network.
    pub async fn install(&self) -> Result<(), CacheError> {
        if self.state() == WorkerState::Active {
            return Ok(());
        }
        self.set_state(WorkerState::Installing);

        let requests: Vec<AssetRequest> = self
            .assets
            .iter()
            .map(|url| AssetRequest::get(url.as_str()))
            .collect();

        let cache = self.cache.clone();
        let name = self.cache_name.clone();
        let lookup = requests.clone();
        let present = tokio::task::spawn_blocking(move || cache.count_present(&name, &lookup))
            .await
            .map_err(|e| CacheError::Storage(format!("cache task failed: {e}")))??;
        if present == requests.len() {
            tracing::info!(cache = %self.cache_name, "asset cache already populated");
            self.set_state(WorkerState::Active);
            return Ok(());
        }

        let mut fetched = Vec::with_capacity(requests.len());
        for request in requests {
            let url = request.url.clone();
            let response = self.fetcher.fetch(&request).await.map_err(|e| {
                tracing::warn!(url = %url, error = %e, "asset install fetch failed");
                CacheError::InstallFailed {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !response.is_success() {
                tracing::warn!(url = %url, status = response.status, "asset install got bad status");
                return Err(CacheError::InstallFailed {
                    url,
                    reason: format!("HTTP {}", response.status),
                });
            }
            fetched.push((request, response));
        }

        let cache = self.cache.clone();
        let name = self.cache_name.clone();
        let count = fetched.len();
        tokio::task::spawn_blocking(move || cache.put_all(&name, &fetched))
            .await
            .map_err(|e| CacheError::Storage(format!("cache task failed: {e}")))??;

        tracing::info!(cache = %self.cache_name, assets = count, "assets cached");
        self.set_state(WorkerState::Active);
        Ok(())
    }

    /// Answer an intercepted request: cache hit when active, network otherwise.
    pub async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, CacheError> {
        if self.state() == WorkerState::Active {
            let cache = self.cache.clone();
            let name = self.cache_name.clone();
            let lookup = request.clone();
            let hit = tokio::task::spawn_blocking(move || cache.match_request(&name, &lookup))
                .await
                .map_err(|e| CacheError::Storage(format!("cache task failed: {e}")))
                .and_then(|r| r);

            match hit {
                Ok(Some(response)) => {
                    tracing::debug!(url = %request.url, "cache hit");
                    return Ok(response);
                }
                Ok(None) => tracing::debug!(url = %request.url, "cache miss"),
                Err(e) => {
                    tracing::warn!(url = %request.url, error = %e, "cache lookup failed, using network")
                }
            }
        }

        self.fetcher.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_method_is_normalized() {
        assert_eq!(AssetRequest::new("get", "/").method, "GET");
    }

    #[test]
    fn cache_name_embeds_version() {
        assert_eq!(cache_name("brewlog", "v1"), "brewlog-v1");
    }

    #[test]
    fn success_range() {
        let mut r = AssetResponse {
            status: 204,
            content_type: None,
            body: Vec::new(),
        };
        assert!(r.is_success());
        r.status = 404;
        assert!(!r.is_success());
    }
}
