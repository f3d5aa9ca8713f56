//! HTTP front for the asset worker.
//!
//! [`router`] turns every incoming request into an [`AssetRequest`] and
//! answers it through [`AssetWorker::fetch`]. [`serve`] installs the worker,
//! then binds and runs until ctrl-c.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::assets::{AssetCache, AssetRequest, AssetWorker, Fetcher, HttpFetcher};
use crate::config::BrewlogConfig;

/// Build the worker described by the `[assets]` config section.
pub fn build_worker(config: &BrewlogConfig) -> Result<AssetWorker<HttpFetcher>> {
    let cache_path = config.assets.resolved_cache_path();
    let cache = AssetCache::open(&cache_path)?;
    let fetcher = HttpFetcher::new(&config.assets.origin)?;
    tracing::info!(
        cache = %cache_path.display(),
        origin = %fetcher.origin(),
        "asset worker ready"
    );
    Ok(AssetWorker::new(
        cache,
        fetcher,
        config.assets.cache_name(),
        config.assets.files.clone(),
    ))
}

pub fn router<F: Fetcher>(worker: Arc<AssetWorker<F>>) -> Router {
    Router::new().fallback(intercept::<F>).with_state(worker)
}

async fn intercept<F: Fetcher>(
    State(worker): State<Arc<AssetWorker<F>>>,
    request: Request,
) -> Response {
    let url = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let asset_request = AssetRequest::new(request.method().as_str(), url);

    match worker.fetch(&asset_request).await {
        Ok(asset) => {
            let status = StatusCode::from_u16(asset.status).unwrap_or(StatusCode::BAD_GATEWAY);
            let mut response = Response::new(Body::from(asset.body));
            *response.status_mut() = status;
            if let Some(value) = asset
                .content_type
                .as_deref()
                .and_then(|ct| HeaderValue::from_str(ct).ok())
            {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            response
        }
        Err(e) => {
            tracing::warn!(url = %asset_request.url, error = %e, "request failed");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

/// Install the worker, then serve on `[server] host:port`. A failed install
/// is logged and requests fall through to the network.
pub async fn serve(config: BrewlogConfig) -> Result<()> {
    let worker = Arc::new(build_worker(&config)?);

    if let Err(e) = worker.install().await {
        tracing::warn!(error = %e, state = ?worker.state(), "asset install failed, serving from network");
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, cache = %worker.cache_name(), "asset worker listening at http://{bind_addr}/");

    axum::serve(listener, router(worker))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down asset worker");
        })
        .await?;

    Ok(())
}
