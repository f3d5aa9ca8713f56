//! Network side of the asset worker.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};

use super::{AssetRequest, AssetResponse, CacheError};

/// Performs live requests on behalf of the worker.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        request: &AssetRequest,
    ) -> impl Future<Output = Result<AssetResponse, CacheError>> + Send;
}

/// [`Fetcher`] that resolves request URLs against an origin and issues them
/// with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: &str) -> anyhow::Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| anyhow::anyhow!("invalid asset origin {origin:?}: {e}"))?;
        Ok(Self {
            client: Client::new(),
            origin,
        })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn resolve(&self, request: &AssetRequest) -> Result<Url, CacheError> {
        self.origin
            .join(&request.url)
            .map_err(|e| CacheError::Network {
                url: request.url.clone(),
                reason: format!("cannot resolve against {}: {e}", self.origin),
            })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        request: &AssetRequest,
    ) -> impl Future<Output = Result<AssetResponse, CacheError>> + Send {
        let resolved = self.resolve(request);
        let method = Method::from_bytes(request.method.as_bytes());
        let client = self.client.clone();
        let url = request.url.clone();

        async move {
            let network = |reason: String| CacheError::Network {
                url: url.clone(),
                reason,
            };
            let target = resolved?;
            let method = method.map_err(|e| network(format!("invalid method: {e}")))?;

            let response = client
                .request(method, target)
                .send()
                .await
                .map_err(|e| network(e.to_string()))?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response
                .bytes()
                .await
                .map_err(|e| network(format!("error reading body: {e}")))?
                .to_vec();

            tracing::debug!(url = %url, status, bytes = body.len(), "network fetch");
            Ok(AssetResponse {
                status,
                content_type,
                body,
            })
        }
    }
}
