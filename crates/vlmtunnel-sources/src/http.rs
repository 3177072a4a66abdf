//! Static web server asset source.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use vlmtunnel_core::error::FetchError;
use vlmtunnel_core::traits::{join_asset_path, AssetSource};

/// Fetches assets relative to a base URL.
pub struct HttpSource {
    base_url: String,
    timeout_secs: Option<u64>,
    client: reqwest::Client,
}

impl HttpSource {
    /// Build a source for `base_url`. Requests never time out unless
    /// `timeout_secs` is given.
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client: builder.build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        join_asset_path(&self.base_url, path)
    }
}

#[async_trait]
impl AssetSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| FetchError::Network {
                path: path.to_string(),
                message: if e.is_timeout() {
                    format!("timed out after {}s", self.timeout_secs.unwrap_or_default())
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(FetchError::NotFound(path.to_string()));
        }
        if !response.status().is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Network {
            path: path.to_string(),
            message: format!("failed to read body: {e}"),
        })?;
        tracing::debug!(bytes = body.len(), "fetched");
        Ok(body)
    }
}
