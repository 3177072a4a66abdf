//! Core trait definitions for asset sources.
//!
//! Implemented by the `vlmtunnel-sources` crate (HTTP, local directory) and by
//! [`crate::mock::MockSource`] for tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::FetchError;

/// Anything that can serve manifest and metadata documents by path.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Human-readable source description (e.g. a base URL).
    fn describe(&self) -> String;

    /// Fetch a document as text.
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

/// Fetch a document and decode it as JSON.
pub async fn fetch_json<T: DeserializeOwned>(
    source: &dyn AssetSource,
    path: &str,
) -> Result<T, FetchError> {
    let text = source.fetch_text(path).await?;
    serde_json::from_str(&text).map_err(|e| FetchError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Join a relative asset path onto a base, tolerating stray slashes.
pub fn join_asset_path(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.trim_start_matches("./").to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches("./").trim_start_matches('/')
    )
}
