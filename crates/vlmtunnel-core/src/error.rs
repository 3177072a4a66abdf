//! Asset fetch error types.
//!
//! Defined in `vlmtunnel-core` so the controller can log and classify fetch
//! failures from any `AssetSource` without string matching.

use thiserror::Error;

/// Errors that can occur while fetching a manifest or metadata document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("failed to fetch {path} (HTTP {status})")]
    Status { path: String, status: u16 },

    /// The document does not exist in the source.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The path escapes the source root or is otherwise unusable.
    #[error("invalid asset path: {0}")]
    InvalidPath(String),

    /// A transport-level failure (connection refused, I/O error, ...).
    #[error("network error fetching {path}: {message}")]
    Network { path: String, message: String },

    /// The document was fetched but could not be decoded.
    #[error("failed to decode {path}: {message}")]
    Decode { path: String, message: String },
}

impl FetchError {
    /// The asset path this error refers to.
    pub fn path(&self) -> &str {
        match self {
            FetchError::Status { path, .. }
            | FetchError::Network { path, .. }
            | FetchError::Decode { path, .. } => path,
            FetchError::NotFound(path) | FetchError::InvalidPath(path) => path,
        }
    }

    /// Returns `true` when the document is known to be absent rather than
    /// temporarily unreachable.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            FetchError::NotFound(_) | FetchError::Status { status: 404, .. }
        )
    }
}
