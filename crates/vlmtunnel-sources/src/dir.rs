//! Local directory asset source.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use vlmtunnel_core::error::FetchError;
use vlmtunnel_core::traits::AssetSource;

/// Serves assets from files under a root directory, as a static server
/// rooted there would.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map an asset path onto the root, refusing anything that would escape it.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(FetchError::InvalidPath(path.to_string())),
            }
        }
        if resolved == self.root {
            return Err(FetchError::InvalidPath(path.to_string()));
        }
        Ok(resolved)
    }
}

#[async_trait]
impl AssetSource for DirSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let file = self.resolve(path)?;
        match tokio::fs::read_to_string(&file).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(e) => Err(FetchError::Network {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
