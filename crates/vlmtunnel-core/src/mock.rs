//! In-memory asset source for tests and demos.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::traits::AssetSource;

/// An asset source serving documents from a map.
///
/// Paths can be marked as failing to simulate server errors.
#[derive(Default)]
pub struct MockSource {
    /// Map of path → document body.
    documents: HashMap<String, String>,
    /// Paths answered with HTTP 500.
    failing: HashSet<String>,
    /// Number of fetches made.
    call_count: AtomicU32,
    /// Every path requested, in order.
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a JSON document.
    pub fn with_json(mut self, path: &str, value: serde_json::Value) -> Self {
        self.documents.insert(path.to_string(), value.to_string());
        self
    }

    /// Add a raw text document.
    pub fn with_text(mut self, path: &str, body: &str) -> Self {
        self.documents.insert(path.to_string(), body.to_string());
        self
    }

    /// Make every fetch of `path` fail with a server error.
    pub fn with_failure(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AssetSource for MockSource {
    fn describe(&self) -> String {
        format!("memory ({} documents)", self.documents.len())
    }

    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(path.to_string());
        }

        if self.failing.contains(path) {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: 500,
            });
        }

        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}
