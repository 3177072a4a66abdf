//! Tunnel configuration and source factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vlmtunnel_core::controller::ControllerConfig;
use vlmtunnel_core::manifest::ManifestPaths;
use vlmtunnel_core::traits::AssetSource;

use crate::dir::DirSource;
use crate::http::HttpSource;

/// Where assets are fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Files under a local directory (the site root).
    Dir {
        #[serde(default = "default_root")]
        root: PathBuf,
    },
    /// A static web server.
    Http {
        base_url: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Dir {
            root: default_root(),
        }
    }
}

impl SourceConfig {
    /// Interpret a command-line or environment source: URLs are served over
    /// HTTP, anything else is a directory.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            SourceConfig::Http {
                base_url: location.to_string(),
                timeout_secs: None,
            }
        } else {
            SourceConfig::Dir {
                root: PathBuf::from(location),
            }
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Top-level vlmtunnel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunnelConfig {
    #[serde(default)]
    pub source: SourceConfig,
    /// Manifest locations, relative to the source.
    #[serde(default)]
    pub manifests: ManifestPaths,
    /// Fixed RNG seed for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Redraws allowed when "next" picks the example already shown.
    #[serde(default = "default_pick_retries")]
    pub max_pick_retries: u32,
    /// Pool models added to the top three in each comparison chart.
    #[serde(default = "default_comparison_extras")]
    pub comparison_extras: usize,
}

fn default_pick_retries() -> u32 {
    10
}
fn default_comparison_extras() -> usize {
    2
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            manifests: ManifestPaths::default(),
            seed: None,
            max_pick_retries: default_pick_retries(),
            comparison_extras: default_comparison_extras(),
        }
    }
}

impl TunnelConfig {
    /// The controller settings carried by this configuration.
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            max_pick_retries: self.max_pick_retries,
            comparison_extras: self.comparison_extras,
            seed: self.seed,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Dir { root } => SourceConfig::Dir {
            root: PathBuf::from(resolve_env_vars(&root.to_string_lossy())),
        },
        SourceConfig::Http {
            base_url,
            timeout_secs,
        } => SourceConfig::Http {
            base_url: resolve_env_vars(base_url),
            timeout_secs: *timeout_secs,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `vlmtunnel.toml` in the current directory
/// 2. `~/.config/vlmtunnel/config.toml`
///
/// `VLMTUNNEL_SOURCE` overrides the configured source.
pub fn load_config() -> Result<TunnelConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TunnelConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("vlmtunnel.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => TunnelConfig::default(),
    };

    if let Ok(location) = std::env::var("VLMTUNNEL_SOURCE") {
        if !location.is_empty() {
            config.source = resolve_source_config(&SourceConfig::from_location(&location));
        }
    }

    tracing::debug!(
        path = ?config_path,
        source = ?config.source,
        "configuration loaded"
    );
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<TunnelConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = toml::from_str::<TunnelConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    config.source = resolve_source_config(&config.source);

    // A relative directory root is relative to the config file.
    if let SourceConfig::Dir { root } = &mut config.source {
        if root.is_relative() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                *root = parent.join(&*root);
            }
        }
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vlmtunnel"))
}

/// Create an asset source from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn AssetSource>> {
    match config {
        SourceConfig::Dir { root } => {
            if !root.is_dir() {
                anyhow::bail!("asset directory not found: {}", root.display());
            }
            Ok(Arc::new(DirSource::new(root.clone())))
        }
        SourceConfig::Http {
            base_url,
            timeout_secs,
        } => {
            if base_url.is_empty() {
                anyhow::bail!("http source needs a base_url");
            }
            let source = HttpSource::new(base_url, *timeout_secs)
                .with_context(|| format!("failed to build HTTP client for {base_url}"))?;
            Ok(Arc::new(source))
        }
    }
}
