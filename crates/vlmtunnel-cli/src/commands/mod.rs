pub mod benchmarks;
pub mod init;
pub mod play;
pub mod render;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use vlmtunnel_core::traits::AssetSource;
use vlmtunnel_sources::config::{create_source, load_config_from, SourceConfig, TunnelConfig};

/// Load the configuration, apply a `--source` override and build the source.
pub fn open_source(
    source: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<(TunnelConfig, Arc<dyn AssetSource>)> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(location) = source {
        config.source = SourceConfig::from_location(&location);
    }
    let source = create_source(&config.source)?;
    tracing::info!(source = %source.describe(), "using asset source");
    Ok((config, source))
}
