//! vlmtunnel-sources — Where quiz assets come from.
//!
//! Implements the `AssetSource` trait for a static web server and for a local
//! directory, and loads the `vlmtunnel.toml` configuration that picks one.

pub mod config;
pub mod dir;
pub mod http;

pub use config::{create_source, load_config, load_config_from, SourceConfig, TunnelConfig};
pub use dir::DirSource;
pub use http::HttpSource;
