//! vlmtunnel-report — Static page export.
//!
//! Serializes a rendered `Document` into a self-contained HTML file.

pub mod html;

pub use html::{generate_page, write_page};
