//! The `vlmtunnel validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use vlmtunnel_core::manifest::load_manifests;
use vlmtunnel_core::validate::{validate_examples, validate_manifest, ValidationWarning};
use vlmtunnel_core::QuizKind;

pub async fn execute(source: Option<String>, config_path: Option<PathBuf>, deep: bool) -> Result<()> {
    let (config, source) = super::open_source(source, config_path)?;
    let manifests = load_manifests(source.as_ref(), &config.manifests)
        .await
        .context("failed to load manifests")?;

    let mut total_warnings = 0;

    for kind in QuizKind::ALL {
        let entries = manifests.entries(kind);
        println!(
            "{} manifest: {} ({} entries)",
            kind,
            config.manifests.path(kind),
            entries.len()
        );

        let mut warnings = validate_manifest(kind, entries);
        if deep {
            warnings.extend(validate_examples(source.as_ref(), kind, entries).await);
        }
        print_warnings(&warnings);
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All manifests valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn print_warnings(warnings: &[ValidationWarning]) {
    for w in warnings {
        let prefix = w
            .entry_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
}
