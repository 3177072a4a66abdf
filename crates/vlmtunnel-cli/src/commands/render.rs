//! The `vlmtunnel render` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use vlmtunnel_core::dom::Document;
use vlmtunnel_core::{QuizController, QuizKind};
use vlmtunnel_report::write_page;

const PAGE_TITLE: &str = "VLM Tunnel";

pub async fn execute(
    output: PathBuf,
    source: Option<String>,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let (config, source) = super::open_source(source, config_path)?;
    let mut controller_config = config.controller();
    if seed.is_some() {
        controller_config.seed = seed;
    }

    let mut controller = QuizController::start(
        source,
        Document::with_widgets(),
        &config.manifests,
        controller_config,
    )
    .await
    .context("failed to load manifests")?;

    let sessions: Vec<_> = QuizKind::ALL
        .iter()
        .map(|&kind| (kind, controller.render_scoreboard(kind)))
        .collect();
    for (kind, _) in &sessions {
        match controller.state(*kind).current_entry_id() {
            Some(id) => println!("{kind}: example {id}"),
            None => println!("{kind}: no example loaded"),
        }
    }

    write_page(controller.surface(), PAGE_TITLE, &sessions, &output)?;
    println!("Wrote {}", output.display());
    Ok(())
}
