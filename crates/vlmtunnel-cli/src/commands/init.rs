//! The `vlmtunnel init` command.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

const DATA_DIR: &str = "static/data/vlmtunnel";

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("vlmtunnel.toml"), SAMPLE_CONFIG)?;

    for (path, content) in demo_files()? {
        write_if_missing(Path::new(&path), &content)?;
    }

    println!("\nNext steps:");
    println!("  1. Run: vlmtunnel validate --deep");
    println!("  2. Run: vlmtunnel play --quiz scavenger");
    println!("  3. Run: vlmtunnel render --output vlmtunnel.html");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

/// Manifests, metadata and placeholder images of the demo dataset.
fn demo_files() -> Result<Vec<(String, String)>> {
    let mut files = Vec::new();
    let mut add_json = |path: String, value: serde_json::Value| -> Result<()> {
        files.push((path, serde_json::to_string_pretty(&value)?));
        Ok(())
    };

    add_json(
        format!("{DATA_DIR}/object_reid_manifest.json"),
        json!([
            {"id": 1, "image1": format!("{DATA_DIR}/reid/1_a.svg"), "image2": format!("{DATA_DIR}/reid/1_b.svg"), "meta": format!("{DATA_DIR}/reid/1.json")},
            {"id": 2, "image1": format!("{DATA_DIR}/reid/2_a.svg"), "image2": format!("{DATA_DIR}/reid/2_b.svg"), "meta": format!("{DATA_DIR}/reid/2.json")}
        ]),
    )?;
    add_json(
        format!("{DATA_DIR}/reid/1.json"),
        json!({
            "truth": "yes",
            "shapes": [{"color": "red", "type": "circle"}, {"color": "blue", "type": "square"}],
            "jit_attrs": []
        }),
    )?;
    add_json(
        format!("{DATA_DIR}/reid/2.json"),
        json!({
            "truth": "no",
            "shapes": [{"color": "green", "type": "triangle"}, {"color": "yellow", "type": "star"}],
            "jit_attrs": [{"color": "green", "type": "triangle"}]
        }),
    )?;

    add_json(
        format!("{DATA_DIR}/visual_scavenger_manifest.json"),
        json!([
            {"id": "s1", "board": format!("{DATA_DIR}/scavenger/s1.svg"), "meta": format!("{DATA_DIR}/scavenger/s1.json")}
        ]),
    )?;
    add_json(
        format!("{DATA_DIR}/scavenger/s1.json"),
        json!({
            "start_pair": ["triangle", "red"],
            "chain": [["triangle", "red"], ["circle", "green"], ["star", "yellow"], ["square", "blue"]],
            "final_color": "blue",
            "color_counts": {"red": 3, "green": 2, "yellow": 2, "blue": 1}
        }),
    )?;

    add_json(
        format!("{DATA_DIR}/circuits_manifest.json"),
        json!([
            {"id": "c1", "diagram": format!("{DATA_DIR}/circuits/c1.svg"), "meta": format!("{DATA_DIR}/circuits/c1.json")},
            {"id": "c2", "diagram": format!("{DATA_DIR}/circuits/c2.svg"), "meta": format!("{DATA_DIR}/circuits/c2.json")}
        ]),
    )?;
    add_json(
        format!("{DATA_DIR}/circuits/c1.json"),
        json!({"mapping": {"A1": "U2", "B3": "R1", "C5": "C4"}, "query_port": "A1", "correct_comp": "U2"}),
    )?;
    add_json(
        format!("{DATA_DIR}/circuits/c2.json"),
        json!({"mapping": {"A2": "R1", "B1": "U2", "D4": "C4"}, "query_port": "D4", "correct_comp": "C4"}),
    )?;

    for image in [
        "reid/1_a", "reid/1_b", "reid/2_a", "reid/2_b", "scavenger/s1", "circuits/c1", "circuits/c2",
    ] {
        files.push((format!("{DATA_DIR}/{image}.svg"), placeholder_svg(image)));
    }

    Ok(files)
}

fn placeholder_svg(label: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"320\" height=\"240\">\
         <rect width=\"320\" height=\"240\" fill=\"#e5e7eb\"/>\
         <text x=\"160\" y=\"120\" font-size=\"18\" text-anchor=\"middle\" \
         dominant-baseline=\"middle\" fill=\"#374151\">{label}</text></svg>\n"
    )
}

const SAMPLE_CONFIG: &str = r#"# vlmtunnel configuration

# Serve assets from this directory (relative to this file).
# Use type = "http" with base_url = "https://..." for a hosted copy.
[source]
type = "dir"
root = "."

[manifests]
object_reid = "static/data/vlmtunnel/object_reid_manifest.json"
scavenger = "static/data/vlmtunnel/visual_scavenger_manifest.json"
circuit = "static/data/vlmtunnel/circuits_manifest.json"

# seed = 42
max_pick_retries = 10
comparison_extras = 2
"#;
