//! HTML page generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use vlmtunnel_core::dom::Document;
use vlmtunnel_core::model::QuizKind;
use vlmtunnel_core::prompt::escape_html;
use vlmtunnel_core::scoreboard::Scoreboard;

/// Elements rendered without a closing tag.
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input"];

/// Generate a static page from a rendered document.
///
/// `sessions` are embedded as raw JSON below the widgets.
pub fn generate_page(
    doc: &Document,
    title: &str,
    sessions: &[(QuizKind, Scoreboard)],
) -> Result<String> {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    html.push_str(&format!(
        "<p class=\"meta\">Rendered {}</p>\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<main>\n");
    for root in doc.roots() {
        render_element(doc, root, &mut html);
        html.push('\n');
    }
    html.push_str("</main>\n");

    if !sessions.is_empty() {
        let data = sessions
            .iter()
            .map(|(kind, board)| -> Result<(String, serde_json::Value)> {
                Ok((kind.to_string(), serde_json::to_value(board)?))
            })
            .collect::<Result<serde_json::Map<String, serde_json::Value>>>()
            .context("failed to serialize session data")?;
        html.push_str("<section class=\"raw-data\">\n");
        html.push_str("<details>\n<summary>Session JSON</summary>\n");
        html.push_str("<pre><code>");
        html.push_str(&escape_html(&serde_json::to_string_pretty(&data)?));
        html.push_str("</code></pre>\n");
        html.push_str("</details>\n</section>\n");
    }

    html.push_str("</body>\n</html>");
    Ok(html)
}

fn render_element(doc: &Document, id: &str, out: &mut String) {
    let Some(element) = doc.get(id) else {
        return;
    };

    out.push_str(&format!("<{} id=\"{}\"", element.tag, escape_html(&element.id)));
    if !element.classes.is_empty() {
        let classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
        out.push_str(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
    }
    if let Some(src) = &element.src {
        out.push_str(&format!(" src=\"{}\" alt=\"\"", escape_html(src)));
    }
    for (key, value) in &element.data {
        out.push_str(&format!(" data-{}=\"{}\"", key, escape_html(value)));
    }
    if element.disabled {
        out.push_str(" disabled");
    }
    out.push('>');

    if VOID_TAGS.contains(&element.tag.as_str()) {
        return;
    }

    match &element.html {
        Some(markup) => out.push_str(markup),
        None => {
            out.push_str(&escape_html(&element.text));
            for child in &element.children {
                render_element(doc, child, out);
            }
        }
    }
    out.push_str(&format!("</{}>", element.tag));
}

/// Write a static page to a file.
pub fn write_page(
    doc: &Document,
    title: &str,
    sessions: &[(QuizKind, Scoreboard)],
    path: &Path,
) -> Result<()> {
    let html = generate_page(doc, title, sessions)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #22c55e; --bad: #ef4444; --muted: #6b7280; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --muted: #9ca3af; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1 { margin-top: 0; }
.meta, .score-user-summary { color: var(--muted); }
.quiz-widget { border: 1px solid var(--border); border-radius: 8px; padding: 1.5rem; margin: 1.5rem 0; }
.quiz-image { max-width: 48%; margin-right: 1%; transition: opacity 0.2s; }
.is-fading { opacity: 0.2; }
.is-hidden { display: none; }
.button { padding: 0.4rem 1rem; margin: 0.25rem; border: 1px solid var(--border); border-radius: 4px; background: var(--bg); color: var(--fg); }
.is-disabled { opacity: 0.6; }
.is-correct { border-color: var(--good); background: var(--good); color: #fff; }
.is-wrong { border-color: var(--bad); background: var(--bad); color: #fff; }
.notification { padding: 0.75rem 1rem; border-radius: 4px; background: var(--border); }
.notification.is-success { background: var(--good); color: #fff; }
.notification.is-danger { background: var(--bad); color: #fff; }
.score-row { margin: 0.4rem 0; }
.score-row-header { display: flex; justify-content: space-between; font-size: 0.9rem; }
.score-bar { display: flex; height: 10px; border-radius: 5px; overflow: hidden; }
.score-bar-green { background: var(--good); }
.score-bar-red { background: var(--bad); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use vlmtunnel_core::benchmarks::BenchmarkRow;
    use vlmtunnel_core::dom::Element;
    use vlmtunnel_core::surface::Surface;

    fn make_page() -> Document {
        let mut doc = Document::with_widgets();
        doc.set_text("circuit-prompt", "Follow the wire <A1>");
        doc.set_image("reid-image-1", "reid/a.png?v=1&x=2");
        doc.set_html("reid-explanation", "<p>The object combines <strong>red circle</strong>.</p>");
        doc.set_disabled("reid-yes", true);
        doc
    }

    #[test]
    fn page_contains_widgets() {
        let doc = make_page();
        let html = generate_page(&doc, "VLM Tunnel", &[]).unwrap();

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<title>VLM Tunnel</title>"));
        assert!(html.contains("id=\"reid-widget\""));
        assert!(html.contains("id=\"circuit-scoreboard\""));
        assert!(html.contains("Follow the wire &lt;A1&gt;"));
        assert!(html.contains("src=\"reid/a.png?v=1&amp;x=2\""));
        assert!(html.contains("<strong>red circle</strong>"));
        assert!(html.contains("data-value=\"yes\" disabled>Yes</button>"));
        assert!(!html.contains("</img>"));
        assert!(!html.contains("Session JSON"));
    }

    #[test]
    fn page_embeds_session_json() {
        let mut doc = Document::new();
        doc.insert(None, Element::new("note", "p").with_text("hello"));
        let board = Scoreboard::new(
            1,
            2,
            &[BenchmarkRow {
                name: "GPT-5".into(),
                score: 60.0,
            }],
        );
        let html = generate_page(&doc, "Session", &[(QuizKind::Circuit, board)]).unwrap();
        assert!(html.contains("<p id=\"note\">hello</p>"));
        assert!(html.contains("Session JSON"));
        assert!(html.contains("&quot;circuit&quot;"));
        assert!(html.contains("GPT-5"));
    }

    #[test]
    fn page_write_to_file() {
        let doc = make_page();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("page.html");

        write_page(&doc, "VLM Tunnel", &[], &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("reid-feedback"));
    }
}
