//! The `vlmtunnel benchmarks` command.

use anyhow::Result;

use vlmtunnel_core::benchmarks::{benchmark_table, BenchmarkTable};
use vlmtunnel_core::scoreboard::format_score;
use vlmtunnel_core::QuizKind;

pub fn execute(quiz: Option<QuizKind>, format: String) -> Result<()> {
    let kinds: Vec<QuizKind> = match quiz {
        Some(kind) => vec![kind],
        None => QuizKind::ALL.to_vec(),
    };

    match format.as_str() {
        "json" => {
            let tables: serde_json::Map<String, serde_json::Value> = kinds
                .iter()
                .map(|kind| -> Result<(String, serde_json::Value)> {
                    Ok((kind.to_string(), serde_json::to_value(benchmark_table(*kind))?))
                })
                .collect::<Result<_>>()?;
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }
        "text" => {
            for kind in kinds {
                println!("{} ({kind})", kind.title());
                println!("{}\n", render_table(&benchmark_table(kind)));
            }
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn render_table(table: &BenchmarkTable) -> comfy_table::Table {
    use comfy_table::{Cell, Table};

    let mut out = Table::new();
    out.set_header(vec!["Model", "Accuracy", "Shown"]);
    out.add_row(vec![
        Cell::new("Human"),
        Cell::new(format_score(Some(table.human))),
        Cell::new("baseline"),
    ]);
    for row in &table.top {
        out.add_row(vec![
            Cell::new(&row.name),
            Cell::new(format_score(Some(row.score))),
            Cell::new("always"),
        ]);
    }
    for row in &table.pool {
        out.add_row(vec![
            Cell::new(&row.name),
            Cell::new(format_score(Some(row.score))),
            Cell::new("sampled"),
        ]);
    }
    out
}
