//! The `vlmtunnel play` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use vlmtunnel_core::dom::{strip_tags, Document};
use vlmtunnel_core::manifest::load_manifests;
use vlmtunnel_core::prompt::capitalize;
use vlmtunnel_core::scoreboard::Scoreboard;
use vlmtunnel_core::surface::{Surface, WidgetIds};
use vlmtunnel_core::{LoadOutcome, QuizController, QuizKind};

const REID_QUESTION: &str = "Does Image 2 still contain the object from Image 1?";

/// An answer the player can give: button ID, label and submitted value.
struct Choice {
    id: String,
    label: String,
    value: String,
}

pub async fn execute(
    quiz: QuizKind,
    source: Option<String>,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    rounds: Option<u32>,
) -> Result<()> {
    anyhow::ensure!(rounds != Some(0), "rounds must be at least 1");

    let (config, source) = super::open_source(source, config_path)?;
    let mut controller_config = config.controller();
    if seed.is_some() {
        controller_config.seed = seed;
    }

    let manifests = load_manifests(source.as_ref(), &config.manifests)
        .await
        .context("failed to load manifests")?;
    anyhow::ensure!(
        !manifests.entries(quiz).is_empty(),
        "the {quiz} manifest has no entries"
    );

    let mut controller =
        QuizController::new(source, Document::with_widgets(), manifests, controller_config);
    controller.render_scoreboard(quiz);
    if controller.load_example(quiz, false).await != LoadOutcome::Applied {
        anyhow::bail!("failed to load a {quiz} example");
    }

    println!("{}", quiz.title());
    print_example(&controller, quiz);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut answered = 0;
    loop {
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "q" | "quit" => break,
            "n" | "next" => {
                match controller.load_example(quiz, true).await {
                    LoadOutcome::Applied => {}
                    outcome => println!("Could not load another example ({outcome:?})."),
                }
                print_example(&controller, quiz);
                continue;
            }
            _ => {}
        }

        let choices = current_choices(controller.surface(), quiz);
        let Some(choice) = pick(&choices, input) else {
            println!("Unknown answer '{input}'. Enter 1-{}, a label, n or q.", choices.len());
            continue;
        };

        let Some(verdict) = controller.answer(quiz, &choice.value, Some(&choice.id)) else {
            println!("Already answered. Enter n for the next example.");
            continue;
        };
        answered += 1;

        let mark = if verdict.is_correct { "CORRECT" } else { "WRONG" };
        println!("\n[{mark}] {}", verdict.feedback);
        let explanation = strip_tags(&verdict.explanation);
        if !explanation.is_empty() {
            println!("{explanation}");
        }
        print_scoreboard(&controller.render_scoreboard(quiz));

        if rounds.is_some_and(|limit| answered >= limit) {
            break;
        }
        println!("\nEnter n for the next example or q to quit.");
    }

    let board = controller.render_scoreboard(quiz);
    println!(
        "\nFinal score: {}/{} ({})",
        board.correct,
        board.total,
        board.user_score_text()
    );
    Ok(())
}

fn print_example(controller: &QuizController<Document>, quiz: QuizKind) {
    let doc = controller.surface();
    let ids = WidgetIds::for_kind(quiz);
    let entry = controller
        .state(quiz)
        .current_entry_id()
        .unwrap_or("?")
        .to_string();

    println!("\nExample {entry}");
    for image in &ids.images {
        if let Some(src) = doc.get(image).and_then(|e| e.src.as_deref()) {
            println!("  image: {src}");
        }
    }

    let question = match &ids.prompt {
        Some(prompt) => doc.plain_text(prompt).unwrap_or_default(),
        None => REID_QUESTION.to_string(),
    };
    println!("{question}");
    let choices = current_choices(doc, quiz);
    for (i, choice) in choices.iter().enumerate() {
        println!("  {}) {}", i + 1, choice.label);
    }
    println!("Answer [1-{}, label, n = next, q = quit]:", choices.len());
}

fn current_choices(doc: &Document, quiz: QuizKind) -> Vec<Choice> {
    let ids = WidgetIds::for_kind(quiz);
    match &ids.options {
        Some(container) => doc
            .children(container)
            .into_iter()
            .filter_map(|id| {
                let element = doc.get(&id)?;
                Some(Choice {
                    label: element.text.clone(),
                    value: element.data.get("value").cloned().unwrap_or_default(),
                    id,
                })
            })
            .collect(),
        None => ids
            .answer_buttons
            .iter()
            .map(|(id, value)| Choice {
                id: id.clone(),
                label: capitalize(value),
                value: value.clone(),
            })
            .collect(),
    }
}

/// Resolve player input as a 1-based option number or a label.
fn pick<'a>(choices: &'a [Choice], input: &str) -> Option<&'a Choice> {
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| choices.get(i));
    }
    choices.iter().find(|c| {
        c.label.eq_ignore_ascii_case(input)
            || c.value.eq_ignore_ascii_case(input)
            || (input.len() == 1 && c.value.to_lowercase().starts_with(&input.to_lowercase()))
    })
}

fn print_scoreboard(board: &Scoreboard) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["", "Accuracy"]);
    for row in &board.rows {
        table.add_row(vec![Cell::new(&row.label), Cell::new(row.value_text())]);
    }
    println!("\nHow you compare\n{table}");
}
