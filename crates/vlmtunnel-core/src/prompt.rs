//! Question, feedback and explanation text for each quiz.
//!
//! Everything here is pure formatting over example metadata. Strings that
//! end up as HTML escape any metadata they embed.

use crate::model::{CircuitMetadata, QuizKind, ReidMetadata, ScavengerMetadata};

/// Escape a string for safe HTML insertion.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// "a", "a and b", "a, b, and c".
pub fn list_to_english<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Upper-case the first character.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Feedback shown while an example waits for an answer.
pub fn idle_feedback(kind: QuizKind) -> &'static str {
    match kind {
        QuizKind::ObjectReid => "Select an answer to see how you compare.",
        QuizKind::Scavenger => "Select the color you land on after three hops.",
        QuizKind::Circuit => "Pick the component label you believe the wire reaches.",
    }
}

// ---------------------------------------------------------------------------
// Object re-identification
// ---------------------------------------------------------------------------

pub fn reid_feedback(meta: &ReidMetadata, is_correct: bool) -> String {
    let truth = meta.truth();
    if is_correct {
        if truth == "yes" {
            "Nice! The composite still matches Image 2.".to_string()
        } else {
            "Nice catch! Image 2 does not contain the original object.".to_string()
        }
    } else {
        let correct_word = if truth == "yes" { "Yes" } else { "No" };
        format!(
            "Not quite. The correct answer is {correct_word} because one piece moves relative to the rest."
        )
    }
}

pub fn reid_explanation(meta: &ReidMetadata) -> String {
    let pieces: Vec<String> = meta
        .shapes
        .iter()
        .map(|s| escape_html(&s.describe()))
        .collect();
    let parts_sentence = if pieces.is_empty() {
        String::new()
    } else {
        format!("The object combines {}.", list_to_english(&pieces))
    };

    if meta.truth() == "yes" {
        return format!(
            "<p>{parts_sentence}</p><p>In Image 2 those pieces stay locked together. \
             Extra shapes are distractors, so the answer is <strong>Yes</strong>.</p>"
        );
    }

    let moved: Vec<String> = meta
        .jit_attrs
        .iter()
        .map(|s| escape_html(&s.describe()))
        .collect();
    let change_sentence = if moved.is_empty() {
        "Image 2 changes the arrangement, so the object is no longer identical.".to_string()
    } else {
        format!(
            "Image 2 nudges the {} away from the rest, breaking the match.",
            list_to_english(&moved)
        )
    };
    format!("<p>{parts_sentence}</p><p>{change_sentence} The correct answer is <strong>No</strong>.</p>")
}

// ---------------------------------------------------------------------------
// Scavenger hunt
// ---------------------------------------------------------------------------

pub fn scavenger_prompt(meta: &ScavengerMetadata) -> String {
    let pick = |idx: usize, fallback: &'static str| -> String {
        meta.start_pair
            .get(idx)
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    };
    let shape = pick(0, "shape");
    let color = pick(1, "color");
    format!(
        "Start on the {color} {shape} and follow {} label hops. What color do you reach?",
        meta.hop_count()
    )
}

pub fn scavenger_feedback(meta: &ScavengerMetadata, is_correct: bool) -> String {
    let final_color = capitalize(&meta.final_color.to_lowercase());
    if is_correct {
        format!("Nice tracking! The trail ends on {final_color}.")
    } else {
        format!("Close, but the trail ends on {final_color}.")
    }
}

pub fn scavenger_explanation(meta: &ScavengerMetadata) -> String {
    let last = meta.chain.len().saturating_sub(1);
    let steps: String = meta
        .chain
        .iter()
        .enumerate()
        .map(|(idx, pair)| {
            let shape = escape_html(pair.first().map(String::as_str).unwrap_or_default());
            let color = escape_html(pair.get(1).map(String::as_str).unwrap_or_default());
            let verb = if idx == 0 {
                "Start on"
            } else if idx == last {
                "Finish on"
            } else {
                "Hop to"
            };
            format!("<li>{verb} the <strong>{color} {shape}</strong>.</li>")
        })
        .collect();

    if steps.is_empty() {
        String::new()
    } else {
        format!("<ol>{steps}</ol>")
    }
}

// ---------------------------------------------------------------------------
// Circuits
// ---------------------------------------------------------------------------

pub fn circuit_prompt(meta: &CircuitMetadata) -> String {
    format!(
        "Follow the wire leaving port {} on the breadboard. Where does it terminate?",
        meta.port_label()
    )
}

pub fn circuit_feedback(meta: &CircuitMetadata, is_correct: bool) -> String {
    let correct = meta.correct_comp.to_uppercase();
    let port = meta.port_label();
    if is_correct {
        format!("Correct! Port {port} connects to {correct}.")
    } else {
        format!("Not this time. The wire from port {port} ends at {correct}.")
    }
}

pub fn circuit_explanation(meta: &CircuitMetadata) -> String {
    let port = escape_html(meta.port_label());
    let correct = escape_html(&meta.correct_comp.to_uppercase());
    let others: Vec<String> = meta
        .components()
        .into_iter()
        .filter(|c| !c.eq_ignore_ascii_case(&meta.correct_comp))
        .map(|c| escape_html(&c))
        .collect();

    let mut html = format!(
        "<p>The wire leaves port <strong>{port}</strong> and terminates at <strong>{correct}</strong>.</p>"
    );
    if !others.is_empty() {
        html.push_str(&format!(
            "<p>It never reaches {}; those wires start from other ports.</p>",
            list_to_english(&others)
        ));
    }
    html
}
