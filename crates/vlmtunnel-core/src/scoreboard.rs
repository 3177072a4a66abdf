//! "How you compare" scoreboard: the user's running accuracy next to
//! benchmark model scores.

use serde::{Deserialize, Serialize};

use crate::benchmarks::BenchmarkRow;
use crate::prompt::escape_html;

/// Placeholder shown when there is no score yet.
pub const NO_SCORE: &str = "–";

/// Format a percentage with at most one decimal, dropping a trailing `.0`.
///
/// `None` and NaN render as [`NO_SCORE`].
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if !s.is_nan() => {
            let rounded = (s * 10.0).round() / 10.0;
            if rounded.fract() == 0.0 {
                format!("{rounded:.0}%")
            } else {
                format!("{rounded:.1}%")
            }
        }
        _ => NO_SCORE.to_string(),
    }
}

/// Whole-number accuracy, undefined until something was answered.
pub fn user_percent(correct: u32, total: u32) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some((f64::from(correct) / f64::from(total) * 100.0).round() as u32)
}

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub label: String,
    /// Bar length in percent, clamped to `[0, 100]`.
    pub percent: f64,
    /// Text shown before the percentage (the user's `correct/total`).
    #[serde(default)]
    pub detail: Option<String>,
    pub is_user: bool,
}

impl ScoreRow {
    fn new(label: &str, percent: f64, detail: Option<String>, is_user: bool) -> Self {
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };
        Self {
            label: label.to_string(),
            percent,
            detail,
            is_user,
        }
    }

    /// "2/3 67%" for the user row, "55%" for models.
    pub fn value_text(&self) -> String {
        match &self.detail {
            Some(detail) => format!("{detail} {}", format_score(Some(self.percent))),
            None => format_score(Some(self.percent)),
        }
    }
}

/// A rendered-ready scoreboard for one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub correct: u32,
    pub total: u32,
    pub rows: Vec<ScoreRow>,
}

impl Scoreboard {
    /// Build the chart rows: the user first (once they have answered), then
    /// the comparison models in order.
    pub fn new(correct: u32, total: u32, comparison: &[BenchmarkRow]) -> Self {
        let mut rows = Vec::with_capacity(comparison.len() + 1);
        if let Some(percent) = user_percent(correct, total) {
            rows.push(ScoreRow::new(
                "You",
                f64::from(percent),
                Some(format!("{correct}/{total}")),
                true,
            ));
        }
        rows.extend(
            comparison
                .iter()
                .map(|model| ScoreRow::new(&model.name, model.score, None, false)),
        );
        Self {
            correct,
            total,
            rows,
        }
    }

    /// The user's accuracy, formatted (`–` before the first answer).
    pub fn user_score_text(&self) -> String {
        format_score(user_percent(self.correct, self.total).map(f64::from))
    }

    /// Render the scoreboard panel HTML.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<h5 class=\"title is-6\">How you compare</h5>");
        if self.total == 0 {
            html.push_str("<p class=\"score-user-summary\">Answer to track your accuracy.</p>");
        }
        html.push_str("<div class=\"model-scores\">");
        for row in &self.rows {
            html.push_str(&render_row(row));
        }
        html.push_str("</div>");
        html
    }
}

fn render_row(row: &ScoreRow) -> String {
    let remaining = (100.0 - row.percent).max(0.0);
    format!(
        "<div class=\"score-row\">\
         <div class=\"score-row-header\">\
         <span class=\"score-row-label\">{}</span>\
         <span class=\"score-row-value\">{}</span>\
         </div>\
         <div class=\"score-bar\">\
         <div class=\"score-bar-green\" style=\"width:{}%\"></div>\
         <div class=\"score-bar-red\" style=\"width:{}%\"></div>\
         </div>\
         </div>",
        escape_html(&row.label),
        escape_html(&row.value_text()),
        row.percent,
        remaining
    )
}
