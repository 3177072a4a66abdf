//! Answer grading against example ground truth.

use serde::{Deserialize, Serialize};

use crate::model::ExampleMetadata;
use crate::prompt;

/// The outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_correct: bool,
    /// The correct answer, formatted for display ("Yes", "Blue", "U2").
    pub expected: String,
    /// Feedback sentence for the answer panel.
    pub feedback: String,
    /// HTML explanation revealed after answering.
    pub explanation: String,
}

impl ExampleMetadata {
    /// Whether `choice` matches the ground truth.
    ///
    /// Object-reid compares against the lower-cased truth flag, scavenger
    /// colors and circuit components compare case-insensitively.
    pub fn is_correct(&self, choice: &str) -> bool {
        match self {
            ExampleMetadata::ObjectReid(meta) => {
                let truth = meta.truth();
                !truth.is_empty() && choice == truth
            }
            ExampleMetadata::Scavenger(meta) => {
                !meta.final_color.is_empty()
                    && choice.to_lowercase() == meta.final_color.to_lowercase()
            }
            ExampleMetadata::Circuit(meta) => {
                !meta.correct_comp.is_empty()
                    && choice.to_uppercase() == meta.correct_comp.to_uppercase()
            }
        }
    }

    /// The correct answer as shown to the user.
    pub fn expected_answer(&self) -> String {
        match self {
            ExampleMetadata::ObjectReid(meta) => {
                if meta.truth() == "yes" { "Yes" } else { "No" }.to_string()
            }
            ExampleMetadata::Scavenger(meta) => prompt::capitalize(&meta.final_color.to_lowercase()),
            ExampleMetadata::Circuit(meta) => meta.correct_comp.to_uppercase(),
        }
    }

    /// Grade `choice` and build the feedback shown afterwards.
    pub fn grade(&self, choice: &str) -> Verdict {
        let is_correct = self.is_correct(choice);
        let (feedback, explanation) = match self {
            ExampleMetadata::ObjectReid(meta) => (
                prompt::reid_feedback(meta, is_correct),
                prompt::reid_explanation(meta),
            ),
            ExampleMetadata::Scavenger(meta) => (
                prompt::scavenger_feedback(meta, is_correct),
                prompt::scavenger_explanation(meta),
            ),
            ExampleMetadata::Circuit(meta) => (
                prompt::circuit_feedback(meta, is_correct),
                prompt::circuit_explanation(meta),
            ),
        };
        Verdict {
            is_correct,
            expected: self.expected_answer(),
            feedback,
            explanation,
        }
    }
}
