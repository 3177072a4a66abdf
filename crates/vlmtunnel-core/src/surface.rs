//! The render target the controller writes into.
//!
//! A `Surface` addresses elements by ID, like a host page. Every operation
//! reports whether the element existed; missing elements are tolerated and the
//! caller simply skips that render step.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::QuizKind;

/// CSS classes toggled by the controller.
pub mod class {
    pub const FADING: &str = "is-fading";
    pub const HIDDEN: &str = "is-hidden";
    pub const SUCCESS: &str = "is-success";
    pub const DANGER: &str = "is-danger";
    pub const DISABLED: &str = "is-disabled";
    pub const CORRECT: &str = "is-correct";
    pub const WRONG: &str = "is-wrong";
}

/// Whether an image finished loading synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    /// Already available (cached); no load event will follow.
    Complete,
    /// The surface clears the fade itself once the image arrives.
    Pending,
}

/// A dynamically created answer button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionButton {
    pub id: String,
    /// Visible label.
    pub label: String,
    /// Answer value passed to the handler when clicked.
    pub value: String,
}

/// An element-ID addressed render target.
pub trait Surface {
    fn contains(&self, id: &str) -> bool;

    /// Replace the element's content with plain text.
    fn set_text(&mut self, id: &str, text: &str) -> bool;

    /// Replace the element's content with markup.
    fn set_html(&mut self, id: &str, html: &str) -> bool;

    fn add_class(&mut self, id: &str, class: &str) -> bool;

    fn remove_class(&mut self, id: &str, class: &str) -> bool;

    fn set_disabled(&mut self, id: &str, disabled: bool) -> bool;

    /// Point an image element at `src`. `None` if the element is missing.
    fn set_image(&mut self, id: &str, src: &str) -> Option<ImageLoad>;

    /// Replace a container's children with fresh option buttons.
    ///
    /// `false` if the container is missing or not every button was inserted.
    fn replace_options(&mut self, container: &str, options: &[OptionButton]) -> bool;

    /// IDs of a container's child elements.
    fn children(&self, id: &str) -> Vec<String>;
}

/// Element IDs of one quiz widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetIds {
    pub kind: QuizKind,
    pub images: Vec<String>,
    pub prompt: Option<String>,
    pub options: Option<String>,
    /// Fixed answer buttons and the value each one submits.
    pub answer_buttons: Vec<(String, String)>,
    pub overlay: Option<String>,
    pub feedback: String,
    pub explanation: String,
    pub next: String,
    pub scoreboard: String,
}

impl WidgetIds {
    pub fn for_kind(kind: QuizKind) -> Self {
        let prefix = kind.element_prefix();
        let id = |suffix: &str| format!("{prefix}-{suffix}");
        match kind {
            QuizKind::ObjectReid => Self {
                kind,
                images: vec![id("image-1"), id("image-2")],
                prompt: None,
                options: None,
                answer_buttons: vec![
                    (id("yes"), "yes".to_string()),
                    (id("no"), "no".to_string()),
                ],
                overlay: None,
                feedback: id("feedback"),
                explanation: id("explanation"),
                next: id("next"),
                scoreboard: id("scoreboard"),
            },
            QuizKind::Scavenger => Self {
                kind,
                images: vec![id("image")],
                prompt: Some(id("prompt")),
                options: Some(id("options")),
                answer_buttons: vec![],
                overlay: Some(id("overlay")),
                feedback: id("feedback"),
                explanation: id("explanation"),
                next: id("next"),
                scoreboard: id("scoreboard"),
            },
            QuizKind::Circuit => Self {
                kind,
                images: vec![id("image")],
                prompt: Some(id("prompt")),
                options: Some(id("options")),
                answer_buttons: vec![],
                overlay: None,
                feedback: id("feedback"),
                explanation: id("explanation"),
                next: id("next"),
                scoreboard: id("scoreboard"),
            },
        }
    }

    /// Build option buttons from `(label, value)` pairs.
    ///
    /// IDs are slugged from the value; values that slug to the same ID get a
    /// numeric suffix so every button stays addressable.
    pub fn option_buttons(&self, choices: Vec<(String, String)>) -> Vec<OptionButton> {
        let prefix = self.option_prefix();
        let mut taken = HashSet::new();
        choices
            .into_iter()
            .map(|(label, value)| {
                let base = format!("{prefix}{}", slug(&value));
                let mut id = base.clone();
                let mut n = 2;
                while !taken.insert(id.clone()) {
                    id = format!("{base}-{n}");
                    n += 1;
                }
                OptionButton { id, label, value }
            })
            .collect()
    }

    /// Prefix shared by all dynamic option button IDs.
    pub fn option_prefix(&self) -> String {
        format!("{}-option-", self.kind.element_prefix())
    }
}

/// Lower-case, with anything but ASCII alphanumerics turned into `-`.
fn slug(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
