//! In-memory element tree implementing [`Surface`].
//!
//! `Document::with_widgets()` builds the standard three-widget page; tests and
//! the CLI read rendered state back out of it, and the report crate serializes
//! it to HTML.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::QuizKind;
use crate::surface::{class, ImageLoad, OptionButton, Surface, WidgetIds};

/// A single element of the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: String,
    pub tag: String,
    pub text: String,
    /// Raw inner markup; takes precedence over `text` and `children`.
    pub html: Option<String>,
    pub classes: BTreeSet<String>,
    pub disabled: bool,
    pub src: Option<String>,
    pub data: BTreeMap<String, String>,
    pub children: Vec<String>,
}

impl Element {
    pub fn new(id: &str, tag: &str) -> Self {
        Self {
            id: id.to_string(),
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// An in-memory page addressed by element ID.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: HashMap<String, Element>,
    roots: Vec<String>,
    defer_images: bool,
    pending_images: BTreeSet<String>,
}

impl Document {
    /// An empty document. Every surface operation on it is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard page with all three quiz widgets.
    pub fn with_widgets() -> Self {
        let mut doc = Self::new();
        for kind in QuizKind::ALL {
            doc.add_widget(kind);
        }
        doc
    }

    /// Keep images fading until [`Document::finish_image_loads`] is called,
    /// like a browser still downloading them.
    pub fn deferring_images(mut self) -> Self {
        self.defer_images = true;
        self
    }

    /// Add the elements of one quiz widget.
    pub fn add_widget(&mut self, kind: QuizKind) {
        let ids = WidgetIds::for_kind(kind);
        let section = format!("{}-widget", kind.element_prefix());
        self.insert(None, Element::new(&section, "section").with_class("box quiz-widget"));
        self.insert(
            Some(&section),
            Element::new(&format!("{}-title", kind.element_prefix()), "h3")
                .with_class("title is-5")
                .with_text(kind.title()),
        );

        for image in &ids.images {
            self.insert(Some(&section), Element::new(image, "img").with_class("quiz-image"));
        }
        if let Some(overlay) = &ids.overlay {
            self.insert(Some(&section), Element::new(overlay, "div").with_class("quiz-overlay"));
        }
        if let Some(prompt) = &ids.prompt {
            self.insert(Some(&section), Element::new(prompt, "p").with_class("quiz-prompt"));
        }
        if let Some(options) = &ids.options {
            self.insert(Some(&section), Element::new(options, "div").with_class("buttons"));
        }
        if !ids.answer_buttons.is_empty() {
            let answers = format!("{}-answers", kind.element_prefix());
            self.insert(Some(&section), Element::new(&answers, "div").with_class("buttons"));
            for (id, value) in &ids.answer_buttons {
                let mut button = Element::new(id, "button")
                    .with_class("button is-medium")
                    .with_text(&crate::prompt::capitalize(value));
                button.data.insert("value".into(), value.clone());
                self.insert(Some(&answers), button);
            }
        }
        self.insert(Some(&section), Element::new(&ids.feedback, "p").with_class("notification"));
        self.insert(
            Some(&section),
            Element::new(&ids.explanation, "div").with_class("content is-hidden"),
        );
        self.insert(
            Some(&section),
            Element::new(&ids.next, "button")
                .with_class("button is-link")
                .with_text("Next example"),
        );
        self.insert(Some(&section), Element::new(&ids.scoreboard, "div").with_class("scoreboard"));
    }

    /// Insert an element at the top level or under `parent`.
    ///
    /// Returns `false` if the ID is taken or the parent does not exist.
    pub fn insert(&mut self, parent: Option<&str>, element: Element) -> bool {
        if self.elements.contains_key(&element.id) {
            return false;
        }
        match parent {
            Some(parent_id) => match self.elements.get_mut(parent_id) {
                Some(parent) => parent.children.push(element.id.clone()),
                None => return false,
            },
            None => self.roots.push(element.id.clone()),
        }
        self.elements.insert(element.id.clone(), element);
        true
    }

    /// Remove an element and its subtree.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(element) = self.elements.remove(id) else {
            return false;
        };
        for child in &element.children {
            self.remove(child);
        }
        self.roots.retain(|r| r != id);
        for other in self.elements.values_mut() {
            other.children.retain(|c| c != id);
        }
        self.pending_images.remove(id);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Top-level element IDs in insertion order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Readable text of an element: its markup with tags stripped, or its
    /// text, or its children's text joined by newlines.
    pub fn plain_text(&self, id: &str) -> Option<String> {
        let element = self.get(id)?;
        if let Some(html) = &element.html {
            return Some(strip_tags(html));
        }
        if !element.children.is_empty() && element.text.is_empty() {
            let parts: Vec<String> = element
                .children
                .iter()
                .filter_map(|c| self.plain_text(c))
                .filter(|t| !t.is_empty())
                .collect();
            return Some(parts.join("\n"));
        }
        Some(element.text.clone())
    }

    /// Deliver load events for images still downloading. Returns how many
    /// images finished.
    pub fn finish_image_loads(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_images);
        for id in &pending {
            if let Some(img) = self.elements.get_mut(id) {
                img.classes.remove(class::FADING);
            }
        }
        pending.len()
    }

    fn clear_children(&mut self, id: &str) {
        let children = self
            .elements
            .get(id)
            .map(|e| e.children.clone())
            .unwrap_or_default();
        for child in children {
            self.remove(&child);
        }
    }
}

impl Surface for Document {
    fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.clear_children(id);
        if let Some(element) = self.elements.get_mut(id) {
            element.text = text.to_string();
            element.html = None;
        }
        true
    }

    fn set_html(&mut self, id: &str, html: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.clear_children(id);
        if let Some(element) = self.elements.get_mut(id) {
            element.text.clear();
            element.html = Some(html.to_string());
        }
        true
    }

    fn add_class(&mut self, id: &str, class: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.classes.insert(class.to_string());
                true
            }
            None => false,
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.classes.remove(class);
                true
            }
            None => false,
        }
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.disabled = disabled;
                true
            }
            None => false,
        }
    }

    fn set_image(&mut self, id: &str, src: &str) -> Option<ImageLoad> {
        let element = self.elements.get_mut(id)?;
        element.src = Some(src.to_string());
        if self.defer_images {
            self.pending_images.insert(id.to_string());
            Some(ImageLoad::Pending)
        } else {
            Some(ImageLoad::Complete)
        }
    }

    fn replace_options(&mut self, container: &str, options: &[OptionButton]) -> bool {
        if !self.contains(container) {
            return false;
        }
        self.clear_children(container);
        if let Some(element) = self.elements.get_mut(container) {
            element.text.clear();
            element.html = None;
        }
        let mut inserted = 0;
        for option in options {
            let mut button = Element::new(&option.id, "button")
                .with_class("button is-medium is-light")
                .with_text(&option.label);
            button.data.insert("value".into(), option.value.clone());
            if self.insert(Some(container), button) {
                inserted += 1;
            }
        }
        inserted == options.len()
    }

    fn children(&self, id: &str) -> Vec<String> {
        self.get(id).map(|e| e.children.clone()).unwrap_or_default()
    }
}

/// Turn explanation markup into readable text: block ends become newlines,
/// list items get a bullet, entities are decoded.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::new();
    let mut tag = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match (in_tag, c) {
            (false, '<') => {
                in_tag = true;
                tag.clear();
            }
            (true, '>') => {
                in_tag = false;
                let name = tag
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_lowercase();
                match name.as_str() {
                    "/p" | "/li" | "/div" | "/h5" | "/ol" | "/ul" | "br" | "br/" => {
                        if !out.ends_with('\n') && !out.is_empty() {
                            out.push('\n');
                        }
                    }
                    "li" => out.push_str("- "),
                    _ => {}
                }
            }
            (true, _) => tag.push(c),
            (false, _) => out.push(c),
        }
    }

    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
