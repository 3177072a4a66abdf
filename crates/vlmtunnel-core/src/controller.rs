//! The quiz controller.
//!
//! Owns the three quiz states, the loaded manifests and the render surface,
//! and handles every UI event. Loads are split into [`QuizController::begin_load`]
//! and [`QuizController::finish_load`] so fetches can overlap; each load carries
//! a generation token and only the newest load of a quiz is applied.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::benchmarks::benchmark_table;
use crate::error::FetchError;
use crate::manifest::{choose_entry, load_manifests, ManifestEntry, ManifestPaths, Manifests};
use crate::model::{ExampleMetadata, QuizKind};
use crate::prompt;
use crate::scoreboard::Scoreboard;
use crate::scoring::Verdict;
use crate::state::{CurrentExample, QuizState};
use crate::surface::{class, ImageLoad, OptionButton, Surface, WidgetIds};
use crate::traits::{fetch_json, AssetSource};

/// Configuration for the controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Redraws allowed when the random pick repeats the current example.
    pub max_pick_retries: u32,
    /// Pool models sampled into the comparison set.
    pub comparison_extras: usize,
    /// Seed for entry picks and the comparison sample; entropy if `None`.
    pub seed: Option<u64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_pick_retries: 10,
            comparison_extras: 2,
            seed: None,
        }
    }
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The user picked an answer. `control` is the clicked element, if any.
    Answer {
        kind: QuizKind,
        choice: String,
        control: Option<String>,
    },
    /// The user asked for another example.
    Next { kind: QuizKind },
}

/// A load in flight: the chosen entry and the generation it belongs to.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub kind: QuizKind,
    pub generation: u64,
    pub entry: ManifestEntry,
    had_current: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The example replaced the current one and was rendered.
    Applied,
    /// A newer load was started meanwhile; the result was dropped.
    Stale,
    /// The metadata fetch failed; the previous example stays.
    Failed,
    /// The quiz's manifest is empty.
    NoEntries,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Answered(Verdict),
    /// Nothing loaded, or the example was already answered.
    Ignored,
    Loaded(LoadOutcome),
}

/// Fetch and decode the metadata document a ticket points at.
pub async fn fetch_metadata(
    source: &dyn AssetSource,
    ticket: &LoadTicket,
) -> Result<ExampleMetadata, FetchError> {
    let path = ticket.entry.meta.as_str();
    let value: serde_json::Value = fetch_json(source, path).await?;
    ExampleMetadata::from_value(ticket.kind, value).map_err(|e| FetchError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Append a `v=<token>` query parameter so browsers refetch the image.
pub fn cache_busted(src: &str, token: i64) -> String {
    if src.contains('?') {
        format!("{src}&v={token}")
    } else {
        format!("{src}?v={token}")
    }
}

/// Controller for the three quiz widgets.
pub struct QuizController<S> {
    source: Arc<dyn AssetSource>,
    surface: S,
    manifests: Manifests,
    states: [QuizState; 3],
    listeners: HashMap<String, UiEvent>,
    rng: StdRng,
    config: ControllerConfig,
}

impl<S: Surface> QuizController<S> {
    pub fn new(
        source: Arc<dyn AssetSource>,
        surface: S,
        manifests: Manifests,
        config: ControllerConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            source,
            surface,
            manifests,
            states: Default::default(),
            listeners: HashMap::new(),
            rng,
            config,
        }
    }

    /// Load the manifests, build a controller and initialize every widget.
    pub async fn start(
        source: Arc<dyn AssetSource>,
        surface: S,
        paths: &ManifestPaths,
        config: ControllerConfig,
    ) -> Result<Self, FetchError> {
        let manifests = load_manifests(source.as_ref(), paths).await?;
        let mut controller = Self::new(source, surface, manifests, config);
        controller.initialize().await;
        Ok(controller)
    }

    /// Render empty scoreboards, load a first example for every quiz and
    /// register the fixed button listeners.
    pub async fn initialize(&mut self) {
        for kind in QuizKind::ALL {
            self.render_scoreboard(kind);
        }

        let tickets: Vec<LoadTicket> = QuizKind::ALL
            .iter()
            .filter_map(|&kind| self.begin_load(kind, false))
            .collect();
        let source = Arc::clone(&self.source);
        let results = futures::future::join_all(
            tickets
                .iter()
                .map(|ticket| fetch_metadata(source.as_ref(), ticket)),
        )
        .await;
        for (ticket, result) in tickets.into_iter().zip(results) {
            self.finish_load(ticket, result);
        }

        self.register_fixed_listeners();
    }

    fn register_fixed_listeners(&mut self) {
        for kind in QuizKind::ALL {
            let ids = WidgetIds::for_kind(kind);
            for (id, value) in &ids.answer_buttons {
                if self.surface.contains(id) {
                    self.listeners.insert(
                        id.clone(),
                        UiEvent::Answer {
                            kind,
                            choice: value.clone(),
                            control: Some(id.clone()),
                        },
                    );
                }
            }
            if self.surface.contains(&ids.next) {
                self.listeners.insert(ids.next.clone(), UiEvent::Next { kind });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self, kind: QuizKind) -> &QuizState {
        &self.states[kind.index()]
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn manifests(&self) -> &Manifests {
        &self.manifests
    }

    /// The event bound to an element, if any.
    pub fn listener(&self, element_id: &str) -> Option<&UiEvent> {
        self.listeners.get(element_id)
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Handle a click on an element through the listener table.
    ///
    /// Returns `None` when nothing listens on that element.
    pub async fn click(&mut self, element_id: &str) -> Option<EventOutcome> {
        let event = self.listeners.get(element_id).cloned()?;
        Some(self.dispatch(event).await)
    }

    pub async fn dispatch(&mut self, event: UiEvent) -> EventOutcome {
        match event {
            UiEvent::Answer {
                kind,
                choice,
                control,
            } => match self.answer(kind, &choice, control.as_deref()) {
                Some(verdict) => EventOutcome::Answered(verdict),
                None => EventOutcome::Ignored,
            },
            UiEvent::Next { kind } => EventOutcome::Loaded(self.load_example(kind, true).await),
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Pick an entry and fetch it. With `force_new`, the currently shown entry
    /// is avoided when the manifest has alternatives.
    pub async fn load_example(&mut self, kind: QuizKind, force_new: bool) -> LoadOutcome {
        let Some(ticket) = self.begin_load(kind, force_new) else {
            return LoadOutcome::NoEntries;
        };
        let result = fetch_metadata(self.source.as_ref(), &ticket).await;
        self.finish_load(ticket, result)
    }

    /// Start a load: choose the entry and claim a new generation. Any older
    /// load of the same quiz becomes stale.
    pub fn begin_load(&mut self, kind: QuizKind, force_new: bool) -> Option<LoadTicket> {
        let idx = kind.index();
        let current_id = if force_new {
            self.states[idx].current_entry_id().map(str::to_string)
        } else {
            None
        };

        let Some(entry) = choose_entry(
            self.manifests.entries(kind),
            current_id.as_deref(),
            &mut self.rng,
            self.config.max_pick_retries,
        ) else {
            tracing::debug!(quiz = %kind, "manifest is empty, nothing to load");
            return None;
        };
        let entry = entry.clone();

        let had_current = self.states[idx].current.is_some();
        let generation = self.states[idx].next_generation();
        tracing::debug!(quiz = %kind, entry = %entry.id, generation, "loading example");

        Some(LoadTicket {
            kind,
            generation,
            entry,
            had_current,
        })
    }

    /// Apply the result of a load started with [`Self::begin_load`].
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ExampleMetadata, FetchError>,
    ) -> LoadOutcome {
        let kind = ticket.kind;
        let state = &mut self.states[kind.index()];

        let metadata = match result {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::error!(quiz = %kind, entry = %ticket.entry.id, "failed to load example: {e}");
                state.abandon(ticket.generation);
                return LoadOutcome::Failed;
            }
        };

        if !state.is_latest(ticket.generation) {
            tracing::debug!(
                quiz = %kind,
                entry = %ticket.entry.id,
                generation = ticket.generation,
                "dropping stale example"
            );
            return LoadOutcome::Stale;
        }

        state.apply(
            ticket.generation,
            CurrentExample {
                entry_id: ticket.entry.id.clone(),
                metadata: metadata.clone(),
                answered: false,
            },
        );
        self.render_example(&ticket, &metadata);
        LoadOutcome::Applied
    }

    fn render_example(&mut self, ticket: &LoadTicket, metadata: &ExampleMetadata) {
        let kind = ticket.kind;
        let ids = WidgetIds::for_kind(kind);

        if ticket.had_current {
            for image in &ids.images {
                self.surface.add_class(image, class::FADING);
            }
        }
        let token = chrono::Utc::now().timestamp_millis();
        for (image, src) in ids.images.iter().zip(ticket.entry.images(kind)) {
            if let Some(src) = src {
                set_image_with_fade(&mut self.surface, image, src, token);
            }
        }

        match metadata {
            ExampleMetadata::ObjectReid(_) => {}
            ExampleMetadata::Scavenger(meta) => {
                if let Some(prompt_id) = &ids.prompt {
                    self.surface.set_text(prompt_id, &prompt::scavenger_prompt(meta));
                }
                let options = ids.option_buttons(
                    meta.colors()
                        .into_iter()
                        .map(|color| (prompt::capitalize(&color), color))
                        .collect(),
                );
                self.render_options(&ids, &options);
            }
            ExampleMetadata::Circuit(meta) => {
                if let Some(prompt_id) = &ids.prompt {
                    self.surface.set_text(prompt_id, &prompt::circuit_prompt(meta));
                }
                let options = ids.option_buttons(
                    meta.components()
                        .into_iter()
                        .map(|component| (component.clone(), component))
                        .collect(),
                );
                self.render_options(&ids, &options);
            }
        }

        self.reset_widget(&ids);
        self.render_scoreboard(kind);
    }

    fn render_options(&mut self, ids: &WidgetIds, options: &[OptionButton]) {
        let prefix = ids.option_prefix();
        self.listeners.retain(|id, _| !id.starts_with(&prefix));

        let Some(container) = &ids.options else {
            return;
        };
        if !self.surface.replace_options(container, options) {
            tracing::warn!(
                quiz = %ids.kind,
                expected = options.len(),
                rendered = self.surface.children(container).len(),
                "option buttons could not be rendered"
            );
            return;
        }
        for option in options {
            self.listeners.insert(
                option.id.clone(),
                UiEvent::Answer {
                    kind: ids.kind,
                    choice: option.value.clone(),
                    control: Some(option.id.clone()),
                },
            );
        }
    }

    /// Put feedback, explanation and answer buttons back to their idle state.
    fn reset_widget(&mut self, ids: &WidgetIds) {
        if self.surface.set_text(&ids.feedback, prompt::idle_feedback(ids.kind)) {
            self.surface.remove_class(&ids.feedback, class::SUCCESS);
            self.surface.remove_class(&ids.feedback, class::DANGER);
        }
        if self.surface.add_class(&ids.explanation, class::HIDDEN) {
            self.surface.set_html(&ids.explanation, "");
        }
        for (button, _) in &ids.answer_buttons {
            if self.surface.set_disabled(button, false) {
                for c in [class::DISABLED, class::CORRECT, class::WRONG] {
                    self.surface.remove_class(button, c);
                }
            }
        }
        if let Some(overlay) = &ids.overlay {
            self.surface.set_html(overlay, "");
        }
    }

    // -----------------------------------------------------------------------
    // Answering
    // -----------------------------------------------------------------------

    /// Score `choice` against the current example.
    ///
    /// Returns `None` without touching any counter when nothing is loaded or
    /// the example was already answered.
    pub fn answer(&mut self, kind: QuizKind, choice: &str, control: Option<&str>) -> Option<Verdict> {
        let state = &mut self.states[kind.index()];
        let Some(current) = state.current.as_ref() else {
            tracing::debug!(quiz = %kind, "answer ignored, no example loaded");
            return None;
        };
        if current.answered {
            tracing::debug!(quiz = %kind, entry = %current.entry_id, "answer ignored, already answered");
            return None;
        }

        let verdict = current.metadata.grade(choice);
        let entry_id = current.entry_id.clone();
        state.record_answer(verdict.is_correct);
        tracing::debug!(
            quiz = %kind,
            entry = %entry_id,
            choice,
            correct = verdict.is_correct,
            score = %format!("{}/{}", state.correct, state.total),
            "answer recorded"
        );

        let ids = WidgetIds::for_kind(kind);
        self.surface.remove_class(&ids.feedback, class::SUCCESS);
        self.surface.remove_class(&ids.feedback, class::DANGER);
        if self.surface.set_text(&ids.feedback, &verdict.feedback) {
            let status = if verdict.is_correct { class::SUCCESS } else { class::DANGER };
            self.surface.add_class(&ids.feedback, status);
        }

        let chosen = control
            .map(str::to_string)
            .or_else(|| self.control_for(&ids, choice));
        let controls: Vec<String> = match &ids.options {
            Some(container) => self.surface.children(container),
            None => ids.answer_buttons.iter().map(|(id, _)| id.clone()).collect(),
        };
        for id in &controls {
            self.surface.set_disabled(id, true);
            self.surface.add_class(id, class::DISABLED);
            if chosen.as_deref() == Some(id.as_str()) {
                let mark = if verdict.is_correct { class::CORRECT } else { class::WRONG };
                self.surface.add_class(id, mark);
            }
        }

        if self.surface.set_html(&ids.explanation, &verdict.explanation) {
            self.surface.remove_class(&ids.explanation, class::HIDDEN);
        }

        self.render_scoreboard(kind);
        Some(verdict)
    }

    /// The button that submits `choice`, when the answer did not come from a click.
    fn control_for(&self, ids: &WidgetIds, choice: &str) -> Option<String> {
        if let Some((id, _)) = ids
            .answer_buttons
            .iter()
            .find(|(_, value)| value.eq_ignore_ascii_case(choice))
        {
            return Some(id.clone());
        }
        let container = ids.options.as_ref()?;
        let options: Vec<(String, &str)> = self
            .surface
            .children(container)
            .into_iter()
            .filter_map(|id| match self.listeners.get(&id) {
                Some(UiEvent::Answer { choice: value, .. }) => Some((id, value.as_str())),
                _ => None,
            })
            .collect();
        let exact = options.iter().find(|(_, value)| *value == choice);
        exact
            .or_else(|| options.iter().find(|(_, value)| value.eq_ignore_ascii_case(choice)))
            .map(|(id, _)| id.clone())
    }

    // -----------------------------------------------------------------------
    // Scoreboard
    // -----------------------------------------------------------------------

    /// Build the quiz's scoreboard and write it to the page.
    ///
    /// The comparison rows are sampled on the first call and reused after.
    pub fn render_scoreboard(&mut self, kind: QuizKind) -> Scoreboard {
        let extras = self.config.comparison_extras;
        let state = &mut self.states[kind.index()];
        let rng = &mut self.rng;
        let comparison = state
            .comparison
            .get_or_insert_with(|| benchmark_table(kind).pick_comparison(rng, extras));
        let board = Scoreboard::new(state.correct, state.total, comparison);

        let ids = WidgetIds::for_kind(kind);
        self.surface.set_html(&ids.scoreboard, &board.to_html());
        board
    }
}

/// Fade an image out, swap its source and fade back in once loaded.
fn set_image_with_fade<S: Surface>(surface: &mut S, id: &str, src: &str, token: i64) {
    if src.is_empty() || !surface.contains(id) {
        return;
    }
    surface.add_class(id, class::FADING);
    if let Some(ImageLoad::Complete) = surface.set_image(id, &cache_busted(src, token)) {
        surface.remove_class(id, class::FADING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::mock::MockSource;
    use crate::state::Phase;
    use serde_json::{json, Value};

    const REID_MANIFEST: &str = "static/data/vlmtunnel/object_reid_manifest.json";
    const SCAVENGER_MANIFEST: &str = "static/data/vlmtunnel/visual_scavenger_manifest.json";
    const CIRCUIT_MANIFEST: &str = "static/data/vlmtunnel/circuits_manifest.json";

    fn reid_meta(truth: &str) -> Value {
        json!({
            "truth": truth,
            "shapes": [{"color": "red", "type": "circle"}, {"color": "blue", "type": "square"}],
            "jit_attrs": [{"color": "blue", "type": "square"}]
        })
    }

    fn scavenger_meta() -> Value {
        json!({
            "start_pair": ["triangle", "red"],
            "chain": [["triangle", "red"], ["circle", "green"], ["star", "yellow"], ["square", "blue"]],
            "final_color": "blue",
            "color_counts": {"red": 3, "blue": 2, "green": 1, "yellow": 1}
        })
    }

    fn circuit_meta() -> Value {
        json!({
            "mapping": {"A1": "U2", "B3": "R1", "C5": "U2", "D2": "C4"},
            "query_port": "A1",
            "correct_comp": "U2"
        })
    }

    /// One entry per quiz, with the given metadata documents.
    fn source(reid: Value, scavenger: Value, circuit: Value) -> MockSource {
        MockSource::new()
            .with_json(
                REID_MANIFEST,
                json!([{"id": "r1", "image1": "reid/r1_a.png", "image2": "reid/r1_b.png", "meta": "reid/r1.json"}]),
            )
            .with_json(
                SCAVENGER_MANIFEST,
                json!([{"id": "s1", "board": "scav/s1.png", "meta": "scav/s1.json"}]),
            )
            .with_json(
                CIRCUIT_MANIFEST,
                json!([{"id": "c1", "diagram": "circ/c1.png?size=lg", "meta": "circ/c1.json"}]),
            )
            .with_json("reid/r1.json", reid)
            .with_json("scav/s1.json", scavenger)
            .with_json("circ/c1.json", circuit)
    }

    fn config() -> ControllerConfig {
        ControllerConfig {
            seed: Some(11),
            ..Default::default()
        }
    }

    async fn start_with(source: MockSource, surface: Document) -> QuizController<Document> {
        QuizController::start(Arc::new(source), surface, &ManifestPaths::default(), config())
            .await
            .unwrap()
    }

    async fn started(reid_truth: &str) -> QuizController<Document> {
        start_with(
            source(reid_meta(reid_truth), scavenger_meta(), circuit_meta()),
            Document::with_widgets(),
        )
        .await
    }

    fn classes(controller: &QuizController<Document>, id: &str) -> Vec<String> {
        controller
            .surface()
            .get(id)
            .map(|e| e.classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn initialize_renders_every_widget() {
        let controller = started("yes").await;
        for kind in QuizKind::ALL {
            assert_eq!(controller.state(kind).phase(), Phase::Ready);
        }

        let doc = controller.surface();
        assert_eq!(
            doc.plain_text("scavenger-prompt").unwrap(),
            "Start on the red triangle and follow 3 label hops. What color do you reach?"
        );
        assert_eq!(
            doc.children("scavenger-options"),
            vec![
                "scavenger-option-blue",
                "scavenger-option-green",
                "scavenger-option-red",
                "scavenger-option-yellow"
            ]
        );
        assert_eq!(doc.get("scavenger-option-blue").unwrap().text, "Blue");
        assert_eq!(
            doc.children("circuit-options"),
            vec!["circuit-option-c4", "circuit-option-r1", "circuit-option-u2"]
        );
        assert_eq!(
            doc.plain_text("reid-feedback").unwrap(),
            "Select an answer to see how you compare."
        );

        let src = doc.get("reid-image-1").unwrap().src.clone().unwrap();
        assert!(src.starts_with("reid/r1_a.png?v="), "got {src}");
        let diagram = doc.get("circuit-image").unwrap().src.clone().unwrap();
        assert!(diagram.starts_with("circ/c1.png?size=lg&v="), "got {diagram}");

        assert!(controller.listener("reid-yes").is_some());
        assert!(controller.listener("circuit-option-u2").is_some());
        assert_eq!(
            controller.listener("scavenger-next"),
            Some(&UiEvent::Next {
                kind: QuizKind::Scavenger
            })
        );
    }

    #[tokio::test]
    async fn reid_correct_yes() {
        let mut controller = started("yes").await;
        let outcome = controller.click("reid-yes").await.unwrap();

        let EventOutcome::Answered(verdict) = outcome else {
            panic!("expected an answer, got {outcome:?}");
        };
        assert!(verdict.is_correct);
        let state = controller.state(QuizKind::ObjectReid);
        assert_eq!((state.correct, state.total), (1, 1));

        assert!(classes(&controller, "reid-feedback").contains(&"is-success".to_string()));
        assert!(classes(&controller, "reid-yes").contains(&"is-correct".to_string()));
        assert!(controller.surface().get("reid-yes").unwrap().disabled);
        assert!(controller.surface().get("reid-no").unwrap().disabled);
        assert!(!classes(&controller, "reid-explanation").contains(&"is-hidden".to_string()));
    }

    #[tokio::test]
    async fn reid_wrong_yes_names_moved_shape() {
        let mut controller = started("no").await;
        controller.click("reid-yes").await.unwrap();

        let state = controller.state(QuizKind::ObjectReid);
        assert_eq!((state.correct, state.total), (0, 1));
        assert!(classes(&controller, "reid-feedback").contains(&"is-danger".to_string()));
        assert!(classes(&controller, "reid-yes").contains(&"is-wrong".to_string()));
        let explanation = controller.surface().plain_text("reid-explanation").unwrap();
        assert!(explanation.contains("nudges the blue square away"), "got {explanation}");
    }

    #[tokio::test]
    async fn scavenger_wrong_color_names_blue() {
        let mut controller = started("yes").await;
        let outcome = controller.click("scavenger-option-red").await.unwrap();

        let EventOutcome::Answered(verdict) = outcome else {
            panic!("expected an answer");
        };
        assert!(!verdict.is_correct);
        let feedback = controller.surface().plain_text("scavenger-feedback").unwrap();
        assert_eq!(feedback, "Close, but the trail ends on Blue.");
        assert!(classes(&controller, "scavenger-option-red").contains(&"is-wrong".to_string()));
        for option in controller.surface().children("scavenger-options") {
            assert!(controller.surface().get(&option).unwrap().disabled);
        }
        let explanation = controller.surface().plain_text("scavenger-explanation").unwrap();
        assert!(explanation.starts_with("- Start on the red triangle."));
        assert!(explanation.ends_with("- Finish on the blue square."));
    }

    #[tokio::test]
    async fn circuit_correct_and_incorrect() {
        let mut controller = started("yes").await;
        controller.click("circuit-option-u2").await.unwrap();
        let state = controller.state(QuizKind::Circuit);
        assert_eq!((state.correct, state.total), (1, 1));
        assert!(classes(&controller, "circuit-option-u2").contains(&"is-correct".to_string()));

        let mut controller = started("yes").await;
        let outcome = controller
            .dispatch(UiEvent::Answer {
                kind: QuizKind::Circuit,
                choice: "R1".into(),
                control: None,
            })
            .await;
        let EventOutcome::Answered(verdict) = outcome else {
            panic!("expected an answer");
        };
        assert!(!verdict.is_correct);
        assert!(verdict.feedback.contains("U2"));
        assert!(classes(&controller, "circuit-option-r1").contains(&"is-wrong".to_string()));
        let state = controller.state(QuizKind::Circuit);
        assert_eq!((state.correct, state.total), (0, 1));
    }

    #[tokio::test]
    async fn second_answer_is_ignored() {
        let mut controller = started("yes").await;
        controller.click("reid-yes").await.unwrap();
        let again = controller.click("reid-no").await.unwrap();
        assert_eq!(again, EventOutcome::Ignored);
        let state = controller.state(QuizKind::ObjectReid);
        assert_eq!((state.correct, state.total), (1, 1));
        assert!(!classes(&controller, "reid-no").contains(&"is-wrong".to_string()));
    }

    #[tokio::test]
    async fn next_resets_widget_and_keeps_counters() {
        let mut controller = started("no").await;
        controller.click("reid-yes").await.unwrap();
        let outcome = controller.click("reid-next").await.unwrap();
        assert_eq!(outcome, EventOutcome::Loaded(LoadOutcome::Applied));

        let state = controller.state(QuizKind::ObjectReid);
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!((state.correct, state.total), (0, 1));
        assert!(!controller.surface().get("reid-yes").unwrap().disabled);
        assert!(!classes(&controller, "reid-yes").contains(&"is-wrong".to_string()));
        assert!(classes(&controller, "reid-explanation").contains(&"is-hidden".to_string()));
        assert!(!classes(&controller, "reid-feedback").contains(&"is-danger".to_string()));

        controller.click("reid-no").await.unwrap();
        let state = controller.state(QuizKind::ObjectReid);
        assert_eq!((state.correct, state.total), (1, 2));
    }

    #[tokio::test]
    async fn scoreboard_tracks_accuracy_with_stable_comparison() {
        let mut controller = started("yes").await;
        let before = controller.render_scoreboard(QuizKind::ObjectReid);
        assert_eq!(before.user_score_text(), "–");
        assert!(controller
            .surface()
            .get("reid-scoreboard")
            .unwrap()
            .html
            .as_deref()
            .unwrap()
            .contains("Answer to track your accuracy."));

        let comparison = controller.state(QuizKind::ObjectReid).comparison.clone().unwrap();
        assert_eq!(comparison.len(), 5);

        controller.click("reid-yes").await.unwrap();
        for _ in 0..3 {
            controller.click("reid-next").await.unwrap();
            controller.click("reid-no").await.unwrap();
        }
        let board = controller.render_scoreboard(QuizKind::ObjectReid);
        assert_eq!((board.correct, board.total), (1, 4));
        assert_eq!(board.user_score_text(), "25%");
        assert_eq!(board.rows[0].value_text(), "1/4 25%");
        assert_eq!(
            controller.state(QuizKind::ObjectReid).comparison.as_ref(),
            Some(&comparison)
        );
        let names: Vec<&str> = board.rows[1..].iter().map(|r| r.label.as_str()).collect();
        let expected: Vec<&str> = comparison.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn stale_load_is_dropped() {
        let mut controller = started("yes").await;
        let older = controller.begin_load(QuizKind::Scavenger, true).unwrap();
        let newer = controller.begin_load(QuizKind::Scavenger, true).unwrap();
        assert_eq!(controller.state(QuizKind::Scavenger).phase(), Phase::Loading);

        let newer_meta = ExampleMetadata::from_value(
            QuizKind::Scavenger,
            json!({"final_color": "green", "color_counts": {"green": 1, "red": 1}}),
        )
        .unwrap();
        let older_meta = ExampleMetadata::from_value(
            QuizKind::Scavenger,
            json!({"final_color": "red", "color_counts": {"red": 1}}),
        )
        .unwrap();

        assert_eq!(
            controller.finish_load(newer, Ok(newer_meta.clone())),
            LoadOutcome::Applied
        );
        assert_eq!(controller.finish_load(older, Ok(older_meta)), LoadOutcome::Stale);

        let state = controller.state(QuizKind::Scavenger);
        assert_eq!(state.current.as_ref().unwrap().metadata, newer_meta);
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(
            controller.surface().children("scavenger-options"),
            vec!["scavenger-option-green", "scavenger-option-red"]
        );
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_example() {
        let mut controller = started("yes").await;
        let before = controller.state(QuizKind::Circuit).current.clone();

        let ticket = controller.begin_load(QuizKind::Circuit, true).unwrap();
        let outcome = controller.finish_load(
            ticket,
            Err(FetchError::Status {
                path: "circ/c1.json".into(),
                status: 503,
            }),
        );
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(controller.state(QuizKind::Circuit).current, before);
        assert_eq!(controller.state(QuizKind::Circuit).phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn failing_metadata_leaves_quiz_empty() {
        let source = source(reid_meta("yes"), scavenger_meta(), circuit_meta())
            .with_failure("scav/s1.json");
        let mut controller = start_with(source, Document::with_widgets()).await;

        let state = controller.state(QuizKind::Scavenger);
        assert_eq!(state.phase(), Phase::Empty);
        assert!(controller.surface().children("scavenger-options").is_empty());
        assert_eq!(controller.state(QuizKind::Circuit).phase(), Phase::Ready);

        let outcome = controller
            .dispatch(UiEvent::Answer {
                kind: QuizKind::Scavenger,
                choice: "blue".into(),
                control: None,
            })
            .await;
        assert_eq!(outcome, EventOutcome::Ignored);
        assert_eq!(controller.state(QuizKind::Scavenger).total, 0);
    }

    #[tokio::test]
    async fn missing_elements_are_tolerated() {
        let mut controller = start_with(
            source(reid_meta("yes"), scavenger_meta(), circuit_meta()),
            Document::new(),
        )
        .await;
        assert!(controller.listener("reid-yes").is_none());
        assert!(controller.click("reid-yes").await.is_none());

        let verdict = controller.answer(QuizKind::ObjectReid, "yes", None).unwrap();
        assert!(verdict.is_correct);
        let outcome = controller
            .dispatch(UiEvent::Next {
                kind: QuizKind::Circuit,
            })
            .await;
        assert_eq!(outcome, EventOutcome::Loaded(LoadOutcome::Applied));
        assert_eq!(controller.state(QuizKind::ObjectReid).total, 1);
    }

    #[tokio::test]
    async fn empty_manifest_is_a_noop() {
        let source = source(reid_meta("yes"), scavenger_meta(), circuit_meta())
            .with_json(CIRCUIT_MANIFEST, json!([]));
        let mut controller = start_with(source, Document::with_widgets()).await;
        assert_eq!(controller.state(QuizKind::Circuit).phase(), Phase::Empty);
        assert_eq!(
            controller.load_example(QuizKind::Circuit, true).await,
            LoadOutcome::NoEntries
        );
    }

    #[tokio::test]
    async fn images_fade_between_examples() {
        let mut controller = start_with(
            source(reid_meta("yes"), scavenger_meta(), circuit_meta()),
            Document::with_widgets().deferring_images(),
        )
        .await;
        controller.surface_mut().finish_image_loads();
        assert!(!classes(&controller, "reid-image-2").contains(&"is-fading".to_string()));

        controller.click("reid-next").await.unwrap();
        assert!(classes(&controller, "reid-image-1").contains(&"is-fading".to_string()));
        assert!(classes(&controller, "reid-image-2").contains(&"is-fading".to_string()));
        assert_eq!(controller.surface_mut().finish_image_loads(), 2);
        assert!(!classes(&controller, "reid-image-1").contains(&"is-fading".to_string()));
    }

    #[tokio::test]
    async fn missing_manifest_fails_start() {
        let source = MockSource::new().with_json(REID_MANIFEST, json!([]));
        let result = QuizController::start(
            Arc::new(source),
            Document::with_widgets(),
            &ManifestPaths::default(),
            config(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn next_avoids_current_entry() {
        let source = source(reid_meta("yes"), scavenger_meta(), circuit_meta())
            .with_json(
                REID_MANIFEST,
                json!([
                    {"id": "r1", "image1": "a.png", "image2": "b.png", "meta": "reid/r1.json"},
                    {"id": "r2", "image1": "c.png", "image2": "d.png", "meta": "reid/r1.json"}
                ]),
            );
        let config = ControllerConfig {
            max_pick_retries: 200,
            ..config()
        };
        let mut controller = QuizController::start(
            Arc::new(source),
            Document::with_widgets(),
            &ManifestPaths::default(),
            config,
        )
        .await
        .unwrap();
        for _ in 0..10 {
            let before = controller
                .state(QuizKind::ObjectReid)
                .current_entry_id()
                .unwrap()
                .to_string();
            controller.click("reid-next").await.unwrap();
            let after = controller.state(QuizKind::ObjectReid).current_entry_id().unwrap();
            assert_ne!(before, after);
        }
    }

    #[tokio::test]
    async fn colliding_option_labels_get_distinct_buttons() {
        let meta = json!({
            "start_pair": ["circle", "red"],
            "final_color": "light blue",
            "color_counts": {"light blue": 1, "light-blue": 1, "red": 1}
        });
        let make = || source(reid_meta("yes"), meta.clone(), circuit_meta());

        let mut controller = start_with(make(), Document::with_widgets()).await;
        assert_eq!(
            controller.surface().children("scavenger-options"),
            vec![
                "scavenger-option-light-blue",
                "scavenger-option-light-blue-2",
                "scavenger-option-red",
            ]
        );
        let EventOutcome::Answered(verdict) =
            controller.click("scavenger-option-light-blue").await.unwrap()
        else {
            panic!("expected an answer");
        };
        assert!(verdict.is_correct);

        let mut controller = start_with(make(), Document::with_widgets()).await;
        let EventOutcome::Answered(verdict) =
            controller.click("scavenger-option-light-blue-2").await.unwrap()
        else {
            panic!("expected an answer");
        };
        assert!(!verdict.is_correct);
        assert!(classes(&controller, "scavenger-option-light-blue-2").contains(&"is-wrong".to_string()));

        let mut controller = start_with(make(), Document::with_widgets()).await;
        controller
            .dispatch(UiEvent::Answer {
                kind: QuizKind::Scavenger,
                choice: "light-blue".into(),
                control: None,
            })
            .await;
        assert!(classes(&controller, "scavenger-option-light-blue-2").contains(&"is-wrong".to_string()));
        assert!(!classes(&controller, "scavenger-option-light-blue").contains(&"is-wrong".to_string()));
    }
}
