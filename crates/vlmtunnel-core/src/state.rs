//! Per-quiz session state.

use crate::benchmarks::BenchmarkRow;
use crate::model::ExampleMetadata;

/// The example currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentExample {
    pub entry_id: String,
    pub metadata: ExampleMetadata,
    /// Flips to `true` once, when the example is scored.
    pub answered: bool,
}

/// Where a quiz is in its load/answer cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded and nothing in flight.
    Empty,
    /// A load was started and has not been applied yet.
    Loading,
    /// An example is shown and awaits an answer.
    Ready,
    /// The shown example has been scored.
    Answered,
}

/// Running counters and the current example for one quiz.
#[derive(Debug, Clone, Default)]
pub struct QuizState {
    pub correct: u32,
    pub total: u32,
    pub current: Option<CurrentExample>,
    /// Comparison rows, chosen on first render and kept for the session.
    pub comparison: Option<Vec<BenchmarkRow>>,
    /// Bumped on every load request; only the newest request may apply.
    pub(crate) generation: u64,
    /// The newest load request has not resolved yet.
    pub(crate) in_flight: bool,
}

impl QuizState {
    pub fn phase(&self) -> Phase {
        if self.in_flight {
            return Phase::Loading;
        }
        match &self.current {
            None => Phase::Empty,
            Some(current) if current.answered => Phase::Answered,
            Some(_) => Phase::Ready,
        }
    }

    /// Accuracy in `[0, 1]`, or `None` before the first answer.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| f64::from(self.correct) / f64::from(self.total))
    }

    pub fn current_entry_id(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.entry_id.as_str())
    }

    /// Count one answer. Returns `false` (and changes nothing) when there is
    /// no example or it was already answered.
    pub(crate) fn record_answer(&mut self, is_correct: bool) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        if current.answered {
            return false;
        }
        current.answered = true;
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
        true
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = true;
        self.generation
    }

    pub(crate) fn is_latest(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub(crate) fn apply(&mut self, generation: u64, current: CurrentExample) {
        debug_assert!(self.is_latest(generation));
        self.current = Some(current);
        self.in_flight = false;
    }

    /// Stop waiting for an in-flight load that failed.
    pub(crate) fn abandon(&mut self, generation: u64) {
        if self.is_latest(generation) {
            self.in_flight = false;
        }
    }
}
