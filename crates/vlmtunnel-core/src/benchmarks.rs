//! Published model accuracies for each quiz.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::QuizKind;

/// A model's published accuracy on one quiz, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub name: String,
    pub score: f64,
}

impl BenchmarkRow {
    fn new(name: &str, score: f64) -> Self {
        Self {
            name: name.to_string(),
            score,
        }
    }
}

/// Benchmark results for one quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTable {
    /// Human baseline accuracy.
    pub human: f64,
    /// Best models, always shown.
    pub top: Vec<BenchmarkRow>,
    /// Remaining models; a few are sampled per session.
    pub pool: Vec<BenchmarkRow>,
}

impl BenchmarkTable {
    /// Every model row, top entries first.
    pub fn all_rows(&self) -> impl Iterator<Item = &BenchmarkRow> {
        self.top.iter().chain(self.pool.iter())
    }

    /// The top entries plus up to `extras` rows drawn at random from the pool.
    pub fn pick_comparison<R: Rng + ?Sized>(&self, rng: &mut R, extras: usize) -> Vec<BenchmarkRow> {
        let mut pool = self.pool.clone();
        pool.shuffle(rng);
        let mut rows = self.top.clone();
        rows.extend(pool.into_iter().take(extras.min(self.pool.len())));
        rows
    }
}

/// The static benchmark table for `kind`.
pub fn benchmark_table(kind: QuizKind) -> BenchmarkTable {
    match kind {
        QuizKind::ObjectReid => BenchmarkTable {
            human: 100.0,
            top: vec![
                BenchmarkRow::new("GPT-5", 60.0),
                BenchmarkRow::new("o4-mini", 56.0),
                BenchmarkRow::new("Claude 4 Sonnet", 55.0),
            ],
            pool: vec![
                BenchmarkRow::new("Gemini 2.5 Pro", 53.0),
                BenchmarkRow::new("o3", 54.0),
                BenchmarkRow::new("Claude 3.7 Sonnet", 49.0),
                BenchmarkRow::new("Gemma 3 (27B)", 53.0),
                BenchmarkRow::new("Mistral Small 3.1 (24B)", 51.0),
            ],
        },
        QuizKind::Scavenger => BenchmarkTable {
            human: 100.0,
            top: vec![
                BenchmarkRow::new("Gemini 2.5 Pro", 69.0),
                BenchmarkRow::new("GPT-5", 54.0),
                BenchmarkRow::new("o4-mini", 44.0),
            ],
            pool: vec![
                BenchmarkRow::new("o3", 18.0),
                BenchmarkRow::new("Claude 4 Sonnet", 19.0),
                BenchmarkRow::new("Claude 3.7 Sonnet", 13.0),
                BenchmarkRow::new("Phi-4 Multimodal (14B)", 15.0),
                BenchmarkRow::new("Gemma 3 (27B)", 13.0),
                BenchmarkRow::new("Qwen2.5VL (7B)", 9.0),
            ],
        },
        QuizKind::Circuit => BenchmarkTable {
            human: 99.0,
            top: vec![
                BenchmarkRow::new("Gemini 2.5 Pro", 41.0),
                BenchmarkRow::new("GPT-5", 38.0),
                BenchmarkRow::new("Claude 3.7 Sonnet", 34.0),
            ],
            pool: vec![
                BenchmarkRow::new("o4-mini", 32.0),
                BenchmarkRow::new("Claude 4 Sonnet", 32.0),
                BenchmarkRow::new("o3", 32.0),
                BenchmarkRow::new("InternVL3 (14B)", 31.0),
                BenchmarkRow::new("Qwen2.5VL (32B)", 19.0),
                BenchmarkRow::new("Mistral Small 3.1 (24B)", 20.0),
            ],
        },
    }
}
