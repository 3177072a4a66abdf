//! vlmtunnel-core — Quiz state, scoring, and rendering for the vlmtunnel
//! demo widgets.
//!
//! This crate holds the data model for the three quizzes (object
//! re-identification, visual scavenger hunt and circuit tracing), the
//! controller that loads examples and grades answers, and the render
//! surface abstraction it writes into.

pub mod benchmarks;
pub mod controller;
pub mod dom;
pub mod error;
pub mod manifest;
pub mod mock;
pub mod model;
pub mod prompt;
pub mod scoreboard;
pub mod scoring;
pub mod state;
pub mod surface;
pub mod traits;
pub mod validate;

pub use controller::{ControllerConfig, EventOutcome, LoadOutcome, QuizController, UiEvent};
pub use error::FetchError;
pub use model::{ExampleMetadata, QuizKind};
pub use traits::AssetSource;
