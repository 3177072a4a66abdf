//! Core data model types for vlmtunnel.
//!
//! Quiz kinds and the per-example metadata documents each quiz fetches.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// The three quiz widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizKind {
    ObjectReid,
    Scavenger,
    Circuit,
}

impl QuizKind {
    /// All quiz kinds in page order.
    pub const ALL: [QuizKind; 3] = [QuizKind::ObjectReid, QuizKind::Scavenger, QuizKind::Circuit];

    pub(crate) fn index(self) -> usize {
        match self {
            QuizKind::ObjectReid => 0,
            QuizKind::Scavenger => 1,
            QuizKind::Circuit => 2,
        }
    }

    /// Prefix used for this quiz's element IDs (e.g. `reid-feedback`).
    pub fn element_prefix(self) -> &'static str {
        match self {
            QuizKind::ObjectReid => "reid",
            QuizKind::Scavenger => "scavenger",
            QuizKind::Circuit => "circuit",
        }
    }

    /// Manifest keys holding the image references for this quiz.
    pub fn image_keys(self) -> &'static [&'static str] {
        match self {
            QuizKind::ObjectReid => &["image1", "image2"],
            QuizKind::Scavenger => &["board"],
            QuizKind::Circuit => &["diagram"],
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            QuizKind::ObjectReid => "Object Re-Identification",
            QuizKind::Scavenger => "Visual Scavenger Hunt",
            QuizKind::Circuit => "Circuit Connections",
        }
    }
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizKind::ObjectReid => write!(f, "object-reid"),
            QuizKind::Scavenger => write!(f, "scavenger"),
            QuizKind::Circuit => write!(f, "circuit"),
        }
    }
}

impl FromStr for QuizKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "object-reid" | "objectreid" | "reid" => Ok(QuizKind::ObjectReid),
            "scavenger" | "visual-scavenger" => Ok(QuizKind::Scavenger),
            "circuit" | "circuits" => Ok(QuizKind::Circuit),
            other => Err(format!("unknown quiz: {other}")),
        }
    }
}

/// One shape of an object-reid composite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeAttr {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, rename = "type")]
    pub shape_type: Option<String>,
}

impl ShapeAttr {
    /// "red circle", falling back to generic words for missing attributes.
    pub fn describe(&self) -> String {
        let color = self.color.as_deref().filter(|c| !c.is_empty()).unwrap_or("colored");
        let shape = self
            .shape_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("shape");
        format!("{color} {shape}")
    }
}

/// Ground truth for an object re-identification example.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReidMetadata {
    /// "yes" when Image 2 still contains the composite object.
    #[serde(default, deserialize_with = "truth_flag")]
    pub truth: String,
    #[serde(default)]
    pub shapes: Vec<ShapeAttr>,
    /// Pieces that were shifted away from the rest in Image 2.
    #[serde(default)]
    pub jit_attrs: Vec<ShapeAttr>,
}

impl ReidMetadata {
    /// Normalized truth value ("yes" / "no" / whatever else was given).
    pub fn truth(&self) -> String {
        self.truth.to_lowercase()
    }
}

/// Ground truth for a scavenger-hunt example.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScavengerMetadata {
    /// `[shape, color]` of the starting token.
    #[serde(default)]
    pub start_pair: Vec<String>,
    /// Every `[shape, color]` visited, start and finish included.
    #[serde(default)]
    pub chain: Vec<Vec<String>>,
    #[serde(default)]
    pub final_color: String,
    /// Colors present on the board; the keys are the answer options.
    #[serde(default)]
    pub color_counts: BTreeMap<String, serde_json::Value>,
}

impl ScavengerMetadata {
    /// Number of label hops announced in the prompt (at least one).
    pub fn hop_count(&self) -> usize {
        self.chain.len().saturating_sub(1).max(1)
    }

    /// Answer options, sorted.
    pub fn colors(&self) -> Vec<String> {
        self.color_counts.keys().cloned().collect()
    }
}

/// Ground truth for a circuit-trace example.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitMetadata {
    /// Port label → component label.
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "optional_label")]
    pub query_port: Option<String>,
    #[serde(default)]
    pub correct_comp: String,
}

impl CircuitMetadata {
    /// Unique component labels, sorted. These are the answer options.
    pub fn components(&self) -> Vec<String> {
        let unique: std::collections::BTreeSet<&String> = self.mapping.values().collect();
        unique.into_iter().cloned().collect()
    }

    pub fn port_label(&self) -> &str {
        self.query_port.as_deref().unwrap_or("?")
    }
}

/// Metadata of whichever quiz an example belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleMetadata {
    ObjectReid(ReidMetadata),
    Scavenger(ScavengerMetadata),
    Circuit(CircuitMetadata),
}

impl ExampleMetadata {
    /// Decode a fetched JSON document as the metadata shape of `kind`.
    pub fn from_value(kind: QuizKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            QuizKind::ObjectReid => ExampleMetadata::ObjectReid(serde_json::from_value(value)?),
            QuizKind::Scavenger => ExampleMetadata::Scavenger(serde_json::from_value(value)?),
            QuizKind::Circuit => ExampleMetadata::Circuit(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> QuizKind {
        match self {
            ExampleMetadata::ObjectReid(_) => QuizKind::ObjectReid,
            ExampleMetadata::Scavenger(_) => QuizKind::Scavenger,
            ExampleMetadata::Circuit(_) => QuizKind::Circuit,
        }
    }
}

/// Accept `"yes"`/`"no"` strings as well as JSON booleans.
fn truth_flag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(true)) => "yes".to_string(),
        Some(Flag::Bool(false)) => "no".to_string(),
        Some(Flag::Text(s)) => s,
        None => String::new(),
    })
}

/// Accept a label given either as a string or a number.
pub(crate) fn optional_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}
