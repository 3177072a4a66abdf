//! Quiz manifests: the static lists of examples each quiz draws from.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FetchError;
use crate::model::QuizKind;
use crate::traits::{fetch_json, AssetSource};

/// One manifest item, referencing image assets and a metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(deserialize_with = "entry_id")]
    pub id: String,
    /// Path of the metadata document.
    pub meta: String,
    /// Image references keyed as in the manifest (`image1`, `board`, ...).
    #[serde(flatten)]
    pub assets: BTreeMap<String, serde_json::Value>,
}

impl ManifestEntry {
    /// A string-valued asset reference.
    pub fn asset(&self, key: &str) -> Option<&str> {
        self.assets
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// The image references `kind` displays, in element order.
    pub fn images(&self, kind: QuizKind) -> Vec<Option<&str>> {
        kind.image_keys().iter().map(|key| self.asset(key)).collect()
    }
}

fn entry_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "entry id must be a string or number, got {other}"
        ))),
    }
}

/// Where the three manifests live, relative to the asset source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestPaths {
    #[serde(default = "default_reid_manifest")]
    pub object_reid: String,
    #[serde(default = "default_scavenger_manifest")]
    pub scavenger: String,
    #[serde(default = "default_circuit_manifest")]
    pub circuit: String,
}

fn default_reid_manifest() -> String {
    "static/data/vlmtunnel/object_reid_manifest.json".to_string()
}
fn default_scavenger_manifest() -> String {
    "static/data/vlmtunnel/visual_scavenger_manifest.json".to_string()
}
fn default_circuit_manifest() -> String {
    "static/data/vlmtunnel/circuits_manifest.json".to_string()
}

impl Default for ManifestPaths {
    fn default() -> Self {
        Self {
            object_reid: default_reid_manifest(),
            scavenger: default_scavenger_manifest(),
            circuit: default_circuit_manifest(),
        }
    }
}

impl ManifestPaths {
    pub fn path(&self, kind: QuizKind) -> &str {
        match kind {
            QuizKind::ObjectReid => &self.object_reid,
            QuizKind::Scavenger => &self.scavenger,
            QuizKind::Circuit => &self.circuit,
        }
    }
}

/// The loaded manifests, immutable for the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifests {
    pub object_reid: Vec<ManifestEntry>,
    pub scavenger: Vec<ManifestEntry>,
    pub circuit: Vec<ManifestEntry>,
}

impl Manifests {
    pub fn entries(&self, kind: QuizKind) -> &[ManifestEntry] {
        match kind {
            QuizKind::ObjectReid => &self.object_reid,
            QuizKind::Scavenger => &self.scavenger,
            QuizKind::Circuit => &self.circuit,
        }
    }
}

/// Fetch all three manifests concurrently. Any failure fails the whole load.
pub async fn load_manifests(
    source: &dyn AssetSource,
    paths: &ManifestPaths,
) -> Result<Manifests, FetchError> {
    let (object_reid, scavenger, circuit) = futures::try_join!(
        fetch_json::<Vec<ManifestEntry>>(source, paths.path(QuizKind::ObjectReid)),
        fetch_json::<Vec<ManifestEntry>>(source, paths.path(QuizKind::Scavenger)),
        fetch_json::<Vec<ManifestEntry>>(source, paths.path(QuizKind::Circuit)),
    )?;

    tracing::info!(
        object_reid = object_reid.len(),
        scavenger = scavenger.len(),
        circuit = circuit.len(),
        "manifests loaded"
    );

    Ok(Manifests {
        object_reid,
        scavenger,
        circuit,
    })
}

/// Pick a random entry, avoiding `current_id` on a best-effort basis.
///
/// Redraws at most `max_retries` times; a single-entry pool always repeats.
pub fn choose_entry<'a, R: Rng + ?Sized>(
    entries: &'a [ManifestEntry],
    current_id: Option<&str>,
    rng: &mut R,
    max_retries: u32,
) -> Option<&'a ManifestEntry> {
    match entries.len() {
        0 => None,
        1 => entries.first(),
        len => {
            let mut entry = &entries[rng.gen_range(0..len)];
            let mut guard = 0;
            while Some(entry.id.as_str()) == current_id && guard < max_retries {
                entry = &entries[rng.gen_range(0..len)];
                guard += 1;
            }
            Some(entry)
        }
    }
}
