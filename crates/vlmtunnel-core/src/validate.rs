//! Consistency checks for manifests and example metadata.

use std::collections::HashSet;

use crate::manifest::ManifestEntry;
use crate::model::{ExampleMetadata, QuizKind};
use crate::traits::{fetch_json, AssetSource};

/// A warning from manifest or metadata validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The manifest entry ID (if applicable).
    pub entry_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn entry(id: &str, message: impl Into<String>) -> Self {
        Self {
            entry_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate one quiz's manifest for common issues.
pub fn validate_manifest(kind: QuizKind, entries: &[ManifestEntry]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if entries.is_empty() {
        warnings.push(ValidationWarning {
            entry_id: None,
            message: format!("{kind} manifest has no entries"),
        });
    }

    // Check for duplicate entry IDs
    let mut seen_ids = HashSet::new();
    for entry in entries {
        if !seen_ids.insert(entry.id.as_str()) {
            warnings.push(ValidationWarning::entry(
                &entry.id,
                format!("duplicate entry ID: {}", entry.id),
            ));
        }
    }

    // Check that every image the widget shows is referenced
    for entry in entries {
        for key in kind.image_keys() {
            if entry.asset(key).is_none() {
                warnings.push(ValidationWarning::entry(
                    &entry.id,
                    format!("missing image reference `{key}`"),
                ));
            }
        }
    }

    for entry in entries {
        if entry.meta.trim().is_empty() {
            warnings.push(ValidationWarning::entry(&entry.id, "meta path is empty"));
        }
    }

    warnings
}

/// Check that an example's ground truth is answerable with the options the
/// widget will offer.
pub fn validate_metadata(id: &str, metadata: &ExampleMetadata) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    match metadata {
        ExampleMetadata::ObjectReid(meta) => {
            let truth = meta.truth();
            if truth != "yes" && truth != "no" {
                warnings.push(ValidationWarning::entry(
                    id,
                    format!("truth must be yes or no, got {:?}", meta.truth),
                ));
            }
        }
        ExampleMetadata::Scavenger(meta) => {
            let final_color = meta.final_color.to_lowercase();
            if final_color.is_empty() {
                warnings.push(ValidationWarning::entry(id, "final_color is empty"));
            } else if !meta
                .colors()
                .iter()
                .any(|c| c.to_lowercase() == final_color)
            {
                warnings.push(ValidationWarning::entry(
                    id,
                    format!("final_color {final_color} is not among the answer colors"),
                ));
            }

            match meta.chain.last() {
                None => warnings.push(ValidationWarning::entry(id, "chain is empty")),
                Some(last) => {
                    let last_color = last.get(1).map(|c| c.to_lowercase()).unwrap_or_default();
                    if !final_color.is_empty() && last_color != final_color {
                        warnings.push(ValidationWarning::entry(
                            id,
                            format!("chain ends on {last_color} but final_color is {final_color}"),
                        ));
                    }
                }
            }
        }
        ExampleMetadata::Circuit(meta) => {
            if meta.query_port.is_none() {
                warnings.push(ValidationWarning::entry(id, "query_port is missing"));
            }
            if !meta
                .components()
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&meta.correct_comp))
            {
                warnings.push(ValidationWarning::entry(
                    id,
                    format!(
                        "correct_comp {:?} is not one of the mapped components",
                        meta.correct_comp
                    ),
                ));
            }
        }
    }
    warnings
}

/// Fetch every metadata document of a manifest and validate it.
///
/// Fetch and decode failures are reported as warnings, not errors.
pub async fn validate_examples(
    source: &dyn AssetSource,
    kind: QuizKind,
    entries: &[ManifestEntry],
) -> Vec<ValidationWarning> {
    let results = futures::future::join_all(
        entries
            .iter()
            .map(|entry| fetch_json::<serde_json::Value>(source, &entry.meta)),
    )
    .await;

    let mut warnings = Vec::new();
    for (entry, result) in entries.iter().zip(results) {
        let value = match result {
            Ok(value) => value,
            Err(e) => {
                warnings.push(ValidationWarning::entry(&entry.id, e.to_string()));
                continue;
            }
        };
        match ExampleMetadata::from_value(kind, value) {
            Ok(metadata) => warnings.extend(validate_metadata(&entry.id, &metadata)),
            Err(e) => warnings.push(ValidationWarning::entry(
                &entry.id,
                format!("invalid metadata in {}: {e}", entry.meta),
            )),
        }
    }
    warnings
}
