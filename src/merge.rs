//! Precedence merge engine for layered prompt sources
//!
//! Merges named key→value layers in a caller-specified priority order
//! (lowest first). Last writer wins per key, with full provenance: which
//! source won each key, and the ordered chain of sources that touched each
//! overridden key.
//!
//! There is deliberately no deep merge. A key collision replaces the whole
//! value, nested mappings included; `tests/merge_test.rs` pins this as
//! contract.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::validate::yaml_to_json;
use serde_json::Value;

/// A named layer participating in a priority merge.
#[derive(Debug, Clone)]
pub struct PrecedenceSource {
    pub name: String,
    pub mapping: BTreeMap<String, Value>,
}

impl PrecedenceSource {
    pub fn new(name: &str, mapping: BTreeMap<String, Value>) -> Self {
        PrecedenceSource {
            name: name.to_string(),
            mapping,
        }
    }
}

/// Result of merging prompt maps, including override provenance.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// key → value of the highest-priority source that defined it
    pub merged: BTreeMap<String, Value>,
    /// key → name of the winning source
    pub source_by_key: BTreeMap<String, String>,
    /// key → every source that defined it, in evaluation order.
    /// Only keys written more than once appear here.
    pub overrides: BTreeMap<String, Vec<String>>,
}

/// Merge sources in the given order (lowest priority first).
pub fn merge(sources: &[PrecedenceSource]) -> MergeReport {
    let mut report = MergeReport::default();

    for source in sources {
        for (key, value) in &source.mapping {
            if report.merged.contains_key(key) {
                let prev = report.source_by_key[key].clone();
                report
                    .overrides
                    .entry(key.clone())
                    .or_insert_with(|| vec![prev])
                    .push(source.name.clone());
            }
            report.merged.insert(key.clone(), value.clone());
            report
                .source_by_key
                .insert(key.clone(), source.name.clone());
        }
    }

    report
}

/// Load one YAML source layer from disk.
///
/// A missing optional file yields an empty mapping plus a warning string for
/// the caller's side channel; a missing required file is fatal. A present
/// file whose root is not a mapping is always fatal, since no well-defined
/// union exists. Keys are normalized to strings.
pub fn load_source(
    path: &Path,
    required: bool,
    label: &str,
    warnings: &mut Vec<String>,
) -> Result<BTreeMap<String, Value>> {
    if !path.exists() {
        if required {
            return Err(Error::MissingSource(path.display().to_string()));
        }
        warnings.push(format!(
            "Optional prompts file not found, skipping: {}",
            path.display()
        ));
        return Ok(BTreeMap::new());
    }

    let raw = std::fs::read_to_string(path)?;
    let parsed: serde_norway::Value = serde_norway::from_str(&raw)?;

    match yaml_to_json(parsed) {
        Value::Null => Ok(BTreeMap::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(Error::NotAMapping(label.to_string())),
    }
}

/// Serialize a merged mapping back to YAML, creating parent directories.
/// Keys come out sorted (BTreeMap order).
pub fn write_merged(merged: &BTreeMap<String, Value>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_norway::to_string(merged)?;
    std::fs::write(path, yaml)?;
    Ok(())
}
