//! Data layout and output traceability audit
//!
//! Two independent concerns: stray entries directly under data/ (directories
//! and files judged against separate allow-sets), and metadata compliance of
//! every JSON document under data/outputs. The outputs walk honors an
//! optional file cap that degrades gracefully: hitting the cap appends one
//! disclosed truncation issue, and files beyond it are never opened.

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Serialize;
use walkdir::WalkDir;

use crate::catalog::{ALLOWED_DIRS_IN_DATA, ALLOWED_FILES_IN_DATA, DATA_REQUIRED_DIRS};
use crate::scan::{find_missing, rel_display};
use crate::validate::{output_metadata_validator, validate_output_file, SchemaCache};

use super::structure::push_block;

/// Result of checking data/ layout and output metadata traceability.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DataAuditResult {
    pub target: String,
    pub missing_dirs: Vec<String>,
    pub stray_items: Vec<String>,
    pub metadata_issues: Vec<String>,
}

impl DataAuditResult {
    pub fn is_compliant(&self) -> bool {
        self.missing_dirs.is_empty() && self.stray_items.is_empty() && self.metadata_issues.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "missing_dirs": self.missing_dirs,
            "stray_items": self.stray_items,
            "metadata_issues": self.metadata_issues,
            "is_compliant": self.is_compliant(),
        })
    }

    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Auditing data layout in: {}\n\n", self.target));
        push_block(&mut out, "Missing required directories:", &self.missing_dirs);
        push_block(
            &mut out,
            "Unexpected files/directories directly under data/:",
            &self.stray_items,
        );
        push_block(
            &mut out,
            "Output metadata issues (data/outputs/**/*.json):",
            &self.metadata_issues,
        );
        if self.is_compliant() {
            out.push_str("✅ Data layout and outputs look compliant.\n");
        } else {
            out.push_str("❌ Data layout issues detected. See above for details.\n");
        }
        out
    }
}

/// Options for the data-layout audit.
#[derive(Debug, Clone, Default)]
pub struct DataAuditOptions {
    /// Cap on JSON files validated under data/outputs
    pub max_output_files: Option<usize>,
    /// Schema path overriding the embedded outputs-metadata schema
    pub metadata_schema: Option<PathBuf>,
}

/// Unexpected direct children of data/, one level deep, reported relative to
/// the subtree's parent (e.g. `data/tmp`).
fn find_stray_items(data_root: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(data_root) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut stray = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        let allowed = if path.is_dir() {
            ALLOWED_DIRS_IN_DATA.contains(&name.as_str())
        } else {
            ALLOWED_FILES_IN_DATA.contains(&name.as_str())
        };
        if !allowed {
            let parent = data_root.parent().unwrap_or(data_root);
            stray.push(rel_display(parent, &path));
        }
    }
    stray.sort();
    stray
}

/// Validate JSON documents under `outputs_root`, up to `max_files`.
fn check_output_metadata(
    target: &Path,
    outputs_root: &Path,
    options: &DataAuditOptions,
    cache: &mut SchemaCache,
) -> Vec<String> {
    if !outputs_root.exists() {
        return Vec::new();
    }

    // An unreadable override schema degrades to key/timestamp checks only,
    // mirroring the quiet fallback of the embedded default.
    let validator = match &options.metadata_schema {
        Some(path) => cache.get_or_load(path).ok(),
        None => output_metadata_validator().ok().map(std::sync::Arc::new),
    };

    let mut issues = Vec::new();
    let mut count = 0usize;

    let walker = WalkDir::new(outputs_root)
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|e| {
            e.file_type().is_file() && e.file_name().to_string_lossy().ends_with(".json")
        });

    for entry in walker {
        if let Some(max) = options.max_output_files {
            if count >= max {
                issues.push(format!(
                    "{}: metadata check truncated at {} files; consider running without \
                     --max-output-files for full coverage.",
                    rel_display(target, outputs_root),
                    max
                ));
                break;
            }
        }
        count += 1;
        let display = rel_display(target, entry.path());
        issues.extend(validate_output_file(
            &display,
            entry.path(),
            validator.as_deref(),
        ));
    }

    issues
}

/// Audit `target` for expected data folders and output metadata.
pub fn audit(target: &Path, options: &DataAuditOptions, cache: &mut SchemaCache) -> DataAuditResult {
    let missing_dirs = find_missing(target, DATA_REQUIRED_DIRS);
    let stray_items = find_stray_items(&target.join("data"));
    let metadata_issues =
        check_output_metadata(target, &target.join("data/outputs"), options, cache);

    DataAuditResult {
        target: target.display().to_string(),
        missing_dirs,
        stray_items,
        metadata_issues,
    }
}
