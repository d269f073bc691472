//! Project structure audit
//!
//! Checks the target tree for the directories and files the AI Core Standard
//! requires, plus a recommended set that warns without failing.

use std::path::Path;

use schemars::JsonSchema;
use serde::Serialize;

use crate::catalog::{RECOMMENDED_FILES, REQUIRED_DIRS, REQUIRED_FILES};
use crate::config::{validate_configs, ConfigPaths};
use crate::scan::find_missing;
use crate::validate::SchemaCache;

/// Result of auditing a repo against the project structure standard.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct StructureAuditResult {
    pub target: String,
    pub missing_dirs: Vec<String>,
    pub missing_files: Vec<String>,
    pub missing_recommended: Vec<String>,
    /// None = config validation was not requested
    pub config_validation_passed: Option<bool>,
}

impl StructureAuditResult {
    /// Required items exist and, when requested, config validation passed.
    /// Recommended-only gaps never flip compliance.
    pub fn is_compliant(&self) -> bool {
        self.missing_dirs.is_empty()
            && self.missing_files.is_empty()
            && self.config_validation_passed != Some(false)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "missing_dirs": self.missing_dirs,
            "missing_files": self.missing_files,
            "missing_recommended": self.missing_recommended,
            "config_validation_passed": self.config_validation_passed,
            "is_compliant": self.is_compliant(),
        })
    }

    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Auditing AI structure in: {}\n\n", self.target));

        push_block(&mut out, "Missing required directories:", &self.missing_dirs);
        push_block(&mut out, "Missing required files:", &self.missing_files);
        push_block(
            &mut out,
            "Missing recommended items (not strictly required):",
            &self.missing_recommended,
        );

        match self.config_validation_passed {
            Some(true) => out.push_str("✅ Config schema validation passed.\n\n"),
            Some(false) => out.push_str("❌ Config schema validation failed.\n\n"),
            None => {}
        }

        if self.is_compliant() {
            out.push_str("✅ Project matches core AI structure.\n");
        } else {
            out.push_str("❌ Project does NOT match core AI structure.\n");
            out.push_str("Suggested fix: copy or adapt missing items from the standards templates.\n");
        }
        out
    }
}

pub(crate) fn push_block(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(title);
    out.push('\n');
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
    out.push('\n');
}

/// Audit `target` for required and recommended structure items.
pub fn audit(target: &Path) -> StructureAuditResult {
    StructureAuditResult {
        target: target.display().to_string(),
        missing_dirs: find_missing(target, REQUIRED_DIRS),
        missing_files: find_missing(target, REQUIRED_FILES),
        missing_recommended: find_missing(target, RECOMMENDED_FILES),
        config_validation_passed: None,
    }
}

/// Audit structure and additionally validate the standard config documents.
pub fn audit_with_configs(target: &Path, cache: &mut SchemaCache) -> StructureAuditResult {
    let mut result = audit(target);
    let validations = validate_configs(target, &ConfigPaths::default(), cache);
    result.config_validation_passed = Some(validations.iter().all(|v| v.ok));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scaffold(temp: &TempDir) {
        for dir in REQUIRED_DIRS {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        for file in REQUIRED_FILES {
            fs::write(temp.path().join(file), "x").unwrap();
        }
    }

    #[test]
    fn test_compliant_when_all_required_present() {
        let temp = TempDir::new().unwrap();
        scaffold(&temp);
        let result = audit(temp.path());
        assert!(result.is_compliant());
        assert!(result.missing_dirs.is_empty());
        assert!(result.missing_files.is_empty());
    }

    #[test]
    fn test_missing_file_flips_compliance() {
        let temp = TempDir::new().unwrap();
        scaffold(&temp);
        fs::remove_file(temp.path().join("README.md")).unwrap();
        let result = audit(temp.path());
        assert!(!result.is_compliant());
        assert_eq!(result.missing_files, vec!["README.md"]);
    }

    #[test]
    fn test_recommended_gap_does_not_fail() {
        let temp = TempDir::new().unwrap();
        scaffold(&temp);
        let result = audit(temp.path());
        assert!(!result.missing_recommended.is_empty());
        assert!(result.is_compliant());
    }

    #[test]
    fn test_empty_root_reports_everything_in_order() {
        let temp = TempDir::new().unwrap();
        let result = audit(temp.path());
        let expected: Vec<String> = REQUIRED_DIRS.iter().map(|s| s.to_string()).collect();
        assert_eq!(result.missing_dirs, expected);
    }

    #[test]
    fn test_config_validation_failure_flips_compliance() {
        let temp = TempDir::new().unwrap();
        scaffold(&temp);
        // prompts.yaml/models.yaml exist but are not valid configs
        let mut cache = SchemaCache::new(4);
        let result = audit_with_configs(temp.path(), &mut cache);
        assert_eq!(result.config_validation_passed, Some(false));
        assert!(!result.is_compliant());
    }

    #[test]
    fn test_json_payload_carries_derived_flag() {
        let temp = TempDir::new().unwrap();
        let payload = audit(temp.path()).to_json();
        assert_eq!(payload["is_compliant"], serde_json::json!(false));
    }
}
