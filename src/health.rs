//! Consolidated health check
//!
//! Composes the tooling, data-layout, and prompt-discovery checks into one
//! report. Overall status is the logical AND of member checks; prompt
//! discovery is informational and always passes, since its purpose is
//! enumeration rather than enforcement.

use std::path::Path;

use schemars::JsonSchema;
use serde::Serialize;

use crate::audit::{data_layout, tooling};
use crate::extract::{extract_prompts, ExtractOptions};
use crate::validate::SchemaCache;

/// Outcome of a single named check in the consolidated report.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CheckOutcome {
    pub name: String,
    /// "pass" or "fail"
    pub status: String,
    #[schemars(skip)]
    pub details: serde_json::Value,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.status == "pass"
    }
}

/// Aggregate report across multiple audits for one target.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ConsolidatedReport {
    pub target: String,
    pub checks: Vec<CheckOutcome>,
}

impl ConsolidatedReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(CheckOutcome::passed)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "passed": self.passed(),
            "checks": self.checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "status": c.status,
                "details": c.details,
            })).collect::<Vec<_>>(),
        })
    }

    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Running AI-Core consolidated checks for: {}\n\n",
            self.target
        ));
        for check in &self.checks {
            let mark = if check.passed() { "✅" } else { "❌" };
            out.push_str(&format!("{} {}\n", mark, check.name));
        }
        out.push_str(&format!(
            "\nOverall: {}\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));
        out
    }
}

/// Run the consolidated checks against `target`.
///
/// Member details are embedded verbatim, not summarized, so automation can
/// drill into any failing check without re-running it.
pub fn run_checks(target: &Path, cache: &mut SchemaCache) -> ConsolidatedReport {
    let mut checks = Vec::new();

    let tooling_result = tooling::audit(target);
    checks.push(CheckOutcome {
        name: "tooling".to_string(),
        status: status_of(tooling_result.is_compliant()),
        details: tooling_result.to_json(),
    });

    let data_result = data_layout::audit(target, &data_layout::DataAuditOptions::default(), cache);
    checks.push(CheckOutcome {
        name: "data_layout".to_string(),
        status: status_of(data_result.is_compliant()),
        details: data_result.to_json(),
    });

    let prompt_result = extract_prompts(target, &ExtractOptions::default());
    checks.push(CheckOutcome {
        name: "prompt_extract".to_string(),
        // informational only
        status: "pass".to_string(),
        details: serde_json::json!({
            "prompt_count": prompt_result.prompts.len(),
            "target": prompt_result.target,
        }),
    });

    ConsolidatedReport {
        target: target.display().to_string(),
        checks,
    }
}

fn status_of(compliant: bool) -> String {
    if compliant { "pass" } else { "fail" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn compliant_tree(temp: &TempDir) {
        for dir in crate::catalog::DATA_REQUIRED_DIRS {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join(".pre-commit-config.yaml"), "repos: []").unwrap();
        fs::create_dir_all(temp.path().join(".github/workflows")).unwrap();
        fs::write(temp.path().join(".github/workflows/ci.yml"), "on: push").unwrap();
    }

    #[test]
    fn test_all_pass_on_compliant_tree() {
        let temp = TempDir::new().unwrap();
        compliant_tree(&temp);
        let mut cache = SchemaCache::new(4);
        let report = run_checks(temp.path(), &mut cache);
        assert!(report.passed(), "{}", report.to_report());
        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["tooling", "data_layout", "prompt_extract"]);
    }

    #[test]
    fn test_failing_member_fails_overall() {
        let temp = TempDir::new().unwrap();
        let mut cache = SchemaCache::new(4);
        let report = run_checks(temp.path(), &mut cache);
        assert!(!report.passed());
    }

    #[test]
    fn test_prompt_check_informational_even_with_findings() {
        let temp = TempDir::new().unwrap();
        compliant_tree(&temp);
        fs::write(
            temp.path().join("svc.py"),
            "SYSTEM_PROMPT = \"You are an assistant with very detailed behavior rules.\"\n",
        )
        .unwrap();
        // a .py file now triggers the python tooling requirement
        fs::write(temp.path().join("pyproject.toml"), "[project]\nname = 'x'\n").unwrap();
        let mut cache = SchemaCache::new(4);
        let report = run_checks(temp.path(), &mut cache);
        let prompt_check = report
            .checks
            .iter()
            .find(|c| c.name == "prompt_extract")
            .unwrap();
        assert_eq!(prompt_check.status, "pass");
        assert_eq!(prompt_check.details["prompt_count"], serde_json::json!(1));
    }

    #[test]
    fn test_consolidated_json_idempotent() {
        let temp = TempDir::new().unwrap();
        compliant_tree(&temp);
        let mut cache = SchemaCache::new(4);
        let first =
            serde_json::to_string_pretty(&run_checks(temp.path(), &mut cache).to_json()).unwrap();
        let second =
            serde_json::to_string_pretty(&run_checks(temp.path(), &mut cache).to_json()).unwrap();
        assert_eq!(first, second);
    }
}
