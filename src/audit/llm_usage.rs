//! LLM usage audit
//!
//! Flags raw provider calls in source files so they can be replaced with the
//! standard client abstraction. Pure substring detection over a bounded scan;
//! stat/read failures surface as file-level findings rather than aborting.

use std::path::Path;

use schemars::JsonSchema;
use serde::Serialize;

use crate::catalog::{DEFAULT_MAX_SCAN_BYTES, IGNORE_DIRS, LLM_SCAN_EXTENSIONS, RAW_LLM_PATTERNS};
use crate::finding::Finding;
use crate::patterns::scan_file;
use crate::scan::{scan, ScanEvent, ScanPolicy};

/// Result of the LLM usage audit.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LlmAuditResult {
    pub target: String,
    pub findings: Vec<Finding>,
}

impl LlmAuditResult {
    pub fn is_compliant(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "findings": self.findings,
            "is_compliant": self.is_compliant(),
        })
    }

    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Auditing LLM usage in: {}\n\n", self.target));
        if self.findings.is_empty() {
            out.push_str("✅ No raw LLM calls detected; usage appears standardized.\n");
        } else {
            out.push_str("❌ Raw LLM usage detected:\n");
            for finding in &self.findings {
                out.push_str(&format!("  - {}: {}\n", finding.location(), finding.message));
            }
        }
        out
    }
}

/// Options for the LLM usage audit.
#[derive(Debug, Clone)]
pub struct LlmAuditOptions {
    /// Files larger than this are skipped; None disables the cap
    pub max_size_bytes: Option<u64>,
}

impl Default for LlmAuditOptions {
    fn default() -> Self {
        LlmAuditOptions {
            max_size_bytes: Some(DEFAULT_MAX_SCAN_BYTES),
        }
    }
}

/// Audit `target` for raw provider usage.
pub fn audit(target: &Path, options: &LlmAuditOptions) -> LlmAuditResult {
    let policy = ScanPolicy::new(IGNORE_DIRS, LLM_SCAN_EXTENSIONS)
        .with_max_file_size(options.max_size_bytes);

    let mut findings = Vec::new();
    for event in scan(target, &policy) {
        match event {
            ScanEvent::File(path) => {
                findings.extend(scan_file(target, &path, RAW_LLM_PATTERNS));
            }
            ScanEvent::Issue(finding) => findings.push(finding),
        }
    }

    LlmAuditResult {
        target: target.display().to_string(),
        findings,
    }
}
