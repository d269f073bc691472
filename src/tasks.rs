//! Remediation task orchestration
//!
//! Enumerates the known audit tasks, runs the ones that resolve to a
//! subcommand of this binary, reports the rest as missing, and can loop the
//! whole sequence until everything required succeeds. Designed to stay
//! resilient while some remediation steps remain manual.

use std::path::{Path, PathBuf};
use std::process::Command;

use schemars::JsonSchema;
use serde::Serialize;

/// One named remediation task from the fixed catalogue.
#[derive(Debug, Clone, Copy)]
pub struct AuditTask {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Subcommand of this binary, or None for manual/placeholder tasks
    pub subcommand: Option<&'static [&'static str]>,
}

/// The fixed task catalogue.
///
/// The two prompt tasks rewrite the target project, so they stay manual and
/// always report "missing" here.
pub const KNOWN_TASKS: &[AuditTask] = &[
    AuditTask {
        key: "structure",
        title: "Structure Audit",
        description: "Check required files/folders against the core standard.",
        subcommand: Some(&["structure"]),
    },
    AuditTask {
        key: "schema",
        title: "Config & Schema Validation",
        description: "Validate models/prompts/project/evals YAML against schemas.",
        subcommand: Some(&["validate"]),
    },
    AuditTask {
        key: "prompt-extract",
        title: "Prompt Extraction",
        description: "Move inline prompts into config/prompts.yaml (manual).",
        subcommand: None,
    },
    AuditTask {
        key: "prompt-merge",
        title: "Prompt Merging",
        description: "Merge core/template/custom prompts (run explicitly).",
        subcommand: None,
    },
    AuditTask {
        key: "llm-usage",
        title: "LLM Usage Audit",
        description: "Replace raw provider calls with standard clients.",
        subcommand: Some(&["llm"]),
    },
    AuditTask {
        key: "data-layout",
        title: "Data Layout & Traceability",
        description: "Enforce data/ layout and output metadata.",
        subcommand: Some(&["data"]),
    },
    AuditTask {
        key: "tooling",
        title: "Tooling & CI",
        description: "Align pre-commit and CI with the standard.",
        subcommand: Some(&["tooling"]),
    },
    AuditTask {
        key: "docs",
        title: "Docs & Standards",
        description: "Align README/docs with the standard.",
        subcommand: Some(&["docs"]),
    },
    AuditTask {
        key: "health",
        title: "Master Health Check",
        description: "Consolidated health check across audits.",
        subcommand: Some(&["check"]),
    },
];

/// Outcome of one executed (or skipped) task.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TaskResult {
    pub key: String,
    pub title: String,
    /// ok | fail | missing | skipped
    pub status: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        self.status == "ok"
    }

    pub fn is_missing(&self) -> bool {
        self.status == "missing"
    }

    pub fn is_failure(&self) -> bool {
        self.status == "fail"
    }
}

/// Keep only tasks whose key appears in `only` (all tasks when None).
pub fn filter_tasks(only: Option<&[String]>) -> Vec<AuditTask> {
    match only {
        None => KNOWN_TASKS.to_vec(),
        Some(keys) => KNOWN_TASKS
            .iter()
            .filter(|task| keys.iter().any(|k| k == task.key))
            .copied()
            .collect(),
    }
}

/// Run one task against `target_root` via `exe`.
pub fn run_task(task: &AuditTask, exe: &Path, target_root: &Path, dry_run: bool) -> TaskResult {
    let subcommand = match task.subcommand {
        None => {
            return TaskResult {
                key: task.key.to_string(),
                title: task.title.to_string(),
                status: "missing".to_string(),
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
            }
        }
        Some(subcommand) => subcommand,
    };

    if dry_run {
        return TaskResult {
            key: task.key.to_string(),
            title: task.title.to_string(),
            status: "skipped".to_string(),
            exit_code: Some(0),
            stdout: "DRY-RUN".to_string(),
            stderr: String::new(),
        };
    }

    let output = Command::new(exe)
        .args(subcommand)
        .arg("--target-root")
        .arg(target_root)
        .output();

    match output {
        Ok(output) => {
            let code = output.status.code();
            TaskResult {
                key: task.key.to_string(),
                title: task.title.to_string(),
                status: if output.status.success() { "ok" } else { "fail" }.to_string(),
                exit_code: code,
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }
        }
        Err(e) => TaskResult {
            key: task.key.to_string(),
            title: task.title.to_string(),
            status: "fail".to_string(),
            exit_code: None,
            stdout: String::new(),
            stderr: format!("failed to spawn: {}", e),
        },
    }
}

/// Run every task in order against one target.
pub fn run_sequence(
    tasks: &[AuditTask],
    exe: &Path,
    target_root: &Path,
    dry_run: bool,
) -> Vec<TaskResult> {
    tasks
        .iter()
        .map(|task| run_task(task, exe, target_root, dry_run))
        .collect()
}

/// Render a compact status table.
pub fn summarize(results: &[TaskResult]) -> String {
    let mut lines = vec![
        "Task Key | Status | Exit | Notes".to_string(),
        "--------|--------|------|------".to_string(),
    ];
    for result in results {
        let note = if result.is_missing() {
            "manual task".to_string()
        } else if result.status == "skipped" {
            "dry-run".to_string()
        } else if result.is_failure() {
            let source = if result.stderr.trim().is_empty() {
                &result.stdout
            } else {
                &result.stderr
            };
            source
                .trim()
                .lines()
                .next()
                .unwrap_or("failed")
                .to_string()
        } else {
            String::new()
        };
        let exit = result
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{} | {} | {} | {}",
            result.key, result.status, exit, note
        ));
    }
    lines.join("\n")
}

/// Write the remediation plan markdown.
pub fn write_plan(path: &Path, results: &[TaskResult]) -> std::io::Result<()> {
    let mut lines: Vec<String> = vec!["# Audit Remediation Plan".to_string(), String::new()];
    for result in results {
        lines.push(format!("## {} ({})", result.title, result.key));
        lines.push(format!("Status: {}", result.status));
        if let Some(code) = result.exit_code {
            lines.push(format!("Exit code: {}", code));
        }
        if !result.stdout.trim().is_empty() {
            lines.push("### Output".to_string());
            lines.push(format!("```\n{}\n```", result.stdout.trim()));
        }
        if !result.stderr.trim().is_empty() {
            lines.push("### Errors".to_string());
            lines.push(format!("```\n{}\n```", result.stderr.trim()));
        }
        if result.is_missing() {
            lines.push("_Manual task; see the remediation guide._".to_string());
        }
        lines.push(String::new());
    }
    std::fs::write(path, lines.join("\n"))
}

/// Map final results to the process exit contract:
/// 1 on any failure, 2 when missing tasks are treated as required, else 0.
pub fn exit_code(results: &[TaskResult], fail_on_missing: bool) -> i32 {
    if results.iter().any(TaskResult::is_failure) {
        return 1;
    }
    if fail_on_missing && results.iter().any(TaskResult::is_missing) {
        return 2;
    }
    0
}

/// True when the loop should stop re-running the sequence.
pub fn sequence_settled(results: &[TaskResult], fail_on_missing: bool) -> bool {
    let failures = results.iter().any(TaskResult::is_failure);
    let missing = results.iter().any(TaskResult::is_missing);
    !failures && (!fail_on_missing || !missing)
}

/// Remediation workflow guidance printed by `fix --guide`.
pub const WORKFLOW_GUIDE: &str = "\
Use the audits to see gaps, fix them, then re-run audits.

Loop: run audit -> inspect findings -> open files -> apply fixes -> re-run audit.

1) Run audits from the target repo root:
   - aicheck structure --target-root .
   - aicheck validate --target-root .
   - aicheck data / aicheck llm / aicheck tooling / aicheck docs

2) Structure fixes: create missing dirs/files and minimal config/models.yaml
   and config/prompts.yaml from the standards templates.

3) Prompts: move inline prompts into config/prompts.yaml (aicheck prompts
   --yaml gives a skeleton); rewire code to load prompts by id.

4) LLM usage: replace direct provider calls with standard clients that load
   prompts/models from config.

5) Data layout: write outputs under data/outputs with metadata (run_id,
   model, prompt_id, timestamp) and standard naming.

6) Tooling/CI: adapt pre-commit and CI to the project; keep scope to the
   languages actually used.

7) Docs: align README and local docs with the standard, keeping content
   project-specific.

8) Master check: run aicheck check, fix one failing category at a time, and
   iterate until green.
";
