//! Inline prompt extraction from Python sources
//!
//! Parses each candidate file with tree-sitter and collects assignments whose
//! target identifier looks like a prompt variable. The assigned expression is
//! reduced to a single string when it is a literal, a `+`-concatenation of
//! reducible parts, or an f-string (interpolations become a `{...}`
//! placeholder). Anything else is skipped quietly; this is a best-effort
//! heuristic, not an evaluator.
//!
//! Extraction is informational: the result is always compliant.

use std::path::Path;

use schemars::JsonSchema;
use serde::Serialize;
use tree_sitter::{Node, Parser};

use crate::catalog::{DEFAULT_MIN_PROMPT_LEN, IGNORE_DIRS, PROMPT_SCAN_EXTENSIONS, PROMPT_VAR_SUFFIXES};
use crate::scan::{rel_display, scan, ScanEvent, ScanPolicy};

/// Placeholder substituted for interpolated expressions in f-strings.
const HOLE: &str = "{...}";

/// A single extracted prompt occurrence.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PromptFinding {
    /// Path relative to the target root
    pub path: String,
    /// 1-based line of the assignment
    pub line: usize,
    pub var_name: String,
    pub value: String,
}

/// Structured report of prompt findings for one target tree.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PromptExtractionResult {
    pub target: String,
    pub prompts: Vec<PromptFinding>,
}

impl PromptExtractionResult {
    /// Extraction enumerates; it never fails a target.
    pub fn is_compliant(&self) -> bool {
        true
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "prompts": self.prompts,
            "is_compliant": self.is_compliant(),
        })
    }

    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Extracting prompts from: {}\n\n", self.target));
        if self.prompts.is_empty() {
            out.push_str("No inline prompts found.\n");
            return out;
        }
        out.push_str(&format!("Found {} prompt(s):\n", self.prompts.len()));
        for finding in &self.prompts {
            let mut preview = finding.value.trim().replace('\n', " ");
            if preview.chars().count() > 80 {
                preview = format!("{}...", preview.chars().take(77).collect::<String>());
            }
            out.push_str(&format!(
                "- {}:{} :: {} -> {}\n",
                finding.path, finding.line, finding.var_name, preview
            ));
        }
        out
    }

    /// Render a prompts.yaml skeleton for manual curation.
    pub fn to_yaml_skeleton(&self) -> String {
        let mut lines = vec!["prompts:".to_string()];
        for (idx, finding) in self.prompts.iter().enumerate() {
            lines.push(format!("  prompt_{}:", idx + 1));
            lines.push("    description: TODO".to_string());
            lines.push("    system: |".to_string());
            let value_lines: Vec<&str> = if finding.value.is_empty() {
                vec![""]
            } else {
                finding.value.lines().collect()
            };
            for line in value_lines {
                lines.push(format!("      {}", line));
            }
            lines.push("    user_template: TODO".to_string());
            lines.push(format!(
                "    _source: {}:{} ({})",
                finding.path, finding.line, finding.var_name
            ));
        }
        lines.join("\n")
    }
}

/// Options for a prompt extraction pass.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Dot-prefixed extensions to scan
    pub extensions: Vec<String>,
    /// Reduced strings shorter than this (after trimming) are dropped
    pub min_length: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            extensions: PROMPT_SCAN_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            min_length: DEFAULT_MIN_PROMPT_LEN,
        }
    }
}

/// Extract likely prompt variables from code under `target_root`.
pub fn extract_prompts(target_root: &Path, options: &ExtractOptions) -> PromptExtractionResult {
    let extensions: Vec<&str> = options.extensions.iter().map(|s| s.as_str()).collect();
    let policy = ScanPolicy::new(IGNORE_DIRS, &extensions);

    let mut findings = Vec::new();
    for event in scan(target_root, &policy) {
        let path = match event {
            ScanEvent::File(path) => path,
            // Walk problems are not enumeration findings here.
            ScanEvent::Issue(_) => continue,
        };
        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(_) => continue,
        };
        let rel = rel_display(target_root, &path);
        for (var_name, line, value) in extract_from_source(&source) {
            if value.trim().chars().count() < options.min_length {
                continue;
            }
            findings.push(PromptFinding {
                path: rel.clone(),
                line,
                var_name,
                value,
            });
        }
    }

    PromptExtractionResult {
        target: target_root.display().to_string(),
        prompts: findings,
    }
}

fn looks_like_prompt_var(name: &str) -> bool {
    let lowered = name.to_lowercase();
    PROMPT_VAR_SUFFIXES
        .iter()
        .any(|suffix| lowered.ends_with(suffix))
}

/// Collect (var_name, line, reduced_value) triples from one source text.
///
/// Unparseable sources yield nothing; tree-sitter degrades to partial trees
/// rather than failing, which suits a best-effort extractor.
pub fn extract_from_source(source: &str) -> Vec<(String, usize, String)> {
    let mut parser = Parser::new();
    if parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .is_err()
    {
        return Vec::new();
    }
    let tree = match parser.parse(source, None) {
        Some(tree) => tree,
        None => return Vec::new(),
    };

    let mut results = Vec::new();
    collect_assignments(tree.root_node(), source, &mut results);
    results
}

fn collect_assignments(node: Node, source: &str, out: &mut Vec<(String, usize, String)>) {
    if node.kind() == "assignment" {
        if let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) {
            if left.kind() == "identifier" {
                let name = left.utf8_text(source.as_bytes()).unwrap_or("").to_string();
                if looks_like_prompt_var(&name) {
                    if let Some(value) = reduce_string(right, source) {
                        if !value.is_empty() {
                            out.push((name, node.start_position().row + 1, value));
                        }
                    }
                }
            }
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_assignments(child, source, out);
    }
}

/// Try to reduce an expression to a single string.
///
/// Handles string literals (f-string holes become `{...}`), implicit
/// adjacent-literal concatenation, `+`-concatenation, and parenthesized
/// forms. Returns None for anything else.
fn reduce_string(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "string" => {
            let mut out = String::new();
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "string_content" => {
                        out.push_str(child.utf8_text(source.as_bytes()).unwrap_or(""));
                    }
                    "escape_sequence" => {
                        out.push_str(&unescape(
                            child.utf8_text(source.as_bytes()).unwrap_or(""),
                        ));
                    }
                    "interpolation" => out.push_str(HOLE),
                    _ => {}
                }
            }
            Some(out)
        }
        "concatenated_string" => {
            let mut out = String::new();
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.is_named() {
                    out.push_str(&reduce_string(child, source)?);
                }
            }
            Some(out)
        }
        "binary_operator" => {
            let op = node.child_by_field_name("operator")?;
            if op.utf8_text(source.as_bytes()).unwrap_or("") != "+" {
                return None;
            }
            let left = reduce_string(node.child_by_field_name("left")?, source)?;
            let right = reduce_string(node.child_by_field_name("right")?, source)?;
            Some(format!("{}{}", left, right))
        }
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.is_named() {
                    return reduce_string(child, source);
                }
            }
            None
        }
        _ => None,
    }
}

fn unescape(escape: &str) -> String {
    match escape {
        "\\n" => "\n".to_string(),
        "\\t" => "\t".to_string(),
        "\\r" => "\r".to_string(),
        "\\\\" => "\\".to_string(),
        "\\'" => "'".to_string(),
        "\\\"" => "\"".to_string(),
        other => other.to_string(),
    }
}
