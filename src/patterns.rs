//! Line-oriented content pattern scanning
//!
//! Applies case-insensitive substring detectors to a file's text, emitting
//! one [`Finding`] per (line, pattern) match. No deduplication: two patterns
//! on one line produce two findings.

use std::path::Path;

use crate::finding::Finding;

/// Scan `text` for every pattern, line by line.
///
/// `rel_path` is recorded on each finding; lines are 1-based.
pub fn scan_text(rel_path: &str, text: &str, patterns: &[(&str, &str)]) -> Vec<Finding> {
    let lowered: Vec<(String, String)> = patterns
        .iter()
        .map(|(pat, msg)| (pat.to_lowercase(), msg.to_string()))
        .collect();

    let mut findings = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_lower = line.to_lowercase();
        for (pat, msg) in &lowered {
            if line_lower.contains(pat.as_str()) {
                findings.push(Finding::at_line(rel_path, idx + 1, msg, line));
            }
        }
    }
    findings
}

/// Read and scan one file; a read failure becomes a file-level finding.
pub fn scan_file(root: &Path, path: &Path, patterns: &[(&str, &str)]) -> Vec<Finding> {
    let rel = crate::scan::rel_display(root, path);
    match std::fs::read_to_string(path) {
        Ok(text) => scan_text(&rel, &text, patterns),
        Err(_) => vec![Finding::file_level(&rel, "Unable to read file for scanning.")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERNS: &[(&str, &str)] = &[
        ("openai.ChatCompletion.create", "raw chat call"),
        ("client.completions.create", "raw completion call"),
    ];

    #[test]
    fn test_case_insensitive_match() {
        let text = "resp = OPENAI.chatcompletion.CREATE(model)\n";
        let findings = scan_text("app.py", text, PATTERNS);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 1);
        assert_eq!(findings[0].message, "raw chat call");
    }

    #[test]
    fn test_two_patterns_one_line_two_findings() {
        let text = "openai.ChatCompletion.create; client.completions.create\n";
        let findings = scan_text("app.py", text, PATTERNS);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_line_numbers_one_based() {
        let text = "a = 1\nb = 2\nopenai.ChatCompletion.create()\n";
        let findings = scan_text("app.py", text, PATTERNS);
        assert_eq!(findings[0].line, 3);
    }

    #[test]
    fn test_snippet_is_trimmed_line() {
        let text = "    openai.ChatCompletion.create()   \n";
        let findings = scan_text("app.py", text, PATTERNS);
        assert_eq!(
            findings[0].snippet.as_deref(),
            Some("openai.ChatCompletion.create()")
        );
    }

    #[test]
    fn test_no_match_no_findings() {
        let findings = scan_text("app.py", "print('hello')\n", PATTERNS);
        assert!(findings.is_empty());
    }
}
