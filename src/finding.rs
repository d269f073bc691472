//! Located findings produced by content scans

use schemars::JsonSchema;
use serde::Serialize;

/// Maximum display width for a finding snippet before truncation.
pub const SNIPPET_MAX_LEN: usize = 160;

/// One located issue discovered during a content scan.
///
/// `line` is 1-based; 0 means the finding applies to the file as a whole
/// (e.g. a stat or read failure) rather than a specific line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Finding {
    /// Path relative to the scanned root, with `/` separators
    pub path: String,
    /// 1-based line number, or 0 for file-level findings
    pub line: usize,
    /// Human-readable message
    pub message: String,
    /// Trimmed source line, truncated to `SNIPPET_MAX_LEN`
    pub snippet: Option<String>,
}

impl Finding {
    /// Finding anchored to a specific line, with a truncated snippet.
    pub fn at_line(path: &str, line: usize, message: &str, raw_line: &str) -> Self {
        let snippet = truncate_snippet(raw_line.trim());
        Finding {
            path: path.to_string(),
            line,
            message: message.to_string(),
            snippet: if snippet.is_empty() {
                None
            } else {
                Some(snippet)
            },
        }
    }

    /// File-level finding with no line or snippet.
    pub fn file_level(path: &str, message: &str) -> Self {
        Finding {
            path: path.to_string(),
            line: 0,
            message: message.to_string(),
            snippet: None,
        }
    }

    /// `path:line` location, or just the path for file-level findings.
    pub fn location(&self) -> String {
        if self.line > 0 {
            format!("{}:{}", self.path, self.line)
        } else {
            self.path.clone()
        }
    }
}

/// Truncate a snippet to the display width, marking the cut with an ellipsis.
pub fn truncate_snippet(s: &str) -> String {
    if s.chars().count() > SNIPPET_MAX_LEN {
        let kept: String = s.chars().take(SNIPPET_MAX_LEN - 3).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_snippet_unchanged() {
        assert_eq!(truncate_snippet("call()"), "call()");
    }

    #[test]
    fn test_truncate_long_snippet() {
        let long = "x".repeat(200);
        let out = truncate_snippet(&long);
        assert_eq!(out.chars().count(), SNIPPET_MAX_LEN);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_location_formats() {
        let f = Finding::at_line("src/app.py", 12, "msg", "  code  ");
        assert_eq!(f.location(), "src/app.py:12");
        assert_eq!(f.snippet.as_deref(), Some("code"));

        let f = Finding::file_level("src/app.py", "unreadable");
        assert_eq!(f.location(), "src/app.py");
        assert_eq!(f.line, 0);
        assert!(f.snippet.is_none());
    }
}
