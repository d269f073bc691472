//! Tooling and CI audit
//!
//! Checks for the core tooling configs (pre-commit, CI workflows) plus
//! language-conditional requirements keyed off the extensions actually found
//! in a bounded sample of the tree.

use std::collections::BTreeSet;
use std::path::Path;

use schemars::JsonSchema;
use serde::Serialize;
use walkdir::WalkDir;

use crate::catalog::{
    CI_SENTINEL, EXTENSION_LANGUAGES, LANGUAGE_DETECT_MAX_FILES, LANGUAGE_RECOMMENDED,
    LANGUAGE_REQUIRED, LANGUAGE_REQUIRED_ALT_GROUPS, RECOMMENDED_TOOLING_DIRS,
    RECOMMENDED_TOOLING_FILES, REQUIRED_TOOLING_FILES, RUFF_DOT, RUFF_PRIMARY,
};
use crate::scan::{find_missing, find_missing_dirs};

use super::structure::push_block;

/// Result of the tooling and CI audit.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ToolingAuditResult {
    pub target: String,
    pub missing_required: Vec<String>,
    pub missing_recommended: Vec<String>,
    pub missing_recommended_dirs: Vec<String>,
    /// Languages detected in the sampled tree, sorted
    pub detected_languages: Vec<String>,
}

impl ToolingAuditResult {
    pub fn is_compliant(&self) -> bool {
        self.missing_required.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "missing_required": self.missing_required,
            "missing_recommended": self.missing_recommended,
            "missing_recommended_dirs": self.missing_recommended_dirs,
            "detected_languages": self.detected_languages,
            "is_compliant": self.is_compliant(),
        })
    }

    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Auditing tooling in: {}\n\n", self.target));
        push_block(
            &mut out,
            "Missing required tooling files:",
            &self.missing_required,
        );
        push_block(
            &mut out,
            "Missing recommended tooling files:",
            &self.missing_recommended,
        );
        push_block(
            &mut out,
            "Missing recommended directories (e.g., tests):",
            &self.missing_recommended_dirs,
        );
        if self.is_compliant() {
            out.push_str("✅ Core tooling files present.\n");
        } else {
            out.push_str("❌ Tooling audit failed. See findings above.\n");
        }
        out
    }
}

fn has_ci_workflow(root: &Path) -> bool {
    let workflows = root.join(".github/workflows");
    let entries = match std::fs::read_dir(workflows) {
        Ok(entries) => entries,
        Err(_) => return false,
    };
    entries.flatten().any(|entry| {
        let path = entry.path();
        let name = path.file_name().map(|n| n.to_string_lossy().to_string());
        path.is_file()
            && name
                .map(|n| n.ends_with(".yml") || n.ends_with(".yaml"))
                .unwrap_or(false)
    })
}

/// Detect languages by extension over a bounded file-count sample.
pub fn detect_languages(root: &Path, max_files: usize) -> BTreeSet<String> {
    let mut langs = BTreeSet::new();
    let mut count = 0usize;

    for entry in WalkDir::new(root).sort_by_file_name().into_iter().flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        count += 1;
        if count > max_files {
            break;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if let Some(idx) = name.rfind('.') {
            let suffix = &name[idx..];
            for (ext, lang) in EXTENSION_LANGUAGES {
                if *ext == suffix {
                    langs.insert(lang.to_string());
                }
            }
        }
    }
    langs
}

fn table_lookup<'a>(table: &[(&str, &'a [&'a str])], lang: &str) -> &'a [&'a str] {
    table
        .iter()
        .find(|(key, _)| *key == lang)
        .map(|(_, items)| *items)
        .unwrap_or(&[])
}

fn language_required_missing(root: &Path, langs: &BTreeSet<String>) -> Vec<String> {
    let mut missing = Vec::new();
    for lang in langs {
        missing.extend(find_missing(root, table_lookup(LANGUAGE_REQUIRED, lang)));

        for (key, groups) in LANGUAGE_REQUIRED_ALT_GROUPS {
            if key != lang {
                continue;
            }
            for group in *groups {
                if !group.iter().any(|candidate| root.join(candidate).exists()) {
                    let mut members: Vec<String> = group.iter().map(|s| s.to_string()).collect();
                    members.sort();
                    missing.extend(members);
                }
            }
        }
    }
    missing
}

fn language_recommended_missing(root: &Path, langs: &BTreeSet<String>) -> Vec<String> {
    let mut missing = Vec::new();
    for lang in langs {
        let mut lang_missing = find_missing(root, table_lookup(LANGUAGE_RECOMMENDED, lang));
        if lang == "python" {
            lang_missing = suppress_ruff_pair(root, lang_missing);
        }
        missing.extend(lang_missing);
    }
    missing
}

/// The ruff config pair is an either-or group: if one exists, drop both from
/// the missing list.
fn suppress_ruff_pair(root: &Path, missing: Vec<String>) -> Vec<String> {
    let either_exists = root.join(RUFF_PRIMARY).exists() || root.join(RUFF_DOT).exists();
    let mut out: Vec<String> = if either_exists {
        missing
            .into_iter()
            .filter(|item| item != RUFF_PRIMARY && item != RUFF_DOT)
            .collect()
    } else {
        missing
    };
    out.sort();
    out
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Audit `target` for tooling and CI presence.
pub fn audit(target: &Path) -> ToolingAuditResult {
    let mut missing_required = find_missing(target, REQUIRED_TOOLING_FILES);

    // Any workflow YAML satisfies the CI sentinel
    if missing_required.iter().any(|m| m == CI_SENTINEL) && has_ci_workflow(target) {
        missing_required.retain(|m| m != CI_SENTINEL);
    }

    let langs = detect_languages(target, LANGUAGE_DETECT_MAX_FILES);
    missing_required.extend(language_required_missing(target, &langs));
    let missing_required = dedup_preserving_order(missing_required);

    let mut missing_recommended =
        suppress_ruff_pair(target, find_missing(target, RECOMMENDED_TOOLING_FILES));
    missing_recommended.extend(language_recommended_missing(target, &langs));
    let missing_recommended = dedup_preserving_order(missing_recommended);

    let missing_recommended_dirs = find_missing_dirs(target, RECOMMENDED_TOOLING_DIRS);

    ToolingAuditResult {
        target: target.display().to_string(),
        missing_required,
        missing_recommended,
        missing_recommended_dirs,
        detected_languages: langs.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn base_tooling(temp: &TempDir) {
        fs::write(temp.path().join(".pre-commit-config.yaml"), "repos: []").unwrap();
        fs::create_dir_all(temp.path().join(".github/workflows")).unwrap();
        fs::write(temp.path().join(".github/workflows/ci.yml"), "on: push").unwrap();
    }

    #[test]
    fn test_compliant_with_base_tooling() {
        let temp = TempDir::new().unwrap();
        base_tooling(&temp);
        let result = audit(temp.path());
        assert!(result.is_compliant(), "{:?}", result.missing_required);
    }

    #[test]
    fn test_any_workflow_satisfies_ci_sentinel() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".pre-commit-config.yaml"), "repos: []").unwrap();
        fs::create_dir_all(temp.path().join(".github/workflows")).unwrap();
        fs::write(temp.path().join(".github/workflows/deploy.yaml"), "on: push").unwrap();
        let result = audit(temp.path());
        assert!(result.is_compliant());
    }

    #[test]
    fn test_python_requires_pyproject() {
        let temp = TempDir::new().unwrap();
        base_tooling(&temp);
        fs::write(temp.path().join("main.py"), "x = 1").unwrap();
        let result = audit(temp.path());
        assert!(!result.is_compliant());
        assert!(result
            .missing_required
            .contains(&"pyproject.toml".to_string()));
        assert_eq!(result.detected_languages, vec!["python"]);
    }

    #[test]
    fn test_typescript_requires_manifest_and_tsconfig() {
        let temp = TempDir::new().unwrap();
        base_tooling(&temp);
        fs::write(temp.path().join("app.ts"), "const x = 1;").unwrap();
        let result = audit(temp.path());
        assert!(result
            .missing_required
            .contains(&"package.json".to_string()));
        assert!(result
            .missing_required
            .contains(&"tsconfig.json".to_string()));
    }

    #[test]
    fn test_alt_group_satisfied_by_any_member() {
        let temp = TempDir::new().unwrap();
        base_tooling(&temp);
        fs::write(temp.path().join("core.c"), "int main() {}").unwrap();
        fs::write(temp.path().join("Makefile"), "all:").unwrap();
        let result = audit(temp.path());
        assert!(result.is_compliant(), "{:?}", result.missing_required);
    }

    #[test]
    fn test_alt_group_missing_lists_all_members() {
        let temp = TempDir::new().unwrap();
        base_tooling(&temp);
        fs::write(temp.path().join("core.c"), "int main() {}").unwrap();
        let result = audit(temp.path());
        assert!(result
            .missing_required
            .contains(&"CMakeLists.txt".to_string()));
        assert!(result.missing_required.contains(&"Makefile".to_string()));
    }

    #[test]
    fn test_ruff_either_or_suppression() {
        let temp = TempDir::new().unwrap();
        base_tooling(&temp);
        fs::write(temp.path().join(".ruff.toml"), "").unwrap();
        let result = audit(temp.path());
        assert!(!result
            .missing_recommended
            .contains(&RUFF_PRIMARY.to_string()));
        assert!(!result.missing_recommended.contains(&RUFF_DOT.to_string()));
    }

    #[test]
    fn test_recommended_tests_dir_reported() {
        let temp = TempDir::new().unwrap();
        base_tooling(&temp);
        let result = audit(temp.path());
        assert_eq!(result.missing_recommended_dirs, vec!["tests"]);
        assert!(result.is_compliant());
    }

    #[test]
    fn test_no_duplicate_requirements_for_js_and_ts() {
        let temp = TempDir::new().unwrap();
        base_tooling(&temp);
        fs::write(temp.path().join("a.js"), "x").unwrap();
        fs::write(temp.path().join("b.ts"), "x").unwrap();
        let result = audit(temp.path());
        let count = result
            .missing_required
            .iter()
            .filter(|m| *m == "package.json")
            .count();
        assert_eq!(count, 1);
    }
}
