//! Path-set matching and bounded tree scanning
//!
//! `find_missing` answers "which expected paths are absent" with read-only
//! stat calls. `scan` walks a tree under a [`ScanPolicy`], pruning ignored
//! subtrees and yielding candidate files for content inspection. Both are
//! stateless; every call recomputes from the filesystem.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::finding::Finding;

/// Return the subset of `expected` relative paths that do not exist under
/// `root`, preserving input order. A nonexistent root reports everything
/// missing.
pub fn find_missing<I, S>(root: &Path, expected: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut missing = Vec::new();
    for rel in expected {
        let rel = rel.as_ref();
        if !root.join(rel).exists() {
            missing.push(rel.to_string());
        }
    }
    missing
}

/// Like [`find_missing`], but an existing non-directory also counts missing.
pub fn find_missing_dirs<I, S>(root: &Path, expected: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut missing = Vec::new();
    for rel in expected {
        let rel = rel.as_ref();
        let path = root.join(rel);
        if !path.exists() || !path.is_dir() {
            missing.push(rel.to_string());
        }
    }
    missing
}

/// Path relative to `root` rendered with forward slashes.
pub fn rel_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Configuration bundle for one tree scan.
#[derive(Debug, Clone)]
pub struct ScanPolicy {
    /// Path segments (directory or file names) excluding a whole subtree
    pub ignore_dirs: Vec<String>,
    /// Dot-prefixed suffixes eligible for content scanning, e.g. `.py`
    pub extensions: Vec<String>,
    /// Files larger than this are silently excluded (skip, not violation)
    pub max_file_size: Option<u64>,
    /// Stop after this many yielded files, disclosing the truncation
    pub max_files: Option<usize>,
}

impl ScanPolicy {
    pub fn new(ignore_dirs: &[&str], extensions: &[&str]) -> Self {
        ScanPolicy {
            ignore_dirs: ignore_dirs.iter().map(|s| s.to_string()).collect(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
            max_file_size: None,
            max_files: None,
        }
    }

    pub fn with_max_file_size(mut self, max: Option<u64>) -> Self {
        self.max_file_size = max;
        self
    }

    pub fn with_max_files(mut self, max: Option<usize>) -> Self {
        self.max_files = max;
        self
    }

    fn matches_extension(&self, name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}

/// One event from a tree scan: a candidate file, or a disclosed problem.
#[derive(Debug)]
pub enum ScanEvent {
    /// A regular file matching the policy's extension set
    File(PathBuf),
    /// A stat/walk failure or truncation notice; never silently dropped
    Issue(Finding),
}

/// Walk `root` under `policy`, yielding [`ScanEvent`]s in name-sorted order.
///
/// Ignoring is subtree-wide: once a segment matches the ignore set nothing
/// beneath it is visited, including nested reuses of allowed names. The
/// sequence is finite and recomputed fresh on every call.
pub fn scan<'a>(root: &'a Path, policy: &'a ScanPolicy) -> Scan<'a> {
    let ignore = policy.ignore_dirs.clone();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e: &DirEntry| {
            e.depth() == 0
                || !ignore
                    .iter()
                    .any(|d| e.file_name().to_string_lossy() == d.as_str())
        });
    Scan {
        root,
        policy,
        walker: Box::new(walker),
        yielded: 0,
        done: false,
    }
}

/// Lazy scan iterator; see [`scan`].
pub struct Scan<'a> {
    root: &'a Path,
    policy: &'a ScanPolicy,
    walker: Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + 'a>,
    yielded: usize,
    done: bool,
}

impl Iterator for Scan<'_> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        if self.done {
            return None;
        }
        loop {
            if let Some(cap) = self.policy.max_files {
                if self.yielded >= cap {
                    self.done = true;
                    return Some(ScanEvent::Issue(Finding::file_level(
                        &self.root.to_string_lossy(),
                        &format!(
                            "scan truncated at {} files; rerun without a file cap for full coverage",
                            cap
                        ),
                    )));
                }
            }

            let entry = match self.walker.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(err)) => {
                    let path = err
                        .path()
                        .map(|p| rel_display(self.root, p))
                        .unwrap_or_else(|| self.root.to_string_lossy().to_string());
                    return Some(ScanEvent::Issue(Finding::file_level(
                        &path,
                        &format!("Unable to stat file for scanning: {}", err),
                    )));
                }
                Some(Ok(entry)) => entry,
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if !self.policy.matches_extension(&name) {
                continue;
            }
            if let Some(max) = self.policy.max_file_size {
                match entry.metadata() {
                    Ok(md) => {
                        if md.len() > max {
                            continue;
                        }
                    }
                    Err(err) => {
                        let path = rel_display(self.root, entry.path());
                        return Some(ScanEvent::Issue(Finding::file_level(
                            &path,
                            &format!("Unable to stat file for scanning: {}", err),
                        )));
                    }
                }
            }
            self.yielded += 1;
            return Some(ScanEvent::File(entry.into_path()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "x = 1\n").unwrap();
    }

    #[test]
    fn test_find_missing_empty_root() {
        let temp = TempDir::new().unwrap();
        let expected = ["config", "data/raw", "README.md"];
        let missing = find_missing(temp.path(), expected);
        assert_eq!(missing, vec!["config", "data/raw", "README.md"]);
    }

    #[test]
    fn test_find_missing_all_present() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("config")).unwrap();
        fs::write(temp.path().join("README.md"), "# hi").unwrap();
        let missing = find_missing(temp.path(), ["config", "README.md"]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_find_missing_dirs_rejects_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tests"), "not a dir").unwrap();
        let missing = find_missing_dirs(temp.path(), ["tests"]);
        assert_eq!(missing, vec!["tests"]);
    }

    #[test]
    fn test_scan_skips_ignored_subtrees() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("src/app.py"));
        touch(&temp.path().join("node_modules/pkg/index.js"));
        touch(&temp.path().join("src/node_modules/other.py"));

        let policy = ScanPolicy::new(&["node_modules"], &[".py", ".js"]);
        let files: Vec<_> = scan(temp.path(), &policy)
            .filter_map(|ev| match ev {
                ScanEvent::File(p) => Some(rel_display(temp.path(), &p)),
                ScanEvent::Issue(_) => None,
            })
            .collect();
        assert_eq!(files, vec!["src/app.py"]);
    }

    #[test]
    fn test_scan_extension_filter() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a.py"));
        touch(&temp.path().join("b.rs"));
        let policy = ScanPolicy::new(&[], &[".py"]);
        let files: Vec<_> = scan(temp.path(), &policy)
            .filter_map(|ev| match ev {
                ScanEvent::File(p) => Some(p),
                ScanEvent::Issue(_) => None,
            })
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.py"));
    }

    #[test]
    fn test_scan_size_cap_skips_silently() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.py"), "x".repeat(100)).unwrap();
        fs::write(temp.path().join("small.py"), "x").unwrap();
        let policy = ScanPolicy::new(&[], &[".py"]).with_max_file_size(Some(10));
        let events: Vec<_> = scan(temp.path(), &policy).collect();
        let files = events
            .iter()
            .filter(|ev| matches!(ev, ScanEvent::File(_)))
            .count();
        let issues = events
            .iter()
            .filter(|ev| matches!(ev, ScanEvent::Issue(_)))
            .count();
        assert_eq!(files, 1);
        assert_eq!(issues, 0, "size skip must not produce an issue");
    }

    #[test]
    fn test_scan_file_cap_discloses_truncation() {
        let temp = TempDir::new().unwrap();
        for i in 0..5 {
            touch(&temp.path().join(format!("f{}.py", i)));
        }
        let policy = ScanPolicy::new(&[], &[".py"]).with_max_files(Some(3));
        let events: Vec<_> = scan(temp.path(), &policy).collect();
        let files = events
            .iter()
            .filter(|ev| matches!(ev, ScanEvent::File(_)))
            .count();
        let truncations: Vec<_> = events
            .iter()
            .filter_map(|ev| match ev {
                ScanEvent::Issue(f) => Some(f.message.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(files, 3);
        assert_eq!(truncations.len(), 1);
        assert!(truncations[0].contains("truncated at 3 files"));
    }

    #[test]
    fn test_scan_deterministic_order() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("b.py"));
        touch(&temp.path().join("a.py"));
        touch(&temp.path().join("c.py"));
        let policy = ScanPolicy::new(&[], &[".py"]);
        let first: Vec<_> = scan(temp.path(), &policy)
            .filter_map(|ev| match ev {
                ScanEvent::File(p) => Some(p),
                _ => None,
            })
            .collect();
        let second: Vec<_> = scan(temp.path(), &policy)
            .filter_map(|ev| match ev {
                ScanEvent::File(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(first, second);
    }
}
