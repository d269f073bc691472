//! End-to-end audits against a scaffolded compliant tree

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use aicheck::audit::{data_layout, docs, structure};
use aicheck::catalog::{REQUIRED_DIRS, REQUIRED_DOCS, REQUIRED_FILES};
use aicheck::validate::SchemaCache;

/// Build a tree that satisfies structure, docs, and data layout.
fn scaffold_compliant(root: &Path) {
    for dir in REQUIRED_DIRS {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    for file in REQUIRED_FILES {
        if *file != "README.md" {
            fs::write(root.join(file), "placeholder: true\n").unwrap();
        }
    }
    fs::create_dir_all(root.join("docs")).unwrap();
    for doc in REQUIRED_DOCS {
        fs::write(root.join(doc), "# doc\n").unwrap();
    }
    let readme: String = REQUIRED_DOCS
        .iter()
        .map(|doc| format!("- [{}]({})\n", doc, doc))
        .collect();
    fs::write(root.join("README.md"), readme).unwrap();
    fs::write(
        root.join("data/outputs/run1.json"),
        r#"{"run_id": "r1", "model": "gpt-4", "prompt_id": "p1",
            "timestamp": "2024-06-01T12:00:00Z"}"#,
    )
    .unwrap();
}

#[test]
fn fully_compliant_tree_passes_every_auditor() {
    let temp = TempDir::new().unwrap();
    scaffold_compliant(temp.path());

    let structure_result = structure::audit(temp.path());
    assert!(structure_result.is_compliant(), "{}", structure_result.to_report());

    let docs_result = docs::audit(temp.path());
    assert!(docs_result.is_compliant(), "{}", docs_result.to_report());

    let mut cache = SchemaCache::new(4);
    let data_result =
        data_layout::audit(temp.path(), &data_layout::DataAuditOptions::default(), &mut cache);
    assert!(data_result.is_compliant(), "{}", data_result.to_report());
}

#[test]
fn compliance_flag_matches_in_json_and_human_renderings() {
    let temp = TempDir::new().unwrap();
    scaffold_compliant(temp.path());

    let result = structure::audit(temp.path());
    let payload = result.to_json();
    assert_eq!(payload["is_compliant"], serde_json::json!(true));
    assert!(result.to_report().contains("✅ Project matches core AI structure."));
}

#[test]
fn removing_one_required_file_flips_compliance_and_names_it() {
    let temp = TempDir::new().unwrap();
    scaffold_compliant(temp.path());
    fs::remove_file(temp.path().join("config/models.yaml")).unwrap();

    let result = structure::audit(temp.path());
    assert!(!result.is_compliant());

    let payload = result.to_json();
    assert_eq!(payload["is_compliant"], serde_json::json!(false));
    let missing: Vec<String> = payload["missing_files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(missing, vec!["config/models.yaml"]);
    assert!(result.to_report().contains("config/models.yaml"));
    assert!(result.to_report().contains("❌"));
}

#[test]
fn auditors_are_idempotent_on_unchanged_trees() {
    let temp = TempDir::new().unwrap();
    scaffold_compliant(temp.path());
    // introduce some non-compliance so the reports carry content
    fs::write(temp.path().join("data/outputs/bad.json"), "{}").unwrap();
    fs::create_dir_all(temp.path().join("data/scratch")).unwrap();

    let mut cache = SchemaCache::new(4);
    let options = data_layout::DataAuditOptions::default();
    let first = serde_json::to_string_pretty(
        &data_layout::audit(temp.path(), &options, &mut cache).to_json(),
    )
    .unwrap();
    let second = serde_json::to_string_pretty(
        &data_layout::audit(temp.path(), &options, &mut cache).to_json(),
    )
    .unwrap();
    assert_eq!(first, second);

    let structure_first = serde_json::to_string(&structure::audit(temp.path()).to_json()).unwrap();
    let structure_second = serde_json::to_string(&structure::audit(temp.path()).to_json()).unwrap();
    assert_eq!(structure_first, structure_second);
}

#[test]
fn empty_root_reports_all_expected_paths_in_input_order() {
    let temp = TempDir::new().unwrap();
    let expected: Vec<String> = REQUIRED_DIRS.iter().map(|s| s.to_string()).collect();
    assert_eq!(aicheck::find_missing(temp.path(), REQUIRED_DIRS), expected);
}
