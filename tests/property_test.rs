//! Property-based tests for the engine primitives

use std::collections::BTreeMap;

use proptest::prelude::*;
use tempfile::TempDir;

use aicheck::merge::{merge, PrecedenceSource};

fn rel_path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z][a-z0-9]{0,7}", 1..4).prop_map(|segments| segments.join("/"))
}

proptest! {
    /// Against an empty root, every expected path is missing, in input order.
    #[test]
    fn find_missing_on_empty_root_returns_input(paths in proptest::collection::vec(rel_path_strategy(), 0..12)) {
        let temp = TempDir::new().unwrap();
        let missing = aicheck::find_missing(temp.path(), paths.iter());
        prop_assert_eq!(missing, paths);
    }

    /// Paths created on disk are never reported missing.
    #[test]
    fn find_missing_never_reports_existing(paths in proptest::collection::btree_set(rel_path_strategy(), 0..8)) {
        let temp = TempDir::new().unwrap();
        for rel in &paths {
            std::fs::create_dir_all(temp.path().join(rel)).unwrap();
        }
        let paths: Vec<String> = paths.into_iter().collect();
        let missing = aicheck::find_missing(temp.path(), paths.iter());
        prop_assert!(missing.is_empty());
    }

    /// Every merged value equals the value of the last source defining the key,
    /// and provenance always names that source.
    #[test]
    fn merge_is_last_writer_wins(
        layers in proptest::collection::vec(
            proptest::collection::btree_map("[a-e]", any::<i64>(), 0..6),
            1..5,
        )
    ) {
        let sources: Vec<PrecedenceSource> = layers
            .iter()
            .enumerate()
            .map(|(i, mapping)| {
                let mapping: BTreeMap<String, serde_json::Value> = mapping
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::json!(v)))
                    .collect();
                PrecedenceSource::new(&format!("layer{}", i), mapping)
            })
            .collect();

        let report = merge(&sources);

        for (key, value) in &report.merged {
            let last = sources
                .iter()
                .rev()
                .find(|s| s.mapping.contains_key(key))
                .expect("merged key must come from some source");
            prop_assert_eq!(value, &last.mapping[key]);
            prop_assert_eq!(&report.source_by_key[key], &last.name);

            let writers = sources.iter().filter(|s| s.mapping.contains_key(key)).count();
            if writers > 1 {
                prop_assert_eq!(report.overrides[key].len(), writers);
            } else {
                prop_assert!(!report.overrides.contains_key(key));
            }
        }

        // merged covers exactly the union of keys
        let union: usize = {
            let mut keys = std::collections::BTreeSet::new();
            for s in &sources {
                keys.extend(s.mapping.keys().cloned());
            }
            keys.len()
        };
        prop_assert_eq!(report.merged.len(), union);
    }

    /// Merging is idempotent: re-merging the merged map as a single source
    /// reproduces it.
    #[test]
    fn merge_of_merged_is_identity(
        mapping in proptest::collection::btree_map("[a-e]", any::<i64>(), 0..8)
    ) {
        let mapping: BTreeMap<String, serde_json::Value> = mapping
            .into_iter()
            .map(|(k, v)| (k, serde_json::json!(v)))
            .collect();
        let once = merge(&[PrecedenceSource::new("only", mapping.clone())]);
        prop_assert_eq!(once.merged, mapping);
        prop_assert!(once.overrides.is_empty());
    }
}
