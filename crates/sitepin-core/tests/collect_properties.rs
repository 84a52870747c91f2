//! # Asset Collector Properties
//!
//! For arbitrary small directory trees, the collector returns exactly the
//! set of regular files written, each with a relative path that does not
//! carry the root prefix.

use std::collections::BTreeSet;
use std::fs;

use proptest::prelude::*;
use sitepin_core::collect_assets;

/// Relative file paths one to three segments deep, lowercase names only so
/// that file/directory collisions are impossible (files end in `.txt`).
fn tree_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    let segment = "[a-z]{1,6}";
    let file = (prop::collection::vec(segment, 0..3), segment).prop_map(|(dirs, name)| {
        let mut parts = dirs;
        parts.push(format!("{name}.txt"));
        parts.join("/")
    });
    prop::collection::btree_set(file, 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn collector_returns_exactly_the_written_files(paths in tree_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("dist");
        fs::create_dir(&root).unwrap();
        for rel in &paths {
            let full = root.join(rel);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(&full, rel.as_bytes()).unwrap();
        }

        let set = collect_assets(&root).unwrap();
        let collected: BTreeSet<String> =
            set.files().iter().map(|f| f.relative.clone()).collect();

        prop_assert_eq!(&collected, &paths);
        prop_assert_eq!(set.len(), paths.len());
        let root_str = root.to_string_lossy().into_owned();
        for file in set.files() {
            prop_assert!(!file.relative.starts_with('/'));
            prop_assert!(!file.relative.contains(&root_str));
        }
    }
}
