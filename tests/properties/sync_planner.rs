//! Property tests for content sync planning.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use proptest::prelude::*;

use edgesite::domain::ports::{LocalObject, RemoteObject};
use edgesite::domain::services::{ObjectAction, Planner};
use edgesite::domain::value_objects::ContentHash;

fn key() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-c]{1,2}(/[a-c]{1,2}){0,2}\\.(html|css)").unwrap()
}

/// Key to body, small alphabet so local and remote overlap often
fn tree() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map(key(), "[xy]{0,3}", 0..10)
}

fn local(tree: &BTreeMap<String, String>) -> Vec<LocalObject> {
    tree.iter()
        .map(|(key, body)| LocalObject {
            key: key.clone(),
            path: PathBuf::from("/site").join(key),
            hash: ContentHash::from_bytes(body.as_bytes()),
            size: body.len() as u64,
            content_type: "text/html".to_string(),
        })
        .collect()
}

fn remote(tree: &BTreeMap<String, String>) -> Vec<RemoteObject> {
    tree.iter()
        .map(|(key, body)| RemoteObject {
            key: key.clone(),
            hash: ContentHash::from_bytes(body.as_bytes()),
            size: body.len() as u64,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every local key is either written or already unchanged, never both.
    #[test]
    fn property_local_keys_are_covered(local_tree in tree(), remote_tree in tree()) {
        let plan = Planner::plan(&local(&local_tree), &remote(&remote_tree));

        let written: BTreeSet<&str> = plan.writes().map(|o| o.key.as_str()).collect();
        let unchanged: BTreeSet<&str> = plan
            .objects
            .iter()
            .filter(|o| o.action == ObjectAction::Unchanged)
            .map(|o| o.key.as_str())
            .collect();

        prop_assert!(written.is_disjoint(&unchanged));
        let covered: BTreeSet<&str> = written.union(&unchanged).copied().collect();
        let expected: BTreeSet<&str> = local_tree.keys().map(String::as_str).collect();
        prop_assert_eq!(covered, expected);
    }

    /// PROPERTY: Deletions are exactly the keys that exist only remotely.
    #[test]
    fn property_deletions_are_remote_only_keys(local_tree in tree(), remote_tree in tree()) {
        let plan = Planner::plan(&local(&local_tree), &remote(&remote_tree));

        let deleted: Vec<&str> = plan.deletions().map(|o| o.key.as_str()).collect();
        let expected: Vec<&str> = remote_tree
            .keys()
            .filter(|k| !local_tree.contains_key(*k))
            .map(String::as_str)
            .collect();
        prop_assert_eq!(deleted, expected);
    }

    /// PROPERTY: Uploads and updates are split by remote presence and content.
    #[test]
    fn property_write_actions_match_remote(local_tree in tree(), remote_tree in tree()) {
        let plan = Planner::plan(&local(&local_tree), &remote(&remote_tree));

        for object in plan.writes() {
            match remote_tree.get(&object.key) {
                None => prop_assert_eq!(object.action, ObjectAction::Upload),
                Some(body) => {
                    prop_assert_ne!(body, &local_tree[&object.key]);
                    prop_assert_eq!(object.action, ObjectAction::Update);
                }
            }
            prop_assert!(object.local.is_some());
        }
    }

    /// PROPERTY: Writes come before deletions.
    #[test]
    fn property_writes_precede_deletions(local_tree in tree(), remote_tree in tree()) {
        let plan = Planner::plan(&local(&local_tree), &remote(&remote_tree));

        let first_delete = plan
            .objects
            .iter()
            .position(|o| o.action == ObjectAction::Delete)
            .unwrap_or(plan.objects.len());
        prop_assert!(plan.objects[first_delete..]
            .iter()
            .all(|o| o.action == ObjectAction::Delete));
    }

    /// PROPERTY: Syncing a tree onto an identical bucket changes nothing.
    #[test]
    fn property_identical_tree_is_noop(tree in tree()) {
        let plan = Planner::plan(&local(&tree), &remote(&tree));

        prop_assert!(plan.is_noop());
        prop_assert_eq!(plan.unchanged_count(), tree.len());
    }
}
