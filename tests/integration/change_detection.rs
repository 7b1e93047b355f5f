//! Change detection against snapshots, including snapshots read from disk.

use aiwork::sync::{check, detect_changes, ChangeType, SyncEntry, SyncSnapshot};
use aiwork::tree::{fingerprint, fingerprint_tree, NodeRecord};
use chrono::Utc;
use serde_json::json;

fn card(title: &str) -> NodeRecord {
    NodeRecord::new("1:1", "Card", "FRAME")
        .with_size(320.0, 200.0)
        .with_children(vec![
            NodeRecord::new("1:2", "Title", "TEXT")
                .with_size(120.0, 24.0)
                .with_text(title),
            NodeRecord::new("1:4", "Divider", "RECTANGLE").with_size(320.0, 1.0),
        ])
}

#[test]
fn test_first_sync_adds_every_node() {
    let tree = card("Hello");
    let changes = detect_changes(&SyncSnapshot::empty(), &tree);

    assert_eq!(changes.len(), 3);
    assert!(changes.iter().all(|c| c.change_type == ChangeType::Added));
    assert!(changes.iter().all(|c| c.affected_files.is_empty()));
    assert!(changes.iter().all(|c| c.old_fingerprint.is_none()));
    let ids: Vec<&str> = changes.iter().map(|c| c.node_id.as_str()).collect();
    assert_eq!(ids, vec!["1:1", "1:2", "1:4"]);
}

#[test]
fn test_snapshot_of_same_tree_reports_nothing() {
    let tree = card("Hello");
    let snapshot = SyncSnapshot::from_tree(&tree, "Card.tsx", Utc::now());
    assert!(detect_changes(&snapshot, &tree).is_empty());
}

#[test]
fn test_text_edit_modifies_leaf_and_root() {
    let snapshot = SyncSnapshot::from_tree(&card("Hello"), "Card.tsx", Utc::now());
    let changes = detect_changes(&snapshot, &card("World"));

    let mut modified: Vec<&str> = changes
        .iter()
        .filter(|c| c.change_type == ChangeType::Modified)
        .map(|c| c.node_id.as_str())
        .collect();
    modified.sort();
    assert_eq!(modified, vec!["1:1", "1:2"]);
    assert_eq!(changes.len(), 2);

    let leaf = changes.iter().find(|c| c.node_id == "1:2").unwrap();
    assert_eq!(leaf.old_fingerprint, snapshot.get("1:2").map(|e| e.fingerprint.clone()));
    assert_eq!(leaf.new_fingerprint, Some(fingerprint(&card("World").children[0])));
}

#[test]
fn test_deleted_node_lists_file_and_assets() {
    let tree = card("Hello");
    let mut snapshot = SyncSnapshot::from_tree(&tree, "Card.tsx", Utc::now());
    snapshot.upsert(
        "9:9",
        SyncEntry::new("Avatar", "0011223344556677", "Avatar.tsx")
            .with_assets(vec!["assets/avatar.png".to_string(), "assets/avatar@2x.png".to_string()]),
    );

    let changes = detect_changes(&snapshot, &tree);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].change_type, ChangeType::Deleted);
    assert_eq!(changes[0].node_id, "9:9");
    assert_eq!(
        changes[0].affected_files,
        vec!["Avatar.tsx", "assets/avatar.png", "assets/avatar@2x.png"]
    );
    assert!(changes[0].new_fingerprint.is_none());
}

#[test]
fn test_removed_subtree_does_not_recurse_into_untracked_children() {
    let tree = card("Hello");
    let mut snapshot = SyncSnapshot::empty();
    // Only the removed parent was ever generated; its former children were not.
    snapshot.upsert("5:1", SyncEntry::new("List", "aaaaaaaaaaaaaaaa", "List.tsx"));
    for (id, fp) in fingerprint_tree(&tree) {
        snapshot.upsert(id, SyncEntry::new("n", fp, "Card.tsx"));
    }

    let report = check(&snapshot, &tree);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.total_changes, 1);
    assert_eq!(report.affected_files, vec!["List.tsx"]);
}

#[test]
fn test_end_to_end_unchanged_root_with_new_child() {
    let tree = NodeRecord::new("1:1", "Card", "FRAME")
        .with_size(100.0, 40.0)
        .with_children(vec![NodeRecord::new("1:3", "Badge", "FRAME")]);

    // Stored hash matches what the current root recomputes to.
    let stored = json!({
        "lastSync": "2026-01-01T00:00:00Z",
        "nodes": {
            "1:1": {
                "name": "Card",
                "hash": fingerprint(&tree),
                "generatedFile": "Card.tsx",
                "assets": []
            }
        }
    });
    let snapshot: SyncSnapshot = serde_json::from_value(stored).unwrap();

    let report = check(&snapshot, &tree);
    assert_eq!(report.modified, 0);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.added, 1);
    assert_eq!(report.changes[0].node_id, "1:3");
    assert!(report.affected_files.is_empty());
}

#[test]
fn test_reparented_node_is_only_modified_in_its_parents() {
    let before = NodeRecord::new("1:1", "Screen", "FRAME").with_children(vec![
        NodeRecord::new("2:1", "Left", "FRAME")
            .with_children(vec![NodeRecord::new("3:1", "Icon", "VECTOR").with_size(16.0, 16.0)]),
        NodeRecord::new("2:2", "Right", "FRAME"),
    ]);
    let after = NodeRecord::new("1:1", "Screen", "FRAME").with_children(vec![
        NodeRecord::new("2:1", "Left", "FRAME"),
        NodeRecord::new("2:2", "Right", "FRAME")
            .with_children(vec![NodeRecord::new("3:1", "Icon", "VECTOR").with_size(16.0, 16.0)]),
    ]);

    let snapshot = SyncSnapshot::from_tree(&before, "Screen.tsx", Utc::now());
    let report = check(&snapshot, &after);

    let ids: Vec<&str> = report.changes.iter().map(|c| c.node_id.as_str()).collect();
    assert!(!ids.contains(&"3:1"));
    assert_eq!(report.added + report.deleted, 0);
    assert_eq!(ids, vec!["1:1", "2:1", "2:2"]);
}

#[test]
fn test_report_order_and_dedup() {
    let mut tree = card("World");
    tree.children.push(NodeRecord::new("1:9", "New", "FRAME"));
    let mut snapshot = SyncSnapshot::from_tree(&card("Hello"), "Card.tsx", Utc::now());
    snapshot.upsert("0:9", SyncEntry::new("Old", "ffffffffffffffff", "Card.tsx"));

    let report = check(&snapshot, &tree);
    let kinds: Vec<ChangeType> = report.changes.iter().map(|c| c.change_type).collect();
    let first_modified = kinds.iter().position(|k| *k == ChangeType::Modified).unwrap();
    let first_added = kinds.iter().position(|k| *k == ChangeType::Added).unwrap();
    assert_eq!(kinds[0], ChangeType::Deleted);
    assert!(first_modified < first_added);
    assert_eq!(report.affected_files, vec!["Card.tsx"]);
    assert_eq!(report.total_changes, report.changes.len());
}
