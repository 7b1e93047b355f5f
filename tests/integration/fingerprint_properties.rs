//! Property tests for fingerprints and detection.

use aiwork::sync::{detect_changes, ChangeType, SyncSnapshot};
use aiwork::tree::{fingerprint, walk, NodeRecord};
use chrono::Utc;
use proptest::prelude::*;
use serde_json::Value;

fn leaf(id: String, width: f64, height: f64, text: Option<String>) -> NodeRecord {
    let node = NodeRecord::new(id, "Leaf", if text.is_some() { "TEXT" } else { "RECTANGLE" })
        .with_size(width, height);
    match text {
        Some(t) => node.with_text(t),
        None => node,
    }
}

/// Render `value` as JSON with every object's keys written in reverse order.
fn to_reversed_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .rev()
                .map(|(key, v)| format!("{}:{}", Value::String(key.clone()), to_reversed_json(v)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(to_reversed_json).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

fn tree_strategy() -> impl Strategy<Value = NodeRecord> {
    prop::collection::vec(
        (1.0f64..500.0, 1.0f64..500.0, prop::option::of("[a-zA-Z ]{0,12}")),
        1..8,
    )
    .prop_map(|leaves| {
        let children = leaves
            .into_iter()
            .enumerate()
            .map(|(i, (w, h, text))| leaf(format!("2:{}", i), w, h, text))
            .collect();
        NodeRecord::new("1:1", "Root", "FRAME")
            .with_size(640.0, 480.0)
            .with_children(children)
    })
}

proptest! {
    #[test]
    fn fingerprint_is_deterministic(tree in tree_strategy()) {
        prop_assert_eq!(fingerprint(&tree), fingerprint(&tree.clone()));
    }

    #[test]
    fn fingerprint_survives_json_round_trip(tree in tree_strategy()) {
        let json = serde_json::to_string(&tree).unwrap();
        let reparsed: NodeRecord = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(fingerprint(&tree), fingerprint(&reparsed));
    }

    #[test]
    fn fingerprint_ignores_key_order(tree in tree_strategy()) {
        let value = serde_json::to_value(&tree).unwrap();
        let reordered: NodeRecord = serde_json::from_str(&to_reversed_json(&value)).unwrap();
        prop_assert_eq!(fingerprint(&tree), fingerprint(&reordered));
    }

    #[test]
    fn subpixel_jitter_is_ignored(w in 1i32..1000, h in 1i32..1000, dw in -0.49f64..0.49, dh in -0.49f64..0.49) {
        let a = NodeRecord::new("1:1", "A", "FRAME").with_size(w as f64, h as f64);
        let b = NodeRecord::new("1:1", "A", "FRAME").with_size(w as f64 + dw, h as f64 + dh);
        prop_assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn first_sync_adds_every_node(tree in tree_strategy()) {
        let changes = detect_changes(&SyncSnapshot::empty(), &tree);
        prop_assert_eq!(changes.len(), walk::count_nodes(&tree));
        prop_assert!(changes.iter().all(|c| c.change_type == ChangeType::Added));
    }

    #[test]
    fn own_snapshot_has_no_changes(tree in tree_strategy()) {
        let snapshot = SyncSnapshot::from_tree(&tree, "Root.tsx", Utc::now());
        prop_assert!(detect_changes(&snapshot, &tree).is_empty());
    }

    #[test]
    fn swapping_distinct_children_changes_root(tree in tree_strategy()) {
        prop_assume!(tree.children.len() >= 2);
        let mut swapped = tree.clone();
        swapped.children.swap(0, 1);
        prop_assume!(fingerprint(&tree.children[0]) != fingerprint(&tree.children[1]));
        prop_assert_ne!(fingerprint(&tree), fingerprint(&swapped));
    }
}

#[test]
fn test_plugin_payload_key_order_is_irrelevant() {
    let forward = r#"{
        "id": "10:1", "name": "Badge", "type": "TEXT", "width": 64.2, "height": 20,
        "fills": [{"type": "SOLID", "visible": true, "opacity": 1,
                   "color": {"r": 0.1, "g": 0.2, "b": 0.3, "a": 1}}],
        "effects": [{"type": "DROP_SHADOW", "visible": true, "radius": 4,
                     "color": {"r": 0, "g": 0, "b": 0, "a": 0.25},
                     "offset": {"x": 0, "y": 2}, "spread": 0}],
        "cornerRadius": "mixed", "topLeftRadius": 4, "topRightRadius": 4,
        "bottomRightRadius": 0, "bottomLeftRadius": 0,
        "characters": "New", "fontSize": 12,
        "fontName": {"family": "Inter", "style": "Bold"},
        "children": []
    }"#;
    let backward = r#"{
        "children": [],
        "fontName": {"style": "Bold", "family": "Inter"},
        "fontSize": 12, "characters": "New",
        "bottomLeftRadius": 0, "bottomRightRadius": 0,
        "topRightRadius": 4, "topLeftRadius": 4, "cornerRadius": "mixed",
        "effects": [{"spread": 0, "offset": {"y": 2, "x": 0},
                     "color": {"a": 0.25, "b": 0, "g": 0, "r": 0},
                     "radius": 4, "visible": true, "type": "DROP_SHADOW"}],
        "fills": [{"color": {"a": 1, "b": 0.3, "g": 0.2, "r": 0.1},
                   "opacity": 1, "visible": true, "type": "SOLID"}],
        "height": 20, "width": 64.2, "type": "TEXT", "name": "Badge", "id": "10:1"
    }"#;

    let a: NodeRecord = serde_json::from_str(forward).unwrap();
    let b: NodeRecord = serde_json::from_str(backward).unwrap();
    assert_eq!(fingerprint(&a), fingerprint(&b));

    let restyled = backward.replace(r#""style": "Bold""#, r#""style": "Regular""#);
    let c: NodeRecord = serde_json::from_str(&restyled).unwrap();
    assert_ne!(fingerprint(&a), fingerprint(&c));
}
