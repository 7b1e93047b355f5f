//! Sync record persistence: on-disk format, degradation, write serialization.

use aiwork::concurrency::PathLockManager;
use aiwork::sync::{check, SyncEntry, SyncRecordStore};
use aiwork::tree::{fingerprint, NodeRecord};
use aiwork::workspace::WorkspacePaths;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
}

fn store(temp: &TempDir, locks: Arc<PathLockManager>) -> SyncRecordStore {
    SyncRecordStore::new(&WorkspacePaths::new(temp.path()), locks).with_clock(fixed_now)
}

#[test]
fn test_persisted_file_format() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp, Arc::new(PathLockManager::new()));
    store
        .record_generation(
            "1:1",
            SyncEntry::new("Card", "abc123abc123abc1", "src/Card.tsx")
                .with_assets(vec!["src/assets/card.png".to_string()]),
        )
        .unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["lastSync"], "2026-03-01T09:30:00Z");
    let node = &raw["nodes"]["1:1"];
    assert_eq!(node["name"], "Card");
    assert_eq!(node["hash"], "abc123abc123abc1");
    assert_eq!(node["generatedFile"], "src/Card.tsx");
    assert_eq!(node["assets"][0], "src/assets/card.png");
    assert!(store.path().ends_with(".aiwork/figma-sync.json"));
}

#[test]
fn test_no_temp_files_left_behind() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp, Arc::new(PathLockManager::new()));
    for i in 0..3 {
        store
            .record_generation(&format!("1:{}", i), SyncEntry::new("n", "0000000000000000", "f.tsx"))
            .unwrap();
    }

    let dir = store.path().parent().unwrap();
    let names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["figma-sync.json".to_string()]);
}

#[test]
fn test_corrupt_snapshot_reads_as_first_sync() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp, Arc::new(PathLockManager::new()));
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "{\"lastSync\": 12, \"nodes\": [").unwrap();

    let tree = NodeRecord::new("1:1", "Card", "FRAME");
    let report = check(&store.load(), &tree);
    assert_eq!(report.added, 1);
    assert_eq!(report.total_changes, 1);
}

#[test]
fn test_generation_then_check_round() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp, Arc::new(PathLockManager::new()));
    let tree = NodeRecord::new("1:1", "Card", "FRAME")
        .with_size(200.0, 100.0)
        .with_children(vec![NodeRecord::new("1:2", "Title", "TEXT").with_text("Hello")]);

    store
        .record_generation("1:1", SyncEntry::new("Card", fingerprint(&tree), "Card.tsx"))
        .unwrap();
    store
        .record_generation(
            "1:2",
            SyncEntry::new("Title", fingerprint(&tree.children[0]), "Title.tsx"),
        )
        .unwrap();
    assert!(!check(&store.load(), &tree).has_changes());

    let mut resized = tree.clone();
    resized.width = 200.4;
    assert!(!check(&store.load(), &resized).has_changes());

    resized.width = 260.0;
    let report = check(&store.load(), &resized);
    assert_eq!(report.modified, 1);
    assert_eq!(report.affected_files, vec!["Card.tsx"]);
}

#[test]
fn test_concurrent_stores_share_locks() {
    let temp = TempDir::new().unwrap();
    let locks = Arc::new(PathLockManager::new());
    let root = temp.path().to_path_buf();

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let locks = locks.clone();
            let root = root.clone();
            thread::spawn(move || {
                let store = SyncRecordStore::new(&WorkspacePaths::new(&root), locks);
                for j in 0..5 {
                    store
                        .record_generation(
                            &format!("{}:{}", i, j),
                            SyncEntry::new("n", "0123456789abcdef", format!("N{}_{}.tsx", i, j)),
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = store(&temp, locks).load();
    assert_eq!(snapshot.entries.len(), 30);
    assert!(snapshot.last_sync.is_some());
}

#[test]
fn test_aliased_roots_serialize_on_one_file() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("sub")).unwrap();
    let locks = Arc::new(PathLockManager::new());
    let files = [
        temp.path().join(".aiwork").join("figma-sync.json"),
        temp.path().join("sub/../.aiwork/figma-sync.json"),
    ];

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let locks = locks.clone();
            let file = files[i % 2].clone();
            thread::spawn(move || {
                let store = SyncRecordStore::at_path(file, locks);
                for j in 0..50 {
                    store
                        .record_generation(
                            &format!("{}:{}", i, j),
                            SyncEntry::new("n", "0123456789abcdef", format!("N{}_{}.tsx", i, j)),
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(locks.tracked_paths(), 1);
    let snapshot = store(&temp, locks).load();
    assert_eq!(snapshot.entries.len(), 200);
}
