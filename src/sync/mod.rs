//! Incremental sync: snapshot persistence and change detection.

pub mod detect;
pub mod snapshot;
pub mod store;

pub use detect::{check, detect_changes, ChangeRecord, ChangeReport, ChangeType};
pub use snapshot::{SyncEntry, SyncSnapshot};
pub use store::{SyncRecordStore, SyncStatus, TrackedNode};
