//! Atomic JSON persistence: write to a sibling temp file, then rename over the target.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Per-process write sequence; keeps concurrent writers off each other's temp file.
static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    let sequence = TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    name.push(format!(".{}.{}.tmp", std::process::id(), sequence));
    path.with_file_name(name)
}

fn discard_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
        }
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// Readers observe either the previous file or the complete new one.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StorageError::at(parent, e))?;
        }
    }

    let temp_path = temp_path_for(path);
    let file = fs::File::create(&temp_path).map_err(|e| StorageError::at(&temp_path, e))?;
    let mut writer = BufWriter::new(file);
    let written = serde_json::to_writer_pretty(&mut writer, value)
        .map_err(StorageError::from)
        .and_then(|_| writer.flush().map_err(|e| StorageError::at(&temp_path, e)))
        .and_then(|_| {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| StorageError::at(&temp_path, e))
        });

    if let Err(e) = written {
        discard_temp(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        discard_temp(&temp_path);
        StorageError::at(path, e)
    })
}

/// Read JSON from `path`, treating a missing or unparsable file as absent.
pub fn read_json_lenient<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read state file, treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Corrupt state file, treating as absent");
            None
        }
    }
}
