//! Exported design assets (icons, images, vectors) and writing them to disk.

use crate::error::StorageError;
use crate::types::NodeId;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Icon,
    Vector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFormat {
    Png,
    Jpg,
    Svg,
    Webp,
}

impl AssetFormat {
    /// SVG payloads travel as markup; every other format is base64 encoded.
    pub fn is_text(self) -> bool {
        matches!(self, AssetFormat::Svg)
    }

    pub fn extension(self) -> &'static str {
        match self {
            AssetFormat::Png => "png",
            AssetFormat::Jpg => "jpg",
            AssetFormat::Svg => "svg",
            AssetFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Intended render size of an asset in the design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetUsage {
    pub width: f64,
    pub height: f64,
}

/// One asset exported by the plugin alongside a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetExport {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub node_id: NodeId,
    pub node_name: String,
    pub format: AssetFormat,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<AssetUsage>,
}

impl AssetExport {
    /// Decode the payload into the bytes that belong on disk.
    pub fn decode(&self) -> Result<Vec<u8>, StorageError> {
        if self.format.is_text() {
            return Ok(self.data.as_bytes().to_vec());
        }
        STANDARD
            .decode(self.data.trim())
            .map_err(|e| StorageError::InvalidAsset {
                node_id: self.node_id.clone(),
                reason: format!("invalid base64 payload: {}", e),
            })
    }
}

/// Find the first exported asset belonging to `node_id`.
pub fn find_asset<'a>(assets: &'a [AssetExport], node_id: &str) -> Option<&'a AssetExport> {
    assets.iter().find(|a| a.node_id == node_id)
}

/// Write `asset` to `path`, creating parent directories as needed.
///
/// The payload is decoded before anything touches the filesystem, so an invalid
/// payload never leaves a partial file behind.
pub fn write_asset(asset: &AssetExport, path: &Path) -> Result<PathBuf, StorageError> {
    let bytes = asset.decode()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StorageError::at(parent, e))?;
        }
    }
    fs::write(path, &bytes).map_err(|e| StorageError::at(path, e))?;

    info!(
        node_id = %asset.node_id,
        format = %asset.format,
        bytes = bytes.len(),
        path = %path.display(),
        "Asset written"
    );
    Ok(path.to_path_buf())
}
