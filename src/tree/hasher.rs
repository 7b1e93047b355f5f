//! Content fingerprints for design nodes
//!
//! A fingerprint covers a fixed list of visually significant fields plus the
//! fingerprints of the node's children in child order. Fields are serialized
//! through a fixed-layout struct so the digest never depends on key insertion order.

use crate::tree::node::{Effect, FontName, MaybeMixed, NodeRecord, Paint};
use crate::types::{Fingerprint, FingerprintMap, FINGERPRINT_BYTES};
use serde::Serialize;
use tracing::error;

/// Corner radius as it participates in the fingerprint.
#[derive(Serialize)]
#[serde(tag = "kind", content = "value")]
enum CornerSignature {
    Uniform(f64),
    /// Mixed corners: top-left, top-right, bottom-right, bottom-left
    Mixed([Option<f64>; 4]),
}

/// Fixed field list hashed for one node.
#[derive(Serialize)]
struct SignificantFields<'a> {
    node_type: &'a str,
    width: i64,
    height: i64,
    layout_mode: Option<&'a str>,
    fills: Option<&'a [Paint]>,
    strokes: Option<&'a [Paint]>,
    effects: Option<&'a [Effect]>,
    corner_radius: Option<CornerSignature>,
    characters: Option<&'a str>,
    font_size: Option<&'a MaybeMixed<f64>>,
    font_name: Option<&'a MaybeMixed<FontName>>,
    children: &'a [Fingerprint],
}

fn corner_signature(node: &NodeRecord) -> Option<CornerSignature> {
    match node.corner_radius.as_ref()? {
        MaybeMixed::Concrete(radius) => Some(CornerSignature::Uniform(*radius)),
        MaybeMixed::Mixed => Some(CornerSignature::Mixed([
            node.top_left_radius,
            node.top_right_radius,
            node.bottom_right_radius,
            node.bottom_left_radius,
        ])),
    }
}

/// Round a dimension to whole pixels so sub-pixel jitter does not register.
fn round_dimension(value: f64) -> i64 {
    value.round() as i64
}

fn digest_node(node: &NodeRecord, child_fingerprints: &[Fingerprint]) -> Fingerprint {
    let fields = SignificantFields {
        node_type: &node.node_type,
        width: round_dimension(node.width),
        height: round_dimension(node.height),
        layout_mode: node.layout_mode.as_deref(),
        fills: node.fills.as_deref(),
        strokes: node.strokes.as_deref(),
        effects: node.effects.as_deref(),
        corner_radius: corner_signature(node),
        characters: node.characters.as_deref(),
        font_size: node.font_size.as_ref(),
        font_name: node.font_name.as_ref(),
        children: child_fingerprints,
    };

    let mut hasher = blake3::Hasher::new();
    if let Err(e) = serde_json::to_writer(&mut hasher, &fields) {
        // Unreachable for these field types; fall back to the node id so distinct
        // nodes still get distinct fingerprints.
        error!(node_id = %node.id, error = %e, "Failed to serialize fingerprint fields");
        hasher.update(node.id.as_bytes());
    }
    let hash = hasher.finalize();
    hex::encode(&hash.as_bytes()[..FINGERPRINT_BYTES])
}

/// Fingerprint a node subtree, recording every descendant's fingerprint in `out`.
fn fingerprint_into(node: &NodeRecord, out: &mut FingerprintMap) -> Fingerprint {
    let child_fingerprints: Vec<Fingerprint> = node
        .children
        .iter()
        .map(|child| fingerprint_into(child, out))
        .collect();
    let fingerprint = digest_node(node, &child_fingerprints);
    out.insert(node.id.clone(), fingerprint.clone());
    fingerprint
}

/// Compute the fingerprint of a node, recursively including its children.
pub fn fingerprint(node: &NodeRecord) -> Fingerprint {
    let mut scratch = FingerprintMap::new();
    fingerprint_into(node, &mut scratch)
}

/// Compute fingerprints for every node in the tree in a single bottom-up pass.
pub fn fingerprint_tree(root: &NodeRecord) -> FingerprintMap {
    let mut map = FingerprintMap::new();
    fingerprint_into(root, &mut map);
    map
}
