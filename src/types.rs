//! Core types shared across the aiwork bridge.

use std::collections::HashMap;

/// NodeId: opaque identifier issued by the design tool (e.g. `"1:23"`)
pub type NodeId = String;

/// Fingerprint: short fixed-width hex digest of a node's visually significant fields
pub type Fingerprint = String;

/// FingerprintMap: node id → fingerprint, derived fresh for one comparison
pub type FingerprintMap = HashMap<NodeId, Fingerprint>;

/// Number of digest bytes kept in a fingerprint (rendered as twice as many hex chars)
pub const FINGERPRINT_BYTES: usize = 8;
