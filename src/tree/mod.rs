//! Design node tree: records, fingerprints and traversal.

pub mod hasher;
pub mod node;
pub mod walk;

pub use hasher::{fingerprint, fingerprint_tree};
pub use node::{MaybeMixed, NodeRecord};
