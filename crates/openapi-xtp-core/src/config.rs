//! Configuration for document conversion.

use serde::{Deserialize, Serialize};

/// Policy applied when two schemas end up under the same name — after
/// whitespace normalization, or when a synthesized schema lands on an
/// existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Last writer wins (matches the historical transform).
    Overwrite,
    /// Abort the conversion with a `CollisionError`.
    Error,
}

/// Options for document conversion.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `max-depth`, `on-collision`).
/// This naming convention is part of the public API contract for config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConvertOptions {
    /// Regex matched against each `operationId`; only matching operations
    /// become imports. Default: match everything.
    pub include: String,
    /// Collision policy for schema names. Default: overwrite.
    pub on_collision: CollisionPolicy,
    /// Maximum traversal depth for tree walks (stack overflow guard).
    pub max_depth: usize,
    /// Value of the top-level `version` field in the emitted document.
    pub version: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include: ".*".to_string(),
            on_collision: CollisionPolicy::Overwrite,
            max_depth: 50,
            version: "v1-draft".to_string(),
        }
    }
}
