//! Error types for figframe-json.

use figframe_core::TreeError;
use thiserror::Error;

/// Result type for JSON operations.
pub type Result<T> = std::result::Result<T, JsonError>;

/// Errors that can occur while reading or writing a figure document.
#[derive(Debug, Error)]
pub enum JsonError {
    /// Malformed JSON or a record that does not match the format.
    #[error("json error: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The document was written by an incompatible format version.
    #[error("unsupported format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A `fixedAspectRatio` dimension disagrees with the panel's `aspect`.
    #[error("panel '{panel}' has aspect {declared} but a dimension is tagged {tagged}")]
    ConflictingAspect {
        panel: String,
        declared: f64,
        tagged: f64,
    },

    /// The records do not form a valid tree.
    #[error("invalid tree: {0}")]
    Tree(#[from] TreeError),
}
