//! JSON interchange format for figframe panel trees.
//!
//! A document is an object with a `version` and a nested `root` panel record.
//! Size specifiers are tagged by kind:
//!
//! ```text
//! {"constraint": "fixedDimension", "value": 5.0}
//! {"constraint": "fromParent"}
//! {"constraint": "fromChildren"}
//! {"constraint": "fill"}
//! {"constraint": "named", "value": "legend"}
//! {"constraint": "auto"}
//! ```
//!
//! Older documents may tag a dimension `{"constraint": "fixedAspectRatio",
//! "value": 1.5}`. It is read as `auto` with the value as the panel's aspect
//! ratio; documents are always written in the form above.
//!
//! Only the tree description is stored; resolved boxes are not.
//!
//! # Example
//!
//! ```
//! use figframe_core::{Panel, PanelTree};
//!
//! let mut tree = PanelTree::new(Panel::new("figure").with_width(10.0).with_height(5.0));
//! tree.add_child("figure", Panel::new("plot")).unwrap();
//!
//! let json = figframe_json::to_json(&tree).unwrap();
//! let restored = figframe_json::from_json(&json).unwrap();
//! assert_eq!(restored.len(), 2);
//! ```

pub mod error;
pub mod schema;

use figframe_core::PanelTree;

pub use error::{JsonError, Result};
pub use schema::{DimensionRecord, FigureDocument, PanelRecord, FORMAT_VERSION};

/// Serialize a tree to compact JSON.
pub fn to_json(tree: &PanelTree) -> Result<String> {
    Ok(serde_json::to_string(&FigureDocument::from_tree(tree))?)
}

/// Serialize a tree to indented JSON.
pub fn to_json_pretty(tree: &PanelTree) -> Result<String> {
    Ok(serde_json::to_string_pretty(&FigureDocument::from_tree(tree))?)
}

/// Parse a tree from JSON.
pub fn from_json(source: &str) -> Result<PanelTree> {
    let doc: FigureDocument = serde_json::from_str(source)?;
    if doc.version != FORMAT_VERSION {
        return Err(JsonError::UnsupportedVersion {
            found: doc.version,
            expected: FORMAT_VERSION,
        });
    }
    doc.into_tree()
}
