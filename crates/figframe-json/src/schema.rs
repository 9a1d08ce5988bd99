//! Document schema types.

use serde::{Deserialize, Serialize};

use figframe_core::{Arrangement, Margins, Offset, Panel, PanelId, PanelTree, SizeSpec};

use crate::error::{JsonError, Result};

/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// Root object of a figure document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigureDocument {
    /// Format version.
    pub version: u32,
    /// The figure panel and everything below it.
    pub root: PanelRecord,
}

/// A size specifier as written in a document.
///
/// `fixedAspectRatio` comes from older documents. It is read as [`SizeSpec::Auto`]
/// with the value as the panel's aspect ratio, and never written.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "constraint", content = "value", rename_all = "camelCase")]
pub enum DimensionRecord {
    FixedDimension(f64),
    FixedAspectRatio(f64),
    #[default]
    FromParent,
    FromChildren,
    Fill,
    Named(String),
    Auto,
}

impl From<&SizeSpec> for DimensionRecord {
    fn from(spec: &SizeSpec) -> Self {
        match spec {
            SizeSpec::Fixed(value) => DimensionRecord::FixedDimension(*value),
            SizeSpec::FromParent => DimensionRecord::FromParent,
            SizeSpec::FromChildren => DimensionRecord::FromChildren,
            SizeSpec::Fill => DimensionRecord::Fill,
            SizeSpec::Named(target) => DimensionRecord::Named(target.clone()),
            SizeSpec::Auto => DimensionRecord::Auto,
        }
    }
}

impl DimensionRecord {
    /// The specifier, plus the aspect ratio a `fixedAspectRatio` tag carries.
    pub fn to_spec(&self) -> (SizeSpec, Option<f64>) {
        match self {
            DimensionRecord::FixedDimension(value) => (SizeSpec::Fixed(*value), None),
            DimensionRecord::FixedAspectRatio(ratio) => (SizeSpec::Auto, Some(*ratio)),
            DimensionRecord::FromParent => (SizeSpec::FromParent, None),
            DimensionRecord::FromChildren => (SizeSpec::FromChildren, None),
            DimensionRecord::Fill => (SizeSpec::Fill, None),
            DimensionRecord::Named(target) => (SizeSpec::Named(target.clone()), None),
            DimensionRecord::Auto => (SizeSpec::Auto, None),
        }
    }
}

/// One panel with its children nested inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRecord {
    pub name: String,
    #[serde(default)]
    pub width: DimensionRecord,
    #[serde(default)]
    pub height: DimensionRecord,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub padding: f64,
    #[serde(default)]
    pub arrangement: Arrangement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<f64>,
    #[serde(default, skip_serializing_if = "is_origin")]
    pub offset: Offset,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PanelRecord>,
}

fn is_origin(offset: &Offset) -> bool {
    *offset == Offset::default()
}

impl PanelRecord {
    /// Record of a single panel, without children.
    pub fn from_panel(panel: &Panel) -> Self {
        Self {
            name: panel.name().to_string(),
            width: (&panel.width).into(),
            height: (&panel.height).into(),
            margins: panel.margins,
            padding: panel.padding,
            arrangement: panel.arrangement,
            aspect: panel.aspect,
            offset: panel.offset,
            children: Vec::new(),
        }
    }

    /// Snapshot a panel and its whole subtree.
    pub fn from_tree(tree: &PanelTree, id: PanelId) -> Option<Self> {
        let mut record = Self::from_panel(tree.get(id)?);
        record.children = tree
            .children(id)
            .iter()
            .filter_map(|&child| Self::from_tree(tree, child))
            .collect();
        Some(record)
    }

    /// The panel described by this record, without its children.
    pub fn to_panel(&self) -> Result<Panel> {
        let (width, width_aspect) = self.width.to_spec();
        let (height, height_aspect) = self.height.to_spec();

        let mut aspect = self.aspect;
        for tagged in [width_aspect, height_aspect].into_iter().flatten() {
            match aspect {
                Some(declared) if declared != tagged => {
                    return Err(JsonError::ConflictingAspect {
                        panel: self.name.clone(),
                        declared,
                        tagged,
                    });
                }
                _ => aspect = Some(tagged),
            }
        }

        let mut panel = Panel::new(self.name.clone())
            .with_width(width)
            .with_height(height)
            .with_margins(self.margins)
            .with_padding(self.padding)
            .with_arrangement(self.arrangement)
            .with_offset(self.offset);
        panel.aspect = aspect;
        Ok(panel)
    }
}

impl FigureDocument {
    pub fn from_tree(tree: &PanelTree) -> Self {
        let root = PanelRecord::from_tree(tree, tree.root())
            .unwrap_or_else(|| PanelRecord::from_panel(tree.root_panel()));
        Self {
            version: FORMAT_VERSION,
            root,
        }
    }

    /// Rebuild the tree through [`PanelTree::add_child`], so duplicate names
    /// are rejected exactly as they are for trees built in code.
    pub fn into_tree(self) -> Result<PanelTree> {
        let mut tree = PanelTree::new(self.root.to_panel()?);
        let mut pending = Vec::new();
        queue_children(&mut pending, self.root);

        while let Some((parent, record)) = pending.pop() {
            tree.add_child(&parent, record.to_panel()?)?;
            queue_children(&mut pending, record);
        }
        Ok(tree)
    }
}

/// Push the children of `record` so that they pop in order.
fn queue_children(pending: &mut Vec<(String, PanelRecord)>, mut record: PanelRecord) {
    let children = std::mem::take(&mut record.children);
    pending.extend(children.into_iter().rev().map(|c| (record.name.clone(), c)));
}
