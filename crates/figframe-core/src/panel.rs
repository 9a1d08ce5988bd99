//! Panels: the nodes of the layout tree.

use smallvec::SmallVec;

use crate::spec::{Axis, SizeSpec};
use crate::types::Bounds;

/// Index of a panel in its [`PanelTree`](crate::PanelTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub(crate) u32);

impl PanelId {
    /// Raw arena index.
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// How a panel positions its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Arrangement {
    /// Each child sits at its own [`Offset`] from the content top-left corner.
    Free,
    /// Children are concatenated left to right.
    HorizontalStack,
    /// Children are concatenated top to bottom.
    #[default]
    VerticalStack,
}

impl Arrangement {
    /// The axis children are concatenated along, if this is a stack.
    pub fn stack_axis(&self) -> Option<Axis> {
        match self {
            Arrangement::Free => None,
            Arrangement::HorizontalStack => Some(Axis::Horizontal),
            Arrangement::VerticalStack => Some(Axis::Vertical),
        }
    }
}

/// Insets between a panel's border and its content area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// The same inset on every side.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Margin on the low side of an axis (left or bottom).
    pub fn low(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.bottom,
        }
    }

    /// Margin on the high side of an axis (right or top).
    pub fn high(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.top,
        }
    }

    /// Both margins along an axis.
    pub fn total(&self, axis: Axis) -> f64 {
        self.low(axis) + self.high(axis)
    }

    pub(crate) fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("margin_left", self.left),
            ("margin_right", self.right),
            ("margin_top", self.top),
            ("margin_bottom", self.bottom),
        ]
    }
}

/// Anchor of a child inside a [`Arrangement::Free`] parent, measured from the
/// parent's content top-left corner rightwards (`x`) and downwards (`y`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }
}

/// A rectangular panel in the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    name: String,
    /// How the width is determined
    pub width: SizeSpec,
    /// How the height is determined
    pub height: SizeSpec,
    pub margins: Margins,
    /// Gap between consecutive children of a stack
    pub padding: f64,
    pub arrangement: Arrangement,
    /// Target width/height ratio
    pub aspect: Option<f64>,
    /// Position inside a free parent
    pub offset: Offset,
    pub(crate) parent: Option<PanelId>,
    pub(crate) children: SmallVec<[PanelId; 4]>,
    pub(crate) resolved: Option<Bounds>,
}

impl Panel {
    /// Create a panel that fills its parent on both axes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: SizeSpec::default(),
            height: SizeSpec::default(),
            margins: Margins::default(),
            padding: 0.0,
            arrangement: Arrangement::default(),
            aspect: None,
            offset: Offset::default(),
            parent: None,
            children: SmallVec::new(),
            resolved: None,
        }
    }

    /// Set the width specifier.
    pub fn with_width(mut self, spec: impl Into<SizeSpec>) -> Self {
        self.width = spec.into();
        self
    }

    /// Set the height specifier.
    pub fn with_height(mut self, spec: impl Into<SizeSpec>) -> Self {
        self.height = spec.into();
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_arrangement(mut self, arrangement: Arrangement) -> Self {
        self.arrangement = arrangement;
        self
    }

    /// Tie width to height with `width = ratio * height`.
    pub fn with_aspect(mut self, ratio: f64) -> Self {
        self.aspect = Some(ratio);
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The specifier for one axis.
    pub fn spec(&self, axis: Axis) -> &SizeSpec {
        match axis {
            Axis::Horizontal => &self.width,
            Axis::Vertical => &self.height,
        }
    }

    pub fn parent(&self) -> Option<PanelId> {
        self.parent
    }

    pub fn children(&self) -> &[PanelId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Box from the last successful resolution pass, if still current.
    pub fn resolved_box(&self) -> Option<Bounds> {
        self.resolved
    }

    /// Content area of the resolved box.
    pub fn resolved_content(&self) -> Option<Bounds> {
        let m = &self.margins;
        self.resolved.map(|b| b.inset(m.left, m.right, m.top, m.bottom))
    }
}
