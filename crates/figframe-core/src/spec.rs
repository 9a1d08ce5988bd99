//! Size specifiers.
//!
//! Each panel carries one [`SizeSpec`] per axis. A specifier is pure data: it
//! names the rule that determines one scalar dimension, and the layout engine
//! turns that rule into linear constraints.

use std::fmt;

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Widths and x positions.
    Horizontal,
    /// Heights and y positions.
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The other axis.
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Name of the dimension measured along this axis.
    pub fn dimension(self) -> &'static str {
        match self {
            Axis::Horizontal => "width",
            Axis::Vertical => "height",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dimension())
    }
}

/// How one dimension of a panel is determined.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SizeSpec {
    /// Exactly this many units.
    Fixed(f64),
    /// The parent's content size on the same axis.
    #[default]
    FromParent,
    /// The aggregate of the children: their sum plus padding along the stack
    /// axis, their largest extent otherwise. Margins are added on top.
    FromChildren,
    /// Whatever remains of the parent's content area. Several `Fill` siblings
    /// on a stack axis share the remainder equally.
    Fill,
    /// The size of another panel on the same axis.
    Named(String),
    /// No rule of its own; the size follows from the panel's aspect ratio.
    Auto,
}

impl SizeSpec {
    /// Shorthand for [`SizeSpec::Named`].
    pub fn named(target: impl Into<String>) -> Self {
        SizeSpec::Named(target.into())
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, SizeSpec::Fixed(_))
    }

    pub fn is_fill(&self) -> bool {
        matches!(self, SizeSpec::Fill)
    }

    /// The panel this specifier copies its size from, if any.
    pub fn named_target(&self) -> Option<&str> {
        match self {
            SizeSpec::Named(target) => Some(target),
            _ => None,
        }
    }
}

impl From<f64> for SizeSpec {
    fn from(value: f64) -> Self {
        SizeSpec::Fixed(value)
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Fixed(v) => write!(f, "Fixed({})", v),
            SizeSpec::FromParent => f.write_str("FromParent"),
            SizeSpec::FromChildren => f.write_str("FromChildren"),
            SizeSpec::Fill => f.write_str("Fill"),
            SizeSpec::Named(target) => write!(f, "Named({})", target),
            SizeSpec::Auto => f.write_str("Auto"),
        }
    }
}
