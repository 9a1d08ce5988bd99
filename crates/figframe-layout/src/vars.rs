//! Solver variables for one panel.

use std::fmt;

use figframe_constraint::{Expression, Variable};
use figframe_core::{Axis, Margins};

/// One of the four unknowns of a panel box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    X,
    Y,
    Width,
    Height,
}

impl Property {
    pub const ALL: [Property; 4] = [Property::X, Property::Y, Property::Width, Property::Height];
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Property::X => "x",
            Property::Y => "y",
            Property::Width => "width",
            Property::Height => "height",
        };
        f.write_str(name)
    }
}

/// Layout variables of a panel: the bottom-left corner and the outer size.
#[derive(Debug, Clone, Copy)]
pub struct PanelVars {
    pub x: Variable,
    pub y: Variable,
    pub width: Variable,
    pub height: Variable,
}

/// +1 when reading order runs with the axis (left to right), -1 when it runs
/// against it (top to bottom).
pub(crate) fn reading_direction(axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => 1.0,
        Axis::Vertical => -1.0,
    }
}

/// Margin on the side where reading starts: left, or top.
pub(crate) fn leading_margin(margins: &Margins, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => margins.left,
        Axis::Vertical => margins.top,
    }
}

impl PanelVars {
    pub fn get(&self, property: Property) -> Variable {
        match property {
            Property::X => self.x,
            Property::Y => self.y,
            Property::Width => self.width,
            Property::Height => self.height,
        }
    }

    pub fn position(&self, axis: Axis) -> Variable {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    pub fn size(&self, axis: Axis) -> Variable {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Low edge along an axis (left or bottom).
    pub fn low(&self, axis: Axis) -> Expression {
        Expression::from_variable(self.position(axis))
    }

    /// High edge along an axis (right or top).
    pub fn high(&self, axis: Axis) -> Expression {
        self.low(axis).term(self.size(axis), 1.0)
    }

    /// Edge where reading starts: left, or top.
    pub fn leading(&self, axis: Axis) -> Expression {
        match axis {
            Axis::Horizontal => self.low(axis),
            Axis::Vertical => self.high(axis),
        }
    }

    /// Edge where reading ends: right, or bottom.
    pub fn trailing(&self, axis: Axis) -> Expression {
        match axis {
            Axis::Horizontal => self.high(axis),
            Axis::Vertical => self.low(axis),
        }
    }

    /// Extent of the content area: size minus both margins.
    pub fn content_size(&self, axis: Axis, margins: &Margins) -> Expression {
        Expression::from_variable(self.size(axis)).offset(-margins.total(axis))
    }

    pub fn content_low(&self, axis: Axis, margins: &Margins) -> Expression {
        self.low(axis).offset(margins.low(axis))
    }

    pub fn content_high(&self, axis: Axis, margins: &Margins) -> Expression {
        self.high(axis).offset(-margins.high(axis))
    }

    /// Leading edge of the content area.
    pub fn content_leading(&self, axis: Axis, margins: &Margins) -> Expression {
        self.leading(axis)
            .offset(reading_direction(axis) * leading_margin(margins, axis))
    }
}
