//! Error types for the figframe engine.

use thiserror::Error;

use crate::spec::Axis;

/// Top-level error type for the figframe engine.
#[derive(Debug, Error)]
pub enum FigframeError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Structural errors in the panel tree.
///
/// Raised by the mutation API and by the validation that opens every
/// resolution pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("A panel named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Unknown parent panel '{name}'")]
    UnknownParent { name: String },

    #[error("No panel named '{name}'")]
    NotFound { name: String },

    #[error("Cannot remove the root panel '{name}'")]
    CannotRemoveRoot { name: String },

    #[error("Panel '{panel}' takes its {axis} from unknown panel '{target}'")]
    DanglingReference {
        panel: String,
        axis: Axis,
        target: String,
    },

    #[error("Circular size reference: {}", .cycle.join(" -> "))]
    CyclicReference { cycle: Vec<String> },

    #[error("Panel '{panel}' sizes its {axis} from children but has none")]
    FromChildrenWithoutChildren { panel: String, axis: Axis },

    #[error("The root panel cannot size its {axis} with {spec}")]
    InvalidRootSpec { axis: Axis, spec: String },

    #[error("Panel '{panel}' has an underdetermined size: {reason}")]
    UnderdeterminedSize { panel: String, reason: String },

    #[error("Panel '{panel}' has an invalid {field}: {value}")]
    InvalidValue {
        panel: String,
        field: &'static str,
        value: f64,
    },
}

/// Errors during a layout resolution pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid panel tree: {0}")]
    Tree(#[from] TreeError),

    #[error("Conflicting size requirements for {}: {reason}", .panels.join(", "))]
    Unsatisfiable { panels: Vec<String>, reason: String },

    #[error("No feasible layout: '{constraint}' cannot hold (panels: {})", .panels.join(", "))]
    Infeasible {
        panels: Vec<String>,
        constraint: String,
    },

    #[error("Constraint solver failure: {reason}")]
    SolverInternal { reason: String },

    #[error("Resolved geometry of '{panel}' is inconsistent: {detail}")]
    Inconsistency { panel: String, detail: String },
}

impl LayoutError {
    /// Names of the panels implicated in this error, if known.
    pub fn panels(&self) -> Vec<&str> {
        match self {
            LayoutError::Unsatisfiable { panels, .. } | LayoutError::Infeasible { panels, .. } => {
                panels.iter().map(String::as_str).collect()
            }
            LayoutError::Inconsistency { panel, .. } => vec![panel.as_str()],
            LayoutError::Tree(_) | LayoutError::SolverInternal { .. } => Vec::new(),
        }
    }
}
