//! Solver session: one solver, one resolution pass.
//!
//! Bridges panel constraints to a [`LinearSolver`] and reads the solved values
//! back. Solver failures are mapped onto [`LayoutError`] with the names of the
//! panels involved.

use indexmap::IndexMap;
use log::debug;

use figframe_constraint::{LinearSolver, SolverError};
use figframe_core::{Bounds, LayoutError, PanelId, PanelTree};

use crate::builder::LayoutConstraint;
use crate::vars::{PanelVars, Property};

/// The solved values of a resolution pass.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub variables: IndexMap<(PanelId, Property), f64>,
}

impl Solution {
    /// Get a property value for a panel.
    pub fn get(&self, panel: PanelId, property: Property) -> Option<f64> {
        self.variables.get(&(panel, property)).copied()
    }

    /// Get the outer box of a panel.
    pub fn bounds(&self, panel: PanelId) -> Option<Bounds> {
        Some(Bounds::new(
            self.get(panel, Property::X)?,
            self.get(panel, Property::Y)?,
            self.get(panel, Property::Width)?,
            self.get(panel, Property::Height)?,
        ))
    }
}

/// Owns a solver for the duration of one pass.
#[derive(Debug)]
pub struct SolverSession<S> {
    solver: S,
    vars: IndexMap<PanelId, PanelVars>,
    added: usize,
}

impl<S: LinearSolver> SolverSession<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            vars: IndexMap::new(),
            added: 0,
        }
    }

    /// Create the four variables of every panel, in pre-order.
    pub fn register_tree(&mut self, tree: &PanelTree) -> &IndexMap<PanelId, PanelVars> {
        for id in tree.pre_order() {
            self.register(id);
        }
        &self.vars
    }

    /// Create (or return) the variables of one panel.
    pub fn register(&mut self, panel: PanelId) -> PanelVars {
        if let Some(vars) = self.vars.get(&panel) {
            return *vars;
        }
        let vars = PanelVars {
            x: self.solver.new_variable(),
            y: self.solver.new_variable(),
            width: self.solver.new_variable(),
            height: self.solver.new_variable(),
        };
        self.vars.insert(panel, vars);
        vars
    }

    pub fn vars(&self) -> &IndexMap<PanelId, PanelVars> {
        &self.vars
    }

    /// Number of constraints added so far.
    pub fn constraint_count(&self) -> usize {
        self.added
    }

    /// Add constraints in order, stopping at the first one the solver rejects.
    pub fn add_all(
        &mut self,
        constraints: &[LayoutConstraint],
        tree: &PanelTree,
    ) -> Result<(), LayoutError> {
        for c in constraints {
            self.add(c, tree)?;
        }
        debug!("added {} constraints for {} panels", self.added, self.vars.len());
        Ok(())
    }

    pub fn add(
        &mut self,
        constraint: &LayoutConstraint,
        tree: &PanelTree,
    ) -> Result<(), LayoutError> {
        let required = constraint.constraint.strength.is_required();
        match self.solver.add_constraint(&constraint.constraint) {
            Ok(_) => {
                self.added += 1;
                Ok(())
            }
            Err(SolverError::UnsatisfiableConstraint) if required => Err(LayoutError::Infeasible {
                panels: constraint
                    .panels
                    .iter()
                    .map(|id| tree.name_of(*id).to_string())
                    .collect(),
                constraint: constraint.description.clone(),
            }),
            Err(e) => Err(LayoutError::SolverInternal {
                reason: format!("{} (while adding '{}')", e, constraint.description),
            }),
        }
    }

    /// Read every registered variable back.
    pub fn solution(&self) -> Result<Solution, LayoutError> {
        let mut solution = Solution::default();
        for (&panel, vars) in &self.vars {
            for property in Property::ALL {
                let value = self.solver.value(vars.get(property));
                if !value.is_finite() {
                    return Err(LayoutError::SolverInternal {
                        reason: format!(
                            "non-finite value {} for panel {} {}",
                            value,
                            panel.index(),
                            property
                        ),
                    });
                }
                solution.variables.insert((panel, property), value);
            }
        }
        Ok(solution)
    }
}
