//! Solver capability consumed by the layout engine.
//!
//! The layout engine only needs to register variables, add and remove linear
//! constraints, and read values back. Any linear arithmetic solver offering
//! those operations can stand in for the bundled Cassowary implementation.

use crate::cassowary::{self, Constraint, ConstraintId, SolverError, Variable};

/// An incremental linear constraint solver.
///
/// Implementations keep their solution current after every successful
/// [`LinearSolver::add_constraint`]; there is no separate solve step.
pub trait LinearSolver {
    /// Register a new real-valued variable.
    fn new_variable(&mut self) -> Variable;

    /// Add a constraint. A required constraint that conflicts with the ones
    /// already present fails with [`SolverError::UnsatisfiableConstraint`].
    fn add_constraint(&mut self, constraint: &Constraint) -> Result<ConstraintId, SolverError>;

    /// Remove a previously added constraint.
    fn remove_constraint(&mut self, id: ConstraintId) -> Result<(), SolverError>;

    /// Whether a constraint is currently registered.
    fn has_constraint(&self, id: ConstraintId) -> bool;

    /// Current value of a variable.
    fn value(&self, variable: Variable) -> f64;
}

impl LinearSolver for cassowary::Solver {
    fn new_variable(&mut self) -> Variable {
        cassowary::Solver::new_variable(self)
    }

    fn add_constraint(&mut self, constraint: &Constraint) -> Result<ConstraintId, SolverError> {
        cassowary::Solver::add_constraint(self, constraint)
    }

    fn remove_constraint(&mut self, id: ConstraintId) -> Result<(), SolverError> {
        cassowary::Solver::remove_constraint(self, id)
    }

    fn has_constraint(&self, id: ConstraintId) -> bool {
        cassowary::Solver::has_constraint(self, id)
    }

    fn value(&self, variable: Variable) -> f64 {
        self.get_value(variable)
    }
}

impl<S: LinearSolver + ?Sized> LinearSolver for &mut S {
    fn new_variable(&mut self) -> Variable {
        (**self).new_variable()
    }

    fn add_constraint(&mut self, constraint: &Constraint) -> Result<ConstraintId, SolverError> {
        (**self).add_constraint(constraint)
    }

    fn remove_constraint(&mut self, id: ConstraintId) -> Result<(), SolverError> {
        (**self).remove_constraint(id)
    }

    fn has_constraint(&self, id: ConstraintId) -> bool {
        (**self).has_constraint(id)
    }

    fn value(&self, variable: Variable) -> f64 {
        (**self).value(variable)
    }
}
