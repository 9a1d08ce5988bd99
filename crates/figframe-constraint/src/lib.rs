//! Constraint solving for figframe layouts.
//!
//! This crate implements:
//! - Cassowary simplex algorithm for linear equalities and inequalities
//! - Priority handling through constraint strengths
//! - The [`LinearSolver`] capability the layout engine is written against

mod cassowary;
mod solver;

pub use cassowary::{
    Constraint, ConstraintId, Expression, Relation, Solver, SolverError, Strength, Variable,
};
pub use solver::LinearSolver;
