//! Cassowary constraint solver implementation.
//!
//! This is an implementation of the Cassowary linear constraint solving algorithm,
//! as described in "The Cassowary Linear Arithmetic Constraint Solving Algorithm"
//! by Greg J. Badros and Alan Borning.
//!
//! The algorithm uses a variation of the simplex method optimized for incremental
//! constraint solving with priorities (strengths). Tableau rows are kept in
//! ordered maps so that pivot selection follows Bland's rule: the same sequence
//! of constraints always produces the same solution.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use thiserror::Error;

/// Unique identifier for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub(crate) usize);

impl Variable {
    /// Create a variable handle with the given ID.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// The numeric ID of this variable.
    pub fn id(&self) -> usize {
        self.0
    }
}

/// Handle to a constraint registered with a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    /// Create a constraint handle with the given ID.
    pub fn new(id: usize) -> Self {
        Self(id)
    }
}

/// Symbol types used internally in the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Symbol {
    /// An external variable (the actual unknowns we're solving for)
    External(usize),
    /// A slack variable (for inequality constraints)
    Slack(usize),
    /// An error variable (for non-required constraints)
    Error(usize),
    /// A dummy variable (for required equality constraints)
    Dummy(usize),
}

impl Symbol {
    fn is_external(&self) -> bool {
        matches!(self, Symbol::External(_))
    }

    fn is_error(&self) -> bool {
        matches!(self, Symbol::Error(_))
    }

    fn is_dummy(&self) -> bool {
        matches!(self, Symbol::Dummy(_))
    }

    fn is_pivotable(&self) -> bool {
        matches!(self, Symbol::Slack(_) | Symbol::Error(_))
    }
}

/// A linear expression in the form: constant + Σ(coefficient * variable)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub constant: f64,
    terms: IndexMap<Variable, f64>,
}

impl Expression {
    /// Create a constant expression.
    pub fn from_constant(value: f64) -> Self {
        Self {
            constant: value,
            terms: IndexMap::new(),
        }
    }

    /// Create an expression from a single variable.
    pub fn from_variable(var: Variable) -> Self {
        let mut expr = Self::default();
        expr.add_term(var, 1.0);
        expr
    }

    /// Add a term to the expression, merging with an existing term for the same variable.
    pub fn add_term(&mut self, var: Variable, coefficient: f64) {
        let entry = self.terms.entry(var).or_insert(0.0);
        *entry += coefficient;
        if near_zero(*entry) {
            self.terms.shift_remove(&var);
        }
    }

    /// Chainable form of [`Expression::add_term`].
    pub fn term(mut self, var: Variable, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// Chainable constant offset.
    pub fn offset(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    /// Add another expression to this one.
    pub fn add_expression(&mut self, other: &Expression, multiplier: f64) {
        self.constant += other.constant * multiplier;
        for (&var, &coeff) in &other.terms {
            self.add_term(var, coeff * multiplier);
        }
    }

    /// Chainable form of [`Expression::add_expression`] with a multiplier of -1.
    pub fn minus(mut self, other: &Expression) -> Self {
        self.add_expression(other, -1.0);
        self
    }

    /// Get the coefficient for a variable.
    pub fn coefficient(&self, var: Variable) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// Get an iterator over the terms.
    pub fn terms(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.terms.iter().map(|(&v, &c)| (v, c))
    }

    /// Evaluate the expression with the given variable values.
    pub fn evaluate(&self, value: impl Fn(Variable) -> f64) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, (&v, &c)| acc + c * value(v))
    }
}

impl From<Variable> for Expression {
    fn from(var: Variable) -> Self {
        Expression::from_variable(var)
    }
}

/// Tolerance for floating-point comparisons.
const EPSILON: f64 = 1e-8;

/// Near-zero check for floating point values.
fn near_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Constraint strength levels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Strength(pub f64);

impl Strength {
    pub const REQUIRED: Strength = Strength(1_001_001_000.0);
    pub const STRONG: Strength = Strength(1_000_000.0);
    pub const WEAK: Strength = Strength(1.0);

    /// Check if this is a required constraint.
    pub fn is_required(&self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

/// The relation of a constraint (equality or inequality).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

/// A constraint to be added to the solver: `expression <relation> 0`.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub expression: Expression,
    pub relation: Relation,
    pub strength: Strength,
}

impl Constraint {
    /// Create a new constraint.
    pub fn new(expression: Expression, relation: Relation, strength: Strength) -> Self {
        Self {
            expression,
            relation,
            strength,
        }
    }

    /// `lhs == rhs`
    pub fn equal(lhs: Expression, rhs: &Expression, strength: Strength) -> Self {
        Self::new(lhs.minus(rhs), Relation::Equal, strength)
    }

    /// `lhs >= rhs`
    pub fn greater_or_equal(lhs: Expression, rhs: &Expression, strength: Strength) -> Self {
        Self::new(lhs.minus(rhs), Relation::GreaterOrEqual, strength)
    }

    /// `lhs <= rhs`
    pub fn less_or_equal(lhs: Expression, rhs: &Expression, strength: Strength) -> Self {
        Self::new(lhs.minus(rhs), Relation::LessOrEqual, strength)
    }
}

/// A row in the simplex tableau.
#[derive(Debug, Clone)]
struct Row {
    constant: f64,
    cells: BTreeMap<Symbol, f64>,
}

impl Row {
    fn new(constant: f64) -> Self {
        Self {
            constant,
            cells: BTreeMap::new(),
        }
    }

    fn insert_symbol(&mut self, symbol: Symbol, coefficient: f64) {
        let entry = self.cells.entry(symbol).or_insert(0.0);
        *entry += coefficient;
        if near_zero(*entry) {
            self.cells.remove(&symbol);
        }
    }

    fn insert_row(&mut self, other: &Row, coefficient: f64) {
        self.constant += other.constant * coefficient;
        for (&s, &c) in &other.cells {
            self.insert_symbol(s, c * coefficient);
        }
    }

    fn remove(&mut self, symbol: Symbol) {
        self.cells.remove(&symbol);
    }

    fn reverse_sign(&mut self) {
        self.constant = -self.constant;
        for c in self.cells.values_mut() {
            *c = -*c;
        }
    }

    fn coefficient(&self, symbol: Symbol) -> f64 {
        self.cells.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Substitute a symbol in this row with another row.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        if let Some(coeff) = self.cells.remove(&symbol) {
            self.insert_row(row, coeff);
        }
    }

    /// Solve for a symbol in this row.
    fn solve_for(&mut self, symbol: Symbol) {
        let coeff = self.cells.remove(&symbol).unwrap_or(1.0);
        let multiplier = -1.0 / coeff;
        self.constant *= multiplier;
        for c in self.cells.values_mut() {
            *c *= multiplier;
        }
    }

    /// Solve for `rhs` in a row currently solved for `lhs`.
    fn solve_for_pair(&mut self, lhs: Symbol, rhs: Symbol) {
        self.insert_symbol(lhs, -1.0);
        self.solve_for(rhs);
    }

    fn all_dummies(&self) -> bool {
        self.cells.keys().all(Symbol::is_dummy)
    }

    fn any_pivotable_symbol(&self) -> Option<Symbol> {
        self.cells.keys().copied().find(Symbol::is_pivotable)
    }

    /// Entering symbol for an objective row: the first non-dummy symbol with a
    /// negative coefficient.
    fn entering_symbol(&self) -> Option<Symbol> {
        self.cells
            .iter()
            .find(|(s, c)| !s.is_dummy() && **c < 0.0)
            .map(|(&s, _)| s)
    }
}

/// Marker symbols of a registered constraint.
#[derive(Debug, Clone, Copy)]
struct Tag {
    marker: Symbol,
    other: Option<Symbol>,
}

#[derive(Debug, Clone, Copy)]
struct ConstraintEntry {
    tag: Tag,
    strength: Strength,
}

#[derive(Debug, Clone, Copy)]
enum Objective {
    Main,
    Artificial,
}

/// The Cassowary constraint solver.
#[derive(Debug)]
pub struct Solver {
    /// Counter for generating unique variable IDs
    var_counter: usize,
    /// Counter for generating unique symbol IDs
    symbol_counter: usize,
    /// Counter for constraint IDs
    constraint_counter: usize,
    /// The objective function row
    objective: Row,
    /// Artificial objective for phase 1
    artificial: Option<Row>,
    /// The tableau rows, keyed by their basic symbol
    rows: BTreeMap<Symbol, Row>,
    /// Registered constraints and their marker symbols
    constraints: BTreeMap<ConstraintId, ConstraintEntry>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self {
            var_counter: 0,
            symbol_counter: 0,
            constraint_counter: 0,
            objective: Row::new(0.0),
            artificial: None,
            rows: BTreeMap::new(),
            constraints: BTreeMap::new(),
        }
    }

    /// Create a new variable.
    pub fn new_variable(&mut self) -> Variable {
        let var = Variable(self.var_counter);
        self.var_counter += 1;
        var
    }

    /// Get the current value of a variable.
    ///
    /// Variables that are not basic in the tableau sit at zero.
    pub fn get_value(&self, var: Variable) -> f64 {
        self.rows
            .get(&Symbol::External(var.0))
            .map_or(0.0, |row| row.constant)
    }

    /// Number of constraints currently registered.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Check whether a constraint is registered.
    pub fn has_constraint(&self, id: ConstraintId) -> bool {
        self.constraints.contains_key(&id)
    }

    /// Add a constraint to the solver.
    ///
    /// A rejected constraint leaves the solver exactly as it was.
    pub fn add_constraint(&mut self, constraint: &Constraint) -> Result<ConstraintId, SolverError> {
        let objective = self.objective.clone();
        let (mut row, tag) = self.create_row(constraint);
        let mut subject = choose_subject(&row, &tag);

        // A row made only of dummy symbols is either redundant or in
        // direct conflict with the required constraints already present.
        if subject.is_none() && row.all_dummies() {
            if !near_zero(row.constant) {
                return Err(SolverError::UnsatisfiableConstraint);
            }
            subject = Some(tag.marker);
        }

        match subject {
            Some(subject) => {
                row.solve_for(subject);
                self.substitute(subject, &row);
                self.rows.insert(subject, row);
            }
            None => {
                let rows = self.rows.clone();
                let accepted = self.add_with_artificial_variable(row);
                if !matches!(accepted, Ok(true)) {
                    self.rows = rows;
                    self.objective = objective;
                    self.artificial = None;
                    return Err(accepted.err().unwrap_or(SolverError::UnsatisfiableConstraint));
                }
            }
        }

        let id = ConstraintId(self.constraint_counter);
        self.constraint_counter += 1;
        self.constraints.insert(
            id,
            ConstraintEntry {
                tag,
                strength: constraint.strength,
            },
        );
        self.optimize(Objective::Main)?;

        Ok(id)
    }

    /// Remove a constraint from the solver.
    pub fn remove_constraint(&mut self, id: ConstraintId) -> Result<(), SolverError> {
        let entry = self
            .constraints
            .remove(&id)
            .ok_or(SolverError::UnknownConstraint)?;

        self.remove_constraint_effects(&entry);

        let marker = entry.tag.marker;
        if self.rows.remove(&marker).is_none() {
            // The marker is not basic - pivot it in before dropping its row.
            let leaving = self
                .marker_leaving_symbol(marker)
                .ok_or(SolverError::Internal("no leaving row for constraint marker"))?;
            let mut row = self
                .rows
                .remove(&leaving)
                .ok_or(SolverError::Internal("leaving row vanished"))?;
            row.solve_for_pair(leaving, marker);
            self.substitute(marker, &row);
        }

        self.optimize(Objective::Main)
    }

    /// Create a row for a constraint.
    fn create_row(&mut self, constraint: &Constraint) -> (Row, Tag) {
        let mut row = Row::new(constraint.expression.constant);

        // Add the terms to the row, substituting basic variables
        for (var, coeff) in constraint.expression.terms() {
            if near_zero(coeff) {
                continue;
            }
            let symbol = Symbol::External(var.0);
            match self.rows.get(&symbol) {
                Some(basic) => row.insert_row(basic, coeff),
                None => row.insert_symbol(symbol, coeff),
            }
        }

        let strength = constraint.strength;
        let tag = match constraint.relation {
            Relation::LessOrEqual | Relation::GreaterOrEqual => {
                let coeff = if constraint.relation == Relation::LessOrEqual {
                    1.0
                } else {
                    -1.0
                };

                let slack = self.new_symbol(Symbol::Slack(0));
                row.insert_symbol(slack, coeff);

                let other = if strength.is_required() {
                    None
                } else {
                    let error = self.new_symbol(Symbol::Error(0));
                    row.insert_symbol(error, -coeff);
                    self.objective.insert_symbol(error, strength.0);
                    Some(error)
                };
                Tag { marker: slack, other }
            }
            Relation::Equal => {
                if strength.is_required() {
                    let dummy = self.new_symbol(Symbol::Dummy(0));
                    row.insert_symbol(dummy, 1.0);
                    Tag {
                        marker: dummy,
                        other: None,
                    }
                } else {
                    let errplus = self.new_symbol(Symbol::Error(0));
                    let errminus = self.new_symbol(Symbol::Error(0));
                    row.insert_symbol(errplus, -1.0);
                    row.insert_symbol(errminus, 1.0);
                    self.objective.insert_symbol(errplus, strength.0);
                    self.objective.insert_symbol(errminus, strength.0);
                    Tag {
                        marker: errplus,
                        other: Some(errminus),
                    }
                }
            }
        };

        // Ensure the constant is non-negative
        if row.constant < 0.0 {
            row.reverse_sign();
        }

        (row, tag)
    }

    /// Generate a new symbol of the same kind as `kind`.
    fn new_symbol(&mut self, kind: Symbol) -> Symbol {
        let id = self.symbol_counter;
        self.symbol_counter += 1;
        match kind {
            Symbol::External(_) => Symbol::External(id),
            Symbol::Slack(_) => Symbol::Slack(id),
            Symbol::Error(_) => Symbol::Error(id),
            Symbol::Dummy(_) => Symbol::Dummy(id),
        }
    }

    /// Add a row through a phase-1 artificial variable.
    ///
    /// Returns whether the row could be satisfied.
    fn add_with_artificial_variable(&mut self, row: Row) -> Result<bool, SolverError> {
        let art = self.new_symbol(Symbol::Slack(0));
        self.rows.insert(art, row.clone());
        self.artificial = Some(row);

        self.optimize(Objective::Artificial)?;
        let success = self
            .artificial
            .take()
            .is_some_and(|objective| near_zero(objective.constant));

        if let Some(mut art_row) = self.rows.remove(&art) {
            if art_row.cells.is_empty() {
                return Ok(success);
            }
            let Some(entering) = art_row.any_pivotable_symbol() else {
                return Ok(false);
            };
            art_row.solve_for_pair(art, entering);
            self.substitute(entering, &art_row);
            self.rows.insert(entering, art_row);
        }

        for row in self.rows.values_mut() {
            row.remove(art);
        }
        self.objective.remove(art);

        Ok(success)
    }

    /// Substitute a symbol throughout the tableau.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        for r in self.rows.values_mut() {
            r.substitute(symbol, row);
        }
        self.objective.substitute(symbol, row);
        if let Some(art) = self.artificial.as_mut() {
            art.substitute(symbol, row);
        }
    }

    /// Optimize an objective function using the simplex algorithm.
    fn optimize(&mut self, which: Objective) -> Result<(), SolverError> {
        loop {
            let objective = match which {
                Objective::Main => Some(&self.objective),
                Objective::Artificial => self.artificial.as_ref(),
            };
            let Some(entering) = objective.and_then(Row::entering_symbol) else {
                return Ok(());
            };

            let leaving = self
                .leaving_row(entering)
                .ok_or(SolverError::Internal("objective is unbounded"))?;
            let mut row = self
                .rows
                .remove(&leaving)
                .ok_or(SolverError::Internal("leaving row vanished"))?;

            row.solve_for_pair(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
        }
    }

    /// Find the row to leave the basis (minimum ratio test).
    fn leaving_row(&self, entering: Symbol) -> Option<Symbol> {
        let mut min_ratio = f64::MAX;
        let mut leaving = None;

        for (&symbol, row) in &self.rows {
            if symbol.is_external() {
                continue;
            }
            let coeff = row.coefficient(entering);
            if coeff < 0.0 {
                let ratio = -row.constant / coeff;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    leaving = Some(symbol);
                }
            }
        }

        leaving
    }

    /// Pick the row to pivot on when removing a non-basic marker.
    fn marker_leaving_symbol(&self, marker: Symbol) -> Option<Symbol> {
        let mut r1 = f64::MAX;
        let mut r2 = f64::MAX;
        let mut first = None;
        let mut second = None;
        let mut third = None;

        for (&symbol, row) in &self.rows {
            let coeff = row.coefficient(marker);
            if coeff == 0.0 {
                continue;
            }
            if symbol.is_external() {
                third = Some(symbol);
            } else if coeff < 0.0 {
                let ratio = -row.constant / coeff;
                if ratio < r1 {
                    r1 = ratio;
                    first = Some(symbol);
                }
            } else {
                let ratio = row.constant / coeff;
                if ratio < r2 {
                    r2 = ratio;
                    second = Some(symbol);
                }
            }
        }

        first.or(second).or(third)
    }

    /// Remove the objective contributions of a constraint's error symbols.
    fn remove_constraint_effects(&mut self, entry: &ConstraintEntry) {
        let markers = std::iter::once(entry.tag.marker).chain(entry.tag.other);
        for marker in markers.filter(Symbol::is_error) {
            match self.rows.get(&marker) {
                Some(row) => {
                    let row = row.clone();
                    self.objective.insert_row(&row, -entry.strength.0);
                }
                None => self.objective.insert_symbol(marker, -entry.strength.0),
            }
        }
    }
}

/// Choose a subject for the row.
fn choose_subject(row: &Row, tag: &Tag) -> Option<Symbol> {
    // First, check for external symbols
    if let Some(&symbol) = row.cells.keys().find(|s| s.is_external()) {
        return Some(symbol);
    }

    // Then a pivotable marker with a negative coefficient
    std::iter::once(tag.marker)
        .chain(tag.other)
        .find(|s| s.is_pivotable() && row.coefficient(*s) < 0.0)
}

/// Errors that can occur during constraint solving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// A required constraint could not be satisfied.
    #[error("The constraint cannot be satisfied")]
    UnsatisfiableConstraint,

    /// The specified constraint was not found.
    #[error("The constraint is not in the solver")]
    UnknownConstraint,

    /// An internal error occurred.
    #[error("Internal solver error: {0}")]
    Internal(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> Expression {
        Expression::from_constant(value)
    }

    fn value_is(solver: &Solver, var: Variable, expected: f64) -> bool {
        (solver.get_value(var) - expected).abs() < 1e-9
    }

    #[test]
    fn test_create_variable() {
        let mut solver = Solver::new();
        let v1 = solver.new_variable();
        let v2 = solver.new_variable();
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_simple_equality() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        // x == 100
        let expr = Expression::from_variable(x).offset(-100.0);
        solver
            .add_constraint(&Constraint::new(expr, Relation::Equal, Strength::REQUIRED)).unwrap();

        assert!(value_is(&solver, x, 100.0));
    }

    #[test]
    fn test_two_variables() {
        let mut solver = Solver::new();
        let x = solver.new_variable();
        let y = solver.new_variable();

        // x == 100
        let c1 = Constraint::equal(x.into(), &constant(100.0), Strength::REQUIRED);
        solver.add_constraint(&c1).unwrap();

        // y == x + 50
        let c2 = Constraint::equal(
            y.into(),
            &Expression::from(x).offset(50.0),
            Strength::REQUIRED,
        );
        solver.add_constraint(&c2).unwrap();

        assert!(value_is(&solver, x, 100.0));
        assert!(value_is(&solver, y, 150.0));
    }

    #[test]
    fn test_inequality_with_weak_preference() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        // x >= 50, weakly prefer x == 10
        let lower = Constraint::greater_or_equal(x.into(), &constant(50.0), Strength::REQUIRED);
        solver.add_constraint(&lower).unwrap();
        let pref = Constraint::equal(x.into(), &constant(10.0), Strength::WEAK);
        solver.add_constraint(&pref).unwrap();

        assert!(value_is(&solver, x, 50.0));
    }

    #[test]
    fn test_strength_ordering() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        let weak = Constraint::equal(x.into(), &constant(100.0), Strength::WEAK);
        solver.add_constraint(&weak).unwrap();
        let strong = Constraint::equal(x.into(), &constant(50.0), Strength::STRONG);
        solver.add_constraint(&strong).unwrap();

        // Strong constraint should win
        assert!(value_is(&solver, x, 50.0));
    }

    #[test]
    fn test_weak_minimum_yields_maximum_of_lower_bounds() {
        let mut solver = Solver::new();
        let m = solver.new_variable();

        for bound in [3.0, 7.5, 5.0] {
            let c = Constraint::greater_or_equal(m.into(), &constant(bound), Strength::REQUIRED);
            solver.add_constraint(&c).unwrap();
        }
        let shrink = Constraint::equal(m.into(), &constant(0.0), Strength::WEAK);
        solver.add_constraint(&shrink).unwrap();

        assert!(value_is(&solver, m, 7.5));
    }

    #[test]
    fn test_conflicting_required_equalities() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        let c1 = Constraint::equal(x.into(), &constant(5.0), Strength::REQUIRED);
        solver.add_constraint(&c1).unwrap();
        let c2 = Constraint::equal(x.into(), &constant(3.0), Strength::REQUIRED);

        assert_eq!(solver.add_constraint(&c2), Err(SolverError::UnsatisfiableConstraint));
    }

    #[test]
    fn test_conflicting_required_inequalities() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        let lower = Constraint::greater_or_equal(x.into(), &constant(10.0), Strength::REQUIRED);
        solver.add_constraint(&lower).unwrap();
        let upper = Constraint::less_or_equal(x.into(), &constant(5.0), Strength::REQUIRED);

        assert_eq!(solver.add_constraint(&upper), Err(SolverError::UnsatisfiableConstraint));
        assert!(value_is(&solver, x, 10.0));
    }

    #[test]
    fn test_rejected_constraint_leaves_solver_unchanged() {
        let mut solver = Solver::new();
        let x = solver.new_variable();
        let y = solver.new_variable();

        let lower = Constraint::greater_or_equal(x.into(), &constant(10.0), Strength::REQUIRED);
        let lower_id = solver.add_constraint(&lower).unwrap();
        let follow = Constraint::equal(
            y.into(),
            &Expression::from(x).offset(2.0),
            Strength::REQUIRED,
        );
        solver.add_constraint(&follow).unwrap();
        let pull = Constraint::equal(x.into(), &constant(0.0), Strength::WEAK);
        solver.add_constraint(&pull).unwrap();
        assert!(value_is(&solver, x, 10.0));

        let upper = Constraint::less_or_equal(x.into(), &constant(5.0), Strength::REQUIRED);
        assert_eq!(solver.add_constraint(&upper), Err(SolverError::UnsatisfiableConstraint));
        assert_eq!(solver.constraint_count(), 3);
        assert!(value_is(&solver, x, 10.0));
        assert!(value_is(&solver, y, 12.0));

        // Still usable afterwards.
        let loose = Constraint::less_or_equal(x.into(), &constant(20.0), Strength::REQUIRED);
        solver.add_constraint(&loose).unwrap();
        assert!(value_is(&solver, x, 10.0));

        solver.remove_constraint(lower_id).unwrap();
        assert!(value_is(&solver, x, 0.0));
        assert!(value_is(&solver, y, 2.0));
    }

    #[test]
    fn test_redundant_required_constraint() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        let c = Constraint::equal(x.into(), &constant(5.0), Strength::REQUIRED);
        solver.add_constraint(&c).unwrap();
        solver.add_constraint(&c).unwrap();

        assert_eq!(solver.constraint_count(), 2);
        assert!(value_is(&solver, x, 5.0));
    }

    #[test]
    fn test_tight_bounds_use_artificial_variable() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        let lower = Constraint::greater_or_equal(x.into(), &constant(10.0), Strength::REQUIRED);
        let upper = Constraint::less_or_equal(x.into(), &constant(10.0), Strength::REQUIRED);
        solver.add_constraint(&lower).unwrap();
        solver.add_constraint(&upper).unwrap();

        assert!(value_is(&solver, x, 10.0));
    }

    #[test]
    fn test_remove_constraint() {
        let mut solver = Solver::new();
        let x = solver.new_variable();

        let weak = Constraint::equal(x.into(), &constant(100.0), Strength::WEAK);
        solver.add_constraint(&weak).unwrap();
        let strong = Constraint::equal(x.into(), &constant(50.0), Strength::STRONG);
        let id = solver.add_constraint(&strong).unwrap();
        assert!(value_is(&solver, x, 50.0));

        solver.remove_constraint(id).unwrap();
        assert!(!solver.has_constraint(id));
        assert!(value_is(&solver, x, 100.0));

        assert_eq!(solver.remove_constraint(id), Err(SolverError::UnknownConstraint));
    }

    #[test]
    fn test_expression_merges_terms() {
        let x = Variable::new(0);
        let y = Variable::new(1);
        let expr = Expression::from_variable(x)
            .term(y, 2.0)
            .term(x, -1.0)
            .offset(3.0);

        assert_eq!(expr.coefficient(x), 0.0);
        assert_eq!(expr.terms().count(), 1);
        assert_eq!(expr.evaluate(|_| 2.0), 7.0);
    }
}
