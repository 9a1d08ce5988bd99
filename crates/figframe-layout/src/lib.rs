//! Layout resolution for figframe panel trees.
//!
//! This crate turns a [`PanelTree`] into absolute boxes for every panel.
//!
//! # Architecture
//!
//! 1. **Validation**: structural checks on the tree (references, cycles, values)
//! 2. **Local checks**: conflicts between statically known sizes
//! 3. **Constraint building**: one set of linear constraints per panel
//! 4. **Solving**: a [`LinearSolver`] computes every x, y, width, and height
//! 5. **Resolution**: solved values are checked and written back to the tree
//!
//! # Example
//!
//! ```
//! use figframe_core::{Margins, Panel, PanelTree};
//! use figframe_layout::resolve;
//!
//! let mut tree = PanelTree::new(
//!     Panel::new("figure")
//!         .with_width(10.0)
//!         .with_height(5.0)
//!         .with_margins(Margins::new(2.0, 0.5, 0.5, 2.0)),
//! );
//! tree.add_child("figure", Panel::new("myplot")).unwrap();
//!
//! let geometry = resolve(&mut tree).unwrap();
//! let plot = geometry.get("myplot").unwrap();
//! assert!((plot.width - 7.5).abs() < 1e-9);
//! ```

mod builder;
mod checks;
mod geometry;
mod options;
mod resolve;
mod session;
mod vars;

use indexmap::IndexMap;
use log::{debug, warn};

use figframe_constraint::{LinearSolver, Solver};
use figframe_core::{Bounds, LayoutError, PanelId, PanelTree};

pub use builder::{ConstraintBuilder, LayoutConstraint};
pub use geometry::Geometry;
pub use options::ResolveOptions;
pub use session::{Solution, SolverSession};
pub use vars::{PanelVars, Property};

/// Resolve a tree with default options and the bundled Cassowary solver.
pub fn resolve(tree: &mut PanelTree) -> Result<Geometry, LayoutError> {
    resolve_with(tree, &ResolveOptions::default(), Solver::new())
}

/// Resolve a tree with the given options and solver.
///
/// On success every panel's resolved box is updated. On failure the tree is
/// left exactly as it was, including boxes from an earlier pass.
pub fn resolve_with<S: LinearSolver>(
    tree: &mut PanelTree,
    options: &ResolveOptions,
    solver: S,
) -> Result<Geometry, LayoutError> {
    debug!("resolving layout of '{}' ({} panels)", tree.root_panel().name(), tree.len());

    let boxes = match solve_boxes(tree, options, solver) {
        Ok(boxes) => boxes,
        Err(e) => {
            warn!("layout of '{}' failed: {}", tree.root_panel().name(), e);
            return Err(e);
        }
    };

    tree.apply_resolved(&boxes);
    let geometry = Geometry::new(tree, &boxes);
    debug!(
        "resolved figure {} x {}",
        geometry.figure_size().width,
        geometry.figure_size().height
    );
    Ok(geometry)
}

fn solve_boxes<S: LinearSolver>(
    tree: &PanelTree,
    options: &ResolveOptions,
    solver: S,
) -> Result<IndexMap<PanelId, Bounds>, LayoutError> {
    tree.validate()?;
    if options.local_checks {
        checks::check_static_sizes(tree, options.tolerance)?;
    }

    let mut session = SolverSession::new(solver);
    session.register_tree(tree);
    let constraints = ConstraintBuilder::new(tree, session.vars()).build()?;
    session.add_all(&constraints, tree)?;

    let solution = session.solution()?;
    let boxes = resolve::read_boxes(tree, &solution)?;
    if options.check_consistency {
        resolve::GeometryCheck::new(tree, &boxes, options.tolerance).run()?;
    }
    Ok(boxes)
}

/// Resolve independent trees on the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn resolve_many(trees: &mut [PanelTree]) -> Vec<Result<Geometry, LayoutError>> {
    use rayon::prelude::*;
    trees.par_iter_mut().map(resolve).collect()
}
