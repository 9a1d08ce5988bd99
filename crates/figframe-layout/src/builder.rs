//! Translation of a panel tree into linear constraints.
//!
//! Every panel contributes:
//! - content non-negativity (`size >= margins`)
//! - one rule per axis from its size specifier
//! - an aspect equation if it has an aspect ratio
//! - containment and placement of each of its children
//!
//! All constraints are required except the `Fill` remainder equation (strong)
//! and the minimising preference behind `FromChildren` on a non-stack axis
//! (weak).

use indexmap::IndexMap;
use log::trace;
use smallvec::{smallvec, SmallVec};

use figframe_constraint::{Constraint, Expression, Strength};
use figframe_core::{Arrangement, Axis, LayoutError, Panel, PanelId, PanelTree, SizeSpec};

use crate::vars::{reading_direction, PanelVars};

/// A constraint together with a human-readable description and the panels it
/// involves, for error reporting.
#[derive(Debug, Clone)]
pub struct LayoutConstraint {
    pub constraint: Constraint,
    pub description: String,
    pub panels: SmallVec<[PanelId; 4]>,
}

/// Emits the constraints of a panel tree.
pub struct ConstraintBuilder<'a> {
    tree: &'a PanelTree,
    vars: &'a IndexMap<PanelId, PanelVars>,
    constraints: Vec<LayoutConstraint>,
}

impl<'a> ConstraintBuilder<'a> {
    /// Create a builder over a validated tree and its registered variables.
    pub fn new(tree: &'a PanelTree, vars: &'a IndexMap<PanelId, PanelVars>) -> Self {
        Self {
            tree,
            vars,
            constraints: Vec::new(),
        }
    }

    /// Emit every constraint of the tree, parents before children.
    pub fn build(mut self) -> Result<Vec<LayoutConstraint>, LayoutError> {
        let tree = self.tree;
        for (id, panel) in tree.iter() {
            let vars = self.vars_of(id)?;
            if id == tree.root() {
                self.add_root(id, panel, vars);
            }
            for axis in Axis::BOTH {
                self.add_content_bound(id, panel, vars, axis);
                self.add_size_rule(id, panel, vars, axis)?;
            }
            if let Some(ratio) = panel.aspect {
                let c = Constraint::equal(
                    vars.width.into(),
                    &Expression::default().term(vars.height, ratio),
                    Strength::REQUIRED,
                );
                let name = panel.name();
                self.push(c, format!("{}.width = {} * {}.height", name, ratio, name), &[id]);
            }
            self.add_children(id, panel, vars)?;
        }
        Ok(self.constraints)
    }

    fn vars_of(&self, id: PanelId) -> Result<PanelVars, LayoutError> {
        self.vars
            .get(&id)
            .copied()
            .ok_or_else(|| LayoutError::SolverInternal {
                reason: format!("no variables registered for panel '{}'", self.tree.name_of(id)),
            })
    }

    fn panel(&self, id: PanelId) -> Result<&'a Panel, LayoutError> {
        self.tree.get(id).ok_or_else(|| LayoutError::SolverInternal {
            reason: format!("stale panel id {}", id.index()),
        })
    }

    fn push(&mut self, constraint: Constraint, description: String, panels: &[PanelId]) {
        trace!("constraint: {}", description);
        self.constraints.push(LayoutConstraint {
            constraint,
            description,
            panels: panels.iter().copied().collect(),
        });
    }

    /// The figure sits at the origin.
    fn add_root(&mut self, id: PanelId, panel: &Panel, vars: PanelVars) {
        let origin = Expression::from_constant(0.0);
        let name = panel.name();
        self.push(
            Constraint::equal(vars.x.into(), &origin, Strength::REQUIRED),
            format!("{}.x = 0", name),
            &[id],
        );
        self.push(
            Constraint::equal(vars.y.into(), &origin, Strength::REQUIRED),
            format!("{}.y = 0", name),
            &[id],
        );
    }

    fn add_content_bound(&mut self, id: PanelId, panel: &Panel, vars: PanelVars, axis: Axis) {
        let total = panel.margins.total(axis);
        self.push(
            Constraint::greater_or_equal(
                vars.size(axis).into(),
                &Expression::from_constant(total),
                Strength::REQUIRED,
            ),
            format!("{}.{} >= margins ({})", panel.name(), axis, total),
            &[id],
        );
    }

    fn add_size_rule(
        &mut self,
        id: PanelId,
        panel: &Panel,
        vars: PanelVars,
        axis: Axis,
    ) -> Result<(), LayoutError> {
        let name = panel.name();
        let size: Expression = vars.size(axis).into();

        match panel.spec(axis) {
            SizeSpec::Fixed(value) => {
                self.push(
                    Constraint::equal(size, &Expression::from_constant(*value), Strength::REQUIRED),
                    format!("{}.{} = {}", name, axis, value),
                    &[id],
                );
            }
            SizeSpec::FromParent => {
                if let Some(parent_id) = panel.parent() {
                    let parent = self.panel(parent_id)?;
                    let content = self.vars_of(parent_id)?.content_size(axis, &parent.margins);
                    self.push(
                        Constraint::equal(size, &content, Strength::REQUIRED),
                        format!("{}.{} = content {} of {}", name, axis, axis, parent.name()),
                        &[id, parent_id],
                    );
                }
            }
            SizeSpec::Fill => {
                let Some(parent_id) = panel.parent() else {
                    return Ok(());
                };
                let parent = self.panel(parent_id)?;
                match parent.arrangement.stack_axis() {
                    // Shared with the siblings, see `add_fill_group`.
                    Some(stack) if stack == axis => {}
                    Some(_) => {
                        let content = self.vars_of(parent_id)?.content_size(axis, &parent.margins);
                        self.push(
                            Constraint::equal(size, &content, Strength::REQUIRED),
                            format!(
                                "{}.{} fills content {} of {}",
                                name,
                                axis,
                                axis,
                                parent.name()
                            ),
                            &[id, parent_id],
                        );
                    }
                    None => {
                        let pv = self.vars_of(parent_id)?;
                        let available = pv
                            .content_size(axis, &parent.margins)
                            .offset(-panel.offset.along(axis));
                        self.push(
                            Constraint::equal(size, &available, Strength::REQUIRED),
                            format!(
                                "{}.{} fills content {} of {} past its offset",
                                name,
                                axis,
                                axis,
                                parent.name()
                            ),
                            &[id, parent_id],
                        );
                    }
                }
            }
            SizeSpec::Named(target) => {
                let target_id = self.tree.id_of(target)?;
                let tv = self.vars_of(target_id)?;
                self.push(
                    Constraint::equal(size, &tv.size(axis).into(), Strength::REQUIRED),
                    format!("{}.{} = {}.{}", name, axis, target, axis),
                    &[id, target_id],
                );
            }
            SizeSpec::FromChildren => self.add_from_children(id, panel, vars, axis)?,
            SizeSpec::Auto => {}
        }
        Ok(())
    }

    fn add_from_children(
        &mut self,
        id: PanelId,
        panel: &Panel,
        vars: PanelVars,
        axis: Axis,
    ) -> Result<(), LayoutError> {
        let tree = self.tree;
        let children = tree.children(id);
        let content = vars.content_size(axis, &panel.margins);
        let name = panel.name();

        if panel.arrangement.stack_axis() == Some(axis) {
            let gaps = panel.padding * (children.len().saturating_sub(1)) as f64;
            let mut total = Expression::from_constant(gaps);
            for &child in children {
                total.add_term(self.vars_of(child)?.size(axis), 1.0);
            }
            let mut panels: SmallVec<[PanelId; 4]> = smallvec![id];
            panels.extend(children.iter().copied());
            self.push(
                Constraint::equal(content, &total, Strength::REQUIRED),
                format!("content {} of {} = sum of children + padding", axis, name),
                &panels,
            );
            return Ok(());
        }

        let free = panel.arrangement == Arrangement::Free;
        for &child in children {
            let child_panel = self.panel(child)?;
            let offset = if free { child_panel.offset.along(axis) } else { 0.0 };
            let extent = Expression::from_variable(self.vars_of(child)?.size(axis)).offset(offset);
            self.push(
                Constraint::greater_or_equal(content.clone(), &extent, Strength::REQUIRED),
                format!("content {} of {} >= extent of {}", axis, name, child_panel.name()),
                &[id, child],
            );
        }
        self.push(
            Constraint::equal(content, &Expression::from_constant(0.0), Strength::WEAK),
            format!("content {} of {} as small as possible", axis, name),
            &[id],
        );
        Ok(())
    }

    fn add_children(
        &mut self,
        id: PanelId,
        panel: &Panel,
        vars: PanelVars,
    ) -> Result<(), LayoutError> {
        let tree = self.tree;
        let children = tree.children(id);
        if children.is_empty() {
            return Ok(());
        }
        let margins = &panel.margins;

        for &child in children {
            let cv = self.vars_of(child)?;
            let label = format!("{} contains {}", panel.name(), tree.name_of(child));
            for axis in Axis::BOTH {
                let low = vars.content_low(axis, margins);
                let high = vars.content_high(axis, margins);
                self.push(
                    Constraint::greater_or_equal(cv.low(axis), &low, Strength::REQUIRED),
                    label.clone(),
                    &[id, child],
                );
                self.push(
                    Constraint::less_or_equal(cv.high(axis), &high, Strength::REQUIRED),
                    label.clone(),
                    &[id, child],
                );
            }
        }

        match panel.arrangement.stack_axis() {
            Some(axis) => {
                self.add_stack(id, panel, vars, axis)?;
                self.add_fill_group(id, panel, vars, axis)?;
            }
            None => {
                for &child in children {
                    let cv = self.vars_of(child)?;
                    let offset = self.panel(child)?.offset;
                    for axis in Axis::BOTH {
                        let anchor = vars
                            .content_leading(axis, margins)
                            .offset(reading_direction(axis) * offset.along(axis));
                        self.push(
                            Constraint::equal(cv.leading(axis), &anchor, Strength::REQUIRED),
                            format!(
                                "{} anchored in {} at offset {}",
                                tree.name_of(child),
                                panel.name(),
                                offset.along(axis)
                            ),
                            &[id, child],
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Chain the children along the stack axis and align them on the cross axis.
    fn add_stack(
        &mut self,
        id: PanelId,
        panel: &Panel,
        vars: PanelVars,
        axis: Axis,
    ) -> Result<(), LayoutError> {
        let margins = &panel.margins;
        let cross = axis.cross();
        let step = reading_direction(axis) * panel.padding;
        let start = vars.content_leading(axis, margins);
        let aligned = vars.content_leading(cross, margins);
        let tree = self.tree;
        let mut previous: Option<(PanelId, PanelVars)> = None;

        for &child in tree.children(id) {
            let cv = self.vars_of(child)?;
            let child_name = tree.name_of(child);
            match previous {
                None => self.push(
                    Constraint::equal(cv.leading(axis), &start, Strength::REQUIRED),
                    format!("{} starts the stack of {}", child_name, panel.name()),
                    &[id, child],
                ),
                Some((prev_id, pv)) => self.push(
                    Constraint::equal(
                        cv.leading(axis),
                        &pv.trailing(axis).offset(step),
                        Strength::REQUIRED,
                    ),
                    format!(
                        "{} follows {} with padding {}",
                        child_name,
                        tree.name_of(prev_id),
                        panel.padding
                    ),
                    &[id, prev_id, child],
                ),
            }
            self.push(
                Constraint::equal(cv.leading(cross), &aligned, Strength::REQUIRED),
                format!("{} aligned in {}", child_name, panel.name()),
                &[id, child],
            );
            previous = Some((child, cv));
        }
        Ok(())
    }

    /// `Fill` children of a stack share what the other children leave free.
    fn add_fill_group(
        &mut self,
        id: PanelId,
        panel: &Panel,
        vars: PanelVars,
        axis: Axis,
    ) -> Result<(), LayoutError> {
        let tree = self.tree;
        let children = tree.children(id);
        let mut fills: SmallVec<[PanelId; 4]> = SmallVec::new();
        for &child in children {
            if self.panel(child)?.spec(axis).is_fill() {
                fills.push(child);
            }
        }
        let Some((&first, rest)) = fills.split_first() else {
            return Ok(());
        };

        let gaps = panel.padding * (children.len() - 1) as f64;
        let mut total = Expression::from_constant(gaps);
        for &child in children {
            total.add_term(self.vars_of(child)?.size(axis), 1.0);
        }
        let mut involved: SmallVec<[PanelId; 4]> = smallvec![id];
        involved.extend(children.iter().copied());
        self.push(
            Constraint::equal(total, &vars.content_size(axis, &panel.margins), Strength::STRONG),
            format!("children of {} fill its content {}", panel.name(), axis),
            &involved,
        );

        let first_size: Expression = self.vars_of(first)?.size(axis).into();
        for &other in rest {
            let size: Expression = self.vars_of(other)?.size(axis).into();
            self.push(
                Constraint::equal(size, &first_size, Strength::REQUIRED),
                format!("{}.{} = {}.{}", tree.name_of(other), axis, tree.name_of(first), axis),
                &[id, first, other],
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figframe_constraint::{Relation, Solver};
    use figframe_core::Margins;

    fn register(tree: &PanelTree, solver: &mut Solver) -> IndexMap<PanelId, PanelVars> {
        tree.pre_order()
            .into_iter()
            .map(|id| {
                let vars = PanelVars {
                    x: solver.new_variable(),
                    y: solver.new_variable(),
                    width: solver.new_variable(),
                    height: solver.new_variable(),
                };
                (id, vars)
            })
            .collect()
    }

    #[test]
    fn test_fixed_root() {
        let tree = PanelTree::new(Panel::new("figure").with_width(10.0).with_height(5.0));
        let mut solver = Solver::new();
        let vars = register(&tree, &mut solver);
        let constraints = ConstraintBuilder::new(&tree, &vars).build().unwrap();

        let descriptions: Vec<&str> = constraints.iter().map(|c| c.description.as_str()).collect();
        assert!(descriptions.contains(&"figure.x = 0"));
        assert!(descriptions.contains(&"figure.width = 10"));
        assert!(descriptions.contains(&"figure.height = 5"));
        assert!(constraints.iter().all(|c| c.constraint.strength.is_required()));
    }

    #[test]
    fn test_cross_axis_from_children_prefers_minimum() {
        let mut tree = PanelTree::new(
            Panel::new("figure")
                .with_width(SizeSpec::FromChildren)
                .with_height(SizeSpec::FromChildren)
                .with_margins(Margins::uniform(1.0)),
        );
        tree.add_child("figure", Panel::new("a").with_width(3.0).with_height(1.0)).unwrap();
        tree.add_child("figure", Panel::new("b").with_width(4.0).with_height(1.0)).unwrap();

        let mut solver = Solver::new();
        let vars = register(&tree, &mut solver);
        let constraints = ConstraintBuilder::new(&tree, &vars).build().unwrap();

        let weak: Vec<_> = constraints
            .iter()
            .filter(|c| c.constraint.strength == Strength::WEAK)
            .collect();
        assert_eq!(weak.len(), 1);
        assert_eq!(weak[0].description, "content width of figure as small as possible");

        for c in &constraints {
            solver.add_constraint(&c.constraint).unwrap();
        }
        let root = vars[&tree.root()];
        assert!((solver.get_value(root.width) - 6.0).abs() < 1e-9);
        assert!((solver.get_value(root.height) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_siblings_split_equally() {
        let mut tree = PanelTree::new(
            Panel::new("figure")
                .with_width(10.0)
                .with_height(10.0)
                .with_arrangement(Arrangement::HorizontalStack)
                .with_padding(1.0),
        );
        tree.add_child("figure", Panel::new("a").with_width(3.0)).unwrap();
        tree.add_child("figure", Panel::new("b").with_width(SizeSpec::Fill)).unwrap();
        tree.add_child("figure", Panel::new("c").with_width(SizeSpec::Fill)).unwrap();

        let mut solver = Solver::new();
        let vars = register(&tree, &mut solver);
        let constraints = ConstraintBuilder::new(&tree, &vars).build().unwrap();
        let strong = constraints
            .iter()
            .filter(|c| c.constraint.strength == Strength::STRONG)
            .count();
        assert_eq!(strong, 1);

        for c in &constraints {
            solver.add_constraint(&c.constraint).unwrap();
        }
        let b = vars[&tree.id_of("b").unwrap()];
        let c = vars[&tree.id_of("c").unwrap()];
        assert!((solver.get_value(b.width) - 2.5).abs() < 1e-9);
        assert!((solver.get_value(c.width) - 2.5).abs() < 1e-9);
        assert!((solver.get_value(c.x) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_containment_is_emitted_per_child() {
        let mut tree = PanelTree::new(Panel::new("figure").with_width(4.0).with_height(4.0));
        tree.add_child("figure", Panel::new("a")).unwrap();

        let mut solver = Solver::new();
        let vars = register(&tree, &mut solver);
        let constraints = ConstraintBuilder::new(&tree, &vars).build().unwrap();
        let containment: Vec<_> = constraints
            .iter()
            .filter(|c| c.description == "figure contains a")
            .collect();
        assert_eq!(containment.len(), 4);
        assert_eq!(
            containment
                .iter()
                .filter(|c| c.constraint.relation == Relation::GreaterOrEqual)
                .count(),
            2
        );
    }
}
