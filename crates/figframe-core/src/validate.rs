//! Structural validation of a panel tree.
//!
//! Runs at the start of every resolution pass, before any constraint is built.

use std::collections::HashSet;

use crate::errors::TreeError;
use crate::panel::{Panel, PanelId};
use crate::spec::{Axis, SizeSpec};
use crate::tree::PanelTree;

/// One dimension of one panel.
type SizeNode = (PanelId, Axis);

impl PanelTree {
    /// Check the tree for structural errors.
    ///
    /// Verifies numeric fields, root specifiers, size references, `FromChildren`
    /// usage, aspect-driven axes, and that no size depends on itself.
    pub fn validate(&self) -> Result<(), TreeError> {
        for (id, panel) in self.iter() {
            check_values(panel)?;
            for axis in Axis::BOTH {
                self.check_spec(id, panel, axis)?;
            }
            check_aspect(panel)?;
        }
        self.check_cycles()
    }

    fn check_spec(&self, id: PanelId, panel: &Panel, axis: Axis) -> Result<(), TreeError> {
        let spec = panel.spec(axis);
        if id == self.root() && matches!(spec, SizeSpec::FromParent | SizeSpec::Fill) {
            return Err(TreeError::InvalidRootSpec {
                axis,
                spec: spec.to_string(),
            });
        }
        match spec {
            SizeSpec::Named(target) if !self.contains(target) => Err(TreeError::DanglingReference {
                panel: panel.name().to_string(),
                axis,
                target: target.clone(),
            }),
            SizeSpec::FromChildren if !panel.has_children() => {
                Err(TreeError::FromChildrenWithoutChildren {
                    panel: panel.name().to_string(),
                    axis,
                })
            }
            _ => Ok(()),
        }
    }

    /// Depth-first search over size dependencies.
    fn check_cycles(&self) -> Result<(), TreeError> {
        let mut done = HashSet::new();
        let mut stack = Vec::new();
        for id in self.pre_order() {
            for axis in Axis::BOTH {
                self.visit((id, axis), &mut done, &mut stack)?;
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        node: SizeNode,
        done: &mut HashSet<SizeNode>,
        stack: &mut Vec<SizeNode>,
    ) -> Result<(), TreeError> {
        if done.contains(&node) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|n| *n == node) {
            let mut cycle: Vec<String> = stack[pos..].iter().map(|n| self.node_label(*n)).collect();
            cycle.push(self.node_label(node));
            return Err(TreeError::CyclicReference { cycle });
        }

        stack.push(node);
        for dep in self.size_dependencies(node) {
            self.visit(dep, done, stack)?;
        }
        stack.pop();
        done.insert(node);
        Ok(())
    }

    /// The sizes that must be known before this one can be.
    pub(crate) fn size_dependencies(&self, (id, axis): SizeNode) -> Vec<SizeNode> {
        let Some(panel) = self.get(id) else {
            return Vec::new();
        };
        match panel.spec(axis) {
            SizeSpec::Fixed(_) => Vec::new(),
            SizeSpec::FromParent => panel.parent().map(|p| (p, axis)).into_iter().collect(),
            SizeSpec::Fill => {
                let Some(parent_id) = panel.parent() else {
                    return Vec::new();
                };
                let mut deps = vec![(parent_id, axis)];
                let stacked = self
                    .get(parent_id)
                    .is_some_and(|p| p.arrangement.stack_axis() == Some(axis));
                if stacked {
                    deps.extend(
                        self.children(parent_id)
                            .iter()
                            .filter(|&&sibling| {
                                self.get(sibling).is_some_and(|s| !s.spec(axis).is_fill())
                            })
                            .map(|&sibling| (sibling, axis)),
                    );
                }
                deps
            }
            SizeSpec::FromChildren => panel.children().iter().map(|&c| (c, axis)).collect(),
            SizeSpec::Named(target) => self
                .id_of(target)
                .ok()
                .map(|t| (t, axis))
                .into_iter()
                .collect(),
            SizeSpec::Auto => vec![(id, axis.cross())],
        }
    }

    fn node_label(&self, (id, axis): SizeNode) -> String {
        format!("{}.{}", self.name_of(id), axis)
    }
}

fn check_values(panel: &Panel) -> Result<(), TreeError> {
    let invalid = |field: &'static str, value: f64| TreeError::InvalidValue {
        panel: panel.name().to_string(),
        field,
        value,
    };
    let non_negative = |v: f64| v.is_finite() && v >= 0.0;

    for (field, value) in panel.margins.fields() {
        if !non_negative(value) {
            return Err(invalid(field, value));
        }
    }
    if !non_negative(panel.padding) {
        return Err(invalid("padding", panel.padding));
    }
    if !non_negative(panel.offset.x) {
        return Err(invalid("offset_x", panel.offset.x));
    }
    if !non_negative(panel.offset.y) {
        return Err(invalid("offset_y", panel.offset.y));
    }
    for axis in Axis::BOTH {
        if let SizeSpec::Fixed(v) = panel.spec(axis) {
            if !non_negative(*v) {
                return Err(invalid(axis.dimension(), *v));
            }
        }
    }
    if let Some(ratio) = panel.aspect {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(invalid("aspect", ratio));
        }
    }
    Ok(())
}

fn check_aspect(panel: &Panel) -> Result<(), TreeError> {
    let auto_axes = Axis::BOTH
        .iter()
        .filter(|a| matches!(panel.spec(**a), SizeSpec::Auto))
        .count();
    let reason = match (auto_axes, panel.aspect) {
        (0, _) => return Ok(()),
        (1, Some(_)) => return Ok(()),
        (1, None) => "an Auto axis needs an aspect ratio",
        _ => "width and height cannot both be Auto",
    };
    Err(TreeError::UnderdeterminedSize {
        panel: panel.name().to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Arrangement, Margins};
    use pretty_assertions::assert_eq;

    fn figure() -> PanelTree {
        PanelTree::new(
            Panel::new("figure")
                .with_width(10.0)
                .with_height(SizeSpec::FromChildren),
        )
    }

    #[test]
    fn test_valid_tree() {
        let mut tree = figure();
        tree.add_child("figure", Panel::new("a").with_height(5.0)).unwrap();
        tree.add_child("figure", Panel::new("b").with_height(SizeSpec::named("a"))).unwrap();
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_named_cycle() {
        let mut tree = PanelTree::new(Panel::new("figure").with_width(10.0).with_height(5.0));
        tree.add_child("figure", Panel::new("a").with_width(SizeSpec::named("b"))).unwrap();
        tree.add_child("figure", Panel::new("b").with_width(SizeSpec::named("a"))).unwrap();

        let err = tree.validate().unwrap_err();
        assert_eq!(
            err,
            TreeError::CyclicReference {
                cycle: vec!["a.width".into(), "b.width".into(), "a.width".into()],
            }
        );
    }

    #[test]
    fn test_self_reference() {
        let mut tree = PanelTree::new(Panel::new("figure").with_width(10.0).with_height(5.0));
        tree.add_child("figure", Panel::new("a").with_height(SizeSpec::named("a"))).unwrap();
        assert!(matches!(tree.validate(), Err(TreeError::CyclicReference { .. })));
    }

    #[test]
    fn test_from_parent_under_from_children_is_cyclic() {
        // figure height comes from children, child height from the figure
        let mut tree = figure();
        tree.add_child("figure", Panel::new("a")).unwrap();
        assert!(matches!(tree.validate(), Err(TreeError::CyclicReference { .. })));
    }

    #[test]
    fn test_fill_under_from_children_is_cyclic() {
        let mut tree = figure();
        tree.add_child("figure", Panel::new("a").with_height(2.0)).unwrap();
        tree.add_child("figure", Panel::new("b").with_height(SizeSpec::Fill)).unwrap();
        assert!(matches!(tree.validate(), Err(TreeError::CyclicReference { .. })));
    }

    #[test]
    fn test_dangling_reference_after_remove() {
        let mut tree = figure();
        tree.add_child("figure", Panel::new("a").with_height(5.0)).unwrap();
        tree.add_child("figure", Panel::new("b").with_height(SizeSpec::named("a"))).unwrap();
        tree.remove("a").unwrap();

        assert_eq!(
            tree.validate(),
            Err(TreeError::DanglingReference {
                panel: "b".into(),
                axis: Axis::Vertical,
                target: "a".into(),
            })
        );
    }

    #[test]
    fn test_from_children_requires_children() {
        let tree = figure();
        assert_eq!(
            tree.validate(),
            Err(TreeError::FromChildrenWithoutChildren {
                panel: "figure".into(),
                axis: Axis::Vertical,
            })
        );
    }

    #[test]
    fn test_invalid_root_spec() {
        let tree = PanelTree::new(Panel::new("figure").with_height(3.0));
        assert_eq!(
            tree.validate(),
            Err(TreeError::InvalidRootSpec {
                axis: Axis::Horizontal,
                spec: "FromParent".into(),
            })
        );
    }

    #[test]
    fn test_auto_needs_aspect() {
        let figure = Panel::new("figure").with_width(10.0).with_height(SizeSpec::Auto);
        let mut tree = PanelTree::new(figure);
        assert!(matches!(
            tree.validate(),
            Err(TreeError::UnderdeterminedSize { .. })
        ));

        tree.find_mut("figure").unwrap().aspect = Some(4.0);
        assert_eq!(tree.validate(), Ok(()));

        tree.find_mut("figure").unwrap().width = SizeSpec::Auto;
        assert!(matches!(
            tree.validate(),
            Err(TreeError::UnderdeterminedSize { .. })
        ));
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut tree = PanelTree::new(
            Panel::new("figure")
                .with_width(10.0)
                .with_height(5.0)
                .with_margins(Margins::new(1.0, -0.5, 0.0, 0.0)),
        );
        assert_eq!(
            tree.validate(),
            Err(TreeError::InvalidValue {
                panel: "figure".into(),
                field: "margin_right",
                value: -0.5,
            })
        );

        let root = tree.find_mut("figure").unwrap();
        root.margins = Margins::default();
        root.arrangement = Arrangement::Free;
        root.aspect = Some(0.0);
        assert!(matches!(
            tree.validate(),
            Err(TreeError::InvalidValue { field: "aspect", .. })
        ));
    }
}
