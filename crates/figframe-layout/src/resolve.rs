//! Reading solved values back into boxes and checking them.

use indexmap::IndexMap;

use figframe_core::{Axis, Bounds, LayoutError, Panel, PanelId, PanelTree, SizeSpec};

use crate::session::Solution;

/// Build the box of every panel from a solution, children before parents.
pub(crate) fn read_boxes(
    tree: &PanelTree,
    solution: &Solution,
) -> Result<IndexMap<PanelId, Bounds>, LayoutError> {
    let mut boxes = IndexMap::with_capacity(tree.len());
    for id in tree.post_order() {
        let bounds = solution.bounds(id).ok_or_else(|| LayoutError::SolverInternal {
            reason: format!("no solved values for panel '{}'", tree.name_of(id)),
        })?;
        boxes.insert(id, bounds);
    }
    Ok(boxes)
}

/// Check solved boxes against the structural rules of the tree.
pub(crate) struct GeometryCheck<'a> {
    tree: &'a PanelTree,
    boxes: &'a IndexMap<PanelId, Bounds>,
    tolerance: f64,
}

impl<'a> GeometryCheck<'a> {
    pub(crate) fn new(
        tree: &'a PanelTree,
        boxes: &'a IndexMap<PanelId, Bounds>,
        tolerance: f64,
    ) -> Self {
        Self {
            tree,
            boxes,
            tolerance,
        }
    }

    /// Visit panels in post-order, so the deepest failure is reported first.
    pub(crate) fn run(&self) -> Result<(), LayoutError> {
        for id in self.tree.post_order() {
            let panel = self.tree.get(id).ok_or_else(|| LayoutError::SolverInternal {
                reason: format!("stale panel id {}", id.index()),
            })?;
            self.check_panel(id, panel)?;
        }
        Ok(())
    }

    fn bounds(&self, id: PanelId) -> Result<Bounds, LayoutError> {
        self.boxes
            .get(&id)
            .copied()
            .ok_or_else(|| self.inconsistent(id, "no resolved box".to_string()))
    }

    fn close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.tolerance
    }

    fn inconsistent(&self, id: PanelId, detail: String) -> LayoutError {
        LayoutError::Inconsistency {
            panel: self.tree.name_of(id).to_string(),
            detail,
        }
    }

    fn check_panel(&self, id: PanelId, panel: &Panel) -> Result<(), LayoutError> {
        let outer = self.bounds(id)?;
        let m = &panel.margins;
        let content = outer.inset(m.left, m.right, m.top, m.bottom);

        for axis in Axis::BOTH {
            let extent = content.size().along(axis);
            if extent < -self.tolerance {
                return Err(self.inconsistent(id, format!("negative content {} {}", axis, extent)));
            }
            self.check_spec(id, panel, outer, axis)?;
        }

        if let Some(ratio) = panel.aspect {
            if !self.close(outer.width, ratio * outer.height) {
                return Err(self.inconsistent(
                    id,
                    format!(
                        "{} x {} does not have aspect ratio {}",
                        outer.width, outer.height, ratio
                    ),
                ));
            }
        }

        let children = self.tree.children(id);
        for &child in children {
            let b = self.bounds(child)?;
            if !content.contains_bounds(&b, self.tolerance) {
                return Err(self.inconsistent(
                    child,
                    format!("extends outside the content area of '{}'", panel.name()),
                ));
            }
        }

        if let Some(axis) = panel.arrangement.stack_axis() {
            self.check_stack(id, panel, content, axis)?;
        }
        Ok(())
    }

    /// Sizes that must come out exactly as specified.
    fn check_spec(
        &self,
        id: PanelId,
        panel: &Panel,
        outer: Bounds,
        axis: Axis,
    ) -> Result<(), LayoutError> {
        let size = outer.size().along(axis);
        let expected = match panel.spec(axis) {
            SizeSpec::Fixed(v) => *v,
            SizeSpec::Named(target) => {
                let target = self.tree.id_of(target)?;
                self.bounds(target)?.size().along(axis)
            }
            _ => return Ok(()),
        };
        if self.close(size, expected) {
            Ok(())
        } else {
            Err(self.inconsistent(
                id,
                format!("{} is {} instead of {} ({})", axis, size, expected, panel.spec(axis)),
            ))
        }
    }

    fn check_stack(
        &self,
        id: PanelId,
        panel: &Panel,
        content: Bounds,
        axis: Axis,
    ) -> Result<(), LayoutError> {
        let children = self.tree.children(id);
        let mut total = panel.padding * children.len().saturating_sub(1) as f64;
        let mut previous: Option<(PanelId, Bounds)> = None;

        for &child in children {
            let b = self.bounds(child)?;
            total += b.size().along(axis);
            if let Some((prev_id, prev)) = previous {
                // Gap between the trailing edge of one child and the leading
                // edge of the next, measured in reading order.
                let gap = match axis {
                    Axis::Horizontal => b.x - prev.right(),
                    Axis::Vertical => prev.y - b.top(),
                };
                if !self.close(gap, panel.padding) {
                    return Err(self.inconsistent(
                        child,
                        format!(
                            "sits {} after '{}' but the padding of '{}' is {}",
                            gap,
                            self.tree.name_of(prev_id),
                            panel.name(),
                            panel.padding
                        ),
                    ));
                }
            }
            previous = Some((child, b));
        }

        if panel.spec(axis) == &SizeSpec::FromChildren {
            let extent = content.size().along(axis);
            if !self.close(extent, total) {
                return Err(self.inconsistent(
                    id,
                    format!(
                        "content {} is {} but its stacked children need {}",
                        axis, extent, total
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figframe_core::{Margins, Panel};

    fn stacked() -> PanelTree {
        let mut tree = PanelTree::new(
            Panel::new("figure")
                .with_width(4.0)
                .with_height(SizeSpec::FromChildren)
                .with_padding(1.0),
        );
        tree.add_child("figure", Panel::new("a").with_height(1.0)).unwrap();
        tree.add_child("figure", Panel::new("b").with_height(1.0)).unwrap();
        tree
    }

    fn boxes(tree: &PanelTree, entries: &[(&str, Bounds)]) -> IndexMap<PanelId, Bounds> {
        entries
            .iter()
            .map(|(name, b)| (tree.id_of(name).unwrap(), *b))
            .collect()
    }

    #[test]
    fn test_valid_stack() {
        let tree = stacked();
        let boxes = boxes(
            &tree,
            &[
                ("figure", Bounds::new(0.0, 0.0, 4.0, 3.0)),
                ("a", Bounds::new(0.0, 2.0, 4.0, 1.0)),
                ("b", Bounds::new(0.0, 0.0, 4.0, 1.0)),
            ],
        );
        assert_eq!(GeometryCheck::new(&tree, &boxes, 1e-6).run(), Ok(()));
    }

    #[test]
    fn test_wrong_padding() {
        let tree = stacked();
        let boxes = boxes(
            &tree,
            &[
                ("figure", Bounds::new(0.0, 0.0, 4.0, 3.0)),
                ("a", Bounds::new(0.0, 2.0, 4.0, 1.0)),
                ("b", Bounds::new(0.0, 0.5, 4.0, 1.0)),
            ],
        );
        let err = GeometryCheck::new(&tree, &boxes, 1e-6).run().unwrap_err();
        assert!(matches!(err, LayoutError::Inconsistency { ref panel, .. } if panel == "b"));
    }

    #[test]
    fn test_escaping_child() {
        let mut tree = PanelTree::new(
            Panel::new("figure")
                .with_width(4.0)
                .with_height(4.0)
                .with_margins(Margins::uniform(1.0)),
        );
        tree.add_child("figure", Panel::new("a")).unwrap();
        let boxes = boxes(
            &tree,
            &[
                ("figure", Bounds::new(0.0, 0.0, 4.0, 4.0)),
                ("a", Bounds::new(0.5, 1.0, 2.0, 2.0)),
            ],
        );
        let err = GeometryCheck::new(&tree, &boxes, 1e-6).run().unwrap_err();
        assert_eq!(err.panels(), vec!["a"]);
    }

    #[test]
    fn test_fixed_size_mismatch() {
        let tree = PanelTree::new(Panel::new("figure").with_width(4.0).with_height(4.0));
        let boxes = boxes(&tree, &[("figure", Bounds::new(0.0, 0.0, 4.0, 3.0))]);
        let err = GeometryCheck::new(&tree, &boxes, 1e-6).run().unwrap_err();
        assert!(err.to_string().contains("height is 3 instead of 4"));
    }

    #[test]
    fn test_tolerance_is_absolute() {
        let tree = PanelTree::new(Panel::new("figure").with_width(1000.0).with_height(1.0));
        let off_by = |delta: f64| {
            let boxes = boxes(&tree, &[("figure", Bounds::new(0.0, 0.0, 1000.0 + delta, 1.0))]);
            GeometryCheck::new(&tree, &boxes, 1e-6).run()
        };
        assert_eq!(off_by(5e-7), Ok(()));
        assert!(matches!(off_by(5e-4), Err(LayoutError::Inconsistency { .. })));
    }
}
