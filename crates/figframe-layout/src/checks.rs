//! Local consistency checks before solving.
//!
//! Sizes that follow from fixed values alone are evaluated directly from the
//! tree. Conflicts between them are reported with the panels involved instead
//! of surfacing as an opaque solver rejection.

use std::collections::HashMap;

use figframe_core::{Arrangement, Axis, LayoutError, PanelId, PanelTree, SizeSpec};

/// Sizes known without solving, memoised per (panel, axis).
pub(crate) struct StaticSizes<'a> {
    tree: &'a PanelTree,
    cache: HashMap<(PanelId, Axis), Option<f64>>,
}

impl<'a> StaticSizes<'a> {
    /// The tree must have passed validation, so every lookup terminates.
    pub(crate) fn new(tree: &'a PanelTree) -> Self {
        Self {
            tree,
            cache: HashMap::new(),
        }
    }

    /// Outer size of a panel along an axis, if it is statically known.
    pub(crate) fn size(&mut self, id: PanelId, axis: Axis) -> Option<f64> {
        if let Some(known) = self.cache.get(&(id, axis)) {
            return *known;
        }
        let size = self.compute(id, axis);
        self.cache.insert((id, axis), size);
        size
    }

    /// Content size of a panel along an axis, if statically known.
    pub(crate) fn content(&mut self, id: PanelId, axis: Axis) -> Option<f64> {
        let margins = self.tree.get(id)?.margins.total(axis);
        self.size(id, axis).map(|s| s - margins)
    }

    fn compute(&mut self, id: PanelId, axis: Axis) -> Option<f64> {
        let tree = self.tree;
        let panel = tree.get(id)?;
        match panel.spec(axis) {
            SizeSpec::Fixed(v) => Some(*v),
            SizeSpec::FromParent => self.content(panel.parent()?, axis),
            SizeSpec::Named(target) => {
                let target = tree.id_of(target).ok()?;
                self.size(target, axis)
            }
            SizeSpec::Auto => {
                let ratio = panel.aspect?;
                let other = self.size(id, axis.cross())?;
                Some(match axis {
                    Axis::Horizontal => other * ratio,
                    Axis::Vertical => other / ratio,
                })
            }
            SizeSpec::Fill => {
                let parent_id = panel.parent()?;
                let parent = tree.get(parent_id)?;
                match parent.arrangement.stack_axis() {
                    // Depends on the solver's treatment of the whole group.
                    Some(stack) if stack == axis => None,
                    Some(_) => self.content(parent_id, axis),
                    None => self
                        .content(parent_id, axis)
                        .map(|c| c - panel.offset.along(axis)),
                }
            }
            SizeSpec::FromChildren => {
                let children = tree.children(id);
                let margins = panel.margins.total(axis);
                if panel.arrangement.stack_axis() == Some(axis) {
                    let mut total = panel.padding * children.len().saturating_sub(1) as f64;
                    for &child in children {
                        total += self.size(child, axis)?;
                    }
                    Some(total + margins)
                } else {
                    let free = panel.arrangement == Arrangement::Free;
                    let mut largest: f64 = 0.0;
                    for &child in children {
                        let offset = match tree.get(child) {
                            Some(c) if free => c.offset.along(axis),
                            _ => 0.0,
                        };
                        largest = largest.max(self.size(child, axis)? + offset);
                    }
                    Some(largest + margins)
                }
            }
        }
    }
}

/// Reject statically known sizes that cannot hold together.
pub(crate) fn check_static_sizes(tree: &PanelTree, tolerance: f64) -> Result<(), LayoutError> {
    let mut sizes = StaticSizes::new(tree);

    for (id, panel) in tree.iter() {
        let name = panel.name();

        for axis in Axis::BOTH {
            let margins = panel.margins.total(axis);
            if let Some(size) = sizes.size(id, axis) {
                if size + tolerance < margins {
                    return Err(unsatisfiable(
                        vec![name.to_string()],
                        format!("margins ({}) exceed the {} ({})", margins, axis, size),
                    ));
                }
            }
        }

        if let Some(ratio) = panel.aspect {
            let width = sizes.size(id, Axis::Horizontal);
            let height = sizes.size(id, Axis::Vertical);
            if let (Some(w), Some(h)) = (width, height) {
                if (w - ratio * h).abs() > tolerance {
                    return Err(unsatisfiable(
                        vec![name.to_string()],
                        format!("width {} and height {} break the aspect ratio {}", w, h, ratio),
                    ));
                }
            }
        }

        let children = tree.children(id);
        if children.is_empty() {
            continue;
        }
        for axis in Axis::BOTH {
            let Some(content) = sizes.content(id, axis) else {
                continue;
            };

            for &child in children {
                let Some(child_panel) = tree.get(child) else {
                    continue;
                };
                let offset = match panel.arrangement {
                    Arrangement::Free => child_panel.offset.along(axis),
                    _ => 0.0,
                };
                if let Some(size) = sizes.size(child, axis) {
                    if size + offset > content + tolerance {
                        return Err(unsatisfiable(
                            vec![name.to_string(), child_panel.name().to_string()],
                            format!(
                                "{} {} of '{}' exceeds the content {} {} of '{}'",
                                axis,
                                size + offset,
                                child_panel.name(),
                                axis,
                                content,
                                name
                            ),
                        ));
                    }
                }
            }

            if panel.arrangement.stack_axis() == Some(axis) {
                // Children whose size is not yet known take at least nothing.
                let mut known = panel.padding * (children.len() - 1) as f64;
                for &child in children {
                    known += sizes.size(child, axis).unwrap_or(0.0);
                }
                if known > content + tolerance {
                    let mut panels = vec![name.to_string()];
                    panels.extend(children.iter().map(|c| tree.name_of(*c).to_string()));
                    return Err(unsatisfiable(
                        panels,
                        format!(
                            "stacked children need {} {} but '{}' has {}",
                            known, axis, name, content
                        ),
                    ));
                }
            }
        }
    }
    Ok(())
}

fn unsatisfiable(panels: Vec<String>, reason: String) -> LayoutError {
    LayoutError::Unsatisfiable { panels, reason }
}
