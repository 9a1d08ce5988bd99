//! The panel tree.
//!
//! Panels live in an arena owned by [`PanelTree`]; parent links are plain
//! [`PanelId`] indices, so ownership flows strictly from the tree to its
//! panels. Names are unique across the whole tree, which makes lookup by name
//! unambiguous.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;

use crate::errors::TreeError;
use crate::panel::{Panel, PanelId};
use crate::types::{Bounds, Size};

/// A tree of panels rooted at the figure.
#[derive(Debug, Clone)]
pub struct PanelTree {
    /// All panels, in insertion order
    panels: IndexMap<PanelId, Panel>,
    /// Name index
    names: HashMap<String, PanelId>,
    root: PanelId,
    /// Counter for generating unique IDs
    next_id: u32,
}

impl PanelTree {
    /// Create a tree whose root (the figure) is `root`.
    ///
    /// Any parent or child links already present on `root` are discarded.
    pub fn new(mut root: Panel) -> Self {
        root.parent = None;
        root.children.clear();
        root.resolved = None;

        let id = PanelId(0);
        let mut names = HashMap::new();
        names.insert(root.name().to_string(), id);
        let mut panels = IndexMap::new();
        panels.insert(id, root);

        Self {
            panels,
            names,
            root: id,
            next_id: 1,
        }
    }

    /// ID of the root panel.
    pub fn root(&self) -> PanelId {
        self.root
    }

    /// The root panel.
    pub fn root_panel(&self) -> &Panel {
        &self.panels[&self.root]
    }

    /// Number of panels, including the root.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Get a panel by ID.
    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(&id)
    }

    /// Whether a panel with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Look up the ID of a named panel.
    pub fn id_of(&self, name: &str) -> Result<PanelId, TreeError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| TreeError::NotFound {
                name: name.to_string(),
            })
    }

    /// Find a panel by name anywhere in the tree.
    pub fn find(&self, name: &str) -> Result<&Panel, TreeError> {
        let id = self.id_of(name)?;
        Ok(&self.panels[&id])
    }

    /// Find a panel by name for modification.
    ///
    /// Every resolved box in the tree is cleared, since any change to one
    /// panel can move all the others.
    pub fn find_mut(&mut self, name: &str) -> Result<&mut Panel, TreeError> {
        let id = self.id_of(name)?;
        self.clear_resolved();
        self.panels.get_mut(&id).ok_or_else(|| TreeError::NotFound {
            name: name.to_string(),
        })
    }

    /// Append `panel` as the last child of the panel named `parent`.
    pub fn add_child(&mut self, parent: &str, mut panel: Panel) -> Result<PanelId, TreeError> {
        let parent_id = self
            .names
            .get(parent)
            .copied()
            .ok_or_else(|| TreeError::UnknownParent {
                name: parent.to_string(),
            })?;
        if self.names.contains_key(panel.name()) {
            return Err(TreeError::DuplicateName {
                name: panel.name().to_string(),
            });
        }

        let id = PanelId(self.next_id);
        self.next_id += 1;

        panel.parent = Some(parent_id);
        panel.children.clear();
        panel.resolved = None;

        trace!("add panel '{}' under '{}'", panel.name(), parent);
        self.names.insert(panel.name().to_string(), id);
        self.panels.insert(id, panel);
        if let Some(p) = self.panels.get_mut(&parent_id) {
            p.children.push(id);
        }

        self.clear_resolved();
        Ok(id)
    }

    /// Detach the named panel and its whole subtree.
    ///
    /// Returns the removed panels in pre-order. Size references elsewhere in
    /// the tree that point into the removed subtree are left in place and are
    /// reported by the next validation.
    pub fn remove(&mut self, name: &str) -> Result<Vec<Panel>, TreeError> {
        let id = self.id_of(name)?;
        if id == self.root {
            return Err(TreeError::CannotRemoveRoot {
                name: name.to_string(),
            });
        }

        let subtree = self.subtree(id);
        if let Some(parent_id) = self.panels[&id].parent {
            if let Some(parent) = self.panels.get_mut(&parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }

        let removed: Vec<Panel> = subtree
            .iter()
            .filter_map(|pid| self.panels.shift_remove(pid))
            .collect();
        for panel in &removed {
            self.names.remove(panel.name());
        }
        trace!("removed {} panel(s) starting at '{}'", removed.len(), name);

        self.clear_resolved();
        Ok(removed)
    }

    /// Children of a panel, in order.
    pub fn children(&self, id: PanelId) -> &[PanelId] {
        self.panels.get(&id).map_or(&[], |p| p.children())
    }

    /// Parent of a panel (None for the root).
    pub fn parent(&self, id: PanelId) -> Option<PanelId> {
        self.panels.get(&id).and_then(|p| p.parent)
    }

    /// IDs of a panel and all its descendants, in pre-order.
    pub fn subtree(&self, id: PanelId) -> Vec<PanelId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(panel) = self.panels.get(&current) {
                order.push(current);
                stack.extend(panel.children.iter().rev().copied());
            }
        }
        order
    }

    /// All panel IDs in pre-order (parents before children, siblings in order).
    pub fn pre_order(&self) -> Vec<PanelId> {
        self.subtree(self.root)
    }

    /// All panel IDs in post-order (children before parents).
    pub fn post_order(&self) -> Vec<PanelId> {
        let mut order = Vec::with_capacity(self.panels.len());
        let mut stack = vec![(self.root, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            stack.push((current, true));
            for &child in self.children(current).iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }

    /// Iterate over panels in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (PanelId, &Panel)> + '_ {
        self.pre_order()
            .into_iter()
            .filter_map(move |id| self.panels.get(&id).map(|p| (id, p)))
    }

    /// Names from the root down to the given panel.
    pub fn path(&self, id: PanelId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(pid) = current {
            match self.panels.get(&pid) {
                Some(panel) => {
                    path.push(panel.name());
                    current = panel.parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Name of a panel, or an empty string for a stale ID.
    pub fn name_of(&self, id: PanelId) -> &str {
        self.panels.get(&id).map_or("", |p| p.name())
    }

    /// Forget every resolved box.
    pub fn clear_resolved(&mut self) {
        for panel in self.panels.values_mut() {
            panel.resolved = None;
        }
    }

    /// Install the boxes computed by a resolution pass.
    ///
    /// Panels without an entry in `boxes` end up with no resolved box.
    pub fn apply_resolved(&mut self, boxes: &IndexMap<PanelId, Bounds>) {
        for (id, panel) in self.panels.iter_mut() {
            panel.resolved = boxes.get(id).copied();
        }
    }

    /// Outer size of the figure from the last resolution pass.
    pub fn figure_size(&self) -> Option<Size> {
        self.root_panel().resolved_box().map(|b| b.size())
    }

    /// Content size of the figure (inside the root margins) from the last
    /// resolution pass.
    pub fn base_size(&self) -> Option<Size> {
        self.root_panel().resolved_content().map(|b| b.size())
    }
}
