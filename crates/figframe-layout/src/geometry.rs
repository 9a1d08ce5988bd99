//! The result of a resolution pass.

use indexmap::IndexMap;

use figframe_core::{Bounds, PanelId, PanelTree, Size};

/// Immutable snapshot of every resolved box, keyed by panel name in pre-order.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    boxes: IndexMap<String, Bounds>,
    figure_size: Size,
    base_size: Size,
}

impl Geometry {
    pub(crate) fn new(tree: &PanelTree, boxes: &IndexMap<PanelId, Bounds>) -> Self {
        let named: IndexMap<String, Bounds> = tree
            .iter()
            .filter_map(|(id, panel)| boxes.get(&id).map(|b| (panel.name().to_string(), *b)))
            .collect();

        let root = tree.root_panel();
        let outer = boxes.get(&tree.root()).copied().unwrap_or_default();
        let m = &root.margins;
        let content = outer.inset(m.left, m.right, m.top, m.bottom);

        Self {
            boxes: named,
            figure_size: outer.size(),
            base_size: content.size(),
        }
    }

    /// Box of a panel by name.
    pub fn get(&self, name: &str) -> Option<Bounds> {
        self.boxes.get(name).copied()
    }

    /// Outer size of the figure.
    pub fn figure_size(&self) -> Size {
        self.figure_size
    }

    /// Size of the figure's content area.
    pub fn base_size(&self) -> Size {
        self.base_size
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Panel names and boxes, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Bounds)> + '_ {
        self.boxes.iter().map(|(name, b)| (name.as_str(), *b))
    }

    /// Distance from the top edge of the figure down to the top edge of a
    /// panel, the way figure layouts are usually described.
    pub fn from_top(&self, name: &str) -> Option<f64> {
        let b = self.get(name)?;
        Some(self.figure_size.height - b.top())
    }
}
