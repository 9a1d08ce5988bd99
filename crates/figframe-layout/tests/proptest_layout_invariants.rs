//! Property-based invariant tests for layout resolution.
//!
//! 1. Fixed sizes come out exactly as specified.
//! 2. A stack sized from its children is their sum plus padding.
//! 3. Consecutive stack children are separated by exactly the padding.
//! 4. Every child lies inside its parent's content area.
//! 5. Fill siblings share the leftover space equally.
//! 6. Resolving twice gives the same geometry.

use figframe_core::{Arrangement, Bounds, Margins, Panel, PanelTree, SizeSpec};
use figframe_layout::resolve;
use proptest::prelude::*;

const EPS: f64 = 1e-6;

// ── Helpers ─────────────────────────────────────────────────────────────

fn margins_strategy() -> impl Strategy<Value = Margins> {
    (0.0..2.0f64, 0.0..2.0f64, 0.0..2.0f64, 0.0..2.0f64)
        .prop_map(|(l, r, t, b)| Margins::new(l, r, t, b))
}

fn arrangement_strategy() -> impl Strategy<Value = Arrangement> {
    prop_oneof![
        Just(Arrangement::HorizontalStack),
        Just(Arrangement::VerticalStack),
    ]
}

/// A figure whose size along the stack axis comes from fixed-size children.
fn stacked_tree(
    arrangement: Arrangement,
    margins: Margins,
    padding: f64,
    sizes: &[f64],
) -> PanelTree {
    let horizontal = arrangement == Arrangement::HorizontalStack;
    let root = Panel::new("figure")
        .with_arrangement(arrangement)
        .with_margins(margins)
        .with_padding(padding);
    let root = if horizontal {
        root.with_width(SizeSpec::FromChildren).with_height(12.0)
    } else {
        root.with_width(12.0).with_height(SizeSpec::FromChildren)
    };

    let mut tree = PanelTree::new(root);
    for (i, size) in sizes.iter().enumerate() {
        let panel = Panel::new(format!("p{}", i));
        let panel = if horizontal {
            panel.with_width(*size)
        } else {
            panel.with_height(*size)
        };
        tree.add_child("figure", panel).unwrap();
    }
    tree
}

// ═════════════════════════════════════════════════════════════════════════
// 1-4. Stacks sized from fixed children
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stack_from_children_invariants(
        arrangement in arrangement_strategy(),
        margins in margins_strategy(),
        padding in 0.0..1.0f64,
        sizes in prop::collection::vec(0.5..5.0f64, 1..6),
    ) {
        let mut tree = stacked_tree(arrangement, margins, padding, &sizes);
        let geometry = resolve(&mut tree).unwrap();
        let horizontal = arrangement == Arrangement::HorizontalStack;

        let expected: f64 = sizes.iter().sum::<f64>() + padding * (sizes.len() - 1) as f64;
        let base = geometry.base_size();
        let base_extent = if horizontal { base.width } else { base.height };
        prop_assert!((base_extent - expected).abs() < EPS, "base {} != {}", base_extent, expected);

        let figure = geometry.get("figure").unwrap();
        let content = figure.inset(margins.left, margins.right, margins.top, margins.bottom);
        let mut previous: Option<Bounds> = None;
        for (i, size) in sizes.iter().enumerate() {
            let b = geometry.get(&format!("p{}", i)).unwrap();
            let extent = if horizontal { b.width } else { b.height };
            prop_assert!((extent - size).abs() < EPS);
            prop_assert!(content.contains_bounds(&b, EPS));

            if let Some(prev) = previous {
                let gap = if horizontal { b.x - prev.right() } else { prev.y - b.top() };
                prop_assert!((gap - padding).abs() < EPS, "gap {} != padding {}", gap, padding);
            }
            previous = Some(b);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Fill siblings split the remainder equally
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fill_siblings_split_equally(
        fixed in 0.5..3.0f64,
        fills in 1usize..5,
        padding in 0.0..0.5f64,
    ) {
        let mut tree = PanelTree::new(
            Panel::new("figure")
                .with_width(8.0)
                .with_height(20.0)
                .with_padding(padding),
        );
        tree.add_child("figure", Panel::new("fixed").with_height(fixed)).unwrap();
        for i in 0..fills {
            tree.add_child("figure", Panel::new(format!("f{}", i)).with_height(SizeSpec::Fill))
                .unwrap();
        }

        let geometry = resolve(&mut tree).unwrap();
        let share = (20.0 - fixed - padding * fills as f64) / fills as f64;
        for i in 0..fills {
            let h = geometry.get(&format!("f{}", i)).unwrap().height;
            prop_assert!((h - share).abs() < EPS, "fill {} != {}", h, share);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Resolution is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolve_is_idempotent(
        arrangement in arrangement_strategy(),
        margins in margins_strategy(),
        sizes in prop::collection::vec(0.5..5.0f64, 1..4),
    ) {
        let mut tree = stacked_tree(arrangement, margins, 0.25, &sizes);
        let first = resolve(&mut tree).unwrap();
        let second = resolve(&mut tree).unwrap();
        prop_assert_eq!(first, second);
    }
}
