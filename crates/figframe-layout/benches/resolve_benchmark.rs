//! Layout resolution benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use figframe_core::{Arrangement, Margins, Panel, PanelTree, SizeSpec};
use figframe_layout::resolve;

/// A vertical stack of rows, each split horizontally into `columns` panels.
fn grid(rows: usize, columns: usize) -> PanelTree {
    let mut tree = PanelTree::new(
        Panel::new("figure")
            .with_width(30.0)
            .with_height(SizeSpec::FromChildren)
            .with_margins(Margins::uniform(1.0))
            .with_padding(0.5),
    );
    for r in 0..rows {
        let row = format!("row{}", r);
        tree.add_child(
            "figure",
            Panel::new(row.clone())
                .with_height(2.0)
                .with_arrangement(Arrangement::HorizontalStack)
                .with_padding(0.25),
        )
        .unwrap();
        for c in 0..columns {
            tree.add_child(&row, Panel::new(format!("cell{}_{}", r, c)).with_width(SizeSpec::Fill))
                .unwrap();
        }
    }
    tree
}

fn resolve_small(c: &mut Criterion) {
    let tree = grid(3, 3);
    c.bench_function("resolve_3x3", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            resolve(black_box(&mut tree))
        })
    });
}

fn resolve_large(c: &mut Criterion) {
    let tree = grid(20, 10);
    c.bench_function("resolve_20x10", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            resolve(black_box(&mut tree))
        })
    });
}

criterion_group!(benches, resolve_small, resolve_large);
criterion_main!(benches);
