//! Flex distribution scenarios and invariants.

use ember_tui::layout::flex::{FlexItem, resolve_flexible_lengths};
use ember_tui::layout::{LayoutBox, compute_layout};
use ember_tui::primitives::{BoxStyle, Node, box_primitive};
use ember_tui::types::{Dimension, Edges};
use proptest::prelude::*;

fn grower(factor: f32) -> Node {
    box_primitive(
        BoxStyle {
            flex_grow: factor,
            ..BoxStyle::default()
        },
        [],
    )
}

fn row(width: u16, children: impl IntoIterator<Item = Node>) -> Node {
    box_primitive(
        BoxStyle {
            width: Dimension::Cells(width),
            ..BoxStyle::row()
        },
        children,
    )
}

fn widths(layout: &LayoutBox) -> Vec<u16> {
    layout.children.iter().map(|c| c.rect.width).collect()
}

#[test]
fn fixed_plus_two_equal_growers() {
    let fixed = box_primitive(
        BoxStyle {
            width: Dimension::Cells(30),
            ..BoxStyle::default()
        },
        [],
    );
    let tree = row(100, [fixed, grower(1.0), grower(1.0)]);
    let layout = compute_layout(&tree, 120, 24).unwrap();
    assert_eq!(widths(&layout), vec![30, 35, 35]);
}

#[test]
fn weighted_growers() {
    let tree = row(100, [grower(1.0), grower(2.0), grower(1.0)]);
    let layout = compute_layout(&tree, 120, 24).unwrap();
    assert_eq!(widths(&layout), vec![25, 50, 25]);
}

#[test]
fn text_tree_layout_is_consistent() {
    let tree = box_primitive(
        BoxStyle {
            padding: Edges::all(1),
            ..BoxStyle::column()
        },
        [Node::from("alpha beta gamma delta"), Node::from("epsilon")],
    );
    let layout = compute_layout(&tree, 12, 24).unwrap();
    // Padding 1 leaves 10 columns: "alpha beta" / "gamma" / "delta".
    assert_eq!(layout.children[0].rect.height, 3);
    assert_eq!(layout.children[1].rect.y, 4);
    assert_eq!(layout.rect.height, 6);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn growers_consume_all_free_space(
        items in prop::collection::vec((0u16..40, 0.1f32..8.0, 0u16..4), 1..8),
        extra in 0u16..200,
    ) {
        let items: Vec<FlexItem> = items
            .into_iter()
            .map(|(base, grow, margin)| FlexItem { base, grow, shrink: 1.0, min: 0, max: u16::MAX, margin })
            .collect();
        let used: u16 = items.iter().map(|i| i.base + i.margin).sum();
        let available = used + extra;

        let sizes = resolve_flexible_lengths(&items, available);
        let total: u32 = sizes.iter().zip(&items).map(|(s, i)| *s as u32 + i.margin as u32).sum();
        prop_assert_eq!(total, available as u32);
        for (size, item) in sizes.iter().zip(&items) {
            prop_assert!(*size >= item.base);
        }
    }

    #[test]
    fn items_never_overflow_the_line(
        items in prop::collection::vec((0u16..120, 0.0f32..3.0, 0.0f32..3.0, 0u16..30, 0u16..5), 0..8),
        available in 0u16..300,
    ) {
        let items: Vec<FlexItem> = items
            .into_iter()
            .map(|(base, grow, shrink, min, margin)| FlexItem {
                base,
                grow,
                shrink,
                min: min.min(base),
                max: u16::MAX,
                margin,
            })
            .collect();
        let margins: u32 = items.iter().map(|i| i.margin as u32).sum();

        let sizes = resolve_flexible_lengths(&items, available);
        prop_assert_eq!(sizes.len(), items.len());
        let total: u32 = sizes.iter().zip(&items).map(|(s, i)| *s as u32 + i.margin as u32).sum();
        prop_assert!(total <= (available as u32).max(margins));
    }

    #[test]
    fn grower_rows_fill_their_width(
        factors in prop::collection::vec(0.1f32..6.0, 1..10),
        width in 0u16..240,
    ) {
        let tree = row(width, factors.iter().map(|f| grower(*f)));
        let layout = compute_layout(&tree, 300, 24).unwrap();
        let sum: u32 = layout.children.iter().map(|c| c.rect.width as u32).sum();
        prop_assert_eq!(sum, width as u32);

        let mut x = layout.content.x;
        for child in &layout.children {
            prop_assert_eq!(child.rect.x, x);
            prop_assert!(child.rect.right() <= layout.content.right());
            x = child.rect.right();
        }
    }
}
