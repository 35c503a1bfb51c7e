//! Materialize a [`Layout`] as wrapper `div`s.

use crate::dom::{ArenaDom, ArenaNodeId, FRAGMENT_ROOT};

use super::strategy::LayoutStrategy;
use super::{Layout, LayoutColumn, LayoutItem, LayoutRow};

/// Render `layout` into a new fragment root and return it.
///
/// Content nodes are moved, not copied, from wherever they are in `dom`
/// into the new wrappers, so their ids stay valid for later processing.
pub fn render_layout(
    dom: &mut ArenaDom,
    layout: &Layout,
    strategy: &dyn LayoutStrategy,
) -> ArenaNodeId {
    let root = dom.create_tag(FRAGMENT_ROOT);
    render_items(dom, root, &layout.items, strategy);
    root
}

fn render_items(
    dom: &mut ArenaDom,
    parent: ArenaNodeId,
    items: &[LayoutItem],
    strategy: &dyn LayoutStrategy,
) {
    for item in items {
        match item {
            LayoutItem::Content(node) => dom.append(parent, *node),
            LayoutItem::Row(row) => {
                let row_div = render_row(dom, row, strategy);
                dom.append(parent, row_div);
            }
        }
    }
}

fn render_row(dom: &mut ArenaDom, row: &LayoutRow, strategy: &dyn LayoutStrategy) -> ArenaNodeId {
    let logical = row.logical_width();
    let actual = row.columns.len();

    let mut classes = strategy.row_classes(logical, actual);
    classes.extend(sorted_names(row.classes.iter().map(|c| c.name.clone())));
    let row_div = wrapper(dom, &classes);

    for (i, col) in row.columns.iter().enumerate() {
        let col_div = render_column(dom, col, i + 1, actual, strategy);
        dom.append(row_div, col_div);
    }
    row_div
}

fn render_column(
    dom: &mut ArenaDom,
    col: &LayoutColumn,
    position: usize,
    actual: usize,
    strategy: &dyn LayoutStrategy,
) -> ArenaNodeId {
    let (outer, inner) = strategy.split_column_classes(&col.classes);

    let mut classes = strategy.column_classes(position, actual);
    classes.extend(sorted_names(outer));
    let col_div = wrapper(dom, &classes);

    let content_parent = if strategy.use_inner_column_div() {
        let inner_div = wrapper(dom, &sorted_names(inner));
        dom.append(col_div, inner_div);
        inner_div
    } else {
        col_div
    };

    render_items(dom, content_parent, &col.items, strategy);
    col_div
}

fn wrapper(dom: &mut ArenaDom, classes: &[String]) -> ArenaNodeId {
    let div = dom.create_tag("div");
    if !classes.is_empty() {
        dom.set_attr(div, "class", classes.join(" "));
    }
    div
}

fn sorted_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut names: Vec<String> = names.into_iter().collect();
    names.sort();
    names.dedup();
    names
}
