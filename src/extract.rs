//! Recovering presentation from decorated markup.
//!
//! There is no metadata in the decorated markup: rows and columns are
//! recognised from the position of each section inside wrapper `div`s and
//! from the classes the layout strategy puts on them.

use crate::dom::tree::{ancestors, eliminate_tag, element_index, get_parent};
use crate::dom::{ArenaDom, ArenaNodeId, parse_xml};
use crate::error::Result;
use crate::layout::LayoutStrategy;
use crate::presentation::{Command, PresentationInfo, PresentationMap, PresentationSet};
use crate::structure::get_structure;

/// Row and column wrappers that begin at a node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RowCol {
    row: Option<ArenaNodeId>,
    col: Option<ArenaNodeId>,
    inner_col: Option<ArenaNodeId>,
}

/// Split decorated markup into its presentation map and clean markup.
///
/// The clean markup carries each section's id (`<h1 id="h1_1">`) so the
/// map can be applied to it again. Extraction never fails on structure:
/// anything that does not look like a row or column is simply not one.
/// Only markup that is not well formed is rejected.
pub fn extract_presentation(
    html: &str,
    strategy: &dyn LayoutStrategy,
) -> Result<(PresentationMap, String)> {
    let html = strategy.extract_pre_parse(html);
    let mut doc = parse_xml(&html)?;
    strategy.extract_post_parse(&mut doc);

    let mut structure = get_structure(&doc.dom, doc.root, false)?;
    strategy.extract_structure(&doc, &mut structure);

    let dom = &mut doc.dom;
    let root = doc.root;
    let mut presentation = PresentationMap::new();

    for item in &structure {
        let own: PresentationSet = dom
            .element_classes(item.node)
            .into_iter()
            .map(PresentationInfo::class)
            .collect();
        presentation.insert(item.sect_id.clone(), own);
        dom.remove_attr(item.node, "class");
        dom.set_attr(item.node, "id", item.sect_id.as_str());

        // A section can open an inner row that is itself the first thing in
        // an outer column, so keep looking outward from each row found.
        let mut search = item.node;
        loop {
            let found = find_row_col(dom, root, search, strategy);
            if found.row.is_none() && found.col.is_none() {
                break;
            }
            let inner = count_row_divs(dom, root, search, strategy) > 1;

            if let Some(row) = found.row {
                let command = if inner { Command::InnerRow } else { Command::NewRow };
                let classes = layout_free_classes(dom, &[row], |c| strategy.is_row_class(c));
                presentation.insert(command.key(&item.sect_id), with_command(command, classes));
            }
            if let Some(col) = found.col {
                let command = if inner {
                    Command::InnerColumn
                } else {
                    Command::NewColumn
                };
                let divs: Vec<ArenaNodeId> = std::iter::once(col).chain(found.inner_col).collect();
                let classes = layout_free_classes(dom, &divs, |c| strategy.is_column_class(c));
                presentation.insert(command.key(&item.sect_id), with_command(command, classes));
            }

            match found.row {
                Some(row) => search = row,
                None => break,
            }
        }
    }

    strip_layout(dom, root);
    tracing::debug!(
        sections = structure.len(),
        keys = presentation.len(),
        "extracted presentation"
    );
    Ok((presentation, doc.to_markup()))
}

/// Find the row and column that `node` is the first content of.
///
/// A column is a `div` whose first element is `node` and which carries a
/// column class. A row is a `div` whose first element is that column and
/// which carries a row class. Finding the row is enough to know the column
/// is one, even without column classes: single-column rows carry none.
/// When the direct parent is not a column it may be an inner column `div`,
/// so the search moves up one level.
fn find_row_col(
    dom: &ArenaDom,
    root: ArenaNodeId,
    node: ArenaNodeId,
    strategy: &dyn LayoutStrategy,
) -> RowCol {
    let mut found = RowCol::default();
    let Some(parent) = first_in_div(dom, root, node) else {
        return found;
    };

    let mut parent_is_col = has_class(dom, parent, |c| strategy.is_column_class(c));
    if let Some(grandparent) = first_in_div(dom, root, parent)
        && has_class(dom, grandparent, |c| strategy.is_row_class(c))
    {
        found.row = Some(grandparent);
        parent_is_col = true;
    }

    if parent_is_col {
        found.col = Some(parent);
        return found;
    }

    let mut outer = find_row_col(dom, root, parent, strategy);
    if outer.col.is_some() && outer.inner_col.is_none() {
        outer.inner_col = Some(parent);
    }
    outer
}

/// The parent of `node` if it is a `div` and `node` is its first element.
fn first_in_div(dom: &ArenaDom, root: ArenaNodeId, node: ArenaNodeId) -> Option<ArenaNodeId> {
    let parent = get_parent(dom, root, node)?;
    if parent == root || !dom.has_tag(parent, "div") {
        return None;
    }
    (element_index(dom, parent, node) == Some(0)).then_some(parent)
}

fn has_class<F>(dom: &ArenaDom, node: ArenaNodeId, pred: F) -> bool
where
    F: Fn(&str) -> bool,
{
    dom.element_classes(node).iter().any(|c| pred(c.as_str()))
}

/// Number of row wrappers enclosing `node`.
fn count_row_divs(
    dom: &ArenaDom,
    root: ArenaNodeId,
    node: ArenaNodeId,
    strategy: &dyn LayoutStrategy,
) -> usize {
    ancestors(dom, root, node)
        .into_iter()
        .filter(|&a| has_class(dom, a, |c| strategy.is_row_class(c)))
        .count()
}

/// Classes on `divs` that the layout strategy did not put there.
fn layout_free_classes<F>(dom: &ArenaDom, divs: &[ArenaNodeId], is_layout: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    divs.iter()
        .flat_map(|&d| dom.element_classes(d))
        .filter(|c| !is_layout(c.as_str()))
        .collect()
}

fn with_command(command: Command, classes: Vec<String>) -> PresentationSet {
    std::iter::once(PresentationInfo::Command(command))
        .chain(classes.into_iter().map(PresentationInfo::class))
        .collect()
}

/// Remove every wrapper `div`, keeping what is inside.
fn strip_layout(dom: &mut ArenaDom, root: ArenaNodeId) {
    for node in dom.descendants(root) {
        if dom.has_tag(node, "div") {
            eliminate_tag(dom, node);
        }
    }
}
