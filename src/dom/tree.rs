//! Generic operations on the markup tree.
//!
//! Indexes here count element children only, so whitespace or other text
//! between elements does not affect positions.

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// Concatenate all text inside `id`, in document order.
pub fn flatten(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    flatten_into(dom, id, &mut out);
    out
}

fn flatten_into(dom: &ArenaDom, id: ArenaNodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };
    if let ArenaNodeData::Text(text) = &node.data {
        out.push_str(text);
        return;
    }
    for child in dom.children(id) {
        flatten_into(dom, child, out);
    }
}

/// Parent of `node` if it lies within `root`'s subtree (and is not `root`).
pub fn get_parent(dom: &ArenaDom, root: ArenaNodeId, node: ArenaNodeId) -> Option<ArenaNodeId> {
    if node == root {
        return None;
    }
    let parent = dom.parent(node)?;
    is_within(dom, root, parent).then_some(parent)
}

/// True if `node` is `root` or one of its descendants.
pub fn is_within(dom: &ArenaDom, root: ArenaNodeId, node: ArenaNodeId) -> bool {
    let mut cursor = Some(node);
    while let Some(id) = cursor {
        if id == root {
            return true;
        }
        cursor = dom.parent(id);
    }
    false
}

/// Position of `child` among the element children of `parent`.
pub fn element_index(dom: &ArenaDom, parent: ArenaNodeId, child: ArenaNodeId) -> Option<usize> {
    dom.children(parent)
        .filter(|&c| dom.is_element(c))
        .position(|c| c == child)
}

/// Ancestors of `node` up to but excluding `root`, nearest first.
pub fn ancestors(dom: &ArenaDom, root: ArenaNodeId, node: ArenaNodeId) -> Vec<ArenaNodeId> {
    let mut out = Vec::new();
    let mut cursor = dom.parent(node);
    while let Some(id) = cursor {
        if id == root {
            break;
        }
        out.push(id);
        cursor = dom.parent(id);
    }
    out
}

/// Remove an element's start and end tags, promoting its children (and the
/// text between them) into its place.
pub fn eliminate_tag(dom: &mut ArenaDom, id: ArenaNodeId) {
    if dom.parent(id).is_none() {
        return;
    }
    for child in dom.child_vec(id) {
        dom.insert_before(id, child);
    }
    dom.detach(id);
}

/// Remove an element together with everything inside it.
pub fn remove_subtree(dom: &mut ArenaDom, id: ArenaNodeId) {
    dom.detach(id);
}

/// Wrap a run of consecutive siblings in a new element with `tag`.
///
/// The wrapper takes the place of the first node in `run`. Returns the new
/// element, or `None` if `run` is empty.
pub fn wrap_nodes(dom: &mut ArenaDom, run: &[ArenaNodeId], tag: &str) -> Option<ArenaNodeId> {
    let first = *run.first()?;
    let wrapper = dom.create_tag(tag);
    dom.insert_before(first, wrapper);
    for &node in run {
        dom.append(wrapper, node);
    }
    Some(wrapper)
}

/// True for text nodes that contain only whitespace.
pub fn is_whitespace_text(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    dom.text_content(id)
        .is_some_and(|t| t.chars().all(char::is_whitespace))
}
