//! Pass 8: wrap bare inline content in paragraphs.

use crate::dom::tree::{is_whitespace_text, remove_subtree, wrap_nodes};
use crate::dom::{ArenaDom, ArenaNodeId};

use super::pass::walk_bottom_up;
use super::predicates::is_phrasing;

/// Wrap runs of inline content that sit between blocks in `p` elements.
///
/// Applies at the top level of the fragment and inside `blockquote`s that
/// mix blocks with inline content. A `<br>` at these levels ends a run and is
/// dropped; runs that hold only whitespace are dropped.
///
/// ```html
/// This is<br /><br />a test  →  <p>This is</p><p>a test</p>
/// ```
pub fn wrap_bare_text(dom: &mut ArenaDom, root: ArenaNodeId) {
    walk_bottom_up(dom, root, |dom, parent| {
        if parent == root {
            wrap_runs(dom, parent);
        } else if dom.has_tag(parent, "blockquote") && is_mixed(dom, parent) {
            wrap_runs(dom, parent);
        }
    });
}

/// True if `parent` holds both block children and non-blank inline content.
fn is_mixed(dom: &ArenaDom, parent: ArenaNodeId) -> bool {
    let mut has_block = false;
    let mut has_inline = false;
    for child in dom.children(parent) {
        if dom.has_tag(child, "br") {
            continue;
        }
        if is_phrasing(dom, child) {
            has_inline |= !is_whitespace_text(dom, child);
        } else if dom.is_element(child) {
            has_block = true;
        }
    }
    has_block && has_inline
}

fn wrap_runs(dom: &mut ArenaDom, parent: ArenaNodeId) {
    let mut run: Vec<ArenaNodeId> = Vec::new();
    for child in dom.child_vec(parent) {
        if dom.has_tag(child, "br") {
            flush_run(dom, &mut run);
            remove_subtree(dom, child);
        } else if is_phrasing(dom, child) {
            run.push(child);
        } else {
            flush_run(dom, &mut run);
        }
    }
    flush_run(dom, &mut run);
}

fn flush_run(dom: &mut ArenaDom, run: &mut Vec<ArenaNodeId>) {
    if run.is_empty() {
        return;
    }
    if run.iter().all(|&n| is_whitespace_text(dom, n)) {
        for &n in run.iter() {
            remove_subtree(dom, n);
        }
    } else {
        wrap_nodes(dom, run, "p");
    }
    run.clear();
}
