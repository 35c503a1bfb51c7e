//! Passes 3, 5 and 6: remove wrappers that carry no semantics.
//!
//! Each pass only deletes start and end tags; children are promoted in place
//! (see [`eliminate_tag`]) so text order is preserved.

use crate::dom::tree::{eliminate_tag, is_whitespace_text};
use crate::dom::{ArenaDom, ArenaNodeId};

use super::pass::walk_bottom_up;
use super::predicates::{has_descendant_tag, is_block_tag, is_inline_tag, is_scaffolding_tag};

/// Pass 3: remove generic layout `<div>`s.
///
/// A `div` holding block content is unwrapped. A `div` holding only inline
/// content is acting as a paragraph and becomes a `p`.
///
/// ```html
/// <div class="row"><div><h1>A</h1></div></div>   →  <h1>A</h1>
/// <div>Foo</div>                                 →  <p>Foo</p>
/// ```
pub fn unwrap_layout(dom: &mut ArenaDom, root: ArenaNodeId) {
    walk_bottom_up(dom, root, |dom, parent| {
        for child in dom.child_vec(parent) {
            if !dom.has_tag(child, "div") {
                continue;
            }
            if has_descendant_tag(dom, child, is_block_tag) {
                eliminate_tag(dom, child);
            } else {
                dom.rename(child, "p");
            }
        }
    });
}

/// Pass 5: unwrap table scaffolding, `span` and `font`, and a `p` that is
/// the only content of an `li`.
pub fn unwrap_scaffolding(dom: &mut ArenaDom, root: ArenaNodeId) {
    walk_bottom_up(dom, root, |dom, parent| {
        for child in dom.child_vec(parent) {
            if dom.tag(child).is_some_and(is_scaffolding_tag) {
                eliminate_tag(dom, child);
            }
        }
        if dom.has_tag(parent, "li") {
            unwrap_list_paragraph(dom, parent);
        }
    });
}

/// `<li><p>An item</p></li>` → `<li>An item</li>`
pub fn unwrap_list_paragraph(dom: &mut ArenaDom, li: ArenaNodeId) {
    let mut only = None;
    for child in dom.children(li) {
        if is_whitespace_text(dom, child) {
            continue;
        }
        if only.is_some() || !dom.has_tag(child, "p") {
            return;
        }
        only = Some(child);
    }
    if let Some(p) = only {
        eliminate_tag(dom, p);
    }
}

/// Pass 6: unwrap inline elements that contain blocks.
///
/// ```html
/// <strong><p>A test</p></strong>  →  <p>A test</p>
/// ```
pub fn lift_blocks(dom: &mut ArenaDom, root: ArenaNodeId) {
    walk_bottom_up(dom, root, |dom, parent| {
        for child in dom.child_vec(parent) {
            let inline = dom.tag(child).is_some_and(is_inline_tag);
            if inline && has_descendant_tag(dom, child, is_block_tag) {
                eliminate_tag(dom, child);
            }
        }
    });
}
