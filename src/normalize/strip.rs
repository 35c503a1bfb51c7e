//! Passes 1-2: remove non-content and leftover layout markers.

use crate::dom::tree::remove_subtree;
use crate::dom::{ArenaDom, ArenaNodeId};
use crate::presentation::Command;

use super::pass::walk_bottom_up;
use super::predicates::is_non_content_tag;

/// Pass 1: drop comments and elements that never hold document content
/// (`<style>`, `<script>`, `<meta>`, table `<col>` definitions and so on).
pub fn strip_non_content(dom: &mut ArenaDom, root: ArenaNodeId) {
    walk_bottom_up(dom, root, |dom, parent| {
        for child in dom.child_vec(parent) {
            let drop = dom.is_comment(child) || dom.tag(child).is_some_and(is_non_content_tag);
            if drop {
                remove_subtree(dom, child);
            }
        }
    });
}

/// Pass 2: drop command markers.
///
/// Older editors inserted a placeholder element carrying the command name
/// as its class (`<p class="newrow">*</p>`) to show where a row or column
/// starts. Such markers hold no content and are removed with their
/// contents.
pub fn strip_markers(dom: &mut ArenaDom, root: ArenaNodeId) {
    walk_bottom_up(dom, root, |dom, parent| {
        for child in dom.child_vec(parent) {
            if is_marker(dom, child) {
                remove_subtree(dom, child);
            }
        }
    });
}

fn is_marker(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    dom.is_element(id)
        && dom
            .element_classes(id)
            .iter()
            .any(|c| Command::from_name(c).is_some())
}
