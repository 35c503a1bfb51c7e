//! Pass 10: remove empty blocks and inline wrappers (cascading).

use crate::dom::tree::{is_whitespace_text, remove_subtree};
use crate::dom::{ArenaDom, ArenaNodeId};

use super::pass::walk_bottom_up;
use super::predicates::is_prunable_tag;
use super::unwrap::unwrap_list_paragraph;

/// Remove empty containers in post-order.
///
/// Editors leave behind empty paragraphs and formatting:
/// ```html
/// <p class="western"></p>
/// <p><b> </b><br /></p>
/// ```
///
/// Post-order traversal enables cascading: the `b` above is removed first,
/// then the now-empty `p`. An element with an `id` is never removed, since
/// something may link to it.
///
/// Removing an empty paragraph can leave an `li` holding a single `p`, which
/// is unwrapped here so the result is stable under re-normalization.
pub fn prune_empty(dom: &mut ArenaDom, root: ArenaNodeId) {
    walk_bottom_up(dom, root, |dom, parent| {
        let mut removed = false;
        for child in dom.child_vec(parent) {
            if should_prune(dom, child) {
                remove_subtree(dom, child);
                removed = true;
            }
        }
        if removed && dom.has_tag(parent, "li") {
            unwrap_list_paragraph(dom, parent);
        }
    });
}

fn should_prune(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    if !dom.tag(id).is_some_and(is_prunable_tag) || dom.element_id(id).is_some() {
        return false;
    }
    // Line breaks alone do not make content.
    dom.children(id)
        .all(|c| is_whitespace_text(dom, c) || dom.has_tag(c, "br") || dom.is_comment(c))
}
