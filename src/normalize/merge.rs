//! Pass 7: merge paragraphs and headings nested inside each other.

use crate::dom::tree::eliminate_tag;
use crate::dom::{ArenaDom, ArenaNodeId};

use super::pass::walk_bottom_up;
use super::predicates::{has_ancestor_tag, is_text_block_tag};

/// Merge a `p`, heading or `blockquote` found inside a `p` or heading into
/// the enclosing block, promoting its inline content in order.
///
/// ```html
/// <h1>Title <p>more</p></h1>  →  <h1>Title more</h1>
/// ```
pub fn merge_nested(dom: &mut ArenaDom, root: ArenaNodeId) {
    walk_bottom_up(dom, root, |dom, parent| {
        for child in dom.child_vec(parent) {
            let nestable = dom
                .tag(child)
                .is_some_and(|t| is_text_block_tag(t) || t == "blockquote");
            if nestable && has_ancestor_tag(dom, root, child, is_text_block_tag) {
                eliminate_tag(dom, child);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_xml, to_markup};

    // Nested blocks cannot come out of the HTML parser directly, only out of
    // earlier passes, so these build the input strictly.

    #[test]
    fn test_merge_p_in_heading() {
        let mut doc = parse_xml("<h1>Title <p>more</p> end</h1>").unwrap();
        merge_nested(&mut doc.dom, doc.root);
        assert_eq!(to_markup(&doc.dom, doc.root), "<h1>Title more end</h1>");
    }

    #[test]
    fn test_merge_deeply_nested() {
        let mut doc = parse_xml("<p>a<p>b<p>c</p></p><em>d</em></p>").unwrap();
        merge_nested(&mut doc.dom, doc.root);
        assert_eq!(to_markup(&doc.dom, doc.root), "<p>abc<em>d</em></p>");
    }

    #[test]
    fn test_blockquote_inside_heading() {
        let mut doc = parse_xml("<h2><blockquote>quoted</blockquote></h2>").unwrap();
        merge_nested(&mut doc.dom, doc.root);
        assert_eq!(to_markup(&doc.dom, doc.root), "<h2>quoted</h2>");
    }

    #[test]
    fn test_top_level_blocks_untouched() {
        let input = "<blockquote><p>x</p></blockquote><p>y</p>";
        let mut doc = parse_xml(input).unwrap();
        merge_nested(&mut doc.dom, doc.root);
        assert_eq!(to_markup(&doc.dom, doc.root), input);
    }
}
