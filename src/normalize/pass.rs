//! Tree traversal utilities for normalizer passes.

use crate::dom::{ArenaDom, ArenaNodeId};

/// Walk the subtree under `root` bottom-up and call `visitor` at each node.
///
/// Children are visited before their parent, so a visitor may freely
/// rearrange the children of the node it is given (unwrap, remove, wrap)
/// knowing that each child's own subtree is already in its final shape.
/// A visitor must not touch the node's siblings or ancestors.
pub fn walk_bottom_up<F>(dom: &mut ArenaDom, root: ArenaNodeId, mut visitor: F)
where
    F: FnMut(&mut ArenaDom, ArenaNodeId),
{
    walk_children(dom, root, &mut visitor);
}

fn walk_children<F>(dom: &mut ArenaDom, parent: ArenaNodeId, visitor: &mut F)
where
    F: FnMut(&mut ArenaDom, ArenaNodeId),
{
    let mut child_opt = dom.first_child(parent);
    while let Some(child) = child_opt {
        walk_children(dom, child, visitor);
        child_opt = dom.next_sibling(child);
    }
    visitor(dom, parent);
}

/// Element children of `parent` whose tag satisfies `pred`.
pub fn children_with_tag<F>(dom: &ArenaDom, parent: ArenaNodeId, pred: F) -> Vec<ArenaNodeId>
where
    F: Fn(&str) -> bool,
{
    dom.children(parent)
        .filter(|&c| dom.tag(c).is_some_and(&pred))
        .collect()
}
