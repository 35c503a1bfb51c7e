//! Markup tree: arena storage, parsing, serialization and tree utilities.

mod arena;
mod parse;
mod serialize;
pub mod tree;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, html_qname};
pub use parse::{FRAGMENT_ROOT, parse_html, parse_xml};
pub use serialize::{is_void_element, node_to_markup, to_markup};

/// A parsed markup fragment: the tree plus the element holding the fragment.
///
/// A `Document` is owned by whichever operation is currently transforming
/// it; nothing keeps references to it after the operation returns.
#[derive(Debug)]
pub struct Document {
    pub dom: ArenaDom,
    pub root: ArenaNodeId,
}

impl Document {
    /// Serialize the fragment (the children of the root).
    pub fn to_markup(&self) -> String {
        to_markup(&self.dom, self.root)
    }

    /// Top-level nodes of the fragment.
    pub fn top_level(&self) -> Vec<ArenaNodeId> {
        self.dom.child_vec(self.root)
    }
}
