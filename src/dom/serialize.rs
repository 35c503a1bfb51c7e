//! Serialization of an [`ArenaDom`] subtree back to inline markup.
//!
//! Output is XML-compatible so that it can be read back with
//! [`parse_xml`](super::parse_xml): void elements are self-closed and text
//! and attribute values are escaped.

use quick_xml::escape::{escape, partial_escape};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// Elements that never have content.
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Serialize the children of `root` (not `root` itself).
pub fn to_markup(dom: &ArenaDom, root: ArenaNodeId) -> String {
    let mut out = String::new();
    for child in dom.children(root) {
        write_node(dom, child, &mut out);
    }
    out
}

/// Serialize a single node including its own tags.
pub fn node_to_markup(dom: &ArenaDom, id: ArenaNodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, &mut out);
    out
}

fn write_node(dom: &ArenaDom, id: ArenaNodeId, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        ArenaNodeData::Text(text) => out.push_str(&partial_escape(text.as_str())),
        ArenaNodeData::Element { name, attrs } => {
            let tag = name.local.as_ref();
            out.push('<');
            out.push_str(tag);
            for attr in attrs {
                out.push(' ');
                out.push_str(attr.name.local.as_ref());
                out.push_str("=\"");
                out.push_str(&escape(attr.value.as_str()));
                out.push('"');
            }

            if is_void_element(tag) && node.first_child.is_none() {
                out.push_str(" />");
                return;
            }

            out.push('>');
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        ArenaNodeData::Document => {
            for child in dom.children(id) {
                write_node(dom, child, out);
            }
        }
        ArenaNodeData::Comment(_) => {}
    }
}
