//! Structural preview of a formatted document.

use std::collections::HashMap;

use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::Result;
use crate::format::format_document;
use crate::layout::LayoutStrategy;
use crate::presentation::PresentationMap;
use crate::structure::StructureItem;

/// Format `html`, then reduce it to its layout skeleton.
///
/// Every section outside a wrapper becomes
/// `<div class="structural tag{tag}">{name}</div>` and anything that is not a
/// section is dropped, so editors can show rows and columns without the
/// content itself.
pub fn preview_html(
    html: &str,
    presentation: &PresentationMap,
    strategy: &dyn LayoutStrategy,
) -> Result<String> {
    let mut formatted = format_document(html, presentation, strategy)?;
    let sections: HashMap<ArenaNodeId, &StructureItem> =
        formatted.structure.iter().map(|s| (s.node, s)).collect();

    let root = formatted.doc.root;
    replace_sections(&mut formatted.doc.dom, root, &sections);
    Ok(formatted.doc.to_markup())
}

fn replace_sections(
    dom: &mut ArenaDom,
    parent: ArenaNodeId,
    sections: &HashMap<ArenaNodeId, &StructureItem>,
) {
    // Sections rendered as a `div` are still sections; only wrappers recurse.
    for child in dom.child_vec(parent) {
        match sections.get(&child) {
            Some(item) => {
                for grandchild in dom.child_vec(child) {
                    dom.detach(grandchild);
                }
                dom.rename(child, "div");
                dom.retain_attrs(child, |_| false);
                dom.set_attr(child, "class", format!("structural tag{}", item.tag));
                dom.append_text(child, &item.name);
            }
            None if dom.has_tag(child, "div") => replace_sections(dom, child, sections),
            None => dom.detach(child),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutDetails;
    use crate::presentation::{Command, PresentationInfo, PresentationSet};

    #[test]
    fn test_preview_plain_sections() {
        let html = "<h1>Hello</h1><p>Some long paragraph of text</p>";
        let out = preview_html(html, &PresentationMap::new(), &LayoutDetails::default()).unwrap();
        assert_eq!(
            out,
            "<div class=\"structural tagh1\">Hello</div>\
             <div class=\"structural tagp\">Some long paragraph ...</div>"
        );
    }

    #[test]
    fn test_preview_keeps_layout() {
        let html = "<h1>1</h1><h1>2</h1>";
        let mut pres = PresentationMap::new();
        pres.insert(
            "newrow_h1_1".into(),
            PresentationSet::from([PresentationInfo::Command(Command::NewRow)]),
        );
        pres.insert(
            "newcol_h1_2".into(),
            PresentationSet::from([PresentationInfo::Command(Command::NewColumn)]),
        );
        let out = preview_html(html, &pres, &LayoutDetails::default()).unwrap();
        assert_eq!(
            out,
            "<div class=\"row columns2\">\
             <div class=\"column firstcolumn\"><div><div class=\"structural tagh1\">1</div></div></div>\
             <div class=\"column lastcolumn\"><div><div class=\"structural tagh1\">2</div></div></div>\
             </div>"
        );
    }

    #[test]
    fn test_preview_keeps_paragraph_rendered_as_div() {
        let html = "<h1>Hello</h1><p>Boxed</p>";
        let mut pres = PresentationMap::new();
        pres.insert(
            "p_1".into(),
            PresentationSet::from([PresentationInfo::class("div")]),
        );
        let out = preview_html(html, &pres, &LayoutDetails::default()).unwrap();
        assert_eq!(
            out,
            "<div class=\"structural tagh1\">Hello</div>\
             <div class=\"structural tagp\">Boxed...</div>"
        );
    }

    #[test]
    fn test_preview_lists_collapse_to_list_section() {
        let html = "<ul><li>one</li><li>two</li></ul>";
        let out = preview_html(html, &PresentationMap::new(), &LayoutDetails::default()).unwrap();
        assert_eq!(out, "<div class=\"structural tagul\">onetwo...</div>");
    }
}
