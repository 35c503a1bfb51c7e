//! Applying presentation to clean markup.

use crate::dom::{Document, parse_html};
use crate::error::Result;
use crate::layout::{LayoutStrategy, build_layout, check_layout, render_layout};
use crate::normalize::normalize;
use crate::presentation::{PresentationMap, class_names, sanitize_presentation};
use crate::structure::{StructureItem, get_structure};

/// A formatted fragment before serialization.
pub struct Formatted {
    /// The document, with `root` pointing at the rendered layout.
    pub doc: Document,
    /// The outline the layout was built from; nodes refer into `doc`.
    pub structure: Vec<StructureItem>,
}

/// Normalize `html`, apply `presentation` and render the layout.
///
/// Section classes are taken from the map: a section with no classes in the
/// map loses any `class` attribute it had. Section ids are removed from the
/// output; they only exist to key presentation while editing.
pub fn format_document(
    html: &str,
    presentation: &PresentationMap,
    strategy: &dyn LayoutStrategy,
) -> Result<Formatted> {
    let html = strategy.format_pre_parse(html);
    let mut doc = parse_html(&html);
    normalize(&mut doc);
    strategy.format_post_parse(&mut doc);

    let mut structure = get_structure(&doc.dom, doc.root, true)?;

    let sect_ids: Vec<String> = structure.iter().map(|s| s.sect_id.clone()).collect();
    let presentation = sanitize_presentation(presentation, &sect_ids);

    for item in &structure {
        let classes = presentation
            .get(&item.sect_id)
            .map(class_names)
            .unwrap_or_default();
        if classes.is_empty() {
            doc.dom.remove_attr(item.node, "class");
        } else {
            doc.dom.set_attr(item.node, "class", classes.join(" "));
        }
    }
    strategy.format_structure(&mut doc, &mut structure);

    let layout = build_layout(&doc, &structure, &presentation)?;
    check_layout(&layout, &structure, strategy)?;
    let root = render_layout(&mut doc.dom, &layout, strategy);
    doc.root = root;

    for item in &structure {
        doc.dom.remove_attr(item.node, "id");
    }

    tracing::debug!(sections = structure.len(), "formatted document");
    Ok(Formatted { doc, structure })
}

/// Format `html` with `presentation` and return the decorated markup.
pub fn format_html(
    html: &str,
    presentation: &PresentationMap,
    strategy: &dyn LayoutStrategy,
) -> Result<String> {
    let formatted = format_document(html, presentation, strategy)?;
    Ok(formatted.doc.to_markup())
}
