//! HTML normalization.
//!
//! Turns arbitrary pasted markup into the canonical form the structure
//! extractor expects. Every pass only removes or relocates structure (the
//! one exception, [`wrap_bare_text`](wrap::wrap_bare_text), adds a single
//! `p` around content that had no block), so each pass terminates and the
//! pipeline runs exactly once.
//!
//! ## Pipeline Order
//!
//! 1. **Strip non-content** - comments, `style`, `script`, `meta`, ...
//! 2. **Strip markers** - leftover row/column command markers
//! 3. **Unwrap layout** - generic `div`s unwrapped or turned into `p`
//! 4. **Filter attributes** - transient styling dropped
//! 5. **Unwrap scaffolding** - tables, `span`, `font`, `li > p`
//! 6. **Lift blocks** - inline elements wrapping blocks unwrapped
//! 7. **Merge nested** - `p`/headings inside `p`/headings merged
//! 8. **Wrap bare text** - top-level inline content put in `p`
//! 9. **Dedupe ids** - repeated `id`s cleared
//! 10. **Prune** - empty containers removed (cascading)

mod attrs;
mod merge;
mod pass;
mod predicates;
mod prune;
mod strip;
mod unwrap;
mod wrap;

use std::collections::HashSet;

use crate::dom::{Document, parse_html};

pub use predicates::is_heading_tag;

/// Run all normalization passes on a parsed fragment.
pub fn normalize(doc: &mut Document) {
    let dom = &mut doc.dom;
    let root = doc.root;

    strip::strip_non_content(dom, root);
    strip::strip_markers(dom, root);
    unwrap::unwrap_layout(dom, root);
    attrs::filter_attributes(dom, root);
    unwrap::unwrap_scaffolding(dom, root);
    unwrap::lift_blocks(dom, root);
    merge::merge_nested(dom, root);
    wrap::wrap_bare_text(dom, root);
    attrs::dedupe_ids(dom, root);
    prune::prune_empty(dom, root);

    tracing::trace!(nodes = dom.len(), "normalized fragment");
    debug_assert!(is_canonical(doc), "normalizer left a non-canonical tree");
}

/// Normalize markup text. Never fails: any input is parsed leniently.
///
/// ```
/// assert_eq!(
///     semlayout::normalize_markup("<div>Foo</div>"),
///     "<p>Foo</p>"
/// );
/// ```
pub fn normalize_markup(content: &str) -> String {
    let mut doc = parse_html(content);
    normalize(&mut doc);
    doc.to_markup()
}

/// Check the guarantees the structure extractor relies on.
///
/// - no bare inline content at the top level;
/// - no comments, `div`s, table scaffolding or non-content elements;
/// - no `p` or heading inside a `p` or heading;
/// - only allowed attributes, and every `id` unique.
pub fn is_canonical(doc: &Document) -> bool {
    let dom = &doc.dom;

    for child in dom.children(doc.root) {
        if dom.has_tag(child, "br") {
            return false;
        }
        if predicates::is_phrasing(dom, child) {
            return false;
        }
    }

    let mut ids = HashSet::new();
    for id in dom.descendants(doc.root) {
        if dom.is_comment(id) {
            return false;
        }
        let Some(tag) = dom.tag(id) else {
            continue;
        };
        if tag == "div" || predicates::is_scaffolding_tag(tag) || predicates::is_non_content_tag(tag)
        {
            return false;
        }
        if predicates::is_text_block_tag(tag)
            && predicates::has_ancestor_tag(dom, doc.root, id, predicates::is_text_block_tag)
        {
            return false;
        }
        if dom
            .attrs(id)
            .iter()
            .any(|a| !predicates::is_kept_attribute(a.name.local.as_ref()))
        {
            return false;
        }
        if let Some(value) = dom.element_id(id)
            && !ids.insert(value)
        {
            return false;
        }
    }

    true
}
