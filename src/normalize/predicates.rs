//! Shared tag classifications for normalizer passes.

use crate::dom::{ArenaDom, ArenaNodeId};

/// Elements dropped outright, with everything inside them.
pub fn is_non_content_tag(tag: &str) -> bool {
    matches!(
        tag,
        "style" | "script" | "meta" | "link" | "title" | "col" | "colgroup" | "head" | "noscript"
    )
}

/// Table scaffolding and styling wrappers that carry no semantics of their own.
pub fn is_scaffolding_tag(tag: &str) -> bool {
    matches!(
        tag,
        "table" | "thead" | "tbody" | "tfoot" | "tr" | "td" | "th" | "caption" | "span" | "font"
    )
}

/// Attributes that survive cleaning.
pub fn is_kept_attribute(name: &str) -> bool {
    matches!(
        name,
        "id" | "class" | "href" | "src" | "alt" | "title" | "name" | "target" | "start"
    )
}

pub fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Paragraphs and headings: blocks whose content must be inline.
pub fn is_text_block_tag(tag: &str) -> bool {
    tag == "p" || is_heading_tag(tag)
}

/// Block-level elements: anything that closes an open `<p>` when parsed.
///
/// A `<p>` must never end up containing one of these, or re-parsing the
/// serialized output would split it.
pub fn is_block_tag(tag: &str) -> bool {
    is_heading_tag(tag)
        || matches!(
            tag,
            "p" | "div"
                | "ul"
                | "ol"
                | "li"
                | "dl"
                | "dt"
                | "dd"
                | "blockquote"
                | "pre"
                | "hr"
                | "table"
                | "address"
                | "article"
                | "aside"
                | "center"
                | "details"
                | "dialog"
                | "dir"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "header"
                | "hgroup"
                | "listing"
                | "main"
                | "menu"
                | "nav"
                | "section"
                | "summary"
                | "xmp"
        )
}

/// Inline formatting elements.
pub fn is_inline_tag(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr"
            | "b"
            | "bdi"
            | "bdo"
            | "big"
            | "cite"
            | "code"
            | "del"
            | "dfn"
            | "em"
            | "i"
            | "ins"
            | "kbd"
            | "label"
            | "mark"
            | "q"
            | "s"
            | "samp"
            | "small"
            | "strike"
            | "strong"
            | "sub"
            | "sup"
            | "time"
            | "tt"
            | "u"
            | "var"
    )
}

/// Text, inline elements, line breaks and images: content that needs a
/// block around it when it appears between blocks.
pub fn is_phrasing(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    if dom.is_text(id) {
        return true;
    }
    dom.tag(id)
        .is_some_and(|tag| is_inline_tag(tag) || matches!(tag, "br" | "img"))
}

/// Elements removed when left without content.
pub fn is_prunable_tag(tag: &str) -> bool {
    // Anchors are kept: an empty `<a name=...>` is still a link target.
    tag != "a" && (is_text_block_tag(tag) || is_inline_tag(tag) || matches!(tag, "ul" | "ol" | "li" | "blockquote"))
}

/// True if any element below `id` satisfies `pred` on its tag.
pub fn has_descendant_tag<F>(dom: &ArenaDom, id: ArenaNodeId, pred: F) -> bool
where
    F: Fn(&str) -> bool,
{
    dom.descendants(id)
        .into_iter()
        .any(|d| dom.tag(d).is_some_and(&pred))
}

/// True if some ancestor of `id` below `root` satisfies `pred` on its tag.
pub fn has_ancestor_tag<F>(dom: &ArenaDom, root: ArenaNodeId, id: ArenaNodeId, pred: F) -> bool
where
    F: Fn(&str) -> bool,
{
    crate::dom::tree::ancestors(dom, root, id)
        .into_iter()
        .any(|a| dom.tag(a).is_some_and(&pred))
}
