//! Layout strategies: how rows and columns are expressed as markup.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::dom::tree::is_whitespace_text;
use crate::dom::{ArenaDom, ArenaNodeId, Document};
use crate::presentation::PresentationClass;
use crate::structure::StructureItem;

/// Decides the wrapper markup for rows and columns, and how to recognise it
/// again when extracting.
///
/// The hooks (`format_*`, `extract_*`) let a site adjust content around the
/// standard pipeline; all of them default to doing nothing.
pub trait LayoutStrategy {
    /// Maximum total logical width of a row.
    fn max_columns(&self) -> usize;

    /// Whether each column holds an extra inner `div` for cosmetic classes.
    fn use_inner_column_div(&self) -> bool;

    /// Classes for a row whose columns add up to `logical` widths, rendered
    /// as `actual` column elements.
    fn row_classes(&self, logical: usize, actual: usize) -> Vec<String>;

    /// Classes for the column at 1-based `position` of `actual` columns.
    fn column_classes(&self, position: usize, actual: usize) -> Vec<String>;

    /// True for classes that `row_classes` may produce.
    fn is_row_class(&self, class: &str) -> bool;

    /// True for classes that `column_classes` may produce.
    fn is_column_class(&self, class: &str) -> bool;

    /// Split a column's own classes into those placed on the column element
    /// and those placed on the inner `div`.
    ///
    /// Width-bearing classes (with a `column_equiv`) must stay on the column
    /// element; the rest move inside when there is an inner `div`.
    fn split_column_classes(&self, classes: &[PresentationClass]) -> (Vec<String>, Vec<String>) {
        if !self.use_inner_column_div() {
            return (classes.iter().map(|c| c.name.clone()).collect(), Vec::new());
        }
        let (outer, inner): (Vec<_>, Vec<_>) =
            classes.iter().partition(|c| c.column_equiv.is_some());
        (
            outer.into_iter().map(|c| c.name.clone()).collect(),
            inner.into_iter().map(|c| c.name.clone()).collect(),
        )
    }

    /// Rewrite markup before it is parsed for formatting.
    fn format_pre_parse<'a>(&self, html: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(html)
    }

    /// Adjust the normalized tree before its structure is read.
    fn format_post_parse(&self, _doc: &mut Document) {}

    /// Adjust the tree and outline used for formatting, once section classes
    /// are in place and before the layout is built.
    fn format_structure(&self, _doc: &mut Document, _structure: &mut Vec<StructureItem>) {}

    /// Rewrite decorated markup before it is parsed for extraction.
    fn extract_pre_parse<'a>(&self, html: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(html)
    }

    /// Adjust the decorated tree before its structure is read.
    fn extract_post_parse(&self, _doc: &mut Document) {}

    /// Adjust the outline used for extraction.
    fn extract_structure(&self, _doc: &Document, _structure: &mut Vec<StructureItem>) {}
}

/// Configurable class-name strategy.
///
/// With the defaults, a two-column row renders as
///
/// ```html
/// <div class="row columns2">
///   <div class="column firstcolumn"><div>...</div></div>
///   <div class="column lastcolumn"><div>...</div></div>
/// </div>
/// ```
///
/// and a single-column row carries no column classes at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutDetails {
    pub row_class: String,
    pub column_class: String,
    pub first_column_class: String,
    pub last_column_class: String,
    /// Row class for multi-column rows is this prefix plus the logical width.
    pub columns_class_prefix: String,
    pub max_columns: usize,
    pub use_inner_column_div: bool,
    /// A paragraph carrying this class is rendered as a `div`, and such a
    /// `div` reads back as a paragraph. Empty disables the rule.
    pub div_class: String,
    /// Id prefix of the images editors use as placeholders for plugins. A
    /// paragraph holding nothing but one of them is rendered as a `div`.
    pub plugin_id_prefix: String,
}

impl Default for LayoutDetails {
    fn default() -> Self {
        Self {
            row_class: "row".to_string(),
            column_class: "column".to_string(),
            first_column_class: "firstcolumn".to_string(),
            last_column_class: "lastcolumn".to_string(),
            columns_class_prefix: "columns".to_string(),
            max_columns: 6,
            use_inner_column_div: true,
            div_class: "div".to_string(),
            plugin_id_prefix: "plugin_obj_".to_string(),
        }
    }
}

impl LayoutDetails {
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns;
        self
    }

    pub fn with_inner_column_div(mut self, enabled: bool) -> Self {
        self.use_inner_column_div = enabled;
        self
    }

    pub fn with_div_class(mut self, class: impl Into<String>) -> Self {
        self.div_class = class.into();
        self
    }

    /// True for a `p` whose only content, whitespace aside, is a plugin
    /// placeholder image.
    fn is_plugin_paragraph(&self, dom: &ArenaDom, p: ArenaNodeId) -> bool {
        if self.plugin_id_prefix.is_empty() {
            return false;
        }
        let mut content = dom.children(p).filter(|&c| !is_whitespace_text(dom, c));
        let Some(only) = content.next() else {
            return false;
        };
        content.next().is_none()
            && dom.has_tag(only, "img")
            && dom
                .element_id(only)
                .is_some_and(|id| id.starts_with(self.plugin_id_prefix.as_str()))
    }
}

impl LayoutStrategy for LayoutDetails {
    fn max_columns(&self) -> usize {
        self.max_columns
    }

    fn use_inner_column_div(&self) -> bool {
        self.use_inner_column_div
    }

    fn row_classes(&self, logical: usize, _actual: usize) -> Vec<String> {
        let mut classes = vec![self.row_class.clone()];
        if logical > 1 {
            classes.push(format!("{}{logical}", self.columns_class_prefix));
        }
        classes
    }

    fn column_classes(&self, position: usize, actual: usize) -> Vec<String> {
        if actual == 1 {
            return Vec::new();
        }
        let mut classes = vec![self.column_class.clone()];
        if position == 1 {
            classes.push(self.first_column_class.clone());
        }
        if position == actual {
            classes.push(self.last_column_class.clone());
        }
        classes
    }

    fn is_row_class(&self, class: &str) -> bool {
        if class == self.row_class {
            return true;
        }
        class
            .strip_prefix(self.columns_class_prefix.as_str())
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    }

    fn is_column_class(&self, class: &str) -> bool {
        class == self.column_class
            || class == self.first_column_class
            || class == self.last_column_class
    }

    fn format_structure(&self, doc: &mut Document, structure: &mut Vec<StructureItem>) {
        if self.div_class.is_empty() {
            return;
        }
        let dom = &mut doc.dom;
        for item in structure.iter().filter(|s| s.tag == "p") {
            let mut classes = dom.element_classes(item.node);
            let marked = classes.contains(&self.div_class);
            if !marked && !self.is_plugin_paragraph(dom, item.node) {
                continue;
            }
            if !marked {
                classes.push(self.div_class.clone());
                dom.set_attr(item.node, "class", classes.join(" "));
            }
            dom.rename(item.node, "div");
        }
    }

    fn extract_post_parse(&self, doc: &mut Document) {
        if self.div_class.is_empty() {
            return;
        }
        for id in doc.dom.descendants(doc.root) {
            if doc.dom.has_tag(id, "div") && doc.dom.element_classes(id).contains(&self.div_class) {
                doc.dom.rename(id, "p");
            }
        }
    }
}
