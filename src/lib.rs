//! # semlayout
//!
//! Row and column layout for semantic HTML content, kept separate from the
//! content itself.
//!
//! Editors produce plain semantic markup (headings, paragraphs, lists). Layout
//! is described by a [`PresentationMap`] keyed by section ids, and applied on
//! output as wrapper `div`s with CSS classes. The decorated markup can be
//! split back into clean content and a presentation map.
//!
//! ## Features
//!
//! - Normalize pasted markup into a small canonical subset
//! - Outline extraction with stable section ids and heading checks
//! - Row/column/inner-row layout with width checking
//! - Pluggable wrapper markup through [`LayoutStrategy`]
//! - Recovery of presentation from decorated markup
//!
//! ## Quick Start
//!
//! ```
//! use semlayout::{Command, LayoutDetails, PresentationInfo, PresentationMap};
//! use semlayout::{extract_presentation, format_html};
//!
//! let html = "<h1>Left</h1><p>text</p><h1>Right</h1>";
//!
//! let mut pres = PresentationMap::new();
//! pres.entry("newrow_h1_1".into())
//!     .or_default()
//!     .insert(PresentationInfo::Command(Command::NewRow));
//! pres.entry("newcol_h1_2".into())
//!     .or_default()
//!     .insert(PresentationInfo::Command(Command::NewColumn));
//!
//! let strategy = LayoutDetails::default();
//! let out = format_html(html, &pres, &strategy).unwrap();
//! assert!(out.starts_with("<div class=\"row columns2\">"));
//!
//! let (recovered, clean) = extract_presentation(&out, &strategy).unwrap();
//! assert!(recovered.contains_key("newcol_h1_2"));
//! assert!(clean.starts_with("<h1 id=\"h1_1\">Left</h1>"));
//! ```

pub mod dom;
pub mod error;
pub mod extract;
pub mod format;
pub mod layout;
pub mod normalize;
pub mod presentation;
pub mod preview;
pub mod structure;
pub mod styles;

pub use error::{Error, Result};
pub use extract::extract_presentation;
pub use format::{Formatted, format_document, format_html};
pub use layout::{Layout, LayoutDetails, LayoutStrategy};
pub use normalize::normalize_markup;
pub use presentation::{
    Command, PresentationClass, PresentationInfo, PresentationMap, PresentationSet,
};
pub use preview::preview_html;
pub use structure::StructureItem;
pub use styles::{StyleDetail, StyleLookup, StyleRegistry, available_styles};

/// Normalize `html` and return its outline, checking the heading hierarchy.
///
/// ```
/// let outline = semlayout::extract_structure("<h1>Title</h1><p>Body</p>").unwrap();
/// assert_eq!(outline[0].sect_id, "h1_1");
/// assert_eq!(outline[1].level, 2);
/// ```
pub fn extract_structure(html: &str) -> Result<Vec<StructureItem>> {
    let mut doc = dom::parse_html(html);
    normalize::normalize(&mut doc);
    structure::get_structure(&doc.dom, doc.root, true)
}
