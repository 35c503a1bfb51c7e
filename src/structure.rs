//! Document outline extraction.
//!
//! Every heading and block element becomes a *section* with a stable id
//! (`h1_1`, `p_3`, ...). Presentation is stored against these ids, so an id
//! that is already present on an element is kept whenever it is valid.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::dom::tree::flatten;
use crate::dom::{ArenaDom, ArenaNodeId};
use crate::error::{Error, Result};
use crate::normalize::is_heading_tag;

/// Number of characters of a non-heading block used for its display name.
pub const NAME_TRIM_LENGTH: usize = 20;

/// Elements tracked as sections.
pub fn is_section_tag(tag: &str) -> bool {
    is_heading_tag(tag) || matches!(tag, "p" | "ol" | "ul" | "blockquote" | "li")
}

/// One entry of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureItem {
    /// Outline depth, 1 for the shallowest heading in the document.
    pub level: usize,
    /// Unique section id within the document.
    pub sect_id: String,
    /// Heading text, or a shortened preview of other blocks.
    pub name: String,
    /// Lowercase element name.
    pub tag: String,
    /// The element itself.
    #[serde(skip)]
    pub node: ArenaNodeId,
}

impl StructureItem {
    pub fn is_heading(&self) -> bool {
        is_heading_tag(&self.tag)
    }
}

/// Walk `root` in document order and return its outline.
///
/// With `assert_valid`, the heading hierarchy is checked and violations are
/// reported as [`Error::IncorrectHeadings`]:
/// - no heading may be higher than the first heading;
/// - heading text must be unique;
/// - a heading may be at most one level deeper than the previous heading.
pub fn get_structure(
    dom: &ArenaDom,
    root: ArenaNodeId,
    assert_valid: bool,
) -> Result<Vec<StructureItem>> {
    let sections: Vec<(ArenaNodeId, &str)> = dom
        .descendants(root)
        .into_iter()
        .filter_map(|id| dom.tag(id).filter(|t| is_section_tag(t)).map(|t| (id, t)))
        .collect();

    let mut ids = SectionIds::claim_existing(dom, &sections);

    let mut items = Vec::with_capacity(sections.len());
    let mut names: HashSet<String> = HashSet::new();
    let mut heading_names: HashSet<String> = HashSet::new();
    let mut first_heading: Option<usize> = None;
    let mut last_heading: usize = 0;

    for &(node, tag) in &sections {
        let text = flatten(dom, node);
        let sect_id = ids.assign(node, tag);

        let (name, level) = if let Some(raw) = heading_level(tag) {
            if assert_valid {
                check_heading(&text, raw, first_heading, last_heading, &heading_names)?;
            }
            first_heading.get_or_insert(raw);
            last_heading = raw;
            heading_names.insert(text.clone());
            (text, raw)
        } else {
            let name = unique_name(block_name(&text), &names);
            names.insert(name.clone());
            let level = if first_heading.is_some() {
                last_heading + 1
            } else {
                1
            };
            (name, level)
        };

        // Blocks nested in other blocks (a paragraph in a blockquote) sit
        // one level deeper per enclosing block.
        let nesting = crate::dom::tree::ancestors(dom, root, node)
            .into_iter()
            .filter(|&a| dom.tag(a).is_some_and(is_section_tag))
            .count();
        let baseline = first_heading.unwrap_or(1);
        let level = (nesting + level + 1).saturating_sub(baseline).max(1);

        items.push(StructureItem {
            level,
            sect_id,
            name,
            tag: tag.to_string(),
            node,
        });
    }

    tracing::trace!(sections = items.len(), "extracted structure");
    Ok(items)
}

fn heading_level(tag: &str) -> Option<usize> {
    if !is_heading_tag(tag) {
        return None;
    }
    tag[1..].parse().ok()
}

fn check_heading(
    name: &str,
    level: usize,
    first_heading: Option<usize>,
    last_heading: usize,
    heading_names: &HashSet<String>,
) -> Result<()> {
    let Some(first) = first_heading else {
        return Ok(());
    };
    if level < first {
        return Err(Error::IncorrectHeadings(format!(
            "No heading can be higher than the first heading, which was H{first}."
        )));
    }
    if heading_names.contains(name) {
        return Err(Error::IncorrectHeadings(format!(
            "There are duplicate headings with the name \"{name}\"."
        )));
    }
    if level > last_heading + 1 {
        return Err(Error::IncorrectHeadings(format!(
            "Heading \"{name}\" is level H{level}, but it should be level H{} or less.",
            last_heading + 1
        )));
    }
    Ok(())
}

fn block_name(text: &str) -> String {
    let mut name: String = text.chars().take(NAME_TRIM_LENGTH).collect();
    name.push_str("...");
    name
}

fn unique_name(name: String, used: &HashSet<String>) -> String {
    if !used.contains(&name) {
        return name;
    }
    (2..)
        .map(|i| format!("{name}{i}"))
        .find(|attempt| !used.contains(attempt))
        .unwrap_or(name)
}

/// Section id allocation for one extraction pass.
struct SectionIds {
    /// Ids already present on elements, keyed by the element that owns them.
    existing: HashMap<ArenaNodeId, String>,
    used: HashSet<String>,
}

impl SectionIds {
    /// Claim valid existing ids up front, so an id synthesized for an earlier
    /// element never collides with one that appears later in the document.
    /// The first element carrying a given id wins.
    fn claim_existing(dom: &ArenaDom, sections: &[(ArenaNodeId, &str)]) -> Self {
        let mut existing = HashMap::new();
        let mut used = HashSet::new();
        for &(node, tag) in sections {
            let Some(id) = dom.element_id(node) else {
                continue;
            };
            if id.starts_with(tag) && used.insert(id.to_string()) {
                existing.insert(node, id.to_string());
            }
        }
        Self { existing, used }
    }

    fn assign(&mut self, node: ArenaNodeId, tag: &str) -> String {
        if let Some(id) = self.existing.remove(&node) {
            return id;
        }
        let id = (1..)
            .map(|i| format!("{tag}_{i}"))
            .find(|attempt| !self.used.contains(attempt))
            .unwrap_or_else(|| format!("{tag}_0"));
        self.used.insert(id.clone());
        id
    }
}
