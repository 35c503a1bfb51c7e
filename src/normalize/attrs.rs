//! Passes 4 and 9: attribute filtering and id de-duplication.

use std::collections::HashSet;

use crate::dom::{ArenaDom, ArenaNodeId};

use super::predicates::is_kept_attribute;

/// Pass 4: drop transient styling attributes (`style`, `width`, `lang`, ...).
///
/// `class` survives: it carries presentation the user chose.
pub fn filter_attributes(dom: &mut ArenaDom, root: ArenaNodeId) {
    for id in dom.descendants(root) {
        if dom.is_element(id) {
            dom.retain_attrs(id, is_kept_attribute);
        }
    }
}

/// Pass 9: clear the second and later occurrences of each `id`.
pub fn dedupe_ids(dom: &mut ArenaDom, root: ArenaNodeId) {
    let mut seen = HashSet::new();
    for id in dom.descendants(root) {
        let Some(value) = dom.element_id(id) else {
            continue;
        };
        if !seen.insert(value.to_string()) {
            dom.remove_attr(id, "id");
        }
    }
}
