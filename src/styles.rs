//! The catalogue of CSS classes editors may apply.
//!
//! Which classes exist depends on the page template the content is shown
//! in. The crate only needs to list them; where they come from is up to the
//! caller, through [`StyleLookup`]. [`StyleRegistry`] is a simple in-memory
//! catalogue loaded from JSON:
//!
//! ```json
//! [
//!   {"class_name": "doublewidth", "verbose_name": "Double width",
//!    "column_equiv": 2, "templates": ["two_col.html"]},
//!   {"class_name": "note", "allowed_elements": ["p", "blockquote"]}
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::presentation::{Command, PresentationClass, PresentationInfo};

/// Source of the classes available for a template.
pub trait StyleLookup {
    fn list_classes(&self, template: &str) -> Vec<PresentationClass>;
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub class_name: String,
    #[serde(default)]
    pub verbose_name: String,
    #[serde(default)]
    pub description: String,
    /// Templates the class is offered in; empty means every template.
    #[serde(default)]
    pub templates: Vec<String>,
    #[serde(default)]
    pub allowed_elements: Vec<String>,
    #[serde(default)]
    pub column_equiv: Option<usize>,
}

impl StyleEntry {
    fn applies_to(&self, template: &str) -> bool {
        self.templates.is_empty() || self.templates.iter().any(|t| t == template)
    }

    fn to_class(&self) -> PresentationClass {
        PresentationClass {
            name: self.class_name.clone(),
            verbose_name: self.verbose_name.clone(),
            description: self.description.clone(),
            allowed_elements: self.allowed_elements.clone(),
            column_equiv: self.column_equiv,
        }
    }
}

/// In-memory class catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleRegistry {
    entries: Vec<StyleEntry>,
}

impl StyleRegistry {
    pub fn new(entries: Vec<StyleEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn entries(&self) -> &[StyleEntry] {
        &self.entries
    }

    /// Every class in the catalogue, regardless of template.
    pub fn all_classes(&self) -> Vec<PresentationClass> {
        self.entries.iter().map(StyleEntry::to_class).collect()
    }
}

impl StyleLookup for StyleRegistry {
    fn list_classes(&self, template: &str) -> Vec<PresentationClass> {
        self.entries
            .iter()
            .filter(|e| e.applies_to(template))
            .map(StyleEntry::to_class)
            .collect()
    }
}

/// A command or class as offered to an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleDetail {
    /// Wire name, `command:newrow` or `class:fancy`.
    pub name: String,
    pub verbose_name: String,
    pub description: String,
    pub allowed_elements: Vec<String>,
    pub column_equiv: Option<usize>,
}

impl From<Command> for StyleDetail {
    fn from(command: Command) -> Self {
        Self {
            name: PresentationInfo::Command(command).wire_name(),
            verbose_name: command.verbose_name().to_string(),
            description: command.description().to_string(),
            allowed_elements: Vec::new(),
            column_equiv: None,
        }
    }
}

impl From<PresentationClass> for StyleDetail {
    fn from(class: PresentationClass) -> Self {
        Self {
            name: format!("class:{}", class.name),
            verbose_name: class.verbose_name,
            description: class.description,
            allowed_elements: class.allowed_elements,
            column_equiv: class.column_equiv,
        }
    }
}

/// The layout commands followed by the classes available for `template`.
pub fn available_styles(lookup: &dyn StyleLookup, template: &str) -> Vec<StyleDetail> {
    Command::ALL
        .into_iter()
        .map(StyleDetail::from)
        .chain(lookup.list_classes(template).into_iter().map(StyleDetail::from))
        .collect()
}
