//! Presentation information: CSS classes and layout commands.
//!
//! A [`PresentationMap`] is keyed either by a plain section id (classes for
//! that section's own element) or by a command key such as `newrow_h1_1`
//! (the command plus classes for the row or column starting at `h1_1`).
//!
//! On the wire every entry is a string, `class:<name>` or `command:<name>`,
//! so a whole map serializes as a flat JSON object:
//!
//! ```
//! use semlayout::{Command, PresentationInfo, PresentationMap};
//!
//! let map: PresentationMap =
//!     serde_json::from_str(r#"{"newrow_h1_1": ["command:newrow", "class:fancy"]}"#).unwrap();
//! assert!(map["newrow_h1_1"].contains(&PresentationInfo::Command(Command::NewRow)));
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Whether a command opens a row or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Row,
    Column,
}

/// The built-in layout commands, in nesting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    NewRow,
    NewColumn,
    InnerRow,
    InnerColumn,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::NewRow,
        Command::NewColumn,
        Command::InnerRow,
        Command::InnerColumn,
    ];

    /// Name used on the wire and as the stem of the key prefix.
    pub fn name(self) -> &'static str {
        match self {
            Command::NewRow => "newrow",
            Command::NewColumn => "newcol",
            Command::InnerRow => "newinnerrow",
            Command::InnerColumn => "newinnercol",
        }
    }

    /// Prefix for presentation keys carrying this command.
    pub fn prefix(self) -> &'static str {
        match self {
            Command::NewRow => "newrow_",
            Command::NewColumn => "newcol_",
            Command::InnerRow => "newinnerrow_",
            Command::InnerColumn => "newinnercol_",
        }
    }

    /// Nesting rank: a command may only be applied directly inside one of
    /// rank `order() - 1`.
    pub fn order(self) -> usize {
        self as usize
    }

    pub fn from_order(order: usize) -> Option<Command> {
        Command::ALL.get(order).copied()
    }

    pub fn structure_kind(self) -> StructureKind {
        match self {
            Command::NewRow | Command::InnerRow => StructureKind::Row,
            Command::NewColumn | Command::InnerColumn => StructureKind::Column,
        }
    }

    pub fn from_name(name: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn verbose_name(self) -> &'static str {
        match self {
            Command::NewRow => "New row",
            Command::NewColumn => "New column",
            Command::InnerRow => "New inner row",
            Command::InnerColumn => "New inner column",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::NewRow => {
                "Starts a new row. Use together with 'New column' to create a column \
                 layout. Rows can only start on top level sections; to end an existing \
                 column layout, start a new row containing a single column."
            }
            Command::NewColumn => {
                "Starts a new column, after a 'New row' command has been used to start \
                 a set of columns."
            }
            Command::InnerRow => {
                "Starts a row nested inside the current column. Use together with \
                 'New inner column'."
            }
            Command::InnerColumn => {
                "Starts a new column inside an inner row, after 'New inner row' has \
                 been used."
            }
        }
    }

    /// Build the presentation key for this command applied to `sect_id`.
    pub fn key(self, sect_id: &str) -> String {
        format!("{}{}", self.prefix(), sect_id)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verbose_name())
    }
}

/// Split a presentation key into its command (if any) and section id.
///
/// Longer prefixes are tried first, so `newinnerrow_p_1` is never mistaken
/// for a plain key.
pub fn parse_key(key: &str) -> (Option<Command>, &str) {
    for command in Command::ALL {
        if let Some(sect_id) = key.strip_prefix(command.prefix()) {
            return (Some(command), sect_id);
        }
    }
    (None, key)
}

/// A named CSS class with descriptive metadata.
///
/// Only `name` takes part in equality; the rest is informational.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationClass {
    pub name: String,
    #[serde(default)]
    pub verbose_name: String,
    #[serde(default)]
    pub description: String,
    /// Tags this class may be applied to; empty means any.
    #[serde(default)]
    pub allowed_elements: Vec<String>,
    /// Number of logical columns a column carrying this class occupies.
    #[serde(default)]
    pub column_equiv: Option<usize>,
}

impl PartialEq for PresentationClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PresentationClass {}

impl PresentationClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_column_equiv(mut self, equiv: usize) -> Self {
        self.column_equiv = Some(equiv);
        self
    }

    /// True if this class may be applied to an element with `tag`.
    pub fn allows(&self, tag: &str) -> bool {
        self.allowed_elements.is_empty()
            || self
                .allowed_elements
                .iter()
                .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// One piece of presentation information.
#[derive(Debug, Clone)]
pub enum PresentationInfo {
    Class(PresentationClass),
    Command(Command),
}

impl PresentationInfo {
    /// Shortcut for a bare class.
    pub fn class(name: impl Into<String>) -> Self {
        PresentationInfo::Class(PresentationClass::new(name))
    }

    pub fn name(&self) -> &str {
        match self {
            PresentationInfo::Class(c) => &c.name,
            PresentationInfo::Command(c) => c.name(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            PresentationInfo::Class(_) => "class",
            PresentationInfo::Command(_) => "command",
        }
    }

    pub fn as_class(&self) -> Option<&PresentationClass> {
        match self {
            PresentationInfo::Class(c) => Some(c),
            PresentationInfo::Command(_) => None,
        }
    }

    pub fn as_command(&self) -> Option<Command> {
        match self {
            PresentationInfo::Command(c) => Some(*c),
            PresentationInfo::Class(_) => None,
        }
    }

    /// Wire representation, e.g. `class:fancy` or `command:newrow`.
    pub fn wire_name(&self) -> String {
        format!("{}:{}", self.kind(), self.name())
    }

    /// Parse the wire representation.
    pub fn from_wire(s: &str) -> Option<Self> {
        let (kind, name) = s.split_once(':')?;
        match kind {
            "class" if !name.is_empty() => Some(PresentationInfo::class(name)),
            "command" => Command::from_name(name).map(PresentationInfo::Command),
            _ => None,
        }
    }
}

impl From<Command> for PresentationInfo {
    fn from(command: Command) -> Self {
        PresentationInfo::Command(command)
    }
}

impl From<PresentationClass> for PresentationInfo {
    fn from(class: PresentationClass) -> Self {
        PresentationInfo::Class(class)
    }
}

impl PartialEq for PresentationInfo {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.name() == other.name()
    }
}

impl Eq for PresentationInfo {}

impl Hash for PresentationInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.name().hash(state);
    }
}

impl PartialOrd for PresentationInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PresentationInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.kind(), self.name()).cmp(&(other.kind(), other.name()))
    }
}

impl Serialize for PresentationInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.wire_name())
    }
}

impl<'de> Deserialize<'de> for PresentationInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PresentationInfo::from_wire(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognised presentation info '{s}'"))
        })
    }
}

/// Set of presentation info for one key.
pub type PresentationSet = BTreeSet<PresentationInfo>;

/// Mapping from presentation key to presentation info.
pub type PresentationMap = BTreeMap<String, PresentationSet>;

/// Class entries of a set, in name order.
pub fn classes_of(set: &PresentationSet) -> Vec<&PresentationClass> {
    set.iter().filter_map(PresentationInfo::as_class).collect()
}

/// Class names of a set, in name order.
pub fn class_names(set: &PresentationSet) -> Vec<String> {
    classes_of(set).into_iter().map(|c| c.name.clone()).collect()
}

/// Bring a presentation map into the canonical form used for formatting.
///
/// - every section in `sect_ids` has an entry (possibly empty);
/// - a command key always contains its own command;
/// - a `NewRow` key implies a `NewColumn` key for the same section, and an
///   `InnerRow` key an `InnerColumn` key (a row always starts a column).
///
/// Keys for sections that no longer exist are kept; the builder ignores them.
pub fn sanitize_presentation(map: &PresentationMap, sect_ids: &[String]) -> PresentationMap {
    let mut out = map.clone();

    for sect_id in sect_ids {
        out.entry(sect_id.clone()).or_default();
    }

    let keys: Vec<String> = out.keys().cloned().collect();
    for key in keys {
        let (Some(command), sect_id) = parse_key(&key) else {
            continue;
        };
        let sect_id = sect_id.to_string();
        if let Some(set) = out.get_mut(&key) {
            set.insert(PresentationInfo::Command(command));
        }
        let implied = match command {
            Command::NewRow => Some(Command::NewColumn),
            Command::InnerRow => Some(Command::InnerColumn),
            _ => None,
        };
        if let Some(implied) = implied {
            out.entry(implied.key(&sect_id))
                .or_default()
                .insert(PresentationInfo::Command(implied));
        }
    }

    out
}

/// Replace bare class entries with full definitions from `known`.
///
/// Classes arriving over the wire carry only a name; this restores metadata
/// such as `column_equiv`. Unknown names are left untouched.
pub fn resolve_classes(map: &mut PresentationMap, known: &[PresentationClass]) {
    for set in map.values_mut() {
        let names: Vec<String> = class_names(set);
        for name in names {
            if let Some(def) = known.iter().find(|k| k.name == name) {
                set.replace(PresentationInfo::Class(def.clone()));
            }
        }
    }
}
