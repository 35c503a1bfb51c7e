//! Row and column layout.
//!
//! Layout commands in a [`PresentationMap`] are turned into a [`Layout`]
//! tree first, validated, and only then materialized as markup by
//! [`render_layout`]. The tree refers to the document's top-level nodes by
//! id; nothing in the document changes until rendering.

mod render;
mod strategy;

use std::collections::HashMap;

pub use render::render_layout;
pub use strategy::{LayoutDetails, LayoutStrategy};

use crate::dom::{ArenaNodeId, Document};
use crate::error::{Error, Result};
use crate::presentation::{
    Command, PresentationClass, PresentationMap, StructureKind, classes_of, parse_key,
};
use crate::structure::StructureItem;

/// Something placed inside the layout root or a column.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    /// An original top-level node of the document.
    Content(ArenaNodeId),
    Row(LayoutRow),
}

/// Root of a layout tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub items: Vec<LayoutItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutRow {
    pub columns: Vec<LayoutColumn>,
    pub classes: Vec<PresentationClass>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutColumn {
    pub items: Vec<LayoutItem>,
    pub classes: Vec<PresentationClass>,
}

impl LayoutRow {
    /// Sum of the column widths.
    pub fn logical_width(&self) -> usize {
        self.columns
            .iter()
            .fold(0, |width, col| width.saturating_add(col.width()))
    }
}

impl LayoutColumn {
    /// Number of logical columns this column occupies.
    pub fn width(&self) -> usize {
        self.classes
            .iter()
            .filter_map(|c| c.column_equiv)
            .max()
            .unwrap_or(1)
    }

    /// The first document node inside this column, looking into inner rows.
    pub fn first_content(&self) -> Option<ArenaNodeId> {
        first_content(&self.items)
    }
}

fn first_content(items: &[LayoutItem]) -> Option<ArenaNodeId> {
    items.iter().find_map(|item| match item {
        LayoutItem::Content(id) => Some(*id),
        LayoutItem::Row(row) => row.columns.iter().find_map(LayoutColumn::first_content),
    })
}

/// A command attached to a section, with the classes for the new container.
struct PendingCommand {
    command: Command,
    classes: Vec<PresentationClass>,
}

/// Build the layout tree for the top-level nodes of `doc`.
///
/// Only prefixed keys (`newrow_h1_1`, ...) open rows and columns; keys for
/// sections that are not in `structure` are ignored.
pub fn build_layout(
    doc: &Document,
    structure: &[StructureItem],
    presentation: &PresentationMap,
) -> Result<Layout> {
    let commands = find_layout_commands(doc, structure, presentation)?;
    let by_node: HashMap<ArenaNodeId, &StructureItem> =
        structure.iter().map(|s| (s.node, s)).collect();

    let mut builder = Builder::new();
    for node in doc.top_level() {
        if let Some(item) = by_node.get(&node)
            && let Some(pending) = commands.get(item.sect_id.as_str())
        {
            for p in pending {
                builder.apply(item, p)?;
            }
        }
        builder.push_content(node);
    }

    let mut layout = builder.finish();
    prune_layout(&mut layout.items);
    Ok(layout)
}

/// Collect the layout commands per section, in nesting order, rejecting
/// commands on sections below the top level.
fn find_layout_commands<'a>(
    doc: &Document,
    structure: &'a [StructureItem],
    presentation: &PresentationMap,
) -> Result<HashMap<&'a str, Vec<PendingCommand>>> {
    let by_id: HashMap<&str, &StructureItem> =
        structure.iter().map(|s| (s.sect_id.as_str(), s)).collect();

    let mut commands: HashMap<&'a str, Vec<PendingCommand>> = HashMap::new();
    for (key, set) in presentation {
        let (Some(command), sect_id) = parse_key(key) else {
            continue;
        };
        let Some(&item) = by_id.get(sect_id) else {
            continue;
        };
        if doc.dom.parent(item.node) != Some(doc.root) {
            return Err(Error::BadStructure(format!(
                "Section \"{}\" is not at the top level of the document, and therefore \
                 cannot have a column structure applied to it. Please move the '{}' \
                 command to a top level element.",
                item.name, command
            )));
        }
        commands
            .entry(item.sect_id.as_str())
            .or_default()
            .push(PendingCommand {
                command,
                classes: classes_of(set).into_iter().cloned().collect(),
            });
    }

    for pending in commands.values_mut() {
        pending.sort_by_key(|p| p.command.order());
    }
    Ok(commands)
}

/// An open container while building.
enum Open {
    Root(Vec<LayoutItem>),
    /// A row and the outline level of the section that opened it.
    Row(LayoutRow, usize),
    Column(LayoutColumn),
}

/// Stack-based layout builder.
///
/// The stack always holds the root plus one container per open nesting
/// rank, so its length is `rank + 2` once any command has been applied.
struct Builder {
    stack: Vec<Open>,
    rank: Option<usize>,
}

impl Builder {
    fn new() -> Self {
        Self {
            stack: vec![Open::Root(Vec::new())],
            rank: None,
        }
    }

    fn apply(&mut self, item: &StructureItem, pending: &PendingCommand) -> Result<()> {
        let order = pending.command.order();
        let allowed = self.rank.map_or(0, |r| r + 1);
        if order > allowed {
            let missing = Command::from_order(allowed).unwrap_or(Command::NewRow);
            return Err(Error::BadStructure(format!(
                "Section \"{}\" has a '{}' command, but there is no enclosing '{}'. \
                 Please add a '{}' command first.",
                item.name, pending.command, missing, missing
            )));
        }

        while self.stack.len() > order + 1 {
            self.close_top();
        }

        // Columns within a row start on sections at the row's own level.
        if let Some(Open::Row(_, row_level)) = self.stack.last()
            && pending.command.structure_kind() == StructureKind::Column
            && item.level > *row_level
        {
            let row_command = Command::from_order(order.saturating_sub(1)).unwrap_or(Command::NewRow);
            return Err(Error::BadStructure(format!(
                "Section \"{}\" has a '{}' command, but it is at a deeper level than the \
                 section that started the row. Please add a '{}' command at this level first.",
                item.name, pending.command, row_command
            )));
        }

        let classes = pending.classes.clone();
        self.stack.push(match pending.command.structure_kind() {
            StructureKind::Row => Open::Row(
                LayoutRow {
                    columns: Vec::new(),
                    classes,
                },
                item.level,
            ),
            StructureKind::Column => Open::Column(LayoutColumn {
                items: Vec::new(),
                classes,
            }),
        });
        self.rank = Some(order);
        Ok(())
    }

    fn push_content(&mut self, node: ArenaNodeId) {
        // Rows only hold columns: content arriving in a row opens one.
        if matches!(self.stack.last(), Some(Open::Row(..))) {
            self.stack.push(Open::Column(LayoutColumn::default()));
            self.rank = self.rank.map(|r| r + 1);
        }
        match self.stack.last_mut() {
            Some(Open::Root(items)) => items.push(LayoutItem::Content(node)),
            Some(Open::Column(col)) => col.items.push(LayoutItem::Content(node)),
            Some(Open::Row(..)) | None => {}
        }
    }

    /// Pop the innermost container and attach it to its parent.
    fn close_top(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(top) = self.stack.pop() else {
            return;
        };
        let Some(parent) = self.stack.last_mut() else {
            return;
        };
        match (top, parent) {
            (Open::Column(col), Open::Row(row, _)) => row.columns.push(col),
            (Open::Row(row, _), Open::Root(items)) => items.push(LayoutItem::Row(row)),
            (Open::Row(row, _), Open::Column(col)) => col.items.push(LayoutItem::Row(row)),
            _ => {}
        }
    }

    fn finish(mut self) -> Layout {
        while self.stack.len() > 1 {
            self.close_top();
        }
        match self.stack.pop() {
            Some(Open::Root(items)) => Layout { items },
            _ => Layout::default(),
        }
    }
}

/// Remove rows without columns and columns without content, bottom-up.
fn prune_layout(items: &mut Vec<LayoutItem>) {
    for item in items.iter_mut() {
        if let LayoutItem::Row(row) = item {
            for col in &mut row.columns {
                prune_layout(&mut col.items);
            }
            row.columns.retain(|c| !c.items.is_empty());
        }
    }
    items.retain(|item| match item {
        LayoutItem::Row(row) => !row.columns.is_empty(),
        LayoutItem::Content(_) => true,
    });
}

/// Check every row against the strategy's maximum width.
///
/// The error names the section that starts the first column which does not
/// fit.
pub fn check_layout(
    layout: &Layout,
    structure: &[StructureItem],
    strategy: &dyn LayoutStrategy,
) -> Result<()> {
    let names: HashMap<ArenaNodeId, &str> = structure
        .iter()
        .map(|s| (s.node, s.name.as_str()))
        .collect();
    check_items(&layout.items, &names, strategy.max_columns())
}

fn check_items(
    items: &[LayoutItem],
    names: &HashMap<ArenaNodeId, &str>,
    max_columns: usize,
) -> Result<()> {
    for item in items {
        let LayoutItem::Row(row) = item else {
            continue;
        };
        let mut width: usize = 0;
        for col in &row.columns {
            width = width.saturating_add(col.width());
            if width > max_columns {
                let name = col
                    .first_content()
                    .and_then(|n| names.get(&n).copied())
                    .unwrap_or("(unnamed)");
                return Err(Error::TooManyColumns(format!(
                    "The maximum number of columns is {max_columns}. \
                     Please move section '{name}' into a new row."
                )));
            }
            check_items(&col.items, names, max_columns)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_xml;
    use crate::presentation::{PresentationInfo, PresentationSet, sanitize_presentation};
    use crate::structure::get_structure;

    fn pres(entries: &[(&str, Vec<PresentationInfo>)]) -> PresentationMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().cloned().collect::<PresentationSet>()))
            .collect()
    }

    fn build(markup: &str, map: &PresentationMap) -> Result<(Document, Vec<StructureItem>, Layout)> {
        let doc = parse_xml(markup)?;
        let structure = get_structure(&doc.dom, doc.root, true)?;
        let ids: Vec<String> = structure.iter().map(|s| s.sect_id.clone()).collect();
        let map = sanitize_presentation(map, &ids);
        let layout = build_layout(&doc, &structure, &map)?;
        Ok((doc, structure, layout))
    }

    fn shape(items: &[LayoutItem]) -> String {
        items
            .iter()
            .map(|item| match item {
                LayoutItem::Content(_) => "c".to_string(),
                LayoutItem::Row(row) => format!(
                    "R[{}]",
                    row.columns
                        .iter()
                        .map(|c| format!("C({})", shape(&c.items)))
                        .collect::<Vec<_>>()
                        .join(",")
                ),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_no_commands_leaves_content_at_root() {
        let (_, _, layout) = build("<h1>1</h1><p>x</p>", &PresentationMap::new()).unwrap();
        assert_eq!(shape(&layout.items), "c c");
    }

    #[test]
    fn test_two_columns() {
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newcol_h1_2", vec![Command::NewColumn.into()]),
        ]);
        let (_, _, layout) = build("<h1>1</h1><p>para</p><h1>2</h1><h1>3</h1>", &map).unwrap();
        assert_eq!(shape(&layout.items), "R[C(c c),C(c c)]");
    }

    #[test]
    fn test_content_before_first_row_stays_outside() {
        let map = pres(&[
            ("newrow_h2_1", vec![Command::NewRow.into()]),
            ("newcol_h2_2", vec![Command::NewColumn.into()]),
        ]);
        let (_, _, layout) =
            build("<h1>1</h1><h2>1.1</h2><h2>1.2</h2>", &map).unwrap();
        assert_eq!(shape(&layout.items), "c R[C(c),C(c)]");
    }

    #[test]
    fn test_inner_row() {
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newcol_h1_2", vec![Command::NewColumn.into()]),
            ("newinnerrow_h2_1", vec![Command::InnerRow.into()]),
            ("newinnercol_h2_2", vec![Command::InnerColumn.into()]),
        ]);
        let (_, _, layout) = build(
            "<h1>1</h1><h1>2</h1><h2>2.1</h2><h2>2.2</h2>",
            &map,
        )
        .unwrap();
        assert_eq!(shape(&layout.items), "R[C(c),C(c R[C(c),C(c)])]");
    }

    #[test]
    fn test_column_without_row_rejected() {
        let map = pres(&[("newcol_h2_1", vec![Command::NewColumn.into()])]);
        let Err(err) = build("<h1>1</h1><h2>2</h2>", &map) else {
            panic!("expected an error");
        };
        assert!(matches!(err, Error::BadStructure(_)));
        assert!(err.to_string().contains("'New row'"));
    }

    #[test]
    fn test_inner_column_without_inner_row_rejected() {
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newinnercol_h1_2", vec![Command::InnerColumn.into()]),
        ]);
        let Err(err) = build("<h1>1</h1><h1>2</h1>", &map) else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("'New inner row'"));
    }

    #[test]
    fn test_command_below_top_level_rejected() {
        let map = pres(&[("newrow_p_1", vec![Command::NewRow.into()])]);
        let Err(err) = build("<blockquote><p>How are you</p></blockquote>", &map) else {
            panic!("expected an error");
        };
        assert!(err.is_bad_structure());
        assert!(err.to_string().contains("How are you..."));
    }

    #[test]
    fn test_column_deeper_than_row_rejected() {
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newcol_h2_2", vec![Command::NewColumn.into()]),
        ]);
        let Err(err) = build("<h1>1</h1><h2>1.1</h2><h2>1.2</h2>", &map) else {
            panic!("expected an error");
        };
        assert!(matches!(err, Error::BadStructure(_)));
        assert!(err.to_string().contains("Section \"1.2\""));
        assert!(err.to_string().contains("'New row' command at this level"));

        // A paragraph sits below its heading, so it cannot start a column either.
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newcol_p_1", vec![Command::NewColumn.into()]),
        ]);
        assert!(build("<h1>1</h1><p>x</p>", &map).is_err());
    }

    #[test]
    fn test_column_at_shallower_level_allowed() {
        let map = pres(&[
            ("newrow_h2_1", vec![Command::NewRow.into()]),
            ("newcol_h1_2", vec![Command::NewColumn.into()]),
        ]);
        let (_, _, layout) = build("<h1>1</h1><h2>1.1</h2><h1>2</h1>", &map).unwrap();
        assert_eq!(shape(&layout.items), "c R[C(c),C(c)]");
    }

    #[test]
    fn test_inner_column_deeper_than_inner_row_rejected() {
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newinnerrow_h2_1", vec![Command::InnerRow.into()]),
            ("newinnercol_h3_1", vec![Command::InnerColumn.into()]),
        ]);
        let Err(err) = build("<h1>1</h1><h2>1.1</h2><h3>1.1.1</h3>", &map) else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("'New inner row' command at this level"));
    }

    #[test]
    fn test_stale_keys_ignored() {
        let map = pres(&[("newrow_h1_9", vec![Command::NewRow.into()])]);
        let (_, _, layout) = build("<h1>1</h1>", &map).unwrap();
        assert_eq!(shape(&layout.items), "c");
    }

    #[test]
    fn test_max_columns() {
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newcol_h1_2", vec![Command::NewColumn.into()]),
            ("newcol_h1_3", vec![Command::NewColumn.into()]),
            ("newcol_h1_4", vec![Command::NewColumn.into()]),
            ("newcol_h1_5", vec![Command::NewColumn.into()]),
        ]);
        let (_, structure, layout) =
            build("<h1>1</h1><h1>2</h1><h1>3</h1><h1>4</h1><h1>5</h1>", &map).unwrap();
        let strategy = LayoutDetails::default().with_max_columns(4);
        let err = check_layout(&layout, &structure, &strategy).unwrap_err();
        assert!(matches!(err, Error::TooManyColumns(_)));
        assert_eq!(
            err.to_string(),
            "The maximum number of columns is 4. Please move section '5' into a new row."
        );
        assert!(check_layout(&layout, &structure, &LayoutDetails::default()).is_ok());
    }

    #[test]
    fn test_huge_column_equiv_does_not_overflow() {
        let huge = || {
            PresentationInfo::Class(PresentationClass::new("huge").with_column_equiv(usize::MAX))
        };
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newcol_h1_1", vec![Command::NewColumn.into(), huge()]),
            ("newcol_h1_2", vec![Command::NewColumn.into(), huge()]),
        ]);
        let (_, structure, layout) = build("<h1>1</h1><h1>2</h1>", &map).unwrap();
        let LayoutItem::Row(row) = &layout.items[0] else {
            panic!("expected a row");
        };
        assert_eq!(row.logical_width(), usize::MAX);
        let err = check_layout(&layout, &structure, &LayoutDetails::default()).unwrap_err();
        assert!(err.to_string().contains("section '1'"));
    }

    #[test]
    fn test_max_columns_counts_double_width() {
        let wide = || PresentationInfo::Class(PresentationClass::new("doublewidth").with_column_equiv(2));
        let map = pres(&[
            ("newrow_h1_1", vec![Command::NewRow.into()]),
            ("newcol_h1_1", vec![Command::NewColumn.into(), wide()]),
            ("newcol_h1_2", vec![Command::NewColumn.into(), wide()]),
            ("newcol_h1_3", vec![Command::NewColumn.into()]),
        ]);
        let (_, structure, layout) = build("<h1>1</h1><h1>2</h1><h1>3</h1>", &map).unwrap();
        let strategy = LayoutDetails::default().with_max_columns(4);
        let err = check_layout(&layout, &structure, &strategy).unwrap_err();
        assert!(err.to_string().contains("section '3'"));
    }
}
