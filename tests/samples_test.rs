//! End-to-end behaviour of the public API on small documents.
//!
//! Layout cases follow the column tests of the semantic editor this crate
//! grew out of, adjusted for the rule that a document without layout
//! commands gets no wrappers at all.

use std::borrow::Cow;

use semlayout::dom::Document;
use semlayout::{
    Command, Error, LayoutDetails, LayoutStrategy, PresentationClass, PresentationInfo,
    PresentationMap, PresentationSet, StructureItem, extract_presentation, extract_structure, format_html,
};

fn pres(entries: &[(&str, &[PresentationInfo])]) -> PresentationMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.iter().cloned().collect()))
        .collect()
}

fn newrow() -> PresentationInfo {
    PresentationInfo::Command(Command::NewRow)
}

fn newcol() -> PresentationInfo {
    PresentationInfo::Command(Command::NewColumn)
}

fn class(name: &str) -> PresentationInfo {
    PresentationInfo::class(name)
}

fn doublewidth() -> PresentationInfo {
    PresentationInfo::Class(PresentationClass::new("doublewidth").with_column_equiv(2))
}

fn format(html: &str, map: &PresentationMap) -> semlayout::Result<String> {
    format_html(html, map, &LayoutDetails::default())
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_baseline_extraction() {
    let outline = extract_structure("<h1>Heading <b>with </b>text</h1><p>Body</p>").unwrap();
    let summary: Vec<(usize, &str, &str)> = outline
        .iter()
        .map(|s| (s.level, s.sect_id.as_str(), s.tag.as_str()))
        .collect();
    assert_eq!(summary, vec![(1, "h1_1", "h1"), (2, "p_1", "p")]);
    assert_eq!(outline[0].name, "Heading with text");
}

#[test]
fn test_rejected_heading_skip() {
    let err = extract_structure("<h1>A</h1><h3>B</h3>").unwrap_err();
    assert!(matches!(err, Error::IncorrectHeadings(_)));
    assert!(err.to_string().contains("\"B\""));
    assert!(err.to_string().contains("H2"));
}

#[test]
fn test_relative_levels() {
    let outline = extract_structure("<h3>A</h3><h4>B</h4><p>x</p><h3>C</h3>").unwrap();
    let levels: Vec<usize> = outline.iter().map(|s| s.level).collect();
    assert_eq!(levels, vec![1, 2, 3, 1]);
}

#[test]
fn test_structure_serializes_without_nodes() {
    let outline = extract_structure("<h1>Title</h1>").unwrap();
    let json = serde_json::to_value(&outline).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{"level": 1, "sect_id": "h1_1", "name": "Title", "tag": "h1"}])
    );
}

// ============================================================================
// Formatting
// ============================================================================

#[test]
fn test_simple_two_column_layout() {
    let html = "<h1>1</h1><p>para</p><h1>2</h1><h1>3</h1>";
    let map = pres(&[("newrow_h1_1", &[newrow()]), ("newcol_h1_2", &[newcol()])]);

    let out = format(html, &map).unwrap();
    assert_eq!(
        out,
        "<div class=\"row columns2\">\
         <div class=\"column firstcolumn\"><div><h1>1</h1><p>para</p></div></div>\
         <div class=\"column lastcolumn\"><div><h1>2</h1><h1>3</h1></div></div>\
         </div>"
    );

    let (recovered, clean) = extract_presentation(&out, &LayoutDetails::default()).unwrap();
    let expected = pres(&[
        ("h1_1", &[]),
        ("p_1", &[]),
        ("h1_2", &[]),
        ("h1_3", &[]),
        ("newrow_h1_1", &[newrow()]),
        ("newcol_h1_1", &[newcol()]),
        ("newcol_h1_2", &[newcol()]),
    ]);
    assert_eq!(recovered, expected);
    assert_eq!(
        clean,
        "<h1 id=\"h1_1\">1</h1><p id=\"p_1\">para</p><h1 id=\"h1_2\">2</h1><h1 id=\"h1_3\">3</h1>"
    );
}

#[test]
fn test_column_overflow() {
    let html = "<h1>1</h1><h1>2</h1><h1>3</h1><h1>4</h1><h1>5</h1>";
    let map = pres(&[
        ("newrow_h1_1", &[newrow()]),
        ("newcol_h1_2", &[newcol()]),
        ("newcol_h1_3", &[newcol()]),
        ("newcol_h1_4", &[newcol()]),
        ("newcol_h1_5", &[newcol()]),
    ]);
    let strategy = LayoutDetails::default().with_max_columns(4);

    let err = format_html(html, &map, &strategy).unwrap_err();
    assert!(matches!(err, Error::TooManyColumns(_)));
    assert!(err.is_bad_structure());
    assert_eq!(
        err.to_string(),
        "The maximum number of columns is 4. Please move section '5' into a new row."
    );

    // The default maximum of six fits all five.
    assert!(format(html, &map).is_ok());
}

#[test]
fn test_column_overflow_with_double_width() {
    let html = "<h1>1</h1><h1>2</h1><h1>3</h1>";
    let map = pres(&[
        ("newrow_h1_1", &[newrow()]),
        ("newcol_h1_1", &[newcol(), doublewidth()]),
        ("newcol_h1_2", &[newcol(), doublewidth()]),
        ("newcol_h1_3", &[newcol()]),
    ]);
    let strategy = LayoutDetails::default().with_max_columns(4);
    let err = format_html(html, &map, &strategy).unwrap_err();
    assert!(err.to_string().contains("'3'"));
}

#[test]
fn test_illegal_command_nesting() {
    let html = "<h1>1</h1><h2>1.1</h2><h2>1.2</h2>";
    let map = pres(&[("newcol_h2_2", &[newcol()])]);
    let err = format(html, &map).unwrap_err();
    assert!(matches!(err, Error::BadStructure(_)));
    assert_eq!(
        err.to_string(),
        "Section \"1.2\" has a 'New column' command, but there is no enclosing 'New row'. \
         Please add a 'New row' command first."
    );

    // The row is opened on the h1, so an h2 inside it cannot start a column.
    let map = pres(&[("newrow_h1_1", &[newrow()]), ("newcol_h2_2", &[newcol()])]);
    let err = format(html, &map).unwrap_err();
    assert!(matches!(err, Error::BadStructure(_)));
    assert_eq!(
        err.to_string(),
        "Section \"1.2\" has a 'New column' command, but it is at a deeper level than the \
         section that started the row. Please add a 'New row' command at this level first."
    );

    // Opening a row at the h2 level makes the same column legal.
    let map = pres(&[
        ("newrow_h1_1", &[newrow()]),
        ("newrow_h2_1", &[newrow()]),
        ("newcol_h2_2", &[newcol()]),
    ]);
    assert!(format(html, &map).is_ok());
}

#[test]
fn test_commands_below_top_level() {
    let html = "<blockquote><p>How are you</p></blockquote>";
    for key in ["newrow_p_1", "newcol_p_1"] {
        let map = pres(&[(key, &[newrow()])]);
        let err = format(html, &map).unwrap_err();
        assert!(matches!(err, Error::BadStructure(_)), "{key}");
        assert!(err.to_string().contains("How are you"));
    }
}

#[test]
fn test_double_width_columns() {
    let html = "<h1>1</h1><p>para 1</p><h1>2</h1>";
    let map = pres(&[
        ("newrow_h1_1", &[newrow()]),
        ("newcol_h1_1", &[newcol(), doublewidth()]),
        ("newcol_h1_2", &[newcol()]),
    ]);
    assert_eq!(
        format(html, &map).unwrap(),
        "<div class=\"row columns3\">\
         <div class=\"column firstcolumn doublewidth\"><div><h1>1</h1><p>para 1</p></div></div>\
         <div class=\"column lastcolumn\"><div><h1>2</h1></div></div>\
         </div>"
    );

    let map = pres(&[
        ("newrow_h1_1", &[newrow()]),
        ("newcol_h1_2", &[newcol(), doublewidth()]),
    ]);
    assert_eq!(
        format(html, &map).unwrap(),
        "<div class=\"row columns3\">\
         <div class=\"column firstcolumn\"><div><h1>1</h1><p>para 1</p></div></div>\
         <div class=\"column lastcolumn doublewidth\"><div><h1>2</h1></div></div>\
         </div>"
    );
}

#[test]
fn test_no_layout_without_commands() {
    assert_eq!(format("", &PresentationMap::new()).unwrap(), "");
    assert_eq!(
        format("<p>Test</p><foo>Unknown</foo>", &PresentationMap::new()).unwrap(),
        "<p>Test</p><foo>Unknown</foo>"
    );
}

#[test]
fn test_add_css_classes() {
    let html = "<h1 class=\"old\">Hello <em>you</em></h1><h2>Hi</h2>";
    let map = pres(&[
        ("h1_1", &[class("myclass")]),
        ("h2_1", &[class("c2"), class("c1")]),
    ]);
    assert_eq!(
        format(html, &map).unwrap(),
        "<h1 class=\"myclass\">Hello <em>you</em></h1><h2 class=\"c1 c2\">Hi</h2>"
    );
}

#[test]
fn test_rows_after_plain_content() {
    let html = "<h1>1</h1><h1>2</h1><h2>2.1</h2><h2>2.2</h2><h2>2.3</h2><h2>2.4</h2><h1>3</h1><h1>4</h1>";
    let map = pres(&[
        ("newrow_h2_1", &[newrow()]),
        ("newcol_h2_2", &[newcol()]),
        ("newrow_h2_3", &[newrow()]),
        ("newcol_h2_4", &[newcol()]),
        ("newrow_h1_3", &[newrow()]),
        ("newcol_h1_4", &[newcol()]),
    ]);
    let two = |a: &str, b: &str| {
        format!(
            "<div class=\"row columns2\">\
             <div class=\"column firstcolumn\"><div>{a}</div></div>\
             <div class=\"column lastcolumn\"><div>{b}</div></div>\
             </div>"
        )
    };
    let expected = format!(
        "<h1>1</h1><h1>2</h1>{}{}{}",
        two("<h2>2.1</h2>", "<h2>2.2</h2>"),
        two("<h2>2.3</h2>", "<h2>2.4</h2>"),
        two("<h1>3</h1>", "<h1>4</h1>"),
    );
    assert_eq!(format(html, &map).unwrap(), expected);
}

#[test]
fn test_layout_with_styling() {
    let html = "<h1>1</h1><p>para 1</p><h1>2</h1><h1>3</h1>";
    let map = pres(&[
        ("newrow_h1_1", &[newrow(), class("fancyrow")]),
        ("newcol_h1_2", &[newcol(), class("fancycol")]),
    ]);
    assert_eq!(
        format(html, &map).unwrap(),
        "<div class=\"row columns2 fancyrow\">\
         <div class=\"column firstcolumn\"><div><h1>1</h1><p>para 1</p></div></div>\
         <div class=\"column lastcolumn\"><div class=\"fancycol\"><h1>2</h1><h1>3</h1></div></div>\
         </div>"
    );
}

#[test]
fn test_single_column_row() {
    let html = "<h1>1</h1><p>para 1</p><h2>2</h2>";
    let map = pres(&[("newrow_h1_1", &[newrow()])]);
    assert_eq!(
        format(html, &map).unwrap(),
        "<div class=\"row\"><div><div><h1>1</h1><p>para 1</p><h2>2</h2></div></div></div>"
    );

    // A command stored under a plain section key does not open anything.
    let map = pres(&[("h1_1", &[newrow()])]);
    assert_eq!(format(html, &map).unwrap(), html);
}

#[test]
fn test_inner_rows() {
    let html = "<h1>1</h1><h1>2</h1><h2>2.1</h2><h2>2.2</h2>";
    let map = pres(&[
        ("newrow_h1_1", &[newrow()]),
        ("newcol_h1_2", &[newcol()]),
        ("newinnerrow_h2_1", &[PresentationInfo::Command(Command::InnerRow)]),
        ("newinnercol_h2_2", &[PresentationInfo::Command(Command::InnerColumn)]),
    ]);
    assert_eq!(
        format(html, &map).unwrap(),
        "<div class=\"row columns2\">\
         <div class=\"column firstcolumn\"><div><h1>1</h1></div></div>\
         <div class=\"column lastcolumn\"><div><h1>2</h1>\
         <div class=\"row columns2\">\
         <div class=\"column firstcolumn\"><div><h2>2.1</h2></div></div>\
         <div class=\"column lastcolumn\"><div><h2>2.2</h2></div></div>\
         </div></div></div></div>"
    );
}

#[test]
fn test_format_rejects_bad_headings() {
    let err = format("<h2>A</h2><h1>B</h1>", &PresentationMap::new()).unwrap_err();
    assert!(matches!(err, Error::IncorrectHeadings(_)));
    assert!(err.is_user_error());
}

#[test]
fn test_format_reformats_decorated_markup() {
    // Feeding decorated markup back in drops the old wrappers.
    let html = "<h1>1</h1><h1>2</h1>";
    let map = pres(&[("newrow_h1_1", &[newrow()]), ("newcol_h1_2", &[newcol()])]);
    let once = format(html, &map).unwrap();
    assert_eq!(format(&once, &PresentationMap::new()).unwrap(), html);
    assert_eq!(format(&once, &map).unwrap(), once);
}

// ============================================================================
// Paragraphs rendered as div
// ============================================================================

#[test]
fn test_div_class_renders_paragraph_as_div() {
    let map = pres(&[("p_1", &[class("div")])]);
    assert_eq!(
        format("<p>Test</p>", &map).unwrap(),
        "<div class=\"div\">Test</div>"
    );
}

#[test]
fn test_div_class_extracts_back_to_paragraph() {
    let (map, clean) =
        extract_presentation("<div class=\"div\">Test</div>", &LayoutDetails::default()).unwrap();
    assert_eq!(map, pres(&[("p_1", &[class("div")])]));
    assert_eq!(clean, "<p id=\"p_1\">Test</p>");
}

#[test]
fn test_div_class_inside_columns_round_trips() {
    let html = "<h1>1</h1><p>Boxed</p><h1>2</h1>";
    let map = pres(&[
        ("p_1", &[class("div")]),
        ("newrow_h1_1", &[newrow()]),
        ("newcol_h1_2", &[newcol()]),
    ]);
    let combined = format(html, &map).unwrap();
    assert_eq!(
        combined,
        "<div class=\"row columns2\">\
         <div class=\"column firstcolumn\"><div><h1>1</h1><div class=\"div\">Boxed</div></div></div>\
         <div class=\"column lastcolumn\"><div><h1>2</h1></div></div>\
         </div>"
    );
    let (recovered, clean) = extract_presentation(&combined, &LayoutDetails::default()).unwrap();
    assert_eq!(recovered["p_1"], PresentationSet::from([class("div")]));
    assert_eq!(format(&clean, &recovered).unwrap(), combined);
}

#[test]
fn test_plugin_paragraph_renders_as_div() {
    let html = "<p> <img src=\"blah\" id=\"plugin_obj_123\" /></p>";
    assert_eq!(
        format(html, &PresentationMap::new()).unwrap(),
        "<div class=\"div\"> <img src=\"blah\" id=\"plugin_obj_123\" /></div>"
    );
}

#[test]
fn test_plugin_paragraph_with_text_stays_paragraph() {
    for html in [
        "<p>X <img src=\"blah\" id=\"plugin_obj_123\" /></p>",
        "<p> <img src=\"blah\" id=\"plugin_obj_123\" />X</p>",
        "<p><img src=\"photo.png\" id=\"photo_1\" /></p>",
    ] {
        assert_eq!(format(html, &PresentationMap::new()).unwrap(), html);
    }
}

#[test]
fn test_div_class_rule_can_be_disabled() {
    let strategy = LayoutDetails::default().with_div_class("");
    let map = pres(&[("p_1", &[class("div")])]);
    assert_eq!(
        format_html("<p>Test</p>", &map, &strategy).unwrap(),
        "<p class=\"div\">Test</p>"
    );
    let html = "<p> <img src=\"blah\" id=\"plugin_obj_123\" /></p>";
    assert_eq!(format_html(html, &PresentationMap::new(), &strategy).unwrap(), html);
}

// ============================================================================
// Strategy hooks
// ============================================================================

/// Expands a `[plugin]` shortcode into the editor's placeholder image, and
/// folds it back when extracting.
struct Shortcodes(LayoutDetails);

const PLUGIN_IMG: &str = "<img id=\"plugin_obj_1\" src=\"plugin.png\" />";

impl LayoutStrategy for Shortcodes {
    fn max_columns(&self) -> usize {
        self.0.max_columns()
    }

    fn use_inner_column_div(&self) -> bool {
        self.0.use_inner_column_div()
    }

    fn row_classes(&self, logical: usize, actual: usize) -> Vec<String> {
        self.0.row_classes(logical, actual)
    }

    fn column_classes(&self, position: usize, actual: usize) -> Vec<String> {
        self.0.column_classes(position, actual)
    }

    fn is_row_class(&self, class: &str) -> bool {
        self.0.is_row_class(class)
    }

    fn is_column_class(&self, class: &str) -> bool {
        self.0.is_column_class(class)
    }

    fn format_pre_parse<'a>(&self, html: &'a str) -> Cow<'a, str> {
        Cow::Owned(html.replace("[plugin]", PLUGIN_IMG))
    }

    fn format_structure(&self, doc: &mut Document, structure: &mut Vec<StructureItem>) {
        self.0.format_structure(doc, structure);
    }

    fn extract_pre_parse<'a>(&self, html: &'a str) -> Cow<'a, str> {
        Cow::Owned(html.replace(PLUGIN_IMG, "[plugin]"))
    }

    fn extract_post_parse(&self, doc: &mut Document) {
        self.0.extract_post_parse(doc);
    }
}

#[test]
fn test_custom_strategy_hooks() {
    let strategy = Shortcodes(LayoutDetails::default());
    let combined =
        format_html("<h1>A</h1><p>[plugin]</p>", &PresentationMap::new(), &strategy).unwrap();
    assert_eq!(
        combined,
        format!("<h1>A</h1><div class=\"div\">{PLUGIN_IMG}</div>")
    );

    let (map, clean) = extract_presentation(&combined, &strategy).unwrap();
    assert_eq!(map, pres(&[("h1_1", &[]), ("p_1", &[class("div")])]));
    assert_eq!(clean, "<h1 id=\"h1_1\">A</h1><p id=\"p_1\">[plugin]</p>");
}
