//! Round-trip tests: serializing a document and parsing it back yields the
//! same structure.

mod common;

use common::{at, markup, parse};
use listquill::document::node::{FormatValue, IndentDelta, ListKind};
use listquill::document::parser::parse_markup;
use listquill::document::tree::Document;
use listquill::file::saver::serialize_document;
use listquill::formats::{ListItem, INDENT};

fn assert_round_trip(doc: &Document) {
    for indent_size in [0, 2, 4] {
        let text = serialize_document(doc, indent_size);
        let reparsed = parse_markup(&text)
            .unwrap_or_else(|err| panic!("{err} while parsing:\n{text}"));
        assert_eq!(reparsed.outline(), doc.outline(), "markup:\n{text}");
    }
}

#[test]
fn test_round_trip_of_every_list_kind() {
    let doc = parse(concat!(
        "<p>intro</p>",
        "<ol><li>one</li><li>two</li></ol>",
        "<ul><li>dot</li></ul>",
        r#"<ul data-checked="true"><li>done</li></ul>"#,
        r#"<ul data-checked="false"><li>todo</li></ul>"#,
    ));
    assert_round_trip(&doc);
}

#[test]
fn test_round_trip_of_nested_levels() {
    let mut doc = parse("<ol><li>a</li><li>b</li><li>c</li></ol>");
    for path in [&[0, 1][..], &[0, 1, 0], &[0, 2]] {
        let item = at(&doc, path);
        doc.format(item, INDENT, Some(&ListItem::indent_value(IndentDelta::Increase)))
            .unwrap();
        doc.optimize().unwrap();
    }
    doc.validate().unwrap();
    assert_round_trip(&doc);
}

#[test]
fn test_round_trip_after_toggle_and_unlist() {
    let mut doc = parse(r#"<ul data-checked="false"><li>a</li><li>b</li></ul>"#);
    let a = at(&doc, &[0, 0]);
    doc.format(a, "list", Some(&FormatValue::List(ListKind::Checked)))
        .unwrap();
    let b = at(&doc, &[1, 0]);
    doc.format(b, "list", Some(&FormatValue::Bool(false))).unwrap();
    doc.optimize().unwrap();
    assert_round_trip(&doc);
}

#[test]
fn test_round_trip_preserves_awkward_text() {
    let mut doc = Document::new();
    let block = doc
        .create(listquill::document::NodeKind::Block, None)
        .unwrap();
    let text = doc.create_text("  <tag> & \"quotes\"\nsecond line ");
    doc.append_child(block, text).unwrap();
    let root = doc.root();
    doc.append_child(root, block).unwrap();

    assert_round_trip(&doc);
}

#[test]
fn test_saved_markup_is_stable() {
    let doc = parse("<ul>\n  <li>a</li>\n  <ul data-level=\"1\">\n    <li>b</li>\n  </ul>\n</ul>\n");
    let once = markup(&doc);
    let twice = markup(&parse(&once));
    assert_eq!(once, twice);
}
