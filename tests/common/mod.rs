//! Helpers shared by the integration tests.

#![allow(dead_code)]

use listquill::document::outline::Outline;
use listquill::document::parser::parse_markup;
use listquill::document::tree::Document;
use listquill::document::NodeId;
use listquill::file::saver::serialize_document;
use tracing_subscriber::EnvFilter;

/// Routes library tracing output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("listquill=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

pub fn parse(markup: &str) -> Document {
    init_tracing();
    parse_markup(markup).unwrap()
}

/// Node at a child-index path, panicking with the path when missing.
pub fn at(doc: &Document, path: &[usize]) -> NodeId {
    doc.node_at_path(path)
        .unwrap_or_else(|| panic!("no node at {path:?}"))
}

/// Markup with layout whitespace, as the saver writes it.
pub fn markup(doc: &Document) -> String {
    serialize_document(doc, 2)
}

/// Markup on a single line, convenient for assertions.
pub fn compact(doc: &Document) -> String {
    serialize_document(doc, 0).replace('\n', "")
}

pub fn outline_of(markup: &str) -> Outline {
    parse(markup).outline()
}
