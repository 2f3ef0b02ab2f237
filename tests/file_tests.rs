//! Integration tests for loading and saving documents.

mod common;

use common::{init_tracing, parse};
use listquill::config::Config;
use listquill::editor::state::EditorState;
use listquill::file::loader::{load_document, parse_content};
use listquill::file::saver::save_document;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_simple_file() {
    init_tracing();
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>\n").unwrap();

    let doc = load_document(temp_file.path()).unwrap();
    let list = doc.node_at_path(&[0]).unwrap();
    assert_eq!(doc.children(list).len(), 2);
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_document(dir.path().join("absent.html")).is_err());
}

#[test]
fn test_load_rejects_malformed_markup() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "<ul><li>a</ul>").unwrap();
    let err = load_document(temp_file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse markup"));
}

#[test]
fn test_load_normalizes_adjacent_lists() {
    let doc = parse_content("<ol><li>a</li></ol>\n<ol><li>b</li></ol>\n").unwrap();
    assert_eq!(doc.children(doc.root()).len(), 1);
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.html");
    let doc = parse(r#"<ul data-checked="false"><li>a</li><ul data-level="1"><li>b</li></ul></ul>"#);

    save_document(&path, &doc, &Config::default()).unwrap();
    let loaded = load_document(&path).unwrap();
    assert_eq!(loaded.outline(), doc.outline());

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.ends_with("</ul>\n"));
}

#[test]
fn test_gzip_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.html.gz");
    let doc = parse("<ol><li>one</li><li>two</li></ol>");

    save_document(&path, &doc, &Config::default()).unwrap();
    let raw = fs::read(&path).unwrap();
    assert!(raw.starts_with(&[0x1f, 0x8b]));

    let loaded = load_document(&path).unwrap();
    assert_eq!(loaded.outline(), doc.outline());
}

#[test]
fn test_no_backup_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.html");
    fs::write(&path, "<p>old</p>\n").unwrap();

    save_document(&path, &parse("<p>new</p>"), &Config::default()).unwrap();
    assert!(!dir.path().join("list.html.bak").exists());
}

#[test]
fn test_editor_save_clears_dirty_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.html");
    fs::write(&path, "<ul><li>a</li><li>b</li></ul>\n").unwrap();

    let mut state = EditorState::new(load_document(&path).unwrap(), Config::default());
    state.set_filename(&path);
    state.apply_str("indent 0.1").unwrap();
    assert!(state.is_dirty());

    state.save(None).unwrap();
    assert!(!state.is_dirty());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<ul>\n  <li>a</li>\n  <ul data-level=\"1\">\n    <li>b</li>\n  </ul>\n</ul>\n"
    );
}
