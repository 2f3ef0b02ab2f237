//! Markup serialization and file saving.
//!
//! Documents are written as HTML-like markup. Elements whose children are all
//! block-level are pretty printed, one child per line, indented by
//! `indent_size` spaces per level; anything holding text is written inline so
//! no layout whitespace ends up inside a line's content.

use crate::config::Config;
use crate::document::node::{NodeId, NodeKind, Scope};
use crate::document::parser::parse_markup;
use crate::document::registry;
use crate::document::tree::Document;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Serializes a whole document to markup.
///
/// # Example
///
/// ```
/// use listquill::document::parser::parse_markup;
/// use listquill::file::saver::serialize_document;
///
/// let doc = parse_markup("<ul><li>a</li></ul>").unwrap();
/// assert_eq!(serialize_document(&doc, 2), "<ul>\n  <li>a</li>\n</ul>\n");
/// ```
pub fn serialize_document(doc: &Document, indent_size: usize) -> String {
    let mut out = String::new();
    for &child in doc.children(doc.root()) {
        serialize_node(doc, child, indent_size, 0, &mut out);
        out.push('\n');
    }
    out
}

/// Serializes one node and its subtree, starting at the current line position.
pub fn serialize_node(doc: &Document, id: NodeId, indent_size: usize, depth: usize, out: &mut String) {
    let Some(node) = doc.find(id) else {
        return;
    };
    if node.kind() == NodeKind::Text {
        out.push_str(&escape_text(node.text()));
        return;
    }

    let tag = node.tag().to_lowercase();
    out.push('<');
    out.push_str(&tag);
    for (name, value) in node.attributes() {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
    }
    out.push('>');

    let children = node.children();
    if !children.is_empty() && children.iter().all(|&c| is_block_element(doc, c)) {
        out.push('\n');
        let inner = " ".repeat(indent_size * (depth + 1));
        for &child in children {
            out.push_str(&inner);
            serialize_node(doc, child, indent_size, depth + 1, out);
            out.push('\n');
        }
        out.push_str(&" ".repeat(indent_size * depth));
    } else {
        for &child in children {
            serialize_node(doc, child, indent_size, depth, out);
        }
    }

    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

fn is_block_element(doc: &Document, id: NodeId) -> bool {
    doc.kind(id)
        .is_ok_and(|kind| registry::definition(kind).scope == Scope::Block)
}

/// Escapes text content. Line breaks are written as references so they are
/// never mistaken for layout.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attribute(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, &backup_path).context("Failed to create backup")?;
    debug!(backup = %backup_path.display(), "created backup");
    Ok(())
}

/// Saves a document to a file.
///
/// The markup is re-parsed before anything touches the disk, a `.bak` copy of
/// an existing file is made when `config.create_backup` is set, and the write
/// goes through a temp file and a rename. Paths ending in `.gz` are written
/// gzip-compressed.
///
/// # Examples
///
/// ```no_run
/// use listquill::config::Config;
/// use listquill::document::parser::parse_markup;
/// use listquill::file::saver::save_document;
///
/// let doc = parse_markup("<ol><li>one</li></ol>").unwrap();
/// save_document("todo.html", &doc, &Config::default()).unwrap();
/// ```
pub fn save_document<P: AsRef<Path>>(path: P, doc: &Document, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let should_compress = path.to_string_lossy().ends_with(".gz");

    let markup = serialize_document(doc, config.indent_size);
    parse_markup(&markup)
        .context("Generated invalid markup - this is a bug in listquill's serializer")?;

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    write_file_atomic(path, markup.as_bytes(), should_compress)?;
    info!(path = %path.display(), bytes = markup.len(), compressed = should_compress, "saved document");
    Ok(())
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(escape_text("a<b & c>\n"), "a&lt;b &amp; c&gt;&#10;");
        assert_eq!(escape_attribute("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn test_nested_lists_are_indented() {
        let doc = parse_markup(
            r#"<ul><li>a</li><ul data-level="1"><li>b</li></ul></ul>"#,
        )
        .unwrap();
        let expected = "<ul>\n  <li>a</li>\n  <ul data-level=\"1\">\n    <li>b</li>\n  </ul>\n</ul>\n";
        assert_eq!(serialize_document(&doc, 2), expected);
    }

    #[test]
    fn test_indent_size_is_respected() {
        let doc = parse_markup("<ol><li>x</li></ol>").unwrap();
        assert_eq!(serialize_document(&doc, 4), "<ol>\n    <li>x</li>\n</ol>\n");
    }

    #[test]
    fn test_write_file_atomic_uncompressed() {
        use tempfile::NamedTempFile;

        let temp_file = NamedTempFile::new().unwrap();
        let target_path = temp_file.path();
        write_file_atomic(target_path, b"<p>x</p>\n", false).unwrap();

        let written = fs::read_to_string(target_path).unwrap();
        assert_eq!(written, "<p>x</p>\n");
    }

    #[test]
    fn test_write_file_atomic_compressed() {
        use flate2::read::GzDecoder;
        use std::io::Read;
        use tempfile::NamedTempFile;

        let temp_file = NamedTempFile::new().unwrap();
        let target_path = temp_file.path().with_extension("html.gz");
        write_file_atomic(&target_path, b"<p>x</p>\n", true).unwrap();

        let file = fs::File::open(&target_path).unwrap();
        let mut decoder = GzDecoder::new(file);
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();
        assert_eq!(decompressed, "<p>x</p>\n");
    }

    #[test]
    fn test_backup_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.html");
        fs::write(&path, "<p>old</p>\n").unwrap();

        let doc = parse_markup("<p>new</p>").unwrap();
        let config = Config {
            create_backup: true,
            ..Config::default()
        };
        save_document(&path, &doc, &config).unwrap();

        let backup = dir.path().join("list.html.bak");
        assert_eq!(fs::read_to_string(backup).unwrap(), "<p>old</p>\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>new</p>\n");
    }
}
