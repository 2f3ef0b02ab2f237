//! Document loading.
//!
//! Reads markup from files or stdin, transparently decompressing gzip input,
//! and returns a document that has been through the optimize pass and passed
//! validation.

use crate::document::parser::parse_markup;
use crate::document::tree::Document;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads and parses a markup file from the filesystem.
///
/// Files ending in `.gz` are decompressed first.
///
/// # Examples
///
/// ```no_run
/// use listquill::file::loader::load_document;
///
/// let doc = load_document("todo.html").unwrap();
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read or decompressed, is not valid
/// markup, or describes a tree that breaks a structural invariant.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref).context("Failed to read file")?
    };

    debug!(path = %path_ref.display(), bytes = content.len(), "loaded file");
    parse_content(&content)
}

/// Loads a document from stdin. Gzip input is detected by its magic bytes.
pub fn load_from_stdin() -> Result<Document> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")?
    };
    parse_content(&content)
}

/// Parses markup, normalizes it and checks the structural invariants.
pub fn parse_content(content: &str) -> Result<Document> {
    let mut doc = parse_markup(content).context("Failed to parse markup")?;
    doc.optimize().context("Failed to normalize document")?;
    doc.validate().context("Document structure is invalid")?;
    Ok(doc)
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped stdin")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_merges_adjacent_lists() {
        let doc = parse_content("<ul><li>a</li></ul><ul><li>b</li></ul>").unwrap();
        let root = doc.root();
        assert_eq!(doc.children(root).len(), 1);
        let list = doc.children(root)[0];
        assert_eq!(doc.children(list).len(), 2);
    }

    #[test]
    fn test_parse_content_rejects_wrong_level() {
        let err = parse_content(r#"<ul><ul data-level="3"><li>a</li></ul></ul>"#).unwrap_err();
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn test_read_gzipped_file_corrupted() {
        use tempfile::NamedTempFile;

        let temp_file = NamedTempFile::new().unwrap();
        let gz_path = temp_file.path().with_extension("html.gz");
        fs::write(&gz_path, b"not gzip data").unwrap();

        let result = read_gzipped_file(&gz_path);
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("decompress") || err_msg.contains("corrupted"));
    }

    #[test]
    fn test_decompress_gzip_bytes() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<p>x</p>").unwrap();
        let bytes = encoder.finish().unwrap();
        assert_eq!(decompress_gzip_bytes(&bytes).unwrap(), "<p>x</p>");
    }
}
