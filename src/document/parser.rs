//! Markup parsing.
//!
//! Reads the HTML-like external representation of a document (`<p>`, `<ul>`,
//! `<ol>` and `<li>` elements with quoted attributes and text) into a
//! [`Document`]. Tags are case-insensitive and stored upper-case, attribute
//! names are stored lower-case.
//!
//! Whitespace-only text that contains a line break is treated as layout and
//! dropped, which makes pretty-printed output parse back to the same tree.
//!
//! # Example
//!
//! ```
//! use listquill::document::parser::parse_markup;
//!
//! let doc = parse_markup("<ul><li>milk</li><li>eggs</li></ul>").unwrap();
//! let list = doc.node_at_path(&[0]).unwrap();
//! assert_eq!(doc.children(list).len(), 2);
//! ```

use super::error::{DocumentError, Result};
use super::node::{NodeId, NodeKind};
use super::registry;
use super::tree::Document;
use crate::formats;
use crate::formats::embed_list::LEVEL_ATTRIBUTE;
use indexmap::IndexMap;
use tracing::trace;

/// Parses markup into a new document.
pub fn parse_markup(input: &str) -> Result<Document> {
    let mut parser = Parser::new(input);
    let mut doc = Document::new();
    parser.parse_document(&mut doc)?;
    trace!(nodes = doc.node_count(), "parsed markup");
    Ok(doc)
}

/// Character-level markup parser.
struct Parser {
    chars: Vec<char>,
    position: usize,
}

/// A start tag as read from the input.
struct StartTag {
    name: String,
    attributes: IndexMap<String, String>,
    position: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    fn parse_document(&mut self, doc: &mut Document) -> Result<()> {
        let root = doc.root();
        self.skip_whitespace();
        let wrapped = self.starts_with_tag("body");
        if wrapped {
            let tag = self.parse_start_tag()?;
            self.parse_children(doc, root)?;
            self.parse_end_tag(&tag)?;
        } else {
            self.parse_children(doc, root)?;
        }
        self.skip_whitespace();
        if !self.is_eof() {
            return Err(self.error("unexpected content after the document"));
        }
        Ok(())
    }

    /// Parses content until the next end tag or the end of input.
    fn parse_children(&mut self, doc: &mut Document, parent: NodeId) -> Result<()> {
        loop {
            if self.is_eof() || self.starts_with("</") {
                return Ok(());
            }
            if self.starts_with("<!--") {
                self.skip_comment()?;
            } else if self.peek() == Some('<') {
                self.parse_element(doc, parent)?;
            } else {
                self.parse_text(doc, parent)?;
            }
        }
    }

    fn parse_element(&mut self, doc: &mut Document, parent: NodeId) -> Result<()> {
        let tag = self.parse_start_tag()?;
        let has_level = tag.attributes.contains_key(LEVEL_ATTRIBUTE);
        let kind = registry::by_tag(&tag.name, has_level).ok_or_else(|| DocumentError::Parse {
            position: tag.position,
            message: format!("unknown element <{}>", tag.name.to_lowercase()),
        })?;

        let parent_kind = doc.kind(parent)?;
        if kind == NodeKind::ListItem && !parent_kind.is_list_container() {
            return Err(DocumentError::Parse {
                position: tag.position,
                message: "<li> outside of a list".to_string(),
            });
        }
        if let Some(level) = tag.attributes.get(LEVEL_ATTRIBUTE) {
            if !level.parse::<u32>().is_ok_and(|l| l >= 1) {
                return Err(DocumentError::Parse {
                    position: tag.position,
                    message: format!("invalid {LEVEL_ATTRIBUTE} '{level}'"),
                });
            }
        }

        let id = doc.alloc(kind, &tag.name);
        for (name, value) in &tag.attributes {
            doc.set_attribute(id, name, value)?;
        }
        formats::attach(doc, id)?;
        doc.base_insert_before(parent, id, None)
            .map_err(|err| DocumentError::Parse {
                position: tag.position,
                message: err.to_string(),
            })?;

        self.parse_children(doc, id)?;
        self.parse_end_tag(&tag)
    }

    fn parse_text(&mut self, doc: &mut Document, parent: NodeId) -> Result<()> {
        let start = self.position;
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                '<' => break,
                '&' => text.push(self.parse_entity()?),
                _ => {
                    text.push(ch);
                    self.position += 1;
                }
            }
        }

        let parent_kind = doc.kind(parent)?;
        let layout = text.trim().is_empty()
            && (text.contains('\n') || !registry::definition(parent_kind).allows(NodeKind::Text));
        if layout {
            return Ok(());
        }
        if !registry::definition(parent_kind).allows(NodeKind::Text) {
            return Err(DocumentError::Parse {
                position: start,
                message: format!("text is not allowed inside {parent_kind}"),
            });
        }
        let run = doc.create_text(&text);
        doc.base_insert_before(parent, run, None)
    }

    fn parse_start_tag(&mut self) -> Result<StartTag> {
        let position = self.position;
        self.expect('<')?;
        let name = self.parse_name()?.to_uppercase();
        let mut attributes = IndexMap::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('>') => {
                    self.position += 1;
                    break;
                }
                Some(_) => {
                    let attr = self.parse_name()?.to_lowercase();
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.position += 1;
                        self.skip_whitespace();
                        self.parse_quoted()?
                    } else {
                        String::new()
                    };
                    attributes.insert(attr, value);
                }
                None => return Err(self.error("unterminated start tag")),
            }
        }
        Ok(StartTag {
            name,
            attributes,
            position,
        })
    }

    fn parse_end_tag(&mut self, open: &StartTag) -> Result<()> {
        if !self.starts_with("</") {
            return Err(DocumentError::Parse {
                position: open.position,
                message: format!("<{}> is never closed", open.name.to_lowercase()),
            });
        }
        let position = self.position;
        self.position += 2;
        let name = self.parse_name()?.to_uppercase();
        if name != open.name {
            return Err(DocumentError::Parse {
                position,
                message: format!(
                    "expected </{}>, found </{}>",
                    open.name.to_lowercase(),
                    name.to_lowercase()
                ),
            });
        }
        self.skip_whitespace();
        self.expect('>')
    }

    fn parse_name(&mut self) -> Result<String> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' {
                name.push(ch);
                self.position += 1;
            } else {
                break;
            }
        }
        if name.is_empty() {
            Err(self.error("expected a name"))
        } else {
            Ok(name)
        }
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected a quoted attribute value")),
        };
        self.position += 1;
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(ch) if ch == quote => {
                    self.position += 1;
                    return Ok(value);
                }
                Some('&') => value.push(self.parse_entity()?),
                Some(ch) => {
                    value.push(ch);
                    self.position += 1;
                }
                None => return Err(self.error("unterminated attribute value")),
            }
        }
    }

    /// Decodes one character reference starting at `&`.
    fn parse_entity(&mut self) -> Result<char> {
        let start = self.position;
        self.expect('&')?;
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(';') => {
                    self.position += 1;
                    break;
                }
                Some(ch) if ch.is_ascii_alphanumeric() || ch == '#' => {
                    name.push(ch);
                    self.position += 1;
                }
                _ => {
                    return Err(DocumentError::Parse {
                        position: start,
                        message: "unterminated character reference".to_string(),
                    })
                }
            }
        }
        let decoded = match name.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => match name.strip_prefix('#') {
                Some(hex) if hex.starts_with(['x', 'X']) => {
                    u32::from_str_radix(&hex[1..], 16).ok().and_then(char::from_u32)
                }
                Some(dec) => dec.parse::<u32>().ok().and_then(char::from_u32),
                None => None,
            },
        };
        decoded.ok_or_else(|| DocumentError::Parse {
            position: start,
            message: format!("unknown character reference '&{name};'"),
        })
    }

    fn skip_comment(&mut self) -> Result<()> {
        let start = self.position;
        self.position += 4;
        while !self.is_eof() {
            if self.starts_with("-->") {
                self.position += 3;
                return Ok(());
            }
            self.position += 1;
        }
        Err(DocumentError::Parse {
            position: start,
            message: "unterminated comment".to_string(),
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        let mut i = self.position;
        for ch in s.chars() {
            if self.chars.get(i) != Some(&ch) {
                return false;
            }
            i += 1;
        }
        true
    }

    fn starts_with_tag(&self, name: &str) -> bool {
        if self.peek() != Some('<') {
            return false;
        }
        let end = self.position + 1 + name.len();
        let Some(found) = self.chars.get(self.position + 1..end) else {
            return false;
        };
        let found: String = found.iter().collect();
        found.eq_ignore_ascii_case(name)
            && !self
                .chars
                .get(end)
                .is_some_and(|c| c.is_ascii_alphanumeric())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.position += 1;
                Ok(())
            }
            Some(ch) => Err(self.error(&format!("expected '{expected}', found '{ch}'"))),
            None => Err(self.error(&format!("expected '{expected}', found end of input"))),
        }
    }

    fn error(&self, message: &str) -> DocumentError {
        DocumentError::Parse {
            position: self.position,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::{FormatValue, ListKind};

    #[test]
    fn test_parse_checklist() {
        let doc = parse_markup(r#"<ul data-checked="true"><li>a</li></ul>"#).unwrap();
        let list = doc.node_at_path(&[0]).unwrap();
        assert_eq!(doc.kind(list).unwrap(), NodeKind::List);
        assert_eq!(
            doc.static_formats(list).unwrap(),
            Some(FormatValue::List(ListKind::Checked))
        );
        assert_eq!(doc.listeners(list).len(), 1);
    }

    #[test]
    fn test_level_selects_embedded_list() {
        let doc = parse_markup(r#"<ol><li>a</li><ul data-level="1"><li>b</li></ul></ol>"#).unwrap();
        let embed = doc.node_at_path(&[0, 1]).unwrap();
        assert_eq!(doc.kind(embed).unwrap(), NodeKind::EmbedList);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_layout_whitespace_is_dropped() {
        let doc = parse_markup("<ul>\n  <li>a b</li>\n</ul>\n").unwrap();
        let item = doc.node_at_path(&[0, 0]).unwrap();
        assert_eq!(doc.children(item).len(), 1);
        assert_eq!(doc.text_content(item), "a b");
    }

    #[test]
    fn test_entities_are_decoded() {
        let doc = parse_markup("<p>a &amp; b &lt;c&gt; &#65;&#x42;</p>").unwrap();
        assert_eq!(doc.text_content(doc.root()), "a & b <c> AB");
    }

    #[test]
    fn test_body_wrapper_is_accepted() {
        let doc = parse_markup("<BODY><p>x</p></BODY>").unwrap();
        assert_eq!(doc.children(doc.root()).len(), 1);
    }

    #[test]
    fn test_item_outside_list_is_rejected() {
        let err = parse_markup("<li>stray</li>").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_unknown_element_reports_position() {
        let err = parse_markup("<p>a</p><div></div>").unwrap_err();
        assert_eq!(
            err,
            DocumentError::Parse {
                position: 8,
                message: "unknown element <div>".to_string()
            }
        );
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(parse_markup("<ul><li>a</ul></li>").is_err());
        assert!(parse_markup("<p>open").is_err());
    }

    #[test]
    fn test_bad_level_is_rejected() {
        assert!(parse_markup(r#"<ul><ul data-level="0"><li>a</li></ul></ul>"#).is_err());
        assert!(parse_markup(r#"<ul><ul data-level="x"><li>a</li></ul></ul>"#).is_err());
    }

    #[test]
    fn test_text_at_root_is_rejected() {
        assert!(parse_markup("loose").is_err());
    }
}
