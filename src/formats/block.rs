//! Non-list kinds: the document root, neutral paragraphs and text runs.

use super::Blot;
use crate::document::error::Result;
use crate::document::node::{FormatValue, Node, NodeId, NodeKind};
use crate::document::registry;
use crate::document::tree::Document;
use indexmap::IndexMap;

/// Document root.
pub struct Scroll;

impl Blot for Scroll {
    const KIND: NodeKind = NodeKind::Root;

    fn static_formats(_node: &Node) -> Option<FormatValue> {
        None
    }

    fn format(_doc: &mut Document, _id: NodeId, _name: &str, _value: Option<&FormatValue>) -> Result<()> {
        Ok(())
    }
}

/// Neutral paragraph, the block created when list formatting is removed.
pub struct Block;

impl Blot for Block {
    const KIND: NodeKind = NodeKind::Block;

    fn static_formats(node: &Node) -> Option<FormatValue> {
        if node.tag() == registry::definition(Self::KIND).default_tag() {
            None
        } else {
            super::resolve_formats(node)
        }
    }
}

/// Run of characters inside a block.
pub struct Text;

impl Blot for Text {
    const KIND: NodeKind = NodeKind::Text;

    fn create(doc: &mut Document, value: Option<&FormatValue>) -> Result<NodeId> {
        let text = match value {
            Some(FormatValue::Str(s)) => s.as_str(),
            _ => "",
        };
        Ok(doc.create_text(text))
    }

    fn static_formats(_node: &Node) -> Option<FormatValue> {
        None
    }

    fn formats(_doc: &Document, _id: NodeId) -> IndexMap<String, FormatValue> {
        IndexMap::new()
    }

    fn format(_doc: &mut Document, _id: NodeId, _name: &str, _value: Option<&FormatValue>) -> Result<()> {
        Ok(())
    }
}
