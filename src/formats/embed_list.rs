//! Nested list container.
//!
//! An embedded list is created when a line is indented. It records its own
//! kind (ordered or unordered, independent of the enclosing list) and its
//! nesting level in `data-level`, so the depth survives serialization without
//! walking ancestors.

use super::Blot;
use crate::document::error::Result;
use crate::document::node::{EmbedKind, EmbedValue, FormatValue, Node, NodeId, NodeKind};
use crate::document::tree::{Document, OptimizeContext};
use indexmap::IndexMap;
use tracing::debug;

/// Attribute holding the nesting level.
pub const LEVEL_ATTRIBUTE: &str = "data-level";

pub struct EmbedList;

impl EmbedList {
    /// Nesting level recorded on an element; 1 when missing or malformed.
    pub fn level_of(node: &Node) -> u32 {
        node.attribute(LEVEL_ATTRIBUTE)
            .and_then(|l| l.parse().ok())
            .unwrap_or(1)
    }

    /// Decodes `{kind, level}` from an element.
    pub fn value_of(node: &Node) -> Option<EmbedValue> {
        matches!(node.tag(), "OL" | "UL")
            .then(|| EmbedValue::new(EmbedKind::from_tag(node.tag()), Self::level_of(node)))
    }

    pub(crate) fn same_list(a: &Node, b: &Node) -> bool {
        a.tag() == b.tag() && Self::level_of(a) == Self::level_of(b)
    }

    /// Rewrites `data-level` on every embedded list below `id` (inclusive)
    /// after the subtree moved to a different depth.
    pub(crate) fn relevel(doc: &mut Document, id: NodeId) -> Result<()> {
        let mut embeds: Vec<NodeId> = doc
            .descendants(id)
            .into_iter()
            .filter(|&n| doc.kind(n).is_ok_and(|k| k == NodeKind::EmbedList))
            .collect();
        // post-order lists children first; parents must be fixed first
        embeds.reverse();
        for embed in embeds {
            let level = doc.expected_level(embed);
            doc.set_attribute(embed, LEVEL_ATTRIBUTE, &level.to_string())?;
        }
        Ok(())
    }
}

impl Blot for EmbedList {
    const KIND: NodeKind = NodeKind::EmbedList;

    fn create(doc: &mut Document, value: Option<&FormatValue>) -> Result<NodeId> {
        let value = match value {
            Some(FormatValue::Embed(embed)) => *embed,
            _ => EmbedValue::new(EmbedKind::Unordered, 1),
        };
        let tag = match value.kind {
            EmbedKind::Ordered => "OL",
            EmbedKind::Unordered => "UL",
        };
        let id = doc.alloc(Self::KIND, tag);
        doc.set_attribute(id, LEVEL_ATTRIBUTE, &value.level.max(1).to_string())?;
        Ok(id)
    }

    fn static_formats(node: &Node) -> Option<FormatValue> {
        Self::value_of(node).map(FormatValue::Embed)
    }

    fn formats(doc: &Document, id: NodeId) -> IndexMap<String, FormatValue> {
        super::container_formats(doc.find(id), Self::static_formats)
    }

    fn format(doc: &mut Document, id: NodeId, name: &str, value: Option<&FormatValue>) -> Result<()> {
        super::format_last_child(doc, id, name, value)
    }

    /// Only list items go in directly. A nested embedded list is wrapped in a
    /// fresh item; other content splits the list and goes to its parent.
    fn insert_before(
        doc: &mut Document,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        match doc.kind(child)? {
            NodeKind::ListItem => doc.base_insert_before(parent, child, reference),
            NodeKind::EmbedList => {
                let wrapper = super::create(doc, NodeKind::ListItem, None)?;
                doc.base_insert_before(parent, wrapper, reference)?;
                doc.base_insert_before(wrapper, child, None)
            }
            _ => super::split_and_delegate(doc, parent, child, reference),
        }
    }

    /// An embedded list that is the whole content of its item takes the item
    /// with it.
    fn remove(doc: &mut Document, id: NodeId) -> Result<()> {
        if let Some(owner) = doc.parent(id) {
            if doc.kind(owner)? == NodeKind::ListItem && doc.children(owner).len() == 1 {
                return super::remove(doc, owner);
            }
        }
        doc.base_remove(id)
    }

    fn optimize(doc: &mut Document, id: NodeId, ctx: &mut OptimizeContext) -> Result<()> {
        doc.base_optimize(id, ctx)?;
        if !doc.contains(id) {
            return Ok(());
        }
        while let Some(next) = doc.next(id).filter(|&n| super::mergeable(doc, id, n)) {
            debug!(embed = %id, merged = %next, "merging adjacent embedded lists");
            super::move_children(doc, next, id, None)?;
            doc.base_remove(next)?;
            ctx.record();
        }
        Ok(())
    }

    fn replace(doc: &mut Document, id: NodeId, target: NodeId) -> Result<()> {
        super::wrap_foreign(doc, id, target)?;
        doc.base_replace(id, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_persists_level() {
        let mut doc = Document::new();
        let value = FormatValue::Embed(EmbedValue::new(EmbedKind::Ordered, 3));
        let id = doc.create(NodeKind::EmbedList, Some(&value)).unwrap();
        let node = doc.find(id).unwrap();
        assert_eq!(node.tag(), "OL");
        assert_eq!(node.attribute(LEVEL_ATTRIBUTE), Some("3"));
        assert_eq!(doc.static_formats(id).unwrap(), Some(value));
    }

    #[test]
    fn test_no_listeners() {
        let mut doc = Document::new();
        let id = doc.create(NodeKind::EmbedList, None).unwrap();
        assert!(doc.listeners(id).is_empty());
    }

    #[test]
    fn test_missing_level_defaults_to_one() {
        let node = Node::new(NodeKind::EmbedList, "UL");
        assert_eq!(EmbedList::level_of(&node), 1);
    }
}
