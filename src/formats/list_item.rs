//! One line of a list.
//!
//! `ListItem` owns the commands that restructure lists: removing list
//! formatting, toggling the list kind, and moving a line one nesting level in
//! (`indent +1`) or out (`indent -1`).

use super::{Blot, EmbedList, INDENT};
use crate::document::error::{DocumentError, Result};
use crate::document::node::{
    is_truthy, EmbedKind, EmbedValue, FormatValue, IndentDelta, Node, NodeId, NodeKind, Scope,
};
use crate::document::registry;
use crate::document::tree::Document;
use tracing::debug;

pub struct ListItem;

impl Blot for ListItem {
    const KIND: NodeKind = NodeKind::ListItem;

    fn static_formats(node: &Node) -> Option<FormatValue> {
        if node.tag() == registry::definition(Self::KIND).default_tag() {
            None
        } else {
            super::resolve_formats(node)
        }
    }

    fn format(doc: &mut Document, id: NodeId, name: &str, value: Option<&FormatValue>) -> Result<()> {
        if name == NodeKind::List.name() && !is_truthy(value) {
            let block = super::create(doc, registry::default_for_scope(Scope::Block), None)?;
            debug!(item = %id, "removing list formatting");
            Self::replace_with(doc, id, block)?;
            return Ok(());
        }
        if name == INDENT {
            return match value.and_then(FormatValue::as_indent) {
                Some(IndentDelta::Increase) => indent(doc, id),
                Some(IndentDelta::Decrease) => outdent(doc, id),
                None => Err(DocumentError::InvalidFormatValue {
                    name: name.to_string(),
                    value: value.map(FormatValue::to_attribute).unwrap_or_default(),
                }),
            };
        }
        doc.base_format(id, name, value)
    }

    /// Removing the only line of a list removes the list.
    fn remove(doc: &mut Document, id: NodeId) -> Result<()> {
        if doc.prev(id).is_none() && doc.next(id).is_none() {
            if let Some(parent) = list_container(doc, id) {
                debug!(item = %id, container = %parent, "removing sole item with its container");
                return super::remove(doc, parent);
            }
        }
        doc.base_remove(id)
    }

    fn replace_with(doc: &mut Document, id: NodeId, replacement: NodeId) -> Result<NodeId> {
        if doc.kind(replacement)? == NodeKind::EmbedList {
            return doc.base_replace_with(id, replacement);
        }
        let Some(parent) = list_container(doc, id) else {
            return doc.base_replace_with(id, replacement);
        };

        let offset = doc.offset(id, parent);
        let length = doc.length(id);
        doc.base_isolate(parent, offset, length)?;
        let container = doc.parent(id).ok_or(DocumentError::Detached(id))?;

        if doc.kind(replacement)? == doc.kind(container)? {
            super::replace_with(doc, container, replacement)?;
            return Ok(id);
        }
        doc.base_unwrap(container)?;
        doc.base_replace_with(id, replacement)
    }
}

/// The list container directly holding `id`, if any.
fn list_container(doc: &Document, id: NodeId) -> Option<NodeId> {
    doc.parent(id)
        .filter(|&p| doc.kind(p).is_ok_and(NodeKind::is_list_container))
}

/// Moves the item one level deeper: a new embedded list takes the item's
/// place and the item becomes its only line. The item keeps its id, so
/// callers can indent or outdent the same handle again.
fn indent(doc: &mut Document, id: NodeId) -> Result<()> {
    let parent = doc.parent(id).ok_or(DocumentError::Detached(id))?;
    let parent_node = doc.node(parent)?;
    let level = match parent_node.kind() {
        NodeKind::EmbedList => EmbedList::level_of(parent_node) + 1,
        _ => 1,
    };
    let kind = EmbedKind::from_tag(parent_node.tag());

    let value = FormatValue::Embed(EmbedValue::new(kind, level));
    let embed = super::create(doc, NodeKind::EmbedList, Some(&value))?;
    super::insert_before(doc, parent, embed, Some(id))?;
    super::insert_before(doc, embed, id, None)?;
    EmbedList::relevel(doc, embed)?;

    debug!(item = %id, embed = %embed, level, "indented list item");
    Ok(())
}

/// Moves the item one level out: dissolves the embedding around it and
/// places it among the lines of the enclosing list.
fn outdent(doc: &mut Document, id: NodeId) -> Result<()> {
    let Some(embed) = doc
        .parent(id)
        .filter(|&p| doc.kind(p).is_ok_and(|k| k == NodeKind::EmbedList))
    else {
        debug!(item = %id, "outdent ignored, item is at the outermost level");
        return Ok(());
    };

    let isolated = doc.isolate_child(embed, id)?;
    let owner = doc.parent(isolated).ok_or(DocumentError::Detached(isolated))?;

    let anchor = if doc.kind(owner)? == NodeKind::ListItem {
        doc.isolate_child(owner, isolated)?
    } else {
        isolated
    };
    let target = doc.parent(anchor).ok_or(DocumentError::Detached(anchor))?;

    super::insert_before(doc, target, id, Some(anchor))?;
    doc.base_remove(anchor)?;
    EmbedList::relevel(doc, id)?;

    debug!(item = %id, "outdented list item");
    Ok(())
}

impl ListItem {
    /// Shorthand for `format("indent", ±1)`.
    pub fn indent_value(delta: IndentDelta) -> FormatValue {
        FormatValue::Indent(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::ListKind;

    fn bullet_list(doc: &mut Document, lines: &[&str]) -> (NodeId, Vec<NodeId>) {
        let list = doc
            .create(NodeKind::List, Some(&FormatValue::List(ListKind::Bullet)))
            .unwrap();
        let mut items = Vec::new();
        for line in lines {
            let item = doc.create(NodeKind::ListItem, None).unwrap();
            let text = doc.create_text(line);
            doc.append_child(item, text).unwrap();
            doc.append_child(list, item).unwrap();
            items.push(item);
        }
        let root = doc.root();
        doc.append_child(root, list).unwrap();
        (list, items)
    }

    #[test]
    fn test_li_tag_has_no_format() {
        let mut doc = Document::new();
        let item = doc.create(NodeKind::ListItem, None).unwrap();
        assert_eq!(doc.static_formats(item).unwrap(), None);
    }

    #[test]
    fn test_remove_sole_item_removes_list() {
        let mut doc = Document::new();
        let (list, items) = bullet_list(&mut doc, &["only"]);
        doc.remove(items[0]).unwrap();
        assert!(!doc.contains(list));
        assert!(doc.children(doc.root()).is_empty());
    }

    #[test]
    fn test_remove_one_of_many_keeps_list() {
        let mut doc = Document::new();
        let (list, items) = bullet_list(&mut doc, &["a", "b"]);
        doc.remove(items[0]).unwrap();
        assert!(doc.contains(list));
        assert_eq!(doc.children(list), &[items[1]]);
    }

    #[test]
    fn test_invalid_indent_value_is_rejected() {
        let mut doc = Document::new();
        let (_, items) = bullet_list(&mut doc, &["a"]);
        let before = doc.outline();
        let err = doc
            .format(items[0], INDENT, Some(&FormatValue::Str("+3".to_string())))
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidFormatValue { .. }));
        assert_eq!(doc.outline(), before);
    }

    #[test]
    fn test_outdent_at_top_level_is_noop() {
        let mut doc = Document::new();
        let (_, items) = bullet_list(&mut doc, &["a", "b"]);
        let before = doc.outline();
        doc.format(
            items[1],
            INDENT,
            Some(&ListItem::indent_value(IndentDelta::Decrease)),
        )
        .unwrap();
        assert_eq!(doc.outline(), before);
    }
}
