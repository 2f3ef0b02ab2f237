//! Top-level list container (`<ol>` / `<ul>`).
//!
//! A list's kind is encoded in its element: `OL` for ordered lists, `UL` for
//! the rest, with checkbox lists told apart by `data-checked`. Lists are the
//! only nodes with interaction logic: activating a direct child of a
//! checkbox list flips it between checked and unchecked.

use super::Blot;
use crate::document::error::Result;
use crate::document::node::{FormatValue, ListKind, Node, NodeId, NodeKind};
use crate::document::tree::{Document, OptimizeContext};
use crate::input::{Listener, PointerEvent, PointerKind};
use indexmap::IndexMap;
use tracing::debug;

/// Attribute distinguishing checked from unchecked checkbox lists.
pub const CHECKED_ATTRIBUTE: &str = "data-checked";

pub struct List;

impl List {
    /// Decodes a list kind from an element.
    pub fn kind_of(node: &Node) -> Option<ListKind> {
        match node.tag() {
            "OL" => Some(ListKind::Ordered),
            "UL" => match node.attribute(CHECKED_ATTRIBUTE) {
                Some("true") => Some(ListKind::Checked),
                Some(_) => Some(ListKind::Unchecked),
                None => Some(ListKind::Bullet),
            },
            _ => None,
        }
    }

    /// Same tag and same checkbox state.
    pub(crate) fn same_list(a: &Node, b: &Node) -> bool {
        a.tag() == b.tag() && a.attribute(CHECKED_ATTRIBUTE) == b.attribute(CHECKED_ATTRIBUTE)
    }

    /// Pointer handler registered on every list.
    ///
    /// Only activations on a direct child count; events bubbling up from
    /// nested lists are ignored.
    fn on_activate(doc: &mut Document, list: NodeId, event: &PointerEvent) -> Result<()> {
        if doc.parent(event.target) != Some(list) {
            return Ok(());
        }
        let Some(next) = doc
            .find(list)
            .and_then(List::kind_of)
            .and_then(ListKind::toggled)
        else {
            return Ok(());
        };
        debug!(list = %list, item = %event.target, to = %next, "toggling checklist item");
        super::format(
            doc,
            event.target,
            NodeKind::List.name(),
            Some(&FormatValue::List(next)),
        )
    }
}

impl Blot for List {
    const KIND: NodeKind = NodeKind::List;

    fn create(doc: &mut Document, value: Option<&FormatValue>) -> Result<NodeId> {
        let kind = value
            .and_then(FormatValue::as_list_kind)
            .unwrap_or(ListKind::Bullet);
        let tag = if kind == ListKind::Ordered { "OL" } else { "UL" };
        let id = doc.alloc(Self::KIND, tag);
        match kind {
            ListKind::Checked => doc.set_attribute(id, CHECKED_ATTRIBUTE, "true")?,
            ListKind::Unchecked => doc.set_attribute(id, CHECKED_ATTRIBUTE, "false")?,
            ListKind::Ordered | ListKind::Bullet => {}
        }
        Ok(id)
    }

    fn attach(doc: &mut Document, id: NodeId) {
        doc.add_listener(
            id,
            Listener::new(
                &[PointerKind::MouseDown, PointerKind::TouchStart],
                List::on_activate,
            ),
        );
    }

    fn static_formats(node: &Node) -> Option<FormatValue> {
        List::kind_of(node).map(FormatValue::List)
    }

    fn formats(doc: &Document, id: NodeId) -> IndexMap<String, FormatValue> {
        super::container_formats(doc.find(id), Self::static_formats)
    }

    fn format(doc: &mut Document, id: NodeId, name: &str, value: Option<&FormatValue>) -> Result<()> {
        super::format_last_child(doc, id, name, value)
    }

    fn insert_before(
        doc: &mut Document,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        match doc.kind(child)? {
            NodeKind::ListItem | NodeKind::EmbedList => {
                doc.base_insert_before(parent, child, reference)
            }
            _ => super::split_and_delegate(doc, parent, child, reference),
        }
    }

    fn optimize(doc: &mut Document, id: NodeId, ctx: &mut OptimizeContext) -> Result<()> {
        doc.base_optimize(id, ctx)?;
        if !doc.contains(id) {
            return Ok(());
        }
        while let Some(next) = doc.next(id).filter(|&n| super::mergeable(doc, id, n)) {
            debug!(list = %id, merged = %next, "merging adjacent lists");
            super::move_children(doc, next, id, None)?;
            super::remove(doc, next)?;
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
    fn test_create_encodes_kind() {
        let mut doc = Document::new();
        for (kind, tag, checked) in [
            (ListKind::Ordered, "OL", None),
            (ListKind::Bullet, "UL", None),
            (ListKind::Checked, "UL", Some("true")),
            (ListKind::Unchecked, "UL", Some("false")),
        ] {
            let id = doc
                .create(NodeKind::List, Some(&FormatValue::List(kind)))
                .unwrap();
            let node = doc.find(id).unwrap();
            assert_eq!(node.tag(), tag);
            assert_eq!(node.attribute(CHECKED_ATTRIBUTE), checked);
            assert_eq!(doc.static_formats(id).unwrap(), Some(FormatValue::List(kind)));
        }
    }

    #[test]
    fn test_lists_register_pointer_listeners() {
        let mut doc = Document::new();
        let list = doc.create(NodeKind::List, None).unwrap();
        let listeners = doc.listeners(list);
        assert_eq!(listeners.len(), 1);
        assert!(listeners[0].handles(PointerKind::MouseDown));
        assert!(listeners[0].handles(PointerKind::TouchStart));
        assert!(!listeners[0].handles(PointerKind::MouseUp));
    }

    #[test]
    fn test_instance_formats() {
        let mut doc = Document::new();
        let list = doc
            .create(NodeKind::List, Some(&FormatValue::List(ListKind::Checked)))
            .unwrap();
        let formats = doc.formats(list).unwrap();
        assert_eq!(formats.get("list"), Some(&FormatValue::List(ListKind::Checked)));
    }
}
