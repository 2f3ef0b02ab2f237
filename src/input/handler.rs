//! Event dispatch.

use super::{PointerEvent, PointerKind};
use crate::document::error::{DocumentError, Result};
use crate::document::node::{NodeId, NodeKind};
use crate::document::tree::Document;
use tracing::{debug, trace};

/// Delivers `kind` aimed at `target` and returns how many listeners ran.
///
/// Text runs are not event targets; an event on one goes to its element.
/// The event bubbles from the target to the root. Bubbling stops early if a
/// listener removed the node the event is travelling through. The whole
/// dispatch is atomic.
pub fn dispatch(doc: &mut Document, kind: PointerKind, target: NodeId) -> Result<usize> {
    let target = match doc.kind(target)? {
        NodeKind::Text => doc.parent(target).ok_or(DocumentError::Detached(target))?,
        _ => target,
    };
    let event = PointerEvent::new(kind, target);
    debug!(%kind, target = %target, "dispatching pointer event");

    doc.atomically(|doc| {
        let mut path = vec![target];
        let mut current = doc.parent(target);
        while let Some(node) = current {
            path.push(node);
            current = doc.parent(node);
        }

        let mut handled = 0;
        for node in path {
            if !doc.contains(node) {
                trace!(node = %node, "node removed during dispatch, stopping");
                break;
            }
            let listeners: Vec<_> = doc
                .listeners(node)
                .iter()
                .filter(|l| l.handles(kind))
                .copied()
                .collect();
            for listener in listeners {
                listener.call(doc, node, &event)?;
                handled += 1;
            }
        }
        Ok(handled)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::{FormatValue, ListKind};
    use crate::formats::list::CHECKED_ATTRIBUTE;

    fn checklist(doc: &mut Document, kind: ListKind, lines: &[&str]) -> (NodeId, Vec<NodeId>) {
        let list = doc
            .create(NodeKind::List, Some(&FormatValue::List(kind)))
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
    fn test_mousedown_toggles_single_item() {
        let mut doc = Document::new();
        let (_, items) = checklist(&mut doc, ListKind::Checked, &["task"]);
        let handled = dispatch(&mut doc, PointerKind::MouseDown, items[0]).unwrap();
        assert_eq!(handled, 1);

        let list = doc.parent(items[0]).unwrap();
        assert_eq!(
            doc.find(list).unwrap().attribute(CHECKED_ATTRIBUTE),
            Some("false")
        );
    }

    #[test]
    fn test_text_target_resolves_to_item() {
        let mut doc = Document::new();
        let (_, items) = checklist(&mut doc, ListKind::Unchecked, &["task"]);
        let text = doc.first_child(items[0]).unwrap();
        dispatch(&mut doc, PointerKind::TouchStart, text).unwrap();

        let list = doc.parent(items[0]).unwrap();
        assert_eq!(
            doc.static_formats(list).unwrap(),
            Some(FormatValue::List(ListKind::Checked))
        );
    }

    #[test]
    fn test_mouseup_is_ignored() {
        let mut doc = Document::new();
        let (list, items) = checklist(&mut doc, ListKind::Checked, &["task"]);
        let before = doc.outline();
        let handled = dispatch(&mut doc, PointerKind::MouseUp, items[0]).unwrap();
        assert_eq!(handled, 0);
        assert_eq!(doc.outline(), before);
        assert!(doc.contains(list));
    }

    #[test]
    fn test_click_on_list_itself_does_nothing() {
        let mut doc = Document::new();
        let (list, _) = checklist(&mut doc, ListKind::Checked, &["a", "b"]);
        let before = doc.outline();
        dispatch(&mut doc, PointerKind::MouseDown, list).unwrap();
        assert_eq!(doc.outline(), before);
    }

    #[test]
    fn test_bullet_list_is_not_toggled() {
        let mut doc = Document::new();
        let (_, items) = checklist(&mut doc, ListKind::Bullet, &["a"]);
        let before = doc.outline();
        dispatch(&mut doc, PointerKind::MouseDown, items[0]).unwrap();
        assert_eq!(doc.outline(), before);
    }
}
