//! Format behaviors for each node kind.
//!
//! Every kind implements [`Blot`], whose default methods fall back to the
//! generic primitives on [`Document`]. The functions in this module resolve a
//! node's kind through the registry and dispatch to the matching
//! implementation, so an override (for instance `ListItem::remove`) applies
//! wherever the framework removes a list item.
//!
//! # Modules
//!
//! - `block`: root, paragraph and text run
//! - `list_item`: one line of a list, indent and outdent
//! - `list`: top-level list container and checkbox toggling
//! - `embed_list`: nested list container with a persisted level

pub mod block;
pub mod embed_list;
pub mod list;
pub mod list_item;

pub use block::{Block, Scroll, Text};
pub use embed_list::EmbedList;
pub use list::List;
pub use list_item::ListItem;

use crate::document::error::{DocumentError, Result};
use crate::document::node::{FormatValue, Node, NodeId, NodeKind};
use crate::document::registry;
use crate::document::tree::{Document, OptimizeContext};
use indexmap::IndexMap;

/// Name of the indent format.
pub const INDENT: &str = "indent";

/// Capabilities shared by all node kinds.
pub trait Blot {
    const KIND: NodeKind;

    /// Builds a detached node for `value`.
    fn create(doc: &mut Document, _value: Option<&FormatValue>) -> Result<NodeId> {
        Ok(doc.alloc(Self::KIND, registry::definition(Self::KIND).default_tag()))
    }

    /// Runs once for every constructed node, clones included.
    fn attach(_doc: &mut Document, _id: NodeId) {}

    /// Reads this kind's format back from an element.
    fn static_formats(node: &Node) -> Option<FormatValue> {
        resolve_formats(node)
    }

    fn formats(doc: &Document, id: NodeId) -> IndexMap<String, FormatValue> {
        doc.base_formats(id, Self::static_formats)
    }

    fn format(doc: &mut Document, id: NodeId, name: &str, value: Option<&FormatValue>) -> Result<()> {
        doc.base_format(id, name, value)
    }

    fn insert_before(
        doc: &mut Document,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        doc.base_insert_before(parent, child, reference)
    }

    fn remove(doc: &mut Document, id: NodeId) -> Result<()> {
        doc.base_remove(id)
    }

    /// Makes `id` take the place of `target`.
    fn replace(doc: &mut Document, id: NodeId, target: NodeId) -> Result<()> {
        doc.base_replace(id, target)
    }

    /// Puts `replacement` in place of `id`; returns the node that now holds
    /// the content.
    fn replace_with(doc: &mut Document, id: NodeId, replacement: NodeId) -> Result<NodeId> {
        doc.base_replace_with(id, replacement)
    }

    fn optimize(doc: &mut Document, id: NodeId, ctx: &mut OptimizeContext) -> Result<()> {
        doc.base_optimize(id, ctx)
    }
}

macro_rules! dispatch {
    ($kind:expr, $method:ident($($arg:expr),*)) => {
        match $kind {
            NodeKind::Root => <Scroll as Blot>::$method($($arg),*),
            NodeKind::Block => <Block as Blot>::$method($($arg),*),
            NodeKind::Text => <Text as Blot>::$method($($arg),*),
            NodeKind::ListItem => <ListItem as Blot>::$method($($arg),*),
            NodeKind::List => <List as Blot>::$method($($arg),*),
            NodeKind::EmbedList => <EmbedList as Blot>::$method($($arg),*),
        }
    };
}

pub(crate) fn create(doc: &mut Document, kind: NodeKind, value: Option<&FormatValue>) -> Result<NodeId> {
    let id = dispatch!(kind, create(doc, value))?;
    dispatch!(kind, attach(doc, id));
    Ok(id)
}

pub(crate) fn attach(doc: &mut Document, id: NodeId) -> Result<()> {
    let kind = doc.kind(id)?;
    dispatch!(kind, attach(doc, id));
    Ok(())
}

pub(crate) fn static_formats(doc: &Document, id: NodeId) -> Result<Option<FormatValue>> {
    let node = doc.node(id)?;
    Ok(dispatch!(node.kind(), static_formats(node)))
}

pub(crate) fn formats(doc: &Document, id: NodeId) -> Result<IndexMap<String, FormatValue>> {
    let kind = doc.kind(id)?;
    Ok(dispatch!(kind, formats(doc, id)))
}

pub(crate) fn format(doc: &mut Document, id: NodeId, name: &str, value: Option<&FormatValue>) -> Result<()> {
    let kind = doc.kind(id)?;
    dispatch!(kind, format(doc, id, name, value))
}

pub(crate) fn insert_before(
    doc: &mut Document,
    parent: NodeId,
    child: NodeId,
    reference: Option<NodeId>,
) -> Result<()> {
    let kind = doc.kind(parent)?;
    dispatch!(kind, insert_before(doc, parent, child, reference))
}

pub(crate) fn remove(doc: &mut Document, id: NodeId) -> Result<()> {
    let kind = doc.kind(id)?;
    dispatch!(kind, remove(doc, id))
}

pub(crate) fn replace(doc: &mut Document, id: NodeId, target: NodeId) -> Result<()> {
    let kind = doc.kind(id)?;
    dispatch!(kind, replace(doc, id, target))
}

pub(crate) fn replace_with(doc: &mut Document, id: NodeId, replacement: NodeId) -> Result<NodeId> {
    let kind = doc.kind(id)?;
    dispatch!(kind, replace_with(doc, id, replacement))
}

pub(crate) fn optimize(doc: &mut Document, id: NodeId, ctx: &mut OptimizeContext) -> Result<()> {
    let kind = doc.kind(id)?;
    dispatch!(kind, optimize(doc, id, ctx))
}

/// Moves every child of `from` into `to`, before `reference`.
pub(crate) fn move_children(
    doc: &mut Document,
    from: NodeId,
    to: NodeId,
    reference: Option<NodeId>,
) -> Result<()> {
    for child in doc.children(from).to_vec() {
        insert_before(doc, to, child, reference)?;
    }
    Ok(())
}

/// Returns true if `next` must be folded into `id` by the optimize pass.
pub(crate) fn mergeable(doc: &Document, id: NodeId, next: NodeId) -> bool {
    match (doc.find(id), doc.find(next)) {
        (Some(a), Some(b)) if a.kind() == b.kind() => match a.kind() {
            NodeKind::List => List::same_list(a, b),
            NodeKind::EmbedList => EmbedList::same_list(a, b),
            _ => false,
        },
        _ => false,
    }
}

/// Generic format lookup: single-tag kinds report `true`, multi-tag kinds
/// report the lowercase tag.
pub(crate) fn resolve_formats(node: &Node) -> Option<FormatValue> {
    let tags = registry::definition(node.kind()).tags;
    match tags {
        [_] => Some(FormatValue::Bool(true)),
        _ if tags.contains(&node.tag()) => Some(FormatValue::Str(node.tag().to_lowercase())),
        _ => None,
    }
}

/// Formatting a container means formatting its last line.
pub(crate) fn format_last_child(
    doc: &mut Document,
    id: NodeId,
    name: &str,
    value: Option<&FormatValue>,
) -> Result<()> {
    match doc.last_child(id) {
        Some(last) => format(doc, last, name, value),
        None => Ok(()),
    }
}

/// Container formats: `{kind name: static format}`.
pub(crate) fn container_formats(
    node: Option<&Node>,
    static_formats: impl Fn(&Node) -> Option<FormatValue>,
) -> IndexMap<String, FormatValue> {
    let mut out = IndexMap::new();
    if let Some(node) = node {
        if let Some(value) = static_formats(node) {
            out.insert(node.kind().name().to_string(), value);
        }
    }
    out
}

/// Inserts content a list container may not hold by splitting the container
/// at the reference position and inserting into the container's parent.
pub(crate) fn split_and_delegate(
    doc: &mut Document,
    container: NodeId,
    child: NodeId,
    reference: Option<NodeId>,
) -> Result<()> {
    let index = match reference {
        Some(reference) if doc.parent(reference) != Some(container) => {
            return Err(DocumentError::NotAChild {
                parent: container,
                reference,
            });
        }
        Some(reference) => doc.offset(reference, container),
        None => doc.length(container),
    };
    let outer = doc.parent(container).ok_or(DocumentError::Detached(container))?;
    match doc.base_split(container, index)? {
        Some(after) => {
            let parent = doc.parent(after).ok_or(DocumentError::Detached(after))?;
            insert_before(doc, parent, child, Some(after))
        }
        None => insert_before(doc, outer, child, None),
    }
}

/// Wraps the content of `target` into a default child of `container` before
/// a generic replace. Only another list container hands its items over as
/// they are; lines and paragraphs are wrapped.
pub(crate) fn wrap_foreign(doc: &mut Document, container: NodeId, target: NodeId) -> Result<()> {
    if doc.kind(target)?.is_list_container() {
        return Ok(());
    }
    let default_child = registry::definition(doc.kind(container)?)
        .default_child
        .unwrap_or(NodeKind::ListItem);
    let item = create(doc, default_child, None)?;
    move_children(doc, target, item, None)?;
    insert_before(doc, container, item, None)
}
