//! Arena-backed document tree.
//!
//! `Document` stores every node in a flat arena and links them through parent
//! handles and ordered child lists. It provides the generic primitives the
//! list formats build on (insertion, removal, splitting, isolation,
//! unwrapping, replacement and the optimize pass) and a public API whose
//! mutating operations are atomic: if any step fails, the document is restored
//! to its state before the call.
//!
//! # Example
//!
//! ```
//! use listquill::document::node::{FormatValue, ListKind, NodeKind};
//! use listquill::document::tree::Document;
//!
//! let mut doc = Document::new();
//! let list = doc.create(NodeKind::List, Some(&FormatValue::List(ListKind::Bullet))).unwrap();
//! let item = doc.create(NodeKind::ListItem, None).unwrap();
//! let text = doc.create_text("milk");
//! doc.append_child(item, text).unwrap();
//! doc.append_child(list, item).unwrap();
//! doc.append_child(doc.root(), list).unwrap();
//!
//! assert_eq!(doc.text_content(list), "milk");
//! assert!(doc.validate().is_ok());
//! ```

use super::error::{DocumentError, Result};
use super::node::{is_truthy, FormatValue, Node, NodeId, NodeKind, Scope};
use super::outline::Outline;
use super::registry;
use crate::formats;
use crate::input::Listener;
use indexmap::IndexMap;
use tracing::{trace, warn};

/// Upper bound on optimize passes when no limit is configured.
pub const DEFAULT_MAX_OPTIMIZE_PASSES: usize = 16;

/// Attribute prefix used for generic attribute formats.
const ATTRIBUTE_PREFIX: &str = "data-";

/// Attributes owned by list containers; never reported as attribute formats.
const RESERVED_ATTRIBUTES: [&str; 2] = ["data-checked", "data-level"];

/// Bookkeeping threaded through one optimize pass.
#[derive(Debug, Default)]
pub struct OptimizeContext {
    mutations: usize,
}

impl OptimizeContext {
    /// Records one structural change made by an optimize hook.
    pub fn record(&mut self) {
        self.mutations += 1;
    }

    pub fn mutations(&self) -> usize {
        self.mutations
    }
}

/// A structured rich-text document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    listeners: IndexMap<NodeId, Vec<Listener>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only the root node.
    pub fn new() -> Self {
        let root = Node::new(NodeKind::Root, registry::definition(NodeKind::Root).default_tag());
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
            listeners: IndexMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks up a live node by handle.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.find(id).ok_or(DocumentError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(DocumentError::NodeNotFound(id))
    }

    pub fn kind(&self, id: NodeId) -> Result<NodeKind> {
        self.node(id).map(Node::kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.find(id).and_then(Node::parent)
    }

    /// Children of a node; empty for leaves and unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.find(id).map(Node::children).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    fn sibling_index(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.sibling_index(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.sibling_index(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Returns true if `ancestor` lies on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Concatenated text of all text runs below `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.find(id) {
            out.push_str(node.text());
            for &child in node.children() {
                self.collect_text(child, out);
            }
        }
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Resolves a child-index path from the root.
    ///
    /// An empty path addresses the root itself.
    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeId> {
        let mut current = self.root;
        for &index in path {
            current = *self.children(current).get(index)?;
        }
        Some(current)
    }

    /// Child-index path from the root to `id`, if it is attached.
    pub fn path_of(&self, id: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = id;
        while current != self.root {
            let (parent, index) = self.sibling_index(current)?;
            path.push(index);
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Post-order listing of the subtree below `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.post_order(id, &mut out);
        out
    }

    fn post_order(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            self.post_order(child, out);
        }
        out.push(id);
    }

    /// Length in the character model: text runs count their characters,
    /// block-like nodes add one for their line break, containers sum their
    /// children.
    pub fn length(&self, id: NodeId) -> usize {
        let Some(node) = self.find(id) else {
            return 0;
        };
        match node.kind() {
            NodeKind::Text => node.text().chars().count(),
            kind => {
                let inner: usize = node.children().iter().map(|&c| self.length(c)).sum();
                if is_block_like(kind) {
                    inner + 1
                } else {
                    inner
                }
            }
        }
    }

    /// Character offset of `id` relative to `ancestor`.
    pub fn offset(&self, id: NodeId, ancestor: NodeId) -> usize {
        let mut total = 0;
        let mut current = id;
        while current != ancestor {
            let Some((parent, index)) = self.sibling_index(current) else {
                break;
            };
            total += self.children(parent)[..index]
                .iter()
                .map(|&c| self.length(c))
                .sum::<usize>();
            current = parent;
        }
        total
    }

    /// Children overlapping `[index, ..)` with the offset inside each.
    fn children_from(&self, id: NodeId, index: usize) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut start = 0;
        for &child in self.children(id) {
            let end = start + self.length(child);
            if end > index {
                out.push((child, index.saturating_sub(start)));
            }
            start = end;
        }
        out
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub(crate) fn alloc(&mut self, kind: NodeKind, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(kind, tag)));
        id
    }

    pub(crate) fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.node_mut(id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub(crate) fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.node_mut(id)?.attributes.shift_remove(name);
        Ok(())
    }

    pub(crate) fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.node_mut(id)?.text = text.to_string();
        Ok(())
    }

    /// Creates a detached node of the given kind.
    pub fn create(&mut self, kind: NodeKind, value: Option<&FormatValue>) -> Result<NodeId> {
        formats::create(self, kind, value)
    }

    /// Creates a detached text run.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.alloc(NodeKind::Text, registry::definition(NodeKind::Text).default_tag());
        if let Some(Some(node)) = self.nodes.get_mut(id.0) {
            node.text = text.to_string();
        }
        id
    }

    /// Copies kind, tag and attributes of a node into a new detached node.
    pub(crate) fn clone_shallow(&mut self, id: NodeId) -> Result<NodeId> {
        let source = self.node(id)?;
        let mut copy = Node::new(source.kind, source.tag.clone());
        copy.attributes = source.attributes.clone();
        let clone = NodeId(self.nodes.len());
        self.nodes.push(Some(copy));
        formats::attach(self, clone)?;
        Ok(clone)
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub(crate) fn add_listener(&mut self, id: NodeId, listener: Listener) {
        self.listeners.entry(id).or_default().push(listener);
    }

    /// Listeners registered on a node.
    pub fn listeners(&self, id: NodeId) -> &[Listener] {
        self.listeners.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Generic primitives
    // ------------------------------------------------------------------

    fn detach(&mut self, id: NodeId) -> Result<()> {
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|&c| c != id);
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Inserts `child` into `parent` before `reference`, or at the end.
    pub(crate) fn base_insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        let parent_kind = self.kind(parent)?;
        let child_kind = self.kind(child)?;
        if !registry::definition(parent_kind).allows(child_kind) {
            return Err(DocumentError::DisallowedChild {
                parent: parent_kind,
                child: child_kind,
            });
        }
        if child == parent || self.is_ancestor(child, parent) || child == self.root {
            return Err(DocumentError::Cycle { parent, child });
        }
        if let Some(reference) = reference {
            if reference == child {
                return Ok(());
            }
            if self.parent(reference) != Some(parent) {
                return Err(DocumentError::NotAChild { parent, reference });
            }
        }

        self.detach(child)?;
        let node = self.node_mut(parent)?;
        let position = reference
            .and_then(|r| node.children.iter().position(|&c| c == r))
            .unwrap_or(node.children.len());
        node.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches a node and frees its whole subtree.
    pub(crate) fn base_remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(DocumentError::InvariantViolation(
                "the root node cannot be removed".to_string(),
            ));
        }
        self.detach(id)?;
        for node in self.descendants(id) {
            self.listeners.shift_remove(&node);
            if let Some(slot) = self.nodes.get_mut(node.0) {
                *slot = None;
            }
        }
        Ok(())
    }

    /// Splits a node at a character index.
    ///
    /// Returns the node now starting at `index`: the node itself for index 0,
    /// its next sibling for an index at its end, otherwise a new sibling that
    /// received everything from `index` on.
    pub(crate) fn base_split(&mut self, id: NodeId, index: usize) -> Result<Option<NodeId>> {
        let length = self.length(id);
        if index == 0 {
            return Ok(Some(id));
        }
        if index == length {
            return Ok(self.next(id));
        }
        if index > length {
            return Err(DocumentError::OutOfBounds { index, length });
        }
        let parent = self.parent(id).ok_or(DocumentError::Detached(id))?;

        if self.kind(id)? == NodeKind::Text {
            let text: String = self.node(id)?.text.clone();
            let head: String = text.chars().take(index).collect();
            let tail: String = text.chars().skip(index).collect();
            self.set_text(id, &head)?;
            let after = self.create_text(&tail);
            let next = self.next(id);
            formats::insert_before(self, parent, after, next)?;
            return Ok(Some(after));
        }

        let after = self.clone_shallow(id)?;
        let next = self.next(id);
        formats::insert_before(self, parent, after, next)?;
        for (child, offset) in self.children_from(id, index) {
            if let Some(moved) = self.base_split(child, offset)? {
                formats::insert_before(self, after, moved, None)?;
            }
        }
        Ok(Some(after))
    }

    /// Splits a node so that `[index, index + length)` sits in a node of its own.
    pub(crate) fn base_isolate(&mut self, id: NodeId, index: usize, length: usize) -> Result<NodeId> {
        let target = self
            .base_split(id, index)?
            .ok_or(DocumentError::OutOfBounds {
                index,
                length: self.length(id),
            })?;
        self.base_split(target, length)?;
        Ok(target)
    }

    /// Splits a container at child boundaries so that `child` is its only child.
    ///
    /// Unlike `base_isolate` this never cuts at a line break, so block-like
    /// containers do not leave an empty trailing copy behind.
    pub(crate) fn isolate_child(&mut self, container: NodeId, child: NodeId) -> Result<NodeId> {
        if self.parent(child) != Some(container) {
            return Err(DocumentError::NotAChild {
                parent: container,
                reference: child,
            });
        }
        let mut current = container;
        if self.first_child(current) != Some(child) {
            current = self.split_off_from(current, child)?;
        }
        if let Some(&rest) = self.children(current).get(1) {
            self.split_off_from(current, rest)?;
        }
        Ok(current)
    }

    /// Moves `from` and every later sibling into a new copy of `container`
    /// placed right after it.
    fn split_off_from(&mut self, container: NodeId, from: NodeId) -> Result<NodeId> {
        let parent = self.parent(container).ok_or(DocumentError::Detached(container))?;
        let after = self.clone_shallow(container)?;
        let next = self.next(container);
        formats::insert_before(self, parent, after, next)?;
        let children = self.children(container).to_vec();
        let start = children.iter().position(|&c| c == from).unwrap_or(children.len());
        for &moved in &children[start..] {
            formats::insert_before(self, after, moved, None)?;
        }
        Ok(after)
    }

    /// Moves all children into the parent in place of `id`, then drops `id`.
    pub(crate) fn base_unwrap(&mut self, id: NodeId) -> Result<()> {
        let parent = self.parent(id).ok_or(DocumentError::Detached(id))?;
        let next = self.next(id);
        formats::move_children(self, id, parent, next)?;
        self.base_remove(id)
    }

    /// Puts `replacement` where `target` is, taking over its children.
    pub(crate) fn base_replace(&mut self, replacement: NodeId, target: NodeId) -> Result<()> {
        let parent = self.parent(target).ok_or(DocumentError::Detached(target))?;
        let target_leaf = registry::definition(self.kind(target)?).is_leaf();
        let replacement_leaf = registry::definition(self.kind(replacement)?).is_leaf();
        if !target_leaf && !replacement_leaf {
            formats::move_children(self, target, replacement, None)?;
        }
        let next = self.next(target);
        formats::insert_before(self, parent, replacement, next)?;
        formats::remove(self, target)
    }

    pub(crate) fn base_replace_with(&mut self, id: NodeId, replacement: NodeId) -> Result<NodeId> {
        formats::replace(self, replacement, id)?;
        Ok(replacement)
    }

    /// Default block formatting.
    ///
    /// Names of block-scope kinds convert the node into that kind (or back to
    /// a neutral block for a falsy value on its own kind). Any other name is
    /// stored as a `data-` attribute.
    pub(crate) fn base_format(
        &mut self,
        id: NodeId,
        name: &str,
        value: Option<&FormatValue>,
    ) -> Result<()> {
        let own_kind = self.kind(id)?;
        let block_kind = registry::by_name(name).filter(|&kind| {
            registry::definition(kind).scope == Scope::Block && kind != NodeKind::Root
        });

        if let Some(kind) = block_kind {
            if kind == own_kind && !is_truthy(value) {
                let neutral = formats::create(self, registry::default_for_scope(Scope::Block), None)?;
                formats::replace_with(self, id, neutral)?;
            } else if is_truthy(value)
                && (kind != own_kind || formats::static_formats(self, id)?.as_ref() != value)
            {
                let replacement = formats::create(self, kind, value)?;
                formats::replace_with(self, id, replacement)?;
            }
            return Ok(());
        }

        if !is_attribute_name(name) {
            return Err(DocumentError::UnknownFormat(name.to_string()));
        }
        let attribute = format!("{ATTRIBUTE_PREFIX}{name}");
        match value {
            Some(value) if value.is_truthy() => {
                self.set_attribute(id, &attribute, &value.to_attribute())
            }
            _ => self.remove_attribute(id, &attribute),
        }
    }

    /// Default instance formats: attribute formats plus the kind's own
    /// format when its static lookup yields one.
    pub(crate) fn base_formats(
        &self,
        id: NodeId,
        static_formats: impl Fn(&Node) -> Option<FormatValue>,
    ) -> IndexMap<String, FormatValue> {
        let mut out = IndexMap::new();
        let Some(node) = self.find(id) else {
            return out;
        };
        for (key, value) in node.attributes() {
            if RESERVED_ATTRIBUTES.contains(&key.as_str()) {
                continue;
            }
            if let Some(name) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                out.insert(name.to_string(), FormatValue::Str(value.clone()));
            }
        }
        if let Some(value) = static_formats(node) {
            out.insert(node.kind().name().to_string(), value);
        }
        out
    }

    /// Default optimize hook: containers with a default child vanish when
    /// emptied; text runs drop when empty and absorb a following run.
    pub(crate) fn base_optimize(&mut self, id: NodeId, ctx: &mut OptimizeContext) -> Result<()> {
        let kind = self.kind(id)?;
        if kind == NodeKind::Text {
            if self.node(id)?.text.is_empty() && self.parent(id).is_some() {
                self.base_remove(id)?;
                ctx.record();
                return Ok(());
            }
            while let Some(next) = self.next(id).filter(|&n| {
                self.kind(n).is_ok_and(|k| k == NodeKind::Text)
            }) {
                let tail = self.node(next)?.text.clone();
                self.node_mut(id)?.text.push_str(&tail);
                self.base_remove(next)?;
                ctx.record();
            }
            return Ok(());
        }
        let empty = self.children(id).is_empty();
        if kind != NodeKind::Root
            && registry::definition(kind).default_child.is_some()
            && empty
            && self.parent(id).is_some()
        {
            trace!(node = %id, %kind, "removing empty container");
            self.base_remove(id)?;
            ctx.record();
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Public, atomic operations
    // ------------------------------------------------------------------

    /// Runs `op` and restores the previous state if it fails.
    pub fn atomically<T>(&mut self, op: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(error = %err, "document mutation failed, rolling back");
                *self = snapshot;
                Err(err)
            }
        }
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        self.atomically(|doc| formats::insert_before(doc, parent, child, reference))
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    pub fn move_children(
        &mut self,
        from: NodeId,
        to: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        self.atomically(|doc| formats::move_children(doc, from, to, reference))
    }

    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.atomically(|doc| formats::remove(doc, id))
    }

    /// Replaces `id` with `replacement`; returns the node that now carries
    /// the content.
    pub fn replace_with(&mut self, id: NodeId, replacement: NodeId) -> Result<NodeId> {
        self.atomically(|doc| formats::replace_with(doc, id, replacement))
    }

    /// Creates a node of `kind` and replaces `id` with it.
    pub fn replace_with_kind(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        value: Option<&FormatValue>,
    ) -> Result<NodeId> {
        self.atomically(|doc| {
            let replacement = formats::create(doc, kind, value)?;
            formats::replace_with(doc, id, replacement)
        })
    }

    pub fn format(&mut self, id: NodeId, name: &str, value: Option<&FormatValue>) -> Result<()> {
        self.atomically(|doc| formats::format(doc, id, name, value))
    }

    pub fn split(&mut self, id: NodeId, index: usize) -> Result<Option<NodeId>> {
        self.atomically(|doc| doc.base_split(id, index))
    }

    pub fn isolate(&mut self, id: NodeId, index: usize, length: usize) -> Result<NodeId> {
        self.atomically(|doc| doc.base_isolate(id, index, length))
    }

    pub fn unwrap(&mut self, id: NodeId) -> Result<()> {
        self.atomically(|doc| doc.base_unwrap(id))
    }

    /// Format lookup on the node's own element (`formats(domNode)`).
    pub fn static_formats(&self, id: NodeId) -> Result<Option<FormatValue>> {
        formats::static_formats(self, id)
    }

    /// All formats currently applied to a node.
    pub fn formats(&self, id: NodeId) -> Result<IndexMap<String, FormatValue>> {
        formats::formats(self, id)
    }

    /// Runs the optimize pass until the tree stops changing.
    pub fn optimize(&mut self) -> Result<usize> {
        self.optimize_with_limit(DEFAULT_MAX_OPTIMIZE_PASSES)
    }

    /// Runs at most `max_passes` optimize passes; returns the number of
    /// structural changes made.
    pub fn optimize_with_limit(&mut self, max_passes: usize) -> Result<usize> {
        self.atomically(|doc| {
            let mut total = 0;
            for pass in 0..max_passes.max(1) {
                let mut ctx = OptimizeContext::default();
                for id in doc.descendants(doc.root) {
                    if doc.contains(id) {
                        formats::optimize(doc, id, &mut ctx)?;
                    }
                }
                trace!(pass, mutations = ctx.mutations(), "optimize pass finished");
                total += ctx.mutations();
                if ctx.mutations() == 0 {
                    break;
                }
            }
            Ok(total)
        })
    }

    /// Structural snapshot of the attached tree.
    pub fn outline(&self) -> Outline {
        Outline::build(self, self.root)
    }

    /// Checks every structural invariant of the attached tree.
    pub fn validate(&self) -> Result<()> {
        let violation = |msg: String| Err(DocumentError::InvariantViolation(msg));
        let root = self.node(self.root)?;
        if root.parent.is_some() {
            return violation("root has a parent".to_string());
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id.0], true) {
                return violation(format!("{id} is reachable twice"));
            }
            let node = self.node(id)?;
            let def = registry::definition(node.kind);

            if node.kind.is_list_container() && node.children.is_empty() {
                return violation(format!("{} {id} is empty", node.kind));
            }
            if node.kind == NodeKind::EmbedList {
                let expected = self.expected_level(id);
                let actual = node
                    .attribute("data-level")
                    .and_then(|l| l.parse::<u32>().ok());
                if actual != Some(expected) {
                    return violation(format!(
                        "embed-list {id} has level {actual:?}, expected {expected}"
                    ));
                }
            }

            for (i, &child) in node.children.iter().enumerate() {
                let child_node = self.node(child)?;
                if child_node.parent != Some(id) {
                    return violation(format!("{child} does not point back to {id}"));
                }
                if !def.allows(child_node.kind) {
                    return violation(format!(
                        "{} {child} inside {} {id}",
                        child_node.kind, node.kind
                    ));
                }
                if let Some(&next) = node.children.get(i + 1) {
                    if formats::mergeable(self, child, next) {
                        return violation(format!("{child} and {next} should have been merged"));
                    }
                }
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Level an embedded list at `id` must carry given its ancestors.
    pub(crate) fn expected_level(&self, id: NodeId) -> u32 {
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            if let Some(node) = self.find(ancestor) {
                if node.kind == NodeKind::EmbedList {
                    let level = node
                        .attribute("data-level")
                        .and_then(|l| l.parse::<u32>().ok())
                        .unwrap_or(1);
                    return level + 1;
                }
            }
            current = self.parent(ancestor);
        }
        1
    }
}

/// Kinds whose length includes a trailing line break.
fn is_block_like(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Block | NodeKind::ListItem)
}

fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
