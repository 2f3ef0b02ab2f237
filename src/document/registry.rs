//! Type-indexed registry of node kinds.
//!
//! Each kind registers a name, the markup tags it maps to, its scope, a default
//! child and the set of kinds it may directly contain. The framework consults
//! these entries to validate composition and to drive the markup codec.

use super::node::{NodeKind, Scope};

/// Static registration entry for one node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlotDefinition {
    pub kind: NodeKind,
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub scope: Scope,
    pub default_child: Option<NodeKind>,
    pub allowed_children: &'static [NodeKind],
}

impl BlotDefinition {
    /// Canonical tag used when creating a node of this kind.
    pub fn default_tag(&self) -> &'static str {
        self.tags[0]
    }

    pub fn allows(&self, child: NodeKind) -> bool {
        self.allowed_children.contains(&child)
    }

    /// Leaf kinds carry no children at all.
    pub fn is_leaf(&self) -> bool {
        self.allowed_children.is_empty()
    }
}

const ROOT: BlotDefinition = BlotDefinition {
    kind: NodeKind::Root,
    name: "scroll",
    tags: &["BODY"],
    scope: Scope::Block,
    default_child: Some(NodeKind::Block),
    allowed_children: &[
        NodeKind::Block,
        NodeKind::ListItem,
        NodeKind::List,
        NodeKind::EmbedList,
    ],
};

const BLOCK: BlotDefinition = BlotDefinition {
    kind: NodeKind::Block,
    name: "block",
    tags: &["P"],
    scope: Scope::Block,
    default_child: None,
    allowed_children: &[NodeKind::Text],
};

const TEXT: BlotDefinition = BlotDefinition {
    kind: NodeKind::Text,
    name: "text",
    tags: &["#text"],
    scope: Scope::Inline,
    default_child: None,
    allowed_children: &[],
};

const LIST_ITEM: BlotDefinition = BlotDefinition {
    kind: NodeKind::ListItem,
    name: "list-item",
    tags: &["LI"],
    scope: Scope::Block,
    default_child: None,
    allowed_children: &[NodeKind::Text, NodeKind::EmbedList],
};

const LIST: BlotDefinition = BlotDefinition {
    kind: NodeKind::List,
    name: "list",
    tags: &["OL", "UL"],
    scope: Scope::Block,
    default_child: Some(NodeKind::ListItem),
    allowed_children: &[NodeKind::ListItem, NodeKind::EmbedList],
};

const EMBED_LIST: BlotDefinition = BlotDefinition {
    kind: NodeKind::EmbedList,
    name: "embed-list",
    tags: &["OL", "UL"],
    scope: Scope::Block,
    default_child: Some(NodeKind::ListItem),
    allowed_children: &[NodeKind::ListItem],
};

const ALL: [&BlotDefinition; 6] = [&ROOT, &BLOCK, &TEXT, &LIST_ITEM, &LIST, &EMBED_LIST];

/// Registration entry for a kind.
pub fn definition(kind: NodeKind) -> &'static BlotDefinition {
    match kind {
        NodeKind::Root => &ROOT,
        NodeKind::Block => &BLOCK,
        NodeKind::Text => &TEXT,
        NodeKind::ListItem => &LIST_ITEM,
        NodeKind::List => &LIST,
        NodeKind::EmbedList => &EMBED_LIST,
    }
}

/// Looks a kind up by its registered name.
pub fn by_name(name: &str) -> Option<NodeKind> {
    ALL.iter().find(|def| def.name == name).map(|def| def.kind)
}

/// Resolves a markup element to a kind.
///
/// `OL`/`UL` map to an embedded list when they carry a `data-level`
/// attribute and to a top-level list otherwise.
pub fn by_tag(tag: &str, has_level: bool) -> Option<NodeKind> {
    match tag {
        "OL" | "UL" if has_level => Some(NodeKind::EmbedList),
        "OL" | "UL" => Some(NodeKind::List),
        "LI" => Some(NodeKind::ListItem),
        "P" => Some(NodeKind::Block),
        _ => None,
    }
}

/// The neutral kind created when a scope alone is requested.
pub fn default_for_scope(scope: Scope) -> NodeKind {
    match scope {
        Scope::Block => NodeKind::Block,
        Scope::Inline => NodeKind::Text,
    }
}
