//! Node representation for the document arena.
//!
//! Every element of a document (paragraphs, list containers, list items and
//! text runs) is stored as a [`Node`] inside the [`Document`] arena and
//! addressed by a [`NodeId`]. A node doubles as its own external (markup)
//! element: the `tag` and `attributes` fields are exactly what the serializer
//! writes and the parser reads back.
//!
//! # Example
//!
//! ```
//! use listquill::document::node::{FormatValue, ListKind, NodeKind};
//!
//! assert_eq!(NodeKind::List.name(), "list");
//! assert_eq!(ListKind::parse("checked"), Some(ListKind::Checked));
//! assert!(!FormatValue::Bool(false).is_truthy());
//! ```
//!
//! [`Document`]: crate::document::tree::Document

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a node stored in a [`Document`](crate::document::tree::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural level of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Line-level nodes and their containers.
    Block,
    /// Character content living inside a block.
    Inline,
}

/// The closed set of node kinds known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Document root.
    Root,
    /// Neutral paragraph.
    Block,
    /// Text run.
    Text,
    /// One line of a list.
    ListItem,
    /// Top-level list container.
    List,
    /// List nested inside another list.
    EmbedList,
}

impl NodeKind {
    /// Registered kind name, also used as the format name.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Root => "scroll",
            NodeKind::Block => "block",
            NodeKind::Text => "text",
            NodeKind::ListItem => "list-item",
            NodeKind::List => "list",
            NodeKind::EmbedList => "embed-list",
        }
    }

    /// Returns true for the two list containers.
    pub fn is_list_container(self) -> bool {
        matches!(self, NodeKind::List | NodeKind::EmbedList)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of a top-level list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Bullet,
    Checked,
    Unchecked,
}

impl ListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Ordered => "ordered",
            ListKind::Bullet => "bullet",
            ListKind::Checked => "checked",
            ListKind::Unchecked => "unchecked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ordered" => Some(ListKind::Ordered),
            "bullet" => Some(ListKind::Bullet),
            "checked" => Some(ListKind::Checked),
            "unchecked" => Some(ListKind::Unchecked),
            _ => None,
        }
    }

    /// The opposite checkbox state, if this is a checkbox kind.
    pub fn toggled(self) -> Option<Self> {
        match self {
            ListKind::Checked => Some(ListKind::Unchecked),
            ListKind::Unchecked => Some(ListKind::Checked),
            _ => None,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of an embedded list. Independent of the enclosing list's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    Ordered,
    Unordered,
}

impl EmbedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EmbedKind::Ordered => "ordered",
            EmbedKind::Unordered => "unordered",
        }
    }

    /// Kind implied by a container tag.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "OL" {
            EmbedKind::Ordered
        } else {
            EmbedKind::Unordered
        }
    }
}

/// Format value of an embedded list: its kind and nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbedValue {
    pub kind: EmbedKind,
    pub level: u32,
}

impl EmbedValue {
    pub fn new(kind: EmbedKind, level: u32) -> Self {
        Self { kind, level }
    }
}

/// Direction of an `indent` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndentDelta {
    /// `+1`
    Increase,
    /// `-1`
    Decrease,
}

impl IndentDelta {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+1" => Some(IndentDelta::Increase),
            "-1" => Some(IndentDelta::Decrease),
            _ => None,
        }
    }
}

/// A value passed to `format` or returned by `formats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatValue {
    Bool(bool),
    Str(String),
    List(ListKind),
    Embed(EmbedValue),
    Indent(IndentDelta),
}

impl FormatValue {
    /// `false` and the empty string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FormatValue::Bool(b) => *b,
            FormatValue::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Interprets this value as a list kind.
    pub fn as_list_kind(&self) -> Option<ListKind> {
        match self {
            FormatValue::List(kind) => Some(*kind),
            FormatValue::Str(s) => ListKind::parse(s),
            _ => None,
        }
    }

    /// Interprets this value as an indent direction.
    pub fn as_indent(&self) -> Option<IndentDelta> {
        match self {
            FormatValue::Indent(delta) => Some(*delta),
            FormatValue::Str(s) => IndentDelta::parse(s),
            _ => None,
        }
    }

    /// Attribute text for generic attribute formats.
    pub fn to_attribute(&self) -> String {
        match self {
            FormatValue::Bool(b) => b.to_string(),
            FormatValue::Str(s) => s.clone(),
            FormatValue::List(kind) => kind.as_str().to_string(),
            FormatValue::Embed(embed) => format!("{}:{}", embed.kind.as_str(), embed.level),
            FormatValue::Indent(IndentDelta::Increase) => "+1".to_string(),
            FormatValue::Indent(IndentDelta::Decrease) => "-1".to_string(),
        }
    }
}

/// Returns true if an optional format value is truthy.
pub fn is_truthy(value: Option<&FormatValue>) -> bool {
    value.is_some_and(FormatValue::is_truthy)
}

/// A single node in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) tag: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) text: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: tag.into(),
            attributes: IndexMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Upper-case element tag, `#text` for text runs.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Text content of a text run; empty for elements.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
