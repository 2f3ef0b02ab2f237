//! Serializable structural snapshot of a document.
//!
//! An `Outline` captures kinds, tags, attributes and text of the attached
//! tree. Two documents with equal outlines are structurally identical, which
//! is what round-trip and rollback checks compare.

use super::node::{NodeId, NodeKind};
use super::tree::Document;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub kind: NodeKind,
    pub tag: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Outline>,
}

impl Outline {
    pub(crate) fn build(doc: &Document, id: NodeId) -> Self {
        match doc.find(id) {
            Some(node) => Self {
                kind: node.kind(),
                tag: node.tag().to_string(),
                attributes: node.attributes().clone(),
                text: node.text().to_string(),
                children: node
                    .children()
                    .iter()
                    .map(|&child| Outline::build(doc, child))
                    .collect(),
            },
            None => Self {
                kind: NodeKind::Root,
                tag: String::new(),
                attributes: IndexMap::new(),
                text: String::new(),
                children: Vec::new(),
            },
        }
    }

    /// Number of nodes in this outline, itself included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Outline::size).sum::<usize>()
    }
}
