//! Pointer interaction for documents.
//!
//! Node kinds register [`Listener`]s when they are constructed (lists do, to
//! toggle checkbox items). [`handler::dispatch`] delivers a [`PointerEvent`]
//! to the target and then to each ancestor, running every listener that
//! handles the event's kind.

pub mod handler;

pub use handler::dispatch;

use crate::document::error::Result;
use crate::document::node::NodeId;
use crate::document::tree::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of pointer events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    MouseDown,
    TouchStart,
    MouseUp,
}

impl PointerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PointerKind::MouseDown => "mousedown",
            PointerKind::TouchStart => "touchstart",
            PointerKind::MouseUp => "mouseup",
        }
    }
}

impl fmt::Display for PointerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pointer event aimed at one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub target: NodeId,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, target: NodeId) -> Self {
        Self { kind, target }
    }
}

/// Listener callback: receives the document, the node the listener is
/// registered on, and the event.
pub type ListenerFn = fn(&mut Document, NodeId, &PointerEvent) -> Result<()>;

/// A callback bound to a set of pointer kinds.
#[derive(Clone, Copy)]
pub struct Listener {
    events: &'static [PointerKind],
    handler: ListenerFn,
}

impl Listener {
    pub fn new(events: &'static [PointerKind], handler: ListenerFn) -> Self {
        Self { events, handler }
    }

    pub fn handles(&self, kind: PointerKind) -> bool {
        self.events.contains(&kind)
    }

    pub(crate) fn call(&self, doc: &mut Document, current: NodeId, event: &PointerEvent) -> Result<()> {
        (self.handler)(doc, current, event)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
