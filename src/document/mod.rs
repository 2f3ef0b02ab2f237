//! Document model: arena tree, node kinds, registry and markup parser.
//!
//! # Modules
//!
//! - `node`: node handles, kinds and format values
//! - `tree`: the `Document` arena and its generic primitives
//! - `registry`: per-kind registration (tags, scope, allowed children)
//! - `parser`: markup (`<ul><li>…</li></ul>`) to `Document`
//! - `outline`: serializable structural snapshot
//! - `error`: `DocumentError`

pub mod error;
pub mod node;
pub mod outline;
pub mod parser;
pub mod registry;
pub mod tree;

pub use error::DocumentError;
pub use node::{FormatValue, ListKind, NodeId, NodeKind};
pub use tree::Document;
