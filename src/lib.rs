//! listquill: hierarchical list structure for rich-text documents.
//!
//! A document is a tree of paragraphs and lists. Lists hold lines
//! (`ListItem`) and nested lists (`EmbedList`); formatting commands such as
//! indent, outdent, checkbox toggling and list removal restructure the tree
//! while keeping it equal to a valid, minimal markup representation.
//!
//! # Modules
//!
//! - `document`: arena tree, node kinds, registry, markup parser
//! - `formats`: per-kind behavior (`List`, `ListItem`, `EmbedList`, ...)
//! - `input`: pointer events and listener dispatch
//! - `editor`: command parsing and the editing session
//! - `file`: loading and saving markup files
//! - `config`: user configuration

pub mod config;
pub mod document;
pub mod editor;
pub mod file;
pub mod formats;
pub mod input;
