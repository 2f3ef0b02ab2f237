//! Editing session: commands and the state that applies them to a document.
//!
//! # Modules
//!
//! - `command`: command parsing (`indent 0.1`, `list checked 2`, ...)
//! - `state`: `EditorState`, which applies commands atomically

pub mod command;
pub mod state;
