//! Editor state management.
//!
//! `EditorState` owns the document being edited, the configuration and the
//! dirty flag. Commands go through [`EditorState::apply`],
//! which runs the structural operation, the optimize pass and validation as
//! one unit: if any step fails the document is left exactly as it was.
//!
//! # Example
//!
//! ```
//! use listquill::config::Config;
//! use listquill::document::parser::parse_markup;
//! use listquill::editor::command::Command;
//! use listquill::editor::state::EditorState;
//!
//! let doc = parse_markup("<ul><li>a</li><li>b</li></ul>").unwrap();
//! let mut state = EditorState::new(doc, Config::default());
//!
//! state.apply(&Command::parse("indent 0.1").unwrap()).unwrap();
//! assert!(state.is_dirty());
//!
//! let list = state.document().node_at_path(&[0]).unwrap();
//! assert_eq!(state.document().children(list).len(), 2);
//! ```

use super::command::{format_path, Command};
use crate::config::Config;
use crate::document::node::{FormatValue, IndentDelta, ListKind, NodeId, NodeKind};
use crate::document::tree::Document;
use crate::file::saver::save_document;
use crate::formats::list::List;
use crate::formats::{ListItem, INDENT};
use crate::input::{self, PointerKind};
use anyhow::{anyhow, bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Central state container for an editing session.
#[derive(Debug)]
pub struct EditorState {
    document: Document,
    config: Config,
    dirty: bool,
    filename: Option<PathBuf>,
}

impl EditorState {
    pub fn new(document: Document, config: Config) -> Self {
        Self {
            document,
            config,
            dirty: false,
            filename: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_filename(&mut self, filename: impl Into<PathBuf>) {
        self.filename = Some(filename.into());
    }

    /// Parses and applies one command line.
    pub fn apply_str(&mut self, line: &str) -> Result<()> {
        let command = Command::parse(line).with_context(|| format!("Invalid command '{line}'"))?;
        self.apply(&command)
    }

    /// Applies a command, then normalizes and validates the result. On
    /// failure the document is unchanged.
    pub fn apply(&mut self, command: &Command) -> Result<()> {
        let before = self.document.clone();
        match self.run(command) {
            Ok(()) => {
                self.dirty = true;
                info!(%command, "applied command");
                Ok(())
            }
            Err(err) => {
                self.document = before;
                Err(err.context(format!("Command '{command}' failed")))
            }
        }
    }

    fn run(&mut self, command: &Command) -> Result<()> {
        let target = self.resolve(command.path())?;
        match command {
            Command::Indent { .. } => {
                self.expect_item(target, command)?;
                self.document.format(
                    target,
                    INDENT,
                    Some(&ListItem::indent_value(IndentDelta::Increase)),
                )?;
            }
            Command::Outdent { .. } => {
                self.expect_item(target, command)?;
                self.document.format(
                    target,
                    INDENT,
                    Some(&ListItem::indent_value(IndentDelta::Decrease)),
                )?;
            }
            Command::List { kind, .. } => self.set_list_kind(target, *kind)?,
            Command::Unlist { .. } => {
                self.expect_item(target, command)?;
                self.outdent_fully(target)?;
                self.document.format(
                    target,
                    NodeKind::List.name(),
                    Some(&FormatValue::Bool(false)),
                )?;
            }
            Command::Toggle { .. } => {
                self.expect_item(target, command)?;
                let is_checklist = self
                    .document
                    .parent(target)
                    .and_then(|p| self.document.find(p))
                    .filter(|p| p.kind() == NodeKind::List)
                    .and_then(List::kind_of)
                    .is_some_and(|kind| kind.toggled().is_some());
                if !is_checklist {
                    bail!("{} is not a checklist line", format_path(command.path()));
                }
                input::dispatch(&mut self.document, PointerKind::MouseDown, target)?;
            }
            Command::Remove { .. } => {
                if target == self.document.root() {
                    bail!("The document root cannot be removed");
                }
                self.document.remove(target)?;
            }
        }

        let changes = self
            .document
            .optimize_with_limit(self.config.max_optimize_passes)?;
        debug!(changes, "optimized after command");
        self.document
            .validate()
            .context("Command left the document in an invalid state")?;
        Ok(())
    }

    fn resolve(&self, path: &[usize]) -> Result<NodeId> {
        self.document
            .node_at_path(path)
            .ok_or_else(|| anyhow!("No node at path {}", format_path(path)))
    }

    fn expect_item(&self, id: NodeId, command: &Command) -> Result<()> {
        let kind = self.document.kind(id)?;
        if kind != NodeKind::ListItem {
            bail!(
                "'{}' needs a list line, {} is a {kind}",
                command,
                format_path(command.path())
            );
        }
        Ok(())
    }

    /// Turns a paragraph into a list line, or moves a line into a top-level
    /// list of `kind`. Nested lines are outdented to the top level first.
    fn set_list_kind(&mut self, target: NodeId, kind: ListKind) -> Result<()> {
        match self.document.kind(target)? {
            NodeKind::Block => {}
            NodeKind::ListItem => self.outdent_fully(target)?,
            other => bail!("Cannot format a {other} as a list"),
        }
        self.document
            .format(target, NodeKind::List.name(), Some(&FormatValue::List(kind)))?;
        Ok(())
    }

    /// Outdents a nested line until it sits in a top-level list.
    fn outdent_fully(&mut self, target: NodeId) -> Result<()> {
        let decrease = ListItem::indent_value(IndentDelta::Decrease);
        while self
            .document
            .parent(target)
            .is_some_and(|p| self.document.kind(p).is_ok_and(|k| k == NodeKind::EmbedList))
        {
            self.document.format(target, INDENT, Some(&decrease))?;
        }
        Ok(())
    }

    /// Saves to `path`, or to the current filename when `path` is None.
    pub fn save(&mut self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self
                .filename
                .clone()
                .ok_or_else(|| anyhow!("No file name to save to"))?,
        };
        save_document(&path, &self.document, &self.config)?;
        self.dirty = false;
        Ok(())
    }
}
