//! Editor commands.
//!
//! Commands are written as a verb followed by arguments, with nodes addressed
//! by a dot-separated path of child indices from the document root:
//!
//! ```text
//! indent 0.1          move the second line of the first list one level in
//! outdent 0.1.0       move a nested line one level out
//! list checked 2      turn paragraph 2 into (or switch list 2's line to) a checklist
//! unlist 0.0          turn a list line back into a paragraph
//! toggle 0.0          flip a checklist line
//! remove 0.3          delete a line
//! ```
//!
//! # Example
//!
//! ```
//! use listquill::editor::command::Command;
//! use listquill::document::node::ListKind;
//!
//! let cmd = Command::parse("list ordered 0.2").unwrap();
//! assert_eq!(cmd, Command::List { kind: ListKind::Ordered, path: vec![0, 2] });
//! assert_eq!(cmd.to_string(), "list ordered 0.2");
//! ```

use crate::document::node::ListKind;
use std::fmt;
use thiserror::Error;

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' expects {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("Invalid node path '{0}'")]
    InvalidPath(String),

    #[error("Unknown list kind '{0}' (expected ordered, bullet, checked or unchecked)")]
    UnknownListKind(String),
}

/// A structural editing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Indent { path: Vec<usize> },
    Outdent { path: Vec<usize> },
    List { kind: ListKind, path: Vec<usize> },
    Unlist { path: Vec<usize> },
    Toggle { path: Vec<usize> },
    Remove { path: Vec<usize> },
}

impl Command {
    /// Parses a command line.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let mut words = input.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;

        let command = match verb {
            "indent" => Command::Indent {
                path: next_path(&mut words, "indent")?,
            },
            "outdent" => Command::Outdent {
                path: next_path(&mut words, "outdent")?,
            },
            "list" => {
                let kind = words.next().ok_or(CommandError::MissingArgument {
                    command: "list",
                    argument: "a list kind",
                })?;
                let kind = ListKind::parse(kind)
                    .ok_or_else(|| CommandError::UnknownListKind(kind.to_string()))?;
                Command::List {
                    kind,
                    path: next_path(&mut words, "list")?,
                }
            }
            "unlist" => Command::Unlist {
                path: next_path(&mut words, "unlist")?,
            },
            "toggle" => Command::Toggle {
                path: next_path(&mut words, "toggle")?,
            },
            "remove" | "rm" => Command::Remove {
                path: next_path(&mut words, "remove")?,
            },
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }

    /// Path of the node the command operates on.
    pub fn path(&self) -> &[usize] {
        match self {
            Command::Indent { path }
            | Command::Outdent { path }
            | Command::List { path, .. }
            | Command::Unlist { path }
            | Command::Toggle { path }
            | Command::Remove { path } => path,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = format_path(self.path());
        match self {
            Command::Indent { .. } => write!(f, "indent {path}"),
            Command::Outdent { .. } => write!(f, "outdent {path}"),
            Command::List { kind, .. } => write!(f, "list {kind} {path}"),
            Command::Unlist { .. } => write!(f, "unlist {path}"),
            Command::Toggle { .. } => write!(f, "toggle {path}"),
            Command::Remove { .. } => write!(f, "remove {path}"),
        }
    }
}

/// Parses a dot-separated child-index path such as `0.2.1`.
pub fn parse_path(s: &str) -> Result<Vec<usize>, CommandError> {
    s.split('.')
        .map(|part| part.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CommandError::InvalidPath(s.to_string()))
}

pub fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn next_path<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<Vec<usize>, CommandError> {
    let word = words.next().ok_or(CommandError::MissingArgument {
        command,
        argument: "a node path",
    })?;
    parse_path(word)
}
