//! Error types for document operations.

use super::node::{NodeId, NodeKind};
use thiserror::Error;

/// Errors surfaced by the document framework.
///
/// List formats never raise errors for policy decisions (disallowed content is
/// redirected, empty containers are removed). These variants cover the
/// framework's own failures: bad handles, illegal composition and malformed
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("Node {0} is not attached to a parent")]
    Detached(NodeId),

    #[error("A {child} node is not allowed inside a {parent} node")]
    DisallowedChild { parent: NodeKind, child: NodeKind },

    #[error("Inserting {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("Reference node {reference} is not a child of {parent}")]
    NotAChild { parent: NodeId, reference: NodeId },

    #[error("Index {index} out of bounds for node of length {length}")]
    OutOfBounds { index: usize, length: usize },

    #[error("Unknown format '{0}'")]
    UnknownFormat(String),

    #[error("Invalid value '{value}' for format '{name}'")]
    InvalidFormatValue { name: String, value: String },

    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl DocumentError {
    /// Returns true if the error is about malformed input markup.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, DocumentError::Parse { .. })
    }

    /// Returns true if the error is about tree composition.
    pub fn is_structural_error(&self) -> bool {
        matches!(
            self,
            DocumentError::DisallowedChild { .. }
                | DocumentError::Cycle { .. }
                | DocumentError::NotAChild { .. }
                | DocumentError::InvariantViolation(_)
        )
    }
}

/// Result alias for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DocumentError::DisallowedChild {
            parent: NodeKind::Block,
            child: NodeKind::List,
        };
        assert_eq!(
            err.to_string(),
            "A list node is not allowed inside a block node"
        );
        assert!(err.is_structural_error());
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_parse_error_display() {
        let err = DocumentError::Parse {
            position: 4,
            message: "unexpected end of input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Parse error at position 4: unexpected end of input"
        );
        assert!(err.is_parse_error());
    }
}
