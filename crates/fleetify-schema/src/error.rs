//! Error types for the fleetify-schema crate.
//!
//! Descriptor extraction and identifier validation share one semantic error
//! enum, following the project's `thiserror` conventions.

use thiserror::Error;

/// Errors raised while turning model source into column descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The model source is not valid Rust.
    #[error("failed to parse model source: {message}")]
    Parse {
        /// Description of the syntax error.
        message: String,
    },

    /// The source contains no struct deriving `Model` for the table.
    #[error("no struct deriving Model found for table '{table}'")]
    ModelNotFound {
        /// Table the caller asked for.
        table: String,
    },

    /// A `#[column]` or `#[model]` annotation is malformed.
    #[error("invalid annotation on '{field}': {message}")]
    InvalidAnnotation {
        /// Field (or struct) carrying the annotation.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// A table or column name failed the identifier allow-list.
    #[error("invalid SQL identifier '{value}'")]
    InvalidIdentifier {
        /// The rejected identifier.
        value: String,
    },
}

impl SchemaError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
