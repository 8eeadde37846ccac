//! Error types for kdtreed.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KdtreedError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KdtreedError {
    /// The line was blank after trimming.
    #[error("empty command line")]
    EmptyLine,

    /// The line does not match any command shape.
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),
}
