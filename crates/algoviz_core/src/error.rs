//! Error types for the algorithm engines.
//!
//! Every error here is a caller error: the engines reject malformed input
//! before (or at the very start of) a run and never fail afterwards.

use thiserror::Error;

/// A specialized `Result` type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur when running an engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The supplied keys, graph or start node were missing or malformed.
    ///
    /// The message is meant to be shown to the caller as-is.
    #[error("{0}")]
    InvalidInput(String),

    /// The start node of a shortest-path run is not a node of the graph.
    #[error("Start node {0} not found in graph")]
    UnknownStartNode(String),
}

impl Error {
    /// Shorthand for building an [`Error::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
