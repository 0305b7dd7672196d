//! Errors raised while loading and exploring a dependency graph.
//!
//! Load failures abort the page before any graph UI is mounted. The other
//! variants are recoverable: the command that produced them is refused and
//! the view state is left untouched.

use thiserror::Error;

/// Result type for dependency graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error type for dependency graph operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
	/// A node id that is not part of the loaded graph
	#[error("node not found: {0}")]
	NotFound(String),

	/// An action that needs a selected node was issued without one
	#[error("no node is selected")]
	NoSelection,

	/// The graph document is unreachable or malformed
	#[error("failed to load graph: {0}")]
	Load(String),
}

impl From<serde_json::Error> for GraphError {
	fn from(err: serde_json::Error) -> Self {
		Self::Load(err.to_string())
	}
}
