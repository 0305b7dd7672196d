//! The loaded dependency graph.
//!
//! Nodes and links live in arenas and are addressed by index everywhere
//! else in the component. The structure never changes after loading; node
//! positions belong to the layout engine, not to this store.

use std::collections::HashMap;

use log::info;

use super::error::{GraphError, Result};
use super::types::GraphData;

/// Index of a node in [`Graph::nodes`].
pub type NodeIdx = usize;
/// Index of a link in [`Graph::links`].
pub type LinkIdx = usize;

/// A node of the loaded graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub size: f64,
}

impl Node {
	/// Radius on screen, `log2(size) + 1`.
	pub fn radius(&self) -> f64 {
		self.size.log2() + 1.0
	}
}

/// A link with both endpoints resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	pub source: NodeIdx,
	pub target: NodeIdx,
}

/// Immutable node and link arenas plus an id lookup.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	links: Vec<Link>,
	by_id: HashMap<String, NodeIdx>,
}

impl Graph {
	/// Build the graph from a parsed document, resolving link endpoints.
	pub fn from_data(data: GraphData) -> Result<Self> {
		let mut by_id = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for node in data.nodes {
			if !(node.size.is_finite() && node.size > 0.0) {
				return Err(GraphError::Load(format!(
					"node '{}' has invalid size {}",
					node.id, node.size
				)));
			}
			if by_id.insert(node.id.clone(), nodes.len()).is_some() {
				return Err(GraphError::Load(format!("duplicate node id '{}'", node.id)));
			}
			nodes.push(Node {
				id: node.id,
				size: node.size,
			});
		}

		let resolve = |id: &str| {
			by_id
				.get(id)
				.copied()
				.ok_or_else(|| GraphError::Load(format!("link refers to unknown node '{id}'")))
		};
		let links = data
			.links
			.iter()
			.map(|link| {
				Ok(Link {
					source: resolve(&link.source)?,
					target: resolve(&link.target)?,
				})
			})
			.collect::<Result<Vec<_>>>()?;

		info!("Loaded graph with {} nodes and {} links", nodes.len(), links.len());
		Ok(Self {
			nodes,
			links,
			by_id,
		})
	}

	/// Parse and build the graph from JSON text.
	pub fn from_json(text: &str) -> Result<Self> {
		Self::from_data(GraphData::from_json(text)?)
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, idx: NodeIdx) -> &Node {
		&self.nodes[idx]
	}

	pub fn link(&self, idx: LinkIdx) -> Link {
		self.links[idx]
	}

	/// Resolve a node id, failing with [`GraphError::NotFound`].
	pub fn index_of(&self, id: &str) -> Result<NodeIdx> {
		self.by_id
			.get(id)
			.copied()
			.ok_or_else(|| GraphError::NotFound(id.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DOC: &str = r#"{
		"nodes": [{"id": "app", "size": 8}, {"id": "log", "size": 1}],
		"links": [{"source": "app", "target": "log"}]
	}"#;

	#[test]
	fn resolves_links_to_indices() {
		let graph = Graph::from_json(DOC).unwrap();
		assert_eq!(graph.nodes().len(), 2);
		assert_eq!(graph.links(), &[Link { source: 0, target: 1 }]);
		assert_eq!(graph.index_of("log"), Ok(1));
	}

	#[test]
	fn unknown_id_is_not_found() {
		let graph = Graph::from_json(DOC).unwrap();
		assert_eq!(
			graph.index_of("tokio"),
			Err(GraphError::NotFound("tokio".into()))
		);
	}

	#[test]
	fn radius_is_log_scaled() {
		let graph = Graph::from_json(DOC).unwrap();
		assert_eq!(graph.node(0).radius(), 4.0);
		assert_eq!(graph.node(1).radius(), 1.0);
	}

	#[test]
	fn rejects_dangling_links() {
		let err = Graph::from_json(
			r#"{"nodes":[{"id":"a","size":1}],"links":[{"source":"a","target":"b"}]}"#,
		)
		.unwrap_err();
		assert!(matches!(err, GraphError::Load(msg) if msg.contains("'b'")));
	}

	#[test]
	fn rejects_duplicate_ids() {
		let err = Graph::from_json(r#"{"nodes":[{"id":"a","size":1},{"id":"a","size":2}]}"#)
			.unwrap_err();
		assert!(matches!(err, GraphError::Load(msg) if msg.contains("duplicate")));
	}

	#[test]
	fn rejects_non_positive_sizes() {
		let err = Graph::from_json(r#"{"nodes":[{"id":"a","size":0}]}"#).unwrap_err();
		assert!(matches!(err, GraphError::Load(_)));
	}
}
