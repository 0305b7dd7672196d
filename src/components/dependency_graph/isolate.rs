//! Forward reachability from a root node.
//!
//! An isolation is the set of nodes the root depends on, directly or
//! transitively, together with every link leaving a node of that closure.
//! Links are collected from the source side only: a link into the closure
//! from a node outside it is never part of the result.

use super::error::Result;
use super::graph::{Graph, LinkIdx, NodeIdx};

/// Nodes and links reachable from a root, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Isolation {
	pub root: NodeIdx,
	/// Root first, then breadth-first discovery order. No duplicates.
	pub nodes: Vec<NodeIdx>,
	pub links: Vec<LinkIdx>,
}

#[derive(Clone, Debug, Default)]
struct IndexEntry {
	dependencies: Vec<NodeIdx>,
	links: Vec<LinkIdx>,
	visited: bool,
}

/// Adjacency lists and traversal flags for one isolation request.
///
/// Always built from the graph right before a traversal and dropped after
/// it, so visited flags never leak between requests.
#[derive(Debug)]
struct IsolationIndex {
	entries: Vec<IndexEntry>,
}

impl IsolationIndex {
	fn build(graph: &Graph) -> Self {
		let mut entries = vec![IndexEntry::default(); graph.nodes().len()];
		for (idx, link) in graph.links().iter().enumerate() {
			let entry = &mut entries[link.source];
			if !entry.dependencies.contains(&link.target) {
				entry.dependencies.push(link.target);
			}
			entry.links.push(idx);
		}
		Self { entries }
	}
}

/// Isolate the subgraph reachable from the node with id `root`.
pub fn isolate(graph: &Graph, root: &str) -> Result<Isolation> {
	let root = graph.index_of(root)?;
	Ok(isolate_index(graph, root))
}

/// Isolate the subgraph reachable from an already resolved node.
pub fn isolate_index(graph: &Graph, root: NodeIdx) -> Isolation {
	let mut index = IsolationIndex::build(graph);
	let mut in_nodes = vec![false; graph.nodes().len()];
	let mut in_links = vec![false; graph.links().len()];

	let mut nodes = vec![root];
	let mut links = Vec::new();
	in_nodes[root] = true;

	let mut frontier = vec![root];
	while !frontier.is_empty() {
		let mut candidates = Vec::new();

		for &node in &frontier {
			let entry = &index.entries[node];
			for &dep in &entry.dependencies {
				if !in_nodes[dep] {
					in_nodes[dep] = true;
					nodes.push(dep);
				}
				candidates.push(dep);
			}
			for &link in &entry.links {
				if !in_links[link] {
					in_links[link] = true;
					links.push(link);
				}
			}
		}

		for &node in &frontier {
			index.entries[node].visited = true;
		}

		// A node shared by several frontier nodes is expanded once.
		candidates.sort_unstable();
		candidates.dedup();
		candidates.retain(|&node| !index.entries[node].visited);
		frontier = candidates;
	}

	Isolation { root, nodes, links }
}
