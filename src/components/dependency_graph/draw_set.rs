//! The node and link sets handed to the renderer.

use std::collections::BTreeSet;

use log::debug;

use super::error::Result;
use super::graph::{Graph, LinkIdx, NodeIdx};
use super::isolate::isolate_index;

/// Which part of the graph is being drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IsolationMode {
	#[default]
	Full,
	Node(NodeIdx),
}

/// Nodes and links for the current frame.
///
/// `nodes_to_draw` and `highlighted_nodes` never overlap: a search moves
/// matching nodes from the former into the latter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawState {
	pub nodes_to_draw: BTreeSet<NodeIdx>,
	pub links_to_draw: BTreeSet<LinkIdx>,
	pub highlighted_nodes: BTreeSet<NodeIdx>,
}

impl DrawState {
	/// Draw state showing the whole graph.
	pub fn full(graph: &Graph) -> Self {
		let mut state = Self::default();
		state.set_isolation(graph, IsolationMode::Full);
		state
	}

	/// Reset the view to `mode`. Clears highlights.
	pub fn set_isolation(&mut self, graph: &Graph, mode: IsolationMode) {
		self.highlighted_nodes.clear();
		match mode {
			IsolationMode::Full => {
				self.nodes_to_draw = (0..graph.nodes().len()).collect();
				self.links_to_draw = (0..graph.links().len()).collect();
			}
			IsolationMode::Node(root) => {
				let isolation = isolate_index(graph, root);
				self.nodes_to_draw = isolation.nodes.into_iter().collect();
				self.links_to_draw = isolation.links.into_iter().collect();
			}
		}
		debug!(
			"Isolation {:?}: {} nodes, {} links",
			mode,
			self.nodes_to_draw.len(),
			self.links_to_draw.len()
		);
	}

	/// Reset the view to the isolation rooted at node `id`.
	pub fn set_isolation_id(&mut self, graph: &Graph, id: &str) -> Result<()> {
		let root = graph.index_of(id)?;
		self.set_isolation(graph, IsolationMode::Node(root));
		Ok(())
	}

	/// Highlight the drawn nodes whose id contains `term`.
	///
	/// Matching is a case-sensitive substring test. Previous highlights go
	/// back to `nodes_to_draw` first, so searches never accumulate and an
	/// empty term restores the isolation view.
	pub fn apply_search(&mut self, graph: &Graph, term: &str) {
		self.nodes_to_draw.append(&mut self.highlighted_nodes);
		if term.is_empty() {
			return;
		}
		let (matched, rest): (BTreeSet<_>, BTreeSet<_>) = std::mem::take(&mut self.nodes_to_draw)
			.into_iter()
			.partition(|&node| graph.node(node).id.contains(term));
		self.highlighted_nodes = matched;
		self.nodes_to_draw = rest;
	}

	/// Whether `node` is drawn, plain or highlighted.
	pub fn is_visible(&self, node: NodeIdx) -> bool {
		self.nodes_to_draw.contains(&node) || self.highlighted_nodes.contains(&node)
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn graph() -> Graph {
		Graph::from_json(
			r#"{
				"nodes": [
					{"id": "app", "size": 4},
					{"id": "serde", "size": 2},
					{"id": "serde_json", "size": 2},
					{"id": "log", "size": 1},
					{"id": "tokio", "size": 8}
				],
				"links": [
					{"source": "app", "target": "serde_json"},
					{"source": "serde_json", "target": "serde"},
					{"source": "app", "target": "log"},
					{"source": "tokio", "target": "log"}
				]
			}"#,
		)
		.unwrap()
	}

	fn set(items: &[usize]) -> BTreeSet<usize> {
		items.iter().copied().collect()
	}

	#[test]
	fn full_view_draws_everything() {
		let g = graph();
		let state = DrawState::full(&g);
		assert_eq!(state.nodes_to_draw, set(&[0, 1, 2, 3, 4]));
		assert_eq!(state.links_to_draw, set(&[0, 1, 2, 3]));
		assert!(state.highlighted_nodes.is_empty());
	}

	#[test]
	fn node_view_uses_the_isolation() {
		let g = graph();
		let mut state = DrawState::full(&g);
		state.set_isolation_id(&g, "serde_json").unwrap();
		assert_eq!(state.nodes_to_draw, set(&[1, 2]));
		assert_eq!(state.links_to_draw, set(&[1]));
	}

	#[test]
	fn unknown_isolation_leaves_state_alone() {
		let g = graph();
		let mut state = DrawState::full(&g);
		let before = state.clone();
		assert!(state.set_isolation_id(&g, "rand").is_err());
		assert_eq!(state, before);
	}

	#[test]
	fn search_moves_matches_out_of_drawn_nodes() {
		let g = graph();
		let mut state = DrawState::full(&g);
		state.apply_search(&g, "serde");
		assert_eq!(state.highlighted_nodes, set(&[1, 2]));
		assert_eq!(state.nodes_to_draw, set(&[0, 3, 4]));
	}

	#[test]
	fn search_is_case_sensitive() {
		let g = graph();
		let mut state = DrawState::full(&g);
		state.apply_search(&g, "Serde");
		assert!(state.highlighted_nodes.is_empty());
	}

	#[test]
	fn empty_search_restores_the_view() {
		let g = graph();
		let mut state = DrawState::full(&g);
		let before = state.clone();
		state.apply_search(&g, "o");
		state.apply_search(&g, "");
		assert_eq!(state, before);
	}

	#[test]
	fn consecutive_searches_do_not_accumulate() {
		let g = graph();
		let mut state = DrawState::full(&g);
		state.apply_search(&g, "serde");
		state.apply_search(&g, "log");
		assert_eq!(state.highlighted_nodes, set(&[3]));
		assert_eq!(state.nodes_to_draw, set(&[0, 1, 2, 4]));
	}

	#[test]
	fn non_matching_search_keeps_isolation() {
		let g = graph();
		let mut state = DrawState::full(&g);
		state.set_isolation_id(&g, "serde_json").unwrap();
		let isolated = state.nodes_to_draw.clone();
		state.apply_search(&g, "tokio");
		assert!(state.highlighted_nodes.is_empty());
		assert_eq!(state.nodes_to_draw, isolated);
	}

	#[test]
	fn full_isolation_resets_after_any_sequence() {
		let g = graph();
		let mut state = DrawState::full(&g);
		state.set_isolation_id(&g, "app").unwrap();
		state.apply_search(&g, "s");
		state.set_isolation_id(&g, "tokio").unwrap();
		state.set_isolation(&g, IsolationMode::Full);
		assert_eq!(state, DrawState::full(&g));
	}

	proptest! {
		#[test]
		fn search_only_highlights_isolated_nodes(root in 0usize..5, term in "[a-z_]{0,3}") {
			let g = graph();
			let mut state = DrawState::full(&g);
			state.set_isolation(&g, IsolationMode::Node(root));
			let isolated = state.nodes_to_draw.clone();
			state.apply_search(&g, &term);

			prop_assert!(state.highlighted_nodes.is_subset(&isolated));
			prop_assert!(state.highlighted_nodes.is_disjoint(&state.nodes_to_draw));
			let union: BTreeSet<_> = state.nodes_to_draw.union(&state.highlighted_nodes).copied().collect();
			prop_assert_eq!(union, isolated);
		}
	}
}
