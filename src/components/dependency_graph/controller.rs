//! Selection, isolation tabs and search.
//!
//! [`AppState`] is the single owner of everything the user can change. Each
//! [`Command`] either applies completely or fails without touching state.

use log::{debug, info};

use super::draw_set::{DrawState, IsolationMode};
use super::error::{GraphError, Result};
use super::graph::{Graph, NodeIdx};
use super::isolate::isolate;

/// What a tab or the "full graph" tab points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IsolationTarget {
	Full,
	Node(String),
}

/// A user action.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
	/// Select a node by id and list its dependencies.
	Select(String),
	/// Isolate the selected node without opening a tab.
	Isolate,
	/// Isolate the selected node and pin it as a tab.
	IsolateSelected,
	/// Switch to an isolation, e.g. by clicking its tab.
	Activate(IsolationTarget),
	/// Close the tab of a node.
	CloseTab(String),
	/// Replace the search term.
	SetSearch(String),
	/// The viewport changed size.
	Resize { width: f64, height: f64 },
}

/// Everything the side panel shows, as plain strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelView {
	pub selected: Option<String>,
	pub dependencies: Vec<String>,
	pub tabs: Vec<String>,
	pub active_tab: Option<String>,
	pub full_graph: bool,
}

/// Selection and view state of one graph.
#[derive(Clone, Debug, Default)]
pub struct AppState {
	pub selected: Option<NodeIdx>,
	pub active: IsolationMode,
	/// Open tabs in opening order.
	pub tabs: Vec<NodeIdx>,
	pub search: String,
	pub draw: DrawState,
	/// Isolation of the selected node, for display only.
	pub dependencies: Vec<NodeIdx>,
}

impl AppState {
	pub fn new(graph: &Graph) -> Self {
		Self {
			draw: DrawState::full(graph),
			..Self::default()
		}
	}

	/// Apply one command. On error nothing has changed.
	pub fn apply(&mut self, graph: &Graph, command: Command) -> Result<()> {
		match command {
			Command::Select(id) => self.select(graph, &id),
			Command::Isolate => self.isolate(graph),
			Command::IsolateSelected => self.isolate_selected(graph),
			Command::Activate(target) => self.activate(graph, &target),
			Command::CloseTab(id) => self.close_tab(graph, &id),
			Command::SetSearch(term) => {
				self.set_search_term(graph, term);
				Ok(())
			}
			// Viewport size lives with the layout, not here.
			Command::Resize { .. } => Ok(()),
		}
	}

	pub fn select(&mut self, graph: &Graph, id: &str) -> Result<()> {
		let isolation = isolate(graph, id)?;
		self.selected = Some(isolation.root);
		self.dependencies = isolation.nodes;
		info!("Selected {id} ({} dependencies)", self.dependencies.len() - 1);
		Ok(())
	}

	pub fn isolate(&mut self, graph: &Graph) -> Result<()> {
		let node = self.selected.ok_or(GraphError::NoSelection)?;
		self.switch_to(graph, IsolationMode::Node(node));
		Ok(())
	}

	pub fn isolate_selected(&mut self, graph: &Graph) -> Result<()> {
		let node = self.selected.ok_or(GraphError::NoSelection)?;
		if !self.tabs.contains(&node) {
			info!("Opened tab {}", graph.node(node).id);
			self.tabs.push(node);
		}
		self.switch_to(graph, IsolationMode::Node(node));
		Ok(())
	}

	pub fn activate(&mut self, graph: &Graph, target: &IsolationTarget) -> Result<()> {
		let mode = match target {
			IsolationTarget::Full => IsolationMode::Full,
			IsolationTarget::Node(id) => IsolationMode::Node(graph.index_of(id)?),
		};
		self.switch_to(graph, mode);
		Ok(())
	}

	/// Close a tab. Closing the active tab goes back to the full graph;
	/// closing any other tab keeps the current view.
	pub fn close_tab(&mut self, graph: &Graph, id: &str) -> Result<()> {
		let node = graph.index_of(id)?;
		let Some(pos) = self.tabs.iter().position(|&tab| tab == node) else {
			debug!("No open tab for {id}");
			return Ok(());
		};
		self.tabs.remove(pos);
		info!("Closed tab {id}");
		if self.active == IsolationMode::Node(node) {
			self.switch_to(graph, IsolationMode::Full);
		}
		Ok(())
	}

	/// Store the term and rebuild the view from the active isolation.
	pub fn set_search_term(&mut self, graph: &Graph, term: String) {
		self.search = term;
		self.refresh(graph);
	}

	/// The active isolation if it has a tab.
	pub fn active_tab(&self) -> Option<NodeIdx> {
		match self.active {
			IsolationMode::Node(node) if self.tabs.contains(&node) => Some(node),
			_ => None,
		}
	}

	pub fn panel(&self, graph: &Graph) -> PanelView {
		let id = |node: NodeIdx| graph.node(node).id.clone();
		PanelView {
			selected: self.selected.map(id),
			dependencies: self.dependencies.iter().copied().map(id).collect(),
			tabs: self.tabs.iter().copied().map(id).collect(),
			active_tab: self.active_tab().map(id),
			full_graph: self.active == IsolationMode::Full,
		}
	}

	fn switch_to(&mut self, graph: &Graph, mode: IsolationMode) {
		self.active = mode;
		self.refresh(graph);
	}

	fn refresh(&mut self, graph: &Graph) {
		self.draw.set_isolation(graph, self.active);
		self.draw.apply_search(graph, &self.search);
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;

	// a -> b -> c, d -> a
	fn graph() -> Graph {
		Graph::from_json(
			r#"{
				"nodes": [
					{"id": "a", "size": 1},
					{"id": "b", "size": 1},
					{"id": "c", "size": 1},
					{"id": "d", "size": 1}
				],
				"links": [
					{"source": "a", "target": "b"},
					{"source": "b", "target": "c"},
					{"source": "d", "target": "a"}
				]
			}"#,
		)
		.unwrap()
	}

	fn set(items: &[usize]) -> BTreeSet<usize> {
		items.iter().copied().collect()
	}

	#[test]
	fn select_lists_dependencies_without_isolating() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::Select("b".into())).unwrap();
		assert_eq!(app.selected, Some(1));
		assert_eq!(app.dependencies, [1, 2]);
		assert_eq!(app.active, IsolationMode::Full);
		assert_eq!(app.draw, DrawState::full(&g));
	}

	#[test]
	fn isolate_without_selection_is_refused() {
		let g = graph();
		let mut app = AppState::new(&g);
		assert_eq!(
			app.apply(&g, Command::IsolateSelected),
			Err(GraphError::NoSelection)
		);
		assert_eq!(app.apply(&g, Command::Isolate), Err(GraphError::NoSelection));
		assert!(app.tabs.is_empty());
		assert_eq!(app.draw, DrawState::full(&g));
	}

	#[test]
	fn selecting_unknown_node_keeps_previous_selection() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::Select("a".into())).unwrap();
		assert!(app.apply(&g, Command::Select("zz".into())).is_err());
		assert_eq!(app.selected, Some(0));
		assert_eq!(app.dependencies, [0, 1, 2]);
	}

	#[test]
	fn isolate_selected_opens_one_tab_per_node() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::Select("b".into())).unwrap();
		app.apply(&g, Command::IsolateSelected).unwrap();
		app.apply(&g, Command::Activate(IsolationTarget::Full)).unwrap();
		app.apply(&g, Command::IsolateSelected).unwrap();

		assert_eq!(app.tabs, [1]);
		assert_eq!(app.active_tab(), Some(1));
		assert_eq!(app.draw.nodes_to_draw, set(&[1, 2]));
		assert_eq!(app.draw.links_to_draw, set(&[1]));
	}

	#[test]
	fn isolate_in_place_opens_no_tab() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::Select("a".into())).unwrap();
		app.apply(&g, Command::Isolate).unwrap();
		assert!(app.tabs.is_empty());
		assert_eq!(app.active, IsolationMode::Node(0));
		assert_eq!(app.active_tab(), None);
		assert_eq!(app.draw.nodes_to_draw, set(&[0, 1, 2]));
	}

	#[test]
	fn closing_only_active_tab_returns_to_full_graph() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::Select("b".into())).unwrap();
		app.apply(&g, Command::IsolateSelected).unwrap();
		app.apply(&g, Command::CloseTab("b".into())).unwrap();

		assert!(app.tabs.is_empty());
		assert_eq!(app.active, IsolationMode::Full);
		assert_eq!(app.draw, DrawState::full(&g));
	}

	#[test]
	fn closing_inactive_tab_keeps_active_view() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::Select("a".into())).unwrap();
		app.apply(&g, Command::IsolateSelected).unwrap();
		app.apply(&g, Command::Select("b".into())).unwrap();
		app.apply(&g, Command::IsolateSelected).unwrap();
		app.apply(&g, Command::CloseTab("a".into())).unwrap();

		assert_eq!(app.tabs, [1]);
		assert_eq!(app.active, IsolationMode::Node(1));
		assert_eq!(app.draw.nodes_to_draw, set(&[1, 2]));
	}

	#[test]
	fn closing_a_tab_that_is_not_open_is_a_no_op() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::CloseTab("c".into())).unwrap();
		assert_eq!(app.draw, DrawState::full(&g));
		assert_eq!(
			app.apply(&g, Command::CloseTab("zz".into())),
			Err(GraphError::NotFound("zz".into()))
		);
	}

	#[test]
	fn search_composes_with_active_isolation() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::Select("b".into())).unwrap();
		app.apply(&g, Command::IsolateSelected).unwrap();
		app.apply(&g, Command::SetSearch("d".into())).unwrap();

		// d exists but is outside the isolation of b.
		assert!(app.draw.highlighted_nodes.is_empty());
		assert_eq!(app.draw.nodes_to_draw, set(&[1, 2]));

		app.apply(&g, Command::SetSearch("c".into())).unwrap();
		assert_eq!(app.draw.highlighted_nodes, set(&[2]));
		assert_eq!(app.draw.nodes_to_draw, set(&[1]));
	}

	#[test]
	fn search_survives_isolation_changes() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::SetSearch("a".into())).unwrap();
		app.apply(&g, Command::Select("d".into())).unwrap();
		app.apply(&g, Command::IsolateSelected).unwrap();
		assert_eq!(app.draw.highlighted_nodes, set(&[0]));

		app.apply(&g, Command::CloseTab("d".into())).unwrap();
		assert_eq!(app.draw.highlighted_nodes, set(&[0]));
		assert_eq!(app.draw.nodes_to_draw, set(&[1, 2, 3]));
	}

	#[test]
	fn activating_unknown_node_is_refused() {
		let g = graph();
		let mut app = AppState::new(&g);
		let err = app
			.apply(&g, Command::Activate(IsolationTarget::Node("zz".into())))
			.unwrap_err();
		assert_eq!(err, GraphError::NotFound("zz".into()));
		assert_eq!(app.active, IsolationMode::Full);
	}

	#[test]
	fn panel_reports_ids() {
		let g = graph();
		let mut app = AppState::new(&g);
		app.apply(&g, Command::Select("a".into())).unwrap();
		app.apply(&g, Command::IsolateSelected).unwrap();
		assert_eq!(
			app.panel(&g),
			PanelView {
				selected: Some("a".into()),
				dependencies: vec!["a".into(), "b".into(), "c".into()],
				tabs: vec!["a".into()],
				active_tab: Some("a".into()),
				full_graph: false,
			}
		);
	}
}
