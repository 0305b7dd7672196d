use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::controller::{AppState, Command, PanelView};
use super::error::Result;
use super::graph::{Graph, NodeIdx};
use super::render::{self, Frame, Palette};

/// Minimum pick distance around a node, in graph space.
pub const HIT_RADIUS: f64 = 8.0;
/// The layout stops ticking once alpha cools below this.
pub const ALPHA_MIN: f64 = 0.001;
/// Cools alpha from 1 to [`ALPHA_MIN`] in about 300 ticks.
pub const ALPHA_DECAY: f64 = 0.0228;
/// Alpha target while a node is dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Per-node payload carried through the layout engine.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub node: NodeIdx,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// One loaded graph with its layout, view and selection state.
///
/// All user actions go through [`Session::dispatch`].
pub struct Session {
	pub graph: Graph,
	pub app: AppState,
	pub layout: ForceGraph<NodeInfo, ()>,
	/// Layout position of every node, refreshed on each tick.
	pub positions: Vec<(f64, f64)>,
	pub palette: Palette,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub alpha: f64,
	pub alpha_target: f64,
	layout_nodes: Vec<DefaultNodeIdx>,
	redraw_requested: bool,
}

impl Session {
	pub fn new(graph: Graph, width: f64, height: f64) -> Self {
		let mut layout = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let count = graph.nodes().len().max(1);
		let ring = 100.0 + 4.0 * (count as f64).sqrt();
		let mut positions = Vec::with_capacity(count);
		let mut layout_nodes = Vec::with_capacity(count);

		for i in 0..graph.nodes().len() {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			let (x, y) = (ring * angle.cos(), ring * angle.sin());
			positions.push((x, y));
			layout_nodes.push(layout.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo { node: i },
			}));
		}

		for link in graph.links() {
			layout.add_edge(
				layout_nodes[link.source],
				layout_nodes[link.target],
				EdgeData::default(),
			);
		}

		Self {
			app: AppState::new(&graph),
			graph,
			layout,
			positions,
			layout_nodes,
			palette: Palette::default(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
			alpha: 1.0,
			alpha_target: 0.0,
			redraw_requested: true,
		}
	}

	/// Apply a user action and request a redraw. On error nothing changes.
	pub fn dispatch(&mut self, command: Command) -> Result<()> {
		debug!("Dispatch {:?}", command);
		if let Command::Resize { width, height } = command {
			self.resize(width, height);
		} else {
			self.app.apply(&self.graph, command)?;
		}
		self.request_redraw();
		self.restart();
		Ok(())
	}

	pub fn panel(&self) -> PanelView {
		self.app.panel(&self.graph)
	}

	/// Paint on the next frame even if the layout is at rest.
	pub fn request_redraw(&mut self) {
		self.redraw_requested = true;
	}

	/// Consume a pending redraw request.
	pub fn take_redraw(&mut self) -> bool {
		std::mem::take(&mut self.redraw_requested)
	}

	pub fn frame(&self) -> Frame {
		render::frame(&self.graph, &self.app, &self.positions, &self.palette)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// The nearest drawn node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let draw = &self.app.draw;
		draw.nodes_to_draw
			.iter()
			.chain(&draw.highlighted_nodes)
			.map(|&node| {
				let (x, y) = self.positions[node];
				let dist = ((x - gx).powi(2) + (y - gy).powi(2)).sqrt();
				(node, dist)
			})
			.filter(|&(node, dist)| dist < self.graph.node(node).radius().max(HIT_RADIUS))
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(node, _)| node)
	}

	/// Select a node and pin it under the pointer.
	pub fn begin_drag(&mut self, node: NodeIdx, sx: f64, sy: f64) -> Result<()> {
		let id = self.graph.node(node).id.clone();
		self.dispatch(Command::Select(id))?;
		let (x, y) = self.positions[node];
		self.drag = DragState {
			active: true,
			node: Some(node),
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
		};
		self.pin(node, Some((x, y)));
		self.alpha_target = DRAG_ALPHA_TARGET;
		self.restart();
		Ok(())
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(node) = self.drag.node else {
			return;
		};
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		let pos = (self.drag.node_start_x + dx, self.drag.node_start_y + dy);
		self.positions[node] = pos;
		self.pin(node, Some(pos));
		self.request_redraw();
	}

	/// Release the dragged node back to the simulation.
	pub fn end_drag(&mut self) {
		if let Some(node) = self.drag.node.take() {
			self.pin(node, None);
			self.alpha_target = 0.0;
		}
		self.drag.active = false;
		self.pan.active = false;
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			self.request_redraw();
		}
	}

	/// Zoom by `factor` keeping the screen point under the cursor fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.request_redraw();
	}

	/// Keep the layout ticking without reheating it.
	pub fn restart(&mut self) {
		self.animation_running = true;
	}

	/// Advance the layout, copy its positions out and cool alpha.
	pub fn tick(&mut self, dt: f32) {
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		if self.alpha < ALPHA_MIN {
			self.animation_running = false;
		}
		self.layout.update(dt);
		let positions = &mut self.positions;
		self.layout.visit_nodes(|node| {
			positions[node.data.user_data.node] = (node.x() as f64, node.y() as f64);
		});
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.restart();
	}

	/// Anchor a node at `pos`, or release it with `None`.
	fn pin(&mut self, node: NodeIdx, pos: Option<(f64, f64)>) {
		let target = self.layout_nodes[node];
		self.layout.visit_nodes_mut(|n| {
			if n.index() == target {
				match pos {
					Some((x, y)) => {
						n.data.x = x as f32;
						n.data.y = y as f32;
						n.data.is_anchor = true;
					}
					None => n.data.is_anchor = false,
				}
			}
		});
	}
}
