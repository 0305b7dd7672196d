use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::controller::AppState;
use super::graph::{Graph, NodeIdx};
use super::state::ViewTransform;

/// Smallest radius a node is painted with.
pub const MIN_NODE_RADIUS: f64 = 1.0;

/// Colors and label font.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub background: &'static str,
	pub link: &'static str,
	pub node: &'static str,
	pub highlighted: &'static str,
	pub selected: &'static str,
	pub label_font: &'static str,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			background: "#FFFFFF",
			link: "#C6E8FA",
			node: "#3C9BCC",
			highlighted: "#FF8D64",
			selected: "#CC3C49",
			label_font: "20px Helvetica Neue",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
	pub x: f64,
	pub y: f64,
	pub r: f64,
}

/// One paint operation, in graph coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	/// Stroke all segments as one path.
	Links {
		color: &'static str,
		segments: Vec<((f64, f64), (f64, f64))>,
	},
	/// Fill all circles as one path.
	Nodes {
		color: &'static str,
		circles: Vec<Circle>,
	},
	Label {
		color: &'static str,
		font: &'static str,
		text: String,
		x: f64,
		y: f64,
	},
}

/// Paint operations for one frame, back to front.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	pub commands: Vec<DrawCommand>,
}

/// Build the frame for the current draw sets: links, plain nodes,
/// highlighted nodes, then the selected node and its label on top.
pub fn frame(graph: &Graph, app: &AppState, positions: &[(f64, f64)], palette: &Palette) -> Frame {
	let circle = |node: NodeIdx| {
		let (x, y) = positions[node];
		Circle {
			x,
			y,
			r: graph.node(node).radius().max(MIN_NODE_RADIUS),
		}
	};
	let draw = &app.draw;
	let mut commands = vec![
		DrawCommand::Links {
			color: palette.link,
			segments: draw
				.links_to_draw
				.iter()
				.map(|&link| {
					let link = graph.link(link);
					(positions[link.source], positions[link.target])
				})
				.collect(),
		},
		DrawCommand::Nodes {
			color: palette.node,
			circles: draw.nodes_to_draw.iter().copied().map(circle).collect(),
		},
		DrawCommand::Nodes {
			color: palette.highlighted,
			circles: draw.highlighted_nodes.iter().copied().map(circle).collect(),
		},
	];

	if let Some(node) = app.selected {
		let c = circle(node);
		commands.push(DrawCommand::Nodes {
			color: palette.selected,
			circles: vec![c],
		});
		commands.push(DrawCommand::Label {
			color: palette.selected,
			font: palette.label_font,
			text: graph.node(node).id.clone(),
			x: c.x + 15.0,
			y: c.y + 5.0,
		});
	}

	Frame { commands }
}

pub fn paint(
	frame: &Frame,
	ctx: &CanvasRenderingContext2d,
	transform: &ViewTransform,
	width: f64,
	height: f64,
	background: &str,
) {
	ctx.set_fill_style_str(background);
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);

	for command in &frame.commands {
		match command {
			DrawCommand::Links { color, segments } => {
				ctx.begin_path();
				for &((x1, y1), (x2, y2)) in segments {
					ctx.move_to(x1, y1);
					ctx.line_to(x2, y2);
				}
				ctx.set_stroke_style_str(color);
				ctx.set_line_width(1.0 / transform.k);
				ctx.stroke();
			}
			DrawCommand::Nodes { color, circles } => {
				ctx.begin_path();
				for c in circles {
					ctx.move_to(c.x + c.r, c.y);
					let _ = ctx.arc(c.x, c.y, c.r, 0.0, 2.0 * PI);
				}
				ctx.set_fill_style_str(color);
				ctx.fill();
			}
			DrawCommand::Label {
				color,
				font,
				text,
				x,
				y,
			} => {
				ctx.set_fill_style_str(color);
				ctx.set_font(font);
				let _ = ctx.fill_text(text, *x, *y);
			}
		}
	}

	ctx.restore();
}
