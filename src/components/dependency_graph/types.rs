use serde::Deserialize;

use super::error::Result;

/// A package entry of the graph document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	pub id: String,
	/// Size metric, drawn on a log scale.
	pub size: f64,
}

/// `source` depends on `target`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

/// The graph document as served next to the app.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse a graph document from JSON text.
	pub fn from_json(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}
}
