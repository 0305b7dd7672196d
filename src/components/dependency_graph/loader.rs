use log::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::{GraphError, Result};
use super::graph::Graph;

fn js_error(err: JsValue) -> GraphError {
	let message = err
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.or_else(|| err.as_string())
		.unwrap_or_else(|| format!("{err:?}"));
	GraphError::Load(message)
}

async fn fetch_text(url: &str) -> Result<String> {
	let window = web_sys::window().ok_or_else(|| GraphError::Load("no window".into()))?;
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(js_error)?
		.dyn_into()
		.map_err(js_error)?;
	if !response.ok() {
		return Err(GraphError::Load(format!(
			"{url}: HTTP {} {}",
			response.status(),
			response.status_text()
		)));
	}
	JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?
		.as_string()
		.ok_or_else(|| GraphError::Load(format!("{url}: response body is not text")))
}

/// Fetch and parse the graph document at `url`.
pub async fn load_graph(url: &str) -> Result<Graph> {
	info!("Loading graph from {url}");
	let graph = fetch_text(url).await.and_then(|text| Graph::from_json(&text));
	if let Err(err) = &graph {
		error!("{err}");
	}
	graph
}
