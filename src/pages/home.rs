use leptos::either::Either;
use leptos::prelude::*;

use crate::components::dependency_graph::{DependencyGraphCanvas, load_graph};

/// Graph document served next to the app.
const GRAPH_URL: &str = "results.json";

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// Fetched once; a load error replaces the whole graph UI.
	let graph = LocalResource::new(|| load_graph(GRAPH_URL));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				{move || match graph.get() {
					None => Either::Left(view! { <p class="graph-status">"Loading dependency graph..."</p> }),
					Some(result) => Either::Right(
						result.map(|graph| view! { <DependencyGraphCanvas graph=graph fullscreen=true /> }),
					),
				}}
				<div class="graph-overlay">
					<h1>"Dependency Graph"</h1>
					<p class="subtitle">
						"Click a package to list its dependencies. Isolate it to draw only what it depends on."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
