use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::controller::{Command, IsolationTarget, PanelView};
use super::graph::Graph;
use super::render;
use super::state::Session;

type SharedSession = Rc<RefCell<Option<Session>>>;

/// Dispatch a command and publish the new panel state. Refused commands
/// are logged and otherwise ignored.
fn run_command(session: &SharedSession, panel: RwSignal<PanelView>, command: Command) {
	if let Some(ref mut s) = *session.borrow_mut() {
		match s.dispatch(command) {
			Ok(()) => panel.set(s.panel()),
			Err(err) => warn!("Ignored action: {err}"),
		}
	}
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> (f64, f64) {
	let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

#[component]
pub fn DependencyGraphCanvas(
	graph: Graph,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let panel = RwSignal::new(PanelView::default());
	let state: SharedSession = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		let session = Session::new(graph.clone(), w, h);
		panel.set(session.panel());
		*state_init.borrow_mut() = Some(session);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				run_command(
					&state_resize,
					panel,
					Command::Resize {
						width: nw,
						height: nh,
					},
				);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				let running = s.animation_running;
				if running {
					s.tick(0.016);
				}
				if s.take_redraw() || running {
					let background = s.palette.background;
					render::paint(&s.frame(), &ctx, &s.transform, s.width, s.height, background);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = canvas_point(canvas_ref, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			match s.node_at_position(x, y) {
				Some(node) => match s.begin_drag(node, x, y) {
					Ok(()) => panel.set(s.panel()),
					Err(err) => warn!("Ignored drag: {err}"),
				},
				None => s.begin_pan(x, y),
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = canvas_point(canvas_ref, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else {
				s.pan_to(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_drag();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_drag();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = canvas_point(canvas_ref, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	// The panel is rebuilt inside reactive closures, which only accept
	// thread-safe captures; the session stays thread-local behind this handle.
	let commands = StoredValue::new_local(state);
	let send = move |command: Command| {
		commands.with_value(|session| run_command(session, panel, command));
	};

	view! {
		<div class="dependency-graph" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="dependency-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<aside
				class="graph-panel"
				style="position: absolute; top: 0; right: 0; width: 280px; max-height: 100%; overflow-y: auto; padding: 12px; background: rgba(255, 255, 255, 0.9);"
			>
				<input
					type="search"
					class="graph-search"
					placeholder="Search packages"
					on:input=move |ev| send(Command::SetSearch(event_target_value(&ev)))
				/>
				<h2 class="node-name">
					{move || panel.with(|p| p.selected.clone().unwrap_or_default())}
				</h2>
				<button
					type="button"
					prop:disabled=move || panel.with(|p| p.selected.is_none())
					on:click=move |_| send(Command::Isolate)
				>
					"Isolate"
				</button>
				<button
					type="button"
					prop:disabled=move || panel.with(|p| p.selected.is_none())
					on:click=move |_| send(Command::IsolateSelected)
				>
					"Isolate & pin"
				</button>
				<ul class="graph-tabs">
					<li
						class="graph-tab"
						class:active=move || panel.with(|p| p.full_graph)
						on:click=move |_| send(Command::Activate(IsolationTarget::Full))
					>
						"Full graph"
					</li>
					{move || {
						let current = panel.get();
						let active = current.active_tab;
						current.tabs
							.into_iter()
							.map(|tab| {
								let is_active = active.as_deref() == Some(tab.as_str());
								let (activate_id, close_id) = (tab.clone(), tab.clone());
								view! {
									<li
										class="graph-tab"
										class:active=is_active
										on:click=move |_| {
											send(
												Command::Activate(
													IsolationTarget::Node(activate_id.clone()),
												),
											)
										}
									>
										{tab}
										<button
											class="close"
											type="button"
											on:click=move |ev: MouseEvent| {
												ev.stop_propagation();
												send(Command::CloseTab(close_id.clone()));
											}
										>
											"×"
										</button>
									</li>
								}
							})
							.collect_view()
					}}
				</ul>
				<ul class="dependency-list">
					{move || {
						panel
							.with(|p| p.dependencies.clone())
							.into_iter()
							.map(|dep| view! { <li class="dependency">{dep}</li> })
							.collect_view()
					}}
				</ul>
			</aside>
		</div>
	}
}
