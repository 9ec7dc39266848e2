use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use crate::model::GraphData;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);
/// Longest simulation step after the tab was in the background.
const MAX_FRAME_SECS: f64 = 0.05;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Animation loop and resize listener of one canvas. Cloned into the frame
/// closure, so the loop keeps itself alive until [`CanvasLoop::stop`].
#[derive(Clone, Default)]
struct CanvasLoop {
	animate: SharedClosure,
	resize: SharedClosure,
	frame: Rc<Cell<Option<i32>>>,
}

impl CanvasLoop {
	fn is_running(&self) -> bool {
		self.animate.borrow().is_some()
	}

	fn request_frame(&self) {
		if let (Some(window), Some(cb)) = (web_sys::window(), self.animate.borrow().as_ref()) {
			self.frame
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}

	/// Starts the animation loop and the resize listener.
	fn start(&self, canvas: HtmlCanvasElement, state: SharedState) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("canvas has no 2d context");
			return;
		};

		let (state_resize, canvas_resize) = (state.clone(), canvas);
		*self.resize.borrow_mut() = Some(Closure::new(move || {
			let (w, h) = container_size(&canvas_resize);
			canvas_resize.set_width(w as u32);
			canvas_resize.set_height(h as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(w, h);
			}
		}));
		if let Some(ref cb) = *self.resize.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let this = self.clone();
		let mut last_frame = js_sys::Date::now();
		*self.animate.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, MAX_FRAME_SECS);
			last_frame = now;
			if let Some(ref mut s) = *state.borrow_mut() {
				s.tick(dt as f32);
				render::render(s, &ctx);
			}
			this.request_frame();
		}));
		self.request_frame();
	}

	/// Cancels the pending frame, detaches the listener and frees both
	/// closures, breaking the frame closure's reference to itself.
	fn stop(&self) {
		let frame = self.frame.take();
		let resize = self.resize.borrow_mut().take();
		let animate = self.animate.borrow_mut().take();
		if frame.is_none() && resize.is_none() {
			return;
		}
		if let Some(window) = web_sys::window() {
			if let Some(id) = frame {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = &resize {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		drop(animate);
		debug!("canvas loop stopped");
	}
}

/// Stops the loop when the owning component is disposed.
struct LoopGuard(CanvasLoop);

impl Drop for LoopGuard {
	fn drop(&mut self) {
		self.0.stop();
	}
}

/// Force-directed canvas that fills its parent element.
///
/// Every change of `data` drops the current simulation and builds a new one
/// from scratch.
#[component]
pub fn ForceGraphCanvas(#[prop(into)] data: Signal<GraphData>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let canvas_loop = CanvasLoop::default();
	let _guard = StoredValue::new_local(LoopGuard(canvas_loop.clone()));
	let state_init = state.clone();

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let previous = state_init.replace(Some(ForceGraphState::new(&graph, w, h)));
		match previous {
			Some(old) => info!(
				"replaced graph view ({} nodes) with {} nodes",
				old.node_count(),
				graph.nodes.len()
			),
			None => debug!("graph view created with {} nodes", graph.nodes.len()),
		}

		if !canvas_loop.is_running() {
			canvas_loop.start(canvas, state_init.clone());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			match s.node_at_position(x, y) {
				Some(idx) => s.begin_drag(idx, x, y),
				None => s.begin_pan(x, y),
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.is_dragging() {
				s.drag_to(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
				s.pan_to(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if let Some(id) = s.drag.node_idx.and_then(|idx| s.node_id(idx)) {
				debug!("pinned node {id}");
			}
			s.release_pointer();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.release_pointer();
			s.set_hover(None);
		}
	};

	let state_wh = state;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
