use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, WheelEvent,
};

use super::render;
use super::state::{CanvasState, ZOOM_STEP};
use crate::circuit::Diagram;

type SharedState = Rc<RefCell<Option<CanvasState>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: &str) {
	if let Some(canvas) = canvas_ref.get() {
		let _ = HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Interactive wiring diagram. Lays out `diagram` whenever it changes and
/// lets the user drag blocks, draw wires between pins, pan and zoom. The
/// canvas element is exposed through `canvas_ref` so callers can export it.
#[component]
pub fn CircuitCanvas(
	#[prop(into)] diagram: Signal<Option<Diagram>>,
	canvas_ref: NodeRef<leptos::html::Canvas>,
) -> impl IntoView {
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (state_init, animate_init, alive_init) = (state.clone(), animate.clone(), alive.clone());

	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				log::error!("canvas has no 2d context");
				return;
			}
		};

		let mut initial = CanvasState::new(w, h);
		if let Some(d) = diagram.get_untracked() {
			initial.load(&d);
		}
		*state_init.borrow_mut() = Some(initial);

		// Measured every frame: the container follows both the window and the
		// sidebar handle.
		let (state_anim, animate_inner, alive_anim) =
			(state_init.clone(), animate_init.clone(), alive_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				let (nw, nh) = parent_size(&canvas);
				if s.resize(nw, nh) {
					canvas.set_width(nw as u32);
					canvas.set_height(nh as u32);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_load = state.clone();
	Effect::new(move |_| {
		let current = diagram.get();
		if let Some(ref mut s) = *state_load.borrow_mut() {
			match current {
				Some(d) => {
					debug!("laying out {} nodes", d.nodes.len());
					s.load(&d);
				}
				None => s.load(&Diagram::default()),
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			let _ = canvas.focus();
		}
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let cursor = match *state_mm.borrow_mut() {
			Some(ref mut s) => {
				s.move_to(x, y);
				if s.wire.is_some() || s.hover.pin.is_some() {
					"crosshair"
				} else if s.drag.node.is_some() || s.pan.active {
					"grabbing"
				} else if s.hover.node.is_some() {
					"move"
				} else {
					"grab"
				}
			}
			None => "default",
		};
		set_cursor(canvas_ref, cursor);
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.release(x, y);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel();
			s.hover = Default::default();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.transform.zoom_at(x, y, factor);
		}
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		if let Some(ref mut s) = *state_kd.borrow_mut() {
			match ev.key().as_str() {
				"Delete" | "Backspace" => {
					ev.prevent_default();
					s.delete_selection();
				}
				"Escape" => s.cancel(),
				_ => {}
			}
		}
	};

	let (state_zi, state_zo, state_fit) = (state.clone(), state.clone(), state);
	let zoom_in = move |_| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			s.zoom_by(ZOOM_STEP);
		}
	};
	let zoom_out = move |_| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			s.zoom_by(1.0 / ZOOM_STEP);
		}
	};
	let fit_view = move |_| {
		if let Some(ref mut s) = *state_fit.borrow_mut() {
			s.fit_view();
		}
	};

	view! {
		<div class="circuit-canvas">
			<canvas
				node_ref=canvas_ref
				class="circuit-canvas__surface"
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:keydown=on_keydown
				style="display: block; cursor: grab; outline: none;"
			/>
			<div class="canvas-controls">
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Zoom out" on:click=zoom_out>"−"</button>
				<button title="Fit view" on:click=fit_view>"⤢"</button>
			</div>
		</div>
	}
}
