use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::CanvasCommand;
use super::render;
use super::state::{GraphCanvasState, Release};
use crate::components::animation::AnimationLoop;
use crate::data::persistence::LayoutStore;
use crate::data::Dataset;
use crate::selection::SelectionStore;
use crate::theme::ThemeMode;

type SharedState = Rc<RefCell<Option<GraphCanvasState>>>;

/// Wheel delta to zoom factor.
const WHEEL_SENSITIVITY: f64 = 0.0015;

/// Pannable, zoomable reaction map. Selection, theme and commands come from
/// context; positions and viewport are written to local storage as they
/// change.
#[component]
pub fn GraphCanvas(#[prop(into)] data: Signal<Option<Arc<Dataset>>>) -> impl IntoView {
	let selection = expect_context::<RwSignal<SelectionStore>>();
	let theme = expect_context::<RwSignal<ThemeMode>>();
	let commands = expect_context::<RwSignal<Option<CanvasCommand>>>();

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animation = StoredValue::new_local(None::<AnimationLoop>);

	let state_init = state.clone();
	Effect::new(move |_| {
		let dataset = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		animation.set_value(None);

		let Some(baseline) = dataset else {
			*state_init.borrow_mut() = None;
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			warn!("canvas 2d context unavailable");
			return;
		};
		let (w, h) = fit_canvas(&canvas);

		let store = LayoutStore::browser();
		let laid_out = store.load_layout(&baseline);
		let mut s = GraphCanvasState::new(&laid_out, store.load_viewport(), w, h);
		s.theme = theme.get_untracked();
		selection.with_untracked(|sel| {
			s.selection = sel.selection().clone();
			s.highlight = sel.highlight(&baseline);
		});
		debug!("graph canvas built with {} edges", s.edges.len());
		*state_init.borrow_mut() = Some(s);

		let state_anim = state_init.clone();
		animation.set_value(AnimationLoop::start(move |dt| {
			let mut guard = state_anim.borrow_mut();
			let Some(ref mut s) = *guard else {
				return;
			};
			let (w, h) = fit_canvas(&canvas);
			if w != s.width || h != s.height {
				s.resize(w, h);
			}
			if s.tick(dt) {
				LayoutStore::browser().save_positions(&baseline, &s.positions_by_id());
			}
			render::render(s, &ctx);
		}));
	});

	let state_view = state.clone();
	Effect::new(move |_| {
		let mode = theme.get();
		let (current, highlight) = selection.with(|sel| {
			let hl = data.with(|d| d.as_deref().map(|d| sel.highlight(d)).unwrap_or_default());
			(sel.selection().clone(), hl)
		});
		if let Some(ref mut s) = *state_view.borrow_mut() {
			s.theme = mode;
			s.selection = current;
			s.highlight = highlight;
		}
	});

	let state_cmd = state.clone();
	Effect::new(move |_| {
		let Some(command) = commands.get() else {
			return;
		};
		commands.set(None);
		let mut guard = state_cmd.borrow_mut();
		let Some(ref mut s) = *guard else {
			return;
		};
		let store = LayoutStore::browser();
		match command {
			CanvasCommand::Focus(id) => {
				if s.focus(&id) {
					store.save_viewport(&s.viewport());
				}
			}
			CanvasCommand::Relax => s.relax(),
			CanvasCommand::ResetLayout => {
				store.clear_layout();
				let Some(baseline) = data.get_untracked() else {
					return;
				};
				let mut fresh = GraphCanvasState::new(&baseline, None, s.width, s.height);
				fresh.theme = s.theme;
				fresh.selection = s.selection.clone();
				fresh.highlight = s.highlight.clone();
				store.save_viewport(&fresh.viewport());
				*s = fresh;
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let release = {
			let mut guard = state_mu.borrow_mut();
			let Some(ref mut s) = *guard else {
				return;
			};
			let release = s.pointer_up(x, y);
			let store = LayoutStore::browser();
			match release {
				Release::MovedNode => {
					if let Some(baseline) = data.get_untracked() {
						store.save_positions(&baseline, &s.positions_by_id());
					}
				}
				Release::Panned => store.save_viewport(&s.viewport()),
				_ => {}
			}
			release
		};
		match release {
			Release::ClickedNode(id) => selection.update(|sel| sel.select_node(id)),
			Release::ClickedEdge(id) => selection.update(|sel| sel.select_edge(id)),
			Release::ClickedBackground => selection.update(|sel| sel.clear()),
			_ => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut guard = state_ml.borrow_mut();
		let Some(ref mut s) = *guard else {
			return;
		};
		if s.drag.moved {
			if let Some(baseline) = data.get_untracked() {
				LayoutStore::browser().save_positions(&baseline, &s.positions_by_id());
			}
		}
		if s.pan.moved {
			LayoutStore::browser().save_viewport(&s.viewport());
		}
		s.cancel_pointer();
		s.hover = None;
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, (-ev.delta_y() * WHEEL_SENSITIVITY).exp());
			LayoutStore::browser().save_viewport(&s.viewport());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
		/>
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Match the backing store to the parent's size; returns the new size.
fn fit_canvas(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width().max(1) as u32, p.client_height().max(1) as u32))
		.unwrap_or((800, 600));
	if canvas.width() != w {
		canvas.set_width(w);
	}
	if canvas.height() != h {
		canvas.set_height(h);
	}
	(w as f64, h as f64)
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
