use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent};

use super::render;
use super::state::{GestureTracker, ViewState};
use crate::chem::conformer::build_model;
use crate::components::animation::AnimationLoop;
use crate::theme::ThemeMode;

#[derive(Default)]
struct Viewer {
	view: ViewState,
	gesture: GestureTracker,
	width: f64,
	height: f64,
}

/// Spinning pseudo-3D view of one compound. Drag rotates, pinch or wheel
/// zooms, a double tap or double click resets.
#[component]
pub fn ConformerViewer(
	#[prop(into)] smiles: Signal<String>,
	#[prop(default = 320.0)] size: f64,
) -> impl IntoView {
	let theme = expect_context::<RwSignal<ThemeMode>>();
	let model = Memo::new(move |_| build_model(smiles.get().trim()));
	let failed = Memo::new(move |_| model.with(|m| m.as_ref().err().map(|e| e.to_string())));

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let viewer = Rc::new(RefCell::new(Viewer::default()));
	let animation = StoredValue::new_local(None::<AnimationLoop>);

	let viewer_init = viewer.clone();
	Effect::new(move |_| {
		animation.set_value(None);
		let Ok(built) = model.get() else {
			return;
		};
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("conformer canvas has no 2d context");
			return;
		};
		canvas.set_width(size as u32);
		canvas.set_height(size as u32);
		debug!("conformer model: {} atoms, {} bonds", built.atoms.len(), built.bonds.len());

		{
			let mut v = viewer_init.borrow_mut();
			v.view.reset();
			v.gesture.clear();
			v.width = size;
			v.height = size;
		}

		let viewer_anim = viewer_init.clone();
		animation.set_value(AnimationLoop::start(move |dt| {
			let mut v = viewer_anim.borrow_mut();
			if !v.gesture.is_active() {
				v.view.auto_rotate(dt);
			}
			let tokens = theme.try_get_untracked().unwrap_or_default().tokens();
			render::render(&built, &v.view, tokens, &ctx, v.width, v.height);
		}));
	});

	let viewer_down = viewer.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(canvas) = canvas_ref.get_untracked() {
			let _ = canvas.set_pointer_capture(ev.pointer_id());
		}
		let mut guard = viewer_down.borrow_mut();
		let v = &mut *guard;
		v.gesture.down(ev.pointer_id(), x, y, ev.time_stamp(), &mut v.view);
	};

	let viewer_move = viewer.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = viewer_move.borrow_mut();
		let v = &mut *guard;
		v.gesture.moved(ev.pointer_id(), x, y, &mut v.view, v.width, v.height);
	};

	let viewer_up = viewer.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let mut v = viewer_up.borrow_mut();
		let view = v.view;
		v.gesture.up(ev.pointer_id(), ev.time_stamp(), &view);
	};
	let on_pointercancel = on_pointerup.clone();

	let viewer_wheel = viewer.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		viewer_wheel.borrow_mut().view.wheel(ev.delta_y());
	};

	view! {
		<div class="conformer-viewer">
			{move || {
				failed
					.get()
					.map(|message| {
						view! { <p class="conformer-error">"3D view unavailable: " {message}</p> }
					})
			}}
			<canvas
				node_ref=canvas_ref
				class="conformer-canvas"
				style:width=format!("{}px", size)
				style:height=format!("{}px", size)
				style:display=move || if failed.get().is_some() { "none" } else { "block" }
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerup=on_pointerup
				on:pointercancel=on_pointercancel
				on:wheel=on_wheel
			/>
			<p class="conformer-hint">"Drag to rotate, pinch or scroll to zoom, double-tap to reset"</p>
		</div>
	}
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
