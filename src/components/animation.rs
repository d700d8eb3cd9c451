//! `requestAnimationFrame` loop shared by the two canvases.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;

/// Step handed to the first frame, and the cap for every later one so a
/// backgrounded tab does not come back with a huge jump.
const FIRST_DT: f64 = 1.0 / 60.0;
const MAX_DT: f64 = 0.05;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Running loop. Dropping it cancels the pending frame and frees the
/// callback, so keep it in a `StoredValue` owned by the component.
pub struct AnimationLoop {
	callback: FrameCallback,
	frame_id: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
	/// Call `frame(dt_seconds)` once per display frame until dropped.
	pub fn start(mut frame: impl FnMut(f64) + 'static) -> Option<Self> {
		let window = web_sys::window()?;
		let callback: FrameCallback = Rc::new(RefCell::new(None));
		let frame_id = Rc::new(Cell::new(None));

		let (weak, id_inner) = (Rc::downgrade(&callback), frame_id.clone());
		let mut last: Option<f64> = None;
		*callback.borrow_mut() = Some(Closure::new(move |now: f64| {
			let dt = last.map_or(FIRST_DT, |t| ((now - t) / 1000.0).clamp(0.0, MAX_DT));
			last = Some(now);
			frame(dt);

			let Some(cb) = weak.upgrade() else {
				return;
			};
			let cb = cb.borrow();
			if let (Some(cb), Some(win)) = (cb.as_ref(), web_sys::window()) {
				id_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));

		let first = match callback.borrow().as_ref() {
			Some(cb) => window.request_animation_frame(cb.as_ref().unchecked_ref()),
			None => return None,
		};
		match first {
			Ok(id) => frame_id.set(Some(id)),
			Err(e) => {
				warn!("requestAnimationFrame failed: {:?}", e);
				return None;
			}
		}
		Some(Self { callback, frame_id })
	}
}

impl Drop for AnimationLoop {
	fn drop(&mut self) {
		if let (Some(id), Some(win)) = (self.frame_id.take(), web_sys::window()) {
			let _ = win.cancel_animation_frame(id);
		}
		self.callback.borrow_mut().take();
	}
}
