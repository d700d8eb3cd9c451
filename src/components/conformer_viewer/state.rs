use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

pub const DEFAULT_ROTATION: [f64; 3] = [-0.35, 0.5, 0.0];
pub const DEFAULT_SCALE: f64 = 1.0;
pub const MIN_SCALE: f64 = 0.4;
pub const MAX_SCALE: f64 = 4.0;
/// Pan is bounded to this fraction of the canvas size on each axis.
pub const PAN_LIMIT_RATIO: f64 = 0.5;
/// Radians per second about Y while idle.
pub const AUTO_ROTATE_SPEED: f64 = 0.5;
/// Radians per pixel of drag.
const DRAG_SENSITIVITY: f64 = 0.01;
const WHEEL_SENSITIVITY: f64 = 0.0015;
/// Two taps closer than this in time (ms) and space (px) reset the view.
const DOUBLE_TAP_MS: f64 = 300.0;
const TAP_SLOP_PX: f64 = 10.0;

/// Rotation, zoom and pan of the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
	pub rotation: [f64; 3],
	pub scale: f64,
	pub pan: (f64, f64),
}

impl Default for ViewState {
	fn default() -> Self {
		Self {
			rotation: DEFAULT_ROTATION,
			scale: DEFAULT_SCALE,
			pan: (0.0, 0.0),
		}
	}
}

impl ViewState {
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn auto_rotate(&mut self, dt: f64) {
		self.rotation[1] = (self.rotation[1] + AUTO_ROTATE_SPEED * dt) % std::f64::consts::TAU;
	}

	/// Yaw by `dx` and pitch by `dy`, both in radians. Pitch stops at the poles.
	pub fn rotate_by(&mut self, dx: f64, dy: f64) {
		self.rotation[1] += dx;
		self.rotation[0] = (self.rotation[0] + dy).clamp(-FRAC_PI_2, FRAC_PI_2);
	}

	pub fn set_scale(&mut self, scale: f64) {
		self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
	}

	pub fn set_pan(&mut self, x: f64, y: f64, width: f64, height: f64) {
		let (lx, ly) = (width * PAN_LIMIT_RATIO, height * PAN_LIMIT_RATIO);
		self.pan = (x.clamp(-lx, lx), y.clamp(-ly, ly));
	}

	pub fn wheel(&mut self, delta_y: f64) {
		self.set_scale(self.scale * (-delta_y * WHEEL_SENSITIVITY).exp());
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pinch {
	distance: f64,
	center: (f64, f64),
	scale: f64,
	pan: (f64, f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Tap {
	at: (f64, f64),
	time: f64,
}

/// Active pointers keyed by pointer id. One pointer rotates; two pinch; a
/// quick second tap resets.
#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
	pointers: HashMap<i32, (f64, f64)>,
	pinch: Option<Pinch>,
	/// Pointer and start point of a gesture that may still end as a tap.
	tap_start: Option<(i32, (f64, f64))>,
	last_tap: Option<Tap>,
}

impl GestureTracker {
	pub fn is_active(&self) -> bool {
		!self.pointers.is_empty()
	}

	/// `time` is the event timestamp in milliseconds.
	pub fn down(&mut self, id: i32, x: f64, y: f64, time: f64, view: &mut ViewState) {
		if self.pointers.is_empty() {
			let double = self
				.last_tap
				.take()
				.is_some_and(|tap| time - tap.time <= DOUBLE_TAP_MS && distance(tap.at, (x, y)) <= TAP_SLOP_PX);
			if double {
				view.reset();
				self.tap_start = None;
			} else {
				self.tap_start = Some((id, (x, y)));
			}
		} else {
			self.tap_start = None;
			self.last_tap = None;
		}
		self.pointers.insert(id, (x, y));
		self.pinch = self.two_points().map(|(a, b)| Pinch {
			distance: distance(a, b),
			center: midpoint(a, b),
			scale: view.scale,
			pan: view.pan,
		});
	}

	pub fn moved(&mut self, id: i32, x: f64, y: f64, view: &mut ViewState, width: f64, height: f64) {
		let Some(prev) = self.pointers.get_mut(&id).map(|p| std::mem::replace(p, (x, y))) else {
			return;
		};
		match (self.pointers.len(), self.pinch) {
			(1, _) => view.rotate_by((x - prev.0) * DRAG_SENSITIVITY, (y - prev.1) * DRAG_SENSITIVITY),
			(2, Some(start)) => {
				if let Some((a, b)) = self.two_points() {
					if start.distance > 1e-6 {
						view.set_scale(start.scale * distance(a, b) / start.distance);
					}
					let c = midpoint(a, b);
					view.set_pan(
						start.pan.0 + c.0 - start.center.0,
						start.pan.1 + c.1 - start.center.1,
						width,
						height,
					);
				}
			}
			_ => {}
		}
	}

	pub fn up(&mut self, id: i32, time: f64, view: &ViewState) {
		let Some(at) = self.pointers.remove(&id) else {
			return;
		};
		if let Some((tap_id, start)) = self.tap_start.take() {
			if tap_id == id && distance(start, at) <= TAP_SLOP_PX {
				self.last_tap = Some(Tap { at, time });
			}
		}
		self.pinch = self.two_points().map(|(a, b)| Pinch {
			distance: distance(a, b),
			center: midpoint(a, b),
			scale: view.scale,
			pan: view.pan,
		});
	}

	pub fn clear(&mut self) {
		self.pointers.clear();
		self.pinch = None;
		self.tap_start = None;
		self.last_tap = None;
	}

	fn two_points(&self) -> Option<((f64, f64), (f64, f64))> {
		if self.pointers.len() != 2 {
			return None;
		}
		let mut it = self.pointers.values();
		Some((*it.next()?, *it.next()?))
	}
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	(a.0 - b.0).hypot(a.1 - b.1)
}

fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
	((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reset_restores_exact_defaults() {
		let mut view = ViewState::default();
		view.rotate_by(1.3, -0.9);
		view.set_scale(3.3);
		view.set_pan(40.0, -20.0, 300.0, 300.0);
		view.auto_rotate(2.0);
		view.reset();
		assert_eq!(view.rotation, DEFAULT_ROTATION);
		assert_eq!(view.scale, DEFAULT_SCALE);
		assert_eq!(view.pan, (0.0, 0.0));
	}

	#[test]
	fn pitch_is_clamped_to_poles() {
		let mut view = ViewState::default();
		view.rotate_by(0.0, 100.0);
		assert_eq!(view.rotation[0], FRAC_PI_2);
		view.rotate_by(0.0, -100.0);
		assert_eq!(view.rotation[0], -FRAC_PI_2);
	}

	#[test]
	fn pinch_scale_is_clamped() {
		let mut view = ViewState::default();
		let mut g = GestureTracker::default();
		g.down(1, 100.0, 100.0, 0.0, &mut view);
		g.down(2, 110.0, 100.0, 0.0, &mut view);
		g.moved(2, 10_000.0, 100.0, &mut view, 300.0, 300.0);
		assert_eq!(view.scale, MAX_SCALE);
		g.moved(2, 100.5, 100.0, &mut view, 300.0, 300.0);
		assert_eq!(view.scale, MIN_SCALE);
	}

	#[test]
	fn pinch_scales_proportionally_and_pans_with_centre() {
		let mut view = ViewState::default();
		let mut g = GestureTracker::default();
		g.down(1, 100.0, 100.0, 0.0, &mut view);
		g.down(2, 200.0, 100.0, 0.0, &mut view);
		g.moved(2, 250.0, 100.0, &mut view, 400.0, 400.0);
		assert!((view.scale - 1.5).abs() < 1e-9);
		assert!((view.pan.0 - 25.0).abs() < 1e-9);
		assert_eq!(view.pan.1, 0.0);
	}

	#[test]
	fn pan_is_bounded_by_size() {
		let mut view = ViewState::default();
		view.set_pan(1000.0, -1000.0, 200.0, 100.0);
		assert_eq!(view.pan, (100.0, -50.0));
	}

	#[test]
	fn wheel_scale_is_clamped() {
		let mut view = ViewState::default();
		for _ in 0..50 {
			view.wheel(-500.0);
		}
		assert_eq!(view.scale, MAX_SCALE);
		for _ in 0..50 {
			view.wheel(500.0);
		}
		assert_eq!(view.scale, MIN_SCALE);
	}

	#[test]
	fn single_pointer_rotates_and_gesture_ends_on_release() {
		let mut view = ViewState::default();
		let mut g = GestureTracker::default();
		g.down(7, 50.0, 50.0, 0.0, &mut view);
		assert!(g.is_active());
		g.moved(7, 60.0, 50.0, &mut view, 300.0, 300.0);
		assert!((view.rotation[1] - (DEFAULT_ROTATION[1] + 0.1)).abs() < 1e-9);
		g.up(7, 200.0, &view);
		assert!(!g.is_active());
	}

	#[test]
	fn double_tap_resets_view() {
		let mut view = ViewState::default();
		let mut g = GestureTracker::default();
		view.set_scale(2.5);
		view.rotate_by(0.8, 0.4);
		g.down(1, 80.0, 80.0, 1000.0, &mut view);
		g.up(1, 1080.0, &view);
		g.down(2, 83.0, 78.0, 1250.0, &mut view);
		assert_eq!(view, ViewState::default());
		g.up(2, 1300.0, &view);

		// A third tap starts a fresh pair instead of resetting again.
		view.set_scale(2.0);
		g.down(3, 83.0, 78.0, 1400.0, &mut view);
		assert_eq!(view.scale, 2.0);
	}

	#[test]
	fn slow_or_distant_taps_and_drags_do_not_reset() {
		let mut view = ViewState::default();
		let mut g = GestureTracker::default();
		view.set_scale(2.0);

		g.down(1, 80.0, 80.0, 0.0, &mut view);
		g.up(1, 50.0, &view);
		g.down(2, 80.0, 80.0, 600.0, &mut view);
		g.up(2, 650.0, &view);
		assert_eq!(view.scale, 2.0);

		g.down(3, 200.0, 200.0, 700.0, &mut view);
		g.up(3, 750.0, &view);
		assert_eq!(view.scale, 2.0);

		g.down(4, 80.0, 80.0, 800.0, &mut view);
		g.moved(4, 140.0, 80.0, &mut view, 300.0, 300.0);
		g.up(4, 850.0, &view);
		g.down(5, 140.0, 80.0, 900.0, &mut view);
		assert_eq!(view.scale, 2.0);
	}

	#[test]
	fn unknown_pointer_moves_are_ignored() {
		let mut view = ViewState::default();
		let mut g = GestureTracker::default();
		g.moved(3, 10.0, 10.0, &mut view, 300.0, 300.0);
		assert_eq!(view, ViewState::default());
		assert!(!g.is_active());
	}
}
