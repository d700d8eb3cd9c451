//! Which side of a node card an edge leaves from and arrives at.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	Top,
	Right,
	Bottom,
	Left,
}

/// Source and target sides for an edge, by the dominant axis of the
/// centre-to-centre delta. Ties go horizontal.
pub fn connection_sides(source: (f64, f64), target: (f64, f64)) -> (Side, Side) {
	let (dx, dy) = (target.0 - source.0, target.1 - source.1);
	if dx.abs() >= dy.abs() {
		if dx >= 0.0 {
			(Side::Right, Side::Left)
		} else {
			(Side::Left, Side::Right)
		}
	} else if dy >= 0.0 {
		(Side::Bottom, Side::Top)
	} else {
		(Side::Top, Side::Bottom)
	}
}

/// Midpoint of `side` on a `width` x `height` card centred at `center`.
pub fn handle_point(center: (f64, f64), side: Side, width: f64, height: f64) -> (f64, f64) {
	match side {
		Side::Top => (center.0, center.1 - height / 2.0),
		Side::Right => (center.0 + width / 2.0, center.1),
		Side::Bottom => (center.0, center.1 + height / 2.0),
		Side::Left => (center.0 - width / 2.0, center.1),
	}
}

pub fn edge_endpoints(
	source: (f64, f64),
	target: (f64, f64),
	width: f64,
	height: f64,
) -> ((f64, f64), (f64, f64)) {
	let (s, t) = connection_sides(source, target);
	(
		handle_point(source, s, width, height),
		handle_point(target, t, width, height),
	)
}

pub fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (abx, aby) = (b.0 - a.0, b.1 - a.1);
	let len2 = abx * abx + aby * aby;
	let t = if len2 < 1e-12 {
		0.0
	} else {
		(((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + abx * t, a.1 + aby * t);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn horizontal_dominant() {
		assert_eq!(connection_sides((0.0, 0.0), (100.0, 30.0)), (Side::Right, Side::Left));
		assert_eq!(connection_sides((0.0, 0.0), (-100.0, 99.0)), (Side::Left, Side::Right));
	}

	#[test]
	fn vertical_dominant() {
		assert_eq!(connection_sides((0.0, 0.0), (10.0, 50.0)), (Side::Bottom, Side::Top));
		assert_eq!(connection_sides((0.0, 0.0), (-10.0, -50.0)), (Side::Top, Side::Bottom));
	}

	#[test]
	fn tie_goes_horizontal() {
		assert_eq!(connection_sides((0.0, 0.0), (20.0, 20.0)), (Side::Right, Side::Left));
	}

	#[test]
	fn endpoints_sit_on_card_edges() {
		let (a, b) = edge_endpoints((0.0, 0.0), (400.0, 0.0), 160.0, 100.0);
		assert_eq!(a, (80.0, 0.0));
		assert_eq!(b, (320.0, 0.0));
	}

	#[test]
	fn segment_distance() {
		assert_eq!(distance_to_segment((5.0, 3.0), (0.0, 0.0), (10.0, 0.0)), 3.0);
		assert_eq!(distance_to_segment((-4.0, 3.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
		assert_eq!(distance_to_segment((1.0, 1.0), (0.0, 0.0), (0.0, 0.0)), 2f64.sqrt());
	}
}
