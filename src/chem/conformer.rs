//! Pseudo-3D model for the conformer viewer.
//!
//! The third coordinate is fabricated: BFS depth from the first atom spreads
//! the molecule front to back, and ring atoms get an alternating pucker. Good
//! enough to turn on screen, not a physical conformation.

use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use super::depict::{Depiction, depict, smallest_rings};
use super::element::Element;
use super::molecule::{BondOrder, Molecule};
use super::smiles::{NotationError, parse};

pub const CAMERA_DISTANCE: f64 = 4.0;
pub const DEPTH_SCALE: f64 = 0.8;
pub const RING_OFFSET: f64 = 0.15;
/// Fraction of the shorter canvas side covered by the unit circle at scale 1.
const FILL_RATIO: f64 = 0.38;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConformerError {
	#[error(transparent)]
	Notation(#[from] NotationError),
	#[error("structure has no atoms")]
	NoAtoms,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelAtom {
	pub element: Element,
	pub position: [f64; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelBond {
	pub a: usize,
	pub b: usize,
	pub order: BondOrder,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
	pub atoms: Vec<ModelAtom>,
	pub bonds: Vec<ModelBond>,
}

/// Screen-space result for one atom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Rotated z; larger is farther from the camera.
	pub depth: f64,
	/// Perspective factor applied to this point.
	pub perspective: f64,
}

/// Scale and pan applied after rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub scale: f64,
	pub pan_x: f64,
	pub pan_y: f64,
	pub width: f64,
	pub height: f64,
}

impl Camera {
	/// Pixels per model unit before perspective.
	pub fn unit(&self) -> f64 {
		self.width.min(self.height) * FILL_RATIO * self.scale
	}
}

/// Parse, lay out in 2D and lift into the pseudo-3D model.
pub fn build_model(smiles: &str) -> Result<Model, ConformerError> {
	let mol = parse(smiles)?;
	if mol.atom_count() == 0 {
		return Err(ConformerError::NoAtoms);
	}
	Ok(Model::from_layout(&mol, &depict(&mol)))
}

impl Model {
	pub fn from_layout(mol: &Molecule, layout: &Depiction) -> Self {
		let n = mol.atom_count();
		let adjacency = mol.adjacency();
		let bonds: Vec<(usize, usize, BondOrder)> = mol.bonds().collect();

		let cx = layout.atoms.iter().map(|a| a.x).sum::<f64>() / n.max(1) as f64;
		let cy = layout.atoms.iter().map(|a| a.y).sum::<f64>() / n.max(1) as f64;
		let radius = layout
			.atoms
			.iter()
			.map(|a| ((a.x - cx).powi(2) + (a.y - cy).powi(2)).sqrt())
			.fold(0.0, f64::max);
		let radius = if radius < 1e-9 { 1.0 } else { radius };

		let depths = bfs_depths(&adjacency);
		let max_depth = depths.iter().copied().max().unwrap_or(0).max(1) as f64;
		let ring_atoms: HashSet<usize> = smallest_rings(n, &adjacency, &bonds)
			.into_iter()
			.flatten()
			.collect();

		let atoms = layout
			.atoms
			.iter()
			.enumerate()
			.map(|(i, a)| {
				let pucker = match (ring_atoms.contains(&i), i % 2 == 0) {
					(true, true) => RING_OFFSET,
					(true, false) => -RING_OFFSET,
					(false, _) => 0.0,
				};
				let z = (depths[i] as f64 / max_depth - 0.5) * DEPTH_SCALE + pucker;
				ModelAtom {
					element: a.element,
					position: [(a.x - cx) / radius, (a.y - cy) / radius, z],
				}
			})
			.collect();

		Self {
			atoms,
			bonds: bonds
				.into_iter()
				.map(|(a, b, order)| ModelBond { a, b, order })
				.collect(),
		}
	}

	/// Rotate and project every atom.
	pub fn project(&self, rotation: [f64; 3], camera: &Camera) -> Vec<Projected> {
		self.atoms
			.iter()
			.map(|a| project(rotate(a.position, rotation), camera))
			.collect()
	}
}

/// Depth layer of each atom. Each disconnected fragment restarts at zero from
/// its lowest-numbered atom.
pub fn bfs_depths(adjacency: &[Vec<usize>]) -> Vec<usize> {
	let n = adjacency.len();
	let mut depth = vec![usize::MAX; n];
	for root in 0..n {
		if depth[root] != usize::MAX {
			continue;
		}
		depth[root] = 0;
		let mut queue = VecDeque::from([root]);
		while let Some(u) = queue.pop_front() {
			for &v in &adjacency[u] {
				if depth[v] == usize::MAX {
					depth[v] = depth[u] + 1;
					queue.push_back(v);
				}
			}
		}
	}
	depth
}

/// Rotate about X, then Y, then Z.
pub fn rotate(p: [f64; 3], [rx, ry, rz]: [f64; 3]) -> [f64; 3] {
	let [x, y, z] = p;
	let (s, c) = rx.sin_cos();
	let (y, z) = (y * c - z * s, y * s + z * c);
	let (s, c) = ry.sin_cos();
	let (x, z) = (x * c + z * s, -x * s + z * c);
	let (s, c) = rz.sin_cos();
	let (x, y) = (x * c - y * s, x * s + y * c);
	[x, y, z]
}

pub fn project(p: [f64; 3], camera: &Camera) -> Projected {
	let perspective = CAMERA_DISTANCE / (CAMERA_DISTANCE + p[2]).max(0.1);
	let unit = camera.unit();
	Projected {
		x: camera.width / 2.0 + camera.pan_x + p[0] * perspective * unit,
		y: camera.height / 2.0 + camera.pan_y + p[1] * perspective * unit,
		depth: p[2],
		perspective,
	}
}

/// Indices sorted far to near, for painter's-order drawing.
pub fn back_to_front<T>(items: &[T], depth: impl Fn(&T) -> f64) -> Vec<usize> {
	let mut order: Vec<usize> = (0..items.len()).collect();
	order.sort_by(|&a, &b| depth(&items[b]).total_cmp(&depth(&items[a])));
	order
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn close(a: [f64; 3], b: [f64; 3]) -> bool {
		a.iter().zip(b).all(|(x, y)| (x - y).abs() < EPS)
	}

	fn camera() -> Camera {
		Camera {
			scale: 1.0,
			pan_x: 0.0,
			pan_y: 0.0,
			width: 200.0,
			height: 100.0,
		}
	}

	#[test]
	fn zero_rotation_is_identity() {
		let p = [0.3, -0.2, 0.7];
		assert!(close(rotate(p, [0.0; 3]), p));
	}

	#[test]
	fn rotation_axes() {
		let half = std::f64::consts::FRAC_PI_2;
		assert!(close(rotate([0.0, 1.0, 0.0], [half, 0.0, 0.0]), [0.0, 0.0, 1.0]));
		assert!(close(rotate([1.0, 0.0, 0.0], [0.0, half, 0.0]), [0.0, 0.0, -1.0]));
		assert!(close(rotate([1.0, 0.0, 0.0], [0.0, 0.0, half]), [0.0, 1.0, 0.0]));
	}

	#[test]
	fn rotation_applies_x_before_y() {
		let half = std::f64::consts::FRAC_PI_2;
		// X takes +y to +z, then Y takes +z to +x.
		assert!(close(rotate([0.0, 1.0, 0.0], [half, half, 0.0]), [1.0, 0.0, 0.0]));
	}

	#[test]
	fn rotation_preserves_length() {
		let p = [0.4, 0.5, -0.6];
		let q = rotate(p, [0.3, 1.1, -2.0]);
		let len = |v: [f64; 3]| v.iter().map(|c| c * c).sum::<f64>().sqrt();
		assert!((len(p) - len(q)).abs() < EPS);
	}

	#[test]
	fn projection_centres_origin_and_shrinks_far_points() {
		let cam = camera();
		let origin = project([0.0; 3], &cam);
		assert_eq!((origin.x, origin.y), (100.0, 50.0));
		let near = project([1.0, 0.0, -0.5], &cam);
		let far = project([1.0, 0.0, 0.5], &cam);
		assert!(near.x - 100.0 > far.x - 100.0);
		assert!(far.perspective < 1.0 && near.perspective > 1.0);
	}

	#[test]
	fn depths_restart_per_fragment() {
		let adj = vec![vec![1], vec![0, 2], vec![1], vec![]];
		assert_eq!(bfs_depths(&adj), vec![0, 1, 2, 0]);
	}

	#[test]
	fn model_is_normalised_to_unit_circle() {
		let model = build_model("CCCCCC").unwrap();
		let max_r = model
			.atoms
			.iter()
			.map(|a| (a.position[0].powi(2) + a.position[1].powi(2)).sqrt())
			.fold(0.0, f64::max);
		assert!((max_r - 1.0).abs() < EPS);
		let zs: Vec<f64> = model.atoms.iter().map(|a| a.position[2]).collect();
		assert!((zs[0] + DEPTH_SCALE / 2.0).abs() < EPS);
		assert!((zs[5] - DEPTH_SCALE / 2.0).abs() < EPS);
	}

	#[test]
	fn ring_atoms_pucker_alternately() {
		let model = build_model("C1CCCCC1").unwrap();
		let depths = [0usize, 1, 2, 3, 2, 1];
		for (i, atom) in model.atoms.iter().enumerate() {
			let base = (depths[i] as f64 / 3.0 - 0.5) * DEPTH_SCALE;
			let pucker = if i % 2 == 0 { RING_OFFSET } else { -RING_OFFSET };
			assert!((atom.position[2] - base - pucker).abs() < EPS);
		}
	}

	#[test]
	fn empty_or_malformed_notation_is_an_error() {
		assert_eq!(build_model("."), Err(ConformerError::NoAtoms));
		assert!(matches!(build_model("C(("), Err(ConformerError::Notation(_))));
	}

	#[test]
	fn painter_order_is_far_first() {
		let depths = [0.2, -0.5, 0.9];
		assert_eq!(back_to_front(&depths, |d| *d), vec![2, 0, 1]);
	}
}
