//! 2D coordinate generation and vector output for structure drawings.
//!
//! Rings are laid out as regular polygons (fused rings share an edge), chains
//! zigzag at 120 degrees, and disconnected fragments sit side by side. Units
//! are bond lengths with y pointing down, as on a canvas.

use std::collections::{HashSet, VecDeque};
use std::f64::consts::PI;
use std::fmt::Write;

use petgraph::graph::NodeIndex;

use super::element::Element;
use super::molecule::{Atom, BondOrder, Molecule};
use crate::theme::{ThemeTokens, element_color};

pub const BOND_LENGTH: f64 = 1.0;
const FRAGMENT_GAP: f64 = 1.5;
const LABEL_CLEARANCE: f64 = 0.28;
const SVG_SCALE: f64 = 36.0;
const SVG_PADDING: f64 = 18.0;

#[derive(Clone, Debug, PartialEq)]
pub struct DepictAtom {
	pub element: Element,
	pub x: f64,
	pub y: f64,
	/// Text drawn at the atom, `None` for skeletal carbons.
	pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepictBond {
	pub a: usize,
	pub b: usize,
	pub order: BondOrder,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AromaticRing {
	pub cx: f64,
	pub cy: f64,
	pub radius: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Depiction {
	pub atoms: Vec<DepictAtom>,
	pub bonds: Vec<DepictBond>,
	pub aromatic_rings: Vec<AromaticRing>,
}

/// A line segment in depiction units.
pub type Segment = [(f64, f64); 2];

impl Depiction {
	pub fn is_empty(&self) -> bool {
		self.atoms.is_empty()
	}

	/// `(min_x, min_y, max_x, max_y)`; all zero when empty.
	pub fn bounds(&self) -> (f64, f64, f64, f64) {
		if self.atoms.is_empty() {
			return (0.0, 0.0, 0.0, 0.0);
		}
		self.atoms.iter().fold(
			(f64::MAX, f64::MAX, f64::MIN, f64::MIN),
			|(x0, y0, x1, y1), a| (x0.min(a.x), y0.min(a.y), x1.max(a.x), y1.max(a.y)),
		)
	}

	/// Scale and offset that centre the drawing in a `width` x `height` box,
	/// never magnifying past `max_scale`.
	pub fn fit(&self, width: f64, height: f64, padding: f64, max_scale: f64) -> (f64, f64, f64) {
		let (x0, y0, x1, y1) = self.bounds();
		let (bw, bh) = ((x1 - x0).max(1e-6), (y1 - y0).max(1e-6));
		let scale = ((width - 2.0 * padding) / bw)
			.min((height - 2.0 * padding) / bh)
			.min(max_scale)
			.max(0.0);
		let ox = width / 2.0 - (x0 + x1) / 2.0 * scale;
		let oy = height / 2.0 - (y0 + y1) / 2.0 * scale;
		(scale, ox, oy)
	}

	/// Strokes for one bond: shortened at labelled ends, split into parallel
	/// lines for double and triple bonds.
	pub fn bond_segments(&self, bond: &DepictBond) -> Vec<Segment> {
		let (a, b) = (&self.atoms[bond.a], &self.atoms[bond.b]);
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		let len = (dx * dx + dy * dy).sqrt();
		if len < 1e-9 {
			return Vec::new();
		}
		let (ux, uy) = (dx / len, dy / len);
		let trim_a = if a.label.is_some() { LABEL_CLEARANCE } else { 0.0 };
		let trim_b = if b.label.is_some() { LABEL_CLEARANCE } else { 0.0 };
		if trim_a + trim_b >= len {
			return Vec::new();
		}
		let start = (a.x + ux * trim_a, a.y + uy * trim_a);
		let end = (b.x - ux * trim_b, b.y - uy * trim_b);
		let (nx, ny) = (-uy, ux);
		let offsets: &[f64] = match bond.order.lines() {
			1 => &[0.0],
			2 => &[-0.07, 0.07],
			_ => &[-0.12, 0.0, 0.12],
		};
		offsets
			.iter()
			.map(|o| {
				[
					(start.0 + nx * o, start.1 + ny * o),
					(end.0 + nx * o, end.1 + ny * o),
				]
			})
			.collect()
	}

	/// Standalone SVG document.
	pub fn to_svg(&self, tokens: &ThemeTokens) -> String {
		let (x0, y0, x1, y1) = self.bounds();
		let width = (x1 - x0) * SVG_SCALE + 2.0 * SVG_PADDING;
		let height = (y1 - y0) * SVG_SCALE + 2.0 * SVG_PADDING;
		let tx = |x: f64| (x - x0) * SVG_SCALE + SVG_PADDING;
		let ty = |y: f64| (y - y0) * SVG_SCALE + SVG_PADDING;

		let mut svg = String::new();
		let _ = write!(
			svg,
			r#"<svg xmlns="http://www.w3.org/2000/svg" class="structure-svg" viewBox="0 0 {w:.1} {h:.1}" width="{w:.1}" height="{h:.1}">"#,
			w = width,
			h = height
		);
		for bond in &self.bonds {
			for [p, q] in self.bond_segments(bond) {
				let _ = write!(
					svg,
					r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2" stroke-linecap="round"/>"#,
					tx(p.0),
					ty(p.1),
					tx(q.0),
					ty(q.1),
					tokens.bond
				);
			}
		}
		for ring in &self.aromatic_rings {
			let _ = write!(
				svg,
				r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
				tx(ring.cx),
				ty(ring.cy),
				ring.radius * SVG_SCALE,
				tokens.bond
			);
		}
		for atom in &self.atoms {
			if let Some(label) = &atom.label {
				let _ = write!(
					svg,
					r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="central" font-family="sans-serif" font-size="15" fill="{}">{}</text>"#,
					tx(atom.x),
					ty(atom.y),
					element_color(atom.element.symbol(), tokens),
					label
				);
			}
		}
		svg.push_str("</svg>");
		svg
	}
}

/// Lay out a parsed molecule in 2D.
pub fn depict(mol: &Molecule) -> Depiction {
	let n = mol.atom_count();
	if n == 0 {
		return Depiction::default();
	}
	let adjacency = mol.adjacency();
	let bonds: Vec<(usize, usize, BondOrder)> = mol.bonds().collect();
	let rings = smallest_rings(n, &adjacency, &bonds);
	let coords = Placer::new(mol, &adjacency, &rings).run();

	let atoms = (0..n)
		.map(|i| {
			let atom = mol.atom(NodeIndex::new(i));
			DepictAtom {
				element: atom.element,
				x: coords[i].0,
				y: coords[i].1,
				label: atom_label(atom, adjacency[i].len()),
			}
		})
		.collect();

	let aromatic_rings = rings
		.iter()
		.filter(|ring| {
			(0..ring.len()).all(|k| {
				let (a, b) = (ring[k], ring[(k + 1) % ring.len()]);
				mol.bond_between(NodeIndex::new(a), NodeIndex::new(b)) == Some(BondOrder::Aromatic)
			})
		})
		.map(|ring| {
			let m = ring.len() as f64;
			let cx = ring.iter().map(|&i| coords[i].0).sum::<f64>() / m;
			let cy = ring.iter().map(|&i| coords[i].1).sum::<f64>() / m;
			let apothem = BOND_LENGTH / (2.0 * (PI / m).tan());
			AromaticRing {
				cx,
				cy,
				radius: apothem * 0.62,
			}
		})
		.collect();

	Depiction {
		atoms,
		bonds: bonds
			.into_iter()
			.map(|(a, b, order)| DepictBond { a, b, order })
			.collect(),
		aromatic_rings,
	}
}

fn atom_label(atom: &Atom, degree: usize) -> Option<String> {
	let show = atom.element != Element::C || degree == 0 || atom.charge != 0 || atom.isotope != 0;
	if !show {
		return None;
	}
	let mut label = String::new();
	if atom.isotope > 0 {
		label.push_str(&atom.isotope.to_string());
	}
	label.push_str(atom.element.symbol());
	match atom.hydrogens {
		0 => {}
		1 => label.push('H'),
		h => {
			let _ = write!(label, "H{}", h);
		}
	}
	match atom.charge {
		0 => {}
		1 => label.push('+'),
		-1 => label.push('-'),
		c if c > 0 => {
			let _ = write!(label, "{}+", c);
		}
		c => {
			let _ = write!(label, "{}-", -c);
		}
	}
	Some(label)
}

/// Smallest cycle through each bond, deduplicated and reduced greedily to a
/// set of size `bonds - atoms + fragments`. Each ring is in cycle order.
pub fn smallest_rings(n: usize, adjacency: &[Vec<usize>], bonds: &[(usize, usize, BondOrder)]) -> Vec<Vec<usize>> {
	let fragments = fragments(n, adjacency).len();
	let cyclomatic = (bonds.len() + fragments).saturating_sub(n);
	if cyclomatic == 0 {
		return Vec::new();
	}

	let mut candidates: Vec<Vec<usize>> = Vec::new();
	let mut seen: HashSet<Vec<usize>> = HashSet::new();
	for &(a, b, _) in bonds {
		if let Some(path) = shortest_path_avoiding(a, b, adjacency) {
			let mut key = path.clone();
			key.sort_unstable();
			if seen.insert(key) {
				candidates.push(path);
			}
		}
	}
	candidates.sort_by_key(Vec::len);

	let mut covered: HashSet<(usize, usize)> = HashSet::new();
	let mut rings = Vec::new();
	for ring in candidates {
		let edges: Vec<(usize, usize)> = (0..ring.len())
			.map(|k| {
				let (a, b) = (ring[k], ring[(k + 1) % ring.len()]);
				(a.min(b), a.max(b))
			})
			.collect();
		if edges.iter().any(|e| !covered.contains(e)) {
			covered.extend(edges);
			rings.push(ring);
			if rings.len() == cyclomatic {
				break;
			}
		}
	}
	rings
}

/// BFS path from `a` to `b` that does not use the direct `a`-`b` bond.
fn shortest_path_avoiding(a: usize, b: usize, adjacency: &[Vec<usize>]) -> Option<Vec<usize>> {
	let mut prev = vec![usize::MAX; adjacency.len()];
	let mut queue = VecDeque::from([a]);
	prev[a] = a;
	while let Some(u) = queue.pop_front() {
		if u == b {
			break;
		}
		for &v in &adjacency[u] {
			if u == a && v == b {
				continue;
			}
			if prev[v] == usize::MAX {
				prev[v] = u;
				queue.push_back(v);
			}
		}
	}
	if prev[b] == usize::MAX {
		return None;
	}
	let mut path = vec![b];
	let mut cur = b;
	while cur != a {
		cur = prev[cur];
		path.push(cur);
	}
	path.reverse();
	Some(path)
}

/// Connected components, each listed in BFS order from its lowest atom.
pub fn fragments(n: usize, adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
	let mut seen = vec![false; n];
	let mut out = Vec::new();
	for start in 0..n {
		if seen[start] {
			continue;
		}
		seen[start] = true;
		let mut order = vec![start];
		let mut queue = VecDeque::from([start]);
		while let Some(u) = queue.pop_front() {
			for &v in &adjacency[u] {
				if !seen[v] {
					seen[v] = true;
					order.push(v);
					queue.push_back(v);
				}
			}
		}
		out.push(order);
	}
	out
}

struct Placer<'a> {
	mol: &'a Molecule,
	adjacency: &'a [Vec<usize>],
	rings: &'a [Vec<usize>],
	atom_rings: Vec<Vec<usize>>,
	ring_done: Vec<bool>,
	pos: Vec<Option<(f64, f64)>>,
	/// Zigzag direction for the next chain atom.
	turn: Vec<f64>,
}

impl<'a> Placer<'a> {
	fn new(mol: &'a Molecule, adjacency: &'a [Vec<usize>], rings: &'a [Vec<usize>]) -> Self {
		let n = adjacency.len();
		let mut atom_rings = vec![Vec::new(); n];
		for (r, ring) in rings.iter().enumerate() {
			for &a in ring {
				atom_rings[a].push(r);
			}
		}
		Self {
			mol,
			adjacency,
			rings,
			atom_rings,
			ring_done: vec![false; rings.len()],
			pos: vec![None; n],
			turn: vec![-1.0; n],
		}
	}

	fn run(mut self) -> Vec<(f64, f64)> {
		let mut right_edge: Option<f64> = None;
		for fragment in fragments(self.adjacency.len(), self.adjacency) {
			let start = fragment[0];
			self.pos[start] = Some((0.0, 0.0));
			let mut queue = VecDeque::from([start]);
			while let Some(a) = queue.pop_front() {
				for r in self.atom_rings[a].clone() {
					if !self.ring_done[r] {
						self.ring_done[r] = true;
						queue.extend(self.place_ring(r));
					}
				}
				queue.extend(self.place_substituents(a));
			}

			// Shift the fragment to the right of the previous one.
			let min_x = fragment
				.iter()
				.filter_map(|&i| self.pos[i].map(|p| p.0))
				.fold(f64::MAX, f64::min);
			let shift = right_edge.map_or(0.0, |edge| edge + FRAGMENT_GAP - min_x);
			let mut max_x = f64::MIN;
			for &i in &fragment {
				if let Some(p) = self.pos[i].as_mut() {
					p.0 += shift;
					max_x = max_x.max(p.0);
				}
			}
			right_edge = Some(max_x);
		}
		self.pos.into_iter().map(|p| p.unwrap_or((0.0, 0.0))).collect()
	}

	fn at(&self, i: usize) -> (f64, f64) {
		self.pos[i].unwrap_or((0.0, 0.0))
	}

	/// Place the unplaced atoms of ring `r`; returns the atoms placed.
	fn place_ring(&mut self, r: usize) -> Vec<usize> {
		let rings = self.rings;
		let ring = &rings[r];
		let m = ring.len();
		let radius = BOND_LENGTH / (2.0 * (PI / m as f64).sin());
		let step = 2.0 * PI / m as f64;

		let fused = (0..m).find(|&k| self.pos[ring[k]].is_some() && self.pos[ring[(k + 1) % m]].is_some());
		let (center, start_k, start_angle, direction) = if let Some(k) = fused {
			let (p, q) = (self.at(ring[k]), self.at(ring[(k + 1) % m]));
			let mid = ((p.0 + q.0) / 2.0, (p.1 + q.1) / 2.0);
			let (ex, ey) = (q.0 - p.0, q.1 - p.1);
			let elen = (ex * ex + ey * ey).sqrt().max(1e-9);
			let (nx, ny) = (-ey / elen, ex / elen);
			let apothem = radius * (PI / m as f64).cos();
			let c1 = (mid.0 + nx * apothem, mid.1 + ny * apothem);
			let c2 = (mid.0 - nx * apothem, mid.1 - ny * apothem);
			let crowd = self.crowd_near(mid, &[ring[k], ring[(k + 1) % m]]);
			let center = match crowd {
				Some(c) if dist(c1, c) < dist(c2, c) => c2,
				_ => c1,
			};
			let ap = (p.1 - center.1).atan2(p.0 - center.0);
			let aq = (q.1 - center.1).atan2(q.0 - center.0);
			let dir = if wrap_angle(aq - ap) >= 0.0 { 1.0 } else { -1.0 };
			(center, k, ap, dir)
		} else if let Some(k) = (0..m).find(|&k| self.pos[ring[k]].is_some()) {
			let p = self.at(ring[k]);
			let out = self.outward(ring[k]);
			let center = (p.0 + out.0 * radius, p.1 + out.1 * radius);
			let ap = (p.1 - center.1).atan2(p.0 - center.0);
			(center, k, ap, 1.0)
		} else {
			((0.0, 0.0), 0, PI / 2.0 + step / 2.0, 1.0)
		};

		let mut placed = Vec::new();
		for j in 0..m {
			let atom = ring[(start_k + j) % m];
			if self.pos[atom].is_none() {
				let angle = start_angle + direction * j as f64 * step;
				self.pos[atom] = Some((center.0 + radius * angle.cos(), center.1 + radius * angle.sin()));
				placed.push(atom);
			}
		}
		placed
	}

	/// Centroid of placed atoms within two bond lengths of `point`, ignoring
	/// `exclude`.
	fn crowd_near(&self, point: (f64, f64), exclude: &[usize]) -> Option<(f64, f64)> {
		let near: Vec<(f64, f64)> = self
			.pos
			.iter()
			.enumerate()
			.filter(|(i, _)| !exclude.contains(i))
			.filter_map(|(_, p)| *p)
			.filter(|p| dist(*p, point) < 2.0 * BOND_LENGTH)
			.collect();
		if near.is_empty() {
			return None;
		}
		let k = near.len() as f64;
		Some((
			near.iter().map(|p| p.0).sum::<f64>() / k,
			near.iter().map(|p| p.1).sum::<f64>() / k,
		))
	}

	/// Unit vector pointing away from the placed neighbours of `a`.
	fn outward(&self, a: usize) -> (f64, f64) {
		let p = self.at(a);
		let (mut sx, mut sy) = (0.0, 0.0);
		for &nb in &self.adjacency[a] {
			if let Some(q) = self.pos[nb] {
				sx += p.0 - q.0;
				sy += p.1 - q.1;
			}
		}
		let len = (sx * sx + sy * sy).sqrt();
		if len < 1e-9 { (1.0, 0.0) } else { (sx / len, sy / len) }
	}

	fn place_substituents(&mut self, a: usize) -> Vec<usize> {
		let todo: Vec<usize> = self.adjacency[a]
			.iter()
			.copied()
			.filter(|&nb| self.pos[nb].is_none())
			.collect();
		if todo.is_empty() {
			return todo;
		}
		let p = self.at(a);
		let placed: Vec<usize> = self.adjacency[a]
			.iter()
			.copied()
			.filter(|&nb| self.pos[nb].is_some())
			.collect();
		let k = todo.len();

		let angles: Vec<f64> = match placed.as_slice() {
			[] => (0..k)
				.map(|j| -PI / 6.0 + j as f64 * 2.0 * PI / k as f64)
				.collect(),
			[parent] => {
				let q = self.at(*parent);
				let incoming = (q.1 - p.1).atan2(q.0 - p.0);
				if k == 1 {
					if self.is_linear(a, *parent, todo[0]) {
						vec![incoming + PI]
					} else {
						vec![incoming + self.turn[a] * 2.0 * PI / 3.0]
					}
				} else {
					(1..=k)
						.map(|j| incoming + j as f64 * 2.0 * PI / (k + 1) as f64)
						.collect()
				}
			}
			_ => {
				let out = self.outward(a);
				let base = out.1.atan2(out.0);
				(0..k)
					.map(|j| base + (j as f64 - (k - 1) as f64 / 2.0) * PI / 3.0)
					.collect()
			}
		};

		for (&atom, angle) in todo.iter().zip(angles) {
			self.pos[atom] = Some((p.0 + BOND_LENGTH * angle.cos(), p.1 + BOND_LENGTH * angle.sin()));
			self.turn[atom] = if placed.is_empty() { -1.0 } else { -self.turn[a] };
		}
		todo
	}

	/// Triple bonds and cumulated double bonds are drawn straight.
	fn is_linear(&self, a: usize, from: usize, to: usize) -> bool {
		let order = |x: usize| self.mol.bond_between(NodeIndex::new(a), NodeIndex::new(x));
		match (order(from), order(to)) {
			(Some(BondOrder::Triple), _) | (_, Some(BondOrder::Triple)) => true,
			(Some(BondOrder::Double), Some(BondOrder::Double)) => true,
			_ => false,
		}
	}
}

fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
	((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn wrap_angle(a: f64) -> f64 {
	let mut a = a % (2.0 * PI);
	if a > PI {
		a -= 2.0 * PI;
	} else if a <= -PI {
		a += 2.0 * PI;
	}
	a
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chem::smiles::parse;
	use crate::theme::ThemeMode;

	fn layout(smiles: &str) -> Depiction {
		depict(&parse(smiles).unwrap())
	}

	fn bond_len(d: &Depiction, b: &DepictBond) -> f64 {
		let (p, q) = (&d.atoms[b.a], &d.atoms[b.b]);
		dist((p.x, p.y), (q.x, q.y))
	}

	fn min_atom_distance(d: &Depiction) -> f64 {
		let mut best = f64::MAX;
		for i in 0..d.atoms.len() {
			for j in i + 1..d.atoms.len() {
				let (p, q) = (&d.atoms[i], &d.atoms[j]);
				best = best.min(dist((p.x, p.y), (q.x, q.y)));
			}
		}
		best
	}

	#[test]
	fn chain_bonds_have_unit_length() {
		let d = layout("CCCCCC");
		assert!(d.bonds.iter().all(|b| (bond_len(&d, b) - 1.0).abs() < 1e-9));
		assert!(min_atom_distance(&d) > 0.9);
	}

	#[test]
	fn benzene_is_a_regular_hexagon_with_circle() {
		let d = layout("c1ccccc1");
		assert!(d.bonds.iter().all(|b| (bond_len(&d, b) - 1.0).abs() < 1e-9));
		assert_eq!(d.aromatic_rings.len(), 1);
		assert!(d.atoms.iter().all(|a| a.label.is_none()));
	}

	#[test]
	fn fused_rings_share_an_edge_without_overlap() {
		let d = layout("c1ccc2ccccc2c1");
		assert_eq!(d.atoms.len(), 10);
		assert!(d.bonds.iter().all(|b| (bond_len(&d, b) - 1.0).abs() < 1e-9));
		assert!(min_atom_distance(&d) > 0.9);
		assert_eq!(d.aromatic_rings.len(), 2);
	}

	#[test]
	fn substituted_ring_places_substituent_outside() {
		let d = layout("Oc1ccccc1");
		assert!(d.bonds.iter().all(|b| (bond_len(&d, b) - 1.0).abs() < 1e-9));
		assert!(min_atom_distance(&d) > 0.9);
		assert_eq!(d.atoms[0].label.as_deref(), Some("OH"));
	}

	#[test]
	fn quaternary_centre_spreads_branches() {
		let d = layout("CC(C)(C)C");
		assert!(min_atom_distance(&d) > 0.9);
	}

	#[test]
	fn triple_bonds_are_straight() {
		let d = layout("CC#CC");
		let (a, c) = (&d.atoms[1], &d.atoms[3]);
		assert!((dist((a.x, a.y), (c.x, c.y)) - 2.0).abs() < 1e-9);
	}

	#[test]
	fn fragments_do_not_overlap() {
		let d = layout("[Na+].[Cl-]");
		assert!(d.atoms[1].x - d.atoms[0].x >= FRAGMENT_GAP - 1e-9);
		assert_eq!(d.atoms[0].label.as_deref(), Some("Na+"));
		assert_eq!(d.atoms[1].label.as_deref(), Some("Cl-"));
	}

	#[test]
	fn labels_for_heteroatoms_and_charges() {
		let d = layout("CC(=O)[O-]");
		assert_eq!(d.atoms[0].label, None);
		assert_eq!(d.atoms[2].label.as_deref(), Some("O"));
		assert_eq!(d.atoms[3].label.as_deref(), Some("O-"));
		let d = layout("C");
		assert_eq!(d.atoms[0].label.as_deref(), Some("CH4"));
	}

	#[test]
	fn smallest_rings_of_spiro_and_fused() {
		let mol = parse("C1CCC2(CC1)CCCC2").unwrap();
		let bonds: Vec<_> = mol.bonds().collect();
		let rings = smallest_rings(mol.atom_count(), &mol.adjacency(), &bonds);
		let mut sizes: Vec<usize> = rings.iter().map(Vec::len).collect();
		sizes.sort_unstable();
		assert_eq!(sizes, vec![5, 6]);
	}

	#[test]
	fn svg_has_one_stroke_per_line() {
		let d = layout("CC=O");
		let svg = d.to_svg(ThemeMode::Dark.tokens());
		assert!(svg.starts_with("<svg"));
		assert!(svg.ends_with("</svg>"));
		assert_eq!(svg.matches("<line").count(), 3);
		assert_eq!(svg.matches("<text").count(), 1);
	}

	#[test]
	fn fit_centres_drawing() {
		let d = layout("CCCC");
		let (scale, ox, oy) = d.fit(200.0, 100.0, 10.0, 40.0);
		let (x0, y0, x1, y1) = d.bounds();
		let cx = (x0 + x1) / 2.0 * scale + ox;
		let cy = (y0 + y1) / 2.0 * scale + oy;
		assert!((cx - 100.0).abs() < 1e-9 && (cy - 50.0).abs() < 1e-9);
		assert!(scale <= 40.0);
	}
}
