//! Concentric radial placement for compounds without a stored position, and
//! keyword classification of reactions.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::debug;

use super::model::{Dataset, Position};

pub const PRIMARY_RADIUS: f64 = 600.0;
pub const RADIUS_INCREMENT: f64 = 600.0;
pub const MIN_SPACING: f64 = 500.0;
const MAX_ATTEMPTS: usize = 50;
/// Unconnected leftovers are dealt out this many per ring.
const ORPHAN_CHUNK: usize = 20;

/// Positions for every node in `data` that has none. Nodes that already
/// carry a position are treated as fixed obstacles.
pub fn radial_layout(data: &Dataset, hub: &str) -> HashMap<String, Position> {
	let mut placed: Vec<Position> = data.nodes.iter().filter_map(|n| n.position).collect();
	let mut out = HashMap::new();
	if data.nodes.is_empty() {
		return out;
	}

	let order: HashMap<&str, usize> = data
		.nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();
	let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); data.nodes.len()];
	for edge in &data.edges {
		if let (Some(&s), Some(&t)) = (order.get(edge.source.as_str()), order.get(edge.target.as_str())) {
			if s != t {
				adjacency[s].push(t);
				adjacency[t].push(s);
			}
		}
	}
	for list in &mut adjacency {
		list.sort_unstable();
		list.dedup();
	}

	let hub_idx = order.get(hub).copied().unwrap_or_else(|| {
		(0..data.nodes.len())
			.max_by_key(|&i| (adjacency[i].len(), std::cmp::Reverse(i)))
			.unwrap_or(0)
	});
	let center = match data.nodes[hub_idx].position {
		Some(p) => p,
		None => {
			let p = Position::default();
			placed.push(p);
			out.insert(data.nodes[hub_idx].id.clone(), p);
			p
		}
	};

	for (ring_index, ring) in bfs_rings(hub_idx, &adjacency).into_iter().enumerate() {
		let todo: Vec<usize> = ring
			.into_iter()
			.filter(|&i| data.nodes[i].position.is_none())
			.collect();
		if todo.is_empty() {
			continue;
		}
		let n = todo.len();
		let base_radius = PRIMARY_RADIUS + ring_index as f64 * RADIUS_INCREMENT;
		let radius = base_radius.max(n as f64 * MIN_SPACING / (2.0 * PI));

		for (j, idx) in todo.into_iter().enumerate() {
			let mut angle = j as f64 * 2.0 * PI / n as f64 + jitter(j);
			let mut r = radius;
			let mut pos = polar(center, r, angle);
			for attempt in 0..MAX_ATTEMPTS {
				if nearest_gap(&placed, pos) >= MIN_SPACING {
					break;
				}
				if attempt % 2 == 0 {
					r += 50.0;
				} else {
					angle += 0.2;
				}
				pos = polar(center, r, angle);
			}
			let gap = nearest_gap(&placed, pos);
			if gap < MIN_SPACING {
				debug!(
					"no free slot for '{}' after {} attempts; placed {:.1} from its nearest neighbour",
					data.nodes[idx].id, MAX_ATTEMPTS, gap
				);
			}
			placed.push(pos);
			out.insert(data.nodes[idx].id.clone(), pos);
		}
	}

	debug!("radial layout placed {} compounds", out.len());
	out
}

/// Distance from `pos` to the closest already placed node.
fn nearest_gap(placed: &[Position], pos: Position) -> f64 {
	placed
		.iter()
		.map(|p| distance(*p, pos))
		.fold(f64::INFINITY, f64::min)
}

/// BFS layers from `root`, excluding the root itself. Disconnected nodes are
/// appended as extra rings of at most `ORPHAN_CHUNK`.
fn bfs_rings(root: usize, adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
	let mut visited = HashSet::from([root]);
	let mut rings = Vec::new();
	let mut current = vec![root];

	while visited.len() < adjacency.len() {
		let mut next = Vec::new();
		for &node in &current {
			for &nb in &adjacency[node] {
				if visited.insert(nb) {
					next.push(nb);
				}
			}
		}
		if next.is_empty() {
			next = (0..adjacency.len())
				.filter(|i| !visited.contains(i))
				.take(ORPHAN_CHUNK)
				.collect();
			visited.extend(next.iter().copied());
		}
		rings.push(next.clone());
		current = next;
	}
	rings
}

/// Small deterministic angular offset so rings do not line up radially.
fn jitter(j: usize) -> f64 {
	((j * 37 % 21) as f64 - 10.0) / 200.0
}

fn polar(center: Position, r: f64, angle: f64) -> Position {
	Position {
		x: center.x + r * angle.cos(),
		y: center.y + r * angle.sin(),
	}
}

fn distance(a: Position, b: Position) -> f64 {
	((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReactionCategory {
	FriedelCrafts,
	Oxidation,
	Reduction,
	Substitution,
	Addition,
	Condensation,
	Rearrangement,
	Other,
}

impl ReactionCategory {
	/// Classify by keywords in the reaction label. First match wins.
	pub fn classify(label: &str) -> Self {
		let l = label.to_lowercase();
		let has = |words: &[&str]| words.iter().any(|w| l.contains(w));
		if has(&["friedel", "acylation", "alkylation"]) {
			Self::FriedelCrafts
		} else if has(&["oxidation", "epoxidation"]) {
			Self::Oxidation
		} else if has(&["reduction", "hydrog"]) {
			Self::Reduction
		} else if has(&["substitution", "halogen", "nitration", "sulfonation"]) {
			Self::Substitution
		} else if has(&["addition", "cyclo"]) {
			Self::Addition
		} else if has(&["condensation", "aldol", "esterification"]) {
			Self::Condensation
		} else if has(&["rearrang", "migration"]) {
			Self::Rearrangement
		} else {
			Self::Other
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::FriedelCrafts => "Friedel-Crafts",
			Self::Oxidation => "Oxidation",
			Self::Reduction => "Reduction",
			Self::Substitution => "Substitution",
			Self::Addition => "Addition",
			Self::Condensation => "Condensation",
			Self::Rearrangement => "Rearrangement",
			Self::Other => "Other",
		}
	}

	/// `r, g, b` for edge strokes; `None` uses the theme's edge colour.
	pub fn rgb(self) -> Option<&'static str> {
		match self {
			Self::FriedelCrafts => Some("255, 127, 14"),
			Self::Oxidation => Some("214, 39, 40"),
			Self::Reduction => Some("44, 160, 44"),
			Self::Substitution => Some("148, 103, 189"),
			Self::Addition => Some("23, 190, 207"),
			Self::Condensation => Some("227, 119, 194"),
			Self::Rearrangement => Some("188, 189, 34"),
			Self::Other => None,
		}
	}
}
