use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::handles::{distance_to_segment, edge_endpoints};
use crate::config::LAYOUT_HUB;
use crate::data::layout::{ReactionCategory, radial_layout};
use crate::data::{Dataset, Position, Viewport};
use crate::selection::{Highlight, Selection};
use crate::theme::ThemeMode;

pub const NODE_WIDTH: f64 = 180.0;
pub const NODE_HEIGHT: f64 = 150.0;
/// Edge pick tolerance in screen pixels.
pub const EDGE_HIT_PX: f64 = 8.0;
/// Pointer travel below this is a click, not a drag.
pub const CLICK_SLOP_PX: f64 = 4.0;
pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 4.0;
pub const RELAX_SECONDS: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct CompoundInfo {
	pub id: String,
	pub label: String,
	pub smiles: String,
}

#[derive(Clone, Debug)]
pub struct EdgeRecord {
	pub id: String,
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
	pub category: ReactionCategory,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// What a pointer release amounted to.
#[derive(Clone, Debug, PartialEq)]
pub enum Release {
	Nothing,
	ClickedNode(String),
	ClickedEdge(String),
	ClickedBackground,
	MovedNode,
	Panned,
}

pub struct GraphCanvasState {
	pub graph: ForceGraph<CompoundInfo, ()>,
	pub edges: Vec<EdgeRecord>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<DefaultNodeIdx>,
	pub highlight: Highlight,
	pub selection: Selection,
	pub theme: ThemeMode,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	relax_remaining: f64,
	ids: HashMap<String, DefaultNodeIdx>,
}

impl GraphCanvasState {
	/// Build from a dataset whose positions may be partial; missing ones are
	/// filled by the radial layout. Without a saved viewport the view is
	/// fitted to the content.
	pub fn new(data: &Dataset, viewport: Option<Viewport>, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 12000.0,
			force_spring: 0.02,
			force_max: 280.0,
			node_speed: 7000.0,
			damping_factor: 0.9,
		});
		let placed = radial_layout(data, LAYOUT_HUB);
		let mut ids = HashMap::new();

		for node in &data.nodes {
			let p = node
				.position
				.or_else(|| placed.get(&node.id).copied())
				.unwrap_or_default();
			let idx = graph.add_node(NodeData {
				x: p.x as f32,
				y: p.y as f32,
				mass: 10.0,
				is_anchor: true,
				user_data: CompoundInfo {
					id: node.id.clone(),
					label: node.display_label().to_string(),
					smiles: node.data.smiles.clone(),
				},
			});
			ids.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::new();
		for edge in &data.edges {
			match (ids.get(&edge.source), ids.get(&edge.target)) {
				(Some(&src), Some(&tgt)) => {
					graph.add_edge(src, tgt, EdgeData::default());
					edges.push(EdgeRecord {
						id: edge.id.clone(),
						source: src,
						target: tgt,
						label: edge.label.clone(),
						category: ReactionCategory::classify(&edge.label),
					});
				}
				_ => debug!(
					"edge {} references a missing compound ({} -> {}); not drawn",
					edge.id, edge.source, edge.target
				),
			}
		}

		let mut state = Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			highlight: Highlight::default(),
			selection: Selection::None,
			theme: ThemeMode::default(),
			width,
			height,
			flow_time: 0.0,
			relax_remaining: 0.0,
			ids,
		};
		match viewport {
			Some(vp) => state.set_viewport(vp),
			None => state.fit_to_content(),
		}
		state
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Centre of every node, keyed by graph index.
	pub fn node_centers(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	pub fn node_center(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	/// Topmost card under the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if dx.abs() <= NODE_WIDTH / 2.0 && dy.abs() <= NODE_HEIGHT / 2.0 {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<&EdgeRecord> {
		let p = self.screen_to_graph(sx, sy);
		let tolerance = EDGE_HIT_PX / self.transform.k;
		let centers = self.node_centers();
		self.edges
			.iter()
			.filter_map(|e| {
				let (a, b) = (centers.get(&e.source)?, centers.get(&e.target)?);
				let (pa, pb) = edge_endpoints(*a, *b, NODE_WIDTH, NODE_HEIGHT);
				let d = distance_to_segment(p, pa, pb);
				(d <= tolerance).then_some((d, e))
			})
			.min_by(|x, y| x.0.total_cmp(&y.0))
			.map(|(_, e)| e)
	}

	pub fn move_node(&mut self, idx: DefaultNodeIdx, x: f32, y: f32) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = x;
				node.data.y = y;
			}
		});
	}

	pub fn positions_by_id(&self) -> HashMap<String, Position> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(
				node.data.user_data.id.clone(),
				Position {
					x: node.x() as f64,
					y: node.y() as f64,
				},
			);
		});
		out
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			let (nx, ny) = self.node_center(idx).unwrap_or_default();
			self.drag = DragState {
				active: true,
				moved: false,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				node_start_x: nx as f32,
				node_start_y: ny as f32,
			};
		} else {
			self.pan = PanState {
				active: true,
				moved: false,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			self.hover = self.node_at_position(x, y);
		}

		if self.drag.active {
			let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
			if dx.hypot(dy) > CLICK_SLOP_PX {
				self.drag.moved = true;
			}
			if let (true, Some(idx)) = (self.drag.moved, self.drag.node_idx) {
				let (nx, ny) = (
					self.drag.node_start_x + (dx / self.transform.k) as f32,
					self.drag.node_start_y + (dy / self.transform.k) as f32,
				);
				self.move_node(idx, nx, ny);
			}
		} else if self.pan.active {
			let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
			if dx.hypot(dy) > CLICK_SLOP_PX {
				self.pan.moved = true;
			}
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	pub fn pointer_up(&mut self, x: f64, y: f64) -> Release {
		let release = if self.drag.active {
			match (self.drag.moved, self.drag.node_idx) {
				(true, _) => Release::MovedNode,
				(false, Some(idx)) => self
					.node_id(idx)
					.map_or(Release::Nothing, Release::ClickedNode),
				(false, None) => Release::Nothing,
			}
		} else if self.pan.active {
			if self.pan.moved {
				Release::Panned
			} else {
				match self.edge_at_position(x, y) {
					Some(edge) => Release::ClickedEdge(edge.id.clone()),
					None => Release::ClickedBackground,
				}
			}
		} else {
			Release::Nothing
		};
		self.cancel_pointer();
		release
	}

	pub fn cancel_pointer(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	/// Zoom by `factor` keeping the screen point under the cursor fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn viewport(&self) -> Viewport {
		Viewport {
			x: self.transform.x,
			y: self.transform.y,
			zoom: self.transform.k,
		}
	}

	pub fn set_viewport(&mut self, vp: Viewport) {
		self.transform = ViewTransform {
			x: vp.x,
			y: vp.y,
			k: vp.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
		};
	}

	/// Fit every card into the canvas, never zooming in past 1.
	pub fn fit_to_content(&mut self) {
		let centers = self.node_centers();
		if centers.is_empty() {
			return;
		}
		let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
		for (x, y) in centers.values() {
			x0 = x0.min(x - NODE_WIDTH / 2.0);
			y0 = y0.min(y - NODE_HEIGHT / 2.0);
			x1 = x1.max(x + NODE_WIDTH / 2.0);
			y1 = y1.max(y + NODE_HEIGHT / 2.0);
		}
		let k = ((self.width * 0.9) / (x1 - x0))
			.min((self.height * 0.9) / (y1 - y0))
			.clamp(MIN_ZOOM, 1.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - (x0 + x1) / 2.0 * k,
			y: self.height / 2.0 - (y0 + y1) / 2.0 * k,
			k,
		};
	}

	/// Centre the view on a compound, zooming in to at least 0.8.
	pub fn focus(&mut self, id: &str) -> bool {
		let Some(&idx) = self.ids.get(id) else {
			return false;
		};
		let Some((x, y)) = self.node_center(idx) else {
			return false;
		};
		let k = self.transform.k.max(0.8);
		self.transform = ViewTransform {
			x: self.width / 2.0 - x * k,
			y: self.height / 2.0 - y * k,
			k,
		};
		true
	}

	/// Let the force simulation move every card for a while.
	pub fn relax(&mut self) {
		self.relax_remaining = RELAX_SECONDS;
		self.graph.visit_nodes_mut(|node| node.data.is_anchor = false);
	}

	pub fn is_relaxing(&self) -> bool {
		self.relax_remaining > 0.0
	}

	/// Advance one frame. Returns true on the frame relaxation finishes, so
	/// the caller can persist the settled positions.
	pub fn tick(&mut self, dt: f64) -> bool {
		self.flow_time += dt;
		if !self.is_relaxing() {
			return false;
		}
		self.graph.update(dt as f32);
		self.relax_remaining -= dt;
		if self.relax_remaining > 0.0 {
			return false;
		}
		self.relax_remaining = 0.0;
		self.graph.visit_nodes_mut(|node| node.data.is_anchor = true);
		true
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn data() -> Dataset {
		Dataset::from_json(
			r#"{
				"nodes": [
					{ "id": "a", "position": { "x": 0, "y": 0 }, "data": { "label": "A", "smiles": "C" } },
					{ "id": "b", "position": { "x": 600, "y": 0 }, "data": { "label": "B", "smiles": "CC" } },
					{ "id": "c", "data": { "label": "C" } }
				],
				"edges": [
					{ "id": "ab", "source": "a", "target": "b", "label": "Oxidation" },
					{ "id": "ax", "source": "a", "target": "missing" }
				]
			}"#,
		)
		.unwrap()
	}

	fn state() -> GraphCanvasState {
		let vp = Viewport {
			x: 100.0,
			y: 300.0,
			zoom: 1.0,
		};
		GraphCanvasState::new(&data(), Some(vp), 1000.0, 600.0)
	}

	#[test]
	fn dangling_edges_are_skipped() {
		let s = state();
		assert_eq!(s.edges.len(), 1);
		assert_eq!(s.edges[0].category, ReactionCategory::Oxidation);
	}

	#[test]
	fn unpositioned_nodes_get_a_layout() {
		let s = state();
		let pos = s.positions_by_id();
		assert_eq!(pos.len(), 3);
		assert_eq!(pos["b"], Position { x: 600.0, y: 0.0 });
	}

	#[test]
	fn clicking_a_card_reports_its_id() {
		let mut s = state();
		// Node "a" sits at screen (100, 300).
		s.pointer_down(110.0, 310.0);
		assert_eq!(s.pointer_up(110.0, 310.0), Release::ClickedNode("a".into()));
	}

	#[test]
	fn dragging_moves_the_card_in_graph_units() {
		let mut s = state();
		s.transform.k = 2.0;
		s.transform.x = 100.0;
		s.transform.y = 300.0;
		s.pointer_down(100.0, 300.0);
		s.pointer_move(140.0, 300.0);
		assert_eq!(s.pointer_up(140.0, 300.0), Release::MovedNode);
		assert_eq!(s.positions_by_id()["a"], Position { x: 20.0, y: 0.0 });
	}

	#[test]
	fn clicking_near_an_edge_selects_it() {
		let mut s = state();
		// Edge runs from a's right handle (190, 300) to b's left handle (610, 300).
		s.pointer_down(400.0, 305.0);
		assert_eq!(s.pointer_up(400.0, 305.0), Release::ClickedEdge("ab".into()));
	}

	#[test]
	fn background_click_and_pan() {
		let mut s = state();
		s.pointer_down(400.0, 500.0);
		assert_eq!(s.pointer_up(400.0, 500.0), Release::ClickedBackground);

		s.pointer_down(400.0, 500.0);
		s.pointer_move(450.0, 520.0);
		assert_eq!(s.pointer_up(450.0, 520.0), Release::Panned);
		assert_eq!((s.transform.x, s.transform.y), (150.0, 320.0));
	}

	#[test]
	fn zoom_keeps_cursor_anchor_and_clamps() {
		let mut s = state();
		let before = s.screen_to_graph(300.0, 200.0);
		s.zoom_at(300.0, 200.0, 1.5);
		let after = s.screen_to_graph(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		for _ in 0..100 {
			s.zoom_at(0.0, 0.0, 10.0);
		}
		assert_eq!(s.transform.k, MAX_ZOOM);
	}

	#[test]
	fn viewport_round_trips_through_state() {
		let s = state();
		assert_eq!(
			s.viewport(),
			Viewport {
				x: 100.0,
				y: 300.0,
				zoom: 1.0
			}
		);
	}

	#[test]
	fn focus_centres_node() {
		let mut s = state();
		assert!(s.focus("b"));
		let (sx, sy) = (600.0 * s.transform.k + s.transform.x, s.transform.y);
		assert!((sx - 500.0).abs() < 1e-9 && (sy - 300.0).abs() < 1e-9);
		assert!(!s.focus("nope"));
	}

	#[test]
	fn relax_reanchors_and_signals_completion() {
		let mut s = state();
		s.relax();
		assert!(s.is_relaxing());
		let mut finished = 0;
		for _ in 0..((RELAX_SECONDS / 0.05) as usize + 2) {
			if s.tick(0.05) {
				finished += 1;
			}
		}
		assert_eq!(finished, 1);
		assert!(!s.is_relaxing());
	}
}
