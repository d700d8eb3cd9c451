use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundData {
	pub label: String,
	pub smiles: String,
	pub formula: String,
	#[serde(rename = "iupacName", alias = "iupac_name")]
	pub iupac_name: String,
	pub notes: String,
	pub properties: Vec<String>,
}

/// A graph node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Compound {
	pub id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<Position>,
	#[serde(default)]
	pub data: CompoundData,
}

impl Compound {
	/// Label for display, falling back to the id.
	pub fn display_label(&self) -> &str {
		if self.data.label.is_empty() {
			&self.id
		} else {
			&self.data.label
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionData {
	pub reagents: String,
	pub conditions: String,
	pub mechanism: String,
	pub equation: String,
}

/// A directed graph edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub data: ReactionData,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
	#[serde(default)]
	pub nodes: Vec<Compound>,
	#[serde(default)]
	pub edges: Vec<Reaction>,
}

impl Dataset {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	pub fn node(&self, id: &str) -> Option<&Compound> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn edge(&self, id: &str) -> Option<&Reaction> {
		self.edges.iter().find(|e| e.id == id)
	}

	/// Edges whose endpoints do not name a node. These are left in the
	/// dataset and simply not drawn.
	pub fn dangling_edges(&self) -> Vec<&Reaction> {
		let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		self.edges
			.iter()
			.filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
			.collect()
	}

}

/// Pan/zoom of the graph canvas, stored as `{x, y, zoom}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
	pub x: f64,
	pub y: f64,
	pub zoom: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			zoom: 1.0,
		}
	}
}

impl Viewport {
	/// Zoom must be finite and positive to be usable.
	pub fn is_valid(&self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"nodes": [
			{ "id": "benzene", "position": { "x": 0, "y": 0 },
			  "data": { "label": "Benzene", "smiles": "c1ccccc1", "formula": "C6H6", "iupacName": "benzene" } },
			{ "id": "nitrobenzene", "data": { "label": "Nitrobenzene", "smiles": "c1ccc(cc1)[N+](=O)[O-]" } }
		],
		"edges": [
			{ "id": "e1", "source": "benzene", "target": "nitrobenzene", "label": "Nitration",
			  "data": { "reagents": "conc. HNO3, conc. H2SO4", "conditions": "50 °C" } },
			{ "id": "e2", "source": "benzene", "target": "phenol" }
		]
	}"#;

	#[test]
	fn parses_document_with_optional_fields() {
		let ds = Dataset::from_json(SAMPLE).unwrap();
		assert_eq!(ds.nodes.len(), 2);
		assert_eq!(ds.nodes[0].data.iupac_name, "benzene");
		assert_eq!(ds.nodes[1].position, None);
		assert_eq!(ds.edge("e1").unwrap().data.conditions, "50 °C");
		assert_eq!(ds.edge("e2").unwrap().label, "");
	}

	#[test]
	fn dangling_edges_are_reported_not_rejected() {
		let ds = Dataset::from_json(SAMPLE).unwrap();
		let dangling = ds.dangling_edges();
		assert_eq!(dangling.len(), 1);
		assert_eq!(dangling[0].id, "e2");
	}

	#[test]
	fn display_label_falls_back_to_id() {
		let ds = Dataset::from_json(r#"{"nodes":[{"id":"x"}]}"#).unwrap();
		assert_eq!(ds.nodes[0].display_label(), "x");
		assert!(ds.edges.is_empty());
	}

	#[test]
	fn viewport_validity() {
		assert!(Viewport::default().is_valid());
		assert!(!Viewport { x: 0.0, y: f64::NAN, zoom: 1.0 }.is_valid());
		assert!(!Viewport { x: 0.0, y: 0.0, zoom: 0.0 }.is_valid());
	}
}
