//! Selected node or edge, search query, and the highlight sets derived from
//! them.

use std::collections::HashSet;

use crate::data::{Compound, Dataset, Reaction};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	None,
	Node(String),
	Edge(String),
}

/// Node and edge selection are mutually exclusive; the enum enforces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionStore {
	selection: Selection,
	query: String,
}

/// Ids to emphasise. When `active` is false everything renders normally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlight {
	pub active: bool,
	pub nodes: HashSet<String>,
	pub edges: HashSet<String>,
}

impl Highlight {
	pub fn shows_node(&self, id: &str) -> bool {
		!self.active || self.nodes.contains(id)
	}

	pub fn shows_edge(&self, id: &str) -> bool {
		!self.active || self.edges.contains(id)
	}
}

impl SelectionStore {
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	pub fn selected_node(&self) -> Option<&str> {
		match &self.selection {
			Selection::Node(id) => Some(id),
			_ => None,
		}
	}

	pub fn selected_edge(&self) -> Option<&str> {
		match &self.selection {
			Selection::Edge(id) => Some(id),
			_ => None,
		}
	}

	pub fn select_node(&mut self, id: impl Into<String>) {
		self.selection = Selection::Node(id.into());
	}

	pub fn select_edge(&mut self, id: impl Into<String>) {
		self.selection = Selection::Edge(id.into());
	}

	pub fn clear(&mut self) {
		self.selection = Selection::None;
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn set_query(&mut self, query: impl Into<String>) {
		self.query = query.into();
	}

	/// Compounds matching the search query, in dataset order. An empty query
	/// matches everything.
	pub fn search<'a>(&self, data: &'a Dataset) -> Vec<&'a Compound> {
		let needle = self.needle();
		data.nodes
			.iter()
			.filter(|n| needle.is_empty() || compound_matches(n, &needle))
			.collect()
	}

	pub fn highlight(&self, data: &Dataset) -> Highlight {
		let mut hl = Highlight::default();

		match &self.selection {
			Selection::None => {}
			Selection::Node(id) => {
				hl.active = true;
				hl.nodes.insert(id.clone());
				for edge in data.edges.iter().filter(|e| &e.source == id || &e.target == id) {
					hl.edges.insert(edge.id.clone());
					hl.nodes.insert(edge.source.clone());
					hl.nodes.insert(edge.target.clone());
				}
			}
			Selection::Edge(id) => {
				hl.active = true;
				hl.edges.insert(id.clone());
				if let Some(edge) = data.edge(id) {
					hl.nodes.insert(edge.source.clone());
					hl.nodes.insert(edge.target.clone());
				}
			}
		}

		let needle = self.needle();
		if !needle.is_empty() {
			hl.active = true;
			for node in data.nodes.iter().filter(|n| compound_matches(n, &needle)) {
				hl.nodes.insert(node.id.clone());
			}
			for edge in data.edges.iter().filter(|e| reaction_matches(e, &needle)) {
				hl.edges.insert(edge.id.clone());
			}
		}
		hl
	}

	fn needle(&self) -> String {
		self.query.trim().to_lowercase()
	}
}

fn compound_matches(node: &Compound, needle: &str) -> bool {
	[
		node.id.as_str(),
		&node.data.label,
		&node.data.formula,
		&node.data.iupac_name,
	]
	.iter()
	.any(|field| field.to_lowercase().contains(needle))
}

fn reaction_matches(edge: &Reaction, needle: &str) -> bool {
	[edge.label.as_str(), &edge.data.reagents, &edge.data.conditions]
		.iter()
		.any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn data() -> Dataset {
		Dataset::from_json(
			r#"{
				"nodes": [
					{ "id": "ethanol", "data": { "label": "Ethanol", "formula": "C2H6O" } },
					{ "id": "ethanal", "data": { "label": "Ethanal", "formula": "C2H4O" } },
					{ "id": "ethanoic_acid", "data": { "label": "Ethanoic acid" } },
					{ "id": "ethene", "data": { "label": "Ethene" } }
				],
				"edges": [
					{ "id": "ox1", "source": "ethanol", "target": "ethanal", "label": "Oxidation",
					  "data": { "reagents": "K2Cr2O7 / H+" } },
					{ "id": "ox2", "source": "ethanal", "target": "ethanoic_acid", "label": "Oxidation" },
					{ "id": "hyd", "source": "ethene", "target": "ethanol", "label": "Hydration" }
				]
			}"#,
		)
		.unwrap()
	}

	#[test]
	fn node_and_edge_selection_are_exclusive() {
		let mut store = SelectionStore::default();
		store.select_edge("ox1");
		store.select_node("ethanol");
		assert_eq!(store.selected_node(), Some("ethanol"));
		assert_eq!(store.selected_edge(), None);
		store.select_edge("ox2");
		assert_eq!(store.selected_node(), None);
		assert_eq!(store.selected_edge(), Some("ox2"));
		store.clear();
		assert_eq!(store.selection(), &Selection::None);
	}

	#[test]
	fn selected_node_highlights_neighbourhood() {
		let mut store = SelectionStore::default();
		store.select_node("ethanol");
		let hl = store.highlight(&data());
		assert!(hl.active);
		assert_eq!(hl.edges, HashSet::from(["ox1".to_string(), "hyd".to_string()]));
		assert!(hl.shows_node("ethene") && hl.shows_node("ethanal"));
		assert!(!hl.shows_node("ethanoic_acid"));
	}

	#[test]
	fn selected_edge_highlights_endpoints() {
		let mut store = SelectionStore::default();
		store.select_edge("ox2");
		let hl = store.highlight(&data());
		assert_eq!(hl.nodes.len(), 2);
		assert!(hl.shows_edge("ox2") && !hl.shows_edge("ox1"));
	}

	#[test]
	fn no_selection_shows_everything() {
		let hl = SelectionStore::default().highlight(&data());
		assert!(!hl.active);
		assert!(hl.shows_node("anything") && hl.shows_edge("anything"));
	}

	#[test]
	fn query_matches_case_insensitively() {
		let mut store = SelectionStore::default();
		store.set_query("  ETHAN");
		let data = data();
		let ids: Vec<&str> = store.search(&data).iter().map(|c| c.id.as_str()).collect();
		assert_eq!(ids, vec!["ethanol", "ethanal", "ethanoic_acid"]);

		store.set_query("cr2o7");
		let hl = store.highlight(&data);
		assert_eq!(hl.edges, HashSet::from(["ox1".to_string()]));
		assert!(hl.nodes.is_empty());
	}

	#[test]
	fn empty_query_lists_all() {
		let store = SelectionStore::default();
		assert_eq!(store.search(&data()).len(), 4);
	}
}
