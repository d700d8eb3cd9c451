//! Best-effort on-device storage for layout, viewport and theme.
//!
//! Every read treats a missing or unparsable entry as a cache miss and every
//! write swallows failures after logging them.

#[cfg(test)]
use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, warn};

use super::model::{Compound, CompoundData, Dataset, Position, Viewport};
use crate::config::{LAYOUT_KEY, THEME_KEY, VIEWPORT_KEY};
use crate::theme::ThemeMode;

/// Minimal string key-value store.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&self, key: &str, value: &str) -> Result<(), String>;
	fn remove(&self, key: &str);
}

/// `window.localStorage`, or nothing when it is unavailable (private mode,
/// sandboxed iframes).
pub struct BrowserStore {
	storage: Option<web_sys::Storage>,
}

impl BrowserStore {
	pub fn new() -> Self {
		let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
		if storage.is_none() {
			debug!("localStorage unavailable; layout will not persist");
		}
		Self { storage }
	}
}

impl KeyValueStore for BrowserStore {
	fn get(&self, key: &str) -> Option<String> {
		self.storage.as_ref()?.get_item(key).ok().flatten()
	}

	fn set(&self, key: &str, value: &str) -> Result<(), String> {
		let Some(storage) = &self.storage else {
			return Err("no storage".into());
		};
		storage
			.set_item(key, value)
			.map_err(|e| format!("{:?}", e))
	}

	fn remove(&self, key: &str) {
		if let Some(storage) = &self.storage {
			let _ = storage.remove_item(key);
		}
	}
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
	entries: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.borrow().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) -> Result<(), String> {
		self.entries
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) {
		self.entries.borrow_mut().remove(key);
	}
}

pub struct LayoutStore<S> {
	store: S,
}

impl LayoutStore<BrowserStore> {
	pub fn browser() -> Self {
		Self::new(BrowserStore::new())
	}
}

impl<S: KeyValueStore> LayoutStore<S> {
	pub fn new(store: S) -> Self {
		Self { store }
	}

	/// Baseline dataset with the stored snapshot merged on top. Falls back
	/// to a plain copy of the baseline when nothing usable is stored.
	pub fn load_layout(&self, baseline: &Dataset) -> Dataset {
		let Some(raw) = self.store.get(LAYOUT_KEY) else {
			return baseline.clone();
		};
		match serde_json::from_str::<Dataset>(&raw) {
			Ok(stored) => merge_layout(baseline, &stored),
			Err(e) => {
				debug!("discarding corrupt layout snapshot: {}", e);
				baseline.clone()
			}
		}
	}

	/// Write live positions merged onto the baseline so metadata survives.
	pub fn save_positions(&self, baseline: &Dataset, positions: &HashMap<String, Position>) {
		let mut snapshot = baseline.clone();
		for node in &mut snapshot.nodes {
			if let Some(p) = positions.get(&node.id) {
				node.position = Some(*p);
			}
		}
		self.write_json(LAYOUT_KEY, &snapshot);
	}

	pub fn clear_layout(&self) {
		self.store.remove(LAYOUT_KEY);
	}

	pub fn load_viewport(&self) -> Option<Viewport> {
		let raw = self.store.get(VIEWPORT_KEY)?;
		serde_json::from_str::<Viewport>(&raw)
			.ok()
			.filter(Viewport::is_valid)
	}

	pub fn save_viewport(&self, viewport: &Viewport) {
		if viewport.is_valid() {
			self.write_json(VIEWPORT_KEY, viewport);
		}
	}

	pub fn load_theme(&self) -> Option<ThemeMode> {
		ThemeMode::parse(&self.store.get(THEME_KEY)?)
	}

	pub fn save_theme(&self, mode: ThemeMode) {
		if let Err(e) = self.store.set(THEME_KEY, mode.as_str()) {
			warn!("failed to persist theme: {}", e);
		}
	}

	fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) {
		let json = match serde_json::to_string(value) {
			Ok(json) => json,
			Err(e) => {
				warn!("failed to encode {}: {}", key, e);
				return;
			}
		};
		if let Err(e) = self.store.set(key, &json) {
			warn!("failed to persist {}: {}", key, e);
		}
	}
}

/// Merge a stored snapshot onto the baseline. Baseline edges and node set
/// win; stored nodes contribute positions and non-empty edited metadata.
pub fn merge_layout(baseline: &Dataset, stored: &Dataset) -> Dataset {
	let stored_nodes: HashMap<&str, &Compound> =
		stored.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

	let nodes = baseline
		.nodes
		.iter()
		.map(|base| match stored_nodes.get(base.id.as_str()) {
			Some(saved) => Compound {
				id: base.id.clone(),
				position: saved
					.position
					.filter(|p| p.x.is_finite() && p.y.is_finite())
					.or(base.position),
				data: merge_data(&base.data, &saved.data),
			},
			None => base.clone(),
		})
		.collect();

	Dataset {
		nodes,
		edges: baseline.edges.clone(),
	}
}

fn merge_data(base: &CompoundData, saved: &CompoundData) -> CompoundData {
	fn pick(saved: &str, base: &str) -> String {
		if saved.is_empty() { base } else { saved }.to_string()
	}
	CompoundData {
		label: pick(&saved.label, &base.label),
		smiles: pick(&saved.smiles, &base.smiles),
		formula: pick(&saved.formula, &base.formula),
		iupac_name: pick(&saved.iupac_name, &base.iupac_name),
		notes: pick(&saved.notes, &base.notes),
		properties: if saved.properties.is_empty() {
			base.properties.clone()
		} else {
			saved.properties.clone()
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::model::Reaction;

	fn baseline() -> Dataset {
		Dataset {
			nodes: vec![
				Compound {
					id: "a".into(),
					position: Some(Position { x: 1.0, y: 2.0 }),
					data: CompoundData {
						label: "Ethanol".into(),
						smiles: "CCO".into(),
						notes: "primary alcohol".into(),
						..Default::default()
					},
				},
				Compound {
					id: "b".into(),
					position: None,
					data: CompoundData {
						label: "Ethanal".into(),
						smiles: "CC=O".into(),
						..Default::default()
					},
				},
			],
			edges: vec![Reaction {
				id: "e".into(),
				source: "a".into(),
				target: "b".into(),
				label: "Oxidation".into(),
				data: Default::default(),
			}],
		}
	}

	#[test]
	fn positions_round_trip() {
		let store = LayoutStore::new(MemoryStore::default());
		let base = baseline();
		let mut live = HashMap::new();
		live.insert("a".to_string(), Position { x: 10.125, y: -3.5 });
		live.insert("b".to_string(), Position { x: 1e-7, y: 123456.789 });
		store.save_positions(&base, &live);

		let loaded = store.load_layout(&base);
		for (id, p) in &live {
			let q = loaded.node(id).and_then(|n| n.position).unwrap();
			assert!((p.x - q.x).abs() < 1e-9 && (p.y - q.y).abs() < 1e-9);
		}
		assert_eq!(store.load_layout(&base).node("a").unwrap().data.notes, "primary alcohol");
	}

	#[test]
	fn missing_or_corrupt_layout_is_a_cache_miss() {
		let store = LayoutStore::new(MemoryStore::default());
		let base = baseline();
		assert_eq!(store.load_layout(&base), base);

		store.store.set(LAYOUT_KEY, "{not json").unwrap();
		assert_eq!(store.load_layout(&base), base);
	}

	#[test]
	fn merge_keeps_baseline_edges_and_drops_unknown_nodes() {
		let base = baseline();
		let mut stored = base.clone();
		stored.edges.clear();
		stored.nodes.push(Compound {
			id: "ghost".into(),
			position: None,
			data: Default::default(),
		});
		stored.nodes[1].data.label = "Acetaldehyde".into();
		stored.nodes[0].data.smiles.clear();

		let merged = merge_layout(&base, &stored);
		assert_eq!(merged.edges, base.edges);
		assert!(merged.node("ghost").is_none());
		assert_eq!(merged.node("b").unwrap().data.label, "Acetaldehyde");
		assert_eq!(merged.node("a").unwrap().data.smiles, "CCO");
	}

	#[test]
	fn viewport_round_trip_and_rejects_garbage() {
		let store = LayoutStore::new(MemoryStore::default());
		assert_eq!(store.load_viewport(), None);
		let vp = Viewport { x: -40.0, y: 12.5, zoom: 0.75 };
		store.save_viewport(&vp);
		assert_eq!(store.load_viewport(), Some(vp));

		store.store.set(VIEWPORT_KEY, r#"{"x":0,"y":0,"zoom":-1}"#).unwrap();
		assert_eq!(store.load_viewport(), None);
	}

	#[test]
	fn theme_round_trip() {
		let store = LayoutStore::new(MemoryStore::default());
		assert_eq!(store.load_theme(), None);
		store.save_theme(ThemeMode::Light);
		assert_eq!(store.store.get(THEME_KEY).as_deref(), Some("light"));
		assert_eq!(store.load_theme(), Some(ThemeMode::Light));
	}

	#[test]
	fn clear_layout_forgets_snapshot() {
		let store = LayoutStore::new(MemoryStore::default());
		let base = baseline();
		let mut live = HashMap::new();
		live.insert("b".to_string(), Position { x: 5.0, y: 5.0 });
		store.save_positions(&base, &live);
		store.clear_layout();
		assert_eq!(store.load_layout(&base).node("b").unwrap().position, None);
	}
}
