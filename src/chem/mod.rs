//! Structure notation parsing and drawing.

pub mod conformer;
pub mod depict;
pub mod element;
pub mod molecule;
pub mod smiles;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

pub use depict::Depiction;
pub use smiles::NotationError;

type Drawn = Rc<Result<Depiction, NotationError>>;

thread_local! {
	static DEPICTIONS: RefCell<HashMap<String, Drawn>> = RefCell::new(HashMap::new());
}

/// Memoised parse + layout. Nothing is computed until a structure is first
/// drawn, and each notation string is laid out once per session.
pub fn depiction_for(smiles: &str) -> Drawn {
	let key = smiles.trim();
	if let Some(hit) = DEPICTIONS.with(|cache| cache.borrow().get(key).cloned()) {
		return hit;
	}
	let drawn: Drawn = Rc::new(smiles::parse(key).map(|mol| {
		debug!("depicting '{}': {} atoms, {} bonds", key, mol.atom_count(), mol.bond_count());
		depict::depict(&mol)
	}));
	if let Err(e) = drawn.as_ref() {
		debug!("structure '{}' not drawable: {}", key, e);
	}
	DEPICTIONS.with(|cache| cache.borrow_mut().insert(key.to_string(), drawn.clone()));
	drawn
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cache_returns_same_allocation() {
		let a = depiction_for("CCO");
		let b = depiction_for(" CCO ");
		assert!(Rc::ptr_eq(&a, &b));
		assert!(a.is_ok());
	}

	#[test]
	fn malformed_input_is_cached_as_error() {
		let a = depiction_for("C1CC");
		assert!(matches!(a.as_ref(), Err(NotationError::UnclosedRing { .. })));
	}

	#[test]
	fn arbitrary_input_never_panics() {
		for s in ["", "(", ")", "[", "]", "%", "%1", "C%", "1", "c1", "[C@@H+2:]", "C=#C", "@@", "C.C.", "Cc(", "[2H]"] {
			let _ = depiction_for(s);
		}
		let _ = depiction_for(&format!("[C{}]", "+".repeat(130)));
		let _ = depiction_for(&format!("C{}", "(#C)".repeat(90)));
		let _ = depiction_for("[70000C]");
	}

	#[test]
	fn bundled_dataset_structures_match_declared_formulas() {
		let data = crate::data::Dataset::from_json(include_str!("../../public/data/organic_chemistry_data.json")).unwrap();
		assert!(data.dangling_edges().is_empty());
		for node in &data.nodes {
			let mol = smiles::parse(&node.data.smiles).unwrap();
			assert_eq!(mol.formula(), node.data.formula, "{}", node.id);
		}
	}
}
