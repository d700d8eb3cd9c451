use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::element::Element;

#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
	pub element: Element,
	pub aromatic: bool,
	pub charge: i8,
	pub isotope: u16,
	/// Implicit plus bracket hydrogens; never graph nodes.
	pub hydrogens: u8,
	pub bracket: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BondOrder {
	Single,
	Double,
	Triple,
	Aromatic,
}

impl BondOrder {
	/// Contribution to the valence sum; aromatic bonds count as one.
	pub fn valence(self) -> u8 {
		match self {
			Self::Single | Self::Aromatic => 1,
			Self::Double => 2,
			Self::Triple => 3,
		}
	}

	/// Number of parallel strokes used to draw the bond.
	pub fn lines(self) -> usize {
		match self {
			Self::Single | Self::Aromatic => 1,
			Self::Double => 2,
			Self::Triple => 3,
		}
	}
}

/// Parsed molecular graph.
#[derive(Clone, Debug, Default)]
pub struct Molecule {
	graph: UnGraph<Atom, BondOrder>,
}

impl Molecule {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
		self.graph.add_node(atom)
	}

	pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, order: BondOrder) -> EdgeIndex {
		self.graph.add_edge(a, b, order)
	}

	pub fn atom(&self, idx: NodeIndex) -> &Atom {
		&self.graph[idx]
	}

	pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut Atom {
		&mut self.graph[idx]
	}

	pub fn atom_count(&self) -> usize {
		self.graph.node_count()
	}

	pub fn bond_count(&self) -> usize {
		self.graph.edge_count()
	}

	pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<BondOrder> {
		self.graph.find_edge(a, b).map(|e| self.graph[e])
	}

	/// `(a, b, order)` for every bond, by atom index.
	pub fn bonds(&self) -> impl Iterator<Item = (usize, usize, BondOrder)> + '_ {
		self.graph
			.edge_references()
			.map(|e| (e.source().index(), e.target().index(), *e.weight()))
	}

	/// Sorted neighbour lists indexed by atom.
	pub fn adjacency(&self) -> Vec<Vec<usize>> {
		let mut adj = vec![Vec::new(); self.atom_count()];
		for (a, b, _) in self.bonds() {
			adj[a].push(b);
			adj[b].push(a);
		}
		for list in &mut adj {
			list.sort_unstable();
		}
		adj
	}

	/// Sum of bond valences on `idx`.
	pub fn bond_valence(&self, idx: NodeIndex) -> u32 {
		self.graph
			.edges(idx)
			.fold(0u32, |acc, e| acc.saturating_add(u32::from(e.weight().valence())))
	}

	/// Hill-order molecular formula, e.g. `C2H6O`.
	pub fn formula(&self) -> String {
		use std::collections::BTreeMap;
		let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
		let mut carbon = 0u32;
		let mut hydrogen = 0u32;
		for atom in self.graph.node_weights() {
			hydrogen += atom.hydrogens as u32;
			match atom.element {
				Element::C => carbon += 1,
				Element::H => hydrogen += 1,
				Element::WILDCARD => {}
				e => *counts.entry(e.symbol()).or_default() += 1,
			}
		}
		let mut out = String::new();
		let mut push = |sym: &str, n: u32| {
			if n == 1 {
				out.push_str(sym);
			} else if n > 1 {
				out.push_str(&format!("{}{}", sym, n));
			}
		};
		if carbon > 0 {
			push("C", carbon);
			push("H", hydrogen);
			for (sym, n) in counts {
				push(sym, n);
			}
		} else {
			counts.insert("H", hydrogen);
			for (sym, n) in counts {
				push(sym, n);
			}
		}
		out
	}
}
