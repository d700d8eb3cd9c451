//! SMILES reader covering the organic subset, bracket atoms, branches, ring
//! closures (including `%nn`) and disconnected fragments. Stereo marks are
//! accepted and ignored.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use thiserror::Error;

use super::element::Element;
use super::molecule::{Atom, BondOrder, Molecule};

/// Largest formal charge magnitude a bracket atom may carry.
const MAX_CHARGE: i8 = 15;

/// Positions are character offsets into the trimmed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
	#[error("empty structure string")]
	Empty,
	#[error("unexpected end of structure string")]
	UnexpectedEnd,
	#[error("unexpected character '{ch}' at position {pos}")]
	UnexpectedChar { pos: usize, ch: char },
	#[error("unknown element '{text}' at position {pos}")]
	UnknownElement { pos: usize, text: String },
	#[error("unclosed bracket atom at position {pos}")]
	UnclosedBracket { pos: usize },
	#[error("unclosed ring {digit}")]
	UnclosedRing { digit: u16 },
	#[error("unmatched parenthesis at position {pos}")]
	UnmatchedParen { pos: usize },
	#[error("conflicting bonds on ring closure {digit}")]
	RingBondConflict { digit: u16 },
	#[error("invalid ring closure {digit} at position {pos}")]
	InvalidRingBond { digit: u16, pos: usize },
	#[error("charge out of range at position {pos}")]
	ChargeOutOfRange { pos: usize },
	#[error("isotope out of range at position {pos}")]
	IsotopeOutOfRange { pos: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BondSymbol {
	Single,
	Double,
	Triple,
	Aromatic,
	/// `/` and `\`; single bonds with a direction we do not use.
	Directional,
}

struct OpenRing {
	atom: NodeIndex,
	bond: Option<BondSymbol>,
}

struct Reader {
	chars: Vec<char>,
	pos: usize,
	mol: Molecule,
	prev: Option<NodeIndex>,
	branches: Vec<(Option<NodeIndex>, usize)>,
	pending: Option<(BondSymbol, usize)>,
	rings: HashMap<u16, OpenRing>,
}

/// Parse a SMILES string into a molecule with implicit hydrogens resolved.
pub fn parse(input: &str) -> Result<Molecule, NotationError> {
	let trimmed = input.trim();
	if trimmed.is_empty() {
		return Err(NotationError::Empty);
	}
	let mut reader = Reader {
		chars: trimmed.chars().collect(),
		pos: 0,
		mol: Molecule::new(),
		prev: None,
		branches: Vec::new(),
		pending: None,
		rings: HashMap::new(),
	};
	reader.run()?;
	let mut mol = reader.mol;
	assign_implicit_hydrogens(&mut mol);
	Ok(mol)
}

impl Reader {
	fn peek(&self, offset: usize) -> Option<char> {
		self.chars.get(self.pos + offset).copied()
	}

	fn run(&mut self) -> Result<(), NotationError> {
		while let Some(ch) = self.peek(0) {
			let pos = self.pos;
			match ch {
				// Anything after whitespace is a title.
				' ' | '\t' | '\r' | '\n' => break,
				'[' => {
					let atom = self.bracket_atom()?;
					self.attach(atom);
				}
				'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' | 'b' | 'c' | 'n' | 'o' | 'p' | 's' | '*' => {
					let atom = self.organic_atom()?;
					self.attach(atom);
				}
				'-' | '=' | '#' | ':' | '/' | '\\' => {
					if self.pending.is_some() || self.prev.is_none() {
						return Err(NotationError::UnexpectedChar { pos, ch });
					}
					let symbol = match ch {
						'-' => BondSymbol::Single,
						'=' => BondSymbol::Double,
						'#' => BondSymbol::Triple,
						':' => BondSymbol::Aromatic,
						_ => BondSymbol::Directional,
					};
					self.pending = Some((symbol, pos));
					self.pos += 1;
				}
				'(' => {
					if self.prev.is_none() || self.pending.is_some() {
						return Err(NotationError::UnexpectedChar { pos, ch });
					}
					self.branches.push((self.prev, pos));
					self.pos += 1;
				}
				')' => {
					if self.pending.is_some() {
						return Err(NotationError::UnexpectedChar { pos, ch });
					}
					let Some((atom, _)) = self.branches.pop() else {
						return Err(NotationError::UnmatchedParen { pos });
					};
					self.prev = atom;
					self.pos += 1;
				}
				'.' => {
					if self.pending.is_some() {
						return Err(NotationError::UnexpectedChar { pos, ch });
					}
					self.prev = None;
					self.pos += 1;
				}
				'0'..='9' | '%' => self.ring_closure()?,
				_ => return Err(NotationError::UnexpectedChar { pos, ch }),
			}
		}

		if let Some(&(_, pos)) = self.branches.last() {
			return Err(NotationError::UnmatchedParen { pos });
		}
		if self.pending.is_some() {
			return Err(NotationError::UnexpectedEnd);
		}
		if let Some(&digit) = self.rings.keys().min() {
			return Err(NotationError::UnclosedRing { digit });
		}
		Ok(())
	}

	fn attach(&mut self, atom: Atom) {
		let idx = self.mol.add_atom(atom);
		if let Some(prev) = self.prev {
			let symbol = self.pending.take().map(|(s, _)| s);
			let order = self.resolve(symbol, prev, idx);
			self.mol.add_bond(prev, idx, order);
		}
		self.prev = Some(idx);
	}

	fn resolve(&self, symbol: Option<BondSymbol>, a: NodeIndex, b: NodeIndex) -> BondOrder {
		match symbol {
			Some(BondSymbol::Double) => BondOrder::Double,
			Some(BondSymbol::Triple) => BondOrder::Triple,
			Some(BondSymbol::Aromatic) => BondOrder::Aromatic,
			Some(BondSymbol::Single) | Some(BondSymbol::Directional) => BondOrder::Single,
			None => {
				if self.mol.atom(a).aromatic && self.mol.atom(b).aromatic {
					BondOrder::Aromatic
				} else {
					BondOrder::Single
				}
			}
		}
	}

	fn organic_atom(&mut self) -> Result<Atom, NotationError> {
		let ch = self.chars[self.pos];
		let (symbol, aromatic, width) = match (ch, self.peek(1)) {
			('C', Some('l')) => ("Cl", false, 2),
			('B', Some('r')) => ("Br", false, 2),
			(c, _) if c.is_ascii_lowercase() => (lower_symbol(c), true, 1),
			('*', _) => ("*", false, 1),
			(c, _) => (upper_symbol(c), false, 1),
		};
		let element = Element::from_symbol(symbol).ok_or_else(|| NotationError::UnknownElement {
			pos: self.pos,
			text: symbol.to_string(),
		})?;
		self.pos += width;
		Ok(Atom {
			element,
			aromatic,
			charge: 0,
			isotope: 0,
			hydrogens: 0,
			bracket: false,
		})
	}

	fn bracket_atom(&mut self) -> Result<Atom, NotationError> {
		let start = self.pos;
		self.pos += 1;
		let unclosed = NotationError::UnclosedBracket { pos: start };

		let isotope_pos = self.pos;
		let isotope = u16::try_from(self.number().unwrap_or(0))
			.map_err(|_| NotationError::IsotopeOutOfRange { pos: isotope_pos })?;

		let first = self.peek(0).ok_or_else(|| unclosed.clone())?;
		let (element, aromatic) = if first.is_ascii_lowercase() {
			let two: String = [Some(first), self.peek(1)].iter().flatten().collect();
			if matches!(two.as_str(), "se" | "as" | "te") {
				self.pos += 2;
				let sym = format!("{}{}", two[..1].to_uppercase(), &two[1..]);
				(Element::from_symbol(&sym), true)
			} else {
				self.pos += 1;
				(Element::from_symbol(lower_symbol(first)), true)
			}
		} else if first.is_ascii_uppercase() || first == '*' {
			let two: Option<String> = self
				.peek(1)
				.filter(char::is_ascii_lowercase)
				.map(|second| format!("{}{}", first, second));
			match two.as_deref().and_then(Element::from_symbol) {
				Some(e) => {
					self.pos += 2;
					(Some(e), false)
				}
				None => {
					self.pos += 1;
					(Element::from_symbol(&first.to_string()), false)
				}
			}
		} else {
			return Err(NotationError::UnexpectedChar {
				pos: self.pos,
				ch: first,
			});
		};
		let element = element.ok_or_else(|| NotationError::UnknownElement {
			pos: start + 1,
			text: first.to_string(),
		})?;

		// Chirality: @, @@, and the long forms such as @TH1 or @SP2.
		if self.peek(0) == Some('@') {
			while self.peek(0) == Some('@') {
				self.pos += 1;
			}
			let class: String = [self.peek(0), self.peek(1)].iter().flatten().collect();
			if matches!(class.as_str(), "TH" | "AL" | "SP" | "TB" | "OH") {
				self.pos += 2;
				self.number();
			}
		}

		let mut hydrogens = 0u8;
		if self.peek(0) == Some('H') {
			self.pos += 1;
			hydrogens = self.digit().unwrap_or(1);
		}

		let mut charge: i8 = 0;
		if let Some(sign @ ('+' | '-')) = self.peek(0) {
			let unit: i8 = if sign == '+' { 1 } else { -1 };
			self.pos += 1;
			charge = unit;
			if let Some(n) = self.number() {
				charge = unit * n.min(MAX_CHARGE as u32) as i8;
			} else {
				while self.peek(0) == Some(sign) {
					if charge.abs() >= MAX_CHARGE {
						return Err(NotationError::ChargeOutOfRange { pos: self.pos });
					}
					charge += unit;
					self.pos += 1;
				}
			}
		}

		if self.peek(0) == Some(':') {
			self.pos += 1;
			if self.number().is_none() {
				return Err(NotationError::UnexpectedChar {
					pos: self.pos,
					ch: self.peek(0).unwrap_or(']'),
				});
			}
		}

		match self.peek(0) {
			Some(']') => self.pos += 1,
			Some(ch) => {
				return Err(NotationError::UnexpectedChar { pos: self.pos, ch });
			}
			None => return Err(unclosed),
		}

		Ok(Atom {
			element,
			aromatic,
			charge,
			isotope,
			hydrogens,
			bracket: true,
		})
	}

	fn ring_closure(&mut self) -> Result<(), NotationError> {
		let pos = self.pos;
		let digit = if self.peek(0) == Some('%') {
			match (self.peek(1), self.peek(2)) {
				(Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
					self.pos += 3;
					(a as u16 - '0' as u16) * 10 + (b as u16 - '0' as u16)
				}
				_ => return Err(NotationError::UnexpectedChar { pos, ch: '%' }),
			}
		} else {
			self.pos += 1;
			self.chars[pos] as u16 - '0' as u16
		};

		let Some(atom) = self.prev else {
			return Err(NotationError::UnexpectedChar {
				pos,
				ch: self.chars[pos],
			});
		};
		let bond = self.pending.take().map(|(s, _)| s);

		match self.rings.remove(&digit) {
			Some(open) => {
				if open.atom == atom || self.mol.bond_between(open.atom, atom).is_some() {
					return Err(NotationError::InvalidRingBond { digit, pos });
				}
				let symbol = match (open.bond, bond) {
					(Some(a), Some(b)) if a != b && !is_directional_pair(a, b) => {
						return Err(NotationError::RingBondConflict { digit });
					}
					(a, b) => a.or(b),
				};
				let order = self.resolve(symbol, open.atom, atom);
				self.mol.add_bond(open.atom, atom, order);
			}
			None => {
				self.rings.insert(digit, OpenRing { atom, bond });
			}
		}
		Ok(())
	}

	fn digit(&mut self) -> Option<u8> {
		let d = self.peek(0)?.to_digit(10)?;
		self.pos += 1;
		Some(d as u8)
	}

	fn number(&mut self) -> Option<u32> {
		let mut value: Option<u32> = None;
		while let Some(d) = self.peek(0).and_then(|c| c.to_digit(10)) {
			value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d));
			self.pos += 1;
		}
		value
	}
}

fn is_directional_pair(a: BondSymbol, b: BondSymbol) -> bool {
	matches!(
		(a, b),
		(BondSymbol::Directional, BondSymbol::Single) | (BondSymbol::Single, BondSymbol::Directional)
	)
}

fn upper_symbol(c: char) -> &'static str {
	match c {
		'B' => "B",
		'C' => "C",
		'N' => "N",
		'O' => "O",
		'P' => "P",
		'S' => "S",
		'F' => "F",
		'I' => "I",
		_ => "*",
	}
}

fn lower_symbol(c: char) -> &'static str {
	match c {
		'b' => "B",
		'c' => "C",
		'n' => "N",
		'o' => "O",
		'p' => "P",
		's' => "S",
		_ => "",
	}
}

/// Fill hydrogen counts for organic-subset atoms from their default valences.
fn assign_implicit_hydrogens(mol: &mut Molecule) {
	for i in 0..mol.atom_count() {
		let idx = NodeIndex::new(i);
		let atom = mol.atom(idx);
		if atom.bracket {
			continue;
		}
		let mut used = mol.bond_valence(idx);
		if atom.aromatic && atom.element.aromatic_pi_donor() {
			used = used.saturating_add(1);
		}
		let hydrogens = atom
			.element
			.default_valences()
			.iter()
			.map(|&v| u32::from(v))
			.find(|&v| v >= used)
			.map_or(0, |v| (v - used) as u8);
		mol.atom_mut(idx).hydrogens = hydrogens;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn h(mol: &Molecule, i: usize) -> u8 {
		mol.atom(NodeIndex::new(i)).hydrogens
	}

	#[test]
	fn ethanol() {
		let mol = parse("CCO").unwrap();
		assert_eq!(mol.atom_count(), 3);
		assert_eq!(mol.bond_count(), 2);
		assert_eq!((h(&mol, 0), h(&mol, 1), h(&mol, 2)), (3, 2, 1));
		assert_eq!(mol.formula(), "C2H6O");
	}

	#[test]
	fn bond_orders_and_branches() {
		let mol = parse("CC(=O)C#N").unwrap();
		let orders: Vec<BondOrder> = mol.bonds().map(|(_, _, o)| o).collect();
		assert_eq!(
			orders,
			vec![BondOrder::Single, BondOrder::Double, BondOrder::Single, BondOrder::Triple]
		);
		assert_eq!(h(&mol, 1), 0);
		assert_eq!(h(&mol, 2), 0);
	}

	#[test]
	fn benzene_is_aromatic_ring() {
		let mol = parse("c1ccccc1").unwrap();
		assert_eq!(mol.atom_count(), 6);
		assert_eq!(mol.bond_count(), 6);
		assert!(mol.bonds().all(|(_, _, o)| o == BondOrder::Aromatic));
		assert!((0..6).all(|i| h(&mol, i) == 1));
		assert_eq!(mol.formula(), "C6H6");
	}

	#[test]
	fn furan_and_pyridine_hydrogens() {
		let furan = parse("c1ccoc1").unwrap();
		assert_eq!(h(&furan, 3), 0);
		let pyridine = parse("c1ccncc1").unwrap();
		assert_eq!(h(&pyridine, 3), 0);
		let pyrrole = parse("c1cc[nH]c1").unwrap();
		assert_eq!(h(&pyrrole, 3), 1);
	}

	#[test]
	fn bracket_atoms() {
		let mol = parse("c1ccc(cc1)[N+](=O)[O-]").unwrap();
		let n = mol.atom(NodeIndex::new(6));
		assert_eq!(n.element, Element::N);
		assert_eq!(n.charge, 1);
		assert_eq!(mol.atom(NodeIndex::new(8)).charge, -1);

		let mol = parse("[13CH4]").unwrap();
		let c = mol.atom(NodeIndex::new(0));
		assert_eq!((c.isotope, c.hydrogens), (13, 4));

		let mol = parse("[Na+].[Cl-]").unwrap();
		assert_eq!(mol.bond_count(), 0);
		assert_eq!(mol.atom(NodeIndex::new(0)).element.symbol(), "Na");

		let mol = parse("[Fe+++]").unwrap();
		assert_eq!(mol.atom(NodeIndex::new(0)).charge, 3);
	}

	#[test]
	fn charge_and_isotope_bounds() {
		let mol = parse(&format!("[C{}]", "-".repeat(15))).unwrap();
		assert_eq!(mol.atom(NodeIndex::new(0)).charge, -15);
		assert_eq!(
			parse(&format!("[C{}]", "+".repeat(130))).unwrap_err(),
			NotationError::ChargeOutOfRange { pos: 17 }
		);
		assert_eq!(parse("[C+99]").unwrap().atom(NodeIndex::new(0)).charge, 15);
		assert_eq!(parse("[70000C]").unwrap_err(), NotationError::IsotopeOutOfRange { pos: 1 });
		assert_eq!(parse("[65535C]").unwrap().atom(NodeIndex::new(0)).isotope, 65535);
	}

	#[test]
	fn overloaded_atom_gets_no_hydrogens() {
		let mol = parse(&format!("C{}", "(#C)".repeat(90))).unwrap();
		assert_eq!(mol.bond_valence(NodeIndex::new(0)), 270);
		assert_eq!(h(&mol, 0), 0);
	}

	#[test]
	fn stereo_marks_are_ignored() {
		let mol = parse("C[C@@H](O)C(=O)O").unwrap();
		assert_eq!(mol.atom_count(), 6);
		assert_eq!(h(&mol, 1), 1);
		let mol = parse("F/C=C\\F").unwrap();
		assert_eq!(mol.bond_count(), 3);
	}

	#[test]
	fn percent_ring_closures() {
		let mol = parse("C%10CCCCC%10").unwrap();
		assert_eq!(mol.bond_count(), 6);
	}

	#[test]
	fn halogens_two_letter() {
		let mol = parse("ClCBr").unwrap();
		let symbols: Vec<&str> = (0..3).map(|i| mol.atom(NodeIndex::new(i)).element.symbol()).collect();
		assert_eq!(symbols, vec!["Cl", "C", "Br"]);
	}

	#[test]
	fn malformed_inputs_are_errors() {
		assert!(matches!(parse("   "), Err(NotationError::Empty)));
		assert!(matches!(parse("C1CC"), Err(NotationError::UnclosedRing { digit: 1 })));
		assert!(matches!(parse("CC(C"), Err(NotationError::UnmatchedParen { .. })));
		assert!(matches!(parse("CC)C"), Err(NotationError::UnmatchedParen { pos: 2 })));
		assert!(matches!(parse("[CH4"), Err(NotationError::UnclosedBracket { pos: 0 })));
		assert!(matches!(parse("C=C="), Err(NotationError::UnexpectedEnd)));
		assert!(matches!(parse("=C"), Err(NotationError::UnexpectedChar { pos: 0, .. })));
		assert!(matches!(parse("C$"), Err(NotationError::UnexpectedChar { pos: 1, ch: '$' })));
		assert!(matches!(parse("[Xx]"), Err(NotationError::UnknownElement { .. })));
		assert!(matches!(parse("C=1CC-1"), Err(NotationError::RingBondConflict { digit: 1 })));
		assert!(matches!(parse("C11"), Err(NotationError::InvalidRingBond { .. })));
	}

	#[test]
	fn whitespace_ends_the_notation() {
		let mol = parse("CCO ethanol").unwrap();
		assert_eq!(mol.atom_count(), 3);
	}
}
