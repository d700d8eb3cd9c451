/// A chemical element, identified by atomic number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Element(u8);

#[rustfmt::skip]
const SYMBOLS: [&str; 119] = [
	"*",
	"H", "He",
	"Li", "Be", "B", "C", "N", "O", "F", "Ne",
	"Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
	"K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
	"Ga", "Ge", "As", "Se", "Br", "Kr",
	"Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
	"In", "Sn", "Sb", "Te", "I", "Xe",
	"Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy",
	"Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt",
	"Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
	"Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf",
	"Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
	"Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

impl Element {
	pub const WILDCARD: Self = Self(0);
	pub const H: Self = Self(1);
	pub const B: Self = Self(5);
	pub const C: Self = Self(6);
	pub const N: Self = Self(7);
	pub const O: Self = Self(8);
	pub const F: Self = Self(9);
	pub const P: Self = Self(15);
	pub const S: Self = Self(16);
	pub const CL: Self = Self(17);
	pub const BR: Self = Self(35);
	pub const I: Self = Self(53);

	pub fn from_symbol(symbol: &str) -> Option<Self> {
		SYMBOLS
			.iter()
			.position(|s| *s == symbol)
			.map(|i| Self(i as u8))
	}

	pub fn symbol(self) -> &'static str {
		SYMBOLS[self.0 as usize]
	}

	/// Normal valences for the SMILES organic subset, lowest first.
	pub fn default_valences(self) -> &'static [u8] {
		match self {
			Self::B => &[3],
			Self::C => &[4],
			Self::N | Self::P => &[3, 5],
			Self::O => &[2],
			Self::S => &[2, 4, 6],
			Self::F | Self::CL | Self::BR | Self::I => &[1],
			_ => &[],
		}
	}

	/// Whether an aromatic atom of this element contributes a pi bond to the
	/// valence count (pyridine-like) rather than a lone pair (furan-like).
	pub fn aromatic_pi_donor(self) -> bool {
		matches!(self, Self::B | Self::C | Self::N | Self::P)
	}

	/// Rough van der Waals scale for sphere rendering, relative to carbon.
	pub fn radius_scale(self) -> f64 {
		match self {
			Self::H => 0.6,
			Self::N | Self::O | Self::F => 0.9,
			Self::P | Self::S | Self::CL => 1.15,
			Self::BR => 1.25,
			Self::I => 1.4,
			_ => 1.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn symbol_lookup() {
		assert_eq!(Element::from_symbol("Cl"), Some(Element::CL));
		assert_eq!(Element::from_symbol("Og"), Some(Element(118)));
		assert_eq!(Element::from_symbol("Xx"), None);
		assert_eq!(Element::BR.symbol(), "Br");
	}

	#[test]
	fn organic_subset_valences() {
		assert_eq!(Element::C.default_valences(), &[4]);
		assert_eq!(Element::S.default_valences(), &[2, 4, 6]);
		assert!(Element::from_symbol("Na").unwrap().default_valences().is_empty());
	}
}
