//! Colour tokens for light and dark modes.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
	#[default]
	Dark,
	Light,
}

impl ThemeMode {
	pub fn toggled(self) -> Self {
		match self {
			Self::Dark => Self::Light,
			Self::Light => Self::Dark,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Dark => "dark",
			Self::Light => "light",
		}
	}

	pub fn parse(s: &str) -> Option<Self> {
		match s.trim() {
			"dark" => Some(Self::Dark),
			"light" => Some(Self::Light),
			_ => None,
		}
	}

	pub fn tokens(self) -> &'static ThemeTokens {
		match self {
			Self::Dark => &DARK,
			Self::Light => &LIGHT,
		}
	}
}

/// Static colour map consumed by the canvas renderers and the SVG writer.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeTokens {
	pub background: &'static str,
	pub grid: &'static str,
	pub surface: &'static str,
	pub surface_border: &'static str,
	pub text: &'static str,
	pub text_muted: &'static str,
	pub accent: &'static str,
	pub selected: &'static str,
	pub bond: &'static str,
	/// `r, g, b` triple so renderers can apply their own alpha.
	pub edge_rgb: &'static str,
	pub carbon: &'static str,
}

const DARK: ThemeTokens = ThemeTokens {
	background: "#1a1a2e",
	grid: "rgba(255, 255, 255, 0.04)",
	surface: "#23233d",
	surface_border: "#3a3a5c",
	text: "#f0f0f5",
	text_muted: "#9a9ab8",
	accent: "#64b4ff",
	selected: "#ffd166",
	bond: "#d8d8e8",
	edge_rgb: "100, 180, 255",
	carbon: "#c8c8c8",
};

const LIGHT: ThemeTokens = ThemeTokens {
	background: "#f7f7fb",
	grid: "rgba(0, 0, 0, 0.05)",
	surface: "#ffffff",
	surface_border: "#d0d0e0",
	text: "#1c1c28",
	text_muted: "#5c5c74",
	accent: "#1f77b4",
	selected: "#e07a00",
	bond: "#2a2a3a",
	edge_rgb: "31, 119, 180",
	carbon: "#404040",
};

/// CPK-style element colour. Carbon follows the theme so it stays visible
/// on both backgrounds.
pub fn element_color(symbol: &str, tokens: &ThemeTokens) -> &'static str {
	match symbol {
		"C" => tokens.carbon,
		"H" => "#e8e8e8",
		"N" => "#3050f8",
		"O" => "#ff0d0d",
		"F" | "Cl" => "#1ff01f",
		"Br" => "#a62929",
		"I" => "#940094",
		"S" => "#e6c21a",
		"P" => "#ff8000",
		"B" => "#ffb5b5",
		"Si" => "#f0c8a0",
		"Na" | "K" | "Li" => "#ab5cf2",
		"Mg" | "Ca" => "#3dff00",
		"Fe" => "#e06633",
		"Cu" => "#c88033",
		"Zn" => "#7d80b0",
		_ => "#ff1493",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn toggling_twice_is_identity() {
		assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
		assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
	}

	#[test]
	fn mode_string_round_trips() {
		for mode in [ThemeMode::Dark, ThemeMode::Light] {
			assert_eq!(ThemeMode::parse(mode.as_str()), Some(mode));
		}
		assert_eq!(ThemeMode::parse("sepia"), None);
	}

	#[test]
	fn carbon_tracks_theme() {
		assert_ne!(
			element_color("C", ThemeMode::Dark.tokens()),
			element_color("C", ThemeMode::Light.tokens())
		);
		assert_eq!(element_color("O", ThemeMode::Dark.tokens()), "#ff0d0d");
	}
}
