//! Compile-time defaults and the few runtime overrides the app accepts.

/// Where the dataset is fetched from unless `?data=` overrides it.
pub const DATASET_URL: &str = "/data/organic_chemistry_data.json";

/// Query parameter naming an alternative dataset URL.
pub const DATASET_QUERY_PARAM: &str = "data";

pub const LAYOUT_KEY: &str = "organic-chem-map:layout";
pub const VIEWPORT_KEY: &str = "organic-chem-map:viewport";
pub const THEME_KEY: &str = "organic-chem-map:theme";

/// Compound placed at the centre of the radial layout when present.
pub const LAYOUT_HUB: &str = "benzene";

/// Runtime configuration shared through context.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	pub dataset_url: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			dataset_url: DATASET_URL.to_string(),
		}
	}
}

impl AppConfig {
	/// Build from an optional `?data=` value. Blank values are ignored.
	pub fn from_query(data: Option<String>) -> Self {
		match data.map(|s| s.trim().to_string()) {
			Some(url) if !url.is_empty() => Self { dataset_url: url },
			_ => Self::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_override_is_used_when_present() {
		let cfg = AppConfig::from_query(Some("/alt.json".into()));
		assert_eq!(cfg.dataset_url, "/alt.json");
	}

	#[test]
	fn blank_query_falls_back_to_default() {
		assert_eq!(AppConfig::from_query(Some("  ".into())), AppConfig::default());
		assert_eq!(AppConfig::from_query(None).dataset_url, DATASET_URL);
	}
}
