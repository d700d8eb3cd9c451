use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while obtaining a dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
	#[error("network error: {0}")]
	Network(String),
	#[error("server responded with HTTP {0}")]
	Status(u16),
	#[error("dataset is not valid JSON: {0}")]
	Decode(String),
	#[error("request was cancelled")]
	Aborted,
	#[error("no browser window available")]
	NoWindow,
}

impl DataError {
	pub(crate) fn from_js(value: JsValue) -> Self {
		let name = js_sys::Reflect::get(&value, &JsValue::from_str("name"))
			.ok()
			.and_then(|n| n.as_string());
		if name.as_deref() == Some("AbortError") {
			return Self::Aborted;
		}
		let message = js_sys::Reflect::get(&value, &JsValue::from_str("message"))
			.ok()
			.and_then(|m| m.as_string())
			.unwrap_or_else(|| format!("{:?}", value));
		Self::Network(message)
	}

	/// Whether this error should be shown to the user.
	pub fn is_user_visible(&self) -> bool {
		!matches!(self, Self::Aborted)
	}
}

impl From<serde_json::Error> for DataError {
	fn from(e: serde_json::Error) -> Self {
		Self::Decode(e.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn aborted_is_silent() {
		assert!(!DataError::Aborted.is_user_visible());
		assert!(DataError::Status(503).is_user_visible());
		assert_eq!(DataError::Status(404).to_string(), "server responded with HTTP 404");
	}

	#[test]
	fn decode_errors_convert() {
		let err: DataError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
		assert!(matches!(err, DataError::Decode(_)));
	}
}
