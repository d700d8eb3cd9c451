//! Dataset fetching with cancellation, plus the in-memory local mode.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, AbortSignal, Request, RequestInit, Response};

use super::error::DataError;
use super::model::Dataset;

#[derive(Clone, Debug, PartialEq)]
pub enum DataState {
	Loading,
	Ready(Arc<Dataset>),
	Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataSource {
	Remote,
	Local,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out monotonically increasing tickets; only the newest is current.
#[derive(Debug, Default)]
pub struct RequestTracker {
	current: u64,
}

impl RequestTracker {
	pub fn begin(&mut self) -> Ticket {
		self.current += 1;
		Ticket(self.current)
	}

	/// Make every outstanding ticket stale without starting a request.
	pub fn invalidate(&mut self) {
		self.current += 1;
	}

	pub fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.current
	}
}

/// Reactive handle to the dataset, shared through context.
#[derive(Clone, Copy)]
pub struct DatasetProvider {
	pub state: RwSignal<DataState>,
	pub source: RwSignal<DataSource>,
	url: StoredValue<String>,
	tracker: StoredValue<RequestTracker>,
	inflight: StoredValue<Option<AbortController>, LocalStorage>,
}

impl DatasetProvider {
	pub fn new(url: String) -> Self {
		Self {
			state: RwSignal::new(DataState::Loading),
			source: RwSignal::new(DataSource::Remote),
			url: StoredValue::new(url),
			tracker: StoredValue::new(RequestTracker::default()),
			inflight: StoredValue::new_local(None),
		}
	}

	/// The dataset, when one is loaded.
	pub fn dataset(&self) -> Option<Arc<Dataset>> {
		match self.state.get() {
			DataState::Ready(ds) => Some(ds),
			_ => None,
		}
	}

	/// Start a fresh fetch, cancelling any request still in flight.
	pub fn reload(&self) {
		let Some(ticket) = self.tracker.try_update_value(|t| t.begin()) else {
			return;
		};
		self.abort_inflight();

		let controller = AbortController::new().ok();
		let signal = controller.as_ref().map(|c| c.signal());
		self.inflight.set_value(controller);
		self.source.set(DataSource::Remote);
		self.state.set(DataState::Loading);

		let url = self.url.get_value();
		let this = *self;
		info!("fetching dataset from {}", url);
		spawn_local(async move {
			let result = fetch_dataset(&url, signal.as_ref()).await;
			let current = this
				.tracker
				.try_with_value(|t| t.is_current(ticket))
				.unwrap_or(false);
			if !current {
				debug!("dropping superseded dataset response");
				return;
			}
			this.inflight.try_set_value(None);
			match result {
				Ok(dataset) => {
					info!(
						"dataset loaded: {} compounds, {} reactions",
						dataset.nodes.len(),
						dataset.edges.len()
					);
					report_dangling(&dataset);
					this.state.try_set(DataState::Ready(Arc::new(dataset)));
				}
				Err(e) if !e.is_user_visible() => debug!("dataset request aborted"),
				Err(e) => {
					error!("dataset fetch failed: {}", e);
					this.state.try_set(DataState::Failed(e.to_string()));
				}
			}
		});
	}

	/// Swap in a user-provided dataset without refetching.
	pub fn use_local(&self, dataset: Dataset) {
		self.tracker.update_value(|t| t.invalidate());
		self.abort_inflight();
		info!("using local dataset with {} compounds", dataset.nodes.len());
		report_dangling(&dataset);
		self.source.set(DataSource::Local);
		self.state.set(DataState::Ready(Arc::new(dataset)));
	}

	/// Drop interest in any pending fetch, e.g. when the app unmounts.
	pub fn cancel(&self) {
		self.tracker.try_update_value(|t| t.invalidate());
		self.abort_inflight();
	}

	fn abort_inflight(&self) {
		self.inflight.try_update_value(|slot| {
			if let Some(controller) = slot.take() {
				controller.abort();
			}
		});
	}
}

/// Reactions naming a missing compound are kept but cannot be drawn.
fn report_dangling(dataset: &Dataset) {
	let dangling = dataset.dangling_edges();
	if !dangling.is_empty() {
		warn!(
			"{} reactions reference missing compounds: {}",
			dangling.len(),
			dangling.iter().map(|e| e.id.as_str()).collect::<Vec<_>>().join(", ")
		);
	}
}

async fn fetch_dataset(url: &str, signal: Option<&AbortSignal>) -> Result<Dataset, DataError> {
	let window = web_sys::window().ok_or(DataError::NoWindow)?;

	let init = RequestInit::new();
	init.set_method("GET");
	init.set_signal(signal);
	let request = Request::new_with_str_and_init(url, &init).map_err(DataError::from_js)?;
	request
		.headers()
		.set("Accept", "application/json")
		.map_err(DataError::from_js)?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(DataError::from_js)?
		.dyn_into()
		.map_err(DataError::from_js)?;
	if !response.ok() {
		return Err(DataError::Status(response.status()));
	}

	let body = JsFuture::from(response.text().map_err(DataError::from_js)?)
		.await
		.map_err(DataError::from_js)?;
	let text = body
		.as_string()
		.ok_or_else(|| DataError::Decode("response body is not text".into()))?;
	Ok(Dataset::from_json(&text)?)
}

/// Read and parse a dataset the user picked from disk.
pub async fn read_local_file(file: web_sys::File) -> Result<Dataset, DataError> {
	let body = JsFuture::from(file.text())
		.await
		.map_err(DataError::from_js)?;
	let text = body
		.as_string()
		.ok_or_else(|| DataError::Decode("file is not text".into()))?;
	Ok(Dataset::from_json(&text)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn newer_ticket_makes_older_stale() {
		let mut tracker = RequestTracker::default();
		let first = tracker.begin();
		assert!(tracker.is_current(first));
		let second = tracker.begin();
		assert!(!tracker.is_current(first));
		assert!(tracker.is_current(second));
	}

	#[test]
	fn rapid_reloads_only_honour_the_last() {
		let mut tracker = RequestTracker::default();
		let tickets: Vec<Ticket> = (0..5).map(|_| tracker.begin()).collect();
		let applied: Vec<_> = tickets.iter().filter(|t| tracker.is_current(**t)).collect();
		assert_eq!(applied, vec![&tickets[4]]);
	}

	#[test]
	fn local_mode_invalidates_pending_fetch() {
		let mut tracker = RequestTracker::default();
		let pending = tracker.begin();
		tracker.invalidate();
		assert!(!tracker.is_current(pending));
	}
}
