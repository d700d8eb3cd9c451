//! Interactive map of organic compounds and the reactions between them,
//! rendered client-side with Leptos.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::hooks::use_query_map;
use leptos_router::path;
use log::{Level, info};

// Modules
mod chem;
mod components;
mod config;
mod data;
mod pages;
mod selection;
mod theme;

// Top-Level pages
use crate::components::graph_canvas::CanvasCommand;
use crate::config::{AppConfig, DATASET_QUERY_PARAM};
use crate::data::DatasetProvider;
use crate::data::persistence::LayoutStore;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::selection::SelectionStore;
use crate::theme::ThemeMode;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the reaction map and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		// sets the document title
		<Title text="Organic Reaction Map" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<AppShell />
		</Router>
	}
}

/// Shared state for every page: config, dataset, selection, theme and the
/// canvas command channel.
#[component]
fn AppShell() -> impl IntoView {
	let query = use_query_map();
	let config = AppConfig::from_query(query.with_untracked(|q| q.get(DATASET_QUERY_PARAM)));
	info!("dataset url: {}", config.dataset_url);

	let provider = DatasetProvider::new(config.dataset_url.clone());
	let theme = RwSignal::new(LayoutStore::browser().load_theme().unwrap_or_default());
	provide_context(config);
	provide_context(provider);
	provide_context(RwSignal::new(SelectionStore::default()));
	provide_context(theme);
	provide_context(RwSignal::new(None::<CanvasCommand>));

	provider.reload();
	on_cleanup(move || provider.cancel());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=move || theme.get().as_str() />
		<Routes fallback=|| view! { <NotFound /> }>
			<Route path=path!("/") view=Home />
		</Routes>
	}
}
