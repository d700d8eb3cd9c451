use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

use super::graph_canvas::CanvasCommand;
use crate::data::persistence::LayoutStore;
use crate::data::provider::read_local_file;
use crate::data::{DataSource, DataState, DatasetProvider};
use crate::theme::ThemeMode;

#[component]
pub fn Header() -> impl IntoView {
	let provider = expect_context::<DatasetProvider>();
	let theme = expect_context::<RwSignal<ThemeMode>>();
	let commands = expect_context::<RwSignal<Option<CanvasCommand>>>();
	let file_error = RwSignal::new(None::<String>);

	let toggle_theme = move |_| {
		let next = theme.get_untracked().toggled();
		theme.set(next);
		LayoutStore::browser().save_theme(next);
	};

	let on_file = move |ev: web_sys::Event| {
		let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
			return;
		};
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		input.set_value("");
		spawn_local(async move {
			match read_local_file(file).await {
				Ok(dataset) => {
					file_error.try_set(None);
					provider.use_local(dataset);
				}
				Err(e) => {
					error!("local dataset rejected: {}", e);
					file_error.try_set(Some(e.to_string()));
				}
			}
		});
	};

	let loading = move || matches!(provider.state.get(), DataState::Loading);
	let source_label = move || match provider.source.get() {
		DataSource::Remote => "server data",
		DataSource::Local => "local file",
	};

	view! {
		<header class="app-header">
			<h1>"Organic Reaction Map"</h1>
			<span class="source">{source_label}</span>
			<div class="actions">
				<button on:click=move |_| commands.set(Some(CanvasCommand::Relax))>"Tidy"</button>
				<button on:click=move |_| commands.set(Some(CanvasCommand::ResetLayout))>
					"Reset layout"
				</button>
				<button disabled=loading on:click=move |_| provider.reload()>
					{move || if loading() { "Loading…" } else { "Reload" }}
				</button>
				<label class="file-button">
					"Open JSON"
					<input type="file" accept="application/json,.json" on:change=on_file />
				</label>
				<button on:click=toggle_theme>
					{move || match theme.get() {
						ThemeMode::Dark => "Light mode",
						ThemeMode::Light => "Dark mode",
					}}
				</button>
			</div>
			{move || file_error.get().map(|e| view! { <p class="file-error">{e}</p> })}
		</header>
	}
}
