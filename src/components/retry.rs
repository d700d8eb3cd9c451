use leptos::prelude::*;

use crate::config::AppConfig;
use crate::data::DatasetProvider;

/// Full-screen prompt shown when the dataset could not be fetched.
#[component]
pub fn RetryPrompt(message: String) -> impl IntoView {
	let provider = expect_context::<DatasetProvider>();
	let url = expect_context::<AppConfig>().dataset_url;

	view! {
		<div class="retry-screen" role="alert">
			<h2>"Could not load the reaction map"</h2>
			<p class="retry-message">{message}</p>
			<p class="retry-source">"Source: " <code>{url}</code></p>
			<button on:click=move |_| provider.reload()>"Try again"</button>
		</div>
	}
}
