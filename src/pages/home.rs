use leptos::prelude::*;

use crate::components::graph_canvas::GraphCanvas;
use crate::components::header::Header;
use crate::components::info_panel::InfoPanel;
use crate::components::retry::RetryPrompt;
use crate::components::side_panel::SidePanel;
use crate::data::{DataState, DatasetProvider};

/// The reaction map with its panels, or a loading / retry screen.
#[component]
pub fn Home() -> impl IntoView {
	let provider = expect_context::<DatasetProvider>();
	let dataset = Signal::derive(move || provider.dataset());
	let failure = Memo::new(move |_| match provider.state.get() {
		DataState::Failed(message) => Some(message),
		_ => None,
	});

	view! {
		<div class="app">
			<Header />
			<main class="workspace">
				<SidePanel data=dataset />
				<div class="map">
					<GraphCanvas data=dataset />
					<Show when=move || matches!(provider.state.get(), DataState::Loading)>
						<div class="loading">"Loading reactions…"</div>
					</Show>
				</div>
				<InfoPanel data=dataset />
			</main>
			{move || failure.get().map(|message| view! { <RetryPrompt message=message /> })}
		</div>
	}
}
