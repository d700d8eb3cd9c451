use std::sync::Arc;

use leptos::prelude::*;

use super::graph_canvas::CanvasCommand;
use crate::data::Dataset;
use crate::data::layout::ReactionCategory;
use crate::selection::SelectionStore;

const LEGEND: [ReactionCategory; 8] = [
	ReactionCategory::FriedelCrafts,
	ReactionCategory::Oxidation,
	ReactionCategory::Reduction,
	ReactionCategory::Substitution,
	ReactionCategory::Addition,
	ReactionCategory::Condensation,
	ReactionCategory::Rearrangement,
	ReactionCategory::Other,
];

/// Search box, matching compounds and the reaction colour legend.
#[component]
pub fn SidePanel(#[prop(into)] data: Signal<Option<Arc<Dataset>>>) -> impl IntoView {
	let selection = expect_context::<RwSignal<SelectionStore>>();
	let commands = expect_context::<RwSignal<Option<CanvasCommand>>>();

	let results = Memo::new(move |_| {
		let Some(dataset) = data.get() else {
			return Vec::new();
		};
		selection.with(|s| {
			s.search(&dataset)
				.into_iter()
				.map(|c| (c.id.clone(), c.display_label().to_string(), s.selected_node() == Some(c.id.as_str())))
				.collect::<Vec<_>>()
		})
	});

	view! {
		<nav class="side-panel">
			<input
				type="search"
				placeholder="Search compounds or reagents"
				prop:value=move || selection.with(|s| s.query().to_string())
				on:input=move |ev| selection.update(|s| s.set_query(event_target_value(&ev)))
			/>
			<p class="result-count">{move || format!("{} compounds", results.with(Vec::len))}</p>
			<ul class="results">
				<For
					each=move || results.get()
					key=|(id, _, selected)| (id.clone(), *selected)
					children=move |(id, label, selected)| {
						view! {
							<li class:selected=selected>
								<a href="#" on:click=move |ev| {
									ev.prevent_default();
									selection.update(|s| s.select_node(id.clone()));
									commands.set(Some(CanvasCommand::Focus(id.clone())));
								}>{label}</a>
							</li>
						}
					}
				/>
			</ul>
			<h3>"Reaction types"</h3>
			<ul class="legend">
				{LEGEND
					.iter()
					.map(|c| {
						let color = c.rgb().map_or("var(--edge)".to_string(), |rgb| format!("rgb({})", rgb));
						view! {
							<li>
								<span class="swatch" style:background=color></span>
								{c.name()}
							</li>
						}
					})
					.collect_view()}
			</ul>
		</nav>
	}
}
