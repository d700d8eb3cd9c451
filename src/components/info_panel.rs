use std::sync::Arc;

use leptos::prelude::*;

use super::conformer_viewer::ConformerViewer;
use super::graph_canvas::CanvasCommand;
use super::structure::StructureView;
use crate::chem::smiles;
use crate::data::layout::ReactionCategory;
use crate::data::{Compound, Dataset, Reaction};
use crate::selection::{Selection, SelectionStore};

/// Details for whatever is selected; hidden when nothing is.
#[component]
pub fn InfoPanel(#[prop(into)] data: Signal<Option<Arc<Dataset>>>) -> impl IntoView {
	let selection = expect_context::<RwSignal<SelectionStore>>();
	let current = Memo::new(move |_| selection.with(|s| s.selection().clone()));

	move || {
		let dataset = data.get()?;
		let body = match current.get() {
			Selection::None => return None,
			Selection::Node(id) => {
				let compound = dataset.node(&id)?.clone();
				compound_details(compound, &dataset).into_any()
			}
			Selection::Edge(id) => {
				let reaction = dataset.edge(&id)?.clone();
				reaction_details(reaction, &dataset).into_any()
			}
		};
		Some(view! {
			<aside class="info-panel">
				<button class="close" title="Close" on:click=move |_| selection.update(|s| s.clear())>
					"×"
				</button>
				{body}
			</aside>
		})
	}
}

fn compound_details(compound: Compound, dataset: &Dataset) -> impl IntoView + use<> {
	let selection = expect_context::<RwSignal<SelectionStore>>();
	let show_3d = RwSignal::new(false);
	let data = compound.data.clone();
	let formula = if data.formula.is_empty() {
		smiles::parse(&data.smiles).map(|m| m.formula()).unwrap_or_default()
	} else {
		data.formula.clone()
	};
	let links: Vec<(String, String)> = dataset
		.edges
		.iter()
		.filter(|e| e.source == compound.id || e.target == compound.id)
		.map(|e| {
			let arrow = if e.source == compound.id { "→" } else { "←" };
			let other = if e.source == compound.id { &e.target } else { &e.source };
			let other = dataset.node(other).map_or(other.as_str(), |n| n.display_label());
			(e.id.clone(), format!("{} {} ({})", arrow, other, e.label))
		})
		.collect();
	let smiles = data.smiles.clone();

	view! {
		<h2>{compound.display_label().to_string()}</h2>
		<StructureView smiles=smiles.clone() />
		<dl>
			<Field name="Formula" value=formula />
			<Field name="IUPAC name" value=data.iupac_name />
			<Field name="SMILES" value=data.smiles />
		</dl>
		{(!data.notes.is_empty()).then(|| view! { <p class="notes">{data.notes}</p> })}
		{(!data.properties.is_empty())
			.then(|| {
				view! {
					<ul class="properties">
						{data.properties.into_iter().map(|p| view! { <li>{p}</li> }).collect_view()}
					</ul>
				}
			})}
		{(!smiles.trim().is_empty())
			.then(|| {
				view! {
					<button on:click=move |_| show_3d.update(|v| *v = !*v)>
						{move || if show_3d.get() { "Hide 3D view" } else { "Show 3D view" }}
					</button>
					<Show when=move || show_3d.get()>
						<ConformerViewer smiles=smiles.clone() />
					</Show>
				}
			})}
		<h3>"Reactions"</h3>
		<ul class="links">
			{links
				.into_iter()
				.map(|(id, text)| {
					view! {
						<li>
							<a href="#" on:click=move |ev| {
								ev.prevent_default();
								selection.update(|s| s.select_edge(id.clone()));
							}>{text}</a>
						</li>
					}
				})
				.collect_view()}
		</ul>
	}
}

fn reaction_details(reaction: Reaction, dataset: &Dataset) -> impl IntoView + use<> {
	let selection = expect_context::<RwSignal<SelectionStore>>();
	let commands = expect_context::<RwSignal<Option<CanvasCommand>>>();
	let category = ReactionCategory::classify(&reaction.label);
	let endpoint = |id: &str| {
		let label = dataset.node(id).map_or(id, |n| n.display_label()).to_string();
		let id = id.to_string();
		view! {
			<a href="#" on:click=move |ev| {
				ev.prevent_default();
				selection.update(|s| s.select_node(id.clone()));
				commands.set(Some(CanvasCommand::Focus(id.clone())));
			}>{label}</a>
		}
	};
	let (from, to) = (endpoint(&reaction.source), endpoint(&reaction.target));
	let data = reaction.data;

	view! {
		<h2>{if reaction.label.is_empty() { "Reaction".to_string() } else { reaction.label }}</h2>
		<p class="route">{from} " → " {to}</p>
		<dl>
			<Field name="Category" value=category.name().to_string() />
			<Field name="Reagents" value=data.reagents />
			<Field name="Conditions" value=data.conditions />
			<Field name="Equation" value=data.equation />
		</dl>
		{(!data.mechanism.is_empty())
			.then(|| {
				view! {
					<h3>"Mechanism"</h3>
					<p class="mechanism">{data.mechanism}</p>
				}
			})}
	}
}

/// Definition-list row, omitted when the value is empty.
#[component]
fn Field(name: &'static str, value: String) -> impl IntoView {
	(!value.is_empty()).then(|| {
		view! {
			<dt>{name}</dt>
			<dd>{value}</dd>
		}
	})
}
