use leptos::prelude::*;

use crate::chem::depiction_for;
use crate::theme::ThemeMode;

/// 2D skeletal drawing of a notation string as inline SVG. Unparseable
/// input is shown verbatim instead.
#[component]
pub fn StructureView(#[prop(into)] smiles: Signal<String>) -> impl IntoView {
	let theme = expect_context::<RwSignal<ThemeMode>>();
	let svg = Memo::new(move |_| {
		let tokens = theme.get().tokens();
		smiles.with(|s| match depiction_for(s).as_ref() {
			Ok(d) if !d.is_empty() => Some(d.to_svg(tokens)),
			_ => None,
		})
	});

	move || match svg.get() {
		Some(markup) => view! { <div class="structure" inner_html=markup></div> }.into_any(),
		None => view! { <code class="structure-fallback">{smiles.get()}</code> }.into_any(),
	}
}
