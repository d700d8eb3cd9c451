use leptos::prelude::*;
use organic_reaction_map::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App)
}
