//! Knowledge graph explorer: builds a graph from research documents and
//! lays it out on a canvas. Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Builder and layout decisions are logged at debug level; release builds
/// keep the console to info and above.
const LOG_LEVEL: Level = if cfg!(debug_assertions) {
	Level::Debug
} else {
	Level::Info
};

/// Route console logging and panics to the browser console.
pub fn init_logging() {
	let _ = console_log::init_with_level(LOG_LEVEL);
	console_error_panic_hook::set_once();
	info!("knowledge graph explorer starting (log level {LOG_LEVEL})");
}

/// Root view. The explorer lives at `/` and `/graph`; anything else is a 404.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		// The canvas is drawn on a dark background
		<Html attr:lang="en" attr:data-theme="dark" />
		<Title formatter=|page: String| format!("{page} · Knowledge Graph") text="Explorer" />
		<Meta name="description" content="Explore concepts and entities linked across documents" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=NotFound>
				<Route path=path!("/") view=Home />
				<Route path=path!("/graph") view=Home />
			</Routes>
		</Router>
	}
}
