//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod api;
pub mod circuit;
pub mod components;
pub mod config;
pub mod error;
pub mod markdown;
pub mod pages;
pub mod session;

// Top-Level pages
use crate::config::{ApiConfig, PRODUCT_NAME};
use crate::pages::admin::Admin;
use crate::pages::home::Home;
use crate::pages::maker::Maker;
use crate::pages::not_found::NotFound;
use crate::pages::study::Study;
use crate::pages::success::Success;
use crate::session::Session;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Root component: session context, document head and routes.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let session = Session::new(&ApiConfig::from_env());
	session.restore();
	provide_context(session);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text=PRODUCT_NAME />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/app") view=Maker />
				<Route path=path!("/study") view=Study />
				<Route path=path!("/admin") view=Admin />
				<Route path=path!("/success") view=Success />
			</Routes>
		</Router>
	}
}
