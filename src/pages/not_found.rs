use leptos::prelude::*;
use leptos_router::components::A;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="centered">
			<h1>"Uh oh!" <br /> "We couldn't find that page!"</h1>
			<A href="/" attr:class="btn btn--primary">"Back home"</A>
		</div>
	}
}
