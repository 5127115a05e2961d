use leptos::prelude::*;
use leptos_router::components::A;

/// Shown after a library entry is saved.
#[component]
pub fn Success() -> impl IntoView {
	view! {
		<div class="centered">
			<div class="card card--success">
				<div class="card__icon">"✓"</div>
				<h1>"Success!"</h1>
				<p>"The component has been updated successfully and is now live in the library."</p>
				<A href="/admin" attr:class="btn btn--wide">"← Back to Dashboard"</A>
				<A href="/study" attr:class="btn btn--primary btn--wide">"View Guide / AI Course"</A>
			</div>
		</div>
	}
}
