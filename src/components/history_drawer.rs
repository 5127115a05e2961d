use gloo::dialogs::alert;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, warn};

use crate::api::RecentCircuit;
use crate::session::use_session;

/// Date part of a backend timestamp.
fn short_date(created_at: &str) -> &str {
	created_at.split('T').next().unwrap_or(created_at)
}

/// Slide-out list of recently saved circuits. Refetches every time it opens.
#[component]
pub fn HistoryDrawer(open: RwSignal<bool>, on_select: Callback<String>) -> impl IntoView {
	let session = use_session();
	let items = RwSignal::new(Vec::<RecentCircuit>::new());
	let loading = RwSignal::new(false);

	Effect::new(move |_| {
		if !open.get() {
			return;
		}
		let Some(token) = session.token() else {
			items.set(Vec::new());
			return;
		};
		loading.set(true);
		let session = session.clone();
		spawn_local(async move {
			match session.api.recent(&token).await {
				Ok(recent) => items.set(recent),
				Err(err) if err.is_unauthorized() => {
					warn!("history rejected the session: {err}");
					session.sign_out();
					open.set(false);
				}
				Err(err) => {
					error!("failed to load history: {err}");
					alert("Failed to load history. Please try again.");
				}
			}
			loading.set(false);
		});
	});

	view! {
		<aside class="history-drawer" class:history-drawer--open=move || open.get()>
			<header class="history-drawer__header">
				<h3>"Recent circuits"</h3>
				<button title="Close" on:click=move |_| open.set(false)>"×"</button>
			</header>
			{move || {
				if loading.get() {
					return view! { <p class="muted">"Loading..."</p> }.into_any();
				}
				let recent = items.get();
				if recent.is_empty() {
					return view! { <p class="muted">"Nothing saved yet."</p> }.into_any();
				}
				view! {
					<ul class="history-drawer__list">
						{recent
							.into_iter()
							.map(|item| {
								let id = item.id.clone();
								view! {
									<li>
										<button on:click=move |_| {
											on_select.run(id.clone());
											open.set(false);
										}>
											<span class="history-drawer__query">{item.query.clone()}</span>
											<span class="history-drawer__date">
												{short_date(&item.created_at).to_string()}
											</span>
										</button>
									</li>
								}
							})
							.collect_view()}
					</ul>
				}
					.into_any()
			}}
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timestamps_shorten_to_the_day() {
		assert_eq!(short_date("2026-03-14T09:26:53.589"), "2026-03-14");
		assert_eq!(short_date("yesterday"), "yesterday");
		assert_eq!(short_date(""), "");
	}
}
