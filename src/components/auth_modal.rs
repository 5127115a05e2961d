use gloo::dialogs::alert;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use crate::session::use_session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
	Login,
	Register,
}

/// Sign-in / sign-up dialog. Closes itself once a token is issued.
#[component]
pub fn AuthModal(open: RwSignal<bool>) -> impl IntoView {
	let session = StoredValue::new(use_session());
	let mode = RwSignal::new(Mode::Login);
	let email = RwSignal::new(String::new());
	let password = RwSignal::new(String::new());
	let busy = RwSignal::new(false);

	let submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let (address, secret) = (email.get_untracked(), password.get_untracked());
		if address.trim().is_empty() || secret.is_empty() || busy.get_untracked() {
			return;
		}
		busy.set(true);
		let session = session.get_value();
		let current = mode.get_untracked();
		spawn_local(async move {
			let issued = match current {
				Mode::Login => session.api.login(address.trim(), &secret).await,
				Mode::Register => session.api.register(address.trim(), &secret).await,
			};
			busy.set(false);
			match issued {
				Ok(token) => {
					info!("signed in as {}", address.trim());
					session.sign_in(token);
					password.set(String::new());
					open.set(false);
				}
				Err(err) => {
					error!("authentication failed: {err}");
					alert(&format!("Authentication failed: {err}"));
				}
			}
		});
	};

	let toggle = move |_| {
		mode.update(|m| {
			*m = match m {
				Mode::Login => Mode::Register,
				Mode::Register => Mode::Login,
			}
		})
	};

	view! {
		<Show when=move || open.get()>
			<div class="modal-backdrop" on:click=move |_| open.set(false)>
				<div class="modal" on:click=|ev| ev.stop_propagation()>
					<button class="modal__close" title="Close" on:click=move |_| open.set(false)>
						"×"
					</button>
					<h2>
						{move || match mode.get() {
							Mode::Login => "Sign in",
							Mode::Register => "Create account",
						}}
					</h2>
					<form class="auth-form" on:submit=submit>
						<label>
							"Email"
							<input
								type="email"
								required
								prop:value=move || email.get()
								on:input=move |ev| email.set(event_target_value(&ev))
							/>
						</label>
						<label>
							"Password"
							<input
								type="password"
								required
								prop:value=move || password.get()
								on:input=move |ev| password.set(event_target_value(&ev))
							/>
						</label>
						<button type="submit" class="btn btn--primary" disabled=move || busy.get()>
							{move || match (busy.get(), mode.get()) {
								(true, _) => "Please wait...",
								(false, Mode::Login) => "Sign in",
								(false, Mode::Register) => "Sign up",
							}}
						</button>
					</form>
					<button class="link-button" on:click=toggle>
						{move || match mode.get() {
							Mode::Login => "No account yet? Sign up",
							Mode::Register => "Already registered? Sign in",
						}}
					</button>
				</div>
			</div>
		</Show>
	}
}
