//! Password-gated editor for the component library.

use gloo::dialogs::{alert, confirm};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use log::{error, info, warn};
use web_sys::File;

use crate::api::{ApiClient, Component, ComponentDraft, ImageUrls};
use crate::pages::study::filter_components;
use crate::session::use_session;

/// Categories offered in the form; anything else is entered by hand.
pub const CATEGORIES: [&str; 7] = [
	"Robotics",
	"AI",
	"Microcontroller",
	"Sensor",
	"Actuator",
	"Power",
	"Module",
];

/// Editable copy of a library entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentForm {
	pub name: String,
	pub category: String,
	pub custom_category: Option<String>,
	pub description: String,
	pub wiring_guide: String,
	pub image_urls: Vec<String>,
	pub image_url_input: String,
}

impl ComponentForm {
	pub fn edit(component: &Component) -> Self {
		let known = CATEGORIES.contains(&component.category.as_str());
		Self {
			name: component.name.clone(),
			category: if known { component.category.clone() } else { String::new() },
			custom_category: (!known).then(|| component.category.clone()),
			description: component.description.clone(),
			wiring_guide: component.wiring_guide.clone().unwrap_or_default(),
			image_urls: component.image_url.iter().map(str::to_owned).collect(),
			image_url_input: String::new(),
		}
	}

	/// Category that will be submitted.
	pub fn category(&self) -> &str {
		self.custom_category.as_deref().unwrap_or(&self.category)
	}

	/// Queues the typed URL, if any.
	pub fn add_image_url(&mut self) {
		let url = self.image_url_input.trim().to_string();
		if !url.is_empty() {
			self.image_urls.push(url);
		}
		self.image_url_input.clear();
	}

	pub fn remove_image(&mut self, index: usize) {
		if index < self.image_urls.len() {
			self.image_urls.remove(index);
		}
	}

	/// Request body: existing URLs, then freshly `uploaded` ones, then a URL
	/// still sitting in the input box.
	pub fn to_draft(&self, uploaded: Vec<String>) -> ComponentDraft {
		let mut urls = self.image_urls.clone();
		urls.extend(uploaded);
		let pending = self.image_url_input.trim();
		if !pending.is_empty() {
			urls.push(pending.to_string());
		}
		ComponentDraft {
			name: self.name.trim().to_string(),
			category: self.category().trim().to_string(),
			description: self.description.clone(),
			wiring_guide: Some(self.wiring_guide.clone()).filter(|g| !g.trim().is_empty()),
			image_url: ImageUrls(urls),
		}
	}
}

fn reload(api: ApiClient, components: RwSignal<Vec<Component>>) {
	spawn_local(async move {
		match api.components().await {
			Ok(list) => components.set(list),
			Err(err) => error!("failed to load components: {err}"),
		}
	});
}

#[component]
fn PasswordGate(unlocked: RwSignal<bool>) -> impl IntoView {
	let api = StoredValue::new(use_session().api);
	let password = RwSignal::new(String::new());
	let failed = RwSignal::new(false);
	let busy = RwSignal::new(false);

	let submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		busy.set(true);
		let (api, secret) = (api.get_value(), password.get_untracked());
		spawn_local(async move {
			match api.verify_password(&secret).await {
				Ok(()) => {
					info!("admin unlocked");
					failed.set(false);
					unlocked.set(true);
				}
				Err(err) => {
					warn!("admin password rejected: {err}");
					failed.set(true);
				}
			}
			busy.set(false);
		});
	};

	view! {
		<div class="gate">
			<h2>"Admin Dashboard"</h2>
			<p class="muted">"Enter your secure password to verify access."</p>
			<form on:submit=submit>
				<Show when=move || failed.get()>
					<p class="form-error">"Invalid password"</p>
				</Show>
				<input
					type="password"
					autofocus
					placeholder="Enter Password"
					prop:value=move || password.get()
					on:input=move |ev| password.set(event_target_value(&ev))
				/>
				<button type="submit" class="btn btn--primary btn--wide" disabled=move || busy.get()>
					{move || if busy.get() { "Verifying..." } else { "Access Dashboard" }}
				</button>
			</form>
		</div>
	}
}

#[component]
fn Dashboard() -> impl IntoView {
	let api = use_session().api;
	let navigate = use_navigate();
	let components = RwSignal::new(Vec::<Component>::new());
	let search = RwSignal::new(String::new());
	let form = RwSignal::new(ComponentForm::default());
	let editing = RwSignal::new(None::<i64>);
	let busy = RwSignal::new(false);
	let file_input = NodeRef::<leptos::html::Input>::new();

	reload(api.clone(), components);

	let reset = move || {
		form.set(ComponentForm::default());
		editing.set(None);
		if let Some(input) = file_input.get_untracked() {
			input.set_value("");
		}
	};

	let api_details = api.clone();
	let generate_details = move |_| {
		let snapshot = form.get_untracked();
		if snapshot.name.trim().is_empty() {
			alert("Please enter a component name first.");
			return;
		}
		busy.set(true);
		let api = api_details.clone();
		spawn_local(async move {
			match api
				.generate_component_details(snapshot.name.trim(), snapshot.category())
				.await
			{
				Ok(details) => form.update(|f| {
					f.description = details.description;
					f.wiring_guide = details.wiring_guide;
				}),
				Err(err) => {
					error!("component details failed: {err}");
					alert("Failed to generate details with AI.");
				}
			}
			busy.set(false);
		});
	};

	let api_save = api.clone();
	let submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let files: Vec<File> = file_input
			.get_untracked()
			.and_then(|input| input.files())
			.map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
			.unwrap_or_default();
		let (snapshot, id) = (form.get_untracked(), editing.get_untracked());
		let (api, navigate) = (api_save.clone(), navigate.clone());
		busy.set(true);
		spawn_local(async move {
			let mut uploaded = Vec::with_capacity(files.len());
			for file in &files {
				match api.upload_image(file).await {
					Ok(url) => uploaded.push(url),
					Err(err) => error!("upload of {} failed: {err}", file.name()),
				}
			}
			let draft = snapshot.to_draft(uploaded);
			let saved = match id {
				Some(id) => api.update_component(id, &draft).await,
				None => api.create_component(&draft).await,
			};
			busy.set(false);
			match saved {
				Ok(component) => {
					info!("saved component {} ({})", component.name, component.id);
					reset();
					navigate("/success", Default::default());
				}
				Err(err) => {
					error!("saving component failed: {err}");
					alert("Failed to save component.");
				}
			}
		});
	};

	let api_delete = api.clone();
	let delete = move |id: i64| {
		if !confirm("Are you sure you want to delete this component?") {
			return;
		}
		let api = api_delete.clone();
		spawn_local(async move {
			match api.delete_component(id).await {
				Ok(()) => {
					info!("deleted component {id}");
					reload(api, components);
				}
				Err(err) => {
					error!("deleting component {id} failed: {err}");
					alert("Failed to delete component");
				}
			}
		});
	};
	let delete = StoredValue::new(delete);

	let text_field = move |label: &'static str, read: fn(&ComponentForm) -> String, write: fn(&mut ComponentForm, String)| {
		view! {
			<label>
				{label}
				<input
					type="text"
					prop:value=move || form.with(read)
					on:input=move |ev| form.update(|f| write(f, event_target_value(&ev)))
				/>
			</label>
		}
	};

	view! {
		<div class="admin">
			<header class="admin__header">
				<A href="/study" attr:class="back">"←"</A>
				<h1>"Component Library"</h1>
				<input
					class="search"
					type="search"
					placeholder="Search components..."
					prop:value=move || search.get()
					on:input=move |ev| search.set(event_target_value(&ev))
				/>
			</header>

			<form class="admin__form" on:submit=submit>
				<h2>{move || if editing.get().is_some() { "Edit Component" } else { "Add Component" }}</h2>
				{text_field("Name", |f| f.name.clone(), |f, v| f.name = v)}
				<label>
					"Category"
					<select on:change=move |ev| {
						let value = event_target_value(&ev);
						form.update(|f| {
							if value == "__custom" {
								f.custom_category = Some(String::new());
							} else {
								f.custom_category = None;
								f.category = value;
							}
						})
					}>
						<option value="" prop:selected=move || form.with(|f| f.custom_category.is_none() && f.category.is_empty())>
							"Select a category"
						</option>
						{CATEGORIES
							.into_iter()
							.map(|c| {
								view! {
									<option
										value=c
										prop:selected=move || form.with(|f| f.custom_category.is_none() && f.category == c)
									>
										{c}
									</option>
								}
							})
							.collect_view()}
						<option value="__custom" prop:selected=move || form.with(|f| f.custom_category.is_some())>
							"Custom..."
						</option>
					</select>
				</label>
				<Show when=move || form.with(|f| f.custom_category.is_some())>
					{text_field(
						"Custom category",
						|f| f.custom_category.clone().unwrap_or_default(),
						|f, v| f.custom_category = Some(v),
					)}
				</Show>
				<button type="button" class="btn" disabled=move || busy.get() on:click=generate_details>
					"Generate details with AI"
				</button>
				<label>
					"Description"
					<textarea
						rows="5"
						prop:value=move || form.with(|f| f.description.clone())
						on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
					></textarea>
				</label>
				<label>
					"Wiring guide"
					<textarea
						rows="5"
						prop:value=move || form.with(|f| f.wiring_guide.clone())
						on:input=move |ev| form.update(|f| f.wiring_guide = event_target_value(&ev))
					></textarea>
				</label>

				<fieldset class="images">
					<legend>"Images"</legend>
					<ul class="images__list">
						{move || {
							form.with(|f| f.image_urls.clone())
								.into_iter()
								.enumerate()
								.map(|(index, url)| {
									view! {
										<li>
											<img src=url.clone() alt="" />
											<button
												type="button"
												title="Remove image"
												on:click=move |_| form.update(|f| f.remove_image(index))
											>
												"×"
											</button>
										</li>
									}
								})
								.collect_view()
						}}
					</ul>
					<div class="images__add">
						<input
							type="url"
							placeholder="https://..."
							prop:value=move || form.with(|f| f.image_url_input.clone())
							on:input=move |ev| form.update(|f| f.image_url_input = event_target_value(&ev))
						/>
						<button type="button" class="btn" on:click=move |_| form.update(ComponentForm::add_image_url)>
							"Add URL"
						</button>
					</div>
					<input type="file" accept="image/*" multiple node_ref=file_input />
				</fieldset>

				<div class="admin__form-actions">
					<button type="submit" class="btn btn--primary" disabled=move || busy.get()>
						{move || match (busy.get(), editing.get().is_some()) {
							(true, _) => "Saving...",
							(false, true) => "Update Component",
							(false, false) => "Add Component",
						}}
					</button>
					<Show when=move || editing.get().is_some()>
						<button type="button" class="btn" on:click=move |_| reset()>"Cancel"</button>
					</Show>
				</div>
			</form>

			<table class="admin__table">
				<thead>
					<tr>
						<th>"Name"</th>
						<th>"Category"</th>
						<th></th>
					</tr>
				</thead>
				<tbody>
					{move || {
						components
							.with(|all| filter_components(all, &search.get()))
							.into_iter()
							.map(|c| {
								let id = c.id;
								let draft = ComponentForm::edit(&c);
								view! {
									<tr>
										<td>{c.name}</td>
										<td>{c.category}</td>
										<td class="admin__row-actions">
											<button
												class="btn"
												on:click=move |_| {
													form.set(draft.clone());
													editing.set(Some(id));
												}
											>
												"Edit"
											</button>
											<button
												class="btn btn--danger"
												on:click=move |_| delete.with_value(|delete| delete(id))
											>
												"Delete"
											</button>
										</td>
									</tr>
								}
							})
							.collect_view()
					}}
				</tbody>
			</table>
		</div>
	}
}

/// Route `/admin`.
#[component]
pub fn Admin() -> impl IntoView {
	let unlocked = RwSignal::new(false);
	view! {
		<Show when=move || unlocked.get() fallback=move || view! { <PasswordGate unlocked=unlocked /> }>
			<Dashboard />
		</Show>
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn servo(category: &str) -> Component {
		Component {
			id: 4,
			name: "SG90 Servo".into(),
			description: "Micro servo".into(),
			category: category.into(),
			wiring_guide: None,
			image_url: ImageUrls(vec!["https://img/servo.png".into()]),
			created_at: None,
		}
	}

	#[test]
	fn editing_a_known_category_uses_the_preset() {
		let form = ComponentForm::edit(&servo("Actuator"));
		assert_eq!(form.custom_category, None);
		assert_eq!(form.category(), "Actuator");
	}

	#[test]
	fn editing_an_unknown_category_switches_to_custom() {
		let form = ComponentForm::edit(&servo("Motion"));
		assert_eq!(form.custom_category.as_deref(), Some("Motion"));
		assert_eq!(form.category(), "Motion");
		assert_eq!(form.to_draft(vec![]).category, "Motion");
	}

	#[test]
	fn draft_collects_every_image_source_in_order() {
		let mut form = ComponentForm::edit(&servo("Actuator"));
		form.image_url_input = " https://img/typed.png ".into();
		let draft = form.to_draft(vec!["https://cdn/uploaded.png".into()]);
		assert_eq!(
			draft.image_url,
			ImageUrls(vec![
				"https://img/servo.png".into(),
				"https://cdn/uploaded.png".into(),
				"https://img/typed.png".into(),
			])
		);
		assert_eq!(draft.wiring_guide, None);
	}

	#[test]
	fn image_list_editing() {
		let mut form = ComponentForm::default();
		form.image_url_input = "a.png".into();
		form.add_image_url();
		form.image_url_input = "   ".into();
		form.add_image_url();
		form.image_url_input = "b.png".into();
		form.add_image_url();
		assert_eq!(form.image_urls, vec!["a.png".to_string(), "b.png".to_string()]);
		assert_eq!(form.image_url_input, "");
		form.remove_image(0);
		form.remove_image(5);
		assert_eq!(form.image_urls, vec!["b.png".to_string()]);
	}
}
