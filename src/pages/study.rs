//! Study hub: component library, AI curriculum and a printable guide.

use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use log::{error, info};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::api::{Component, CourseModule};
use crate::error::AppError;
use crate::markdown;
use crate::session::use_session;

const ACADEMY_URL: &str = "https://www.techwatt.ai/";
/// How long a generated guide's object URL stays valid after opening.
const GUIDE_URL_LIFETIME_MS: u32 = 60_000;

/// Library entries whose name or category contains `search`, ignoring case.
/// An empty search keeps everything.
pub fn filter_components(components: &[Component], search: &str) -> Vec<Component> {
	let needle = search.trim().to_lowercase();
	components
		.iter()
		.filter(|c| {
			needle.is_empty()
				|| c.name.to_lowercase().contains(&needle)
				|| c.category.to_lowercase().contains(&needle)
		})
		.cloned()
		.collect()
}

fn multiline(text: &str) -> String {
	markdown::escape(text).replace('\n', "<br>")
}

/// Standalone printable HTML document describing `components`.
pub fn study_guide_html(components: &[Component], year: u32) -> String {
	let mut body = String::new();
	for c in components {
		let name = markdown::escape(&c.name);
		body.push_str("<div class=\"component\"><div class=\"header\">");
		body.push_str(&format!(
			"<span class=\"name\">{name}</span><span class=\"category\">{}</span></div>",
			markdown::escape(&c.category)
		));
		body.push_str("<div style=\"overflow: auto;\">");
		if let Some(src) = c.image_url.first() {
			body.push_str(&format!(
				"<img src=\"{}\" alt=\"{name}\" />",
				markdown::escape(src)
			));
		}
		body.push_str(&format!(
			"<div class=\"section\"><div class=\"section-title\">How It Works</div><p>{}</p></div>",
			multiline(&c.description)
		));
		if let Some(guide) = c.wiring_guide.as_deref().filter(|g| !g.trim().is_empty()) {
			body.push_str(&format!(
				"<div class=\"section\"><div class=\"section-title\">Wiring Guide</div><div class=\"wiring\">{}</div></div>",
				multiline(guide)
			));
		}
		body.push_str("</div></div>");
	}

	format!(
		r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Tech Watt Robotics Study Guide</title>
<style>
body {{ font-family: Arial, sans-serif; color: #333; padding: 20px; }}
h1 {{ text-align: center; color: #000; border-bottom: 2px solid #000; padding-bottom: 10px; }}
.subtitle {{ text-align: center; color: #666; margin-bottom: 30px; }}
.component {{ border: 1px solid #ccc; border-radius: 8px; padding: 20px; margin-bottom: 20px; page-break-inside: avoid; }}
.header {{ display: flex; justify-content: space-between; align-items: center; margin-bottom: 10px; }}
.name {{ font-size: 24px; font-weight: bold; }}
.category {{ background: #eee; padding: 4px 8px; border-radius: 4px; font-size: 12px; font-weight: bold; text-transform: uppercase; }}
.section {{ margin-top: 15px; }}
.section-title {{ font-weight: bold; color: #0056b3; margin-bottom: 5px; }}
.wiring {{ font-family: monospace; background: #f9f9f9; padding: 10px; border-radius: 4px; border-left: 4px solid #0056b3; }}
img {{ max-width: 150px; float: right; margin-left: 20px; margin-bottom: 10px; border-radius: 4px; }}
@media print {{ body {{ padding: 0; }} }}
</style>
</head>
<body>
<h1>Tech Watt Robotics Kit Guide</h1>
<p class="subtitle">Complete study guide and wiring instructions for your robotics kit.</p>
{body}
<div style="text-align: center; margin-top: 50px; color: #999; font-size: 12px;">&copy; {year} TechWatt AI</div>
</body>
</html>"#
	)
}

/// Opens `html` as a document in a new tab.
fn open_document(html: &str) -> Result<(), AppError> {
	let window = web_sys::window().ok_or(AppError::Unavailable("window"))?;
	let options = BlobPropertyBag::new();
	options.set_type("text/html");
	let parts = js_sys::Array::of1(&JsValue::from_str(html));
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;
	let opened = window.open_with_url_and_target(&url, "_blank");
	// The new tab needs the URL while it loads, so it is released later.
	Timeout::new(GUIDE_URL_LIFETIME_MS, move || {
		let _ = Url::revoke_object_url(&url);
	})
	.forget();
	opened?;
	Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
	Dashboard,
	Components,
	Ai,
	Courses,
}

impl Section {
	fn heading(self) -> &'static str {
		match self {
			Section::Dashboard => "Study Hub Dashboard",
			Section::Components => "Robotics Kit Components",
			Section::Ai => "AI Integration Guide",
			Section::Courses => "Explore Courses",
		}
	}
}

#[component]
fn Markdown(#[prop(into)] source: String) -> impl IntoView {
	view! { <div class="markdown" inner_html=markdown::to_html(&source)></div> }
}

#[component]
fn ComponentDetail(component: Component, on_close: Callback<()>) -> impl IntoView {
	let images = component.image_url.clone();
	let active = RwSignal::new(images.first().map(str::to_owned));
	let added = component
		.created_at
		.as_deref()
		.map(|d| d.split('T').next().unwrap_or(d).to_string());

	view! {
		<div class="detail">
			<button class="link-button" on:click=move |_| on_close.run(())>"← Back to Guide"</button>
			<div class="detail__grid">
				<div class="detail__media">
					<div class="detail__image">
						{move || match active.get() {
							Some(src) => view! { <img src=src alt="" /> }.into_any(),
							None => view! { <div class="detail__placeholder">"No image"</div> }.into_any(),
						}}
					</div>
					{(images.0.len() > 1)
						.then(|| {
							view! {
								<div class="detail__thumbs">
									{images
										.iter()
										.map(|src| {
											let src = src.to_string();
											let (shown, pick) = (src.clone(), src.clone());
											view! {
												<img
													src=src
													class:active=move || active.get().as_deref() == Some(shown.as_str())
													on:click=move |_| active.set(Some(pick.clone()))
												/>
											}
										})
										.collect_view()}
								</div>
							}
						})}
					<dl class="detail__specs">
						<dt>"Category"</dt>
						<dd>{component.category.clone()}</dd>
						{added.map(|d| view! { <dt>"Added On"</dt><dd>{d}</dd> })}
					</dl>
				</div>
				<div class="detail__text">
					<h2>{component.name.clone()}</h2>
					<h3>"How It Works"</h3>
					<Markdown source=component.description.clone() />
					{component
						.wiring_guide
						.clone()
						.filter(|g| !g.trim().is_empty())
						.map(|guide| {
							view! {
								<h3>"Wiring Guide"</h3>
								<Markdown source=guide />
							}
						})}
				</div>
			</div>
		</div>
	}
}

#[component]
fn CourseList(modules: RwSignal<Option<Vec<CourseModule>>>) -> impl IntoView {
	let expanded = RwSignal::new(None::<i64>);
	move || {
		let Some(list) = modules.get() else {
			return view! { <p class="muted">"Curriculum is loading..."</p> }.into_any();
		};
		if list.is_empty() {
			return view! { <p class="muted">"No course modules yet."</p> }.into_any();
		}
		view! {
			<ol class="courses">
				{list
					.into_iter()
					.map(|module| {
						let id = module.id;
						let image = module.image_url.first().map(str::to_owned);
						let content = module.content.clone().unwrap_or_default();
						view! {
							<li class="course" class:course--open=move || expanded.get() == Some(id)>
								<button
									class="course__header"
									on:click=move |_| {
										expanded.update(|e| *e = if *e == Some(id) { None } else { Some(id) })
									}
								>
									<span class="course__week">
										"Week " {module.week.map(|w| w.to_string()).unwrap_or_default()}
									</span>
									<span class="course__title">{module.title.clone()}</span>
									<span class="muted">{module.description.clone().unwrap_or_default()}</span>
								</button>
								<Show when=move || expanded.get() == Some(id)>
									<Markdown source=content.clone() />
									{image.clone().map(|src| view! { <img class="course__image" src=src alt="" /> })}
								</Show>
							</li>
						}
					})
					.collect_view()}
			</ol>
		}
			.into_any()
	}
}

/// Route `/study`.
#[component]
pub fn Study() -> impl IntoView {
	let session = use_session();
	let section = RwSignal::new(Section::Dashboard);
	let components = RwSignal::new(None::<Vec<Component>>);
	let courses = RwSignal::new(None::<Vec<CourseModule>>);
	let search = RwSignal::new(String::new());
	let selected = RwSignal::new(None::<Component>);

	let api = session.api.clone();
	spawn_local(async move {
		match api.components().await {
			Ok(list) => {
				info!("loaded {} library components", list.len());
				components.set(Some(list));
			}
			Err(err) => {
				error!("failed to load components: {err}");
				components.set(Some(Vec::new()));
			}
		}
	});

	// courses are fetched the first time their section opens
	let api = session.api.clone();
	let courses_requested = StoredValue::new(false);
	Effect::new(move |_| {
		if section.get() != Section::Ai || courses_requested.get_value() {
			return;
		}
		courses_requested.set_value(true);
		let api = api.clone();
		spawn_local(async move {
			match api.ai_courses().await {
				Ok(list) => courses.set(Some(list)),
				Err(err) => {
					error!("failed to load courses: {err}");
					courses.set(Some(Vec::new()));
				}
			}
		});
	});

	let filtered = Memo::new(move |_| {
		components.with(|c| filter_components(c.as_deref().unwrap_or_default(), &search.get()))
	});

	let print_guide = move |_| {
		let year = js_sys::Date::new_0().get_full_year();
		let html = filtered.with_untracked(|list| study_guide_html(list, year));
		if let Err(err) = open_document(&html) {
			error!("could not open study guide: {err}");
		}
	};

	let dashboard = move || {
		let card = move |target: Section, title: &'static str, blurb: &'static str| {
			view! {
				<button class="hub-card" on:click=move |_| section.set(target)>
					<h2>{title}</h2>
					<p>{blurb}</p>
				</button>
			}
		};
		view! {
			<div class="hub-grid">
				{card(
					Section::Components,
					"Robotics Kit Guide",
					"Detailed pinouts, wiring diagrams, and usage examples for every component in your kit.",
				)}
				{card(
					Section::Ai,
					"AI Guide",
					"Learn how to integrate Artificial Intelligence into your robotics projects.",
				)}
				{card(
					Section::Courses,
					"Other Courses",
					"Explore advanced topics including Computer Vision, Game Dev, and Web Design.",
				)}
			</div>
		}
	};

	let library = move || {
		if components.with(Option::is_none) {
			return view! { <p class="muted">"Loading components..."</p> }.into_any();
		}
		let list = filtered.get();
		if list.is_empty() {
			return view! { <p class="muted">"No components match your search."</p> }.into_any();
		}
		view! {
			<div class="library-grid">
				{list
					.into_iter()
					.map(|c| {
						let thumb = c.image_url.first().map(str::to_owned);
						let (name, category, description) =
							(c.name.clone(), c.category.clone(), c.description.clone());
						view! {
							<button class="library-card" on:click=move |_| selected.set(Some(c.clone()))>
								{thumb.map(|src| view! { <img src=src alt="" /> })}
								<h3>{name}</h3>
								<span class="badge">{category}</span>
								<p class="library-card__blurb">{description}</p>
							</button>
						}
					})
					.collect_view()}
			</div>
		}
			.into_any()
	};

	view! {
		<div class="study">
			<header class="study__header">
				{move || {
					if section.get() == Section::Dashboard {
						view! { <A href="/" attr:class="back">"←"</A> }.into_any()
					} else {
						view! {
							<button class="back" on:click=move |_| section.set(Section::Dashboard)>
								"←"
							</button>
						}
							.into_any()
					}
				}}
				<h1>{move || section.get().heading()}</h1>
				<Show when=move || section.get() == Section::Components>
					<input
						class="search"
						type="search"
						placeholder="Search components..."
						prop:value=move || search.get()
						on:input=move |ev| search.set(event_target_value(&ev))
					/>
					<button class="btn" on:click=print_guide>"Download Guide"</button>
				</Show>
				<A href="/admin" attr:class="admin-link" attr:title="Admin Access">"Admin"</A>
			</header>

			{move || match section.get() {
				Section::Dashboard => dashboard().into_any(),
				Section::Components => library().into_any(),
				Section::Ai => view! {
					<h2>"AI Robotics Curriculum"</h2>
					<CourseList modules=courses />
				}
				.into_any(),
				Section::Courses => view! {
					<div class="courses-cta">
						<h2>"Explore More Courses"</h2>
						<p>"Take your skills to the next level with our advanced curriculum."</p>
						<a class="btn btn--primary" href=ACADEMY_URL target="_blank" rel="noopener noreferrer">
							"Visit TechWatt Academy"
						</a>
					</div>
				}
				.into_any(),
			}}

			{move || {
				selected
					.get()
					.map(|component| {
						view! {
							<div class="overlay">
								<ComponentDetail
									component=component
									on_close=Callback::new(move |_| selected.set(None))
								/>
							</div>
						}
					})
			}}
		</div>
	}
}
