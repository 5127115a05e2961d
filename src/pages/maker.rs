//! The circuit maker: prompt, diagram, code and bill of materials.

use gloo::dialogs::alert;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;
use log::{debug, error, info, warn};
use web_sys::{KeyboardEvent, MouseEvent};

use crate::api::{BillOfMaterials, FirmwareCode, SaveRequest};
use crate::circuit::{Diagram, WireColor};
use crate::components::auth_modal::AuthModal;
use crate::components::circuit_canvas::{CircuitCanvas, export_png};
use crate::components::history_drawer::HistoryDrawer;
use crate::components::result_panels::{BomPanel, CodePanel};
use crate::config::{PRODUCT_NAME, SHARE_QUERY_PARAM};
use crate::session::{GenerationEpoch, Session, use_session};

pub const SIDEBAR_MIN_WIDTH: f64 = 260.0;
pub const SIDEBAR_MAX_WIDTH: f64 = 560.0;
const SIDEBAR_DEFAULT_WIDTH: f64 = 320.0;

const GENERATE_FAILED: &str = "Failed to generate diagram. Please try again.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
	#[default]
	Diagram,
	Code,
	Bom,
}

impl Tab {
	pub const ALL: [Tab; 3] = [Tab::Diagram, Tab::Code, Tab::Bom];

	pub fn title(self) -> &'static str {
		match self {
			Tab::Diagram => "Diagram",
			Tab::Code => "Code",
			Tab::Bom => "BOM",
		}
	}
}

/// Wire colors explained in the side panel.
pub const LEGEND: [(WireColor, &str); 4] = [
	(WireColor::Red, "Power (5V/3.3V)"),
	(WireColor::Black, "Ground"),
	(WireColor::Blue, "Data/Signal"),
	(WireColor::Green, "Data/Signal"),
];

pub fn clamp_sidebar(width: f64) -> f64 {
	width.clamp(SIDEBAR_MIN_WIDTH, SIDEBAR_MAX_WIDTH)
}

/// Public link that reopens a saved circuit.
pub fn share_link(origin: &str, id: &str) -> String {
	format!("{}/app?{SHARE_QUERY_PARAM}={id}", origin.trim_end_matches('/'))
}

/// The diagram on screen, the prompt that produced it and the generation
/// ticket it arrived under. Follow-up fetches reuse that ticket.
#[derive(Clone, Debug, PartialEq)]
struct Circuit {
	query: String,
	diagram: Diagram,
	ticket: u64,
}

/// Page state. Every field is an arena handle, so the whole thing is `Copy`
/// and can be captured by any number of handlers.
#[derive(Clone, Copy)]
struct MakerState {
	session: StoredValue<Session>,
	epoch: StoredValue<GenerationEpoch>,
	query: RwSignal<String>,
	circuit: RwSignal<Option<Circuit>>,
	code: RwSignal<Option<FirmwareCode>>,
	bom: RwSignal<Option<BillOfMaterials>>,
	generating: RwSignal<bool>,
	code_loading: RwSignal<bool>,
	bom_loading: RwSignal<bool>,
	saving: RwSignal<bool>,
	share_id: RwSignal<Option<String>>,
	tab: RwSignal<Tab>,
	auth_open: RwSignal<bool>,
	history_open: RwSignal<bool>,
}

/// Query and ticket for a tab's follow-up fetch, or `None` when nothing is
/// shown or the circuit on screen has already been superseded.
fn followup(circuit: Option<&Circuit>, epoch: &GenerationEpoch) -> Option<(String, u64)> {
	let circuit = circuit?;
	epoch
		.is_current(circuit.ticket)
		.then(|| (circuit.query.clone(), circuit.ticket))
}

impl MakerState {
	fn new(session: Session) -> Self {
		Self {
			session: StoredValue::new(session),
			epoch: StoredValue::new(GenerationEpoch::default()),
			query: RwSignal::new(String::new()),
			circuit: RwSignal::new(None),
			code: RwSignal::new(None),
			bom: RwSignal::new(None),
			generating: RwSignal::new(false),
			code_loading: RwSignal::new(false),
			bom_loading: RwSignal::new(false),
			saving: RwSignal::new(false),
			share_id: RwSignal::new(None),
			tab: RwSignal::new(Tab::Diagram),
			auth_open: RwSignal::new(false),
			history_open: RwSignal::new(false),
		}
	}

	fn session(self) -> Session {
		self.session.get_value()
	}

	fn epoch(self) -> GenerationEpoch {
		self.epoch.get_value()
	}

	/// Replaces whatever is on screen with a fresh circuit.
	fn show(self, circuit: Circuit) {
		self.code.set(None);
		self.bom.set(None);
		self.release_followups();
		self.share_id.set(None);
		self.circuit.set(Some(circuit));
	}

	/// Follow-up requests of a superseded generation never report back, so
	/// their in-flight flags are dropped here.
	fn release_followups(self) {
		self.code_loading.set(false);
		self.bom_loading.set(false);
	}

	fn generate(self) {
		let query = self.query.get_untracked().trim().to_string();
		if query.is_empty() {
			return;
		}
		let (api, epoch) = (self.session().api, self.epoch());
		let ticket = epoch.begin();
		self.generating.set(true);
		spawn_local(async move {
			let result = api.generate(&query).await;
			if !epoch.is_current(ticket) {
				debug!("discarding superseded diagram for {query:?}");
				return;
			}
			self.generating.set(false);
			match result {
				Ok(diagram) => {
					info!(
						"generated {} nodes and {} wires",
						diagram.nodes.len(),
						diagram.connections.len()
					);
					self.show(Circuit {
						query: query.clone(),
						diagram,
						ticket,
					});
					self.fetch_code(query.clone(), ticket);
					self.fetch_bom(query, ticket);
				}
				Err(err) => {
					error!("diagram generation failed: {err}");
					self.release_followups();
					alert(GENERATE_FAILED);
				}
			}
		});
	}

	fn fetch_code(self, query: String, ticket: u64) {
		if self.code_loading.get_untracked() {
			return;
		}
		self.code_loading.set(true);
		let (api, epoch) = (self.session().api, self.epoch());
		spawn_local(async move {
			let result = api.generate_code(&query).await;
			if !epoch.is_current(ticket) {
				debug!("discarding superseded code");
				return;
			}
			self.code_loading.set(false);
			match result {
				Ok(code) => self.code.set(Some(code)),
				Err(err) => {
					error!("code generation failed: {err}");
					alert("Failed to generate code. Please try again.");
				}
			}
		});
	}

	fn fetch_bom(self, query: String, ticket: u64) {
		if self.bom_loading.get_untracked() {
			return;
		}
		self.bom_loading.set(true);
		let (api, epoch) = (self.session().api, self.epoch());
		spawn_local(async move {
			let result = api.generate_bom(&query).await;
			if !epoch.is_current(ticket) {
				debug!("discarding superseded bill of materials");
				return;
			}
			self.bom_loading.set(false);
			match result {
				Ok(bom) => self.bom.set(Some(bom)),
				Err(err) => {
					error!("bill of materials failed: {err}");
					alert("Failed to generate bill of materials. Please try again.");
				}
			}
		});
	}

	/// Switches tabs, fetching the tab's artifact if it is still missing.
	fn select_tab(self, tab: Tab) {
		self.tab.set(tab);
		let epoch = self.epoch();
		let Some((query, ticket)) = self.circuit.with_untracked(|c| followup(c.as_ref(), &epoch))
		else {
			return;
		};
		match tab {
			Tab::Code if self.code.with_untracked(Option::is_none) => self.fetch_code(query, ticket),
			Tab::Bom if self.bom.with_untracked(Option::is_none) => self.fetch_bom(query, ticket),
			_ => {}
		}
	}

	fn save(self) {
		let session = self.session();
		let Some(token) = session.token() else {
			self.auth_open.set(true);
			return;
		};
		let Some(circuit) = self.circuit.get_untracked() else {
			return;
		};
		let request = SaveRequest {
			query: circuit.query,
			diagram_data: circuit.diagram,
			code: self
				.code
				.with_untracked(|c| c.as_ref().map(|c| c.code.clone()))
				.unwrap_or_default(),
			bom: self
				.bom
				.with_untracked(|b| b.as_ref().map(|b| b.items.clone()))
				.unwrap_or_default(),
		};
		self.saving.set(true);
		spawn_local(async move {
			match session.api.save(&request, Some(&token)).await {
				Ok(id) => {
					info!("saved circuit {id}");
					self.share_id.set(Some(id));
				}
				Err(err) if err.is_unauthorized() => {
					warn!("save rejected the session: {err}");
					session.sign_out();
					self.auth_open.set(true);
				}
				Err(err) => {
					error!("saving failed: {err}");
					alert("Failed to save circuit. Please try again.");
				}
			}
			self.saving.set(false);
		});
	}

	/// Opens a saved circuit by id, superseding any generation in flight.
	fn load_shared(self, id: String) {
		let (api, epoch) = (self.session().api, self.epoch());
		let ticket = epoch.begin();
		self.generating.set(true);
		spawn_local(async move {
			let result = api.load_circuit(&id).await;
			if !epoch.is_current(ticket) {
				debug!("discarding superseded load of {id}");
				return;
			}
			self.generating.set(false);
			match result {
				Ok(saved) => {
					info!("loaded circuit {id}");
					self.query.set(saved.query.clone());
					self.show(Circuit {
						query: saved.query,
						diagram: saved.diagram_data,
						ticket,
					});
					self.code.set(saved.code.map(|code| FirmwareCode {
						code,
						explanation: String::new(),
					}));
					self.bom.set(saved.bom.map(|items| BillOfMaterials {
						items,
						..Default::default()
					}));
					self.share_id.set(Some(id));
				}
				Err(err) => {
					error!("loading circuit {id} failed: {err}");
					self.release_followups();
					alert("Failed to load circuit. It may have been removed.");
				}
			}
		});
	}
}

#[component]
fn Legend() -> impl IntoView {
	view! {
		<div class="legend">
			<h3>"Wire Colors"</h3>
			<div class="legend__grid">
				{LEGEND
					.iter()
					.map(|(color, meaning)| {
						view! {
							<div class="legend__item">
								<span
									class="legend__swatch"
									style:background-color=color.hex()
								></span>
								<span>{*meaning}</span>
							</div>
						}
					})
					.collect_view()}
			</div>
		</div>
	}
}

#[component]
fn AccountButtons(maker: MakerState) -> impl IntoView {
	let session = use_session();
	let auth = session.auth;
	move || {
		let session = session.clone();
		match auth.with(|a| a.email().map(str::to_owned)) {
			Some(email) => view! {
				<span class="account__email">{email}</span>
				<button class="btn" on:click=move |_| maker.history_open.set(true)>
					"History"
				</button>
				<button class="btn" on:click=move |_| session.sign_out()>"Sign out"</button>
			}
			.into_any(),
			None => view! {
				<button class="btn" on:click=move |_| maker.auth_open.set(true)>"Sign in"</button>
			}
			.into_any(),
		}
	}
}

/// Route `/app`.
#[component]
pub fn Maker() -> impl IntoView {
	let maker = MakerState::new(use_session());
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let sidebar_width = RwSignal::new(SIDEBAR_DEFAULT_WIDTH);
	let resizing = RwSignal::new(false);

	let query_map = use_query_map();
	Effect::new(move |last: Option<Option<String>>| {
		let id = query_map
			.with(|q| q.get(SHARE_QUERY_PARAM))
			.filter(|id| !id.is_empty());
		if id.is_some() && last.flatten() != id {
			if let Some(id) = id.clone() {
				maker.load_shared(id);
			}
		}
		id
	});

	let move_handle = window_event_listener(leptos::ev::mousemove, move |ev: MouseEvent| {
		if resizing.get_untracked() {
			sidebar_width.set(clamp_sidebar(ev.client_x() as f64));
		}
	});
	let up_handle = window_event_listener(leptos::ev::mouseup, move |_| resizing.set(false));
	on_cleanup(move || {
		move_handle.remove();
		up_handle.remove();
	});

	let diagram = Signal::derive(move || maker.circuit.with(|c| c.as_ref().map(|c| c.diagram.clone())));
	let explanation = move || {
		maker
			.circuit
			.with(|c| c.as_ref().map(|c| c.diagram.explanation.clone()))
			.filter(|e| !e.is_empty())
	};
	let has_diagram = move || maker.circuit.with(|c| c.as_ref().is_some_and(|c| !c.diagram.is_empty()));

	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" && !ev.shift_key() {
			ev.prevent_default();
			maker.generate();
		}
	};

	let on_export = move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if let Err(err) = export_png(&canvas) {
			error!("export failed: {err}");
		}
	};

	let share_url = move || {
		let id = maker.share_id.get()?;
		let origin = web_sys::window()
			.and_then(|w| w.location().origin().ok())
			.unwrap_or_default();
		Some(share_link(&origin, &id))
	};

	view! {
		<div class="maker" class:maker--resizing=move || resizing.get()>
			<header class="maker__header">
				<A href="/" attr:class="brand">
					<span class="brand__mark">"⚡"</span>
					<span>
						<strong>{PRODUCT_NAME}</strong>
						<small>"Wiring Diagram Generator"</small>
					</span>
				</A>
				<div class="maker__actions">
					<button class="btn" disabled=move || !has_diagram() on:click=on_export>
						"Export PNG"
					</button>
					<button
						class="btn btn--primary"
						disabled=move || !has_diagram() || maker.saving.get()
						on:click=move |_| maker.save()
					>
						{move || if maker.saving.get() { "Saving..." } else { "Save & Share" }}
					</button>
					<AccountButtons maker=maker />
				</div>
			</header>

			<div class="maker__body">
				<aside class="maker__sidebar" style:width=move || format!("{}px", sidebar_width.get())>
					<label for="query">"Describe Your Circuit"</label>
					<textarea
						id="query"
						placeholder="e.g., Arduino with DHT11 temperature sensor and OLED display"
						prop:value=move || maker.query.get()
						on:input=move |ev| maker.query.set(event_target_value(&ev))
						on:keydown=on_keydown
					></textarea>
					<button
						class="btn btn--primary btn--wide"
						disabled=move || maker.generating.get() || maker.query.with(|q| q.trim().is_empty())
						on:click=move |_| maker.generate()
					>
						{move || if maker.generating.get() { "Generating..." } else { "Generate Diagram" }}
					</button>

					{move || {
						share_url()
							.map(|url| {
								view! {
									<div class="share-box">
										<h3>"Share link"</h3>
										<a href=url.clone() target="_blank">{url.clone()}</a>
									</div>
								}
							})
					}}

					{move || {
						explanation()
							.map(|text| {
								view! {
									<div class="explanation">
										<h3>"Circuit Explanation"</h3>
										<p>{text}</p>
									</div>
								}
							})
					}}

					<Legend />
				</aside>

				<div
					class="maker__resize-handle"
					title="Drag to resize"
					on:mousedown=move |ev: MouseEvent| {
						ev.prevent_default();
						resizing.set(true);
					}
				></div>

				<main class="maker__main">
					<nav class="tabs">
						{Tab::ALL
							.into_iter()
							.map(|tab| {
								view! {
									<button
										class="tabs__tab"
										class:tabs__tab--active=move || maker.tab.get() == tab
										on:click=move |_| maker.select_tab(tab)
									>
										{tab.title()}
									</button>
								}
							})
							.collect_view()}
					</nav>

					<section class="tab-body" class:hidden=move || maker.tab.get() != Tab::Diagram>
						<CircuitCanvas diagram=diagram canvas_ref=canvas_ref />
						<Show when=move || !has_diagram() && !maker.generating.get()>
							<div class="empty-state">
								<p class="empty-state__title">"No Diagram Yet"</p>
								<p>"Enter a circuit description and click Generate"</p>
							</div>
						</Show>
					</section>
					<Show when=move || maker.tab.get() == Tab::Code>
						<section class="tab-body">
							<CodePanel code=maker.code loading=maker.code_loading />
						</section>
					</Show>
					<Show when=move || maker.tab.get() == Tab::Bom>
						<section class="tab-body">
							<BomPanel bom=maker.bom loading=maker.bom_loading />
						</section>
					</Show>
				</main>
			</div>

			<HistoryDrawer
				open=maker.history_open
				on_select=Callback::new(move |id: String| maker.load_shared(id))
			/>
			<AuthModal open=maker.auth_open />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sidebar_width_is_clamped() {
		assert_eq!(clamp_sidebar(100.0), SIDEBAR_MIN_WIDTH);
		assert_eq!(clamp_sidebar(400.0), 400.0);
		assert_eq!(clamp_sidebar(2000.0), SIDEBAR_MAX_WIDTH);
	}

	#[test]
	fn share_links_point_at_the_app_route() {
		assert_eq!(
			share_link("https://circuits.example.com/", "3f9a1c2e"),
			"https://circuits.example.com/app?id=3f9a1c2e"
		);
		assert_eq!(share_link("", "x"), "/app?id=x");
	}

	fn circuit(query: &str, ticket: u64) -> Circuit {
		Circuit {
			query: query.into(),
			diagram: Diagram::default(),
			ticket,
		}
	}

	#[test]
	fn tab_fetches_belong_to_the_circuit_on_screen() {
		let epoch = GenerationEpoch::default();
		let first = circuit("blink an LED", epoch.begin());
		assert_eq!(
			followup(Some(&first), &epoch),
			Some(("blink an LED".to_string(), first.ticket))
		);

		// a newer generate is in flight while the old circuit is still shown
		let pending = epoch.begin();
		assert_eq!(followup(Some(&first), &epoch), None);

		let second = circuit("servo sweep", pending);
		assert_eq!(
			followup(Some(&second), &epoch),
			Some(("servo sweep".to_string(), pending))
		);
		assert_eq!(followup(None, &epoch), None);
	}

	#[test]
	fn legend_uses_wire_palette() {
		assert_eq!(LEGEND[0].0.hex(), "#DC2626");
		assert_eq!(LEGEND[1].0.hex(), "#1F2937");
		assert!(LEGEND[2..].iter().all(|(_, meaning)| *meaning == "Data/Signal"));
	}
}
