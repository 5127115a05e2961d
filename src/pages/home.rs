use leptos::prelude::*;
use leptos_router::components::A;

use crate::circuit::{CircuitNode, Connection, Diagram, NodeKind, WireColor};
use crate::components::circuit_canvas::CircuitCanvas;
use crate::config::PRODUCT_NAME;

fn node(id: &str, label: &str, kind: NodeKind, pins: &[&str]) -> CircuitNode {
	CircuitNode {
		id: id.into(),
		label: label.into(),
		kind,
		pins: pins.iter().map(|p| p.to_string()).collect(),
	}
}

fn wire(id: &str, from: (&str, &str), to: (&str, &str), color: WireColor) -> Connection {
	Connection {
		id: id.into(),
		from: from.0.into(),
		from_pin: from.1.into(),
		to: to.0.into(),
		to_pin: to.1.into(),
		color,
	}
}

/// Sample shown by "View Example": an UNO reading a DHT11 and driving an
/// OLED over I2C.
fn example_diagram() -> Diagram {
	use NodeKind::*;
	use WireColor::*;
	Diagram {
		nodes: vec![
			node("u1", "Arduino UNO", Microcontroller, &["5V", "GND", "D2", "A4", "A5", "3.3V"]),
			node("p1", "DHT11", Peripheral, &["VCC", "DATA", "GND"]),
			node("p2", "SSD1306 OLED", Peripheral, &["VCC", "GND", "SDA", "SCL"]),
		],
		connections: vec![
			wire("c1", ("u1", "5V"), ("p1", "VCC"), Red),
			wire("c2", ("u1", "GND"), ("p1", "GND"), Black),
			wire("c3", ("u1", "D2"), ("p1", "DATA"), Blue),
			wire("c4", ("u1", "3.3V"), ("p2", "VCC"), Red),
			wire("c5", ("u1", "GND"), ("p2", "GND"), Black),
			wire("c6", ("u1", "A4"), ("p2", "SDA"), Green),
			wire("c7", ("u1", "A5"), ("p2", "SCL"), Yellow),
		],
		explanation: "The DHT11 reports temperature on D2; the OLED shares the I2C bus on A4/A5."
			.into(),
	}
}

#[component]
fn FeatureCard(title: &'static str, desc: &'static str) -> impl IntoView {
	view! {
		<div class="feature-card">
			<h3>{title}</h3>
			<p>{desc}</p>
		</div>
	}
}

#[component]
fn ExampleModal(open: RwSignal<bool>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let diagram = Signal::derive(|| Some(example_diagram()));
	view! {
		<div class="modal-backdrop" on:click=move |_| open.set(false)>
			<div class="modal modal--wide" on:click=|ev| ev.stop_propagation()>
				<button class="modal__close" title="Close" on:click=move |_| open.set(false)>
					"×"
				</button>
				<div class="example-canvas">
					<CircuitCanvas diagram=diagram canvas_ref=canvas_ref />
				</div>
			</div>
		</div>
	}
}

/// Landing page.
#[component]
pub fn Home() -> impl IntoView {
	let show_example = RwSignal::new(false);

	view! {
		<div class="home">
			<Show when=move || show_example.get()>
				<ExampleModal open=show_example />
			</Show>

			<nav class="home__nav">
				<span class="brand">{PRODUCT_NAME}</span>
				<div class="home__links">
					<a href="#features">"Features"</a>
					<a href="#ai-course">"AI Course"</a>
					<A href="/study">"Study Guide"</A>
					<A href="/app" attr:class="btn btn--primary">"Launch App"</A>
				</div>
			</nav>

			<section class="hero">
				<span class="pill">"AI-Powered Circuit Design"</span>
				<h1>"Build Circuits & " <span class="gradient">"Master AI"</span></h1>
				<p>
					"The platform for young innovators. Design circuits instantly with AI and learn "
					"Artificial Intelligence with the Tech Watt AI for Kids curriculum."
				</p>
				<div class="hero__actions">
					<A href="/app" attr:class="btn btn--primary btn--large">"Start Designing Free →"</A>
					<button class="btn btn--large" on:click=move |_| show_example.set(true)>
						"View Example"
					</button>
				</div>
			</section>

			<section id="features" class="features">
				<h2>"Everything You Need to Build"</h2>
				<div class="features__grid">
					<FeatureCard
						title="Intelligent Diagrams"
						desc="Enter a prompt like 'Arduino with Servo' and get a pin-to-pin wiring diagram instantly."
					/>
					<FeatureCard
						title="Auto-Generated Code"
						desc="Get ready-to-flash C++ (Arduino) or Python code for your new circuit."
					/>
					<FeatureCard
						title="Instant BOM & Cost"
						desc="A detailed bill of materials with price estimates for every component."
					/>
					<FeatureCard
						title="AI for Kids Course"
						desc="A complete 8-week curriculum teaching AI concepts, prompting and ethical use."
					/>
				</div>
			</section>

			<section id="ai-course" class="course-teaser">
				<h2>"Tech Watt AI for Kids"</h2>
				<p>
					"A structured 8-week course, from \"What is AI?\" to building AI-powered study assistants."
				</p>
				<ul class="checklist">
					<li>"Master Prompt Engineering"</li>
					<li>"Use Tools like ChatGPT & Teachable Machine"</li>
					<li>"Build Real-World AI Projects"</li>
				</ul>
				<A href="/study" attr:class="btn btn--accent">"Start Learning Now →"</A>
			</section>

			<footer class="home__footer">"© 2026 TechWatt AI. All rights reserved."</footer>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn example_is_consistent() {
		let diagram = example_diagram();
		assert!(diagram.validate().is_empty());
		assert_eq!(diagram.controller().map(|c| c.id.as_str()), Some("u1"));
	}
}
