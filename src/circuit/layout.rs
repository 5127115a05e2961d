//! Initial placement: the controller in the middle, peripherals on a ring.

use std::f64::consts::PI;

use log::warn;

use super::types::{CircuitNode, Diagram};
use super::visual::{NodeRenderData, Point, VisualNode};

/// Where the controller block goes.
pub const CONTROLLER_ANCHOR: Point = Point::new(300.0, 200.0);
/// Radius of the peripheral ring.
pub const PERIPHERAL_RADIUS: f64 = 300.0;
/// Shift applied to the ring so it is not centered on the controller's corner.
pub const RING_OFFSET: Point = Point::new(200.0, 100.0);

/// Angle of peripheral `index` out of `count`, starting straight up.
pub fn peripheral_angle(index: usize, count: usize) -> f64 {
	(index as f64 / count as f64) * 2.0 * PI - PI / 2.0
}

pub fn peripheral_position(index: usize, count: usize) -> Point {
	let angle = peripheral_angle(index, count);
	Point::new(
		CONTROLLER_ANCHOR.x + angle.cos() * PERIPHERAL_RADIUS + RING_OFFSET.x,
		CONTROLLER_ANCHOR.y + angle.sin() * PERIPHERAL_RADIUS + RING_OFFSET.y,
	)
}

fn visual(node: &CircuitNode, position: Point) -> VisualNode {
	VisualNode {
		id: node.id.clone(),
		position,
		data: NodeRenderData {
			label: node.label.clone(),
			kind: node.kind,
			pins: node.pins.clone(),
		},
		selected: false,
	}
}

/// Places every node of `diagram`. The controller (if any) comes first,
/// followed by peripherals in input order.
pub fn layout(diagram: &Diagram) -> Vec<VisualNode> {
	let controller = diagram.controller();
	let peripherals: Vec<&CircuitNode> = diagram
		.nodes
		.iter()
		.filter(|n| !controller.is_some_and(|c| std::ptr::eq(*n, c)))
		.collect();

	if peripherals.iter().any(|n| n.is_controller()) {
		warn!("diagram has more than one microcontroller, extra ones go on the ring");
	}

	let count = peripherals.len();
	controller
		.map(|c| visual(c, CONTROLLER_ANCHOR))
		.into_iter()
		.chain(
			peripherals
				.iter()
				.enumerate()
				.map(|(i, node)| visual(node, peripheral_position(i, count))),
		)
		.collect()
}
