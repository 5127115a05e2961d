use std::collections::HashSet;

use log::warn;

use super::types::{Connection, Diagram};
use super::visual::{EdgeStyle, VisualEdge};

pub fn edge_label(from_pin: &str, to_pin: &str) -> String {
	format!("{from_pin} → {to_pin}")
}

pub fn wire_style(conn: &Connection) -> EdgeStyle {
	EdgeStyle {
		stroke: conn.color.hex().to_string(),
		stroke_width: 2.0,
		arrow: true,
	}
}

pub fn edge_from_connection(conn: &Connection) -> VisualEdge {
	VisualEdge {
		id: conn.id.clone(),
		source: conn.from.clone(),
		source_anchor: conn.from_pin.clone(),
		target: conn.to.clone(),
		target_anchor: conn.to_pin.clone(),
		label: Some(edge_label(&conn.from_pin, &conn.to_pin)),
		style: wire_style(conn),
		selected: false,
	}
}

/// One edge per connection whose endpoints exist. Wires to unknown nodes
/// have nowhere to attach and are dropped with a warning, as are repeats of
/// an id already drawn.
pub fn build_edges(diagram: &Diagram) -> Vec<VisualEdge> {
	let mut ids = HashSet::new();
	diagram
		.connections
		.iter()
		.filter(|conn| {
			let drawable = diagram.node(&conn.from).is_some() && diagram.node(&conn.to).is_some();
			if !drawable {
				warn!("skipping wire {}: {} -> {} has a missing endpoint", conn.id, conn.from, conn.to);
				return false;
			}
			if !ids.insert(conn.id.as_str()) {
				warn!("skipping wire {}: id already drawn", conn.id);
				return false;
			}
			true
		})
		.map(edge_from_connection)
		.collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::circuit::types::{CircuitNode, NodeKind, WireColor};

	fn diagram() -> Diagram {
		let node = |id: &str, kind, pins: &[&str]| CircuitNode {
			id: id.into(),
			label: id.into(),
			kind,
			pins: pins.iter().map(|p| p.to_string()).collect(),
		};
		let wire = |id: &str, from: &str, from_pin: &str, to: &str, to_pin: &str, color| Connection {
			id: id.into(),
			from: from.into(),
			from_pin: from_pin.into(),
			to: to.into(),
			to_pin: to_pin.into(),
			color,
		};
		Diagram {
			nodes: vec![
				node("u1", NodeKind::Microcontroller, &["5V", "GND", "D2"]),
				node("p1", NodeKind::Peripheral, &["VCC", "GND", "DATA"]),
			],
			connections: vec![
				wire("c1", "u1", "5V", "p1", "VCC", WireColor::Red),
				wire("c2", "u1", "GND", "p1", "GND", WireColor::Black),
				wire("c3", "u1", "D2", "nowhere", "IN", WireColor::Green),
			],
			explanation: String::new(),
		}
	}

	#[test]
	fn wires_become_colored_labelled_edges() {
		let edges = build_edges(&diagram());
		assert_eq!(edges.len(), 2);

		let power = &edges[0];
		assert_eq!(power.id, "c1");
		assert_eq!((power.source.as_str(), power.source_anchor.as_str()), ("u1", "5V"));
		assert_eq!((power.target.as_str(), power.target_anchor.as_str()), ("p1", "VCC"));
		assert_eq!(power.label.as_deref(), Some("5V → VCC"));
		assert_eq!(power.style.stroke, "#DC2626");
		assert!(power.style.arrow);
		assert_eq!(edges[1].style.stroke, "#1F2937");
	}

	#[test]
	fn repeated_connection_ids_draw_once() {
		let mut d = diagram();
		let mut again = d.connections[1].clone();
		again.from_pin = "D2".into();
		d.connections.push(again);
		let edges = build_edges(&d);
		let ids: Vec<&str> = edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, vec!["c1", "c2"]);
		assert_eq!(edges[1].source_anchor, "GND");
	}

	#[test]
	fn building_twice_is_identical() {
		let d = diagram();
		assert_eq!(build_edges(&d), build_edges(&d));
	}
}
