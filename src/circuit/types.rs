use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a node in the diagram. Anything the backend does not call a
/// `Microcontroller` ("Sensor", "Display", ...) is a peripheral.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
	Microcontroller,
	#[default]
	#[serde(other)]
	Peripheral,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircuitNode {
	pub id: String,
	pub label: String,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	#[serde(default)]
	pub pins: Vec<String>,
}

impl CircuitNode {
	pub fn is_controller(&self) -> bool {
		self.kind == NodeKind::Microcontroller
	}

	pub fn has_pin(&self, pin: &str) -> bool {
		self.pins.iter().any(|p| p == pin)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireColor {
	Red,
	Black,
	Blue,
	Green,
	Yellow,
	Orange,
	Purple,
	White,
	#[default]
	#[serde(other)]
	Other,
}

impl WireColor {
	/// Stroke color used on the canvas.
	pub fn hex(self) -> &'static str {
		match self {
			WireColor::Red => "#DC2626",
			WireColor::Black => "#1F2937",
			WireColor::Blue => "#2563EB",
			WireColor::Green => "#16A34A",
			WireColor::Yellow => "#CA8A04",
			WireColor::Orange => "#EA580C",
			WireColor::Purple => "#9333EA",
			// white wires would vanish on the light background
			WireColor::White => "#9CA3AF",
			WireColor::Other => "#000000",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
	pub id: String,
	pub from: String,
	#[serde(rename = "fromPin")]
	pub from_pin: String,
	pub to: String,
	#[serde(rename = "toPin")]
	pub to_pin: String,
	#[serde(default)]
	pub color: WireColor,
}

/// One generated circuit: nodes, wires and the backend's explanation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
	#[serde(default)]
	pub nodes: Vec<CircuitNode>,
	#[serde(default)]
	pub connections: Vec<Connection>,
	#[serde(default)]
	pub explanation: String,
}

/// Something in a diagram that will not render the way the backend meant it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiagramIssue {
	#[error("node id `{0}` is used more than once")]
	DuplicateNode(String),
	#[error("node `{node}` lists pin `{pin}` more than once")]
	DuplicatePin { node: String, pin: String },
	#[error("connection id `{0}` is used more than once")]
	DuplicateConnection(String),
	#[error("connection `{connection}` references unknown node `{node}`")]
	UnknownNode { connection: String, node: String },
	#[error("connection `{connection}` uses pin `{pin}` which node `{node}` does not declare")]
	UnknownPin {
		connection: String,
		node: String,
		pin: String,
	},
}

impl Diagram {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&CircuitNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// The first microcontroller, which anchors the layout.
	pub fn controller(&self) -> Option<&CircuitNode> {
		self.nodes.iter().find(|n| n.is_controller())
	}

	/// Checks node/pin references. Nothing here is fatal; callers log the
	/// issues and render what they can.
	pub fn validate(&self) -> Vec<DiagramIssue> {
		let mut issues = Vec::new();

		let mut seen = HashSet::new();
		for node in &self.nodes {
			if !seen.insert(node.id.as_str()) {
				issues.push(DiagramIssue::DuplicateNode(node.id.clone()));
			}
			let mut pins = HashSet::new();
			for pin in &node.pins {
				if !pins.insert(pin.as_str()) {
					issues.push(DiagramIssue::DuplicatePin {
						node: node.id.clone(),
						pin: pin.clone(),
					});
				}
			}
		}

		let mut seen = HashSet::new();
		for conn in &self.connections {
			if !seen.insert(conn.id.as_str()) {
				issues.push(DiagramIssue::DuplicateConnection(conn.id.clone()));
			}
			for (node_id, pin) in [(&conn.from, &conn.from_pin), (&conn.to, &conn.to_pin)] {
				match self.node(node_id) {
					None => issues.push(DiagramIssue::UnknownNode {
						connection: conn.id.clone(),
						node: node_id.clone(),
					}),
					Some(node) if !node.has_pin(pin) => issues.push(DiagramIssue::UnknownPin {
						connection: conn.id.clone(),
						node: node_id.clone(),
						pin: pin.clone(),
					}),
					Some(_) => {}
				}
			}
		}

		issues
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_generation_response() {
		let json = r#"{
			"nodes": [
				{"id": "mcu", "label": "Arduino UNO", "type": "Microcontroller", "pins": ["5V", "GND"]},
				{"id": "s1", "label": "HC-SR04", "type": "Sensor", "pins": ["VCC", "GND"]}
			],
			"connections": [
				{"id": "c1", "from": "mcu", "fromPin": "5V", "to": "s1", "toPin": "VCC", "color": "red"},
				{"id": "c2", "from": "mcu", "fromPin": "GND", "to": "s1", "toPin": "GND", "color": "brown"}
			],
			"explanation": "Power the sensor."
		}"#;
		let diagram: Diagram = serde_json::from_str(json).unwrap();

		assert_eq!(diagram.nodes[0].kind, NodeKind::Microcontroller);
		assert_eq!(diagram.nodes[1].kind, NodeKind::Peripheral);
		assert_eq!(diagram.connections[0].color, WireColor::Red);
		assert_eq!(diagram.connections[1].color.hex(), "#000000");
		assert_eq!(diagram.connections[0].from_pin, "5V");
		assert!(diagram.validate().is_empty());
	}

	#[test]
	fn missing_fields_default_to_empty() {
		let diagram: Diagram = serde_json::from_str("{}").unwrap();
		assert!(diagram.is_empty());
		assert!(diagram.connections.is_empty());
		assert_eq!(diagram.explanation, "");
	}

	#[test]
	fn validate_reports_repeated_pins() {
		let diagram = Diagram {
			nodes: vec![CircuitNode {
				id: "u1".into(),
				label: "Arduino Nano".into(),
				kind: NodeKind::Microcontroller,
				pins: vec!["GND".into(), "D2".into(), "GND".into()],
			}],
			..Default::default()
		};
		assert_eq!(
			diagram.validate(),
			vec![DiagramIssue::DuplicatePin {
				node: "u1".into(),
				pin: "GND".into(),
			}]
		);
	}

	#[test]
	fn validate_reports_dangling_references() {
		let diagram = Diagram {
			nodes: vec![CircuitNode {
				id: "u1".into(),
				label: "ESP32".into(),
				kind: NodeKind::Microcontroller,
				pins: vec!["3V3".into()],
			}],
			connections: vec![Connection {
				id: "c1".into(),
				from: "u1".into(),
				from_pin: "D4".into(),
				to: "ghost".into(),
				to_pin: "VCC".into(),
				color: WireColor::Blue,
			}],
			explanation: String::new(),
		};

		assert_eq!(
			diagram.validate(),
			vec![
				DiagramIssue::UnknownPin {
					connection: "c1".into(),
					node: "u1".into(),
					pin: "D4".into(),
				},
				DiagramIssue::UnknownNode {
					connection: "c1".into(),
					node: "ghost".into(),
				},
			]
		);
	}
}
