use pretty_assertions::assert_eq;
use serde_json::json;
use wiring_canvas::api::{SaveRequest, SavedCircuit};
use wiring_canvas::circuit::edges::build_edges;
use wiring_canvas::circuit::editor::{ConnectRequest, EditorGraph, GraphSurface, SurfaceEvent};
use wiring_canvas::circuit::layout::layout;
use wiring_canvas::circuit::pins::pin_layout;
use wiring_canvas::circuit::{Diagram, Point};

fn dht11() -> Diagram {
	serde_json::from_value(json!({
		"nodes": [
			{"id": "u1", "label": "Arduino", "type": "Microcontroller", "pins": ["5V", "GND", "D2"]},
			{"id": "p1", "label": "DHT11", "type": "Peripheral", "pins": ["VCC", "GND", "DATA"]}
		],
		"connections": [
			{"id": "c1", "from": "u1", "fromPin": "D2", "to": "p1", "toPin": "DATA", "color": "blue"}
		],
		"explanation": "DHT11 data line on D2."
	}))
	.unwrap()
}

fn close(a: Point, b: Point) -> bool {
	(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn dht11_scenario_end_to_end() {
	let diagram = dht11();
	assert!(diagram.validate().is_empty());

	let nodes = layout(&diagram);
	assert_eq!(nodes.len(), 2);
	assert_eq!(nodes[0].id, "u1");
	assert_eq!(nodes[0].position, Point::new(300.0, 200.0));
	assert_eq!(nodes[1].id, "p1");
	assert!(close(nodes[1].position, Point::new(500.0, 0.0)));

	let edges = build_edges(&diagram);
	assert_eq!(edges.len(), 1);
	let edge = &edges[0];
	assert_eq!(edge.id, "c1");
	assert_eq!(edge.style.stroke, "#2563EB");
	assert_eq!(edge.label.as_deref(), Some("D2 → DATA"));

	// both ends resolve to anchors declared on their blocks
	let source = pin_layout(&nodes[0].data);
	let target = pin_layout(&nodes[1].data);
	assert!(source.anchor(&edge.source_anchor).is_some());
	assert!(target.anchor(&edge.target_anchor).is_some());
}

#[test]
fn relayout_is_idempotent() {
	let diagram = dht11();
	assert_eq!(EditorGraph::from_diagram(&diagram), EditorGraph::from_diagram(&diagram));
}

#[test]
fn saved_diagram_loads_back_equivalent() {
	let diagram = dht11();
	let request = SaveRequest {
		query: "Arduino with DHT11".into(),
		diagram_data: diagram.clone(),
		code: String::new(),
		bom: Vec::new(),
	};
	let stored = serde_json::to_value(&request).unwrap();
	assert_eq!(stored["diagram_data"]["connections"][0]["fromPin"], "D2");
	assert_eq!(stored["diagram_data"]["nodes"][0]["type"], "Microcontroller");

	// the backend echoes the stored document under the new id
	let mut response = stored.clone();
	response["id"] = json!("9b1c2d3e");
	let loaded: SavedCircuit = serde_json::from_value(response).unwrap();
	assert_eq!(loaded.diagram_data, diagram);
	assert_eq!(loaded.query, "Arduino with DHT11");

	// positions come from a fresh layout, not from storage
	assert_eq!(layout(&loaded.diagram_data), layout(&diagram));
}

#[test]
fn user_wire_joins_generated_ones() {
	let mut graph = EditorGraph::from_diagram(&dht11());
	graph.on_change(SurfaceEvent::Connect(ConnectRequest {
		source: "u1".into(),
		source_anchor: "5V".into(),
		target: "p1".into(),
		target_anchor: "VCC".into(),
	}));
	let ids: Vec<&str> = graph.edges().iter().map(|e| e.id.as_str()).collect();
	assert_eq!(ids, vec!["c1", "edge-u15V-p1VCC"]);
	assert_eq!(graph.edges()[1].label, None);
}
