use std::collections::HashMap;

use crate::circuit::block::Block;
use crate::circuit::editor::{
	ConnectRequest, EdgeChange, EditorGraph, GraphSurface, NodeChange, SurfaceEvent,
};
use crate::circuit::pins::{AnchorRole, Side};
use crate::circuit::route::step_path;
use crate::circuit::{Diagram, Point, Rect, VisualEdge, VisualNode};

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 4.0;
pub const FIT_PADDING: f64 = 0.2;
pub const ZOOM_STEP: f64 = 1.2;
/// Screen pixels around a wire that still count as clicking it.
pub const EDGE_HIT_DISTANCE: f64 = 6.0;

pub const MINIMAP_WIDTH: f64 = 180.0;
pub const MINIMAP_HEIGHT: f64 = 120.0;
pub const MINIMAP_MARGIN: f64 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Transform that shows all of `bounds` centered, leaving `padding` (a
	/// fraction of the bounds) around it.
	pub fn fit(bounds: Rect, width: f64, height: f64, padding: f64) -> Self {
		let scale = |avail: f64, size: f64| {
			if size > 0.0 {
				avail / (size * (1.0 + padding))
			} else {
				MAX_ZOOM
			}
		};
		let k = scale(width, bounds.width)
			.min(scale(height, bounds.height))
			.clamp(MIN_ZOOM, MAX_ZOOM);
		let center = bounds.center();
		Self {
			x: width / 2.0 - center.x * k,
			y: height / 2.0 - center.y * k,
			k,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, p: Point) -> Point {
		Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Zooms by `factor` keeping the screen point (`sx`, `sy`) fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A wire being dragged out of a pin, in graph space.
#[derive(Clone, Debug, PartialEq)]
pub struct WireDraft {
	pub node: String,
	pub pin: String,
	pub anchor: String,
	pub from: Point,
	pub from_side: Side,
	pub to: Point,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
	pub node: Option<String>,
	/// (node id, pin name) of the handle under the cursor.
	pub pin: Option<(String, String)>,
}

/// Placement of the overview in the lower-right corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimap {
	pub frame: Rect,
	pub world: Rect,
	pub scale: f64,
}

impl Minimap {
	pub fn project(&self, r: Rect) -> Rect {
		let ox = self.frame.x + (self.frame.width - self.world.width * self.scale) / 2.0;
		let oy = self.frame.y + (self.frame.height - self.world.height * self.scale) / 2.0;
		Rect {
			x: ox + (r.x - self.world.x) * self.scale,
			y: oy + (r.y - self.world.y) * self.scale,
			width: r.width * self.scale,
			height: r.height * self.scale,
		}
	}
}

pub struct CanvasState {
	pub graph: EditorGraph,
	blocks: HashMap<String, Block>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub wire: Option<WireDraft>,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq > 0.0 {
		(((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
	} else {
		0.0
	};
	let (cx, cy) = (a.x + t * dx, a.y + t * dy);
	((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: EditorGraph::default(),
			blocks: HashMap::new(),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			wire: None,
			hover: HoverState::default(),
			width,
			height,
		}
	}

	/// Replaces whatever is on the canvas with a fresh layout of `diagram`.
	pub fn load(&mut self, diagram: &Diagram) {
		self.graph = EditorGraph::from_diagram(diagram);
		self.rebuild_blocks();
		self.cancel();
		self.hover = HoverState::default();
		self.fit_view();
	}

	fn rebuild_blocks(&mut self) {
		self.blocks = self
			.graph
			.nodes()
			.iter()
			.map(|n| (n.id.clone(), Block::new(&n.data)))
			.collect();
	}

	pub fn apply(&mut self, event: SurfaceEvent) {
		let structural = matches!(
			&event,
			SurfaceEvent::Nodes(changes)
				if changes.iter().any(|c| matches!(c, NodeChange::Add(_) | NodeChange::Remove { .. }))
		);
		self.graph.on_change(event);
		if structural {
			self.rebuild_blocks();
		}
	}

	pub fn block(&self, id: &str) -> Option<&Block> {
		self.blocks.get(id)
	}

	pub fn node_bounds(&self, node: &VisualNode) -> Option<Rect> {
		self.block(&node.id).map(|b| b.bounds(node.position))
	}

	pub fn content_bounds(&self) -> Option<Rect> {
		self.graph
			.nodes()
			.iter()
			.filter_map(|n| self.node_bounds(n))
			.reduce(Rect::union)
	}

	pub fn fit_view(&mut self) {
		if let Some(bounds) = self.content_bounds() {
			self.transform = ViewTransform::fit(bounds, self.width, self.height, FIT_PADDING);
		}
	}

	/// Zoom around the middle of the canvas, for the overlay buttons.
	pub fn zoom_by(&mut self, factor: f64) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.transform.zoom_at(cx, cy, factor);
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		self.transform.screen_to_graph(sx, sy)
	}

	/// Topmost node under `p` (graph space). Later nodes paint on top.
	pub fn node_at(&self, p: Point) -> Option<&VisualNode> {
		self.graph
			.nodes()
			.iter()
			.rev()
			.find(|n| self.node_bounds(n).is_some_and(|r| r.contains(p)))
	}

	/// (node id, pin) of the handle under `p` (graph space).
	pub fn pin_at(&self, p: Point) -> Option<(String, String)> {
		self.graph.nodes().iter().rev().find_map(|n| {
			let block = self.block(&n.id)?;
			let local = Point::new(p.x - n.position.x, p.y - n.position.y);
			block.pin_at(local).map(|pin| (n.id.clone(), pin.to_string()))
		})
	}

	/// Graph-space point and facing of an anchor on a node.
	pub fn anchor_position(&self, node_id: &str, anchor: &str) -> Option<(Point, Side)> {
		let node = self.graph.node(node_id)?;
		let (local, side) = self.block(node_id)?.attach(anchor);
		Some((node.position.offset(local), side))
	}

	pub fn edge_path(&self, edge: &VisualEdge) -> Option<Vec<Point>> {
		let (src, src_side) = self.anchor_position(&edge.source, &edge.source_anchor)?;
		let (dst, dst_side) = self.anchor_position(&edge.target, &edge.target_anchor)?;
		Some(step_path(src, src_side, dst, dst_side))
	}

	pub fn edge_at(&self, p: Point) -> Option<String> {
		let tolerance = EDGE_HIT_DISTANCE / self.transform.k;
		self.graph
			.edges()
			.iter()
			.rev()
			.find(|e| {
				self.edge_path(e).is_some_and(|path| {
					path.windows(2)
						.any(|w| distance_to_segment(p, w[0], w[1]) <= tolerance)
				})
			})
			.map(|e| e.id.clone())
	}

	fn select_only(&mut self, node: Option<String>, edge: Option<String>) {
		for event in self.graph.deselect_all() {
			self.apply(event);
		}
		if let Some(id) = node {
			self.apply(SurfaceEvent::Nodes(vec![NodeChange::Select { id, selected: true }]));
		}
		if let Some(id) = edge {
			self.apply(SurfaceEvent::Edges(vec![EdgeChange::Select { id, selected: true }]));
		}
	}

	/// Mouse down at screen point (`sx`, `sy`).
	pub fn press(&mut self, sx: f64, sy: f64) {
		let p = self.screen_to_graph(sx, sy);

		if let Some((node_id, pin)) = self.pin_at(p) {
			let anchor = self
				.block(&node_id)
				.and_then(|b| b.pins.anchor_for(&pin, AnchorRole::Source))
				.map(|a| a.id.clone());
			let start = anchor.and_then(|anchor| {
				let (from, from_side) = self.anchor_position(&node_id, &anchor)?;
				Some((anchor, from, from_side))
			});
			if let Some((anchor, from, from_side)) = start {
				self.wire = Some(WireDraft {
					node: node_id,
					pin,
					anchor,
					from,
					from_side,
					to: p,
				});
				return;
			}
		}

		if let Some(node) = self.node_at(p) {
			let (id, node_start) = (node.id.clone(), node.position);
			self.select_only(Some(id.clone()), None);
			self.drag = DragState {
				node: Some(id),
				start_x: sx,
				start_y: sy,
				node_start,
			};
			return;
		}

		let edge = self.edge_at(p);
		self.select_only(None, edge);
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Mouse move to screen point (`sx`, `sy`).
	pub fn move_to(&mut self, sx: f64, sy: f64) {
		let p = self.screen_to_graph(sx, sy);

		if let Some(wire) = self.wire.as_mut() {
			wire.to = p;
			self.hover.pin = self.pin_at(p);
			return;
		}

		if let Some(id) = self.drag.node.clone() {
			let (dx, dy) = (
				(sx - self.drag.start_x) / self.transform.k,
				(sy - self.drag.start_y) / self.transform.k,
			);
			let position = Point::new(self.drag.node_start.x + dx, self.drag.node_start.y + dy);
			self.apply(SurfaceEvent::Nodes(vec![NodeChange::Position { id, position }]));
			return;
		}

		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			return;
		}

		self.hover = HoverState {
			pin: self.pin_at(p),
			node: self.node_at(p).map(|n| n.id.clone()),
		};
	}

	/// Mouse up at screen point (`sx`, `sy`). Finishes a wire if one is
	/// being drawn and the cursor is over another pin.
	pub fn release(&mut self, sx: f64, sy: f64) {
		if let Some(wire) = self.wire.take() {
			let p = self.screen_to_graph(sx, sy);
			let target = self.pin_at(p).and_then(|(node_id, pin)| {
				if node_id == wire.node && pin == wire.pin {
					return None;
				}
				let anchor = self.block(&node_id)?.pins.anchor_for(&pin, AnchorRole::Target)?;
				Some((node_id, anchor.id.clone()))
			});
			if let Some((target, target_anchor)) = target {
				self.apply(SurfaceEvent::Connect(ConnectRequest {
					source: wire.node,
					source_anchor: wire.anchor,
					target,
					target_anchor,
				}));
			}
		}
		self.cancel();
	}

	/// Drops any gesture in progress.
	pub fn cancel(&mut self) {
		self.wire = None;
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn delete_selection(&mut self) {
		for event in self.graph.remove_selected() {
			self.apply(event);
		}
	}

	/// The graph-space rectangle currently on screen.
	pub fn viewport(&self) -> Rect {
		let top_left = self.screen_to_graph(0.0, 0.0);
		Rect {
			x: top_left.x,
			y: top_left.y,
			width: self.width / self.transform.k,
			height: self.height / self.transform.k,
		}
	}

	pub fn minimap(&self) -> Option<Minimap> {
		let content = self.content_bounds()?;
		let world = content.union(self.viewport());
		if world.width <= 0.0 || world.height <= 0.0 {
			return None;
		}
		let frame = Rect {
			x: self.width - MINIMAP_WIDTH - MINIMAP_MARGIN,
			y: self.height - MINIMAP_HEIGHT - MINIMAP_MARGIN,
			width: MINIMAP_WIDTH,
			height: MINIMAP_HEIGHT,
		};
		let scale = (MINIMAP_WIDTH / world.width).min(MINIMAP_HEIGHT / world.height);
		Some(Minimap {
			frame,
			world,
			scale,
		})
	}

	/// Adopts a new surface size. Returns `false` when nothing changed so the
	/// caller can skip resetting the canvas buffer.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		if (self.width, self.height) == (width, height) {
			return false;
		}
		self.width = width;
		self.height = height;
		true
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::circuit::{CircuitNode, Connection, NodeKind, WireColor};

	fn dht_diagram() -> Diagram {
		Diagram {
			nodes: vec![
				CircuitNode {
					id: "u1".into(),
					label: "Arduino".into(),
					kind: NodeKind::Microcontroller,
					pins: vec!["5V".into(), "GND".into(), "D2".into()],
				},
				CircuitNode {
					id: "p1".into(),
					label: "DHT11".into(),
					kind: NodeKind::Peripheral,
					pins: vec!["VCC".into(), "GND".into(), "DATA".into()],
				},
			],
			connections: vec![Connection {
				id: "c1".into(),
				from: "u1".into(),
				from_pin: "D2".into(),
				to: "p1".into(),
				to_pin: "DATA".into(),
				color: WireColor::Blue,
			}],
			explanation: String::new(),
		}
	}

	/// Loaded state with an identity transform, so screen == graph space.
	fn state() -> CanvasState {
		let mut s = CanvasState::new(1000.0, 800.0);
		s.load(&dht_diagram());
		s.transform = ViewTransform::default();
		s
	}

	fn pin_point(s: &CanvasState, node: &str, anchor: &str) -> Point {
		s.anchor_position(node, anchor).unwrap().0
	}

	#[test]
	fn fit_centers_bounds() {
		let bounds = Rect {
			x: 0.0,
			y: 0.0,
			width: 100.0,
			height: 50.0,
		};
		let t = ViewTransform::fit(bounds, 400.0, 300.0, 0.2);
		let center = t.graph_to_screen(bounds.center());
		assert!((center.x - 200.0).abs() < 1e-9 && (center.y - 150.0).abs() < 1e-9);
		assert!((t.k - 400.0 / 120.0).abs() < 1e-9);
	}

	#[test]
	fn fit_respects_zoom_limits() {
		let tiny = Rect {
			x: 0.0,
			y: 0.0,
			width: 1.0,
			height: 1.0,
		};
		assert_eq!(ViewTransform::fit(tiny, 800.0, 600.0, 0.2).k, MAX_ZOOM);
		let huge = Rect {
			width: 1e6,
			height: 1e6,
			..tiny
		};
		assert_eq!(ViewTransform::fit(huge, 800.0, 600.0, 0.2).k, MIN_ZOOM);
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let mut t = ViewTransform::default();
		let before = t.screen_to_graph(120.0, 80.0);
		t.zoom_at(120.0, 80.0, 2.0);
		let after = t.screen_to_graph(120.0, 80.0);
		assert_eq!(before, after);
		assert_eq!(t.k, 2.0);
	}

	#[test]
	fn load_fits_everything_on_screen() {
		let mut s = CanvasState::new(1000.0, 800.0);
		s.load(&dht_diagram());
		let content = s.content_bounds().unwrap();
		let view = s.viewport();
		assert!(view.contains(Point::new(content.x, content.y)));
		assert!(view.contains(Point::new(content.x + content.width, content.y + content.height)));
	}

	#[test]
	fn dragging_a_header_moves_the_node() {
		let mut s = state();
		s.press(310.0, 210.0);
		assert!(s.graph.node("u1").unwrap().selected);
		s.move_to(330.0, 240.0);
		s.release(330.0, 240.0);
		assert_eq!(s.graph.node("u1").unwrap().position, Point::new(320.0, 230.0));
		assert_eq!(s.drag.node, None);
	}

	#[test]
	fn dragging_between_pins_connects_them() {
		let mut s = state();
		let from = pin_point(&s, "u1", "5V");
		let to = pin_point(&s, "p1", "VCC");

		s.press(from.x, from.y);
		assert!(s.wire.is_some());
		s.move_to(to.x, to.y);
		s.release(to.x, to.y);

		let edge = s.graph.edge("edge-u15V-p1VCC").unwrap();
		assert_eq!(edge.target_anchor, "VCC");
		assert_eq!(s.graph.edges().len(), 2);
		assert!(s.wire.is_none());
	}

	#[test]
	fn clicking_a_pin_does_not_wire_it_to_itself() {
		let mut s = state();
		let pin = pin_point(&s, "u1", "5V");
		s.press(pin.x, pin.y);
		assert_eq!(s.wire.as_ref().map(|w| w.pin.as_str()), Some("5V"));
		s.release(pin.x, pin.y);
		let edges: Vec<&str> = s.graph.edges().iter().map(|e| e.id.as_str()).collect();
		assert_eq!(edges, vec!["c1"]);
		assert!(s.wire.is_none());
	}

	#[test]
	fn releasing_a_wire_on_empty_space_adds_nothing() {
		let mut s = state();
		let from = pin_point(&s, "p1", "GND");
		s.press(from.x, from.y);
		s.release(900.0, 700.0);
		assert_eq!(s.graph.edges().len(), 1);
	}

	#[test]
	fn empty_space_pans() {
		let mut s = state();
		s.press(900.0, 700.0);
		s.move_to(950.0, 720.0);
		assert_eq!((s.transform.x, s.transform.y), (50.0, 20.0));
		s.release(950.0, 720.0);
		assert!(!s.pan.active);
	}

	#[test]
	fn clicking_a_wire_selects_and_delete_removes_it() {
		let mut s = state();
		let path = s.edge_path(s.graph.edge("c1").unwrap()).unwrap();
		let (a, b) = (path[1], path[2]);
		let on_wire = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);

		s.press(on_wire.x, on_wire.y);
		s.release(on_wire.x, on_wire.y);
		assert!(s.graph.edge("c1").unwrap().selected);

		s.delete_selection();
		assert!(s.graph.edges().is_empty());
	}

	#[test]
	fn deleting_a_node_rebuilds_blocks() {
		let mut s = state();
		s.press(310.0, 210.0);
		s.release(310.0, 210.0);
		s.delete_selection();
		assert!(s.block("u1").is_none());
		assert!(s.graph.edges().is_empty());
	}

	#[test]
	fn resizing_moves_the_minimap_with_the_surface() {
		let mut s = state();
		assert!(!s.resize(1000.0, 800.0));
		assert!(s.resize(640.0, 800.0));
		assert_eq!(s.width, 640.0);
		let map = s.minimap().unwrap();
		assert_eq!(map.frame.x, 640.0 - MINIMAP_WIDTH - MINIMAP_MARGIN);
		assert_eq!(s.viewport().width, 640.0);
	}

	#[test]
	fn minimap_frame_sits_in_corner() {
		let s = state();
		let map = s.minimap().unwrap();
		assert_eq!(map.frame.x, 1000.0 - MINIMAP_WIDTH - MINIMAP_MARGIN);
		let projected = map.project(map.world);
		assert!(projected.width <= MINIMAP_WIDTH + 1e-9);
		assert!(projected.height <= MINIMAP_HEIGHT + 1e-9);
	}
}
