//! Editable node/edge collections behind the canvas.
//!
//! Everything the user does on the canvas reaches the graph as a
//! [`SurfaceEvent`]. Events are applied synchronously, one batch at a time, in
//! dispatch order; there is a single editor so nothing needs reconciling.

use log::warn;

use super::edges::build_edges;
use super::layout::layout;
use super::types::Diagram;
use super::visual::{EdgeStyle, Point, VisualEdge, VisualNode};

#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	Position { id: String, position: Point },
	Select { id: String, selected: bool },
	Remove { id: String },
	Add(VisualNode),
}

#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
	Select { id: String, selected: bool },
	Remove { id: String },
	Add(VisualEdge),
}

/// A wire drawn by hand from one anchor to another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectRequest {
	pub source: String,
	pub source_anchor: String,
	pub target: String,
	pub target_anchor: String,
}

impl ConnectRequest {
	fn edge_id(&self) -> String {
		format!(
			"edge-{}{}-{}{}",
			self.source, self.source_anchor, self.target, self.target_anchor
		)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
	Nodes(Vec<NodeChange>),
	Edges(Vec<EdgeChange>),
	Connect(ConnectRequest),
}

/// What any diagram editing surface has to offer.
pub trait GraphSurface {
	fn nodes(&self) -> &[VisualNode];
	fn edges(&self) -> &[VisualEdge];
	fn on_change(&mut self, event: SurfaceEvent);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorGraph {
	nodes: Vec<VisualNode>,
	edges: Vec<VisualEdge>,
}

impl EditorGraph {
	/// Lays out `diagram` from scratch. Inconsistencies are reported, not
	/// rejected.
	pub fn from_diagram(diagram: &Diagram) -> Self {
		for issue in diagram.validate() {
			warn!("{issue}");
		}
		Self {
			nodes: layout(diagram),
			edges: build_edges(diagram),
		}
	}

	pub fn node(&self, id: &str) -> Option<&VisualNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn edge(&self, id: &str) -> Option<&VisualEdge> {
		self.edges.iter().find(|e| e.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Changes that would clear every current selection.
	pub fn deselect_all(&self) -> Vec<SurfaceEvent> {
		let nodes: Vec<NodeChange> = self
			.nodes
			.iter()
			.filter(|n| n.selected)
			.map(|n| NodeChange::Select {
				id: n.id.clone(),
				selected: false,
			})
			.collect();
		let edges: Vec<EdgeChange> = self
			.edges
			.iter()
			.filter(|e| e.selected)
			.map(|e| EdgeChange::Select {
				id: e.id.clone(),
				selected: false,
			})
			.collect();
		vec![SurfaceEvent::Nodes(nodes), SurfaceEvent::Edges(edges)]
	}

	/// Changes that delete the current selection.
	pub fn remove_selected(&self) -> Vec<SurfaceEvent> {
		let nodes = self
			.nodes
			.iter()
			.filter(|n| n.selected)
			.map(|n| NodeChange::Remove { id: n.id.clone() })
			.collect();
		let edges = self
			.edges
			.iter()
			.filter(|e| e.selected)
			.map(|e| EdgeChange::Remove { id: e.id.clone() })
			.collect();
		vec![SurfaceEvent::Edges(edges), SurfaceEvent::Nodes(nodes)]
	}

	fn apply_node_change(&mut self, change: NodeChange) {
		match change {
			NodeChange::Position { id, position } => {
				if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
					node.position = position;
				}
			}
			NodeChange::Select { id, selected } => {
				if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
					node.selected = selected;
				}
			}
			NodeChange::Remove { id } => {
				self.nodes.retain(|n| n.id != id);
				self.edges.retain(|e| e.source != id && e.target != id);
			}
			NodeChange::Add(node) => {
				if self.node(&node.id).is_none() {
					self.nodes.push(node);
				}
			}
		}
	}

	fn apply_edge_change(&mut self, change: EdgeChange) {
		match change {
			EdgeChange::Select { id, selected } => {
				if let Some(edge) = self.edges.iter_mut().find(|e| e.id == id) {
					edge.selected = selected;
				}
			}
			EdgeChange::Remove { id } => self.edges.retain(|e| e.id != id),
			EdgeChange::Add(edge) => {
				if self.edge(&edge.id).is_none() {
					self.edges.push(edge);
				}
			}
		}
	}

	fn connect(&mut self, request: ConnectRequest) {
		if request.source == request.target && request.source_anchor == request.target_anchor {
			return;
		}
		let exists = self.edges.iter().any(|e| {
			e.source == request.source
				&& e.source_anchor == request.source_anchor
				&& e.target == request.target
				&& e.target_anchor == request.target_anchor
		});
		if exists {
			return;
		}
		self.edges.push(VisualEdge {
			id: request.edge_id(),
			source: request.source,
			source_anchor: request.source_anchor,
			target: request.target,
			target_anchor: request.target_anchor,
			label: None,
			style: EdgeStyle::plain(),
			selected: false,
		});
	}
}

impl GraphSurface for EditorGraph {
	fn nodes(&self) -> &[VisualNode] {
		&self.nodes
	}

	fn edges(&self) -> &[VisualEdge] {
		&self.edges
	}

	fn on_change(&mut self, event: SurfaceEvent) {
		match event {
			SurfaceEvent::Nodes(changes) => {
				for change in changes {
					self.apply_node_change(change);
				}
			}
			SurfaceEvent::Edges(changes) => {
				for change in changes {
					self.apply_edge_change(change);
				}
			}
			SurfaceEvent::Connect(request) => self.connect(request),
		}
	}
}
