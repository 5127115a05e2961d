//! Screen-space projections of a [`Diagram`](super::Diagram). These are
//! rebuilt whenever the diagram changes and never persisted.

use super::types::NodeKind;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn offset(self, other: Point) -> Point {
		Point::new(self.x + other.x, self.y + other.y)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}

	pub fn union(self, other: Rect) -> Rect {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		let right = (self.x + self.width).max(other.x + other.width);
		let bottom = (self.y + self.height).max(other.y + other.height);
		Rect {
			x,
			y,
			width: right - x,
			height: bottom - y,
		}
	}

	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}

/// What a block needs to draw itself.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRenderData {
	pub label: String,
	pub kind: NodeKind,
	pub pins: Vec<String>,
}

impl NodeRenderData {
	pub fn is_controller(&self) -> bool {
		self.kind == NodeKind::Microcontroller
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualNode {
	pub id: String,
	/// Top-left corner of the block in graph space.
	pub position: Point,
	pub data: NodeRenderData,
	pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub stroke: String,
	pub stroke_width: f64,
	pub arrow: bool,
}

impl EdgeStyle {
	/// Presentation of a wire drawn by hand on the canvas.
	pub fn plain() -> Self {
		Self {
			stroke: "#b1b1b7".into(),
			stroke_width: 1.0,
			arrow: false,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualEdge {
	pub id: String,
	pub source: String,
	pub source_anchor: String,
	pub target: String,
	pub target_anchor: String,
	pub label: Option<String>,
	pub style: EdgeStyle,
	pub selected: bool,
}
