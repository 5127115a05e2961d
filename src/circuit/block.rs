//! Size and anchor coordinates of a rendered block, in node-local space
//! (origin at the block's top-left corner).

use super::pins::{Anchor, Column, PinLayout, Side, pin_layout};
use super::visual::{NodeRenderData, Point, Rect};

pub const HEADER_HEIGHT: f64 = 30.0;
pub const ROW_HEIGHT: f64 = 22.0;
pub const BODY_PADDING: f64 = 6.0;
/// Horizontal room around pin text, including the handle.
pub const PIN_PADDING: f64 = 28.0;
pub const MIN_COLUMN_WIDTH: f64 = 56.0;
pub const HANDLE_RADIUS: f64 = 5.0;
pub const HANDLE_HIT_RADIUS: f64 = 9.0;

// rough advance widths for the fonts used by the renderer
const PIN_CHAR_WIDTH: f64 = 7.2;
const LABEL_CHAR_WIDTH: f64 = 8.0;

fn text_width(text: &str, char_width: f64) -> f64 {
	text.chars().count() as f64 * char_width
}

fn column_width(pins: &[String]) -> f64 {
	let widest = pins
		.iter()
		.map(|p| text_width(p, PIN_CHAR_WIDTH))
		.fold(0.0, f64::max);
	(widest + PIN_PADDING).max(MIN_COLUMN_WIDTH)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
	pub pins: PinLayout,
	pub width: f64,
	pub height: f64,
	/// x of the line between the two controller columns.
	pub divider: Option<f64>,
}

impl Block {
	pub fn new(data: &NodeRenderData) -> Self {
		let pins = pin_layout(data);
		let header_width = text_width(&data.label, LABEL_CHAR_WIDTH) + 32.0;

		let (body_width, divider) = if data.is_controller() {
			let left = if pins.left.is_empty() {
				0.0
			} else {
				column_width(&pins.left)
			};
			(left + column_width(&pins.right), (left > 0.0).then_some(left))
		} else {
			(column_width(&pins.single), None)
		};

		let height = HEADER_HEIGHT + pins.rows() as f64 * ROW_HEIGHT + BODY_PADDING;
		Self {
			pins,
			width: header_width.max(body_width),
			height,
			divider,
		}
	}

	pub fn bounds(&self, position: Point) -> Rect {
		Rect {
			x: position.x,
			y: position.y,
			width: self.width,
			height: self.height,
		}
	}

	pub fn row_center(&self, row: usize) -> f64 {
		HEADER_HEIGHT + BODY_PADDING / 2.0 + (row as f64 + 0.5) * ROW_HEIGHT
	}

	fn side_x(&self, side: Side) -> f64 {
		match side {
			Side::Left => 0.0,
			Side::Right => self.width,
		}
	}

	pub fn anchor_point(&self, anchor: &Anchor) -> Point {
		Point::new(self.side_x(anchor.side), self.row_center(anchor.row))
	}

	/// Where a wire attached to `anchor_id` meets the block. Unknown anchors
	/// attach to the left edge beside the header.
	pub fn attach(&self, anchor_id: &str) -> (Point, Side) {
		match self.pins.anchor(anchor_id) {
			Some(anchor) => (self.anchor_point(anchor), anchor.side),
			None => (Point::new(0.0, HEADER_HEIGHT / 2.0), Side::Left),
		}
	}

	/// Pin whose handle is under `local`, if any.
	pub fn pin_at(&self, local: Point) -> Option<&str> {
		self.pins
			.anchors
			.iter()
			.find(|a| {
				let p = self.anchor_point(a);
				let (dx, dy) = (p.x - local.x, p.y - local.y);
				(dx * dx + dy * dy).sqrt() <= HANDLE_HIT_RADIUS
			})
			.map(|a| a.pin.as_str())
	}

	/// x where the text of a pin row in `column` starts (or ends, for the
	/// right column, which is right-aligned).
	pub fn text_x(&self, column: Column) -> f64 {
		match column {
			Column::Left | Column::Single => PIN_PADDING / 2.0,
			Column::Right => self.width - PIN_PADDING / 2.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::circuit::types::NodeKind;

	fn data(kind: NodeKind, label: &str, pins: &[&str]) -> NodeRenderData {
		NodeRenderData {
			label: label.into(),
			kind,
			pins: pins.iter().map(|p| p.to_string()).collect(),
		}
	}

	#[test]
	fn height_follows_tallest_column() {
		let block = Block::new(&data(NodeKind::Microcontroller, "Uno", &["5V", "GND", "D2"]));
		assert_eq!(block.height, HEADER_HEIGHT + 2.0 * ROW_HEIGHT + BODY_PADDING);
		assert!(block.divider.is_some());
	}

	#[test]
	fn controller_anchors_sit_on_outer_edges() {
		let block = Block::new(&data(NodeKind::Microcontroller, "Uno", &["5V", "GND", "D2"]));
		let (left, side) = block.attach("GND");
		assert_eq!((left.x, side), (0.0, Side::Left));
		assert_eq!(left.y, block.row_center(1));

		let (right, side) = block.attach("D2-in");
		assert_eq!((right.x, side), (block.width, Side::Right));
		assert_eq!(right.y, block.row_center(0));
	}

	#[test]
	fn long_labels_widen_the_block() {
		let narrow = Block::new(&data(NodeKind::Peripheral, "LED", &["A"]));
		let wide = Block::new(&data(NodeKind::Peripheral, "SSD1306 OLED Display Module", &["A"]));
		assert!(wide.width > narrow.width);
		assert_eq!(narrow.width, MIN_COLUMN_WIDTH.max(3.0 * LABEL_CHAR_WIDTH + 32.0));
	}

	#[test]
	fn pin_hit_testing() {
		let block = Block::new(&data(NodeKind::Peripheral, "DHT11", &["VCC", "GND", "DATA"]));
		let y = block.row_center(2);
		assert_eq!(block.pin_at(Point::new(2.0, y + 1.0)), Some("DATA"));
		assert_eq!(block.pin_at(Point::new(block.width / 2.0, y)), None);
	}

	#[test]
	fn unknown_anchor_attaches_beside_header() {
		let block = Block::new(&data(NodeKind::Peripheral, "Relay", &["IN"]));
		assert_eq!(block.attach("OUT"), (Point::new(0.0, HEADER_HEIGHT / 2.0), Side::Left));
	}
}
