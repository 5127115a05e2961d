//! Pin rows and wire anchors of a block.
//!
//! Every pin carries two anchors, one per wire direction, because a wire is
//! always tagged source-to-target even though a physical pin can be either
//! end. The primary anchor of a pin is named after the pin itself; the
//! secondary one gets a `-in` (controllers) or `-out` (peripherals) suffix.
//! Edge endpoints refer to anchors by these ids.

use std::collections::HashSet;

use super::visual::NodeRenderData;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorRole {
	Source,
	Target,
}

/// Edge of the block an anchor sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	Left,
	Right,
}

impl Side {
	/// Horizontal direction a wire leaves in.
	pub fn direction(self) -> f64 {
		match self {
			Side::Left => -1.0,
			Side::Right => 1.0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
	Left,
	Right,
	/// The only column of a peripheral block.
	Single,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
	pub id: String,
	pub pin: String,
	pub role: AnchorRole,
	pub side: Side,
	pub column: Column,
	pub row: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinLayout {
	pub left: Vec<String>,
	pub right: Vec<String>,
	pub single: Vec<String>,
	pub anchors: Vec<Anchor>,
}

/// Pins in declaration order with repeats dropped, so every anchor id is
/// unique within its block.
fn distinct_pins(pins: &[String]) -> Vec<String> {
	let mut seen = HashSet::new();
	pins.iter().filter(|p| seen.insert(p.as_str())).cloned().collect()
}

pub fn pin_layout(data: &NodeRenderData) -> PinLayout {
	let pins = distinct_pins(&data.pins);
	let mut layout = PinLayout {
		left: Vec::new(),
		right: Vec::new(),
		single: Vec::new(),
		anchors: Vec::new(),
	};

	if data.is_controller() {
		let midpoint = pins.len().div_ceil(2);
		let (left, right) = pins.split_at(midpoint);
		layout.left = left.to_vec();
		layout.right = right.to_vec();
		for (column, side, pins) in [
			(Column::Left, Side::Left, left),
			(Column::Right, Side::Right, right),
		] {
			for (row, pin) in pins.iter().enumerate() {
				layout.push_pair(pin, column, side, row, AnchorRole::Source, "-in");
			}
		}
	} else {
		for (row, pin) in pins.iter().enumerate() {
			layout.push_pair(pin, Column::Single, Side::Left, row, AnchorRole::Target, "-out");
		}
		layout.single = pins;
	}

	layout
}

impl PinLayout {
	fn push_pair(
		&mut self,
		pin: &str,
		column: Column,
		side: Side,
		row: usize,
		primary: AnchorRole,
		suffix: &str,
	) {
		let secondary = match primary {
			AnchorRole::Source => AnchorRole::Target,
			AnchorRole::Target => AnchorRole::Source,
		};
		for (id, role) in [(pin.to_string(), primary), (format!("{pin}{suffix}"), secondary)] {
			self.anchors.push(Anchor {
				id,
				pin: pin.to_string(),
				role,
				side,
				column,
				row,
			});
		}
	}

	/// Number of pin rows the block body needs.
	pub fn rows(&self) -> usize {
		self.left.len().max(self.right.len()).max(self.single.len())
	}

	pub fn anchor(&self, id: &str) -> Option<&Anchor> {
		self.anchors.iter().find(|a| a.id == id)
	}

	/// The anchor of `pin` with the given direction.
	pub fn anchor_for(&self, pin: &str, role: AnchorRole) -> Option<&Anchor> {
		self.anchors.iter().find(|a| a.pin == pin && a.role == role)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::circuit::types::NodeKind;

	fn data(kind: NodeKind, pins: &[&str]) -> NodeRenderData {
		NodeRenderData {
			label: "block".into(),
			kind,
			pins: pins.iter().map(|p| p.to_string()).collect(),
		}
	}

	#[test]
	fn controller_pins_split_ceil_left() {
		let layout = pin_layout(&data(NodeKind::Microcontroller, &["5V", "GND", "D2", "D3", "A0"]));
		assert_eq!(layout.left, vec!["5V", "GND", "D2"]);
		assert_eq!(layout.right, vec!["D3", "A0"]);
		assert!(layout.single.is_empty());
		assert_eq!(layout.rows(), 3);
	}

	#[test]
	fn controller_anchors_face_outward_in_both_roles() {
		let layout = pin_layout(&data(NodeKind::Microcontroller, &["5V", "GND", "D2"]));

		let source = layout.anchor("5V").unwrap();
		assert_eq!((source.role, source.side), (AnchorRole::Source, Side::Left));
		let target = layout.anchor("5V-in").unwrap();
		assert_eq!((target.role, target.side), (AnchorRole::Target, Side::Left));

		let right = layout.anchor("D2").unwrap();
		assert_eq!((right.column, right.side, right.row), (Column::Right, Side::Right, 0));
		assert_eq!(layout.anchor_for("D2", AnchorRole::Target).unwrap().id, "D2-in");
		assert_eq!(layout.anchors.len(), 6);
	}

	#[test]
	fn peripheral_is_single_sided() {
		let layout = pin_layout(&data(NodeKind::Peripheral, &["VCC", "GND", "DATA"]));
		assert_eq!(layout.single, vec!["VCC", "GND", "DATA"]);
		assert_eq!(layout.rows(), 3);
		assert!(layout.anchors.iter().all(|a| a.side == Side::Left));

		let primary = layout.anchor("DATA").unwrap();
		assert_eq!((primary.role, primary.row), (AnchorRole::Target, 2));
		assert_eq!(layout.anchor("DATA-out").unwrap().role, AnchorRole::Source);
	}

	#[test]
	fn anchor_ids_are_unique_per_node() {
		let layout = pin_layout(&data(NodeKind::Microcontroller, &["A0", "A1", "A2", "A3"]));
		let mut ids: Vec<&str> = layout.anchors.iter().map(|a| a.id.as_str()).collect();
		ids.sort_unstable();
		ids.dedup();
		assert_eq!(ids.len(), layout.anchors.len());
	}

	#[test]
	fn repeated_pins_get_one_row() {
		let layout = pin_layout(&data(NodeKind::Microcontroller, &["5V", "GND", "D2", "GND"]));
		assert_eq!(layout.left, vec!["5V", "GND"]);
		assert_eq!(layout.right, vec!["D2"]);
		assert_eq!(layout.anchors.iter().filter(|a| a.pin == "GND").count(), 2);

		let layout = pin_layout(&data(NodeKind::Peripheral, &["GND", "VCC", "GND"]));
		assert_eq!(layout.single, vec!["GND", "VCC"]);
		assert_eq!(layout.anchor("GND").unwrap().row, 0);
	}

	#[test]
	fn no_pins_means_no_rows() {
		let layout = pin_layout(&data(NodeKind::Microcontroller, &[]));
		assert_eq!(layout.rows(), 0);
		assert!(layout.anchors.is_empty());
	}
}
