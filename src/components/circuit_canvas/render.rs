use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::CanvasState;
use crate::circuit::block::{Block, HANDLE_RADIUS, HEADER_HEIGHT};
use crate::circuit::editor::GraphSurface;
use crate::circuit::pins::Column;
use crate::circuit::route::midpoint;
use crate::circuit::{Point, Rect, VisualEdge, VisualNode};
use crate::config::CANVAS_BACKGROUND;

const GRID_GAP: f64 = 20.0;
const GRID_COLOR: &str = "#e5e7eb";
const CORNER_RADIUS: f64 = 8.0;
const WIRE_CORNER_RADIUS: f64 = 8.0;
const ARROW_SIZE: f64 = 9.0;
const CONTROLLER_ACCENT: &str = "#3b82f6";
const PERIPHERAL_BORDER: &str = "#9ca3af";
const SELECTED_BORDER: &str = "#f59e0b";
const DRAFT_COLOR: &str = "#2563eb";

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(CANVAS_BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	for edge in state.graph.edges() {
		draw_edge(state, edge, ctx);
	}
	draw_wire_draft(state, ctx);
	for node in state.graph.nodes() {
		if let Some(block) = state.block(&node.id) {
			draw_node(state, node, block, ctx);
		}
	}
	ctx.restore();

	draw_minimap(state, ctx);
}

fn draw_grid(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let t = &state.transform;
	let gap = GRID_GAP * t.k;
	// too dense to be useful when zoomed far out
	if gap < 6.0 {
		return;
	}
	ctx.set_fill_style_str(GRID_COLOR);
	let (start_x, start_y) = (t.x.rem_euclid(gap), t.y.rem_euclid(gap));
	let mut y = start_y;
	while y < state.height {
		let mut x = start_x;
		while x < state.width {
			ctx.fill_rect(x - 0.75, y - 0.75, 1.5, 1.5);
			x += gap;
		}
		y += gap;
	}
}

/// Path of a rectangle whose top and bottom corners may be rounded differently.
fn rounded_rect(ctx: &CanvasRenderingContext2d, r: Rect, top: f64, bottom: f64) {
	let (x, y, w, h) = (r.x, r.y, r.width, r.height);
	ctx.begin_path();
	ctx.move_to(x + top, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, top);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, bottom);
	let _ = ctx.arc_to(x, y + h, x, y, bottom);
	let _ = ctx.arc_to(x, y, x + w, y, top);
	ctx.close_path();
}

fn draw_polyline(ctx: &CanvasRenderingContext2d, points: &[Point]) {
	let Some(first) = points.first() else {
		return;
	};
	ctx.begin_path();
	ctx.move_to(first.x, first.y);
	for w in points.windows(3) {
		let (corner, next) = (w[1], w[2]);
		let seg = |a: Point, b: Point| ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
		let radius = WIRE_CORNER_RADIUS
			.min(seg(w[0], corner) / 2.0)
			.min(seg(corner, next) / 2.0);
		let _ = ctx.arc_to(corner.x, corner.y, next.x, next.y, radius);
	}
	if let Some(last) = points.last() {
		ctx.line_to(last.x, last.y);
	}
	ctx.stroke();
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, from: Point, tip: Point, color: &str) {
	let (dx, dy) = (tip.x - from.x, tip.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (back_x, back_y) = (tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_edge(state: &CanvasState, edge: &VisualEdge, ctx: &CanvasRenderingContext2d) {
	let Some(path) = state.edge_path(edge) else {
		return;
	};
	let style = &edge.style;
	let width = if edge.selected {
		style.stroke_width + 1.5
	} else {
		style.stroke_width
	};

	ctx.set_stroke_style_str(&style.stroke);
	ctx.set_line_width(width);
	draw_polyline(ctx, &path);

	if style.arrow && path.len() >= 2 {
		draw_arrowhead(ctx, path[path.len() - 2], path[path.len() - 1], &style.stroke);
	}

	if let Some(label) = &edge.label {
		let mid = midpoint(&path);
		let text_width = label.chars().count() as f64 * 6.0;
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
		ctx.fill_rect(mid.x - text_width / 2.0 - 4.0, mid.y - 8.0, text_width + 8.0, 16.0);
		ctx.set_fill_style_str(&style.stroke);
		ctx.set_font("600 10px sans-serif");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(label, mid.x, mid.y);
	}
}

fn draw_wire_draft(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(wire) = &state.wire else {
		return;
	};
	let k = state.transform.k;
	ctx.set_stroke_style_str(DRAFT_COLOR);
	ctx.set_line_width(1.5 / k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(6.0 / k),
		&JsValue::from_f64(4.0 / k),
	));
	ctx.begin_path();
	ctx.move_to(wire.from.x, wire.from.y);
	ctx.line_to(wire.to.x, wire.to.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_node(state: &CanvasState, node: &VisualNode, block: &Block, ctx: &CanvasRenderingContext2d) {
	let bounds = block.bounds(node.position);
	let is_controller = node.data.is_controller();
	let border = match (node.selected, is_controller) {
		(true, _) => SELECTED_BORDER,
		(false, true) => CONTROLLER_ACCENT,
		(false, false) => PERIPHERAL_BORDER,
	};

	// body with a soft shadow
	ctx.save();
	ctx.set_shadow_color("rgba(0, 0, 0, 0.15)");
	ctx.set_shadow_blur(12.0);
	ctx.set_shadow_offset_y(4.0);
	rounded_rect(ctx, bounds, CORNER_RADIUS, CORNER_RADIUS);
	ctx.set_fill_style_str("white");
	ctx.fill();
	ctx.restore();

	// header
	let header = Rect {
		height: HEADER_HEIGHT,
		..bounds
	};
	rounded_rect(ctx, header, CORNER_RADIUS, 0.0);
	ctx.set_fill_style_str(if is_controller { CONTROLLER_ACCENT } else { "#f3f4f6" });
	ctx.fill();
	ctx.set_fill_style_str(if is_controller { "white" } else { "#1f2937" });
	ctx.set_font("bold 14px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(
		&node.data.label,
		bounds.x + bounds.width / 2.0,
		bounds.y + HEADER_HEIGHT / 2.0,
	);

	if let Some(divider) = block.divider {
		ctx.set_stroke_style_str(GRID_COLOR);
		ctx.set_line_width(1.0);
		ctx.begin_path();
		ctx.move_to(bounds.x + divider, bounds.y + HEADER_HEIGHT);
		ctx.line_to(bounds.x + divider, bounds.y + bounds.height);
		ctx.stroke();
	}

	draw_pins(state, node, block, ctx);

	rounded_rect(ctx, bounds, CORNER_RADIUS, CORNER_RADIUS);
	ctx.set_stroke_style_str(border);
	ctx.set_line_width(2.0);
	ctx.stroke();
}

fn draw_pins(state: &CanvasState, node: &VisualNode, block: &Block, ctx: &CanvasRenderingContext2d) {
	let origin = node.position;
	ctx.set_font("12px monospace");
	ctx.set_text_baseline("middle");

	let columns = [
		(Column::Left, &block.pins.left),
		(Column::Right, &block.pins.right),
		(Column::Single, &block.pins.single),
	];
	for (column, pins) in columns {
		ctx.set_text_align(if column == Column::Right { "right" } else { "left" });
		ctx.set_fill_style_str("#374151");
		for (row, pin) in pins.iter().enumerate() {
			let _ = ctx.fill_text(
				pin,
				origin.x + block.text_x(column),
				origin.y + block.row_center(row),
			);
		}
	}

	// both anchors of a pin share a spot; draw each spot once
	for anchor in block.pins.anchors.iter().filter(|a| a.id == a.pin) {
		let p = origin.offset(block.anchor_point(anchor));
		let hovered = state
			.hover
			.pin
			.as_ref()
			.is_some_and(|(n, pin)| *n == node.id && *pin == anchor.pin);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, HANDLE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if hovered { DRAFT_COLOR } else { "#4b5563" });
		ctx.fill();
		ctx.set_stroke_style_str("white");
		ctx.set_line_width(2.0);
		ctx.stroke();
	}
}

fn draw_minimap(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(map) = state.minimap() else {
		return;
	};
	let frame = map.frame;
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.92)");
	ctx.fill_rect(frame.x, frame.y, frame.width, frame.height);
	ctx.set_stroke_style_str(GRID_COLOR);
	ctx.set_line_width(1.0);
	ctx.stroke_rect(frame.x, frame.y, frame.width, frame.height);

	for node in state.graph.nodes() {
		if let Some(bounds) = state.node_bounds(node) {
			let r = map.project(bounds);
			ctx.set_fill_style_str(if node.data.is_controller() {
				CONTROLLER_ACCENT
			} else {
				PERIPHERAL_BORDER
			});
			ctx.fill_rect(r.x, r.y, r.width.max(2.0), r.height.max(2.0));
		}
	}

	let view = map.project(state.viewport());
	ctx.set_stroke_style_str("rgba(37, 99, 235, 0.8)");
	ctx.set_line_width(1.5);
	ctx.stroke_rect(view.x, view.y, view.width, view.height);
}
