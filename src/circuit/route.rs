//! Orthogonal wire routing between two anchors.

use super::pins::Side;
use super::visual::Point;

/// How far a wire runs straight out of its anchor before turning.
pub const STUB_LENGTH: f64 = 20.0;

fn stub(p: Point, side: Side) -> Point {
	Point::new(p.x + side.direction() * STUB_LENGTH, p.y)
}

/// Polyline from `src` to `dst` made of horizontal and vertical segments,
/// leaving and entering each anchor along its facing direction.
pub fn step_path(src: Point, src_side: Side, dst: Point, dst_side: Side) -> Vec<Point> {
	let (s1, d1) = (stub(src, src_side), stub(dst, dst_side));

	let mut points = if src_side == dst_side {
		let x = match src_side {
			Side::Left => s1.x.min(d1.x),
			Side::Right => s1.x.max(d1.x),
		};
		vec![src, Point::new(x, src.y), Point::new(x, dst.y), dst]
	} else if (s1.x - d1.x) * src_side.direction() <= 0.0 {
		// facing each other: turn once halfway
		let mid_x = (s1.x + d1.x) / 2.0;
		vec![src, Point::new(mid_x, src.y), Point::new(mid_x, dst.y), dst]
	} else {
		// facing away: wrap around through the vertical middle
		let mid_y = (src.y + dst.y) / 2.0;
		vec![src, s1, Point::new(s1.x, mid_y), Point::new(d1.x, mid_y), d1, dst]
	};

	points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
	points
}

/// Point halfway along the polyline, where the wire label goes.
pub fn midpoint(points: &[Point]) -> Point {
	let segment_len = |a: &Point, b: &Point| ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
	let total: f64 = points.windows(2).map(|w| segment_len(&w[0], &w[1])).sum();
	let mut remaining = total / 2.0;
	for w in points.windows(2) {
		let len = segment_len(&w[0], &w[1]);
		if len >= remaining && len > 0.0 {
			let t = remaining / len;
			return Point::new(w[0].x + (w[1].x - w[0].x) * t, w[0].y + (w[1].y - w[0].y) * t);
		}
		remaining -= len;
	}
	points.first().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_orthogonal(points: &[Point]) {
		for w in points.windows(2) {
			assert!(
				w[0].x == w[1].x || w[0].y == w[1].y,
				"diagonal segment {:?} -> {:?}",
				w[0],
				w[1]
			);
		}
	}

	#[test]
	fn facing_anchors_turn_halfway() {
		let path = step_path(Point::new(0.0, 0.0), Side::Right, Point::new(200.0, 100.0), Side::Left);
		assert_eq!(
			path,
			vec![
				Point::new(0.0, 0.0),
				Point::new(100.0, 0.0),
				Point::new(100.0, 100.0),
				Point::new(200.0, 100.0),
			]
		);
	}

	#[test]
	fn same_side_anchors_bracket_outside() {
		let path = step_path(Point::new(50.0, 0.0), Side::Left, Point::new(10.0, 80.0), Side::Left);
		assert_eq!(path[1].x, -10.0);
		assert_eq!(path.last(), Some(&Point::new(10.0, 80.0)));
		assert_orthogonal(&path);
	}

	#[test]
	fn back_facing_anchors_wrap_around() {
		let path = step_path(Point::new(300.0, 0.0), Side::Right, Point::new(0.0, 100.0), Side::Left);
		assert_eq!(path.first(), Some(&Point::new(300.0, 0.0)));
		assert_eq!(path.last(), Some(&Point::new(0.0, 100.0)));
		assert_eq!(path.len(), 6);
		assert_orthogonal(&path);
	}

	#[test]
	fn midpoint_splits_length() {
		let path = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
		assert_eq!(midpoint(&path), Point::new(10.0, 0.0));
		assert_eq!(midpoint(&[]), Point::default());
	}
}
