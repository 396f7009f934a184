//! Map geometry and path construction.
//!
//! A [`Shape`] is an ordered sequence of rings; each ring is an ordered
//! sequence of 2-D points in device space. A polygon may carry multiple
//! rings (holes, multi-parts); a polyline is one or more open rings.
//! Geometry is read-only input owned by the caller and is never retained
//! past a draw call.

use tiny_skia::PathBuilder;

/// Minimum points for a ring to qualify for filling.
pub const MIN_FILL_POINTS: usize = 3;

/// Minimum points for a ring to qualify for stroking.
pub const MIN_STROKE_POINTS: usize = 2;

/// A 2-D point in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

/// An ordered sequence of rings forming one polygon or polyline.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    /// The rings of the shape, in draw order.
    pub rings: Vec<Vec<Point>>,
}

impl Shape {
    /// Creates an empty shape.
    pub fn new() -> Shape {
        Shape { rings: Vec::new() }
    }

    /// Creates a shape from a list of rings.
    pub fn from_rings(rings: Vec<Vec<Point>>) -> Shape {
        Shape { rings }
    }

    /// Appends a ring to the shape.
    pub fn add_ring(&mut self, ring: Vec<Point>) {
        self.rings.push(ring);
    }
}

/// Appends `ring` to the path under construction as a closed subpath,
/// preserving point order. The caller guarantees `ring` has at least
/// [`MIN_FILL_POINTS`] points.
pub(crate) fn append_closed_ring(pb: &mut PathBuilder, ring: &[Point]) {
    pb.move_to(ring[0].x as f32, ring[0].y as f32);
    for p in &ring[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
}

/// Builds an open path from `ring`: first point via move-to, the rest via
/// line-to, no implicit close. Returns `None` for rings with fewer than
/// [`MIN_STROKE_POINTS`] points.
pub(crate) fn open_path(ring: &[Point]) -> Option<tiny_skia::Path> {
    if ring.len() < MIN_STROKE_POINTS {
        return None;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(ring[0].x as f32, ring[0].y as f32);
    for p in &ring[1..] {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.finish()
}
