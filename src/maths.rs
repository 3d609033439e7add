//! 2D primitives shared by the clipping engine and the tile pipeline.
//!
//! Tile coordinates put the origin at the top left with y growing downward,
//! matching the screen-space convention of the tile wire format. Under that
//! convention a ring with a positive shoelace sum reads as clockwise.

use std::fmt;

pub(crate) const EPSILON: f64 = 1e-9;

/// A 2D point in tile-local units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pt {
    pub x: f64,
    pub y: f64,
}

impl Pt {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn nearly(self, other: Pt) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

impl From<(f64, f64)> for Pt {
    fn from((x, y): (f64, f64)) -> Self {
        Pt::new(x, y)
    }
}

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Rotational direction of a ring's vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindingOrder {
    Clockwise,
    CounterClockwise,
}

impl WindingOrder {
    /// Winding of `ring` from the sign of its shoelace sum.
    pub fn of(ring: &[Pt]) -> WindingOrder {
        if signed_area(ring) >= 0.0 {
            WindingOrder::Clockwise
        } else {
            WindingOrder::CounterClockwise
        }
    }
}

/// Signed shoelace area of a closed ring. Positive for clockwise input in
/// screen coordinates; half the absolute value is the enclosed area.
pub fn signed_area(ring: &[Pt]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].x * ring[j].y;
        area -= ring[j].x * ring[i].y;
    }
    area / 2.0
}

/// Ray-cast containment test against a closed ring.
///
/// Casts a ray to the right and counts edge crossings; an odd count means the
/// point is inside. Points exactly on an edge are not reliably classified,
/// which is fine for the callers here (they probe region centers).
pub fn point_in_ring(x: f64, y: f64, ring: &[Pt]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Converts a flat alternating x,y sequence into points. The caller has
/// already validated that `flat` has even length.
pub fn flat_to_points(flat: &[f64]) -> Vec<Pt> {
    flat.chunks_exact(2).map(|c| Pt::new(c[0], c[1])).collect()
}

/// Flattens points back into an alternating x,y sequence.
pub fn points_to_flat(points: &[Pt]) -> Vec<f64> {
    let mut flat = Vec::with_capacity(points.len() * 2);
    for p in points {
        flat.push(p.x);
        flat.push(p.y);
    }
    flat
}
