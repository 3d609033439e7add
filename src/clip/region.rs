//! The axis-aligned clip rectangle.

use crate::maths::{Pt, WindingOrder, EPSILON};

/// An axis-aligned rectangle carrying the winding order the clip output
/// should follow. Immutable once constructed.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    min: Pt,
    max: Pt,
    winding: WindingOrder,
}

impl Region {
    /// Builds a region from two corner points, given in any order; min and
    /// max are normalized. A zero-width or zero-height rectangle is legal and
    /// simply clips everything away.
    pub fn new(winding: WindingOrder, p1: Pt, p2: Pt) -> Region {
        Region {
            min: Pt::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Pt::new(p1.x.max(p2.x), p1.y.max(p2.y)),
            winding,
        }
    }

    pub fn min(&self) -> Pt {
        self.min
    }

    pub fn max(&self) -> Pt {
        self.max
    }

    pub fn winding(&self) -> WindingOrder {
        self.winding
    }

    pub fn center(&self) -> Pt {
        Pt::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }

    pub fn has_area(&self) -> bool {
        self.max.x - self.min.x > EPSILON && self.max.y - self.min.y > EPSILON
    }

    /// Boundary-inclusive containment. Every classification in the clipper
    /// goes through this one rule so that adjacent edges always agree.
    pub fn contains(&self, pt: Pt) -> bool {
        pt.x >= self.min.x && pt.x <= self.max.x && pt.y >= self.min.y && pt.y <= self.max.y
    }

    /// The four corners as a ring in the region's winding order, starting at
    /// the min corner.
    pub fn corners(&self) -> [Pt; 4] {
        match self.winding {
            WindingOrder::Clockwise => [
                self.min,
                Pt::new(self.max.x, self.min.y),
                self.max,
                Pt::new(self.min.x, self.max.y),
            ],
            WindingOrder::CounterClockwise => [
                self.min,
                Pt::new(self.min.x, self.max.y),
                self.max,
                Pt::new(self.max.x, self.min.y),
            ],
        }
    }

    /// Crossing points of the segment p1→p2 with the four sides, ordered
    /// along the p1→p2 direction. A crossing that lands exactly on a corner
    /// is reported once. Segments collinear with a side produce no crossing
    /// for that side. NaN coordinates propagate as empty results.
    pub fn intersect_edge(&self, p1: Pt, p2: Pt) -> Vec<Pt> {
        let mut hits: Vec<(f64, Pt)> = Vec::new();

        let dx = p2.x - p1.x;
        if dx.abs() > EPSILON {
            for x in [self.min.x, self.max.x] {
                let t = (x - p1.x) / dx;
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let y = p1.y + t * (p2.y - p1.y);
                if y < self.min.y - EPSILON || y > self.max.y + EPSILON {
                    continue;
                }
                hits.push((t, Pt::new(x, y)));
            }
        }

        let dy = p2.y - p1.y;
        if dy.abs() > EPSILON {
            for y in [self.min.y, self.max.y] {
                let t = (y - p1.y) / dy;
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let x = p1.x + t * (p2.x - p1.x);
                if x < self.min.x - EPSILON || x > self.max.x + EPSILON {
                    continue;
                }
                hits.push((t, Pt::new(x, y)));
            }
        }

        hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let mut crossings: Vec<Pt> = Vec::with_capacity(hits.len());
        for (_, pt) in hits {
            if crossings.last().map_or(true, |last| !last.nearly(pt)) {
                crossings.push(pt);
            }
        }
        crossings
    }

    /// Distance along the perimeter from the min corner, following the
    /// winding direction. Used to order boundary crossings; `pt` is expected
    /// to lie on the boundary.
    pub(crate) fn perimeter_pos(&self, pt: Pt) -> f64 {
        let corners = self.corners();
        let mut acc = 0.0;
        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            if on_axis_segment(a, b, pt) {
                return acc + (pt.x - a.x).abs() + (pt.y - a.y).abs();
            }
            acc += (b.x - a.x).abs() + (b.y - a.y).abs();
        }
        acc
    }
}

/// Whether `pt` lies on the axis-aligned segment a→b, endpoints included.
fn on_axis_segment(a: Pt, b: Pt, pt: Pt) -> bool {
    if (a.x - b.x).abs() < EPSILON {
        (pt.x - a.x).abs() < EPSILON
            && pt.y >= a.y.min(b.y) - EPSILON
            && pt.y <= a.y.max(b.y) + EPSILON
    } else {
        (pt.y - a.y).abs() < EPSILON
            && pt.x >= a.x.min(b.x) - EPSILON
            && pt.x <= a.x.max(b.x) + EPSILON
    }
}
