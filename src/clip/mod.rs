//! Clipping of rings and paths against an axis-aligned rectangle.
//!
//! The algorithm builds two circular sequences per call: the subject (the
//! input vertices, augmented with synthetic crossing vertices where edges
//! cross the region boundary) and the boundary (the region's corners plus the
//! same crossings, in perimeter order). Output loops fall out of a walk that
//! follows the subject while inside the region and switches to the perimeter
//! at every exit crossing until it reaches the next entry.
//!
//! Everything here is a pure function over its inputs: no state survives a
//! call, so concurrent clips need no locking.

mod boundary;
mod list;
mod region;
mod subject;

pub use region::Region;

use boundary::{Boundary, BoundaryKind};
use subject::{Subject, VertexKind};

use crate::maths::{self, flat_to_points, points_to_flat, Pt, WindingOrder, EPSILON};

/// Structural input problems. Geometric degeneracies are never errors; they
/// produce empty results instead.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected an even number of coordinates, got {0}")]
    UnevenCoordinates(usize),
}

/// Clips a closed ring, given as a flat alternating x,y sequence, to the
/// rectangle spanned by `min` and `max`. `winding` is the subject's winding
/// order; output rings follow it. Returns zero or more flat rings, each fully
/// contained in the closed rectangle.
pub fn clip_ring(
    sub: &[f64],
    min: Pt,
    max: Pt,
    winding: WindingOrder,
) -> Result<Vec<Vec<f64>>, Error> {
    let pts = checked_points(sub)?;
    let region = Region::new(winding, min, max);
    Ok(clip_ring_pts(&pts, &region)
        .iter()
        .map(|ring| points_to_flat(ring))
        .collect())
}

/// Clips an open path. Unlike rings there is no implicit closing edge and the
/// output never follows the region boundary; portions outside the rectangle
/// are simply dropped, yielding zero or more disjoint polylines.
pub fn clip_path(
    sub: &[f64],
    min: Pt,
    max: Pt,
    winding: WindingOrder,
) -> Result<Vec<Vec<f64>>, Error> {
    let pts = checked_points(sub)?;
    let region = Region::new(winding, min, max);
    Ok(clip_path_pts(&pts, &region)
        .iter()
        .map(|path| points_to_flat(path))
        .collect())
}

fn checked_points(sub: &[f64]) -> Result<Vec<Pt>, Error> {
    if sub.len() % 2 != 0 {
        return Err(Error::UnevenCoordinates(sub.len()));
    }
    Ok(flat_to_points(sub))
}

/// Ring clipping over points. See [`clip_ring`].
pub fn clip_ring_pts(sub: &[Pt], region: &Region) -> Vec<Vec<Pt>> {
    if sub.len() < 3 {
        return Vec::new();
    }

    let per_edge = find_crossings(sub, region);
    if per_edge.iter().all(Vec::is_empty) {
        if sub.iter().all(|&p| region.contains(p)) {
            // Fully inside: the ring passes through unchanged.
            return vec![sub.to_vec()];
        }
        let center = region.center();
        if region.has_area() && maths::point_in_ring(center.x, center.y, sub) {
            // The subject surrounds the region; the clip is the region itself.
            return vec![region.corners().to_vec()];
        }
        return Vec::new();
    }

    let mut subject = Subject::from_points(sub);
    let mut crossings: Vec<(usize, Pt, bool)> = Vec::new();
    for (i, edge_hits) in per_edge.iter().enumerate() {
        // Original vertex i holds list index i; chain insertions along the edge.
        let mut after = i;
        for &(pt, entry) in edge_hits {
            let idx = subject.insert_crossing_after(after, pt, entry);
            crossings.push((idx, pt, entry));
            after = idx;
        }
    }

    let (boundary, boundary_indices) = Boundary::build(region, &crossings);
    for (k, &(subject_idx, _, _)) in crossings.iter().enumerate() {
        subject.set_twin(subject_idx, boundary_indices[k]);
    }

    walk_rings(&mut subject, &boundary)
}

/// Path clipping over points. See [`clip_path`].
pub fn clip_path_pts(sub: &[Pt], region: &Region) -> Vec<Vec<Pt>> {
    if sub.len() < 2 {
        return Vec::new();
    }
    let mut pieces: Vec<Vec<Pt>> = Vec::new();
    let mut piece: Vec<Pt> = Vec::new();
    for window in sub.windows(2) {
        let (a, b) = (window[0], window[1]);
        let mut stops = Vec::with_capacity(4);
        stops.push(a);
        stops.extend(region.intersect_edge(a, b));
        stops.push(b);
        for k in 0..stops.len() - 1 {
            let (p, q) = (stops[k], stops[k + 1]);
            if p.nearly(q) {
                continue;
            }
            if region.contains(midpoint(p, q)) {
                push_point(&mut piece, p);
                push_point(&mut piece, q);
            } else if piece.len() > 1 {
                pieces.push(std::mem::take(&mut piece));
            } else {
                piece.clear();
            }
        }
    }
    if piece.len() > 1 {
        pieces.push(piece);
    }
    pieces
}

/// Crossing points per edge, ordered along each edge, each tagged with
/// whether the subject enters the region there.
///
/// An intersection only becomes a crossing when the midpoints of the two
/// sub-segments it separates disagree about containment. That single rule
/// keeps vertices exactly on the boundary, and edges collinear with a side,
/// from producing spurious crossings: a touch without an actual exit inserts
/// nothing.
fn find_crossings(sub: &[Pt], region: &Region) -> Vec<Vec<(Pt, bool)>> {
    let n = sub.len();
    let mut out = vec![Vec::new(); n];
    for (i, hits) in out.iter_mut().enumerate() {
        let a = sub[i];
        let b = sub[(i + 1) % n];
        let candidates = region.intersect_edge(a, b);
        if candidates.is_empty() {
            continue;
        }
        let mut stops = Vec::with_capacity(candidates.len() + 2);
        stops.push(a);
        stops.extend(candidates);
        stops.push(b);
        for k in 1..stops.len() - 1 {
            let before = region.contains(midpoint(stops[k - 1], stops[k]));
            let after = region.contains(midpoint(stops[k], stops[k + 1]));
            if before != after {
                // Entry when the far side of the crossing is inside.
                hits.push((stops[k], after));
            }
        }
    }
    out
}

fn walk_rings(subject: &mut Subject, boundary: &Boundary) -> Vec<Vec<Pt>> {
    let order = subject.sequence();
    let mut rings = Vec::new();

    for &start in &order {
        if !subject.is_unvisited_entry(start) {
            continue;
        }
        // Bounded so malformed (self-intersecting at the boundary) input
        // cannot cycle forever; a blown budget discards the partial ring.
        let budget = 2 * (subject.len() + boundary.len()) + 8;
        let mut steps = 0usize;
        let mut ring: Vec<Pt> = Vec::new();
        let mut cur = start;
        let mut closed = false;

        'walk: loop {
            // Follow the subject while inside the region.
            let exit = loop {
                steps += 1;
                if steps > budget {
                    break 'walk;
                }
                let vertex = *subject.vertex(cur);
                push_point(&mut ring, vertex.pt);
                if let VertexKind::Crossing { entry, .. } = vertex.kind {
                    subject.mark_visited(cur);
                    if !entry {
                        break cur;
                    }
                }
                cur = subject.next(cur);
            };

            // Switch to the perimeter and follow it to the next entry.
            let exit_twin = match subject.vertex(exit).kind {
                VertexKind::Crossing { twin, .. } => twin,
                VertexKind::Original => break 'walk, // exits are always crossings
            };
            let mut b = boundary.next(exit_twin);
            loop {
                steps += 1;
                if steps > budget {
                    break 'walk;
                }
                let vertex = *boundary.vertex(b);
                match vertex.kind {
                    BoundaryKind::Corner => {
                        push_point(&mut ring, vertex.pt);
                        b = boundary.next(b);
                    }
                    BoundaryKind::Crossing { twin, entry: true } => {
                        if twin == start {
                            closed = true;
                            break 'walk;
                        }
                        cur = twin;
                        continue 'walk;
                    }
                    BoundaryKind::Crossing { entry: false, .. } => {
                        b = boundary.next(b);
                    }
                }
            }
        }

        if closed {
            if let Some(finished) = finish_ring(ring) {
                rings.push(finished);
            }
        }
    }
    rings
}

fn midpoint(a: Pt, b: Pt) -> Pt {
    Pt::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn push_point(out: &mut Vec<Pt>, pt: Pt) {
    if out.last().map_or(true, |last| !last.nearly(pt)) {
        out.push(pt);
    }
}

/// Strips the implicit closing duplicate and discards collapsed artifacts
/// left behind by coincident crossings.
fn finish_ring(mut ring: Vec<Pt>) -> Option<Vec<Pt>> {
    while ring.len() > 1 {
        if ring[0].nearly(ring[ring.len() - 1]) {
            ring.pop();
        } else {
            break;
        }
    }
    if ring.len() < 3 {
        return None;
    }
    if maths::signed_area(&ring).abs() < EPSILON {
        return None;
    }
    Some(ring)
}
