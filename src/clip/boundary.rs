//! The boundary sequence: the region's perimeter as a circular list of its
//! four corners plus every crossing vertex, ordered by perimeter distance
//! from the min corner in the region's winding direction.

use super::list::CircularList;
use super::region::Region;
use crate::maths::Pt;

#[derive(Debug, Clone, Copy)]
pub(crate) enum BoundaryKind {
    /// One of the region's four corners.
    Corner,
    /// A crossing vertex; `twin` is its index in the subject sequence.
    Crossing { twin: usize, entry: bool },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BoundaryVertex {
    pub pt: Pt,
    pub kind: BoundaryKind,
}

pub(crate) struct Boundary {
    list: CircularList<BoundaryVertex>,
}

impl Boundary {
    /// Builds the perimeter sequence. `crossings` holds, per crossing in
    /// subject insertion order: the subject index, the point, and the entry
    /// flag. Returns the boundary plus the boundary index of each crossing in
    /// the same order, so the caller can link the twins.
    ///
    /// A crossing that lands exactly on a corner replaces that corner, so the
    /// walk never emits the same point under two identities.
    pub fn build(region: &Region, crossings: &[(usize, Pt, bool)]) -> (Boundary, Vec<usize>) {
        enum Source {
            Corner,
            Crossing(usize),
        }

        let mut staged: Vec<(f64, Pt, Source)> = Vec::with_capacity(4 + crossings.len());
        for corner in region.corners() {
            if crossings.iter().any(|&(_, pt, _)| pt.nearly(corner)) {
                continue;
            }
            staged.push((region.perimeter_pos(corner), corner, Source::Corner));
        }
        for (i, &(_, pt, _)) in crossings.iter().enumerate() {
            staged.push((region.perimeter_pos(pt), pt, Source::Crossing(i)));
        }
        staged.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut list = CircularList::new();
        let mut crossing_indices = vec![0usize; crossings.len()];
        for (_, pt, source) in staged {
            match source {
                Source::Corner => {
                    list.push_back(BoundaryVertex {
                        pt,
                        kind: BoundaryKind::Corner,
                    });
                }
                Source::Crossing(i) => {
                    let (subject_idx, _, entry) = crossings[i];
                    let idx = list.push_back(BoundaryVertex {
                        pt,
                        kind: BoundaryKind::Crossing {
                            twin: subject_idx,
                            entry,
                        },
                    });
                    crossing_indices[i] = idx;
                }
            }
        }
        (Boundary { list }, crossing_indices)
    }

    pub fn vertex(&self, idx: usize) -> &BoundaryVertex {
        self.list.get(idx)
    }

    pub fn next(&self, idx: usize) -> usize {
        self.list.next(idx)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maths::WindingOrder;

    #[test]
    fn crossings_are_ordered_along_the_perimeter() {
        let region = Region::new(WindingOrder::Clockwise, Pt::new(1.0, 1.0), Pt::new(9.0, 9.0));
        // Subject indices are arbitrary here.
        let crossings = [
            (10, Pt::new(1.0, 2.0), false), // left side, near the end of the clockwise walk
            (11, Pt::new(4.0, 9.0), true),  // bottom side
        ];
        let (boundary, idx) = Boundary::build(&region, &crossings);
        assert_eq!(boundary.len(), 6);

        let mut pts = Vec::new();
        let mut cur = 0;
        for _ in 0..boundary.len() {
            pts.push(boundary.vertex(cur).pt);
            cur = boundary.next(cur);
        }
        assert_eq!(
            pts,
            vec![
                Pt::new(1.0, 1.0),
                Pt::new(9.0, 1.0),
                Pt::new(9.0, 9.0),
                Pt::new(4.0, 9.0),
                Pt::new(1.0, 9.0),
                Pt::new(1.0, 2.0),
            ]
        );
        assert!(matches!(
            boundary.vertex(idx[1]).kind,
            BoundaryKind::Crossing { twin: 11, entry: true }
        ));
    }

    #[test]
    fn crossing_on_a_corner_replaces_it() {
        let region = Region::new(WindingOrder::Clockwise, Pt::new(1.0, 1.0), Pt::new(9.0, 9.0));
        let crossings = [(7, Pt::new(1.0, 1.0), true)];
        let (boundary, idx) = Boundary::build(&region, &crossings);
        assert_eq!(boundary.len(), 4);
        assert!(matches!(
            boundary.vertex(idx[0]).kind,
            BoundaryKind::Crossing { twin: 7, entry: true }
        ));
        // The replaced corner sits first in perimeter order.
        assert_eq!(idx[0], 0);
    }
}
