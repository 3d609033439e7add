//! Tile-space geometry and its clipping entry point.
//!
//! Coordinates are tile-local, origin at the top left, y growing downward.
//! Polygons are lists of rings; the first ring is the outer boundary and any
//! further rings are holes, wound opposite to the outer ring.

use serde::{Deserialize, Serialize};

use crate::clip;
use crate::maths::{Pt, WindingOrder};

/// The broad shape class of a layer, as providers report it and styles
/// consume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeomKind {
    Point,
    Line,
    Polygon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Pt),
    MultiPoint(Vec<Pt>),
    Line(Vec<Pt>),
    MultiLine(Vec<Vec<Pt>>),
    Polygon(Vec<Vec<Pt>>),
    MultiPolygon(Vec<Vec<Vec<Pt>>>),
}

impl Geometry {
    pub fn kind(&self) -> GeomKind {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => GeomKind::Point,
            Geometry::Line(_) | Geometry::MultiLine(_) => GeomKind::Line,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => GeomKind::Polygon,
        }
    }
}

/// Clips a geometry to the rectangle spanned by `min` and `max`. Returns
/// `None` when nothing of it remains inside.
///
/// Points are kept or dropped whole. Lines lose their outside portions and
/// may split into several pieces. Polygon rings are clipped with their own
/// winding so holes keep reading as holes.
pub fn clip_geometry(geom: &Geometry, min: Pt, max: Pt) -> Option<Geometry> {
    let region = clip::Region::new(WindingOrder::Clockwise, min, max);
    match geom {
        Geometry::Point(pt) => region.contains(*pt).then(|| Geometry::Point(*pt)),
        Geometry::MultiPoint(pts) => {
            let kept: Vec<Pt> = pts.iter().copied().filter(|&p| region.contains(p)).collect();
            if kept.is_empty() {
                None
            } else {
                Some(Geometry::MultiPoint(kept))
            }
        }
        Geometry::Line(line) => {
            let mut pieces = clip::clip_path_pts(line, &region);
            match pieces.len() {
                0 => None,
                1 => Some(Geometry::Line(pieces.remove(0))),
                _ => Some(Geometry::MultiLine(pieces)),
            }
        }
        Geometry::MultiLine(lines) => {
            let pieces: Vec<Vec<Pt>> = lines
                .iter()
                .flat_map(|line| clip::clip_path_pts(line, &region))
                .collect();
            if pieces.is_empty() {
                None
            } else {
                Some(Geometry::MultiLine(pieces))
            }
        }
        Geometry::Polygon(rings) => clip_polygon(rings, min, max).map(Geometry::Polygon),
        Geometry::MultiPolygon(polys) => {
            let kept: Vec<Vec<Vec<Pt>>> = polys
                .iter()
                .filter_map(|rings| clip_polygon(rings, min, max))
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(Geometry::MultiPolygon(kept))
            }
        }
    }
}

/// Clips each ring under its own winding. A polygon whose outer ring clips
/// away entirely is gone, holes or not.
fn clip_polygon(rings: &[Vec<Pt>], min: Pt, max: Pt) -> Option<Vec<Vec<Pt>>> {
    let mut out: Vec<Vec<Pt>> = Vec::new();
    for (i, ring) in rings.iter().enumerate() {
        let region = clip::Region::new(WindingOrder::of(ring), min, max);
        let clipped = clip::clip_ring_pts(ring, &region);
        if i == 0 && clipped.is_empty() {
            return None;
        }
        out.extend(clipped);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min() -> Pt {
        Pt::new(0.0, 0.0)
    }

    fn max() -> Pt {
        Pt::new(10.0, 10.0)
    }

    #[test]
    fn point_outside_is_dropped() {
        assert_eq!(clip_geometry(&Geometry::Point(Pt::new(11.0, 5.0)), min(), max()), None);
        let inside = Geometry::Point(Pt::new(5.0, 5.0));
        assert_eq!(clip_geometry(&inside, min(), max()), Some(inside));
    }

    #[test]
    fn multipoint_keeps_only_inside_points() {
        let geom = Geometry::MultiPoint(vec![
            Pt::new(-1.0, 5.0),
            Pt::new(5.0, 5.0),
            Pt::new(10.0, 10.0),
        ]);
        assert_eq!(
            clip_geometry(&geom, min(), max()),
            Some(Geometry::MultiPoint(vec![Pt::new(5.0, 5.0), Pt::new(10.0, 10.0)]))
        );
    }

    #[test]
    fn line_splitting_promotes_to_multiline() {
        let geom = Geometry::Line(vec![
            Pt::new(2.0, 2.0),
            Pt::new(2.0, 15.0),
            Pt::new(6.0, 15.0),
            Pt::new(6.0, 2.0),
        ]);
        assert_eq!(
            clip_geometry(&geom, min(), max()),
            Some(Geometry::MultiLine(vec![
                vec![Pt::new(2.0, 2.0), Pt::new(2.0, 10.0)],
                vec![Pt::new(6.0, 10.0), Pt::new(6.0, 2.0)],
            ]))
        );
    }

    #[test]
    fn single_piece_stays_a_line() {
        let geom = Geometry::Line(vec![Pt::new(-2.0, 5.0), Pt::new(5.0, 5.0)]);
        assert_eq!(
            clip_geometry(&geom, min(), max()),
            Some(Geometry::Line(vec![Pt::new(0.0, 5.0), Pt::new(5.0, 5.0)]))
        );
    }

    #[test]
    fn polygon_outside_is_dropped_entirely() {
        let geom = Geometry::Polygon(vec![vec![
            Pt::new(20.0, 20.0),
            Pt::new(30.0, 20.0),
            Pt::new(30.0, 30.0),
            Pt::new(20.0, 30.0),
        ]]);
        assert_eq!(clip_geometry(&geom, min(), max()), None);
    }

    #[test]
    fn polygon_hole_keeps_its_winding() {
        // Clockwise outer ring straddling the right side, with a small
        // counter-clockwise hole that stays inside.
        let geom = Geometry::Polygon(vec![
            vec![
                Pt::new(2.0, 2.0),
                Pt::new(15.0, 2.0),
                Pt::new(15.0, 8.0),
                Pt::new(2.0, 8.0),
            ],
            vec![
                Pt::new(4.0, 4.0),
                Pt::new(4.0, 6.0),
                Pt::new(6.0, 6.0),
                Pt::new(6.0, 4.0),
            ],
        ]);
        let clipped = clip_geometry(&geom, min(), max());
        let Some(Geometry::Polygon(rings)) = clipped else {
            panic!("expected a polygon, got {clipped:?}");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(WindingOrder::of(&rings[0]), WindingOrder::Clockwise);
        assert_eq!(WindingOrder::of(&rings[1]), WindingOrder::CounterClockwise);
        assert!(rings[0].iter().all(|p| p.x <= 10.0));
    }

    #[test]
    fn kind_classification() {
        assert_eq!(Geometry::Point(Pt::default()).kind(), GeomKind::Point);
        assert_eq!(Geometry::MultiLine(vec![]).kind(), GeomKind::Line);
        assert_eq!(Geometry::MultiPolygon(vec![]).kind(), GeomKind::Polygon);
    }
}
