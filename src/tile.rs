//! Slippy-map tile addressing and the coordinate spaces hanging off it.

use crate::clip::Region;
use crate::maths::{Pt, WindingOrder};

/// Width and height of the tile coordinate space, in tile-local units.
pub const EXTENT: f64 = 4096.0;

/// Margin around the tile, in tile-local units, kept so strokes and labels
/// that straddle the edge render without seams.
pub const BUFFER: f64 = 64.0;

/// Half the width of the square web mercator plane, in meters.
pub const WEB_MERCATOR_HALF: f64 = 20_037_508.342_789_244;

/// A tile address in the z/x/y scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// An axis-aligned geographic or projected rectangle. Units depend on where
/// it came from: degrees out of [`Tile::bounds`], meters out of
/// [`Tile::mercator_bounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Tile {
    pub fn new(z: u8, x: u32, y: u32) -> Tile {
        Tile { z, x, y }
    }

    /// The tile's extent in WGS84 degrees.
    pub fn bounds(&self) -> Bounds {
        let (west, north) = slippy_map_tilenames::tile2lonlat(self.x, self.y, self.z);
        let (east, south) = slippy_map_tilenames::tile2lonlat(self.x + 1, self.y + 1, self.z);
        Bounds {
            west,
            south,
            east,
            north,
        }
    }

    /// The tile's extent in web mercator meters, widened on every side by
    /// `buffer` tile-local units.
    pub fn mercator_bounds(&self, buffer: f64) -> Bounds {
        // Zoom arrives unchecked off the wire; 2^z stays in floating point.
        let size = 2.0 * WEB_MERCATOR_HALF / 2f64.powi(i32::from(self.z));
        let margin = size * buffer / EXTENT;
        let west = -WEB_MERCATOR_HALF + f64::from(self.x) * size;
        let north = WEB_MERCATOR_HALF - f64::from(self.y) * size;
        Bounds {
            west: west - margin,
            south: north - size - margin,
            east: west + size + margin,
            north: north + margin,
        }
    }
}

/// The clip rectangle for tile-local geometry: the tile extent plus its
/// buffer on every side.
pub fn clip_region(winding: WindingOrder) -> Region {
    Region::new(
        winding,
        Pt::new(-BUFFER, -BUFFER),
        Pt::new(EXTENT + BUFFER, EXTENT + BUFFER),
    )
}
