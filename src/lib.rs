//! # Tilemason
//!
//! Tools for assembling vector tiles from pluggable data providers.
//!
//! ## Current features
//!
//! Maps are stacks of provider-backed layers with zoom ranges; providers
//! render layers in tile-local coordinates and the pipeline clips every
//! feature to the buffered tile extent before encoding. The clipper is the
//! heart of the crate: an exact rectangle clip for rings and paths that
//! preserves winding and handles geometry that weaves across the tile edge.
//! A debug provider, a PostGIS provider, a tile cache layer, TOML
//! configuration, and Mapbox GL style generation round out the pipeline.
//!
//! ## Known limitations
//!
//! PostGIS is the only database-backed provider, and geometry is assumed to
//! be in EPSG:3857 web mercator already. The HTTP surface is left to the
//! calling application; this crate supplies the request-path cache keys and
//! the capabilities-style documents but does not bind a listener.

#![deny(warnings)]

pub mod atlas;
pub mod cache;
pub mod clip;
pub mod config;
pub mod error;
pub mod geometry;
pub mod maths;
pub mod mvt;
pub mod provider;
pub mod style;
pub mod tile;

pub use error::Error;
