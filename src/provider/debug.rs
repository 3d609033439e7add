//! The built-in debug provider: an outline along the tile edges and a center
//! point carrying the tile's z, x and y. Useful for checking that a map's
//! addressing and clipping line up.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Error, LayerInfo, Provider, WEB_MERCATOR_SRID};
use crate::geometry::{GeomKind, Geometry};
use crate::maths::Pt;
use crate::mvt::{Feature, Layer, Tags};
use crate::tile::{Tile, EXTENT};

pub const NAME: &str = "debug";

pub const LAYER_TILE_OUTLINE: &str = "debug-tile-outline";
pub const LAYER_TILE_CENTER: &str = "debug-tile-center";

/// No configuration is supported; the table is ignored.
pub fn factory(_config: &toml::Table) -> Result<Arc<dyn Provider>, Error> {
    Ok(Arc::new(DebugProvider))
}

pub struct DebugProvider;

#[async_trait]
impl Provider for DebugProvider {
    async fn layer(
        &self,
        layer_name: &str,
        tile: Tile,
        default_tags: &Tags,
    ) -> Result<Layer, Error> {
        let mut tags = default_tags.clone();
        let geometry = match layer_name {
            LAYER_TILE_OUTLINE => {
                tags.insert("type".to_string(), serde_json::json!("debug_outline"));
                Geometry::Line(vec![
                    Pt::new(0.0, 0.0),
                    Pt::new(EXTENT, 0.0),
                    Pt::new(EXTENT, EXTENT),
                    Pt::new(0.0, EXTENT),
                ])
            }
            LAYER_TILE_CENTER => {
                tags.insert("type".to_string(), serde_json::json!("debug_text"));
                tags.insert(
                    "zxy".to_string(),
                    serde_json::json!(format!("Z:{}, X:{}, Y:{}", tile.z, tile.x, tile.y)),
                );
                Geometry::Point(Pt::new(EXTENT / 2.0, EXTENT / 2.0))
            }
            other => return Err(Error::UnknownLayer(other.to_string())),
        };

        let mut layer = Layer::new(layer_name);
        layer.add_feature(Feature {
            id: None,
            tags,
            geometry,
        });
        Ok(layer)
    }

    fn layers(&self) -> Vec<LayerInfo> {
        vec![
            LayerInfo {
                name: LAYER_TILE_OUTLINE.to_string(),
                geom_kind: GeomKind::Line,
                srid: WEB_MERCATOR_SRID,
            },
            LayerInfo {
                name: LAYER_TILE_CENTER.to_string(),
                geom_kind: GeomKind::Point,
                srid: WEB_MERCATOR_SRID,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn center_layer_encodes_the_address() {
        let layer = block_on(DebugProvider.layer(
            LAYER_TILE_CENTER,
            Tile::new(3, 2, 5),
            &Tags::new(),
        ))
        .unwrap();
        assert_eq!(layer.features.len(), 1);
        let feature = &layer.features[0];
        assert_eq!(feature.tags["zxy"], serde_json::json!("Z:3, X:2, Y:5"));
        assert_eq!(feature.tags["type"], serde_json::json!("debug_text"));
        assert_eq!(
            feature.geometry,
            Geometry::Point(Pt::new(EXTENT / 2.0, EXTENT / 2.0))
        );
    }

    #[test]
    fn outline_layer_traces_the_tile_edges() {
        let layer = block_on(DebugProvider.layer(
            LAYER_TILE_OUTLINE,
            Tile::new(0, 0, 0),
            &Tags::new(),
        ))
        .unwrap();
        let feature = &layer.features[0];
        assert_eq!(feature.tags["type"], serde_json::json!("debug_outline"));
        assert_eq!(feature.geometry.kind(), GeomKind::Line);
    }

    #[test]
    fn default_tags_are_applied() {
        let mut defaults = Tags::new();
        defaults.insert("source".to_string(), serde_json::json!("test"));
        let layer = block_on(DebugProvider.layer(
            LAYER_TILE_OUTLINE,
            Tile::new(0, 0, 0),
            &defaults,
        ))
        .unwrap();
        assert_eq!(layer.features[0].tags["source"], serde_json::json!("test"));
    }

    #[test]
    fn unknown_layer_is_an_error() {
        let err = block_on(DebugProvider.layer("nope", Tile::new(0, 0, 0), &Tags::new()))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownLayer(name) if name == "nope"));
    }
}
