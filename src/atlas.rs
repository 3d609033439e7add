//! The atlas: every map the process can serve, each map a zoom-aware stack
//! of provider-backed layers.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::geometry::GeomKind;
use crate::mvt::{self, Tags};
use crate::provider::{self, Provider};
use crate::tile::{Tile, BUFFER, EXTENT};

/// Default map bounds: the whole WGS84 plane.
pub const WGS84_BOUNDS: [f64; 4] = [-180.0, -85.0511, 180.0, 85.0511];

/// One layer of a map. `name` overrides the provider layer's name in the
/// encoded output, which is how several provider layers can stack into a
/// single logical layer across zoom ranges.
#[derive(Clone)]
pub struct Layer {
    pub name: Option<String>,
    pub provider_layer_name: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub geom_kind: GeomKind,
    pub default_tags: Tags,
    pub provider: Arc<dyn Provider>,
}

impl Layer {
    /// The name this layer carries in the encoded tile.
    pub fn mvt_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.provider_layer_name)
    }
}

#[derive(Clone)]
pub struct Map {
    pub name: String,
    pub attribution: String,
    pub bounds: [f64; 4],
    pub center: [f64; 3],
    pub layers: Vec<Layer>,
}

impl Map {
    /// A map over the whole WGS84 plane with no layers yet.
    pub fn new(name: impl Into<String>) -> Map {
        Map {
            name: name.into(),
            attribution: String::new(),
            bounds: WGS84_BOUNDS,
            center: [0.0; 3],
            layers: Vec::new(),
        }
    }

    pub fn layers_for_zoom(&self, zoom: u8) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .filter(move |l| l.min_zoom <= zoom && zoom <= l.max_zoom)
    }

    /// Renders every layer active at the tile's zoom: the provider supplies
    /// the features, the clipper trims them to the buffered tile extent, and
    /// the layer is renamed to its output name. Layers left without features
    /// are dropped.
    pub async fn collect_layers(&self, tile: Tile) -> Result<Vec<mvt::Layer>, provider::Error> {
        let min = crate::maths::Pt::new(-BUFFER, -BUFFER);
        let max = crate::maths::Pt::new(EXTENT + BUFFER, EXTENT + BUFFER);
        let mut out = Vec::new();
        for layer in self.layers_for_zoom(tile.z) {
            let rendered = layer
                .provider
                .layer(&layer.provider_layer_name, tile, &layer.default_tags)
                .await?;
            let mut clipped = rendered.clipped(min, max);
            if clipped.features.is_empty() {
                log::debug!(
                    "map '{}': layer '{}' empty for tile {:?}",
                    self.name,
                    layer.mvt_name(),
                    tile
                );
                continue;
            }
            clipped.name = layer.mvt_name().to_string();
            out.push(clipped);
        }
        Ok(out)
    }
}

static MAPS: Lazy<RwLock<HashMap<String, Arc<Map>>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `map` under its name, replacing any previous registration.
pub fn add_map(map: Map) {
    let mut maps = MAPS.write().unwrap_or_else(|e| e.into_inner());
    maps.insert(map.name.clone(), Arc::new(map));
}

pub fn map(name: &str) -> Option<Arc<Map>> {
    let maps = MAPS.read().unwrap_or_else(|e| e.into_inner());
    maps.get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::debug::{self, LAYER_TILE_CENTER, LAYER_TILE_OUTLINE};
    use futures::executor::block_on;

    fn debug_layer(name: &str, provider_layer: &str, min_zoom: u8, max_zoom: u8) -> Layer {
        Layer {
            name: Some(name.to_string()),
            provider_layer_name: provider_layer.to_string(),
            min_zoom,
            max_zoom,
            geom_kind: GeomKind::Line,
            default_tags: Tags::new(),
            provider: provider::init(debug::NAME, &toml::Table::new()).unwrap(),
        }
    }

    fn test_map() -> Map {
        let mut map = Map::new("test-map");
        map.attribution = "test attribution".to_string();
        map.layers.push(debug_layer("outline", LAYER_TILE_OUTLINE, 4, 9));
        map.layers.push(debug_layer("center", LAYER_TILE_CENTER, 10, 20));
        map
    }

    #[test]
    fn zoom_filtering_selects_active_layers() {
        let map = test_map();
        let at_4: Vec<&str> = map.layers_for_zoom(4).map(Layer::mvt_name).collect();
        assert_eq!(at_4, vec!["outline"]);
        let at_12: Vec<&str> = map.layers_for_zoom(12).map(Layer::mvt_name).collect();
        assert_eq!(at_12, vec!["center"]);
        assert_eq!(map.layers_for_zoom(3).count(), 0);
    }

    #[test]
    fn collect_layers_renames_and_clips() {
        let map = test_map();
        let layers = block_on(map.collect_layers(Tile::new(12, 600, 1500))).unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].name, "center");
        assert_eq!(layers[0].features.len(), 1);
    }

    #[test]
    fn mvt_name_falls_back_to_the_provider_layer() {
        let mut layer = debug_layer("outline", LAYER_TILE_OUTLINE, 0, 22);
        layer.name = None;
        assert_eq!(layer.mvt_name(), LAYER_TILE_OUTLINE);
    }

    #[test]
    fn registry_stores_and_returns_maps() {
        add_map(test_map());
        let found = map("test-map").unwrap();
        assert_eq!(found.attribution, "test attribution");
        assert!(map("missing-map").is_none());
    }
}
