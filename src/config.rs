//! TOML configuration: the webserver block, provider definitions, and the
//! maps that wire provider layers together.
//!
//! Provider tables stay untyped here; each provider deserializes its own
//! table when its factory runs, so new providers need no config changes.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error(
        "map '{map}' has overlapping zoom ranges for layer name shared by \
         '{provider_layer1}' and '{provider_layer2}'"
    )]
    OverlappingLayerZooms {
        map: String,
        provider_layer1: String,
        provider_layer2: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Where the config was loaded from; empty for in-memory parses.
    #[serde(skip)]
    pub location: PathBuf,
    #[serde(default)]
    pub webserver: Webserver,
    pub cache: Option<toml::Table>,
    #[serde(default)]
    pub providers: Vec<toml::Table>,
    #[serde(default)]
    pub maps: Vec<Map>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Webserver {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub log_file: String,
    #[serde(default)]
    pub log_format: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Map {
    pub name: String,
    #[serde(default)]
    pub attribution: String,
    #[serde(default)]
    pub bounds: Vec<f64>,
    #[serde(default)]
    pub center: [f64; 3],
    #[serde(default)]
    pub layers: Vec<MapLayer>,
}

fn default_max_zoom() -> u8 {
    22
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapLayer {
    /// Output name; when absent the provider layer's own name is used.
    pub name: Option<String>,
    /// `provider.layer` reference into the providers section.
    pub provider_layer: String,
    #[serde(default)]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    #[serde(default)]
    pub default_tags: Option<toml::Table>,
}

impl MapLayer {
    /// The name the layer goes by in the output: the explicit name when set,
    /// otherwise the layer part of `provider.layer`.
    pub fn effective_name(&self) -> &str {
        match &self.name {
            Some(name) => name,
            None => self
                .provider_layer
                .split_once('.')
                .map_or(self.provider_layer.as_str(), |(_, layer)| layer),
        }
    }
}

impl Config {
    /// Parses config text. `location` records where it came from.
    pub fn parse(input: &str, location: impl Into<PathBuf>) -> Result<Config, Error> {
        let mut config: Config = toml::from_str(input)?;
        config.location = location.into();
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Config, Error> {
        let input = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loading config from {}", path.display());
        Config::parse(&input, path)
    }

    /// Two layers of the same map that share an output name must not overlap
    /// in zoom, otherwise one would shadow the other in the encoded tile.
    /// Ranges are inclusive on both ends, so 0-5 and 5-10 collide.
    fn validate(&self) -> Result<(), Error> {
        for map in &self.maps {
            for (i, a) in map.layers.iter().enumerate() {
                for b in &map.layers[i + 1..] {
                    if a.effective_name() != b.effective_name() {
                        continue;
                    }
                    if a.min_zoom <= b.max_zoom && b.min_zoom <= a.max_zoom {
                        return Err(Error::OverlappingLayerZooms {
                            map: map.name.clone(),
                            provider_layer1: a.provider_layer.clone(),
                            provider_layer2: b.provider_layer.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
        [webserver]
        hostname = "cdn.tiles.example.com"
        port = ":8080"
        log_file = "/var/log/tiles/tiles.log"
        log_format = "{time} {request_ip} tile {z}/{x}/{y}"

        [cache]
        type = "file"
        basepath = "/tmp/tile-cache"

        [[providers]]
        name = "provider1"
        type = "postgis"
        connection = "postgres://admin@localhost:5432/osm_water"

            [[providers.layers]]
            name = "water"
            geometry_fieldname = "geom"
            sql = "SELECT gid, geom FROM simplified_water_polygons WHERE geom && !BBOX!"

        [[maps]]
        name = "osm"
        attribution = "Test Attribution"
        bounds = [-180.0, -85.05112877980659, 180.0, 85.0511287798066]
        center = [-76.275329586789, 39.153492567373, 8.0]

            [[maps.layers]]
            provider_layer = "provider1.water"
            min_zoom = 10
            max_zoom = 20
    "#;

    #[test]
    fn parses_a_full_config() {
        let config = Config::parse(FULL_CONFIG, "").unwrap();

        assert_eq!(config.webserver.hostname, "cdn.tiles.example.com");
        assert_eq!(config.webserver.port, ":8080");

        let cache = config.cache.as_ref().unwrap();
        assert_eq!(cache["type"].as_str(), Some("file"));

        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0]["name"].as_str(), Some("provider1"));
        assert_eq!(config.providers[0]["type"].as_str(), Some("postgis"));

        assert_eq!(config.maps.len(), 1);
        let map = &config.maps[0];
        assert_eq!(map.name, "osm");
        assert_eq!(map.center, [-76.275329586789, 39.153492567373, 8.0]);
        assert_eq!(map.layers[0].provider_layer, "provider1.water");
        assert_eq!(map.layers[0].min_zoom, 10);
        assert_eq!(map.layers[0].max_zoom, 20);
    }

    #[test]
    fn effective_name_falls_back_to_the_provider_layer() {
        let named = MapLayer {
            name: Some("water".to_string()),
            provider_layer: "provider1.water_0_5".to_string(),
            min_zoom: 0,
            max_zoom: 5,
            default_tags: None,
        };
        assert_eq!(named.effective_name(), "water");

        let unnamed = MapLayer {
            name: None,
            ..named.clone()
        };
        assert_eq!(unnamed.effective_name(), "water_0_5");
    }

    #[test]
    fn overlapping_zooms_for_the_same_name_are_rejected() {
        let config = r#"
            [[maps]]
            name = "osm"

                [[maps.layers]]
                provider_layer = "provider1.water"
                min_zoom = 10
                max_zoom = 20

                [[maps.layers]]
                provider_layer = "provider2.water"
                min_zoom = 10
                max_zoom = 20
        "#;
        let err = Config::parse(config, "").unwrap_err();
        assert!(matches!(
            err,
            Error::OverlappingLayerZooms {
                ref provider_layer1,
                ref provider_layer2,
                ..
            } if provider_layer1 == "provider1.water" && provider_layer2 == "provider2.water"
        ));
    }

    #[test]
    fn shared_zoom_endpoint_still_overlaps() {
        let config = r#"
            [[maps]]
            name = "osm"

                [[maps.layers]]
                name = "water"
                provider_layer = "provider1.water_0_5"
                min_zoom = 0
                max_zoom = 5

                [[maps.layers]]
                name = "water"
                provider_layer = "provider2.water_5_10"
                min_zoom = 5
                max_zoom = 10
        "#;
        assert!(matches!(
            Config::parse(config, "").unwrap_err(),
            Error::OverlappingLayerZooms { .. }
        ));
    }

    #[test]
    fn disjoint_zoom_ranges_are_accepted() {
        let config = r#"
            [[maps]]
            name = "osm"

                [[maps.layers]]
                name = "water"
                provider_layer = "provider1.water_0_5"
                min_zoom = 0
                max_zoom = 5

                [[maps.layers]]
                name = "water"
                provider_layer = "provider1.water_6_10"
                min_zoom = 6
                max_zoom = 10
        "#;
        let parsed = Config::parse(config, "").unwrap();
        assert_eq!(parsed.maps[0].layers.len(), 2);
    }

    #[test]
    fn different_names_may_share_zooms() {
        let config = r#"
            [[maps]]
            name = "osm"

                [[maps.layers]]
                provider_layer = "provider1.water"

                [[maps.layers]]
                provider_layer = "provider1.land"
        "#;
        assert!(Config::parse(config, "").is_ok());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Read { ref path, .. } if path.ends_with("here.toml")));
    }

    #[test]
    fn max_zoom_defaults_to_22() {
        let config = r#"
            [[maps]]
            name = "osm"

                [[maps.layers]]
                provider_layer = "provider1.water"
        "#;
        let parsed = Config::parse(config, "").unwrap();
        assert_eq!(parsed.maps[0].layers[0].max_zoom, 22);
        assert_eq!(parsed.maps[0].layers[0].min_zoom, 0);
    }
}
