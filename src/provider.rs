//! Tile data providers and their registry.
//!
//! A provider renders named layers for a tile, in tile-local coordinates.
//! Providers register a factory under a short name; configuration then refers
//! to them by that name. The debug and postgis providers are registered out
//! of the box.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::geometry::GeomKind;
use crate::mvt::{Layer, Tags};
use crate::tile::Tile;

pub mod debug;
pub mod postgis;

pub const WEB_MERCATOR_SRID: i32 = 3857;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no provider registered under '{0}'")]
    UnknownProvider(String),
    #[error("provider has no layer named '{0}'")]
    UnknownLayer(String),
    #[error("invalid provider configuration: {0}")]
    Config(String),
    #[error("could not decode feature geometry: {0}")]
    Decode(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// What a provider knows about one of its layers before any tile is
/// requested.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    pub name: String,
    pub geom_kind: GeomKind,
    pub srid: i32,
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Renders one named layer for `tile`. Geometry comes back in tile-local
    /// coordinates, unclipped; the pipeline clips before encoding. Tags in
    /// `default_tags` apply to every feature that does not already carry the
    /// key.
    async fn layer(
        &self,
        layer_name: &str,
        tile: Tile,
        default_tags: &Tags,
    ) -> Result<Layer, Error>;

    /// The layers this provider can render.
    fn layers(&self) -> Vec<LayerInfo>;
}

/// Builds a provider instance from its TOML configuration table.
pub type Factory = fn(&toml::Table) -> Result<Arc<dyn Provider>, Error>;

static REGISTRY: Lazy<RwLock<HashMap<String, Factory>>> = Lazy::new(|| {
    let mut factories: HashMap<String, Factory> = HashMap::new();
    factories.insert(debug::NAME.to_string(), debug::factory as Factory);
    factories.insert(postgis::NAME.to_string(), postgis::factory as Factory);
    RwLock::new(factories)
});

/// Registers a factory under `name`, replacing any previous registration.
pub fn register(name: &str, factory: Factory) {
    let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    if registry.insert(name.to_string(), factory).is_some() {
        log::debug!("replacing provider factory '{name}'");
    }
}

/// Instantiates the provider registered under `name` from `config`.
pub fn init(name: &str, config: &toml::Table) -> Result<Arc<dyn Provider>, Error> {
    let factory = {
        let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
        registry.get(name).copied()
    };
    match factory {
        Some(factory) => factory(config),
        None => Err(Error::UnknownProvider(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_name_is_an_error() {
        let err = init("no-such-provider", &toml::Table::new()).err().unwrap();
        assert!(matches!(err, Error::UnknownProvider(name) if name == "no-such-provider"));
    }

    #[test]
    fn debug_provider_is_preregistered() {
        let provider = init(debug::NAME, &toml::Table::new()).unwrap();
        assert_eq!(provider.layers().len(), 2);
    }
}
