//! Tile cache keys and backends.
//!
//! Keys mirror the request path scheme: `/:map/:z/:x/:y` with an optional
//! layer segment, `/:map/:layer/:z/:x/:y`. A trailing file extension on the
//! final segment is ignored, so `/osm/1/3/4.pbf` and `/osm/1/3/4` address the
//! same tile.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed cache key '{0}'")]
    Malformed(String),
    #[error("negative zoom levels are not allowed")]
    NegativeZoom,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Addresses one cached tile, optionally narrowed to a single layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub map_name: String,
    pub layer_name: Option<String>,
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl CacheKey {
    /// Parses a request-style path into a key. Accepts four segments
    /// (`map/z/x/y`) or five (`map/layer/z/x/y`); leading and trailing
    /// slashes are ignored.
    pub fn parse(path: &str) -> Result<CacheKey, ParseError> {
        let malformed = || ParseError::Malformed(path.to_string());
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        let (map_name, layer_name, zxy) = match parts.as_slice() {
            [map, z, x, y] => (*map, None, [*z, *x, *y]),
            [map, layer, z, x, y] => (*map, Some(layer.to_string()), [*z, *x, *y]),
            _ => return Err(malformed()),
        };
        if map_name.is_empty() {
            return Err(malformed());
        }
        if zxy[0].starts_with('-') {
            return Err(ParseError::NegativeZoom);
        }
        let z: u8 = zxy[0].parse().map_err(|_| malformed())?;
        let x: u32 = zxy[1].parse().map_err(|_| malformed())?;
        // The y segment may carry an extension, i.e. "4.pbf".
        let y_part = zxy[2].split('.').next().unwrap_or(zxy[2]);
        let y: u32 = y_part.parse().map_err(|_| malformed())?;
        Ok(CacheKey {
            map_name: map_name.to_string(),
            layer_name,
            z,
            x,
            y,
        })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.layer_name {
            Some(layer) => write!(
                f,
                "/{}/{}/{}/{}/{}",
                self.map_name, layer, self.z, self.x, self.y
            ),
            None => write!(f, "/{}/{}/{}/{}", self.map_name, self.z, self.x, self.y),
        }
    }
}

/// A tile cache backend. `get` distinguishes a miss (`Ok(None)`) from a
/// backend failure.
pub trait Cacher: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, Error>;
    fn set(&self, key: &CacheKey, value: Vec<u8>) -> Result<(), Error>;
    fn purge(&self, key: &CacheKey) -> Result<(), Error>;
}

/// Process-local cache, mainly for tests and single-instance deployments.
#[derive(Default)]
pub struct MemoryCache {
    store: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> MemoryCache {
        MemoryCache::default()
    }
}

impl Cacher for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, Error> {
        let store = self
            .store
            .read()
            .map_err(|e| Error::Backend(e.to_string()))?;
        Ok(store.get(&key.to_string()).cloned())
    }

    fn set(&self, key: &CacheKey, value: Vec<u8>) -> Result<(), Error> {
        log::debug!("caching {} ({} bytes)", key, value.len());
        let mut store = self
            .store
            .write()
            .map_err(|e| Error::Backend(e.to_string()))?;
        store.insert(key.to_string(), value);
        Ok(())
    }

    fn purge(&self, key: &CacheKey) -> Result<(), Error> {
        let mut store = self
            .store
            .write()
            .map_err(|e| Error::Backend(e.to_string()))?;
        store.remove(&key.to_string());
        Ok(())
    }
}
