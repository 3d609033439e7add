//! PostGIS-backed provider.
//!
//! Each layer is driven by a SQL fragment containing a `!BBOX!` token; the
//! token becomes an `ST_MakeEnvelope` over the tile's buffered mercator
//! bounds, bound as prepared-statement parameters. Two render paths exist:
//! the [`Provider`] implementation fetches features as GeoJSON and hands them
//! to the local pipeline, and [`PostgisSource::render_mvt`] lets PostGIS
//! encode the whole tile server-side with `ST_AsMVT`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, PgPool, Row};

use super::{Error, LayerInfo, Provider, WEB_MERCATOR_SRID};
use crate::geometry::{GeomKind, Geometry};
use crate::maths::Pt;
use crate::mvt::{Feature, Layer, Tags};
use crate::tile::{Bounds, Tile, BUFFER, EXTENT};

pub const NAME: &str = "postgis";

const BBOX_TOKEN: &str = "!BBOX!";
const BBOX_SQL: &str = "ST_MakeEnvelope($1, $2, $3, $4, 3857)";

fn default_geometry_fieldname() -> String {
    "geom".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_srid() -> i32 {
    WEB_MERCATOR_SRID
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgisLayer {
    pub name: String,
    /// SQL producing the layer's rows. Must reference `!BBOX!` so the query
    /// stays bounded to the requested tile.
    pub sql: String,
    #[serde(default = "default_geometry_fieldname")]
    pub geometry_fieldname: String,
    #[serde(default = "default_srid")]
    pub srid: i32,
    #[serde(default = "default_geometry_type")]
    pub geometry_type: GeomKind,
}

fn default_geometry_type() -> GeomKind {
    GeomKind::Polygon
}

#[derive(Debug, Deserialize)]
struct PostgisConfig {
    connection: String,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    #[serde(default)]
    layers: Vec<PostgisLayer>,
}

pub fn factory(config: &toml::Table) -> Result<Arc<dyn Provider>, Error> {
    let cfg: PostgisConfig = config
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| Error::Config(e.to_string()))?;
    // The pool connects on first use, so construction stays synchronous.
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_lazy(&cfg.connection)?;
    Ok(Arc::new(PostgisSource {
        pool,
        layers: cfg.layers,
    }))
}

pub struct PostgisSource {
    pool: PgPool,
    layers: Vec<PostgisLayer>,
}

impl PostgisSource {
    pub fn new(pool: PgPool, layers: Vec<PostgisLayer>) -> PostgisSource {
        PostgisSource { pool, layers }
    }

    fn layer_def(&self, layer_name: &str) -> Result<&PostgisLayer, Error> {
        self.layers
            .iter()
            .find(|l| l.name == layer_name)
            .ok_or_else(|| Error::UnknownLayer(layer_name.to_string()))
    }

    /// Renders a complete tile server-side: every layer runs through
    /// `ST_AsMVT` and the encoded layers are concatenated, which is valid
    /// protobuf framing for a multi-layer tile.
    pub async fn render_mvt(&self, tile: Tile) -> Result<Vec<u8>, Error> {
        let bounds = tile.mercator_bounds(BUFFER);
        let mut raw_tile: Vec<u8> = Vec::new();
        for layer in &self.layers {
            let sql = mvt_sql(layer);
            let mut rows = bind_bounds(query(&sql), bounds).fetch(&self.pool);
            while let Some(row) = rows.try_next().await? {
                let encoded: Vec<u8> = row.try_get(0)?;
                raw_tile.extend_from_slice(&encoded);
            }
        }
        Ok(raw_tile)
    }
}

#[async_trait]
impl Provider for PostgisSource {
    async fn layer(
        &self,
        layer_name: &str,
        tile: Tile,
        default_tags: &Tags,
    ) -> Result<Layer, Error> {
        let def = self.layer_def(layer_name)?;
        let bounds = tile.mercator_bounds(BUFFER);
        let frame = tile.mercator_bounds(0.0);
        let sql = feature_sql(def);

        let mut layer = Layer::new(layer_name);
        let mut rows = bind_bounds(query(&sql), bounds).fetch(&self.pool);
        while let Some(row) = rows.try_next().await? {
            let geojson: String = row.try_get(0)?;
            let value: serde_json::Value =
                serde_json::from_str(&geojson).map_err(|e| Error::Decode(e.to_string()))?;
            let mercator = geometry_from_geojson(&value)
                .ok_or_else(|| Error::Decode(format!("unsupported geometry: {geojson}")))?;
            layer.add_feature(Feature {
                id: None,
                tags: default_tags.clone(),
                geometry: map_points(&mercator, &|p| to_tile_space(p, frame)),
            });
        }
        Ok(layer)
    }

    fn layers(&self) -> Vec<LayerInfo> {
        self.layers
            .iter()
            .map(|l| LayerInfo {
                name: l.name.clone(),
                geom_kind: l.geometry_type,
                srid: l.srid,
            })
            .collect()
    }
}

fn bind_bounds(
    q: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    bounds: Bounds,
) -> sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments> {
    q.bind(bounds.west)
        .bind(bounds.south)
        .bind(bounds.east)
        .bind(bounds.north)
}

fn feature_sql(layer: &PostgisLayer) -> String {
    format!(
        "SELECT ST_AsGeoJSON({}) FROM ({}) AS q",
        layer.geometry_fieldname,
        layer.sql.replace(BBOX_TOKEN, BBOX_SQL)
    )
}

fn mvt_sql(layer: &PostgisLayer) -> String {
    format!(
        "SELECT ST_AsMVT(tile, '{}', {}, '{}') FROM ({}) AS tile",
        layer.name,
        EXTENT as u32,
        layer.geometry_fieldname,
        layer.sql.replace(BBOX_TOKEN, BBOX_SQL)
    )
}

/// Mercator meters to tile-local units, y flipped so it grows downward.
fn to_tile_space(p: Pt, frame: Bounds) -> Pt {
    let size = frame.east - frame.west;
    Pt::new(
        (p.x - frame.west) / size * EXTENT,
        (frame.north - p.y) / size * EXTENT,
    )
}

fn map_points(geom: &Geometry, f: &dyn Fn(Pt) -> Pt) -> Geometry {
    let pts = |ps: &[Pt]| ps.iter().map(|&p| f(p)).collect::<Vec<_>>();
    match geom {
        Geometry::Point(p) => Geometry::Point(f(*p)),
        Geometry::MultiPoint(ps) => Geometry::MultiPoint(pts(ps)),
        Geometry::Line(ps) => Geometry::Line(pts(ps)),
        Geometry::MultiLine(ls) => Geometry::MultiLine(ls.iter().map(|l| pts(l)).collect()),
        Geometry::Polygon(rs) => Geometry::Polygon(rs.iter().map(|r| pts(r)).collect()),
        Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
            polys
                .iter()
                .map(|rings| rings.iter().map(|r| pts(r)).collect())
                .collect(),
        ),
    }
}

fn geometry_from_geojson(value: &serde_json::Value) -> Option<Geometry> {
    let coordinates = value.get("coordinates")?;
    match value.get("type")?.as_str()? {
        "Point" => Some(Geometry::Point(coord(coordinates)?)),
        "MultiPoint" => Some(Geometry::MultiPoint(coords(coordinates)?)),
        "LineString" => Some(Geometry::Line(coords(coordinates)?)),
        "MultiLineString" => Some(Geometry::MultiLine(rings(coordinates)?)),
        "Polygon" => Some(Geometry::Polygon(rings(coordinates)?)),
        "MultiPolygon" => Some(Geometry::MultiPolygon(
            coordinates
                .as_array()?
                .iter()
                .map(rings)
                .collect::<Option<Vec<_>>>()?,
        )),
        _ => None,
    }
}

fn coord(value: &serde_json::Value) -> Option<Pt> {
    let pair = value.as_array()?;
    Some(Pt::new(pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
}

fn coords(value: &serde_json::Value) -> Option<Vec<Pt>> {
    value.as_array()?.iter().map(coord).collect()
}

fn rings(value: &serde_json::Value) -> Option<Vec<Vec<Pt>>> {
    value.as_array()?.iter().map(coords).collect()
}
