//! Mapbox GL style generation: a minimal v8 style document that makes every
//! layer of a map visible, so a map can be previewed without hand-writing a
//! style.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::atlas;
use crate::geometry::GeomKind;

pub const VERSION: u8 = 8;

const CIRCLE_RADIUS: f64 = 3.0;
const CIRCLE_COLOR: &str = "#56f8aa";
const LINE_COLOR: &str = "#9d70ab";
const FILL_COLOR: &str = "#71c7e5";

/// The top-level style document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub version: u8,
    pub name: String,
    pub center: [f64; 2],
    pub zoom: f64,
    pub sources: HashMap<String, Source>,
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Vector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Circle,
    Line,
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    pub source: String,
    #[serde(rename = "source-layer")]
    pub source_layer: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayerLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paint: Option<LayerPaint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerLayout {
    pub visibility: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerPaint {
    #[serde(rename = "circle-radius", skip_serializing_if = "Option::is_none")]
    pub circle_radius: Option<f64>,
    #[serde(rename = "circle-color", skip_serializing_if = "Option::is_none")]
    pub circle_color: Option<String>,
    #[serde(rename = "line-color", skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    #[serde(rename = "fill-color", skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
}

/// Builds a style for `map`, pointing its source at the capabilities
/// endpoint on `host`. Layers sharing an output name collapse into one style
/// layer; the first occurrence decides the paint.
pub fn for_map(map: &atlas::Map, host: &str) -> Root {
    let mut sources = HashMap::new();
    sources.insert(
        map.name.clone(),
        Source {
            source_type: SourceType::Vector,
            url: format!("http://{}/capabilities/{}.json", host, map.name),
        },
    );

    let mut layers: Vec<Layer> = Vec::new();
    for layer in &map.layers {
        if layers.iter().any(|l| l.id == layer.mvt_name()) {
            continue;
        }
        let (layer_type, paint) = match layer.geom_kind {
            GeomKind::Point => (
                LayerType::Circle,
                LayerPaint {
                    circle_radius: Some(CIRCLE_RADIUS),
                    circle_color: Some(CIRCLE_COLOR.to_string()),
                    ..LayerPaint::default()
                },
            ),
            GeomKind::Line => (
                LayerType::Line,
                LayerPaint {
                    line_color: Some(LINE_COLOR.to_string()),
                    ..LayerPaint::default()
                },
            ),
            GeomKind::Polygon => (
                LayerType::Fill,
                LayerPaint {
                    fill_color: Some(FILL_COLOR.to_string()),
                    ..LayerPaint::default()
                },
            ),
        };
        layers.push(Layer {
            id: layer.mvt_name().to_string(),
            source: map.name.clone(),
            source_layer: layer.mvt_name().to_string(),
            layer_type,
            layout: Some(LayerLayout {
                visibility: "visible".to_string(),
            }),
            paint: Some(paint),
        });
    }

    Root {
        version: VERSION,
        name: map.name.clone(),
        center: [map.center[0], map.center[1]],
        zoom: map.center[2],
        sources,
        layers,
    }
}
