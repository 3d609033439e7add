//! In-memory vector tile features, the unit providers hand to the pipeline.

use std::collections::HashMap;

use crate::geometry::{clip_geometry, Geometry};
use crate::maths::Pt;

/// Arbitrary per-feature attributes. JSON values keep the provider surface
/// flexible without a tag type hierarchy of our own.
pub type Tags = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<u64>,
    pub tags: Tags,
    pub geometry: Geometry,
}

/// A named group of features inside one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub features: Vec<Feature>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Layer {
        Layer {
            name: name.into(),
            features: Vec::new(),
        }
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// The same layer with every feature clipped to the rectangle spanned by
    /// `min` and `max`. Features that clip away entirely are dropped.
    pub fn clipped(&self, min: Pt, max: Pt) -> Layer {
        Layer {
            name: self.name.clone(),
            features: self
                .features
                .iter()
                .filter_map(|f| {
                    clip_geometry(&f.geometry, min, max).map(|geometry| Feature {
                        id: f.id,
                        tags: f.tags.clone(),
                        geometry,
                    })
                })
                .collect(),
        }
    }
}
