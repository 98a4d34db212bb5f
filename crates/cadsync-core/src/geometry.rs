//! Resolved geometry for derived layers
//!
//! Geometry layers are computed outside cadsync. The engine asks a
//! [`GeometryProvider`] for the resolved payload of a layer and regenerates
//! the layer's polylines from it on every push.

use cadsync_drawing::{Color, Entity, LwPolyline, Vector2};
use cadsync_fs::{ConfigStore, NormalizedPath};
use cadsync_meta::Point2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::Appearance;
use crate::fingerprint::{self, name, number};
use crate::{Error, Result};

/// One polyline of a payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPath {
    pub points: Vec<Point2>,
    #[serde(default)]
    pub closed: bool,
}

/// The resolved geometry of one layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryPayload {
    #[serde(default)]
    pub paths: Vec<GeometryPath>,
}

impl GeometryPayload {
    pub fn new(paths: Vec<GeometryPath>) -> Self {
        Self { paths }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Reject paths a polyline cannot represent.
    pub fn validate(&self, layer: &str) -> Result<()> {
        for (i, path) in self.paths.iter().enumerate() {
            if path.points.len() < 2 {
                return Err(Error::InvalidGeometry {
                    layer: layer.to_string(),
                    message: format!("path {} has fewer than two points", i),
                });
            }
            if path.points.iter().any(|p| !p.x().is_finite() || !p.y().is_finite()) {
                return Err(Error::InvalidGeometry {
                    layer: layer.to_string(),
                    message: format!("path {} has a non-finite coordinate", i),
                });
            }
        }
        Ok(())
    }

    /// Fingerprint of the payload as drawn with `appearance`.
    pub fn fingerprint(&self, appearance: &Appearance) -> String {
        let paths: Vec<Value> = self
            .paths
            .iter()
            .map(|path| {
                let points = path
                    .points
                    .iter()
                    .map(|p| Value::Array(vec![number(p.x()), number(p.y())]))
                    .collect();
                let mut map = Map::new();
                map.insert("closed".into(), Value::Bool(path.closed));
                map.insert("points".into(), Value::Array(points));
                Value::Object(map)
            })
            .collect();

        let mut map = Map::new();
        map.insert("kind".into(), Value::from("geometry"));
        map.insert("layer".into(), name(&appearance.layer));
        map.insert("color".into(), Value::from(appearance.color));
        map.insert("linetype".into(), name(&appearance.linetype));
        map.insert("paths".into(), Value::Array(paths));
        fingerprint::fingerprint_value(&Value::Object(map))
    }

    /// One polyline entity per path.
    pub fn to_entities(&self, appearance: &Appearance) -> Vec<Entity> {
        self.paths
            .iter()
            .map(|path| {
                let vertices = path.points.iter().map(|p| Vector2::new(p.x(), p.y())).collect();
                let mut polyline = LwPolyline::new(vertices, path.closed);
                polyline.common.layer = appearance.layer.clone();
                polyline.common.color = Color::from_index(appearance.color);
                polyline.common.linetype = appearance.linetype.clone();
                Entity::LwPolyline(polyline)
            })
            .collect()
    }
}

/// Source of resolved geometry
pub trait GeometryProvider {
    /// Geometry for a geometry layer entry, `None` if nothing was computed.
    fn resolved_geometry(&self, layer_name: &str) -> Result<Option<GeometryPayload>>;
}

/// Reads `<dir>/<name>.json`
#[derive(Debug, Clone)]
pub struct FileGeometryProvider {
    dir: NormalizedPath,
    store: ConfigStore,
}

impl FileGeometryProvider {
    pub fn new(dir: NormalizedPath) -> Self {
        Self {
            dir,
            store: ConfigStore::new(),
        }
    }

    fn payload_path(&self, layer_name: &str) -> NormalizedPath {
        self.dir.join(&format!("{}.json", layer_name))
    }
}

impl GeometryProvider for FileGeometryProvider {
    fn resolved_geometry(&self, layer_name: &str) -> Result<Option<GeometryPayload>> {
        let path = self.payload_path(layer_name);
        if !path.is_file() {
            tracing::debug!(layer = %layer_name, path = %path, "no geometry payload");
            return Ok(None);
        }
        let payload: GeometryPayload = self.store.load(&path)?;
        Ok(Some(payload))
    }
}

/// Provider for projects without a geometry directory
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeometry;

impl GeometryProvider for NoGeometry {
    fn resolved_geometry(&self, _layer_name: &str) -> Result<Option<GeometryPayload>> {
        Ok(None)
    }
}
