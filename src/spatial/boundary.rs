//! Administrative boundary layers loaded from GeoJSON.

use crate::spatial::crs::Crs;
use crate::spatial::error::{BoundaryError, EnrichmentError};
use geo::{Coord, LineString, MapCoords, MultiPolygon, Polygon};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// One administrative polygon and its attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub geometry: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
}

impl Boundary {
    /// A property value. Null and missing properties yield `None`.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.properties.get(name).filter(|v| !v.is_null()).cloned()
    }
}

/// A polygon layer in a single CRS. Layer order is significant: it breaks
/// ties when a point falls in more than one polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryLayer {
    pub crs: Crs,
    pub boundaries: Vec<Boundary>,
}

#[derive(Deserialize)]
struct FeatureCollectionDoc {
    #[serde(default)]
    crs: Option<CrsDoc>,
    #[serde(default)]
    features: Vec<FeatureDoc>,
}

#[derive(Deserialize)]
struct CrsDoc {
    properties: CrsPropertiesDoc,
}

#[derive(Deserialize)]
struct CrsPropertiesDoc {
    name: String,
}

#[derive(Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<GeometryDoc>,
}

#[derive(Deserialize)]
struct GeometryDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

type Ring = Vec<Vec<f64>>;

impl BoundaryLayer {
    pub fn new(crs: Crs, boundaries: Vec<Boundary>) -> Self {
        Self { crs, boundaries }
    }

    /// Reads a GeoJSON `FeatureCollection`.
    ///
    /// The CRS comes from the legacy `crs` member and defaults to WGS84.
    /// Features without a Polygon or MultiPolygon geometry are skipped.
    pub fn from_geojson_str(geojson: &str) -> Result<Self, BoundaryError> {
        let doc: FeatureCollectionDoc = serde_json::from_str(geojson)?;
        let crs = match &doc.crs {
            Some(member) => Crs::parse(&member.properties.name)?,
            None => Crs::Wgs84,
        };

        let mut boundaries = Vec::with_capacity(doc.features.len());
        for (index, feature) in doc.features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry else {
                warn!("Skipping boundary feature {} without geometry", index);
                continue;
            };
            let geometry = match geometry.kind.as_str() {
                "Polygon" => MultiPolygon(vec![parse_polygon(index, geometry.coordinates)?]),
                "MultiPolygon" => parse_multi_polygon(index, geometry.coordinates)?,
                other => {
                    warn!("Skipping boundary feature {} with {} geometry", index, other);
                    continue;
                }
            };
            boundaries.push(Boundary {
                geometry,
                properties: feature.properties.unwrap_or_default(),
            });
        }

        Ok(Self::new(crs, boundaries))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BoundaryError> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| BoundaryError::Io(path.to_path_buf(), e))?;
        let layer = Self::from_geojson_str(&contents)?;
        info!(
            "Loaded {} boundaries in {} from {}",
            layer.len(),
            layer.crs,
            path.display()
        );
        Ok(layer)
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Union of the property names of all boundaries, in first-seen order.
    pub fn schema(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for boundary in &self.boundaries {
            for name in boundary.properties.keys() {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    /// Names in `required` that no boundary carries.
    pub fn missing_attributes(&self, required: &[&str]) -> Vec<String> {
        let schema = self.schema();
        required
            .iter()
            .filter(|name| !schema.iter().any(|s| s == *name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Returns the layer expressed in `target`. A layer already in `target`
    /// is returned as is.
    pub fn reprojected(self, target: Crs) -> Result<Self, EnrichmentError> {
        if self.crs == target {
            return Ok(self);
        }
        if target != Crs::Wgs84 || !self.crs.is_supported() {
            return Err(EnrichmentError::UnsupportedCrs {
                from: self.crs.to_string(),
                to: target.to_string(),
            });
        }

        info!("Reprojecting {} boundaries from {} to {}", self.len(), self.crs, target);
        let source = self.crs;
        let boundaries = self
            .boundaries
            .into_iter()
            .enumerate()
            .map(|(index, boundary)| {
                let geometry = boundary
                    .geometry
                    .try_map_coords(move |coord| {
                        source
                            .to_wgs84(coord)
                            .ok_or_else(|| EnrichmentError::Reprojection {
                                feature: index,
                                reason: format!("({}, {}) has no image in {}", coord.x, coord.y, target),
                            })
                    })?;
                Ok(Boundary {
                    geometry,
                    properties: boundary.properties,
                })
            })
            .collect::<Result<Vec<_>, EnrichmentError>>()?;

        Ok(Self::new(target, boundaries))
    }
}

fn parse_multi_polygon(feature: usize, coordinates: Value) -> Result<MultiPolygon<f64>, BoundaryError> {
    let polygons: Vec<Vec<Ring>> = serde_json::from_value(coordinates).map_err(|e| {
        BoundaryError::InvalidGeometry {
            feature,
            reason: e.to_string(),
        }
    })?;
    polygons
        .into_iter()
        .map(|rings| build_polygon(feature, rings))
        .collect::<Result<Vec<_>, _>>()
        .map(MultiPolygon)
}

fn parse_polygon(feature: usize, coordinates: Value) -> Result<Polygon<f64>, BoundaryError> {
    let rings: Vec<Ring> =
        serde_json::from_value(coordinates).map_err(|e| BoundaryError::InvalidGeometry {
            feature,
            reason: e.to_string(),
        })?;
    build_polygon(feature, rings)
}

fn build_polygon(feature: usize, rings: Vec<Ring>) -> Result<Polygon<f64>, BoundaryError> {
    let mut rings = rings
        .into_iter()
        .map(|ring| build_ring(feature, ring))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let exterior = rings.next().ok_or_else(|| BoundaryError::InvalidGeometry {
        feature,
        reason: "polygon without rings".to_string(),
    })?;
    Ok(Polygon::new(exterior, rings.collect()))
}

fn build_ring(feature: usize, positions: Ring) -> Result<LineString<f64>, BoundaryError> {
    positions
        .into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(BoundaryError::InvalidGeometry {
                feature,
                reason: format!("position with {} value(s)", position.len()),
            }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}
