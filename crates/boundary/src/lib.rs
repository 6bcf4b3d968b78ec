//! State boundary geometry, parsed from a GeoJSON FeatureCollection.
//!
//! Boundaries are used two ways: as a join key (each feature's
//! `properties.name` must match a `State` value in the dataset) and as the
//! shape source for the choropleth. Geometry is kept as raw lon/lat rings
//! and re-emitted as GeoJSON when a map spec is built, optionally filtered
//! to the states actually rendered.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Area geometry only; the choropleth has no use for points or lines.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaGeometry {
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateBoundary {
    pub name: String,
    pub geometry: AreaGeometry,
    /// Remaining feature properties, carried through on re-emission.
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryGeometry {
    states: BTreeMap<String, StateBoundary>,
}

#[derive(Debug)]
pub enum BoundaryError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

impl BoundaryGeometry {
    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| BoundaryError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, BoundaryError> {
        let obj = value
            .as_object()
            .ok_or(BoundaryError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(BoundaryError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(BoundaryError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(BoundaryError::NotAFeatureCollection)?;

        let mut states = BTreeMap::new();
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or(BoundaryError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                BoundaryError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(BoundaryError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            let name = properties
                .get("name")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or(BoundaryError::InvalidFeature {
                    index,
                    reason: "feature missing properties.name".to_string(),
                })?;

            let geometry_val =
                feat_obj
                    .get("geometry")
                    .ok_or(BoundaryError::InvalidFeature {
                        index,
                        reason: "feature missing geometry".to_string(),
                    })?;
            let geometry = parse_area_geometry(geometry_val)
                .map_err(|reason| BoundaryError::InvalidFeature { index, reason })?;

            // Names are the join key; two features claiming the same
            // state would make the join ambiguous.
            if states.contains_key(&name) {
                return Err(BoundaryError::InvalidFeature {
                    index,
                    reason: format!("duplicate state name: {name:?}"),
                });
            }

            states.insert(
                name.clone(),
                StateBoundary {
                    name,
                    geometry,
                    properties,
                },
            );
        }

        Ok(Self { states })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    pub fn get(&self, state: &str) -> Option<&StateBoundary> {
        self.states.get(state)
    }

    /// State names in lexicographic order (BTreeMap iteration).
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Re-emit the boundaries as a GeoJSON FeatureCollection, keeping only
    /// states for which `keep` returns true.
    pub fn to_geojson_value<F>(&self, mut keep: F) -> Value
    where
        F: FnMut(&str) -> bool,
    {
        let mut features = Vec::new();
        for boundary in self.states.values() {
            if !keep(&boundary.name) {
                continue;
            }
            let mut fobj = Map::new();
            fobj.insert("type".to_string(), Value::String("Feature".to_string()));
            fobj.insert(
                "properties".to_string(),
                Value::Object(boundary.properties.clone()),
            );
            fobj.insert(
                "geometry".to_string(),
                area_geometry_to_value(&boundary.geometry),
            );
            features.push(Value::Object(fobj));
        }

        let mut root = Map::new();
        root.insert(
            "type".to_string(),
            Value::String("FeatureCollection".to_string()),
        );
        root.insert("features".to_string(), Value::Array(features));
        Value::Object(root)
    }
}

fn area_geometry_to_value(geom: &AreaGeometry) -> Value {
    let mut obj = Map::new();
    match geom {
        AreaGeometry::Polygon(rings) => {
            obj.insert("type".to_string(), Value::String("Polygon".to_string()));
            let coords = rings
                .iter()
                .map(|ring| Value::Array(ring.iter().map(point_coords).collect()))
                .collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
        AreaGeometry::MultiPolygon(polys) => {
            obj.insert(
                "type".to_string(),
                Value::String("MultiPolygon".to_string()),
            );
            let coords = polys
                .iter()
                .map(|poly| {
                    let rings = poly
                        .iter()
                        .map(|ring| Value::Array(ring.iter().map(point_coords).collect()))
                        .collect();
                    Value::Array(rings)
                })
                .collect();
            obj.insert("coordinates".to_string(), Value::Array(coords));
        }
    }
    Value::Object(obj)
}

fn point_coords(p: &GeoPoint) -> Value {
    Value::Array(vec![Value::from(p.lon_deg), Value::from(p.lat_deg)])
}

fn parse_area_geometry(value: &Value) -> Result<AreaGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(AreaGeometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => Ok(AreaGeometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported boundary geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item)?);
    }
    Ok(out)
}

fn parse_polygon(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_polygon(poly)?);
    }
    Ok(out)
}
