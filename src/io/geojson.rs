use anyhow::{Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::trim::{Shape, SourceFeature, TrimmedPolygon};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    /// The geometry is not a usable Polygon or MultiPolygon; the feature is dropped.
    #[error("feature {index}: malformed geometry: {reason}")]
    MalformedGeometry { index: usize, reason: String },
    /// The classification property is absent or not an integer; the file fails.
    #[error("feature {index}: property `{key}` is missing or not an integer")]
    MissingCode { index: usize, key: String },
}

/// A parsed feature collection.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    /// Top-level members other than `features`, written back unchanged.
    pub members: Map<String, Value>,
    pub features: Vec<SourceFeature>,
    /// Features dropped for malformed geometry.
    pub dropped: usize,
}

/// Read a feature collection from GeoJSON bytes, taking the classification
/// code from property `code_key`.
pub fn read_feature_collection(bytes: &[u8], code_key: &str) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let Value::Object(mut members) = value else {
        anyhow::bail!("GeoJSON root is not an object");
    };

    let features = match members.remove("features") {
        Some(Value::Array(features)) => features,
        Some(_) => anyhow::bail!("GeoJSON `features` is not an array"),
        None => Vec::new(),
    };

    let mut collection = FeatureCollection { members, ..FeatureCollection::default() };
    for (index, feature) in features.iter().enumerate() {
        let code = parse_code(&feature["properties"][code_key])
            .ok_or_else(|| FeatureError::MissingCode { index, key: code_key.to_string() })?;

        match parse_shape(&feature["geometry"]) {
            Ok(shape) => collection.features.push(SourceFeature { code, shape }),
            Err(reason) => {
                let err = FeatureError::MalformedGeometry { index, reason };
                warn!(error = %err, "dropping feature");
                collection.dropped += 1;
            }
        }
    }

    Ok(collection)
}

/// Write `polygons` as a compact GeoJSON feature collection, one Polygon
/// feature each with the category under `key`.
pub fn write_feature_collection(members: &Map<String, Value>, polygons: &[TrimmedPolygon], key: &str) -> Result<Vec<u8>> {
    let features = polygons.iter()
        .map(|trimmed| {
            let mut properties = Map::new();
            properties.insert(key.to_string(), json!(trimmed.category));
            json!({
                "type": "Feature",
                "properties": properties,
                "geometry": polygon_to_geojson(&trimmed.polygon),
            })
        })
        .collect::<Vec<_>>();

    let mut collection = members.clone();
    collection.entry("type").or_insert_with(|| json!("FeatureCollection"));
    collection.insert("features".to_string(), Value::Array(features));

    serde_json::to_vec(&Value::Object(collection)).context("Failed to serialize GeoJSON to bytes")
}

/// Convert a polygon to a GeoJSON Polygon geometry.
pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> Value {
    let rings = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    json!({ "type": "Polygon", "coordinates": rings })
}

/// Integer classification code; integral floats are accepted.
fn parse_code(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64)
    })
}

/// Parse a Polygon or MultiPolygon geometry.
fn parse_shape(geometry: &Value) -> Result<Shape, String> {
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| "missing coordinates".to_string())?;

    match geometry["type"].as_str() {
        Some("Polygon") => parse_polygon(coords).map(Shape::Polygon),
        Some("MultiPolygon") => coords.iter()
            .map(|polygon| polygon.as_array()
                .ok_or_else(|| "polygon is not an array".to_string())
                .and_then(|rings| parse_polygon(rings)))
            .collect::<Result<Vec<_>, _>>()
            .map(|polygons| Shape::MultiPolygon(MultiPolygon(polygons))),
        Some(other) => Err(format!("unsupported geometry type {other}")),
        None => Err("missing geometry type".to_string()),
    }
}

/// Parse polygon rings `[exterior, hole, ...]`.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>, String> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| "ring is not an array".to_string())
            .and_then(|coords| parse_ring(coords))
    });

    let exterior = rings.next().ok_or_else(|| "polygon has no exterior ring".to_string())??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring `[[x, y], ...]`, closing it if needed.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>, String> {
    let mut points = coords.iter()
        .map(|pair| match pair.as_array().map(Vec::as_slice) {
            Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => Err(format!("coordinate {pair} is not numeric")),
            },
            _ => Err(format!("coordinate {pair} is not a pair")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }
    if points.len() < 4 {
        return Err(format!("ring has {} coordinates, at least 4 required", points.len()));
    }

    Ok(LineString(points))
}
