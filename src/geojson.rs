//! GeoJSON conversion for geometries, cells and global tiles.
//!
//! Geometry values go through the `geojson` crate's `geo-types`
//! conversions; this module adds the collection policy and the feature
//! properties.

use crate::cell::LocalSpatialId;
use crate::error::{Result, SpatialIdError};
use crate::global::GlobalSpatialId;
use geo::Polygon;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde_json::{Map, json};

/// Converts a Polygon to a GeoJSON geometry.
pub fn polygon_to_geojson(polygon: &Polygon) -> Geometry {
    Geometry::new(Value::from(polygon))
}

/// Converts any non-collection geometry to a GeoJSON geometry.
///
/// `Line`, `Rect` and `Triangle` become a `LineString` and `Polygon`s.
pub fn geometry_to_geojson(geometry: &geo::Geometry) -> Result<Geometry> {
    if let geo::Geometry::GeometryCollection(_) = geometry {
        return Err(collection_error());
    }
    Ok(Geometry::new(Value::from(geometry)))
}

/// Parses a GeoJSON geometry, or the geometry of a GeoJSON feature.
///
/// ```rust
/// use local_spatial_id::geojson::geometry_from_geojson;
///
/// let json = r#"{"type":"Point","coordinates":[139.7,35.68]}"#;
/// let geometry = geometry_from_geojson(json)?;
/// assert!(matches!(geometry, geo::Geometry::Point(_)));
/// # Ok::<(), local_spatial_id::SpatialIdError>(())
/// ```
pub fn geometry_from_geojson(geojson: &str) -> Result<geo::Geometry> {
    let parsed: GeoJson = geojson.parse()?;
    match parsed {
        GeoJson::Geometry(geometry) => geometry_from_value(&geometry.value),
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geometry) => geometry_from_value(&geometry.value),
            None => Err(SpatialIdError::InvalidInput(
                "GeoJSON feature has no geometry".into(),
            )),
        },
        GeoJson::FeatureCollection(_) => Err(SpatialIdError::UnsupportedGeometry(
            "expected a GeoJSON geometry or feature, got a feature collection".into(),
        )),
    }
}

/// Converts a GeoJSON geometry value to a `geo` geometry.
///
/// # Errors
///
/// `UnsupportedGeometry` for geometry collections, `InvalidInput` when the
/// value has malformed positions or rings.
pub fn geometry_from_value(value: &Value) -> Result<geo::Geometry> {
    validate_positions(value)?;
    geo::Geometry::<f64>::try_from(value.clone())
        .map_err(|e| SpatialIdError::InvalidInput(format!("Invalid GeoJSON geometry: {}", e)))
}

/// One polygon feature per cell, with `zfxy`, `tilehash` and `namespace`
/// properties.
pub fn cells_to_feature_collection(cells: &[LocalSpatialId<'_>]) -> Result<FeatureCollection> {
    let features = cells
        .iter()
        .map(|cell| {
            let mut props = Map::new();
            props.insert("zfxy".into(), json!(cell.zfxy_str()));
            props.insert("tilehash".into(), json!(cell.tilehash()));
            props.insert("namespace".into(), json!(cell.namespace().id().as_str()));
            Ok(feature(cell.to_geojson()?, props))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// One polygon feature per global tile, with `zfxy`, `tilehash`, `alt_min`
/// and `alt_max` properties.
pub fn global_ids_to_feature_collection(ids: &[GlobalSpatialId]) -> FeatureCollection {
    let features = ids
        .iter()
        .map(|id| {
            let mut props = Map::new();
            props.insert("zfxy".into(), json!(id.zfxy_str()));
            props.insert("tilehash".into(), json!(id.tilehash()));
            props.insert("alt_min".into(), json!(id.alt_min()));
            props.insert("alt_max".into(), json!(id.alt_max()));
            feature(id.to_geojson(), props)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn feature(geometry: Geometry, properties: Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// The `geo-types` conversion reads `x` and `y` by index, so positions
/// shorter than two values are rejected first.
fn validate_positions(value: &Value) -> Result<()> {
    let mut positions: Box<dyn Iterator<Item = &Vec<f64>> + '_> = match value {
        Value::Point(position) => Box::new(std::iter::once(position)),
        Value::MultiPoint(line) | Value::LineString(line) => Box::new(line.iter()),
        Value::MultiLineString(rings) | Value::Polygon(rings) => Box::new(rings.iter().flatten()),
        Value::MultiPolygon(polygons) => Box::new(polygons.iter().flatten().flatten()),
        Value::GeometryCollection(_) => return Err(collection_error()),
    };
    match positions.find(|position| position.len() < 2) {
        Some(short) => Err(SpatialIdError::InvalidInput(format!(
            "Coordinate must have at least 2 values, got: {:?}",
            short
        ))),
        None => Ok(()),
    }
}

fn collection_error() -> SpatialIdError {
    SpatialIdError::UnsupportedGeometry("geometry collections are not supported".into())
}
