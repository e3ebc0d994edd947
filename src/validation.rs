//! Validation for coordinates, namespace parameters and geometries.

use crate::error::{Result, SpatialIdError};
use geo::{Coord, CoordsIter, Geometry, Point};
use local_spatial_id_types::MAX_ZOOM;
use local_spatial_id_types::bbox::BoundingBox3D;
use local_spatial_id_types::point::Point3d;

/// Validates a 2D point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use local_spatial_id::validation::validate_geographic_point;
/// use geo::Point;
///
/// let tokyo = Point::new(139.6917, 35.6895);
/// assert!(validate_geographic_point(&tokyo).is_ok());
///
/// // Invalid latitude
/// let invalid = Point::new(139.6917, 95.0);
/// assert!(validate_geographic_point(&invalid).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(SpatialIdError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(SpatialIdError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(SpatialIdError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(SpatialIdError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates both components of a coordinate are finite.
pub fn validate_finite_coord(coord: &Coord, what: &str) -> Result<()> {
    if !coord.x.is_finite() || !coord.y.is_finite() {
        return Err(SpatialIdError::InvalidInput(format!(
            "{} must be finite, got: ({}, {})",
            what, coord.x, coord.y
        )));
    }
    Ok(())
}

/// Validates every component of a 3D point is finite.
pub fn validate_finite_point3d(point: &Point3d) -> Result<()> {
    if !point.is_finite() {
        return Err(SpatialIdError::InvalidInput(format!(
            "Point must be finite, got: ({}, {}, {})",
            point.x(),
            point.y(),
            point.z()
        )));
    }
    Ok(())
}

/// Validates every bound of a 3D box is finite.
pub fn validate_finite_bbox3d(bbox: &BoundingBox3D) -> Result<()> {
    if !bbox.is_finite() {
        return Err(SpatialIdError::InvalidInput(format!(
            "Bounding box must be finite, got: {:?}",
            bbox
        )));
    }
    Ok(())
}

/// Validates a scale in meters: finite and strictly positive.
///
/// ```
/// use local_spatial_id::validation::validate_scale;
///
/// assert!(validate_scale("scale", 10_000.0).is_ok());
/// assert!(validate_scale("scale", 0.0).is_err());
/// assert!(validate_scale("scale_height", f64::INFINITY).is_err());
/// ```
pub fn validate_scale(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SpatialIdError::InvalidInput(format!(
            "{} must be a finite positive number of meters, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Validates a zoom level does not exceed the maximum zoom.
pub fn validate_zoom(zoom: u32) -> Result<()> {
    if zoom > MAX_ZOOM {
        return Err(SpatialIdError::InvalidInput(format!(
            "Zoom must be at most {}, got: {}",
            MAX_ZOOM, zoom
        )));
    }
    Ok(())
}

/// Validates a geometry is non-empty and every coordinate is a valid
/// longitude/latitude pair.
pub fn validate_geometry(geometry: &Geometry) -> Result<()> {
    if geometry.coords_count() == 0 {
        return Err(SpatialIdError::InvalidInput("Geometry is empty".into()));
    }

    for (idx, coord) in geometry.coords_iter().enumerate() {
        validate_geographic_point(&Point::from(coord)).map_err(|e| {
            SpatialIdError::InvalidInput(format!("Geometry coordinate at index {}: {}", idx, e))
        })?;
    }

    Ok(())
}
