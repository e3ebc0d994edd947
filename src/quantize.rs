//! Quantization of local points and volumes into tile addresses.
//!
//! Local tile space has its origin at the root cell's north-west bottom
//! corner: `x` grows east, `y` grows south and altitude grows up from the
//! namespace's origin altitude. The root cell spans `[0, scale]` horizontally
//! and `[0, scale_height]` vertically.
//!
//! Georeferencing works in a planar frame centred on the origin with `y`
//! growing north; [`planar_to_local`] and [`local_to_planar`] convert between
//! the two.

use crate::error::{Result, SpatialIdError};
use crate::validation::{validate_finite_bbox3d, validate_finite_point3d, validate_zoom};
use geo::Coord;
use local_spatial_id_types::MAX_ZOOM;
use local_spatial_id_types::bbox::BoundingBox3D;
use local_spatial_id_types::point::Point3d;
use local_spatial_id_types::zfxy::ZFXYTile;

/// Resolution used to find the divergent bit of a bounding volume.
pub const BBOX_QUANTIZE_ZOOM: u32 = 32;

/// A fractional tile position at some zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFraction {
    pub z: u32,
    pub f: f64,
    pub x: f64,
    pub y: f64,
}

impl TileFraction {
    /// The tile containing this position.
    pub fn floor(&self) -> ZFXYTile {
        ZFXYTile {
            z: self.z,
            f: self.f.floor() as u64,
            x: self.x.floor() as u64,
            y: self.y.floor() as u64,
        }
    }
}

/// Edge length in meters of one tile at `zoom`.
///
/// ```
/// use local_spatial_id::quantize::tile_to_meters;
///
/// assert_eq!(tile_to_meters(1024.0, 3), 128.0);
/// ```
pub fn tile_to_meters(scale: f64, zoom: u32) -> f64 {
    scale / 2f64.powi(zoom as i32)
}

/// Fractional tile position of a local point at `zoom`.
///
/// Without `clamp`, any axis outside `[0, 2^zoom)` fails with
/// `SpatialIdError::OutOfBounds`. With `clamp`, each axis is clamped to
/// `[0, 2^zoom - 1]`.
pub fn point_to_local_tile_fraction(
    scale: f64,
    scale_height: f64,
    point: &Point3d,
    zoom: u32,
    clamp: bool,
) -> Result<TileFraction> {
    validate_finite_point3d(point)?;
    if zoom > BBOX_QUANTIZE_ZOOM {
        return Err(SpatialIdError::InvalidInput(format!(
            "Quantization zoom must be at most {}, got: {}",
            BBOX_QUANTIZE_ZOOM, zoom
        )));
    }

    let side = 2f64.powi(zoom as i32);
    let mut fraction = TileFraction {
        z: zoom,
        f: side * point.z() / scale_height,
        x: side * point.x() / scale,
        y: side * point.y() / scale,
    };

    if clamp {
        let max = side - 1.0;
        fraction.f = fraction.f.clamp(0.0, max);
        fraction.x = fraction.x.clamp(0.0, max);
        fraction.y = fraction.y.clamp(0.0, max);
    } else {
        for (axis, value) in [("f", fraction.f), ("x", fraction.x), ("y", fraction.y)] {
            if !(0.0..side).contains(&value) {
                return Err(SpatialIdError::OutOfBounds(format!(
                    "point ({}, {}, {}) is outside the namespace: {} = {} at zoom {}",
                    point.x(),
                    point.y(),
                    point.z(),
                    axis,
                    value,
                    zoom
                )));
            }
        }
    }

    Ok(fraction)
}

/// The tile containing a local point at `zoom`.
pub fn point_to_local_tile(
    scale: f64,
    scale_height: f64,
    point: &Point3d,
    zoom: u32,
    clamp: bool,
) -> Result<ZFXYTile> {
    point_to_local_tile_fraction(scale, scale_height, point, zoom, clamp).map(|f| f.floor())
}

/// The coarsest zoom at which two corners quantized at
/// [`BBOX_QUANTIZE_ZOOM`] fall into different tiles, or [`MAX_ZOOM`] if they
/// share a tile down to it.
pub fn bbox_zoom(min: &ZFXYTile, max: &ZFXYTile) -> u32 {
    for z in 0..MAX_ZOOM {
        let mask = 1u64 << (BBOX_QUANTIZE_ZOOM - 1 - z);
        if (min.f & mask) != (max.f & mask)
            || (min.x & mask) != (max.x & mask)
            || (min.y & mask) != (max.y & mask)
        {
            return z;
        }
    }
    MAX_ZOOM
}

/// The smallest tile, no finer than `max_zoom`, covering a local volume.
pub fn bbox_to_local_tile(
    scale: f64,
    scale_height: f64,
    bbox: &BoundingBox3D,
    max_zoom: u32,
    clamp: bool,
) -> Result<ZFXYTile> {
    validate_finite_bbox3d(bbox)?;
    validate_zoom(max_zoom)?;

    let min = point_to_local_tile(
        scale,
        scale_height,
        &bbox.min_corner(),
        BBOX_QUANTIZE_ZOOM,
        clamp,
    )?;
    let max = point_to_local_tile(
        scale,
        scale_height,
        &bbox.max_corner(),
        BBOX_QUANTIZE_ZOOM,
        clamp,
    )?;

    let z = bbox_zoom(&min, &max).min(max_zoom);
    if z == 0 {
        return Ok(ZFXYTile::root());
    }

    let shift = BBOX_QUANTIZE_ZOOM - z;
    Ok(ZFXYTile {
        z,
        f: min.f >> shift,
        x: min.x >> shift,
        y: min.y >> shift,
    })
}

/// Quantize a local point or volume to a tile. A point is treated as a
/// degenerate volume, so it always lands at exactly `zoom`.
///
/// ```
/// use local_spatial_id::quantize::calculate_local_zfxy;
/// use local_spatial_id_types::point::Point3d;
///
/// let tile = calculate_local_zfxy(1024.0, 1024.0, Point3d::new(600.0, 100.0, 0.0), 3, false)?;
/// assert_eq!(tile.to_string(), "/3/0/4/0");
/// # Ok::<(), local_spatial_id::SpatialIdError>(())
/// ```
pub fn calculate_local_zfxy<B: Into<BoundingBox3D>>(
    scale: f64,
    scale_height: f64,
    input: B,
    zoom: u32,
    clamp: bool,
) -> Result<ZFXYTile> {
    bbox_to_local_tile(scale, scale_height, &input.into(), zoom, clamp)
}

/// Origin-centred planar meters (y north) to local tile space (y south).
pub fn planar_to_local(scale: f64, planar: Coord) -> Coord {
    let half = scale / 2.0;
    geo::coord! { x: planar.x + half, y: half - planar.y }
}

/// Local tile space (y south) to origin-centred planar meters (y north).
pub fn local_to_planar(scale: f64, local: Coord) -> Coord {
    let half = scale / 2.0;
    geo::coord! { x: local.x - half, y: half - local.y }
}
