//! Tiles of the global ZFXY scheme.
//!
//! Horizontally a global tile is a Web-Mercator `(z, x, y)` tile. Vertically
//! the index `f` counts bands upward from sea level; at zoom 25 each band is
//! one meter high, so at zoom `z` a band spans `2^25 / 2^z` meters. Negative
//! `f` addresses bands below sea level.

use crate::error::{Result, SpatialIdError};
use crate::geojson::polygon_to_geojson;
use geo::{LineString, Polygon};
use local_spatial_id_types::MAX_ZOOM;
use local_spatial_id_types::bbox::BoundingBox3D;
use local_spatial_id_types::tilehash;
use local_spatial_id_types::zfxy::MAX_DESCENDANT_DEPTH;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Zoom at which one vertical band is one meter high.
pub const ZFXY_1M_ZOOM_BASE: u32 = 25;

const QUANTIZE_ZOOM: u32 = 32;
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// A global spatial ID.
///
/// ```rust
/// use local_spatial_id::GlobalSpatialId;
///
/// let tile = GlobalSpatialId::new(25, 10, 29_803_173, 13_211_925)?;
/// assert_eq!(tile.alt_min(), 10.0);
/// assert_eq!(tile.alt_max(), 11.0);
/// assert_eq!(tile.zfxy_str(), "/25/10/29803173/13211925");
/// # Ok::<(), local_spatial_id::SpatialIdError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GlobalSpatialId {
    pub z: u32,
    pub f: i64,
    pub x: u64,
    pub y: u64,
}

impl GlobalSpatialId {
    /// Create a validated global tile: `x, y < 2^z` and `-2^z <= f < 2^z`.
    pub fn new(z: u32, f: i64, x: u64, y: u64) -> Result<Self> {
        let tile = Self { z, f, x, y };
        if tile.is_valid() {
            Ok(tile)
        } else {
            Err(SpatialIdError::OutOfBounds(format!(
                "{} is not a valid global tile",
                tile
            )))
        }
    }

    pub fn is_valid(&self) -> bool {
        if self.z > MAX_ZOOM {
            return false;
        }
        let side = 1u64 << self.z;
        let f_side = 1i64 << self.z;
        self.x < side && self.y < side && (-f_side..f_side).contains(&self.f)
    }

    /// Height of one vertical band in meters.
    pub fn band_height(&self) -> f64 {
        2f64.powi(ZFXY_1M_ZOOM_BASE as i32 - self.z as i32)
    }

    /// Altitude of the bottom face in meters.
    pub fn alt_min(&self) -> f64 {
        self.f as f64 * self.band_height()
    }

    /// Altitude of the top face in meters.
    pub fn alt_max(&self) -> f64 {
        self.alt_min() + self.band_height()
    }

    /// Canonical `/{z}/{f}/{x}/{y}` string.
    pub fn zfxy_str(&self) -> String {
        self.to_string()
    }

    /// Tile hash. Tiles below sea level are prefixed with `-` and hash
    /// `-f - 1`, so the two halves of the vertical axis never share a prefix.
    pub fn tilehash(&self) -> String {
        if self.f < 0 {
            let mirrored = (-(self.f + 1)) as u64;
            format!("-{}", tilehash::encode_axes(self.z, mirrored, self.x, self.y))
        } else {
            tilehash::encode_axes(self.z, self.f as u64, self.x, self.y)
        }
    }

    /// Parse a global tile hash.
    pub fn from_tilehash(hash: &str) -> Result<Self> {
        let (negative, digits) = match hash.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, hash),
        };
        let (z, f, x, y) = tilehash::decode_axes(digits)?;
        let f = f as i64;
        Ok(Self {
            z,
            f: if negative { -f - 1 } else { f },
            x,
            y,
        })
    }

    /// The ancestor at `zoom` (arithmetic shift on the vertical axis).
    pub fn parent_at_zoom(&self, zoom: u32) -> Result<Self> {
        if zoom > self.z {
            return Err(SpatialIdError::InvalidNavigation(format!(
                "zoom {} is finer than {}",
                zoom, self
            )));
        }
        let shift = self.z - zoom;
        Ok(Self {
            z: zoom,
            f: self.f >> shift,
            x: self.x >> shift,
            y: self.y >> shift,
        })
    }

    /// All descendants at `zoom`, in tile hash order.
    pub fn descendants(&self, zoom: u32) -> Result<impl Iterator<Item = Self> + use<>> {
        if zoom < self.z || zoom > MAX_ZOOM || zoom - self.z > MAX_DESCENDANT_DEPTH {
            return Err(SpatialIdError::InvalidNavigation(format!(
                "cannot enumerate descendants of {} at zoom {}",
                self, zoom
            )));
        }
        let base = *self;
        let depth = zoom - self.z;
        let total = 1u64 << (3 * depth);
        Ok((0..total).map(move |index| {
            let (df, dx, dy) = tilehash::deinterleave(index, depth);
            Self {
                z: zoom,
                f: (base.f << depth) | df as i64,
                x: (base.x << depth) | dx,
                y: (base.y << depth) | dy,
            }
        }))
    }

    /// The tile's footprint as a closed ring, north-west corner first.
    pub fn to_polygon(&self) -> Polygon {
        let n = 2f64.powi(self.z as i32);
        let west = self.x as f64 / n * 360.0 - 180.0;
        let east = (self.x + 1) as f64 / n * 360.0 - 180.0;
        let north = tile_y_to_lat(self.y as f64, n);
        let south = tile_y_to_lat((self.y + 1) as f64, n);

        Polygon::new(
            LineString::from(vec![
                (west, north),
                (west, south),
                (east, south),
                (east, north),
                (west, north),
            ]),
            vec![],
        )
    }

    /// The footprint as a GeoJSON polygon.
    pub fn to_geojson(&self) -> geojson::Geometry {
        polygon_to_geojson(&self.to_polygon())
    }

    /// The smallest tile, no finer than `max_zoom`, containing a WGS84 box
    /// (`x` longitude, `y` latitude, `z` altitude in meters).
    ///
    /// Returns `None` when no single tile contains the box, which happens
    /// when it straddles sea level.
    pub fn containing_bbox(bbox: &BoundingBox3D, max_zoom: u32) -> Option<Self> {
        let n = 2f64.powi(QUANTIZE_ZOOM as i32);
        let limit = (1u64 << QUANTIZE_ZOOM) - 1;

        let min_x = lon_to_tile_x(bbox.min_x, n, limit);
        let max_x = lon_to_tile_x(bbox.max_x, n, limit);
        // tile y grows southward
        let min_y = lat_to_tile_y(bbox.max_y, n, limit);
        let max_y = lat_to_tile_y(bbox.min_y, n, limit);
        let min_f = alt_to_tile_f(bbox.min_z, n)?;
        let max_f = alt_to_tile_f(bbox.max_z, n)?;

        if (min_f < 0) != (max_f < 0) {
            return None;
        }

        let mut z = MAX_ZOOM;
        for level in 0..MAX_ZOOM {
            let mask = 1u64 << (QUANTIZE_ZOOM - 1 - level);
            let f_mask = mask as i64;
            if (min_x & mask) != (max_x & mask)
                || (min_y & mask) != (max_y & mask)
                || (min_f & f_mask) != (max_f & f_mask)
            {
                z = level;
                break;
            }
        }
        let z = z.min(max_zoom).min(MAX_ZOOM);

        let shift = QUANTIZE_ZOOM - z;
        Some(Self {
            z,
            f: min_f >> shift,
            x: min_x >> shift,
            y: min_y >> shift,
        })
    }

    /// The zoom-0 tile(s) covering every altitude in the box: one when it
    /// lies entirely above or below sea level, both halves otherwise.
    pub(crate) fn vertical_roots(bbox: &BoundingBox3D) -> Vec<Self> {
        let mut roots = Vec::with_capacity(2);
        if bbox.min_z < 0.0 {
            roots.push(Self { z: 0, f: -1, x: 0, y: 0 });
        }
        if bbox.max_z >= 0.0 {
            roots.push(Self { z: 0, f: 0, x: 0, y: 0 });
        }
        roots
    }
}

fn tile_y_to_lat(y: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees()
}

fn lon_to_tile_x(lon: f64, n: f64, limit: u64) -> u64 {
    let x = ((lon + 180.0) / 360.0 * n).rem_euclid(n).floor();
    (x as u64).min(limit)
}

fn lat_to_tile_y(lat: f64, n: f64, limit: u64) -> u64 {
    let lat = lat
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n;
    (y.floor().max(0.0) as u64).min(limit)
}

fn alt_to_tile_f(alt: f64, n: f64) -> Option<i64> {
    let f = (alt * n / 2f64.powi(ZFXY_1M_ZOOM_BASE as i32)).floor();
    if f.is_finite() && f >= -n && f < n {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for GlobalSpatialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}/{}/{}", self.z, self.f, self.x, self.y)
    }
}

impl FromStr for GlobalSpatialId {
    type Err = SpatialIdError;

    /// Parse `/{z}/{f}/{x}/{y}`, where `f` may be negative.
    fn from_str(s: &str) -> Result<Self> {
        let parse_err = || SpatialIdError::ParseFailure(format!("'{}' is not a global tile", s));
        let body = s.strip_prefix('/').unwrap_or(s);
        let parts: Vec<&str> = body.split('/').collect();
        let [z, f, x, y] = parts.as_slice() else {
            return Err(parse_err());
        };
        let tile = Self {
            z: z.parse().map_err(|_| parse_err())?,
            f: f.parse().map_err(|_| parse_err())?,
            x: x.parse().map_err(|_| parse_err())?,
            y: y.parse().map_err(|_| parse_err())?,
        };
        if !tile.is_valid() {
            return Err(parse_err());
        }
        Ok(tile)
    }
}
