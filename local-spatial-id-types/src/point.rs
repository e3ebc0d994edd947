use geo::Point;
use serde::{Deserialize, Serialize};

/// A 3D point: a 2D point plus altitude.
///
/// Depending on context the horizontal part is either local tile-space
/// meters or WGS84 longitude/latitude; `z` is always meters.
///
/// # Examples
///
/// ```
/// use local_spatial_id_types::point::Point3d;
///
/// // 120m east, 40m south of the namespace corner, 15m up
/// let p = Point3d::new(120.0, 40.0, 15.0);
/// assert_eq!(p.altitude(), 15.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    /// The horizontal component
    pub point: Point<f64>,
    /// Altitude in meters
    pub z: f64,
}

impl Point3d {
    /// Create a new 3D point from x, y, and z coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            point: Point::new(x, y),
            z,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.point.x()
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.point.y()
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Alias for `z()`.
    #[inline]
    pub fn altitude(&self) -> f64 {
        self.z
    }

    /// Project this 3D point to 2D by discarding the z coordinate.
    pub fn to_2d(&self) -> Point<f64> {
        self.point
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x().is_finite() && self.y().is_finite() && self.z.is_finite()
    }
}
