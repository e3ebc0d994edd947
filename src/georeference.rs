//! Geodesic georeferencing between local planar meters and WGS84.
//!
//! A local frame is anchored at an origin (longitude, latitude) and rotated by
//! an angle measured clockwise from true north. A planar point `(x, y)` is
//! `x` meters along the frame's east axis and `y` meters along its north axis.
//! The forward transform walks the geodesic from the origin with the distance
//! `hypot(x, y)` and the rotated azimuth; the inverse solves the geodesic back
//! to the origin.
//!
//! ```rust
//! use local_spatial_id::georeference::{CoordinateTransformer, OriginGeodesicTransformer};
//! use geo::coord;
//!
//! let transformer = OriginGeodesicTransformer::new(139.69172572944066, 35.68950097945576, 30.0)?;
//! let planar = coord! { x: 1200.0, y: -350.0 };
//! let wgs84 = transformer.transform(planar)?;
//! let back = transformer.transform_inverse(wgs84)?;
//! assert!((back.x - planar.x).abs() < 1e-6);
//! assert!((back.y - planar.y).abs() < 1e-6);
//! # Ok::<(), local_spatial_id::SpatialIdError>(())
//! ```

use crate::error::{Result, SpatialIdError};
use crate::validation::{validate_finite_coord, validate_geographic_point};
use geo::{Bearing, Coord, Destination, Distance, Geodesic, Point};
use std::fmt;
use std::sync::Arc;

/// Direct and inverse geodesic problems on some reference surface.
///
/// Coordinates are `(x = longitude, y = latitude)` in degrees, azimuths are
/// degrees clockwise from north and distances are meters.
pub trait GeodesicSolver: Send + Sync + fmt::Debug {
    /// Point reached by travelling `distance` meters from `origin` at `azimuth`.
    fn direct(&self, origin: Coord, azimuth: f64, distance: f64) -> Coord;

    /// `(distance, azimuth)` of the geodesic from `origin` to `destination`.
    fn inverse(&self, origin: Coord, destination: Coord) -> (f64, f64);
}

/// Karney's geodesic algorithms on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84Geodesic;

impl GeodesicSolver for Wgs84Geodesic {
    fn direct(&self, origin: Coord, azimuth: f64, distance: f64) -> Coord {
        Geodesic
            .destination(Point::from(origin), azimuth, distance)
            .into()
    }

    fn inverse(&self, origin: Coord, destination: Coord) -> (f64, f64) {
        let (from, to) = (Point::from(origin), Point::from(destination));
        let distance = Geodesic.distance(from, to);
        let azimuth = Geodesic.bearing(from, to);
        (distance, azimuth)
    }
}

/// Maps coordinates between a local planar frame and WGS84.
pub trait CoordinateTransformer: Send + Sync + fmt::Debug {
    /// Local planar meters to WGS84 `(longitude, latitude)`.
    fn transform(&self, planar: Coord) -> Result<Coord>;

    /// WGS84 `(longitude, latitude)` to local planar meters.
    fn transform_inverse(&self, geographic: Coord) -> Result<Coord>;
}

/// A local frame anchored at a WGS84 origin and rotated by `angle` degrees.
#[derive(Debug, Clone)]
pub struct OriginGeodesicTransformer {
    origin: Coord,
    angle: f64,
    solver: Arc<dyn GeodesicSolver>,
}

impl OriginGeodesicTransformer {
    /// Create a transformer on the WGS84 ellipsoid.
    ///
    /// # Errors
    ///
    /// Returns `SpatialIdError::InvalidInput` if the origin is not a valid
    /// geographic point or the angle is not finite.
    pub fn new(longitude: f64, latitude: f64, angle: f64) -> Result<Self> {
        Self::with_solver(longitude, latitude, angle, Arc::new(Wgs84Geodesic))
    }

    /// Create a transformer backed by a custom geodesic solver.
    pub fn with_solver(
        longitude: f64,
        latitude: f64,
        angle: f64,
        solver: Arc<dyn GeodesicSolver>,
    ) -> Result<Self> {
        validate_geographic_point(&Point::new(longitude, latitude))?;
        if !angle.is_finite() {
            return Err(SpatialIdError::InvalidInput(format!(
                "Rotation angle must be finite, got: {}",
                angle
            )));
        }
        Ok(Self {
            origin: geo::coord! { x: longitude, y: latitude },
            angle,
            solver,
        })
    }

    /// Origin as `(longitude, latitude)`.
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Rotation in degrees clockwise from north.
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

impl CoordinateTransformer for OriginGeodesicTransformer {
    fn transform(&self, planar: Coord) -> Result<Coord> {
        validate_finite_coord(&planar, "planar coordinate")?;

        let distance = planar.x.hypot(planar.y);
        let bearing = (90.0 - planar.y.atan2(planar.x).to_degrees()).rem_euclid(360.0);
        let azimuth = (bearing + self.angle).rem_euclid(360.0);

        let destination = self.solver.direct(self.origin, azimuth, distance);
        log::trace!(
            "transform ({}, {}) -> azimuth {:.6}, distance {:.3} -> ({}, {})",
            planar.x,
            planar.y,
            azimuth,
            distance,
            destination.x,
            destination.y
        );
        Ok(destination)
    }

    fn transform_inverse(&self, geographic: Coord) -> Result<Coord> {
        validate_finite_coord(&geographic, "geographic coordinate")?;

        let (distance, azimuth) = self.solver.inverse(self.origin, geographic);
        let bearing = (azimuth - self.angle).rem_euclid(360.0).to_radians();

        Ok(geo::coord! {
            x: distance * bearing.sin(),
            y: distance * bearing.cos(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    const TOKYO_LAT: f64 = 35.68950097945576;
    const TOKYO_LON: f64 = 139.69172572944066;

    fn tokyo(angle: f64) -> OriginGeodesicTransformer {
        OriginGeodesicTransformer::new(TOKYO_LON, TOKYO_LAT, angle).unwrap()
    }

    #[test]
    fn test_rotated_forward_known_value() {
        let out = tokyo(90.0)
            .transform(coord! { x: 10000.0, y: 10000.0 })
            .unwrap();
        assert!((out.x - 139.8020795846941).abs() < 1e-9, "lon {}", out.x);
        assert!((out.y - 35.59932165909691).abs() < 1e-9, "lat {}", out.y);
    }

    #[test]
    fn test_north_at_null_island() {
        let transformer = OriginGeodesicTransformer::new(0.0, 0.0, 0.0).unwrap();
        let out = transformer.transform(coord! { x: 0.0, y: 5.0 }).unwrap();
        assert!(out.x.abs() < 1e-12);
        assert!((out.y - 0.000045218473852519004).abs() < 1e-12);
    }

    #[test]
    fn test_origin_maps_to_itself() {
        let out = tokyo(45.0).transform(coord! { x: 0.0, y: 0.0 }).unwrap();
        assert!((out.x - TOKYO_LON).abs() < 1e-12);
        assert!((out.y - TOKYO_LAT).abs() < 1e-12);
    }

    #[test]
    fn test_east_axis_follows_rotation() {
        // rotated 90 degrees clockwise, local east points south
        let out = tokyo(90.0).transform(coord! { x: 1000.0, y: 0.0 }).unwrap();
        assert!(out.y < TOKYO_LAT);
        assert!((out.x - TOKYO_LON).abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip_all_angles() {
        let inputs = [
            coord! { x: 10000.0, y: 10000.0 },
            coord! { x: -2500.0, y: 730.0 },
            coord! { x: 0.0, y: -4999.0 },
            coord! { x: 1.0, y: 0.0 },
        ];
        let mut angle = 0.0;
        while angle < 360.0 {
            let transformer = tokyo(angle);
            for p in inputs {
                let back = transformer
                    .transform_inverse(transformer.transform(p).unwrap())
                    .unwrap();
                assert!(
                    (back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6,
                    "angle {}: {:?} -> {:?}",
                    angle,
                    p,
                    back
                );
            }
            angle += 7.5;
        }
    }

    #[test]
    fn test_roundtrip_near_full_turn() {
        for angle in [359.999_999, 360.0, -0.000_001] {
            let transformer = tokyo(angle);
            let p = coord! { x: 0.0, y: 100.0 };
            let back = transformer
                .transform_inverse(transformer.transform(p).unwrap())
                .unwrap();
            assert!((back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rejects_non_finite() {
        let transformer = tokyo(0.0);
        assert!(matches!(
            transformer.transform(coord! { x: f64::NAN, y: 0.0 }),
            Err(SpatialIdError::InvalidInput(_))
        ));
        assert!(matches!(
            transformer.transform_inverse(coord! { x: 0.0, y: f64::INFINITY }),
            Err(SpatialIdError::InvalidInput(_))
        ));
        assert!(OriginGeodesicTransformer::new(TOKYO_LON, TOKYO_LAT, f64::NAN).is_err());
        assert!(OriginGeodesicTransformer::new(200.0, TOKYO_LAT, 0.0).is_err());
    }

    #[derive(Debug)]
    struct FlatSolver;

    impl GeodesicSolver for FlatSolver {
        fn direct(&self, origin: Coord, azimuth: f64, distance: f64) -> Coord {
            let a = azimuth.to_radians();
            coord! { x: origin.x + distance * a.sin(), y: origin.y + distance * a.cos() }
        }

        fn inverse(&self, origin: Coord, destination: Coord) -> (f64, f64) {
            let (dx, dy) = (destination.x - origin.x, destination.y - origin.y);
            (dx.hypot(dy), dx.atan2(dy).to_degrees())
        }
    }

    #[test]
    fn test_custom_solver() {
        let transformer =
            OriginGeodesicTransformer::with_solver(0.0, 0.0, 90.0, Arc::new(FlatSolver)).unwrap();
        let out = transformer.transform(coord! { x: 0.0, y: 2.0 }).unwrap();
        assert!((out.x - 2.0).abs() < 1e-12);
        assert!(out.y.abs() < 1e-12);

        let back = transformer.transform_inverse(out).unwrap();
        assert!((back.y - 2.0).abs() < 1e-12);
    }
}
