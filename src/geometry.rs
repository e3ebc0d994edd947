//! Polygon predicates used by cells and namespaces.
//!
//! [`PolygonOps`] keeps the bounding box and the polygon/geometry predicates
//! behind one trait so cells never depend on a particular geometry engine.
//! [`GeoPolygonOps`] is the default, built on the `geo` crate.

use crate::error::{Result, SpatialIdError};
use geo::{BoundingRect, Contains, Geometry, Intersects, Polygon};
use local_spatial_id_types::bbox::BoundingBox2D;
use std::fmt;

pub trait PolygonOps: Send + Sync + fmt::Debug {
    /// 2D bounding box of a geometry.
    fn bbox(&self, geometry: &Geometry) -> Result<BoundingBox2D>;

    /// Whether `polygon` contains `geometry`.
    fn contains(&self, polygon: &Polygon, geometry: &Geometry) -> Result<bool>;

    /// Whether `polygon` and `geometry` share at least one point.
    fn intersects(&self, polygon: &Polygon, geometry: &Geometry) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeoPolygonOps;

impl PolygonOps for GeoPolygonOps {
    fn bbox(&self, geometry: &Geometry) -> Result<BoundingBox2D> {
        reject_collection(geometry)?;
        geometry
            .bounding_rect()
            .map(BoundingBox2D::from_rect)
            .ok_or_else(|| SpatialIdError::InvalidInput("Geometry is empty".into()))
    }

    fn contains(&self, polygon: &Polygon, geometry: &Geometry) -> Result<bool> {
        Ok(match geometry {
            Geometry::Point(g) => polygon.contains(g),
            Geometry::Line(g) => polygon.contains(g),
            Geometry::LineString(g) => polygon.contains(g),
            Geometry::Polygon(g) => polygon.contains(g),
            Geometry::MultiPoint(g) => polygon.contains(g),
            Geometry::MultiLineString(g) => polygon.contains(g),
            Geometry::MultiPolygon(g) => polygon.contains(g),
            Geometry::Rect(g) => polygon.contains(g),
            Geometry::Triangle(g) => polygon.contains(g),
            Geometry::GeometryCollection(_) => return Err(collection_error()),
        })
    }

    fn intersects(&self, polygon: &Polygon, geometry: &Geometry) -> Result<bool> {
        Ok(match geometry {
            Geometry::Point(g) => polygon.intersects(g),
            Geometry::Line(g) => polygon.intersects(g),
            Geometry::LineString(g) => polygon.intersects(g),
            Geometry::Polygon(g) => polygon.intersects(g),
            Geometry::MultiPoint(g) => polygon.intersects(g),
            Geometry::MultiLineString(g) => polygon.intersects(g),
            Geometry::MultiPolygon(g) => polygon.intersects(g),
            Geometry::Rect(g) => polygon.intersects(g),
            Geometry::Triangle(g) => polygon.intersects(g),
            Geometry::GeometryCollection(_) => return Err(collection_error()),
        })
    }
}

fn reject_collection(geometry: &Geometry) -> Result<()> {
    match geometry {
        Geometry::GeometryCollection(_) => Err(collection_error()),
        _ => Ok(()),
    }
}

fn collection_error() -> SpatialIdError {
    SpatialIdError::UnsupportedGeometry("geometry collections are not supported".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{GeometryCollection, Point, line_string, polygon};

    fn square() -> Polygon {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ]
    }

    #[test]
    fn test_bbox() {
        let line: Geometry = line_string![(x: 1.0, y: 5.0), (x: -2.0, y: 3.0)].into();
        let bbox = GeoPolygonOps.bbox(&line).unwrap();
        assert_eq!(bbox, BoundingBox2D::new(-2.0, 3.0, 1.0, 5.0));
    }

    #[test]
    fn test_contains() {
        let ops = GeoPolygonOps;
        assert!(ops.contains(&square(), &Point::new(5.0, 5.0).into()).unwrap());
        assert!(!ops.contains(&square(), &Point::new(15.0, 5.0).into()).unwrap());

        let inner: Geometry = polygon![
            (x: 2.0, y: 2.0),
            (x: 4.0, y: 2.0),
            (x: 4.0, y: 4.0),
            (x: 2.0, y: 2.0),
        ]
        .into();
        assert!(ops.contains(&square(), &inner).unwrap());

        let crossing: Geometry = line_string![(x: 5.0, y: 5.0), (x: 15.0, y: 5.0)].into();
        assert!(!ops.contains(&square(), &crossing).unwrap());
    }

    #[test]
    fn test_intersects() {
        let ops = GeoPolygonOps;
        let crossing: Geometry = line_string![(x: 5.0, y: 5.0), (x: 15.0, y: 5.0)].into();
        assert!(ops.intersects(&square(), &crossing).unwrap());

        let outside: Geometry = line_string![(x: 11.0, y: 11.0), (x: 15.0, y: 15.0)].into();
        assert!(!ops.intersects(&square(), &outside).unwrap());

        // shared edge counts as an intersection
        let neighbour: Geometry = geo::Rect::new(
            geo::coord! { x: 10.0, y: 0.0 },
            geo::coord! { x: 20.0, y: 10.0 },
        )
        .into();
        assert!(ops.intersects(&square(), &neighbour).unwrap());
    }

    #[test]
    fn test_collections_rejected() {
        let ops = GeoPolygonOps;
        let collection =
            Geometry::GeometryCollection(GeometryCollection(vec![Point::new(1.0, 1.0).into()]));
        assert!(matches!(
            ops.bbox(&collection),
            Err(SpatialIdError::UnsupportedGeometry(_))
        ));
        assert!(matches!(
            ops.contains(&square(), &collection),
            Err(SpatialIdError::UnsupportedGeometry(_))
        ));
        assert!(matches!(
            ops.intersects(&square(), &collection),
            Err(SpatialIdError::UnsupportedGeometry(_))
        ));
    }
}
