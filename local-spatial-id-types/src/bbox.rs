use crate::point::Point3d;
use geo::{Coord, Point, Rect};
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box.
///
/// This is a wrapper around `geo::Rect`; corners passed in any order are
/// normalized so that `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BoundingBox2D {
    /// Create a new bounding box from minimum and maximum coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use local_spatial_id_types::bbox::BoundingBox2D;
    ///
    /// let bbox = BoundingBox2D::new(139.63, 35.64, 139.74, 35.73);
    /// assert_eq!(bbox.min_x(), 139.63);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_x, y: min_y },
                geo::coord! { x: max_x, y: max_y },
            ),
        }
    }

    /// Create a bounding box from a `geo::Rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x() + self.max_x()) / 2.0,
            (self.min_y() + self.max_y()) / 2.0,
        )
    }

    /// The four corners: `(min_x, min_y)`, `(max_x, min_y)`, `(max_x, max_y)`,
    /// `(min_x, max_y)`.
    pub fn corners(&self) -> [Coord; 4] {
        [
            geo::coord! { x: self.min_x(), y: self.min_y() },
            geo::coord! { x: self.max_x(), y: self.min_y() },
            geo::coord! { x: self.max_x(), y: self.max_y() },
            geo::coord! { x: self.min_x(), y: self.max_y() },
        ]
    }
}

/// A 3D axis-aligned bounding box.
///
/// In local tile space `x`/`y` are meters from the namespace's north-west
/// corner and `z` is meters above the origin altitude. In WGS84 `x`/`y` are
/// longitude/latitude and `z` is altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

impl BoundingBox3D {
    /// Create a new 3D bounding box. Bounds are normalized per axis; a NaN
    /// bound is kept as given so [`BoundingBox3D::is_finite`] still sees it.
    ///
    /// # Examples
    ///
    /// ```
    /// use local_spatial_id_types::bbox::BoundingBox3D;
    ///
    /// let bbox = BoundingBox3D::new(10.0, 20.0, 0.0, 5.0, 25.0, 40.0);
    /// assert_eq!(bbox.min_x, 5.0);
    /// assert_eq!(bbox.max_x, 10.0);
    /// ```
    pub fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        let (min_x, max_x) = ordered(min_x, max_x);
        let (min_y, max_y) = ordered(min_y, max_y);
        let (min_z, max_z) = ordered(min_z, max_z);
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// A degenerate box around a single point.
    pub fn from_point(point: &Point3d) -> Self {
        Self {
            min_x: point.x(),
            min_y: point.y(),
            min_z: point.z(),
            max_x: point.x(),
            max_y: point.y(),
            max_z: point.z(),
        }
    }

    /// Extrude a 2D box over a vertical range.
    pub fn from_2d(bbox: &BoundingBox2D, min_z: f64, max_z: f64) -> Self {
        Self::new(
            bbox.min_x(),
            bbox.min_y(),
            min_z,
            bbox.max_x(),
            bbox.max_y(),
            max_z,
        )
    }

    pub fn min_corner(&self) -> Point3d {
        Point3d::new(self.min_x, self.min_y, self.min_z)
    }

    pub fn max_corner(&self) -> Point3d {
        Point3d::new(self.max_x, self.max_y, self.max_z)
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> Point3d {
        Point3d::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Whether every bound is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Swaps a reversed pair. NaN compares false and leaves the pair untouched.
fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a { (b, a) } else { (a, b) }
}

impl From<Point3d> for BoundingBox3D {
    fn from(point: Point3d) -> Self {
        Self::from_point(&point)
    }
}
