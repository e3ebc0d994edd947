//! Georeferenced local 3D spatial IDs.
//!
//! A [`Namespace`] is a local frame (a root cell `scale` meters wide and
//! `scale_height` meters tall, optionally anchored to a WGS84 origin and
//! rotated) subdivided into an octree of cells. Cells convert to WGS84
//! polygons and to tiles of the global ZFXY scheme.
//!
//! ```rust
//! use local_spatial_id::{Namespace, Point3d};
//!
//! let namespace = Namespace::builder()
//!     .scale(10_000.0)
//!     .scale_height(3_000.0)
//!     .origin(35.68950097945576, 139.69172572944066)
//!     .build()?;
//!
//! let cell = namespace.cell_at_zoom(Point3d::new(5_000.0, 5_000.0, 10.0), 6)?;
//! let polygon = cell.to_polygon()?;
//! assert_eq!(polygon.exterior().0.len(), 5);
//!
//! let global = cell.to_global_spatial_ids(16)?;
//! assert!(!global.is_empty());
//! # Ok::<(), local_spatial_id::SpatialIdError>(())
//! ```

pub mod builder;
pub mod cell;
pub mod config;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod georeference;
pub mod global;
pub mod namespace;
pub mod quantize;
pub mod validation;

pub use builder::NamespaceBuilder;
pub use cell::{CellInput, ContainingOptions, LocalSpatialId, SpatialTarget};
pub use config::{NamespaceConfig, Origin};
pub use error::{Result, SpatialIdError};
pub use geometry::{GeoPolygonOps, PolygonOps};
pub use georeference::{
    CoordinateTransformer, GeodesicSolver, OriginGeodesicTransformer, Wgs84Geodesic,
};
pub use global::GlobalSpatialId;
pub use namespace::{Namespace, NamespaceId};

pub use local_spatial_id_types::{
    BoundingBox2D, BoundingBox3D, MAX_ZOOM, Point3d, ZFXYTile, ZfxyError, tilehash,
};

pub use geo::{Geometry, Point, Polygon};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{NamespaceBuilder, Result, SpatialIdError};

    pub use crate::{ContainingOptions, LocalSpatialId, Namespace, NamespaceConfig, Origin};

    pub use crate::{GlobalSpatialId, Point3d, ZFXYTile};

    pub use geo::{Geometry, Point, Polygon};
}
