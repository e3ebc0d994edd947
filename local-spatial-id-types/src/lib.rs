//! # local-spatial-id-types
//!
//! Core tile and geometry types for local spatial IDs.
//!
//! - **Tile addresses**: [`ZFXYTile`], a `(z, f, x, y)` cell in a
//!   quadtree-octree subdivision, with parent/child navigation
//! - **Tile hashes**: the [`tilehash`] codec, a sortable, prefix-comparable
//!   string key for a tile
//! - **Bounding volumes**: `BoundingBox2D`, `BoundingBox3D`, `Point3d`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use local_spatial_id_types::zfxy::ZFXYTile;
//!
//! let tile: ZFXYTile = "/2/1/3/0".parse().unwrap();
//! assert_eq!(tile.tilehash(), "26");
//! assert_eq!(ZFXYTile::from_tilehash("26").unwrap(), tile);
//! ```

pub mod bbox;
pub mod error;
pub mod point;
pub mod tilehash;
pub mod zfxy;

pub use bbox::{BoundingBox2D, BoundingBox3D};
pub use error::ZfxyError;
pub use point::Point3d;
pub use zfxy::{Descendants, MAX_ZOOM, ZFXYTile};
