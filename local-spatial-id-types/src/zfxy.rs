//! Tile addresses in a quadtree-octree subdivision of the unit cube.
//!
//! A [`ZFXYTile`] names one cuboid cell at zoom `z`: `x` and `y` index the
//! horizontal axes, `f` indexes the vertical axis. Every zoom step doubles the
//! resolution on all three axes, so a tile has eight children.

use crate::error::ZfxyError;
use crate::tilehash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deepest supported zoom level.
pub const MAX_ZOOM: u32 = 28;

/// Deepest descendant enumeration whose tile count still fits in a `u64`.
pub const MAX_DESCENDANT_DEPTH: u32 = 21;

/// A tile address `(z, f, x, y)`.
///
/// Valid tiles satisfy `0 <= f, x, y < 2^z` and `z <= MAX_ZOOM`. Use
/// [`ZFXYTile::new`] to build a validated tile, or [`ZFXYTile::is_valid`] to
/// check one assembled by hand.
///
/// # Examples
///
/// ```
/// use local_spatial_id_types::zfxy::ZFXYTile;
///
/// let tile: ZFXYTile = "/3/1/4/7".parse().unwrap();
/// assert_eq!(tile.z, 3);
/// assert_eq!(tile.parent().unwrap().to_string(), "/2/0/2/3");
///
/// // moving off the eastern edge wraps back to column 0
/// assert_eq!(tile.moved(0, 4, 0).x, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZFXYTile {
    /// Zoom level
    pub z: u32,
    /// Vertical index
    pub f: u64,
    /// Horizontal x index
    pub x: u64,
    /// Horizontal y index
    pub y: u64,
}

impl ZFXYTile {
    /// Create a validated tile.
    ///
    /// # Errors
    ///
    /// Returns `ZfxyError::OutOfBounds` if the zoom exceeds [`MAX_ZOOM`] or an
    /// axis value is not below `2^z`.
    pub fn new(z: u32, f: u64, x: u64, y: u64) -> Result<Self, ZfxyError> {
        let tile = Self { z, f, x, y };
        if tile.is_valid() {
            Ok(tile)
        } else {
            Err(ZfxyError::OutOfBounds(format!(
                "{} is not a valid tile (zoom must be <= {} and every axis < 2^zoom)",
                tile, MAX_ZOOM
            )))
        }
    }

    /// The zoom 0 tile covering the whole space.
    pub const fn root() -> Self {
        Self {
            z: 0,
            f: 0,
            x: 0,
            y: 0,
        }
    }

    /// Number of tiles along one axis at this tile's zoom, or `None` past
    /// zoom 63 where the count no longer fits in a `u64`.
    #[inline]
    pub fn checked_side(&self) -> Option<u64> {
        1u64.checked_shl(self.z)
    }

    /// Number of tiles along one axis at this tile's zoom.
    ///
    /// Saturates at `u64::MAX` for hand-built tiles deeper than zoom 63.
    #[inline]
    pub fn side(&self) -> u64 {
        self.checked_side().unwrap_or(u64::MAX)
    }

    /// Check the structural invariants of this tile.
    pub fn is_valid(&self) -> bool {
        if self.z > MAX_ZOOM {
            return false;
        }
        let side = self.side();
        self.f < side && self.x < side && self.y < side
    }

    /// The direct parent.
    pub fn parent(&self) -> Result<Self, ZfxyError> {
        self.parent_by(1)
    }

    /// The ancestor `steps` levels up.
    ///
    /// # Errors
    ///
    /// Returns `ZfxyError::InvalidNavigation` if `steps` exceeds the zoom.
    pub fn parent_by(&self, steps: u32) -> Result<Self, ZfxyError> {
        if steps > self.z {
            return Err(ZfxyError::InvalidNavigation(format!(
                "cannot go {} levels up from {}",
                steps, self
            )));
        }
        let up = |value: u64| value.checked_shr(steps).unwrap_or(0);
        Ok(Self {
            z: self.z - steps,
            f: up(self.f),
            x: up(self.x),
            y: up(self.y),
        })
    }

    /// The ancestor at `zoom`. Returns the tile itself when `zoom == z`.
    pub fn parent_at_zoom(&self, zoom: u32) -> Result<Self, ZfxyError> {
        if zoom > self.z {
            return Err(ZfxyError::InvalidNavigation(format!(
                "zoom {} is finer than {}; use descendants instead",
                zoom, self
            )));
        }
        self.parent_by(self.z - zoom)
    }

    /// The eight children one zoom level down, in hash order.
    pub fn children(&self) -> Result<Vec<Self>, ZfxyError> {
        self.children_at_zoom(self.z + 1)
    }

    /// All descendants at `zoom`, materialized. See [`ZFXYTile::descendants`].
    pub fn children_at_zoom(&self, zoom: u32) -> Result<Vec<Self>, ZfxyError> {
        Ok(self.descendants(zoom)?.collect())
    }

    /// Lazily enumerate all `8^(zoom - z)` descendants at `zoom`.
    ///
    /// Descendants come out depth-first: the vertical bit selects the child
    /// first, then y, then x. This is the same order as sorting their tile
    /// hashes. A tile is its own single descendant at its own zoom.
    ///
    /// # Errors
    ///
    /// Returns `ZfxyError::InvalidNavigation` when `zoom` is coarser than the
    /// tile, deeper than [`MAX_ZOOM`], or more than
    /// [`MAX_DESCENDANT_DEPTH`] levels below the tile.
    pub fn descendants(&self, zoom: u32) -> Result<Descendants, ZfxyError> {
        if zoom < self.z {
            return Err(ZfxyError::InvalidNavigation(format!(
                "zoom {} is coarser than {}; use parent_at_zoom instead",
                zoom, self
            )));
        }
        if zoom > MAX_ZOOM {
            return Err(ZfxyError::InvalidNavigation(format!(
                "zoom {} exceeds the maximum zoom {}",
                zoom, MAX_ZOOM
            )));
        }
        let depth = zoom - self.z;
        if depth > MAX_DESCENDANT_DEPTH {
            return Err(ZfxyError::InvalidNavigation(format!(
                "{} levels below {} is too many descendants to enumerate",
                depth, self
            )));
        }
        Ok(Descendants {
            base: *self,
            depth,
            next: 0,
            total: 1u64 << (3 * depth),
        })
    }

    /// Move by signed deltas, wrapping every axis modulo `2^z`.
    ///
    /// Past zoom 63 every axis wraps modulo `2^64`.
    pub fn moved(&self, df: i64, dx: i64, dy: i64) -> Self {
        let side = self
            .checked_side()
            .map_or(1i128 << 64, i128::from);
        let wrap = |value: u64, delta: i64| -> u64 {
            (i128::from(value) + i128::from(delta)).rem_euclid(side) as u64
        };
        Self {
            z: self.z,
            f: wrap(self.f, df),
            x: wrap(self.x, dx),
            y: wrap(self.y, dy),
        }
    }

    /// Whether `other` is this tile or one of its descendants.
    pub fn is_ancestor_of(&self, other: &ZFXYTile) -> bool {
        other.z >= self.z
            && other
                .parent_by(other.z - self.z)
                .is_ok_and(|ancestor| ancestor == *self)
    }

    /// The bit-interleaved tile hash of this tile.
    pub fn tilehash(&self) -> String {
        tilehash::encode(self)
    }

    /// Parse a tile hash.
    pub fn from_tilehash(hash: &str) -> Result<Self, ZfxyError> {
        tilehash::decode(hash)
    }

    /// Parse the canonical `/{z}/{f}/{x}/{y}` form.
    ///
    /// The leading slash is optional, and the three-part `/{z}/{x}/{y}` form
    /// is read with `f = 0`.
    ///
    /// # Errors
    ///
    /// Returns `ZfxyError::Parse` for malformed input or values that don't
    /// fit the zoom.
    pub fn parse_zfxy_str(input: &str) -> Result<Self, ZfxyError> {
        let body = input.strip_prefix('/').unwrap_or(input);
        let parts: Vec<&str> = body.split('/').collect();

        let numbers = parts
            .iter()
            .map(|part| parse_component(part, input))
            .collect::<Result<Vec<u64>, _>>()?;

        let (z, f, x, y) = match numbers.as_slice() {
            [z, f, x, y] => (*z, *f, *x, *y),
            [z, x, y] => (*z, 0, *x, *y),
            _ => {
                return Err(ZfxyError::Parse(format!(
                    "expected /{{z}}/{{f}}/{{x}}/{{y}}, got '{}'",
                    input
                )));
            }
        };

        let z = u32::try_from(z)
            .map_err(|_| ZfxyError::Parse(format!("zoom out of range in '{}'", input)))?;

        Self::new(z, f, x, y).map_err(|e| ZfxyError::Parse(format!("'{}': {}", input, e)))
    }
}

fn parse_component(part: &str, input: &str) -> Result<u64, ZfxyError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ZfxyError::Parse(format!(
            "'{}' is not a non-negative integer in '{}'",
            part, input
        )));
    }
    part.parse::<u64>()
        .map_err(|e| ZfxyError::Parse(format!("'{}' in '{}': {}", part, input, e)))
}

impl Default for ZFXYTile {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for ZFXYTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}/{}/{}", self.z, self.f, self.x, self.y)
    }
}

impl FromStr for ZFXYTile {
    type Err = ZfxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_zfxy_str(s)
    }
}

/// Lazy iterator over the descendants of a tile at a fixed zoom.
#[derive(Debug, Clone)]
pub struct Descendants {
    base: ZFXYTile,
    depth: u32,
    next: u64,
    total: u64,
}

impl Iterator for Descendants {
    type Item = ZFXYTile;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let (df, dx, dy) = tilehash::deinterleave(self.next, self.depth);
        self.next += 1;
        Some(ZFXYTile {
            z: self.base.z + self.depth,
            f: (self.base.f << self.depth) | df,
            x: (self.base.x << self.depth) | dx,
            y: (self.base.y << self.depth) | dy,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.total - self.next) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}
