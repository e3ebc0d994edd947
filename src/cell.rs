//! Cells of a local namespace.
//!
//! A [`LocalSpatialId`] is a tile address bound to the [`Namespace`] it lives
//! in. Cells are immutable: every navigation method returns a new cell.
//!
//! ```rust
//! use local_spatial_id::Namespace;
//!
//! let namespace = Namespace::new(1024.0)?;
//! let cell = namespace.cell("/3/1/4/4")?;
//!
//! assert_eq!(cell.parent()?.zfxy_str(), "/2/0/2/2");
//! assert_eq!(cell.east(4).zfxy_str(), "/3/1/0/4");
//! assert!(cell.parent()?.contains(&cell)?);
//! # Ok::<(), local_spatial_id::SpatialIdError>(())
//! ```

use crate::error::{Result, SpatialIdError};
use crate::geojson::polygon_to_geojson;
use crate::global::GlobalSpatialId;
use crate::namespace::Namespace;
use crate::quantize::tile_to_meters;
use crate::validation::validate_zoom;
use geo::{Geometry, LineString, Polygon};
use local_spatial_id_types::MAX_ZOOM;
use local_spatial_id_types::bbox::{BoundingBox2D, BoundingBox3D};
use local_spatial_id_types::point::Point3d;
use local_spatial_id_types::zfxy::ZFXYTile;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Raw input a cell can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    /// A canonical `/{z}/{f}/{x}/{y}` string or a tile hash
    Str(String),
    Tile(ZFXYTile),
    /// A point in local tile space
    Point(Point3d),
    /// A volume in local tile space
    Volume(BoundingBox3D),
}

impl From<&str> for CellInput {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for CellInput {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<ZFXYTile> for CellInput {
    fn from(tile: ZFXYTile) -> Self {
        Self::Tile(tile)
    }
}

impl From<Point3d> for CellInput {
    fn from(point: Point3d) -> Self {
        Self::Point(point)
    }
}

impl From<BoundingBox3D> for CellInput {
    fn from(bbox: BoundingBox3D) -> Self {
        Self::Volume(bbox)
    }
}

/// What a cell can be tested against.
#[derive(Debug, Clone, Copy)]
pub enum SpatialTarget<'a> {
    Cell(&'a LocalSpatialId<'a>),
    /// A WGS84 geometry
    Geometry(&'a Geometry),
}

impl<'a> From<&'a LocalSpatialId<'a>> for SpatialTarget<'a> {
    fn from(cell: &'a LocalSpatialId<'a>) -> Self {
        Self::Cell(cell)
    }
}

impl<'a> From<&'a Geometry> for SpatialTarget<'a> {
    fn from(geometry: &'a Geometry) -> Self {
        Self::Geometry(geometry)
    }
}

/// Options for [`LocalSpatialId::to_containing_global_spatial_id`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainingOptions {
    /// Treat the cell as sitting at altitude 0
    pub ignore_f: bool,
    /// Never return a tile finer than this zoom
    pub max_zoom: Option<u32>,
}

/// One cell of a namespace.
#[derive(Clone)]
pub struct LocalSpatialId<'ns> {
    namespace: &'ns Namespace,
    tile: ZFXYTile,
    zfxy_str: String,
    tilehash: String,
}

impl<'ns> LocalSpatialId<'ns> {
    /// Build a cell from raw input.
    ///
    /// Strings are read as a canonical string first and as a tile hash
    /// second. Points and volumes are quantized, clamped to the namespace, at
    /// `zoom` or the namespace's default zoom.
    pub fn new(
        namespace: &'ns Namespace,
        input: impl Into<CellInput>,
        zoom: Option<u32>,
    ) -> Result<Self> {
        let tile = match input.into() {
            CellInput::Str(s) => ZFXYTile::parse_zfxy_str(&s)
                .or_else(|_| ZFXYTile::from_tilehash(&s))
                .map_err(|_| {
                    SpatialIdError::ParseFailure(format!(
                        "'{}' is neither a /z/f/x/y string nor a tile hash",
                        s
                    ))
                })?,
            CellInput::Tile(tile) => {
                if !tile.is_valid() {
                    return Err(SpatialIdError::OutOfBounds(format!(
                        "{} is not a valid tile",
                        tile
                    )));
                }
                tile
            }
            CellInput::Point(point) => namespace.quantize(point, zoom)?,
            CellInput::Volume(bbox) => namespace.quantize(bbox, zoom)?,
        };
        Ok(Self::from_tile(namespace, tile))
    }

    /// Bind an already valid tile to a namespace.
    pub(crate) fn from_tile(namespace: &'ns Namespace, tile: ZFXYTile) -> Self {
        Self {
            namespace,
            tile,
            zfxy_str: tile.to_string(),
            tilehash: tile.tilehash(),
        }
    }

    pub fn namespace(&self) -> &'ns Namespace {
        self.namespace
    }

    pub fn tile(&self) -> ZFXYTile {
        self.tile
    }

    pub fn z(&self) -> u32 {
        self.tile.z
    }

    pub fn f(&self) -> u64 {
        self.tile.f
    }

    pub fn x(&self) -> u64 {
        self.tile.x
    }

    pub fn y(&self) -> u64 {
        self.tile.y
    }

    /// Canonical `/{z}/{f}/{x}/{y}` string.
    pub fn zfxy_str(&self) -> &str {
        &self.zfxy_str
    }

    pub fn tilehash(&self) -> &str {
        &self.tilehash
    }

    /// The cell id, which is its tile hash.
    pub fn id(&self) -> &str {
        &self.tilehash
    }

    pub fn parent(&self) -> Result<Self> {
        Ok(self.with_tile(self.tile.parent()?))
    }

    pub fn parent_at_zoom(&self, zoom: u32) -> Result<Self> {
        Ok(self.with_tile(self.tile.parent_at_zoom(zoom)?))
    }

    pub fn children(&self) -> Result<Vec<Self>> {
        self.children_at_zoom(self.tile.z + 1)
    }

    /// All descendants at `zoom`, in tile hash order.
    pub fn children_at_zoom(&self, zoom: u32) -> Result<Vec<Self>> {
        Ok(self.iter_children_at_zoom(zoom)?.collect())
    }

    /// Lazily enumerate the descendants at `zoom`, in tile hash order.
    pub fn iter_children_at_zoom(
        &self,
        zoom: u32,
    ) -> Result<impl Iterator<Item = LocalSpatialId<'ns>> + use<'ns>> {
        let namespace = self.namespace;
        Ok(self
            .tile
            .descendants(zoom)?
            .map(move |tile| LocalSpatialId::from_tile(namespace, tile)))
    }

    /// Move by whole cells; every axis wraps around the namespace.
    pub fn move_by(&self, dx: i64, dy: i64, df: i64) -> Self {
        self.with_tile(self.tile.moved(df, dx, dy))
    }

    pub fn up(&self, by: i64) -> Self {
        self.move_by(0, 0, by)
    }

    pub fn down(&self, by: i64) -> Self {
        self.move_by(0, 0, by.wrapping_neg())
    }

    /// North is toward `y = 0`.
    pub fn north(&self, by: i64) -> Self {
        self.move_by(0, by.wrapping_neg(), 0)
    }

    pub fn south(&self, by: i64) -> Self {
        self.move_by(0, by, 0)
    }

    pub fn east(&self, by: i64) -> Self {
        self.move_by(by, 0, 0)
    }

    pub fn west(&self, by: i64) -> Self {
        self.move_by(by.wrapping_neg(), 0, 0)
    }

    /// Whether this cell contains another cell or a WGS84 geometry.
    ///
    /// A cell contains another cell of the same namespace when it is that
    /// cell or one of its ancestors.
    pub fn contains<'a>(&self, target: impl Into<SpatialTarget<'a>>) -> Result<bool> {
        match target.into() {
            SpatialTarget::Cell(other) => Ok(self.namespace.id() == other.namespace.id()
                && other.tilehash.starts_with(&self.tilehash)),
            SpatialTarget::Geometry(geometry) => self
                .namespace
                .polygon_ops()
                .contains(&self.to_polygon()?, geometry),
        }
    }

    /// Whether this cell's footprint intersects a WGS84 geometry.
    ///
    /// # Errors
    ///
    /// `UnsupportedGeometry` when the target is another cell.
    pub fn intersects<'a>(&self, target: impl Into<SpatialTarget<'a>>) -> Result<bool> {
        match target.into() {
            SpatialTarget::Cell(other) => Err(SpatialIdError::UnsupportedGeometry(format!(
                "cannot intersect {} with another cell {}",
                self, other
            ))),
            SpatialTarget::Geometry(geometry) => self
                .namespace
                .polygon_ops()
                .intersects(&self.to_polygon()?, geometry),
        }
    }

    /// This cell in local tile space: meters from the namespace's north-west
    /// floor corner, `y` growing south.
    pub fn local_bbox(&self) -> BoundingBox3D {
        let m = tile_to_meters(self.namespace.scale(), self.tile.z);
        let vm = tile_to_meters(self.namespace.scale_height(), self.tile.z);
        let (f, x, y) = (self.tile.f as f64, self.tile.x as f64, self.tile.y as f64);
        BoundingBox3D::new(x * m, y * m, f * vm, (x + 1.0) * m, (y + 1.0) * m, (f + 1.0) * vm)
    }

    /// Centre of the cell in local tile space.
    pub fn local_center(&self) -> Point3d {
        self.local_bbox().center()
    }

    /// The cell's footprint in WGS84, north-west corner first, then
    /// south-west, south-east, north-east, closed back at north-west.
    pub fn to_polygon(&self) -> Result<Polygon> {
        let transformer = self.namespace.transformer()?;
        let half = self.namespace.scale() / 2.0;
        let m = tile_to_meters(self.namespace.scale(), self.tile.z);

        let x0 = self.tile.x as f64 * m - half;
        let x1 = (self.tile.x + 1) as f64 * m - half;
        let y0 = half - self.tile.y as f64 * m;
        let y1 = half - (self.tile.y + 1) as f64 * m;

        let nw = transformer.transform(geo::coord! { x: x0, y: y0 })?;
        let sw = transformer.transform(geo::coord! { x: x0, y: y1 })?;
        let se = transformer.transform(geo::coord! { x: x1, y: y1 })?;
        let ne = transformer.transform(geo::coord! { x: x1, y: y0 })?;

        Ok(Polygon::new(LineString::from(vec![nw, sw, se, ne, nw]), vec![]))
    }

    /// The footprint as a GeoJSON polygon.
    pub fn to_geojson(&self) -> Result<geojson::Geometry> {
        Ok(polygon_to_geojson(&self.to_polygon()?))
    }

    /// 2D WGS84 bounding box of the footprint.
    pub fn to_wgs84_bbox_2d(&self) -> Result<BoundingBox2D> {
        self.namespace
            .polygon_ops()
            .bbox(&Geometry::Polygon(self.to_polygon()?))
    }

    /// 3D WGS84 bounding box: the footprint's bounds plus the cell's altitude
    /// range above the datum.
    pub fn to_wgs84_bbox(&self) -> Result<BoundingBox3D> {
        let footprint = self.to_wgs84_bbox_2d()?;
        let local = self.local_bbox();
        let base = self.namespace.origin_altitude();
        Ok(BoundingBox3D::from_2d(
            &footprint,
            base + local.min_z,
            base + local.max_z,
        ))
    }

    /// Every global tile at `target_zoom` whose footprint intersects this
    /// cell's footprint and whose altitude range overlaps the cell's.
    ///
    /// Tiles below sea level come first; each half of the vertical axis is
    /// walked depth-first in descendant order.
    pub fn to_global_spatial_ids(&self, target_zoom: u32) -> Result<Vec<GlobalSpatialId>> {
        validate_zoom(target_zoom)?;
        let polygon = self.to_polygon()?;
        let bbox = self.to_wgs84_bbox()?;

        let roots = match GlobalSpatialId::containing_bbox(&bbox, target_zoom) {
            Some(tile) => vec![tile],
            None => GlobalSpatialId::vertical_roots(&bbox),
        };

        let overlaps = |tile: &GlobalSpatialId| -> Result<bool> {
            if !(bbox.min_z <= tile.alt_max() && bbox.max_z >= tile.alt_min()) {
                return Ok(false);
            }
            self.namespace
                .polygon_ops()
                .intersects(&polygon, &Geometry::Polygon(tile.to_polygon()))
        };

        // descendants of a tile that misses the cell miss it too
        let mut stack: Vec<GlobalSpatialId> = roots.into_iter().rev().collect();
        let mut result = Vec::new();
        while let Some(tile) = stack.pop() {
            if !overlaps(&tile)? {
                continue;
            }
            if tile.z == target_zoom {
                result.push(tile);
            } else {
                let children: Vec<_> = tile.descendants(tile.z + 1)?.collect();
                stack.extend(children.into_iter().rev());
            }
        }

        log::debug!(
            "{}: {} global tiles at zoom {}",
            self,
            result.len(),
            target_zoom
        );
        Ok(result)
    }

    /// The smallest single global tile containing this cell.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` when the cell straddles sea level (unless `ignore_f`).
    pub fn to_containing_global_spatial_id(
        &self,
        options: ContainingOptions,
    ) -> Result<GlobalSpatialId> {
        let max_zoom = options.max_zoom.unwrap_or(MAX_ZOOM);
        validate_zoom(max_zoom)?;

        let mut bbox = self.to_wgs84_bbox()?;
        if options.ignore_f {
            bbox.min_z = 0.0;
            bbox.max_z = 0.0;
        }

        GlobalSpatialId::containing_bbox(&bbox, max_zoom).ok_or_else(|| {
            SpatialIdError::OutOfBounds(format!(
                "no single global tile contains {}: it straddles altitude 0",
                self
            ))
        })
    }

    fn with_tile(&self, tile: ZFXYTile) -> Self {
        Self::from_tile(self.namespace, tile)
    }
}

impl fmt::Display for LocalSpatialId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.zfxy_str)
    }
}

impl fmt::Debug for LocalSpatialId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSpatialId")
            .field("namespace", self.namespace.id())
            .field("zfxy", &self.zfxy_str)
            .field("tilehash", &self.tilehash)
            .finish()
    }
}

impl PartialEq for LocalSpatialId<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.tile == other.tile && self.namespace.id() == other.namespace.id()
    }
}

impl Eq for LocalSpatialId<'_> {}

impl Hash for LocalSpatialId<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.id().hash(state);
        self.tile.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GeoPolygonOps, PolygonOps};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn plain() -> Namespace {
        Namespace::builder()
            .id("plain")
            .scale(1024.0)
            .build()
            .unwrap()
    }

    fn tokyo() -> Namespace {
        Namespace::builder()
            .id("tokyo")
            .scale(10_000.0)
            .origin(35.68950097945576, 139.69172572944066)
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_string_inputs() {
        let ns = plain();
        let cell = ns.cell("/3/1/4/7").unwrap();
        assert_eq!(cell.tile(), ZFXYTile::new(3, 1, 4, 7).unwrap());
        assert_eq!(cell.id(), cell.tilehash());

        let by_hash = ns.cell(cell.tilehash().to_string()).unwrap();
        assert_eq!(by_hash, cell);

        assert!(matches!(
            ns.cell("/3/1/4/8"),
            Err(SpatialIdError::ParseFailure(_))
        ));
        assert!(matches!(ns.cell("hello"), Err(SpatialIdError::ParseFailure(_))));
    }

    #[test]
    fn test_tile_input_validated() {
        let ns = plain();
        let bad = ZFXYTile { z: 2, f: 0, x: 4, y: 0 };
        assert!(matches!(ns.cell(bad), Err(SpatialIdError::OutOfBounds(_))));
    }

    #[test]
    fn test_point_and_volume_inputs() {
        let ns = plain();
        let cell = ns.cell_at_zoom(Point3d::new(1.0, 2.0, 3.0), 10).unwrap();
        assert_eq!(cell.zfxy_str(), "/10/3/1/2");

        let deep = ns.cell(Point3d::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(deep.z(), Namespace::DEFAULT_ZOOM);

        // clamped to the namespace
        let outside = ns.cell_at_zoom(Point3d::new(-10.0, 5000.0, 0.0), 2).unwrap();
        assert_eq!(outside.zfxy_str(), "/2/0/0/3");

        let volume = BoundingBox3D::new(520.0, 520.0, 10.0, 630.0, 630.0, 100.0);
        assert_eq!(ns.cell(volume).unwrap().zfxy_str(), "/3/0/4/4");
    }

    #[test]
    fn test_navigation_returns_new_cells() {
        let ns = plain();
        let cell = ns.cell("/2/1/1/1").unwrap();
        let north = cell.north(1);
        assert_eq!(north.zfxy_str(), "/2/1/1/0");
        assert_eq!(cell.zfxy_str(), "/2/1/1/1");
        assert_eq!(cell.south(3).zfxy_str(), "/2/1/1/0");
        assert_eq!(cell.east(1).zfxy_str(), "/2/1/2/1");
        assert_eq!(cell.west(2).zfxy_str(), "/2/1/3/1");
        assert_eq!(cell.up(2).zfxy_str(), "/2/3/1/1");
        assert_eq!(cell.down(2).zfxy_str(), "/2/3/1/1");
        assert_eq!(cell.move_by(1, -1, 1).zfxy_str(), "/2/2/2/0");
        assert_eq!(cell.west(i64::MIN), cell.east(i64::MIN));
    }

    #[test]
    fn test_parent_and_children() {
        let ns = plain();
        let cell = ns.cell("/3/5/2/7").unwrap();
        assert_eq!(cell.parent().unwrap().zfxy_str(), "/2/2/1/3");
        assert_eq!(cell.parent_at_zoom(0).unwrap().zfxy_str(), "/0/0/0/0");
        assert!(matches!(
            cell.parent_at_zoom(4),
            Err(SpatialIdError::InvalidNavigation(_))
        ));

        let children = cell.children().unwrap();
        assert_eq!(children.len(), 8);
        assert!(children.iter().all(|c| c.parent().unwrap() == cell));

        let grandchildren = cell.children_at_zoom(5).unwrap();
        assert_eq!(grandchildren.len(), 64);
        let mut hashes: Vec<&str> = grandchildren.iter().map(|c| c.tilehash()).collect();
        let in_order = hashes.clone();
        hashes.sort();
        assert_eq!(hashes, in_order);
    }

    #[test]
    fn test_contains_cell() {
        let ns = plain();
        let parent = ns.cell("/2/1/1/1").unwrap();
        let child = parent.children_at_zoom(4).unwrap()[33].clone();
        assert!(parent.contains(&child).unwrap());
        assert!(parent.contains(&parent).unwrap());
        assert!(!child.contains(&parent).unwrap());
        assert!(!parent.contains(&ns.cell("/2/1/1/2").unwrap()).unwrap());

        let other = Namespace::builder().id("other").scale(1024.0).build().unwrap();
        let foreign = other.cell(child.zfxy_str()).unwrap();
        assert!(!parent.contains(&foreign).unwrap());
    }

    #[test]
    fn test_intersects_cell_unsupported() {
        let ns = plain();
        let a = ns.cell("/1/0/0/0").unwrap();
        let b = ns.cell("/1/0/1/0").unwrap();
        assert!(matches!(
            a.intersects(&b),
            Err(SpatialIdError::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn test_geometry_export_requires_origin() {
        let ns = plain();
        let cell = ns.cell("/1/0/0/0").unwrap();
        assert!(matches!(
            cell.to_polygon(),
            Err(SpatialIdError::ConversionNotPossible(_))
        ));
        assert!(matches!(
            cell.to_global_spatial_ids(20),
            Err(SpatialIdError::ConversionNotPossible(_))
        ));
        let point: Geometry = geo::Point::new(0.0, 0.0).into();
        assert!(matches!(
            cell.contains(&point),
            Err(SpatialIdError::ConversionNotPossible(_))
        ));
    }

    #[test]
    fn test_root_polygon_orientation() {
        let ns = tokyo();
        let poly = ns.cell("/0/0/0/0").unwrap().to_polygon().unwrap();
        let c: Vec<_> = poly.exterior().coords().copied().collect();
        assert_eq!(c.len(), 5);
        assert_eq!(c[0], c[4]);
        // NW, SW, SE, NE
        assert!(c[0].y > c[1].y && c[0].x < c[3].x);
        assert!(c[2].x > c[1].x && c[2].y < c[3].y);
    }

    #[test]
    fn test_local_bbox() {
        let ns = Namespace::builder().scale(1024.0).scale_height(64.0).build().unwrap();
        let cell = ns.cell("/2/3/1/2").unwrap();
        assert_eq!(
            cell.local_bbox(),
            BoundingBox3D::new(256.0, 512.0, 48.0, 512.0, 768.0, 64.0)
        );
        assert_eq!(cell.local_center(), Point3d::new(384.0, 640.0, 56.0));
    }

    #[test]
    fn test_contains_own_center() {
        let ns = tokyo();
        let cell = ns.cell("/4/0/9/6").unwrap();
        let center: Geometry = geo::Point::from(
            cell.to_wgs84_bbox_2d().unwrap().center(),
        )
        .into();
        assert!(cell.contains(&center).unwrap());
        assert!(cell.intersects(&center).unwrap());
        assert!(!cell.east(3).contains(&center).unwrap());
    }

    #[test]
    fn test_containing_global_id() {
        let ns = tokyo();
        let cell = ns.cell("/6/0/20/41").unwrap();
        let global = cell
            .to_containing_global_spatial_id(ContainingOptions::default())
            .unwrap();
        let bbox = cell.to_wgs84_bbox().unwrap();
        assert!(global.alt_min() <= bbox.min_z && global.alt_max() >= bbox.max_z);

        let capped = cell
            .to_containing_global_spatial_id(ContainingOptions {
                ignore_f: true,
                max_zoom: Some(5),
            })
            .unwrap();
        assert!(capped.z <= 5);
        assert_eq!(capped.f, 0);
    }

    #[test]
    fn test_equality_and_display() {
        let ns = plain();
        let a = ns.cell("/2/1/1/1").unwrap();
        let b = ns.cell(ZFXYTile::new(2, 1, 1, 1).unwrap()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "/2/1/1/1");
        assert!(format!("{:?}", a).contains("plain"));
    }

    /// Delegates to [`GeoPolygonOps`], counting bounding box requests.
    #[derive(Debug, Default)]
    struct CountingOps {
        bbox_calls: AtomicUsize,
    }

    impl PolygonOps for CountingOps {
        fn bbox(&self, geometry: &Geometry) -> Result<BoundingBox2D> {
            self.bbox_calls.fetch_add(1, Ordering::SeqCst);
            GeoPolygonOps.bbox(geometry)
        }

        fn contains(&self, polygon: &Polygon, geometry: &Geometry) -> Result<bool> {
            GeoPolygonOps.contains(polygon, geometry)
        }

        fn intersects(&self, polygon: &Polygon, geometry: &Geometry) -> Result<bool> {
            GeoPolygonOps.intersects(polygon, geometry)
        }
    }

    #[test]
    fn test_footprint_bbox_uses_polygon_ops() {
        let ops = Arc::new(CountingOps::default());
        let ns = Namespace::builder()
            .scale(10_000.0)
            .origin(35.68950097945576, 139.69172572944066)
            .polygon_ops(ops.clone())
            .build()
            .unwrap();
        let cell = ns.cell("/2/0/1/2").unwrap();

        let bbox = cell.to_wgs84_bbox_2d().unwrap();
        assert_eq!(ops.bbox_calls.load(Ordering::SeqCst), 1);

        let ring = cell.to_polygon().unwrap();
        for c in ring.exterior().coords() {
            assert!(c.x >= bbox.min_x() && c.x <= bbox.max_x());
            assert!(c.y >= bbox.min_y() && c.y <= bbox.max_y());
        }
        let min_x = ring.exterior().coords().map(|c| c.x).fold(f64::INFINITY, f64::min);
        assert_eq!(bbox.min_x(), min_x);

        let volume = cell.to_wgs84_bbox().unwrap();
        assert_eq!(ops.bbox_calls.load(Ordering::SeqCst), 2);
        assert_eq!(volume.min_z, 0.0);
        assert_eq!(volume.max_z, 2_500.0);
    }
}
