//! Local coordinate frames.
//!
//! A [`Namespace`] fixes the size of its root cell, where it sits on the globe
//! and how it is rotated. It instantiates cells from raw input and from
//! arbitrary WGS84 geometries.

use crate::builder::NamespaceBuilder;
use crate::cell::{CellInput, LocalSpatialId, SpatialTarget};
use crate::config::{NamespaceConfig, Origin};
use crate::error::{Result, SpatialIdError};
use crate::geometry::{GeoPolygonOps, PolygonOps};
use crate::georeference::{CoordinateTransformer, OriginGeodesicTransformer};
use crate::quantize::{
    bbox_to_local_tile, calculate_local_zfxy, planar_to_local, point_to_local_tile,
};
use crate::validation::{validate_finite_point3d, validate_geometry, validate_zoom};
use geo::{Coord, Geometry, LineString};
use local_spatial_id_types::bbox::{BoundingBox2D, BoundingBox3D};
use local_spatial_id_types::point::Point3d;
use local_spatial_id_types::zfxy::ZFXYTile;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Validated namespace identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceId(String);

impl NamespaceId {
    /// Parses and validates a string as a namespace id.
    ///
    /// # Returns
    ///
    /// `Ok(NamespaceId)` if the id is valid, `Err(SpatialIdError)` otherwise.
    pub fn parse<S: Into<String>>(id: S) -> Result<Self> {
        let id = id.into();

        if id.is_empty() {
            return Err(SpatialIdError::InvalidInput(
                "Namespace id cannot be empty".into(),
            ));
        }

        if id.contains('\0') {
            return Err(SpatialIdError::InvalidInput(
                "Namespace id cannot contain null bytes".into(),
            ));
        }

        if id.len() > 255 {
            return Err(SpatialIdError::InvalidInput(
                "Namespace id cannot exceed 255 characters".into(),
            ));
        }

        Ok(Self(id))
    }

    /// A fresh random (v4 UUID) id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NamespaceId> for String {
    fn from(id: NamespaceId) -> Self {
        id.0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A local coordinate frame subdivided into cells.
///
/// # Examples
///
/// ```rust
/// use local_spatial_id::Namespace;
/// use local_spatial_id::Point3d;
///
/// let namespace = Namespace::builder()
///     .scale(1024.0)
///     .origin(35.68950097945576, 139.69172572944066)
///     .build()?;
///
/// // 600m east and 100m south of the north-west corner, 2m up
/// let cell = namespace.cell_at_zoom(Point3d::new(600.0, 100.0, 2.0), 3)?;
/// assert_eq!(cell.zfxy_str(), "/3/0/4/0");
/// # Ok::<(), local_spatial_id::SpatialIdError>(())
/// ```
#[derive(Clone)]
pub struct Namespace {
    id: NamespaceId,
    name: Option<String>,
    description: Option<String>,
    scale: f64,
    scale_height: f64,
    origin: Option<Origin>,
    default_zoom: u32,
    transformer: Option<Arc<dyn CoordinateTransformer>>,
    polygon_ops: Arc<dyn PolygonOps>,
}

impl Namespace {
    /// Zoom used when quantizing input without an explicit zoom.
    pub const DEFAULT_ZOOM: u32 = 25;

    /// A namespace without an origin and with `scale_height == scale`.
    pub fn new(scale: f64) -> Result<Self> {
        Self::builder().scale(scale).build()
    }

    pub fn builder() -> NamespaceBuilder {
        NamespaceBuilder::new()
    }

    /// Build a namespace from a configuration.
    pub fn from_config(config: &NamespaceConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .scale(config.scale)
            .default_zoom(config.default_zoom);
        if let Some(scale_height) = config.scale_height {
            builder = builder.scale_height(scale_height);
        }
        if let Some(origin) = config.origin {
            builder = builder.origin_with(origin);
        }
        if let Some(id) = &config.id {
            builder = builder.id(id.clone());
        }
        if let Some(name) = &config.name {
            builder = builder.name(name.clone());
        }
        if let Some(description) = &config.description {
            builder = builder.description(description.clone());
        }
        builder.build()
    }

    /// Configuration that rebuilds this namespace (custom transformers and
    /// polygon primitives are not part of it).
    pub fn to_config(&self) -> NamespaceConfig {
        NamespaceConfig {
            id: Some(self.id.to_string()),
            name: self.name.clone(),
            description: self.description.clone(),
            scale: self.scale,
            scale_height: Some(self.scale_height),
            origin: self.origin,
            default_zoom: self.default_zoom,
        }
    }

    /// Assemble a namespace from already validated parts.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: NamespaceId,
        name: Option<String>,
        description: Option<String>,
        scale: f64,
        scale_height: f64,
        origin: Option<Origin>,
        default_zoom: u32,
        transformer: Option<Arc<dyn CoordinateTransformer>>,
        polygon_ops: Option<Arc<dyn PolygonOps>>,
    ) -> Result<Self> {
        let transformer = match (transformer, origin) {
            (Some(custom), Some(o)) => {
                log::warn!(
                    "namespace {}: custom transformer replaces the geodesic one at ({}, {})",
                    id,
                    o.latitude,
                    o.longitude
                );
                Some(custom)
            }
            (Some(custom), None) => Some(custom),
            (None, Some(o)) => Some(Arc::new(OriginGeodesicTransformer::new(
                o.longitude,
                o.latitude,
                o.angle,
            )?) as Arc<dyn CoordinateTransformer>),
            (None, None) => None,
        };

        Ok(Self {
            id,
            name,
            description,
            scale,
            scale_height,
            origin,
            default_zoom,
            transformer,
            polygon_ops: polygon_ops.unwrap_or_else(|| Arc::new(GeoPolygonOps)),
        })
    }

    pub fn id(&self) -> &NamespaceId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Meters spanned horizontally by the root cell.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Meters spanned vertically by the root cell.
    pub fn scale_height(&self) -> f64 {
        self.scale_height
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// Altitude of the namespace floor; 0 without an origin.
    pub fn origin_altitude(&self) -> f64 {
        self.origin.map_or(0.0, |o| o.altitude)
    }

    pub fn default_zoom(&self) -> u32 {
        self.default_zoom
    }

    pub fn is_georeferenced(&self) -> bool {
        self.transformer.is_some()
    }

    /// The georeferencer, or `ConversionNotPossible` without one.
    pub fn transformer(&self) -> Result<&dyn CoordinateTransformer> {
        self.transformer.as_deref().ok_or_else(|| {
            SpatialIdError::ConversionNotPossible(format!(
                "namespace {} has no origin to georeference from",
                self.id
            ))
        })
    }

    pub fn polygon_ops(&self) -> &dyn PolygonOps {
        self.polygon_ops.as_ref()
    }

    /// A cell from a string, tile, point or volume at the default zoom.
    pub fn cell(&self, input: impl Into<CellInput>) -> Result<LocalSpatialId<'_>> {
        LocalSpatialId::new(self, input, None)
    }

    /// A cell from a string, tile, point or volume, quantizing points and
    /// volumes at `zoom`.
    pub fn cell_at_zoom(
        &self,
        input: impl Into<CellInput>,
        zoom: u32,
    ) -> Result<LocalSpatialId<'_>> {
        LocalSpatialId::new(self, input, Some(zoom))
    }

    /// Quantize a local point or volume, clamped to the namespace, at `zoom`
    /// or the default zoom.
    pub(crate) fn quantize<B: Into<BoundingBox3D>>(
        &self,
        input: B,
        zoom: Option<u32>,
    ) -> Result<ZFXYTile> {
        calculate_local_zfxy(
            self.scale,
            self.scale_height,
            input,
            zoom.unwrap_or(self.default_zoom),
            true,
        )
    }

    /// Local tile-space position (meters from the north-west floor corner) of
    /// a WGS84 point with altitude.
    pub fn wgs84_to_local(&self, point: &Point3d) -> Result<Point3d> {
        validate_finite_point3d(point)?;
        let planar = self.transformer()?.transform_inverse(point.point.into())?;
        let local = planar_to_local(self.scale, planar);
        Ok(Point3d::new(
            local.x,
            local.y,
            point.z() - self.origin_altitude(),
        ))
    }

    /// The cell containing a WGS84 point with altitude.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` when the point lies outside the namespace.
    pub fn cell_from_wgs84(&self, point: &Point3d, zoom: u32) -> Result<LocalSpatialId<'_>> {
        validate_zoom(zoom)?;
        let local = self.wgs84_to_local(point)?;
        let tile = point_to_local_tile(self.scale, self.scale_height, &local, zoom, false)?;
        Ok(LocalSpatialId::from_tile(self, tile))
    }

    /// The coarsest cell covering a WGS84 geometry's footprint on the
    /// namespace floor.
    ///
    /// The footprint is quantized at zero height, so the cell follows the
    /// horizontal extent alone and always sits in the bottom band (`f = 0`).
    pub fn bounding_cell_from_geometry(&self, geometry: &Geometry) -> Result<LocalSpatialId<'_>> {
        self.bounding_cell_local(geometry, 0.0, 0.0)
    }

    /// The coarsest cell covering a WGS84 geometry between two altitudes
    /// (meters, same datum as the origin altitude).
    pub fn bounding_cell_from_geometry_in_altitude_range(
        &self,
        geometry: &Geometry,
        alt_min: f64,
        alt_max: f64,
    ) -> Result<LocalSpatialId<'_>> {
        let (min, max) = self.local_altitude_range(alt_min, alt_max)?;
        self.bounding_cell_local(geometry, min, max)
    }

    /// Every cell at `zoom` below [`Namespace::bounding_cell_from_geometry`]
    /// whose footprint intersects a WGS84 geometry.
    ///
    /// The cells fill the vertical band of the bounding cell. Results come out
    /// in tile hash order.
    ///
    /// ```
    /// use local_spatial_id::Namespace;
    ///
    /// let ns = Namespace::builder()
    ///     .scale(10_000.0)
    ///     .origin(35.68950097945576, 139.69172572944066)
    ///     .build()?;
    /// let station: geo::Geometry = geo::Point::new(139.7005, 35.6909).into();
    /// let cells = ns.cells_from_geometry(6, &station)?;
    /// assert!(!cells.is_empty());
    /// assert!(cells.iter().all(|cell| cell.z() == 6));
    /// # Ok::<(), local_spatial_id::SpatialIdError>(())
    /// ```
    pub fn cells_from_geometry(
        &self,
        zoom: u32,
        geometry: &Geometry,
    ) -> Result<Vec<LocalSpatialId<'_>>> {
        validate_zoom(zoom)?;
        let bounding = self.bounding_cell_local(geometry, 0.0, 0.0)?;
        self.cells_below(bounding.tile(), zoom, geometry, None)
    }

    /// Every cell at `zoom` intersecting a WGS84 geometry and overlapping the
    /// altitude range.
    pub fn cells_from_geometry_in_altitude_range(
        &self,
        zoom: u32,
        geometry: &Geometry,
        alt_min: f64,
        alt_max: f64,
    ) -> Result<Vec<LocalSpatialId<'_>>> {
        validate_zoom(zoom)?;
        let (min, max) = self.local_altitude_range(alt_min, alt_max)?;
        let bounding = self.bounding_cell_local(geometry, min, max)?;
        self.cells_below(bounding.tile(), zoom, geometry, Some((min, max)))
    }

    /// [`Namespace::cells_from_geometry`] for many geometries at once, one
    /// geometry per rayon worker.
    #[cfg(feature = "parallel")]
    pub fn par_cells_from_geometries(
        &self,
        zoom: u32,
        geometries: &[Geometry],
    ) -> Result<Vec<Vec<LocalSpatialId<'_>>>> {
        use rayon::prelude::*;

        geometries
            .par_iter()
            .map(|geometry| self.cells_from_geometry(zoom, geometry))
            .collect()
    }

    fn local_altitude_range(&self, alt_min: f64, alt_max: f64) -> Result<(f64, f64)> {
        if !alt_min.is_finite() || !alt_max.is_finite() {
            return Err(SpatialIdError::InvalidInput(format!(
                "Altitude range must be finite, got: [{}, {}]",
                alt_min, alt_max
            )));
        }
        let base = self.origin_altitude();
        Ok((alt_min.min(alt_max) - base, alt_min.max(alt_max) - base))
    }

    /// Footprint of a WGS84 geometry in local tile space.
    fn local_footprint(&self, geometry: &Geometry) -> Result<BoundingBox2D> {
        let transformer = self.transformer()?;
        let bbox = self.polygon_ops.bbox(geometry)?;
        validate_geometry(geometry)?;

        let corners = bbox
            .corners()
            .into_iter()
            .map(|corner| {
                transformer
                    .transform_inverse(corner)
                    .map(|planar| planar_to_local(self.scale, planar))
            })
            .collect::<Result<Vec<Coord>>>()?;

        self.polygon_ops.bbox(&Geometry::LineString(LineString::from(corners)))
    }

    fn bounding_cell_local(
        &self,
        geometry: &Geometry,
        min_alt: f64,
        max_alt: f64,
    ) -> Result<LocalSpatialId<'_>> {
        let footprint = self.local_footprint(geometry)?;
        let volume = BoundingBox3D::from_2d(&footprint, min_alt, max_alt);
        let tile = bbox_to_local_tile(
            self.scale,
            self.scale_height,
            &volume,
            self.default_zoom,
            true,
        )?;
        log::debug!(
            "namespace {}: bounding cell {} for local volume {:?}",
            self.id,
            tile,
            volume
        );
        Ok(LocalSpatialId::from_tile(self, tile))
    }

    /// Walk down from `bounding` to `zoom`, skipping the subtree of every
    /// tile whose footprint misses the geometry or whose band misses the
    /// `vertical` range.
    fn cells_below(
        &self,
        bounding: ZFXYTile,
        zoom: u32,
        geometry: &Geometry,
        vertical: Option<(f64, f64)>,
    ) -> Result<Vec<LocalSpatialId<'_>>> {
        let root = if bounding.z > zoom {
            bounding.parent_at_zoom(zoom)?
        } else {
            bounding
        };

        // footprints are shared by every band of a column
        let mut footprints: HashMap<(u32, u64, u64), bool> = HashMap::new();
        let mut stack = vec![root];
        let mut cells = Vec::new();
        while let Some(tile) = stack.pop() {
            if vertical.is_some_and(|(min, max)| !self.overlaps_vertically(&tile, min, max)) {
                continue;
            }
            let key = (tile.z, tile.x, tile.y);
            let hit = match footprints.get(&key) {
                Some(hit) => *hit,
                None => {
                    let hit = LocalSpatialId::from_tile(self, tile)
                        .intersects(SpatialTarget::Geometry(geometry))?;
                    footprints.insert(key, hit);
                    hit
                }
            };
            if !hit {
                continue;
            }
            if tile.z == zoom {
                cells.push(LocalSpatialId::from_tile(self, tile));
            } else {
                stack.extend(tile.children()?.into_iter().rev());
            }
        }

        log::debug!(
            "namespace {}: {} cells at zoom {} below {}, {} footprints tested",
            self.id,
            cells.len(),
            zoom,
            root,
            footprints.len()
        );
        Ok(cells)
    }

    /// Whether a tile's band `[f * h, (f + 1) * h)` reaches into
    /// `[min_alt, max_alt]` (local meters).
    fn overlaps_vertically(&self, tile: &ZFXYTile, min_alt: f64, max_alt: f64) -> bool {
        let band = self.scale_height / 2f64.powi(tile.z as i32);
        let bottom = tile.f as f64 * band;
        let top = bottom + band;
        let last_band = tile.f + 1 == tile.side();
        bottom <= max_alt && (top > min_alt || (last_band && top >= min_alt))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("scale", &self.scale)
            .field("scale_height", &self.scale_height)
            .field("origin", &self.origin)
            .field("default_zoom", &self.default_zoom)
            .field("georeferenced", &self.is_georeferenced())
            .finish()
    }
}
