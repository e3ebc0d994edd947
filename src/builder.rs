//! Namespace builder
//!
//! Chained setters for every namespace parameter, plus hooks for swapping the
//! georeferencer and the polygon primitives.

use crate::config::Origin;
use crate::error::{Result, SpatialIdError};
use crate::geometry::PolygonOps;
use crate::georeference::CoordinateTransformer;
use crate::namespace::{Namespace, NamespaceId};
use crate::validation::{validate_scale, validate_zoom};
use std::sync::Arc;

/// Builder for [`Namespace`].
///
/// ```rust
/// use local_spatial_id::NamespaceBuilder;
///
/// let namespace = NamespaceBuilder::new()
///     .id("tokyo-station")
///     .scale(10_000.0)
///     .scale_height(3_000.0)
///     .origin(35.68123, 139.76712)
///     .origin_angle(30.0)
///     .build()?;
/// assert!(namespace.is_georeferenced());
/// # Ok::<(), local_spatial_id::SpatialIdError>(())
/// ```
#[derive(Debug)]
pub struct NamespaceBuilder {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    scale: Option<f64>,
    scale_height: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    altitude: Option<f64>,
    angle: Option<f64>,
    default_zoom: u32,
    transformer: Option<Arc<dyn CoordinateTransformer>>,
    polygon_ops: Option<Arc<dyn PolygonOps>>,
}

impl NamespaceBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            name: None,
            description: None,
            scale: None,
            scale_height: None,
            latitude: None,
            longitude: None,
            altitude: None,
            angle: None,
            default_zoom: Namespace::DEFAULT_ZOOM,
            transformer: None,
            polygon_ops: None,
        }
    }

    /// Namespace identity. A random UUID is used when unset.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Meters spanned horizontally by the root cell. Required.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Meters spanned vertically by the root cell. Defaults to `scale`.
    pub fn scale_height(mut self, scale_height: f64) -> Self {
        self.scale_height = Some(scale_height);
        self
    }

    /// WGS84 position of the namespace's centre.
    pub fn origin(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Altitude of the namespace floor in meters. Requires [`Self::origin`].
    pub fn origin_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Rotation in degrees clockwise from north. Requires [`Self::origin`].
    pub fn origin_angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Set every origin parameter at once.
    pub fn origin_with(mut self, origin: Origin) -> Self {
        self.latitude = Some(origin.latitude);
        self.longitude = Some(origin.longitude);
        self.altitude = Some(origin.altitude);
        self.angle = Some(origin.angle);
        self
    }

    pub fn default_zoom(mut self, zoom: u32) -> Self {
        self.default_zoom = zoom;
        self
    }

    /// Replace the geodesic georeferencer built from the origin.
    pub fn transformer(mut self, transformer: Arc<dyn CoordinateTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Replace the default `geo`-backed polygon primitives.
    pub fn polygon_ops(mut self, polygon_ops: Arc<dyn PolygonOps>) -> Self {
        self.polygon_ops = Some(polygon_ops);
        self
    }

    /// Validate every parameter and build the namespace.
    pub fn build(self) -> Result<Namespace> {
        let scale = self
            .scale
            .ok_or_else(|| SpatialIdError::InvalidInput("Namespace scale is required".into()))?;
        validate_scale("scale", scale)?;

        let scale_height = self.scale_height.unwrap_or(scale);
        validate_scale("scale_height", scale_height)?;
        validate_zoom(self.default_zoom)?;

        let origin = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                let origin = Origin {
                    latitude,
                    longitude,
                    altitude: self.altitude.unwrap_or(0.0),
                    angle: self.angle.unwrap_or(0.0),
                };
                origin.validate()?;
                Some(origin)
            }
            (None, None) if self.altitude.is_none() && self.angle.is_none() => None,
            _ => {
                return Err(SpatialIdError::InvalidInput(
                    "Origin needs both latitude and longitude".into(),
                ));
            }
        };

        let id = match self.id {
            Some(id) => NamespaceId::parse(id)?,
            None => NamespaceId::generate(),
        };

        Namespace::from_parts(
            id,
            self.name,
            self.description,
            scale,
            scale_height,
            origin,
            self.default_zoom,
            self.transformer,
            self.polygon_ops,
        )
    }
}

impl Default for NamespaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
