//! Serializable namespace configuration.

use crate::error::{Result, SpatialIdError};
use crate::namespace::{Namespace, NamespaceId};
use crate::validation::{validate_geographic_point, validate_scale, validate_zoom};
use geo::Point;
use serde::{Deserialize, Serialize};

/// Where a namespace sits on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Origin {
    /// Latitude of the namespace's centre in degrees
    pub latitude: f64,
    /// Longitude of the namespace's centre in degrees
    pub longitude: f64,
    /// Altitude of the namespace's floor in meters
    #[serde(default)]
    pub altitude: f64,
    /// Rotation in degrees clockwise from north
    #[serde(default)]
    pub angle: f64,
}

impl Origin {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: 0.0,
            angle: 0.0,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_geographic_point(&Point::new(self.longitude, self.latitude))?;
        if !self.altitude.is_finite() {
            return Err(SpatialIdError::InvalidInput(format!(
                "Origin altitude must be finite, got: {}",
                self.altitude
            )));
        }
        if !self.angle.is_finite() {
            return Err(SpatialIdError::InvalidInput(format!(
                "Origin angle must be finite, got: {}",
                self.angle
            )));
        }
        Ok(())
    }
}

/// Namespace configuration, loadable from JSON or TOML.
///
/// ```rust
/// use local_spatial_id::NamespaceConfig;
///
/// let config = NamespaceConfig::from_json(r#"{
///     "name": "shinjuku",
///     "scale": 10000,
///     "origin": { "latitude": 35.68950097945576, "longitude": 139.69172572944066 }
/// }"#)?;
/// let namespace = config.build()?;
/// assert_eq!(namespace.scale_height(), 10000.0);
/// assert_eq!(namespace.default_zoom(), 25);
/// # Ok::<(), local_spatial_id::SpatialIdError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    /// Namespace identity; a random UUID when absent
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Meters spanned horizontally by the root cell
    pub scale: f64,

    /// Meters spanned vertically by the root cell (defaults to `scale`)
    #[serde(default)]
    pub scale_height: Option<f64>,

    /// Without an origin the namespace cannot be georeferenced
    #[serde(default)]
    pub origin: Option<Origin>,

    /// Zoom used when quantizing points and volumes
    #[serde(default = "NamespaceConfig::default_zoom")]
    pub default_zoom: u32,
}

impl NamespaceConfig {
    const fn default_zoom() -> u32 {
        25
    }

    pub fn new(scale: f64) -> Self {
        Self {
            id: None,
            name: None,
            description: None,
            scale,
            scale_height: None,
            origin: None,
            default_zoom: Self::default_zoom(),
        }
    }

    pub fn with_scale_height(mut self, scale_height: f64) -> Self {
        self.scale_height = Some(scale_height);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default_zoom(mut self, zoom: u32) -> Self {
        self.default_zoom = zoom;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_scale("scale", self.scale)?;
        if let Some(scale_height) = self.scale_height {
            validate_scale("scale_height", scale_height)?;
        }
        if let Some(origin) = &self.origin {
            origin.validate()?;
        }
        if let Some(id) = &self.id {
            NamespaceId::parse(id.as_str())?;
        }
        validate_zoom(self.default_zoom)
    }

    /// Build the namespace this configuration describes.
    pub fn build(&self) -> Result<Namespace> {
        Namespace::from_config(self)
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NamespaceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: NamespaceConfig = toml::from_str(toml_str)
            .map_err(|e| SpatialIdError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SpatialIdError::Serialization(e.to_string()))
    }
}
