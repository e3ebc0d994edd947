//! Error types for local spatial ID operations.

use local_spatial_id_types::error::ZfxyError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialIdError {
    /// The namespace has no origin, so nothing can be georeferenced.
    #[error("Conversion not possible: {0}")]
    ConversionNotPossible(String),
    /// Neither a canonical tile string nor a tile hash.
    #[error("Parse failure: {0}")]
    ParseFailure(String),
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),
    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),
    #[error("Invalid navigation: {0}")]
    InvalidNavigation(String),
    /// Bad configuration, non-finite coordinates, empty geometry.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, SpatialIdError>;

impl From<ZfxyError> for SpatialIdError {
    fn from(err: ZfxyError) -> Self {
        match err {
            ZfxyError::Parse(msg) => Self::ParseFailure(msg),
            ZfxyError::OutOfBounds(msg) => Self::OutOfBounds(msg),
            ZfxyError::InvalidNavigation(msg) => Self::InvalidNavigation(msg),
        }
    }
}

impl From<serde_json::Error> for SpatialIdError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<geojson::Error> for SpatialIdError {
    fn from(err: geojson::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
