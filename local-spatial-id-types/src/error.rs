/// Error type for tile address construction, parsing and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZfxyError {
    /// A canonical string or tile hash could not be parsed
    Parse(String),
    /// An axis value does not fit the zoom level
    OutOfBounds(String),
    /// Navigation past the root or to an unreachable zoom
    InvalidNavigation(String),
}

impl std::fmt::Display for ZfxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Failed to parse tile: {}", msg),
            Self::OutOfBounds(msg) => write!(f, "Tile out of bounds: {}", msg),
            Self::InvalidNavigation(msg) => write!(f, "Invalid tile navigation: {}", msg),
        }
    }
}

impl std::error::Error for ZfxyError {}
