use std::fmt;

/// Error types for map generation
#[derive(Debug)]
pub enum Error {
    /// Requested grid size is below the supported minimum
    SizeTooSmall { size: usize, min: usize },
    /// Generator kind name not in the registry
    UnknownKind(String),
    /// Configuration value out of its documented range
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SizeTooSmall { size, min } => {
                write!(f, "Grid size {} is below the minimum of {}", size, min)
            }
            Error::UnknownKind(name) => write!(f, "Unknown generator kind: {}", name),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, Error>;
