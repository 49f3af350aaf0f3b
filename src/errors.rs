use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for sprite extraction.
///
/// The detection core itself never fails on geometry: degenerate boxes are filtered out
/// rather than reported. Errors come from the I/O layer around it, and from the
/// dimension check performed when a crop is composited with its mask.
#[derive(Error, Debug)]
pub enum SpriteError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not encode image {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

pub type Result<T> = std::result::Result<T, SpriteError>;

/// Convert I/O errors to filesystem errors.
///
/// Code that knows the path and operation should build `SpriteError::FileSystem`
/// directly; this is the fallback.
impl From<std::io::Error> for SpriteError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("unknown"),
            operation: "unknown".to_string(),
            source: err,
        }
    }
}
