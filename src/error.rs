use thiserror::Error;

/// Errors raised while turning an input string into a raster image
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// Input contained no encodable characters after sanitization
    #[error("String cannot be empty")]
    EmptyCode,

    /// A width or height segment was present but not a positive integer
    #[error("Invalid {axis}: {value}")]
    InvalidDimension { axis: &'static str, value: String },

    /// Font asset could not be read or parsed
    #[error("Failed to load font {path}: {message}")]
    FontLoad { path: String, message: String },

    /// Raster canvas could not be allocated
    #[error("Failed to allocate {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    /// PNG serialization failed
    #[error("Failed to encode image: {message}")]
    Encode { message: String },

    /// Encoded image could not be written to disk
    #[error("Failed to write image to {path}: {message}")]
    Write { path: String, message: String },
}

/// Errors from the filesystem-backed cache store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// No entry exists for the fingerprint
    #[error("Cache entry not found: {0}")]
    NotFound(String),

    /// Reading, writing or stat-ing a cache file failed
    #[error("Cache I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl CacheError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            CacheError::NotFound(path.display().to_string())
        } else {
            CacheError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Any failure on the generate-and-serve path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BarcodeError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The request path could not be split into barcode segments
    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    /// The blocking render task panicked or was cancelled
    #[error("Render task failed: {message}")]
    Task { message: String },
}

impl BarcodeError {
    /// Whether the failure was caused by the request itself (HTTP 400)
    /// rather than by the server's infrastructure (HTTP 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BarcodeError::Render(RenderError::EmptyCode)
                | BarcodeError::Render(RenderError::InvalidDimension { .. })
                | BarcodeError::InvalidPath { .. }
        )
    }
}
