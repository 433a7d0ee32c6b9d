//! Error types for scene loading, configuration and rendering.

use thiserror::Error;

/// Errors that abort building a `Scene`. No partial scene is ever rendered.
#[derive(Error, Debug)]
pub enum SceneError {
    /// I/O error reading a scene file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token other than the one the grammar requires.
    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
    },

    /// The input ended in the middle of a construct.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A numeric literal that doesn't parse.
    #[error("invalid number '{token}'")]
    InvalidNumber { token: String },

    /// Malformed JSON scene description.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Geometry that can't be rendered (zero-length vectors, non-positive
    /// radii, non-invertible transforms).
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A color format other than `rgb` or `rgbf`.
    #[error("unsupported color format: {0}")]
    UnsupportedFormat(String),
}

/// Errors from the render dispatcher and image encoders.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The requested image has no pixels.
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: usize, height: usize },

    /// A worker thread panicked; the whole render is abandoned.
    #[error("render worker panicked")]
    WorkerPanicked,

    /// I/O error writing an image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Invalid configuration values.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A worker count that is not a positive integer.
    #[error("invalid worker count '{value}' (expected a positive integer)")]
    InvalidWorkerCount { value: String },
}
