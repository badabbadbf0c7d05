//! Error types for the pixel-art pipeline.

use thiserror::Error;

/// A caller-supplied parameter was out of range or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("pixel size must be at least 1, got {0}")]
    PixelSize(u32),

    #[error("clustering runs must be at least 1")]
    Runs,

    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    #[error("palette must hold exactly 4 colors, got {0}")]
    PaletteLength(usize),

    #[error("duplicate palette color at index {index}")]
    DuplicateColor { index: usize },

    #[error("invalid hex color: {0}")]
    InvalidHex(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    /// Channel count outside {1, 3, 4}, or a raw buffer whose length
    /// disagrees with its declared shape.
    #[error("unsupported image shape: {channels} channel(s)")]
    InvalidShape { channels: usize },

    #[error("image must not be empty, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("clustering failed: {0}")]
    Clustering(String),

    #[error("image too large: {pixels} pixels (max {max})")]
    ImageTooLarge { pixels: u64, max: u64 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = TransformError> = std::result::Result<T, E>;
