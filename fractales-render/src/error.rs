use thiserror::Error;

/// Errors originating from the rendering and export pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] fractales_core::CoreError),
}
