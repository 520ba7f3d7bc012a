pub mod buffer;
pub mod color;
pub mod error;
pub mod export;
pub mod renderer;
pub mod tile;

pub use buffer::PixelBuffer;
pub use color::{color_for, colorize, hsb_to_rgb, Rgb};
pub use error::RenderError;
pub use export::export_png;
pub use renderer::{render, RenderCancel, RenderResult};
pub use tile::TILE_SIZE;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
