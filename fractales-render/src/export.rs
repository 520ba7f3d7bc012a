//! PNG export with the fractal record embedded as text chunks.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use fractales_core::{text, FractalConfig};

use crate::buffer::PixelBuffer;
use crate::error::RenderError;

/// Keyword of the iTXt chunk holding the full text record.
pub const RECORD_KEYWORD: &str = "Fractales.Record";

/// Write `buffer` to `path` as an 8-bit RGB PNG.
///
/// Besides `Software` and a one-line `Description`, the PNG carries the
/// complete [`text::encode`] record under [`RECORD_KEYWORD`], so an image
/// can be turned back into the configuration that produced it.
pub fn export_png(buffer: &PixelBuffer, path: &Path, config: &FractalConfig) -> crate::Result<()> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: buffer.width,
            height: buffer.height,
        });
    }

    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "Fractales".to_string())?;
    encoder.add_text_chunk("Description".to_string(), build_description(config))?;
    // The file name is free text, so the record goes into a UTF-8 chunk.
    encoder.add_itxt_chunk(RECORD_KEYWORD.to_string(), text::encode(config))?;

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;

    debug!(
        width = buffer.width,
        height = buffer.height,
        path = %path.display(),
        "Exported PNG"
    );
    Ok(())
}

fn build_description(config: &FractalConfig) -> String {
    let mut desc = format!(
        "{} - x: [{}, {}], y: [{}, {}], step: {}, iterations: {}",
        config.fractal_type(),
        config.x_min(),
        config.x_max(),
        config.y_min(),
        config.y_max(),
        config.discrete_step(),
        config.max_iteration(),
    );
    if let Some(j) = config.julia_params() {
        desc.push_str(&format!(", c: {}", j.constant));
    }
    desc
}
