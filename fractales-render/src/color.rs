//! Divergence index to RGB.
//!
//! The index is turned into a hue `frac(index · alpha / max_iteration)`;
//! `beta` and `gamma` are the saturation and brightness. The "never escaped"
//! index `max_iteration - 1` is always painted black.

use rayon::prelude::*;
use tracing::debug;

use fractales_core::{ColorFunction, DivergenceMatrix, FractalConfig};

use crate::buffer::PixelBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Packed `0xRRGGBB`.
    pub fn to_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Color for one divergence index.
pub fn color_for(divergence_index: u32, max_iteration: u32, color: &ColorFunction) -> Rgb {
    if divergence_index >= max_iteration.saturating_sub(1) {
        return Rgb::BLACK;
    }
    let hue = divergence_index as f32 * color.alpha as f32 / max_iteration as f32;
    hsb_to_rgb(hue, color.beta as f32, color.gamma as f32)
}

/// HSB to RGB. Only the fractional part of `hue` is used; saturation and
/// brightness are clamped to `[0, 1]`.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> Rgb {
    let s = saturation.clamp(0.0, 1.0);
    let v = brightness.clamp(0.0, 1.0);
    if s == 0.0 {
        let c = to_channel(v);
        return Rgb::new(c, c, c);
    }

    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match h as u32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

#[inline]
fn to_channel(x: f32) -> u8 {
    (x * 255.0 + 0.5) as u8
}

/// Paint `matrix` with `config`'s color coefficients.
///
/// Only the sampled region is colored; the last row and column stay black.
pub fn colorize(matrix: &DivergenceMatrix, config: &FractalConfig) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(matrix.width(), matrix.height());
    let max_iteration = config.max_iteration();
    let color = config.color();
    let sampled_width = matrix.sampled_width() as usize;
    let sampled_height = matrix.sampled_height() as usize;
    let stride = matrix.width() as usize;

    if stride == 0 {
        return buffer;
    }

    buffer
        .pixels
        .par_chunks_mut(stride * 3)
        .zip(matrix.as_slice().par_chunks(stride))
        .take(sampled_height)
        .for_each(|(row_px, row_cells)| {
            for (px, &d) in row_px
                .chunks_exact_mut(3)
                .zip(row_cells)
                .take(sampled_width)
            {
                px.copy_from_slice(&color_for(d, max_iteration, &color).to_bytes());
            }
        });

    debug!(
        width = matrix.width(),
        height = matrix.height(),
        alpha = color.alpha,
        "Colorized divergence matrix"
    );
    buffer
}
