use crate::color::Rgb;

/// An RGB8 image, row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize * self.width as usize + x as usize) * 3
    }

    pub fn get(&self, x: u32, y: u32) -> Rgb {
        let o = self.offset(x, y);
        Rgb::new(self.pixels[o], self.pixels[o + 1], self.pixels[o + 2])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        let o = self.offset(x, y);
        self.pixels[o..o + 3].copy_from_slice(&color.to_bytes());
    }
}
