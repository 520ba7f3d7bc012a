/// Tile edge in pixels. 64×64 × 4 bytes = 16 KB of divergence indices.
pub const TILE_SIZE: u32 = 64;

/// A rectangular block of pixels computed as one unit of parallel work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Pixel x of the top-left corner.
    pub x: u32,
    /// Pixel y of the top-left corner.
    pub y: u32,
    /// May be smaller than `TILE_SIZE` at the right edge.
    pub width: u32,
    /// May be smaller than `TILE_SIZE` at the bottom edge.
    pub height: u32,
}

impl Tile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixel coordinates covered by this tile, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height).flat_map(move |j| (self.x..self.x + self.width).map(move |i| (i, j)))
    }
}

/// Split a `width × height` region anchored at the origin into tiles.
pub fn build_tile_grid(width: u32, height: u32) -> Vec<Tile> {
    let step = TILE_SIZE as usize;
    (0..height)
        .step_by(step)
        .flat_map(|y| {
            (0..width).step_by(step).map(move |x| Tile {
                x,
                y,
                width: TILE_SIZE.min(width - x),
                height: TILE_SIZE.min(height - y),
            })
        })
        .collect()
}
