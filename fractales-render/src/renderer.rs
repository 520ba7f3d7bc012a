use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use fractales_core::{DivergenceMatrix, FractalConfig, IterationRule};

use crate::tile::{build_tile_grid, Tile};

/// Generation counter and tile progress for one or more renders.
///
/// Bumping the generation makes every in-flight render skip its remaining
/// tiles. Share it behind an `Arc` to cancel from another thread.
#[derive(Debug, Default)]
pub struct RenderCancel {
    generation: AtomicU64,
    progress_done: AtomicUsize,
    progress_total: AtomicUsize,
}

impl RenderCancel {
    /// Create a handle at generation 0 with no progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the current render by advancing the generation.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Read the current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a new progress count of `total` tiles.
    fn reset_progress(&self, total: usize) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    /// Record one finished tile.
    fn inc_progress(&self) {
        self.progress_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Tiles finished so far and tiles in the current render, as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}

/// Divergence data for a whole frame plus render statistics.
///
/// When `cancelled` is set, tiles that were skipped are left at `0`.
#[derive(Debug)]
pub struct RenderResult {
    pub matrix: DivergenceMatrix,
    pub elapsed: Duration,
    pub cancelled: bool,
    pub tiles_rendered: usize,
}

fn render_tile(config: &FractalConfig, rule: &IterationRule, tile: &Tile) -> Vec<u32> {
    let max_iteration = config.max_iteration();
    tile.pixels()
        .map(|(i, j)| rule.divergence(config.pixel_to_complex(i, j), max_iteration))
        .collect()
}

fn blit_tile(cells: &mut [u32], stride: usize, tile: &Tile, data: &[u32]) {
    debug_assert_eq!(data.len(), tile.pixel_count());
    let w = tile.width as usize;
    for (row, src) in data.chunks_exact(w).enumerate() {
        let dst = (tile.y as usize + row) * stride + tile.x as usize;
        cells[dst..dst + w].copy_from_slice(src);
    }
}

/// Compute the divergence matrix for `config` across the rayon pool.
///
/// The sampled region (all but the last row and column) is cut into
/// [`TILE_SIZE`](crate::TILE_SIZE) tiles rendered in parallel. Cell values
/// are identical to [`fractales_core::compute_matrix`].
pub fn render(config: &FractalConfig, cancel: &RenderCancel) -> RenderResult {
    let start = Instant::now();
    let gen = cancel.generation();
    let rule = IterationRule::for_config(config);
    let width = config.image_width();
    let height = config.image_height();

    let tiles = build_tile_grid(width.saturating_sub(1), height.saturating_sub(1));
    debug!(
        fractal = %config.fractal_type(),
        tile_count = tiles.len(),
        width,
        height,
        max_iteration = config.max_iteration(),
        "Starting tiled render"
    );
    cancel.reset_progress(tiles.len());

    let tile_data: Vec<Option<Vec<u32>>> = tiles
        .par_iter()
        .map(|tile| {
            if cancel.generation() != gen {
                return None;
            }
            let data = render_tile(config, &rule, tile);
            cancel.inc_progress();
            Some(data)
        })
        .collect();

    let cancelled = cancel.generation() != gen;
    let mut cells = vec![0u32; width as usize * height as usize];
    let mut tiles_rendered = 0;
    for (tile, data) in tiles.iter().zip(&tile_data) {
        if let Some(d) = data {
            blit_tile(&mut cells, width as usize, tile, d);
            tiles_rendered += 1;
        }
    }

    let elapsed = start.elapsed();
    info!(
        elapsed_ms = elapsed.as_millis(),
        tiles_rendered, cancelled, "Render complete"
    );

    RenderResult {
        matrix: DivergenceMatrix::from_vec(width, height, cells),
        elapsed,
        cancelled,
        tiles_rendered,
    }
}
