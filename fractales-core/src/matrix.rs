use crate::config::FractalConfig;
use crate::fractal::IterationRule;

/// Per-pixel divergence indices for one render.
///
/// `width × height` cells stored row-major. Only the region
/// `[0, width - 1) × [0, height - 1)` is sampled; the last column and row
/// are never visited and stay `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivergenceMatrix {
    width: u32,
    height: u32,
    data: Vec<u32>,
}

impl DivergenceMatrix {
    /// Wrap row-major cell data. Panics if `data` does not hold exactly
    /// `width × height` cells.
    pub fn from_vec(width: u32, height: u32, data: Vec<u32>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize,
            "matrix data does not match {width}×{height}"
        );
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of sampled columns (`width - 1`).
    pub fn sampled_width(&self) -> u32 {
        self.width.saturating_sub(1)
    }

    /// Number of sampled rows (`height - 1`).
    pub fn sampled_height(&self) -> u32 {
        self.height.saturating_sub(1)
    }

    /// Divergence index of pixel `(i, j)` (column, row).
    #[inline]
    pub fn get(&self, i: u32, j: u32) -> u32 {
        self.data[j as usize * self.width as usize + i as usize]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }
}

/// Compute the full divergence matrix for `config` on the calling thread.
///
/// See `fractales_render::render` for the tiled parallel equivalent.
pub fn compute_matrix(config: &FractalConfig) -> DivergenceMatrix {
    let width = config.image_width();
    let height = config.image_height();
    let max_iteration = config.max_iteration();
    let rule = IterationRule::for_config(config);

    let mut data = vec![0u32; width as usize * height as usize];
    for j in 0..height.saturating_sub(1) {
        let row = j as usize * width as usize;
        for i in 0..width.saturating_sub(1) {
            data[row + i as usize] = rule.divergence(config.pixel_to_complex(i, j), max_iteration);
        }
    }
    DivergenceMatrix::from_vec(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Complex;
    use crate::config::FractalOptions;
    use crate::fractal::compute_divergence;

    fn small_mandelbrot() -> FractalConfig {
        FractalConfig::mandelbrot(FractalOptions {
            discrete_step: Some(0.1),
            max_iteration: Some(100),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn matrix_has_config_dimensions() {
        let cfg = small_mandelbrot();
        let m = compute_matrix(&cfg);
        assert_eq!(m.width(), 31);
        assert_eq!(m.height(), 21);
        assert_eq!(m.as_slice().len(), 31 * 21);
    }

    #[test]
    fn cells_match_point_divergence() {
        let cfg = small_mandelbrot();
        let m = compute_matrix(&cfg);
        for (i, j) in [(0, 0), (5, 3), (20, 10), (29, 19)] {
            let p = cfg.pixel_to_complex(i, j);
            assert_eq!(m.get(i, j), compute_divergence(&cfg, p));
        }
    }

    #[test]
    fn origin_cell_is_sentinel() {
        // x = -2 + 20·0.1 = 0, y = 1 - 10·0.1 = 0
        let cfg = small_mandelbrot();
        let p = cfg.pixel_to_complex(20, 10);
        assert!(p.modulus() < 1e-12, "pixel (20, 10) should map to the origin, got {p}");
        assert_eq!(compute_matrix(&cfg).get(20, 10), 99);
    }

    #[test]
    fn last_row_and_column_are_not_sampled() {
        let cfg = small_mandelbrot();
        let m = compute_matrix(&cfg);
        for i in 0..m.width() {
            assert_eq!(m.get(i, m.height() - 1), 0);
        }
        for j in 0..m.height() {
            assert_eq!(m.get(m.width() - 1, j), 0);
        }
        assert_eq!(m.sampled_width(), 30);
        assert_eq!(m.sampled_height(), 20);
    }

    #[test]
    fn all_cells_bounded() {
        let cfg = small_mandelbrot();
        let m = compute_matrix(&cfg);
        assert!(m.as_slice().iter().all(|&d| d <= cfg.max_iteration() - 1));
    }

    #[test]
    fn explicit_dimensions_sample_from_corner() {
        let cfg = FractalConfig::julia(FractalOptions {
            complex_constant: Some(Complex::new(-0.4, 0.6)),
            image_width: Some(4),
            image_height: Some(3),
            discrete_step: Some(0.1),
            ..Default::default()
        })
        .unwrap();
        let m = compute_matrix(&cfg);
        assert_eq!((m.width(), m.height()), (4, 3));
        let p = cfg.pixel_to_complex(1, 1);
        assert!((p.re + 0.9).abs() < 1e-12 && (p.im - 0.9).abs() < 1e-12);
        assert_eq!(m.get(1, 1), compute_divergence(&cfg, p));
    }

    #[test]
    #[should_panic]
    fn from_vec_rejects_wrong_length() {
        DivergenceMatrix::from_vec(2, 2, vec![0; 3]);
    }
}
