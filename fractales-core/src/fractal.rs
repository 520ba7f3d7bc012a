use crate::complex::Complex;
use crate::config::{FractalConfig, FractalKind, IterationFunction};

/// Bailout radius shared by both families: once `|z| > 2` the orbit escapes.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// The per-variant recurrence, resolved once per render so the hot loop
/// dispatches on a plain enum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationRule {
    /// `z₀ = 0`, `z_{n+1} = z_n² + p`.
    Mandelbrot,
    /// `z₀ = p`, `z_{n+1} = f(z_n)`.
    Julia(IterationFunction),
}

impl IterationRule {
    pub fn for_config(config: &FractalConfig) -> Self {
        match config.kind() {
            FractalKind::Mandelbrot => Self::Mandelbrot,
            FractalKind::Julia(j) => Self::Julia(j.effective_function()),
        }
    }

    #[inline]
    fn start(&self, point: Complex) -> Complex {
        match self {
            Self::Mandelbrot => Complex::ZERO,
            Self::Julia(_) => point,
        }
    }

    #[inline]
    fn step(&self, z: Complex, point: Complex) -> Complex {
        match self {
            Self::Mandelbrot => z * z + point,
            Self::Julia(f) => f.apply(z),
        }
    }

    /// Escape-time index of `point`.
    ///
    /// A starting value already outside the radius (a Julia point with
    /// `|p| > 2`) escapes at `0`. Otherwise returns the zero-based
    /// iteration at which `|z|` first exceeds
    /// [`ESCAPE_RADIUS`], or `max_iteration - 1` if it never does within the
    /// budget. That cap doubles as the "never escaped" sentinel, so the
    /// result always lies in `0..=max_iteration - 1`.
    #[inline]
    pub fn divergence(&self, point: Complex, max_iteration: u32) -> u32 {
        debug_assert!(max_iteration >= 1, "max_iteration must be >= 1");
        let cap = max_iteration.saturating_sub(1);

        let mut z = self.start(point);
        if z.modulus() > ESCAPE_RADIUS {
            return 0;
        }
        for n in 0..cap {
            z = self.step(z, point);
            if z.modulus() > ESCAPE_RADIUS {
                return n;
            }
        }
        cap
    }
}

/// Escape-time index of `point` under `config`'s rule and iteration budget.
pub fn compute_divergence(config: &FractalConfig, point: Complex) -> u32 {
    IterationRule::for_config(config).divergence(point, config.max_iteration())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FractalOptions;

    fn mandelbrot() -> FractalConfig {
        FractalConfig::mandelbrot(FractalOptions::default()).unwrap()
    }

    fn julia(c: Complex) -> FractalConfig {
        FractalConfig::julia(FractalOptions {
            complex_constant: Some(c),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn origin_never_escapes() {
        let cfg = mandelbrot();
        assert_eq!(compute_divergence(&cfg, Complex::ZERO), cfg.max_iteration() - 1);
    }

    #[test]
    fn far_point_escapes_immediately() {
        assert_eq!(compute_divergence(&mandelbrot(), Complex::new(3.0, 0.0)), 0);
    }

    #[test]
    fn known_escape_count() {
        // c = 1: z₁ = 1, z₂ = 2 (|2| is not > 2), z₃ = 5 → escapes at n = 2.
        assert_eq!(compute_divergence(&mandelbrot(), Complex::new(1.0, 0.0)), 2);
    }

    #[test]
    fn period_two_point_is_interior() {
        // c = -1 gives 0 → -1 → 0 → -1 …
        let cfg = mandelbrot();
        assert_eq!(compute_divergence(&cfg, Complex::new(-1.0, 0.0)), cfg.max_iteration() - 1);
    }

    #[test]
    fn single_iteration_budget_returns_zero() {
        let cfg = FractalConfig::mandelbrot(FractalOptions {
            max_iteration: Some(1),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(compute_divergence(&cfg, Complex::new(3.0, 0.0)), 0);
        assert_eq!(compute_divergence(&cfg, Complex::ZERO), 0);
    }

    #[test]
    fn divergence_is_bounded() {
        let cfg = FractalConfig::mandelbrot(FractalOptions {
            max_iteration: Some(50),
            ..Default::default()
        })
        .unwrap();
        for i in -20..=20 {
            for j in -20..=20 {
                let p = Complex::new(i as f64 * 0.15, j as f64 * 0.15);
                assert!(compute_divergence(&cfg, p) <= 49);
            }
        }
    }

    #[test]
    fn julia_with_zero_constant() {
        // z ← z²: the unit disc interior stays bounded, |z| > 1 blows up.
        let cfg = julia(Complex::ZERO);
        assert_eq!(compute_divergence(&cfg, Complex::new(0.5, 0.0)), cfg.max_iteration() - 1);
        // 1.5 → 2.25 escapes on the first application.
        assert_eq!(compute_divergence(&cfg, Complex::new(1.5, 0.0)), 0);
    }

    #[test]
    fn canonical_override_matches_default_rule() {
        let c = Complex::new(-0.7, 0.27015);
        let default = julia(c);
        let explicit = FractalConfig::julia(FractalOptions {
            complex_constant: Some(c),
            iteration_function: Some(IterationFunction::canonical(c)),
            ..Default::default()
        })
        .unwrap();
        for p in [
            Complex::new(0.0, 0.0),
            Complex::new(0.3, -0.4),
            Complex::new(-1.0, 0.3),
            Complex::new(0.9, 0.9),
        ] {
            assert_eq!(compute_divergence(&default, p), compute_divergence(&explicit, p));
        }
    }

    #[test]
    fn override_changes_the_rule() {
        // alpha = 0 makes f constant: f(z) = beta. With |beta| > 2 every point escapes at 0.
        let cfg = FractalConfig::julia(FractalOptions {
            complex_constant: Some(Complex::ZERO),
            iteration_function: Some(IterationFunction::new(Complex::ZERO, Complex::new(3.0, 0.0))),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(compute_divergence(&cfg, Complex::ZERO), 0);
    }

    #[test]
    fn julia_start_outside_radius_escapes_at_zero() {
        // z₀ = 3 is already outside; one step would give 9 - 9 = 0.
        let cfg = julia(Complex::new(-9.0, 0.0));
        assert_eq!(compute_divergence(&cfg, Complex::new(3.0, 0.0)), 0);
    }

    #[test]
    fn override_cannot_hide_a_distant_start() {
        // alpha = beta = 0 sends every orbit to 0 after one step.
        let cfg = FractalConfig::julia(FractalOptions {
            complex_constant: Some(Complex::ZERO),
            iteration_function: Some(IterationFunction::new(Complex::ZERO, Complex::ZERO)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(compute_divergence(&cfg, Complex::new(5.0, 0.0)), 0);
        assert_eq!(compute_divergence(&cfg, Complex::new(0.0, -2.5)), 0);
        assert_eq!(compute_divergence(&cfg, Complex::new(1.0, 1.0)), cfg.max_iteration() - 1);
    }

    #[test]
    fn deterministic_results() {
        let cfg = julia(Complex::new(-0.8, 0.156));
        let points = [
            Complex::new(0.0, 0.0),
            Complex::new(0.5, 0.5),
            Complex::new(-1.0, 0.3),
            Complex::new(0.0, 1.0),
        ];
        let run1: Vec<_> = points.iter().map(|&p| compute_divergence(&cfg, p)).collect();
        let run2: Vec<_> = points.iter().map(|&p| compute_divergence(&cfg, p)).collect();
        assert_eq!(run1, run2, "iteration results must be deterministic");
    }
}
