pub mod complex;
pub mod config;
pub mod error;
pub mod fractal;
pub mod matrix;
pub mod text;
pub mod zoom;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use config::{ColorFunction, FractalConfig, FractalKind, FractalOptions, FractalType, IterationFunction, JuliaParams};
pub use error::CoreError;
pub use fractal::{compute_divergence, IterationRule, ESCAPE_RADIUS};
pub use matrix::{compute_matrix, DivergenceMatrix};
pub use zoom::{zoom, Quadrant};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
