use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;

pub const DEFAULT_MAX_ITERATION: u32 = 1000;
pub const DEFAULT_DISCRETE_STEP: f64 = 0.00075;

// ---------------------------------------------------------------------------
// Fractal type tag
// ---------------------------------------------------------------------------

/// The two supported escape-time families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalType {
    Julia,
    #[default]
    Mandelbrot,
}

impl FractalType {
    /// Tag used by the text codec and in log output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Julia => "julia",
            Self::Mandelbrot => "mandelbrot",
        }
    }

    /// Largest accepted discrete step (inclusive).
    pub fn max_discrete_step(self) -> f64 {
        match self {
            Self::Julia => 0.13,
            Self::Mandelbrot => 0.2,
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Julia => "Julia",
            Self::Mandelbrot => "Mandelbrot",
        }
    }

    /// Default sampling rectangle as `(x_min, x_max, y_min, y_max)`.
    fn default_rect(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Julia => (-1.0, 1.0, -1.0, 1.0),
            Self::Mandelbrot => (-2.0, 1.0, -1.0, 1.0),
        }
    }
}

impl fmt::Display for FractalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FractalType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "julia" => Ok(Self::Julia),
            "mandelbrot" => Ok(Self::Mandelbrot),
            other => Err(CoreError::invalid(format!("unknown fractal type '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Iteration and color functions
// ---------------------------------------------------------------------------

/// Quadratic Julia rule `f(z) = alpha·z² + beta`.
///
/// The canonical rule `z² + c` is `alpha = 1`, `beta = c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationFunction {
    pub alpha: Complex,
    pub beta: Complex,
}

impl IterationFunction {
    pub fn new(alpha: Complex, beta: Complex) -> Self {
        Self { alpha, beta }
    }

    /// The default `z² + c` rule for the constant `c`.
    pub fn canonical(c: Complex) -> Self {
        Self::new(Complex::ONE, c)
    }

    #[inline]
    pub fn apply(&self, z: Complex) -> Complex {
        self.alpha * (z * z) + self.beta
    }
}

/// Coefficients of the color function.
///
/// `alpha` scales the divergence index into hue turns, `beta` is the
/// saturation and `gamma` the brightness. The defaults give the classic
/// `index · 20 / maxIteration` hue ramp at full saturation and brightness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorFunction {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl ColorFunction {
    pub const DEFAULT_ALPHA: f64 = 20.0;
    pub const DEFAULT_BETA: f64 = 1.0;
    pub const DEFAULT_GAMMA: f64 = 1.0;

    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }
}

impl Default for ColorFunction {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALPHA, Self::DEFAULT_BETA, Self::DEFAULT_GAMMA)
    }
}

// ---------------------------------------------------------------------------
// Variant data
// ---------------------------------------------------------------------------

/// Julia-only parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JuliaParams {
    /// The additive constant `c` in `z² + c`.
    pub constant: Complex,
    /// Explicit `(alpha, beta)` override; `None` means `z² + c`.
    pub iteration_function: Option<IterationFunction>,
}

impl JuliaParams {
    /// The rule actually iterated: the override if present, else `z² + c`.
    pub fn effective_function(&self) -> IterationFunction {
        self.iteration_function
            .unwrap_or_else(|| IterationFunction::canonical(self.constant))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FractalKind {
    Mandelbrot,
    Julia(JuliaParams),
}

impl FractalKind {
    pub fn fractal_type(&self) -> FractalType {
        match self {
            Self::Mandelbrot => FractalType::Mandelbrot,
            Self::Julia(_) => FractalType::Julia,
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Optional parameters accepted by [`FractalConfig::build`].
///
/// Every `None` falls back to the per-variant default. An image dimension
/// of `0` counts as unset; if either dimension is unset both are derived
/// from the rectangle and step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalOptions {
    pub max_iteration: Option<u32>,
    pub discrete_step: Option<f64>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    pub file_name: Option<String>,
    pub color: Option<ColorFunction>,
    /// Julia only; required for that variant.
    pub complex_constant: Option<Complex>,
    /// Julia only.
    pub iteration_function: Option<IterationFunction>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// A validated, immutable fractal configuration.
///
/// Only obtainable through [`FractalConfig::build`] (or the codec and zoom,
/// which go through it), so every instance satisfies the step bound and
/// carries positive image dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalConfig {
    kind: FractalKind,
    max_iteration: u32,
    discrete_step: f64,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    image_width: u32,
    image_height: u32,
    file_name: String,
    color: ColorFunction,
}

impl FractalConfig {
    /// Validate `options` and produce a configuration of the given type.
    pub fn build(fractal_type: FractalType, options: FractalOptions) -> crate::Result<Self> {
        let FractalOptions {
            max_iteration,
            discrete_step,
            x_min,
            x_max,
            y_min,
            y_max,
            image_width,
            image_height,
            file_name,
            color,
            complex_constant,
            iteration_function,
        } = options;

        let kind = match fractal_type {
            FractalType::Julia => {
                let constant = complex_constant
                    .ok_or(CoreError::MissingRequiredParameter("complexConstant"))?;
                check_complex("complexConstant", constant)?;
                if let Some(f) = iteration_function {
                    check_complex("iterationFunction alpha", f.alpha)?;
                    check_complex("iterationFunction beta", f.beta)?;
                }
                FractalKind::Julia(JuliaParams {
                    constant,
                    iteration_function,
                })
            }
            FractalType::Mandelbrot => {
                if complex_constant.is_some() || iteration_function.is_some() {
                    debug!("Ignoring Julia-only parameters for a mandelbrot configuration");
                }
                FractalKind::Mandelbrot
            }
        };

        let max_iteration = max_iteration.unwrap_or(DEFAULT_MAX_ITERATION);
        if max_iteration < 1 {
            return Err(CoreError::invalid("maxIteration must be >= 1"));
        }

        let discrete_step = discrete_step.unwrap_or(DEFAULT_DISCRETE_STEP);
        let bound = fractal_type.max_discrete_step();
        // Written so that NaN fails too.
        if !(discrete_step > 0.0 && discrete_step <= bound) {
            return Err(CoreError::invalid(format!(
                "discrete step {discrete_step} must be in (0, {bound}] for a {fractal_type} set"
            )));
        }

        let (dx_min, dx_max, dy_min, dy_max) = fractal_type.default_rect();
        let x_min = x_min.unwrap_or(dx_min);
        let x_max = x_max.unwrap_or(dx_max);
        let y_min = y_min.unwrap_or(dy_min);
        let y_max = y_max.unwrap_or(dy_max);
        for (name, value) in [("xMin", x_min), ("xMax", x_max), ("yMin", y_min), ("yMax", y_max)] {
            check_finite(name, value)?;
        }

        let color = color.unwrap_or_default();
        check_finite("colorAlpha", color.alpha)?;
        check_finite("colorBeta", color.beta)?;
        check_finite("colorGamma", color.gamma)?;

        let file_name = file_name.unwrap_or_else(|| fractal_type.default_file_name().to_string());
        if file_name.is_empty() {
            return Err(CoreError::invalid("file name must not be empty"));
        }
        if file_name.contains(['\n', '\r']) {
            return Err(CoreError::invalid("file name must not contain line breaks"));
        }

        let (image_width, image_height) = match (image_width, image_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => (
                derive_dimension(x_min, x_max, discrete_step)?,
                derive_dimension(y_min, y_max, discrete_step)?,
            ),
        };

        Ok(Self {
            kind,
            max_iteration,
            discrete_step,
            x_min,
            x_max,
            y_min,
            y_max,
            image_width,
            image_height,
            file_name,
            color,
        })
    }

    pub fn julia(options: FractalOptions) -> crate::Result<Self> {
        Self::build(FractalType::Julia, options)
    }

    pub fn mandelbrot(options: FractalOptions) -> crate::Result<Self> {
        Self::build(FractalType::Mandelbrot, options)
    }

    /// Fully populated options that rebuild an identical configuration.
    pub fn to_options(&self) -> FractalOptions {
        let (complex_constant, iteration_function) = match self.kind {
            FractalKind::Mandelbrot => (None, None),
            FractalKind::Julia(j) => (Some(j.constant), j.iteration_function),
        };
        FractalOptions {
            max_iteration: Some(self.max_iteration),
            discrete_step: Some(self.discrete_step),
            x_min: Some(self.x_min),
            x_max: Some(self.x_max),
            y_min: Some(self.y_min),
            y_max: Some(self.y_max),
            image_width: Some(self.image_width),
            image_height: Some(self.image_height),
            file_name: Some(self.file_name.clone()),
            color: Some(self.color),
            complex_constant,
            iteration_function,
        }
    }

    /// Variant and its variant-specific data.
    pub fn kind(&self) -> &FractalKind {
        &self.kind
    }

    /// The variant tag.
    pub fn fractal_type(&self) -> FractalType {
        self.kind.fractal_type()
    }

    /// Julia parameters, or `None` for a Mandelbrot configuration.
    pub fn julia_params(&self) -> Option<&JuliaParams> {
        match &self.kind {
            FractalKind::Julia(j) => Some(j),
            FractalKind::Mandelbrot => None,
        }
    }

    /// Iteration budget; divergence indices lie in `0..max_iteration`.
    pub fn max_iteration(&self) -> u32 {
        self.max_iteration
    }

    /// Spacing between adjacent samples on both axes.
    pub fn discrete_step(&self) -> f64 {
        self.discrete_step
    }

    /// Real part of the first column.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Right edge of the sampling rectangle.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Bottom edge of the sampling rectangle.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Imaginary part of the first row.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Width in pixels, supplied or derived.
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// Height in pixels, supplied or derived.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Base name for output files, without extension.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Coefficients handed to the color mapper.
    pub fn color(&self) -> ColorFunction {
        self.color
    }

    /// Suggested name for the rendered image.
    pub fn image_file_name(&self) -> String {
        format!("{}.png", self.file_name)
    }

    /// Suggested name for the saved text record.
    pub fn record_file_name(&self) -> String {
        format!("{}.txt", self.file_name)
    }

    /// Map pixel `(i, j)` to the plane. `(0, 0)` is `(xMin, yMax)`; the
    /// imaginary part decreases downward.
    #[inline]
    pub fn pixel_to_complex(&self, i: u32, j: u32) -> Complex {
        Complex::new(
            self.x_min + self.discrete_step * i as f64,
            self.y_max - self.discrete_step * j as f64,
        )
    }
}

/// `floor((|lo| + |hi|) / step) + 1`, one pixel per sampled point.
fn derive_dimension(lo: f64, hi: f64, step: f64) -> crate::Result<u32> {
    let n = ((lo.abs() + hi.abs()) / step).floor() + 1.0;
    if n > u32::MAX as f64 {
        return Err(CoreError::invalid(format!(
            "derived image dimension {n} is too large; use a bigger step or explicit dimensions"
        )));
    }
    Ok(n as u32)
}

fn check_finite(name: &str, value: f64) -> crate::Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::invalid(format!("{name} must be finite, got {value}")))
    }
}

fn check_complex(name: &str, value: Complex) -> crate::Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::invalid(format!("{name} must be finite, got {value}")))
    }
}
