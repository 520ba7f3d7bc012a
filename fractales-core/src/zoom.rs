use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::config::FractalConfig;
use crate::error::CoreError;

/// Corner of the current rectangle to zoom towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::TopLeft => "TOP_LEFT",
            Self::TopRight => "TOP_RIGHT",
            Self::BottomLeft => "BOTTOM_LEFT",
            Self::BottomRight => "BOTTOM_RIGHT",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts `TOP_LEFT`, `top-left`, `Top Left` and so on.
impl FromStr for Quadrant {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|q| q.label() == normalized)
            .ok_or(CoreError::MissingZoomSelection)
    }
}

/// Derive the configuration for zooming into `quadrant` of `config`.
///
/// The step is halved and one bound per selected axis is halved toward the
/// origin (not bisected at the midpoint):
///
/// | quadrant       | change                      |
/// |----------------|-----------------------------|
/// | `TopLeft`      | `xMax / 2`                  |
/// | `TopRight`     | `xMin / 2`                  |
/// | `BottomLeft`   | `yMax / 2`                  |
/// | `BottomRight`  | `xMin / 2`, `yMax / 2`      |
///
/// Image dimensions, file name, color coefficients and the Julia constant
/// and iteration function carry over unchanged. The source is not touched.
pub fn zoom(config: &FractalConfig, quadrant: Option<Quadrant>) -> crate::Result<FractalConfig> {
    let quadrant = quadrant.ok_or(CoreError::MissingZoomSelection)?;

    let mut options = config.to_options();
    options.discrete_step = Some(config.discrete_step() / 2.0);
    match quadrant {
        Quadrant::TopLeft => options.x_max = Some(config.x_max() / 2.0),
        Quadrant::TopRight => options.x_min = Some(config.x_min() / 2.0),
        Quadrant::BottomLeft => options.y_max = Some(config.y_max() / 2.0),
        Quadrant::BottomRight => {
            options.x_min = Some(config.x_min() / 2.0);
            options.y_max = Some(config.y_max() / 2.0);
        }
    }

    debug!(
        fractal = %config.fractal_type(),
        %quadrant,
        step = config.discrete_step() / 2.0,
        "Zooming"
    );
    FractalConfig::build(config.fractal_type(), options)
}
