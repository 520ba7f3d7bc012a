use thiserror::Error;

/// Errors originating from the core fractal engine.
///
/// Every variant is raised while building, zooming or decoding a
/// configuration; the divergence loop itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(&'static str),

    #[error("no zoom quadrant selected")]
    MissingZoomSelection,

    #[error("corrupt fractal file: {reason}")]
    CorruptFractalFile { reason: String },
}

impl CoreError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptFractalFile {
            reason: reason.into(),
        }
    }
}
