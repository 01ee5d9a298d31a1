use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("distance threshold must be positive and finite, got {0}")]
    InvalidDistanceThreshold(f64),
    #[error("cool-down duration must be non-negative and finite, got {0}")]
    InvalidCooldown(f64),
    #[error("line position must be a fraction in [0, 1], got {0}")]
    InvalidLinePosition(f64),
    #[error("frame sampling interval must be at least 1")]
    ZeroFrameInterval,
    #[error("frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f64),
}

/// Precondition violations in crossing deduplication.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrossingError {
    #[error("timestamp went backwards: {now} after {previous}")]
    TimestampRegression { previous: f64, now: f64 },
    #[error("timestamp is NaN")]
    InvalidTimestamp,
}

/// Failure while processing one frame in a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    #[error("detection failed: {0}")]
    Detection(E),
    #[error(transparent)]
    Crossing(#[from] CrossingError),
}
