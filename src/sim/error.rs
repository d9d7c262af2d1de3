use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid element set for {name}: {message}")]
    InvalidElementSet { name: String, message: String },
    #[error("trajectory for {name} has {actual} samples, grid has {expected}")]
    FrameAlignment {
        name: String,
        actual: usize,
        expected: usize,
    },
    #[error("earth-fixed coordinates were not computed for {0}")]
    EarthFixedUnavailable(String),
}
