mod error;
mod frames;
mod propagator;
mod sample;
mod time_grid;

#[cfg(test)]
mod proptest_sim;

pub use error::SimError;
pub use frames::{assemble_frames, trail_samples, Frame, ObjectFrame};
pub use propagator::{
    ecef_to_eci_position, eci_to_ecef_position, gmst_radians, propagate, ElementSet,
    PropagationBatch, SkippedObject,
};
pub use sample::{PositionSample, ReferenceFrame, Trajectory};
pub use time_grid::{
    validate_window, TimeGrid, MAX_DURATION_DAYS, MAX_STEP_MINUTES, MIN_DURATION_DAYS,
    MIN_STEP_MINUTES,
};
