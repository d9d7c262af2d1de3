use chrono::{DateTime, Duration, Utc};

use super::error::SimError;

pub const MIN_DURATION_DAYS: i64 = 7;
pub const MAX_DURATION_DAYS: i64 = 35;
pub const MIN_STEP_MINUTES: i64 = 5;
pub const MAX_STEP_MINUTES: i64 = 120;

/// Evenly spaced UTC timestamps spanning a simulation window.
///
/// The sequence starts at `start` and includes every step up to and
/// including `start + duration_days`, so its length is always
/// `duration_days * 1440 / step_minutes + 1` (integer division).
#[derive(Debug, Clone)]
pub struct TimeGrid {
    timestamps: Vec<DateTime<Utc>>,
    step: Duration,
}

/// Range-check a simulation window without building the grid.
pub fn validate_window(duration_days: i64, step_minutes: i64) -> Result<(), SimError> {
    if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&duration_days) {
        return Err(SimError::InvalidConfiguration(format!(
            "duration must be between {} and {} days, got {}",
            MIN_DURATION_DAYS, MAX_DURATION_DAYS, duration_days
        )));
    }
    if !(MIN_STEP_MINUTES..=MAX_STEP_MINUTES).contains(&step_minutes) {
        return Err(SimError::InvalidConfiguration(format!(
            "step must be between {} and {} minutes, got {}",
            MIN_STEP_MINUTES, MAX_STEP_MINUTES, step_minutes
        )));
    }
    Ok(())
}

impl TimeGrid {
    pub fn build(
        start: DateTime<Utc>,
        duration_days: i64,
        step_minutes: i64,
    ) -> Result<Self, SimError> {
        validate_window(duration_days, step_minutes)?;

        let step = Duration::minutes(step_minutes);
        let end = start + Duration::days(duration_days);
        let mut timestamps = Vec::new();
        let mut cursor = start;
        while cursor <= end {
            timestamps.push(cursor);
            cursor += step;
        }

        Ok(Self { timestamps, step })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.timestamps[0]
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_minutes(&self) -> i64 {
        self.step.num_minutes()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }
}
