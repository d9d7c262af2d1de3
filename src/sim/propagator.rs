use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};
use utoipa::ToSchema;

use super::error::SimError;
use super::sample::{PositionSample, Trajectory};
use super::time_grid::TimeGrid;

/// Raw two-line element pair for one named object.
#[derive(Debug, Clone)]
pub struct ElementSet {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl ElementSet {
    /// Parse the TLE pair and derive SGP4 constants.
    pub fn parse(&self) -> Result<(Elements, Constants), SimError> {
        let invalid = |message: String| SimError::InvalidElementSet {
            name: self.name.clone(),
            message,
        };

        let elements = Elements::from_tle(
            Some(self.name.clone()),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )
        .map_err(|e| invalid(e.to_string()))?;
        let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        Ok((elements, constants))
    }
}

/// An object dropped from a batch because its element set did not parse.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SkippedObject {
    pub name: String,
    pub reason: String,
}

/// Per-object trajectories aligned to one time grid, in input order.
#[derive(Debug, Clone)]
pub struct PropagationBatch {
    grid: TimeGrid,
    objects: Vec<(String, Trajectory)>,
    skipped: Vec<SkippedObject>,
}

impl PropagationBatch {
    #[cfg(test)]
    pub(crate) fn from_parts(
        grid: TimeGrid,
        objects: Vec<(String, Trajectory)>,
        skipped: Vec<SkippedObject>,
    ) -> Self {
        Self {
            grid,
            objects,
            skipped,
        }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn objects(&self) -> &[(String, Trajectory)] {
        &self.objects
    }

    pub fn trajectory(&self, name: &str) -> Option<&Trajectory> {
        self.objects
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    pub fn skipped(&self) -> &[SkippedObject] {
        &self.skipped
    }
}

/// Propagate every element set across the grid.
///
/// SGP4 constants are derived once per object, then evaluated at each
/// timestamp. An unparsable element set skips that object and the batch
/// continues; a propagation failure at a single timestamp records a NaN
/// sentinel at that index and the trajectory continues.
pub fn propagate(sets: &[ElementSet], grid: &TimeGrid, want_ecef: bool) -> PropagationBatch {
    let mut objects = Vec::with_capacity(sets.len());
    let mut skipped = Vec::new();

    for set in sets {
        let (elements, constants) = match set.parse() {
            Ok(pair) => pair,
            Err(err) => {
                log::warn!("{}", err);
                skipped.push(SkippedObject {
                    name: set.name.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let samples = grid
            .timestamps()
            .iter()
            .map(|t| sample_at(&elements, &constants, *t, want_ecef))
            .collect();
        objects.push((set.name.clone(), Trajectory::from_samples(samples)));
    }

    PropagationBatch {
        grid: grid.clone(),
        objects,
        skipped,
    }
}

fn sample_at(
    elements: &Elements,
    constants: &Constants,
    timestamp: DateTime<Utc>,
    want_ecef: bool,
) -> PositionSample {
    let minutes = match elements.datetime_to_minutes_since_epoch(&timestamp.naive_utc()) {
        Ok(m) => m,
        Err(e) => {
            log::debug!("Epoch offset failed at {}: {}", timestamp, e);
            return PositionSample::invalid(want_ecef);
        }
    };

    // Position comes back in kilometers, TEME frame.
    let prediction = match constants.propagate(minutes) {
        Ok(p) => p,
        Err(e) => {
            log::debug!("Propagation failed at {}: {}", timestamp, e);
            return PositionSample::invalid(want_ecef);
        }
    };

    let eci_km = prediction.position;
    let ecef_km = want_ecef.then(|| eci_to_ecef_position(eci_km, gmst_radians(timestamp)));

    PositionSample { eci_km, ecef_km }
}

/// Greenwich mean sidereal time for a UTC instant, radians.
pub fn gmst_radians(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}

/// Rotate an inertial (TEME) position about Z by GMST into the
/// earth-fixed frame. Kilometers in, kilometers out.
pub fn eci_to_ecef_position(pos_eci: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_eci[0] * cos_gmst + pos_eci[1] * sin_gmst,
        -pos_eci[0] * sin_gmst + pos_eci[1] * cos_gmst,
        pos_eci[2],
    ]
}

/// Inverse of [`eci_to_ecef_position`].
pub fn ecef_to_eci_position(pos_ecef: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_ecef[0] * cos_gmst - pos_ecef[1] * sin_gmst,
        pos_ecef[0] * sin_gmst + pos_ecef[1] * cos_gmst,
        pos_ecef[2],
    ]
}
