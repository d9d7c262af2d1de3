use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coordinate frame a position is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceFrame {
    /// Earth-centered inertial (TEME, as produced by SGP4).
    Eci,
    /// Earth-centered earth-fixed (rotates with Earth).
    Ecef,
}

/// One propagated position, kilometers.
///
/// A failed propagation is stored as a NaN-filled sample rather than
/// omitted, so trajectories stay aligned 1:1 with the time grid.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PositionSample {
    pub eci_km: [f64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecef_km: Option<[f64; 3]>,
}

impl PositionSample {
    pub fn invalid(want_ecef: bool) -> Self {
        let nan = [f64::NAN; 3];
        Self {
            eci_km: nan,
            ecef_km: want_ecef.then_some(nan),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.eci_km.iter().all(|v| v.is_finite())
    }

    /// Coordinates in the requested frame; `None` when the earth-fixed
    /// frame was not computed for this batch.
    pub fn coords(&self, frame: ReferenceFrame) -> Option<[f64; 3]> {
        match frame {
            ReferenceFrame::Eci => Some(self.eci_km),
            ReferenceFrame::Ecef => self.ecef_km,
        }
    }
}

/// Ordered position samples for one object, aligned with a [`TimeGrid`].
///
/// [`TimeGrid`]: super::TimeGrid
#[derive(Debug, Clone)]
pub struct Trajectory {
    samples: Vec<PositionSample>,
}

impl Trajectory {
    pub(crate) fn from_samples(samples: Vec<PositionSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PositionSample] {
        &self.samples
    }

    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_valid()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sample_is_detectable() {
        let sample = PositionSample::invalid(false);
        assert!(!sample.is_valid());
        assert!(sample.ecef_km.is_none());

        let sample = PositionSample::invalid(true);
        assert!(!sample.is_valid());
        assert!(sample.ecef_km.unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn coords_respects_requested_frame() {
        let sample = PositionSample {
            eci_km: [1.0, 2.0, 3.0],
            ecef_km: None,
        };
        assert_eq!(sample.coords(ReferenceFrame::Eci), Some([1.0, 2.0, 3.0]));
        assert_eq!(sample.coords(ReferenceFrame::Ecef), None);
    }

    #[test]
    fn valid_count_skips_sentinels() {
        let trajectory = Trajectory::from_samples(vec![
            PositionSample {
                eci_km: [7000.0, 0.0, 0.0],
                ecef_km: None,
            },
            PositionSample::invalid(false),
            PositionSample {
                eci_km: [0.0, 7000.0, 0.0],
                ecef_km: None,
            },
        ]);
        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.valid_count(), 2);
    }
}
