use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::SimError;
use super::propagator::PropagationBatch;
use super::sample::{PositionSample, ReferenceFrame};

/// Trail polyline + current-position marker for one object in one frame.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ObjectFrame {
    pub name: String,
    /// Positions over the trail window, oldest first; NaN entries mark
    /// propagation gaps and must be rendered as breaks, not dropped.
    pub trail: Vec<[f64; 3]>,
    pub marker: [f64; 3],
}

/// One animation frame: every object's trail window and marker at grid
/// index `index`. Object order is identical across all frames.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Frame {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub objects: Vec<ObjectFrame>,
}

/// Trail length in samples for a trail duration and grid step, floored
/// at one sample so the trail at k=0 is a point rather than empty.
pub fn trail_samples(trail: Duration, step_minutes: i64) -> usize {
    (trail.num_minutes() / step_minutes).max(1) as usize
}

/// Assemble one frame per grid timestamp.
///
/// Frame k carries, per object, the trail window `[k - L, k]` clamped at
/// zero and the marker at k, both in the requested reference frame.
pub fn assemble_frames(
    batch: &PropagationBatch,
    trail_samples: usize,
    frame: ReferenceFrame,
) -> Result<Vec<Frame>, SimError> {
    let grid = batch.grid();
    let n = grid.len();

    for (name, trajectory) in batch.objects() {
        if trajectory.len() != n {
            return Err(SimError::FrameAlignment {
                name: name.clone(),
                actual: trajectory.len(),
                expected: n,
            });
        }
    }

    let mut frames = Vec::with_capacity(n);
    for (k, timestamp) in grid.timestamps().iter().enumerate() {
        let mut objects = Vec::with_capacity(batch.objects().len());
        for (name, trajectory) in batch.objects() {
            let start = k.saturating_sub(trail_samples);
            let trail = trajectory.samples()[start..=k]
                .iter()
                .map(|sample| coords(sample, frame, name))
                .collect::<Result<Vec<_>, _>>()?;
            let marker = coords(&trajectory.samples()[k], frame, name)?;

            objects.push(ObjectFrame {
                name: name.clone(),
                trail,
                marker,
            });
        }
        frames.push(Frame {
            index: k,
            timestamp: *timestamp,
            objects,
        });
    }

    Ok(frames)
}

fn coords(
    sample: &PositionSample,
    frame: ReferenceFrame,
    name: &str,
) -> Result<[f64; 3], SimError> {
    sample
        .coords(frame)
        .ok_or_else(|| SimError::EarthFixedUnavailable(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{propagate, ElementSet, TimeGrid};
    use chrono::TimeZone;

    fn grid() -> TimeGrid {
        let start = chrono::Utc.with_ymd_and_hms(2008, 9, 21, 0, 0, 0).unwrap();
        TimeGrid::build(start, 7, 120).unwrap()
    }

    fn batch(want_ecef: bool) -> PropagationBatch {
        let set = ElementSet {
            name: "ISS (ZARYA)".to_string(),
            line1: "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927"
                .to_string(),
            line2: "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537"
                .to_string(),
        };
        propagate(&[set], &grid(), want_ecef)
    }

    #[test]
    fn one_frame_per_grid_timestamp() {
        let batch = batch(false);
        let frames = assemble_frames(&batch, 3, ReferenceFrame::Eci).unwrap();

        assert_eq!(frames.len(), batch.grid().len());
        for (k, frame) in frames.iter().enumerate() {
            assert_eq!(frame.index, k);
            assert_eq!(frame.timestamp, batch.grid().timestamps()[k]);
        }
    }

    #[test]
    fn trail_window_length_is_clamped() {
        let batch = batch(false);
        let trail = 5;
        let frames = assemble_frames(&batch, trail, ReferenceFrame::Eci).unwrap();

        for (k, frame) in frames.iter().enumerate() {
            let expected = (k + 1).min(trail + 1);
            assert_eq!(frame.objects[0].trail.len(), expected, "frame {}", k);
        }
    }

    #[test]
    fn first_frame_trail_is_a_single_point() {
        let batch = batch(false);
        let frames = assemble_frames(&batch, 12, ReferenceFrame::Eci).unwrap();

        assert_eq!(frames[0].objects[0].trail.len(), 1);
        assert_eq!(frames[0].objects[0].trail[0], frames[0].objects[0].marker);
    }

    #[test]
    fn marker_equals_trajectory_sample_at_k() {
        let batch = batch(false);
        let frames = assemble_frames(&batch, 4, ReferenceFrame::Eci).unwrap();
        let trajectory = batch.trajectory("ISS (ZARYA)").unwrap();

        for (k, frame) in frames.iter().enumerate() {
            assert_eq!(frame.objects[0].marker, trajectory.samples()[k].eci_km);
            assert_eq!(*frame.objects[0].trail.last().unwrap(), frame.objects[0].marker);
        }
    }

    #[test]
    fn object_order_is_stable_across_frames() {
        let g = grid();
        let mk = |name: &str| ElementSet {
            name: name.to_string(),
            line1: "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927"
                .to_string(),
            line2: "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537"
                .to_string(),
        };
        let batch = propagate(&[mk("BEE"), mk("ANT"), mk("CAT")], &g, false);
        let frames = assemble_frames(&batch, 2, ReferenceFrame::Eci).unwrap();

        for frame in &frames {
            let names: Vec<_> = frame.objects.iter().map(|o| o.name.as_str()).collect();
            assert_eq!(names, ["BEE", "ANT", "CAT"]);
        }
    }

    #[test]
    fn nan_samples_stay_in_the_trail_as_gaps() {
        use crate::sim::{PositionSample, Trajectory};

        // Hand-build a batch with a mid-sequence sentinel.
        let batch = batch(false);
        let n = batch.grid().len();
        let mut samples: Vec<PositionSample> = batch
            .trajectory("ISS (ZARYA)")
            .unwrap()
            .samples()
            .to_vec();
        samples[3] = PositionSample::invalid(false);
        let doctored = PropagationBatch::from_parts(
            batch.grid().clone(),
            vec![("ISS (ZARYA)".to_string(), Trajectory::from_samples(samples))],
            Vec::new(),
        );

        let trail = 4;
        let frames = assemble_frames(&doctored, trail, ReferenceFrame::Eci).unwrap();
        assert_eq!(frames.len(), n);

        // Index 3 appears in the windows of frames 3..=7; its slot must be
        // NaN there, and window lengths must be unchanged.
        for (k, frame) in frames.iter().enumerate() {
            let window_start = k.saturating_sub(trail);
            let expected = (k + 1).min(trail + 1);
            let object = &frame.objects[0];
            assert_eq!(object.trail.len(), expected);
            if (window_start..=k).contains(&3) {
                let slot = 3 - window_start;
                assert!(object.trail[slot].iter().all(|v| v.is_nan()));
            } else {
                assert!(object.trail.iter().all(|p| p.iter().all(|v| v.is_finite())));
            }
        }
    }

    #[test]
    fn trail_samples_floors_at_one() {
        assert_eq!(trail_samples(Duration::hours(6), 30), 12);
        assert_eq!(trail_samples(Duration::hours(6), 120), 3);
        assert_eq!(trail_samples(Duration::minutes(10), 120), 1);
        assert_eq!(trail_samples(Duration::zero(), 30), 1);
    }

    #[test]
    fn misaligned_trajectory_is_a_fatal_error() {
        use crate::sim::Trajectory;

        let batch = batch(false);
        let mut samples = batch
            .trajectory("ISS (ZARYA)")
            .unwrap()
            .samples()
            .to_vec();
        samples.pop();
        let doctored = PropagationBatch::from_parts(
            batch.grid().clone(),
            vec![("ISS (ZARYA)".to_string(), Trajectory::from_samples(samples))],
            Vec::new(),
        );

        let err = assemble_frames(&doctored, 2, ReferenceFrame::Eci).unwrap_err();
        assert!(matches!(err, SimError::FrameAlignment { .. }));
    }

    #[test]
    fn ecef_frames_require_ecef_samples() {
        let eci_only = batch(false);
        let err = assemble_frames(&eci_only, 2, ReferenceFrame::Ecef).unwrap_err();
        assert!(matches!(err, SimError::EarthFixedUnavailable(_)));

        let with_ecef = batch(true);
        assert!(assemble_frames(&with_ecef, 2, ReferenceFrame::Ecef).is_ok());
    }
}
