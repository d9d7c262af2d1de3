//! Property-based checks for the grid-length and trail-window formulas.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use super::frames::trail_samples;
use super::time_grid::{
    TimeGrid, MAX_DURATION_DAYS, MAX_STEP_MINUTES, MIN_DURATION_DAYS, MIN_STEP_MINUTES,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// len == floor(days*1440/step) + 1 for every in-range window.
    #[test]
    fn prop_grid_length_formula(
        days in MIN_DURATION_DAYS..=MAX_DURATION_DAYS,
        step in MIN_STEP_MINUTES..=MAX_STEP_MINUTES,
    ) {
        let start = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let grid = TimeGrid::build(start, days, step).unwrap();
        prop_assert_eq!(grid.len() as i64, days * 1440 / step + 1);
    }

    /// Every consecutive pair of timestamps differs by exactly the step.
    #[test]
    fn prop_grid_spacing_is_uniform(
        days in MIN_DURATION_DAYS..=MAX_DURATION_DAYS,
        step in MIN_STEP_MINUTES..=MAX_STEP_MINUTES,
    ) {
        let start = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let grid = TimeGrid::build(start, days, step).unwrap();
        for pair in grid.timestamps().windows(2) {
            prop_assert_eq!(pair[1] - pair[0], Duration::minutes(step));
        }
    }

    /// Trail length in samples is positive and never exceeds the ratio.
    #[test]
    fn prop_trail_samples_floor(
        trail_minutes in 0i64..=24 * 60,
        step in MIN_STEP_MINUTES..=MAX_STEP_MINUTES,
    ) {
        let samples = trail_samples(Duration::minutes(trail_minutes), step);
        prop_assert!(samples >= 1);
        prop_assert!(samples as i64 <= (trail_minutes / step).max(1));
    }

    /// Window [max(0, k-L), k] always has min(k+1, L+1) entries.
    #[test]
    fn prop_trail_window_length(k in 0usize..5000, trail in 1usize..500) {
        let start = k.saturating_sub(trail);
        let window = k - start + 1;
        prop_assert_eq!(window, (k + 1).min(trail + 1));
    }
}
