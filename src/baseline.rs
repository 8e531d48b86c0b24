//! Rolling personal baseline
//!
//! The baseline is the plain mean of the most recent fourteen daily records
//! and serves as the user's reference point for "normal". It is recomputed
//! from history on every call and never stored.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::models::{last_n, DailyMetrics};

/// Number of most recent days averaged into the baseline
pub const BASELINE_WINDOW_DAYS: usize = 14;

/// Reference values derived from recent history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    /// Mean HRV (ms)
    pub hrv: f64,
    /// Mean resting heart rate (bpm)
    pub resting_hr: f64,
    /// Mean sleep duration (hours)
    pub sleep_hours: f64,
    /// Mean sleep efficiency (0-100)
    pub sleep_efficiency: f64,
    /// Mean stress score (0-100)
    pub stress_score: f64,
    /// Records that contributed to the means; zero for the default baseline
    #[serde(default)]
    pub days_used: usize,
}

impl Baseline {
    /// Population defaults used before any history exists
    pub const DEFAULT: Baseline = Baseline {
        hrv: 60.0,
        resting_hr: 60.0,
        sleep_hours: 7.5,
        sleep_efficiency: 85.0,
        stress_score: 50.0,
        days_used: 0,
    };

    /// True when no personal history backed this baseline
    pub fn is_default(&self) -> bool {
        self.days_used == 0
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Compute the rolling baseline from history ordered oldest to newest.
///
/// Only the last [`BASELINE_WINDOW_DAYS`] records are used; older records
/// have no influence. An empty history yields [`Baseline::DEFAULT`].
pub fn compute_baseline(history: &[DailyMetrics]) -> Baseline {
    let window = last_n(history, BASELINE_WINDOW_DAYS);
    if window.is_empty() {
        tracing::debug!("no history, using default baseline");
        return Baseline::DEFAULT;
    }

    let baseline = Baseline {
        hrv: window_mean(window, |m| m.hrv),
        resting_hr: window_mean(window, |m| m.resting_hr),
        sleep_hours: window_mean(window, |m| m.sleep_hours),
        sleep_efficiency: window_mean(window, |m| m.sleep_efficiency),
        stress_score: window_mean(window, |m| m.stress_score),
        days_used: window.len(),
    };

    tracing::debug!(
        days = baseline.days_used,
        hrv = baseline.hrv,
        resting_hr = baseline.resting_hr,
        "baseline computed"
    );
    baseline
}

/// Mean of one field across a non-empty window
pub(crate) fn window_mean<F>(window: &[DailyMetrics], field: F) -> f64
where
    F: Fn(&DailyMetrics) -> f64,
{
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(field).collect::<Vec<f64>>().mean()
}

/// Percentage change of `value` relative to `reference`.
///
/// A non-positive reference yields zero rather than an infinite delta.
pub fn delta_pct(value: f64, reference: f64) -> f64 {
    if reference > 0.0 && value.is_finite() {
        (value - reference) / reference * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn day(offset: i64, hrv: f64) -> DailyMetrics {
        DailyMetrics {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset),
            sleep_hours: 7.0,
            sleep_efficiency: 90.0,
            hrv,
            resting_hr: 55.0,
            steps: 8000,
            workout_minutes: 30,
            training_load: 40.0,
            stress_score: 30.0,
            mood_score: 4,
            energy_score: 4,
        }
    }

    #[test]
    fn test_empty_history_returns_default() {
        let baseline = compute_baseline(&[]);
        assert_eq!(baseline, Baseline::DEFAULT);
        assert!(baseline.is_default());
    }

    #[test]
    fn test_short_history_averages_everything() {
        let history = vec![day(0, 50.0), day(1, 60.0), day(2, 70.0)];
        let baseline = compute_baseline(&history);

        assert!((baseline.hrv - 60.0).abs() < 1e-9);
        assert!((baseline.resting_hr - 55.0).abs() < 1e-9);
        assert!((baseline.sleep_efficiency - 90.0).abs() < 1e-9);
        assert_eq!(baseline.days_used, 3);
    }

    #[test]
    fn test_window_uses_last_fourteen_days() {
        // Days 0..6 carry an outlier HRV that must fall outside the window
        let history: Vec<DailyMetrics> = (0..20)
            .map(|i| day(i, if i < 6 { 500.0 } else { 40.0 + i as f64 }))
            .collect();
        let baseline = compute_baseline(&history);

        // Window is days 6..=19 -> HRV 46..=59, mean 52.5
        assert!((baseline.hrv - 52.5).abs() < 1e-9);
        assert_eq!(baseline.days_used, BASELINE_WINDOW_DAYS);
    }

    #[test]
    fn test_delta_pct() {
        assert!((delta_pct(48.0, 60.0) + 20.0).abs() < 1e-9);
        assert!((delta_pct(66.0, 60.0) - 10.0).abs() < 1e-9);
        assert_eq!(delta_pct(10.0, 0.0), 0.0);
        assert_eq!(delta_pct(f64::NAN, 60.0), 0.0);
    }

    proptest! {
        #[test]
        fn test_prepending_old_records_does_not_change_baseline(
            recent in prop::collection::vec(20.0f64..120.0, 14..30),
            older in prop::collection::vec(20.0f64..120.0, 0..10),
        ) {
            let recent_days: Vec<DailyMetrics> = recent
                .iter()
                .enumerate()
                .map(|(i, hrv)| day(100 + i as i64, *hrv))
                .collect();
            let mut full: Vec<DailyMetrics> = older
                .iter()
                .enumerate()
                .map(|(i, hrv)| day(i as i64, *hrv))
                .collect();
            full.extend(recent_days.iter().cloned());

            let a = compute_baseline(&recent_days);
            let b = compute_baseline(&full);
            prop_assert!((a.hrv - b.hrv).abs() < 1e-9);
            prop_assert_eq!(a.days_used, b.days_used);
        }
    }
}
