//! Single-day anomaly detection
//!
//! Flags today's readings that moved sharply away from baseline. Checks run
//! in a fixed order (resting HR, HRV, sleep efficiency) and each fires at
//! most once.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::baseline::{delta_pct, Baseline};
use crate::models::DailyMetrics;

const RHR_ANOMALY_PCT: f64 = 10.0;
const HRV_ANOMALY_PCT: f64 = -15.0;
const SLEEP_EFFICIENCY_ANOMALY_PCT: f64 = -10.0;

/// Metric an anomaly refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnomalyMetric {
    RestingHr,
    Hrv,
    SleepEfficiency,
}

impl fmt::Display for AnomalyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyMetric::RestingHr => write!(f, "Resting HR"),
            AnomalyMetric::Hrv => write!(f, "HRV"),
            AnomalyMetric::SleepEfficiency => write!(f, "Sleep Efficiency"),
        }
    }
}

/// A sharp single-day deviation from baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub metric: AnomalyMetric,
    /// Signed percentage, e.g. `+12.5%`
    pub deviation: String,
    pub deviation_pct: f64,
    pub cause: String,
    pub suggestion: String,
}

impl Anomaly {
    fn new(metric: AnomalyMetric, deviation_pct: f64, cause: &str, suggestion: &str) -> Self {
        Self {
            metric,
            deviation: format!("{:+.1}%", deviation_pct),
            deviation_pct,
            cause: cause.to_string(),
            suggestion: suggestion.to_string(),
        }
    }
}

/// Detect today's anomalies relative to baseline (zero to three entries)
pub fn detect_anomalies(today: &DailyMetrics, baseline: &Baseline) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    let rhr_delta = delta_pct(today.resting_hr, baseline.resting_hr);
    if rhr_delta > RHR_ANOMALY_PCT {
        anomalies.push(Anomaly::new(
            AnomalyMetric::RestingHr,
            rhr_delta,
            "Possible overtraining, stress, or oncoming illness",
            "Rest, hydrate, and monitor your temperature",
        ));
    }

    let hrv_delta = delta_pct(today.hrv, baseline.hrv);
    if hrv_delta < HRV_ANOMALY_PCT {
        anomalies.push(Anomaly::new(
            AnomalyMetric::Hrv,
            hrv_delta,
            "Stress, insufficient recovery, or poor sleep",
            "Keep activity light and prioritize sleep tonight",
        ));
    }

    let efficiency_delta = delta_pct(today.sleep_efficiency, baseline.sleep_efficiency);
    if efficiency_delta < SLEEP_EFFICIENCY_ANOMALY_PCT {
        anomalies.push(Anomaly::new(
            AnomalyMetric::SleepEfficiency,
            efficiency_delta,
            "Stress, late caffeine, or sleep environment",
            "Review your sleep hygiene",
        ));
    }

    if !anomalies.is_empty() {
        tracing::debug!(date = %today.date, count = anomalies.len(), "anomalies detected");
    }
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn baseline_day() -> DailyMetrics {
        DailyMetrics {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            sleep_hours: 7.5,
            sleep_efficiency: 85.0,
            hrv: 60.0,
            resting_hr: 60.0,
            steps: 6000,
            workout_minutes: 20,
            training_load: 30.0,
            stress_score: 50.0,
            mood_score: 3,
            energy_score: 3,
        }
    }

    #[test]
    fn test_no_anomalies_at_baseline() {
        assert!(detect_anomalies(&baseline_day(), &Baseline::DEFAULT).is_empty());
    }

    #[test]
    fn test_detection_order_is_fixed() {
        let today = DailyMetrics {
            resting_hr: 70.0,
            hrv: 45.0,
            sleep_efficiency: 70.0,
            ..baseline_day()
        };
        let anomalies = detect_anomalies(&today, &Baseline::DEFAULT);
        let metrics: Vec<AnomalyMetric> = anomalies.iter().map(|a| a.metric).collect();
        assert_eq!(
            metrics,
            vec![
                AnomalyMetric::RestingHr,
                AnomalyMetric::Hrv,
                AnomalyMetric::SleepEfficiency
            ]
        );
        assert_eq!(anomalies[0].deviation, "+16.7%");
        assert_eq!(anomalies[1].deviation, "-25.0%");
    }

    #[test]
    fn test_small_deviations_are_ignored() {
        let today = DailyMetrics {
            resting_hr: 65.5,
            hrv: 51.5,
            sleep_efficiency: 77.0,
            ..baseline_day()
        };
        assert!(detect_anomalies(&today, &Baseline::DEFAULT).is_empty());
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        // Exactly +10% RHR, -15% HRV and -10% efficiency
        let at_threshold = DailyMetrics {
            resting_hr: 66.0,
            hrv: 51.0,
            sleep_efficiency: 76.5,
            ..baseline_day()
        };
        assert!(detect_anomalies(&at_threshold, &Baseline::DEFAULT).is_empty());

        let past_threshold = DailyMetrics {
            resting_hr: 66.5,
            hrv: 50.5,
            sleep_efficiency: 76.0,
            ..baseline_day()
        };
        assert_eq!(detect_anomalies(&past_threshold, &Baseline::DEFAULT).len(), 3);
    }

    #[test]
    fn test_sleep_efficiency_only() {
        let today = DailyMetrics {
            sleep_efficiency: 72.0,
            ..baseline_day()
        };
        let anomalies = detect_anomalies(&today, &Baseline::DEFAULT);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].metric, AnomalyMetric::SleepEfficiency);
        assert!(anomalies[0].suggestion.contains("sleep hygiene"));
    }
}
