//! Daily readiness score
//!
//! Readiness starts at 100 and loses points for each independent warning
//! sign in today's record relative to the personal baseline:
//!
//! | Signal | Condition | Deduction |
//! |---|---|---|
//! | Sleep quality | < 70 | 20 |
//! | Sleep quality | 70-85 | 10 |
//! | HRV vs baseline | < -15% | 25 |
//! | HRV vs baseline | < -5% | 10 |
//! | Resting HR vs baseline | > +10% | 20 |
//! | Resting HR vs baseline | > +5% | 10 |
//! | Training load | > 80 | 15 |
//! | Mood or energy | <= 2 | 15 |
//! | Stress | > 75 | 10 |
//!
//! Sleep quality is `(sleep / baseline sleep) * efficiency`, expressed in
//! percent. Several deductions can fire on the same day; the total is
//! clamped to 0-100.

use serde::{Deserialize, Serialize};

use crate::baseline::{delta_pct, Baseline};
use crate::models::DailyMetrics;

const MAX_SCORE: i32 = 100;

const SLEEP_QUALITY_POOR: f64 = 70.0;
const SLEEP_QUALITY_GOOD: f64 = 85.0;
const HRV_SIGNIFICANT_DROP_PCT: f64 = -15.0;
const HRV_SLIGHT_DROP_PCT: f64 = -5.0;
const HRV_ELEVATED_PCT: f64 = 5.0;
const RHR_HIGH_PCT: f64 = 10.0;
const RHR_ELEVATED_PCT: f64 = 5.0;
const HIGH_TRAINING_LOAD: f64 = 80.0;
const LOW_SUBJECTIVE_SCORE: u8 = 2;
const HIGH_STRESS: f64 = 75.0;

/// Readiness for strain today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessScore {
    /// Score in 0-100
    pub score: u8,
    /// Reasons, in the order the rules were evaluated
    pub explanation: Vec<String>,
}

/// Readiness band used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessBand {
    Low,
    Moderate,
    High,
}

impl ReadinessScore {
    pub fn band(&self) -> ReadinessBand {
        match self.score {
            0..=39 => ReadinessBand::Low,
            40..=79 => ReadinessBand::Moderate,
            _ => ReadinessBand::High,
        }
    }
}

/// Compute today's readiness score.
///
/// `_last_7_days` is part of the public signature but no rule reads it yet.
pub fn compute_readiness(
    today: &DailyMetrics,
    baseline: &Baseline,
    _last_7_days: &[DailyMetrics],
) -> ReadinessScore {
    let mut score = MAX_SCORE;
    let mut explanation = Vec::new();

    let sleep_quality = sleep_quality(today, baseline);
    if sleep_quality < SLEEP_QUALITY_POOR {
        score -= 20;
        explanation.push(format!(
            "Poor sleep quality ({:.0}% of your usual)",
            sleep_quality
        ));
    } else if sleep_quality < SLEEP_QUALITY_GOOD {
        score -= 10;
        explanation.push(format!(
            "Sleep quality could be better ({:.0}% of your usual)",
            sleep_quality
        ));
    } else {
        explanation.push("Good sleep quality".to_string());
    }

    let hrv_delta = delta_pct(today.hrv, baseline.hrv);
    if hrv_delta < HRV_SIGNIFICANT_DROP_PCT {
        score -= 25;
        explanation.push(format!(
            "HRV significantly below baseline ({:+.0}%)",
            hrv_delta
        ));
    } else if hrv_delta < HRV_SLIGHT_DROP_PCT {
        score -= 10;
        explanation.push(format!("HRV slightly below baseline ({:+.0}%)", hrv_delta));
    } else if hrv_delta > HRV_ELEVATED_PCT {
        explanation.push(format!(
            "HRV above baseline ({:+.0}%), good recovery",
            hrv_delta
        ));
    }

    let rhr_delta = delta_pct(today.resting_hr, baseline.resting_hr);
    if rhr_delta > RHR_HIGH_PCT {
        score -= 20;
        explanation.push(format!(
            "Resting HR significantly elevated ({:+.0}%)",
            rhr_delta
        ));
    } else if rhr_delta > RHR_ELEVATED_PCT {
        score -= 10;
        explanation.push(format!("Resting HR slightly elevated ({:+.0}%)", rhr_delta));
    }

    if today.training_load > HIGH_TRAINING_LOAD {
        score -= 15;
        explanation.push("High training load yesterday".to_string());
    }

    if today.mood_score <= LOW_SUBJECTIVE_SCORE || today.energy_score <= LOW_SUBJECTIVE_SCORE {
        score -= 15;
        explanation.push("Low mood or energy reported".to_string());
    }

    if today.stress_score > HIGH_STRESS {
        score -= 10;
        explanation.push("High stress level".to_string());
    }

    let score = score.clamp(0, MAX_SCORE) as u8;
    tracing::debug!(
        date = %today.date,
        score,
        sleep_quality,
        hrv_delta,
        rhr_delta,
        "readiness computed"
    );

    ReadinessScore { score, explanation }
}

/// Sleep duration relative to baseline, weighted by efficiency, in percent
pub fn sleep_quality(today: &DailyMetrics, baseline: &Baseline) -> f64 {
    if baseline.sleep_hours <= 0.0 {
        return today.sleep_efficiency;
    }
    (today.sleep_hours / baseline.sleep_hours) * (today.sleep_efficiency / 100.0) * 100.0
}
