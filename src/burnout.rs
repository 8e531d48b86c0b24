//! Burnout risk assessment over the last week
//!
//! Four independent warning signs each add a fixed number of points to a
//! risk score. The score maps onto a traffic-light level:
//!
//! - **Green**: below 25
//! - **Yellow**: 25-49
//! - **Red**: 50 and above
//!
//! HRV and resting HR look at the three most recent days, sleep efficiency
//! and the stress/mood combination look at the full week. Shorter windows
//! are averaged over whatever records exist.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::baseline::{window_mean, Baseline};
use crate::models::{last_n, DailyMetrics, WEEK_WINDOW_DAYS};

/// Days used for the short-term HRV and resting HR trend
pub const TREND_WINDOW_DAYS: usize = 3;

const HRV_DECLINE_RATIO: f64 = 0.85;
const RHR_ELEVATED_RATIO: f64 = 1.1;
const SLEEP_EFFICIENCY_RATIO: f64 = 0.9;
const HIGH_STRESS_AVG: f64 = 70.0;
const LOW_MOOD_AVG: f64 = 3.0;

const HRV_DECLINE_POINTS: u8 = 30;
const RHR_ELEVATED_POINTS: u8 = 25;
const POOR_SLEEP_POINTS: u8 = 20;
const STRESS_MOOD_POINTS: u8 = 25;

const RED_THRESHOLD: u8 = 50;
const YELLOW_THRESHOLD: u8 = 25;

/// Traffic-light burnout level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Green,
    Yellow,
    Red,
}

impl RiskLevel {
    /// Map an additive risk score onto a level
    pub fn from_score(score: u8) -> Self {
        if score >= RED_THRESHOLD {
            RiskLevel::Red
        } else if score >= YELLOW_THRESHOLD {
            RiskLevel::Yellow
        } else {
            RiskLevel::Green
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Green => "Low risk",
            RiskLevel::Yellow => "Moderate risk",
            RiskLevel::Red => "High risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Green => write!(f, "Green"),
            RiskLevel::Yellow => write!(f, "Yellow"),
            RiskLevel::Red => write!(f, "Red"),
        }
    }
}

/// Burnout classification with reasons and suggested actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutRisk {
    pub level: RiskLevel,
    /// Sum of triggered rule contributions (0-100)
    pub risk_score: u8,
    pub rationale: Vec<String>,
    pub actions: Vec<String>,
}

/// Assess burnout risk from the most recent week.
///
/// Only the last seven records of `last_7_days` are read.
pub fn compute_burnout_risk(last_7_days: &[DailyMetrics], baseline: &Baseline) -> BurnoutRisk {
    let week = last_n(last_7_days, WEEK_WINDOW_DAYS);
    let trend = last_n(week, TREND_WINDOW_DAYS);

    let mut risk_score: u8 = 0;
    let mut rationale = Vec::new();
    let mut actions = Vec::new();

    if !trend.is_empty() {
        let avg_hrv = window_mean(trend, |m| m.hrv);
        if avg_hrv < baseline.hrv * HRV_DECLINE_RATIO {
            risk_score += HRV_DECLINE_POINTS;
            rationale.push(format!(
                "HRV declining 3+ days ({:.0} ms vs {:.0} ms baseline)",
                avg_hrv, baseline.hrv
            ));
            actions.push("Reduce training intensity and prioritize sleep".to_string());
        }

        let avg_rhr = window_mean(trend, |m| m.resting_hr);
        if avg_rhr > baseline.resting_hr * RHR_ELEVATED_RATIO {
            risk_score += RHR_ELEVATED_POINTS;
            rationale.push(format!(
                "Resting HR elevated ({:.0} bpm vs {:.0} bpm baseline)",
                avg_rhr, baseline.resting_hr
            ));
            actions.push("Take an extra rest day and monitor for illness".to_string());
        }
    }

    if !week.is_empty() {
        let avg_efficiency = window_mean(week, |m| m.sleep_efficiency);
        if avg_efficiency < baseline.sleep_efficiency * SLEEP_EFFICIENCY_RATIO {
            risk_score += POOR_SLEEP_POINTS;
            rationale.push(format!(
                "Sleep efficiency poor ({:.0}% vs {:.0}% baseline)",
                avg_efficiency, baseline.sleep_efficiency
            ));
            actions.push("Focus on sleep hygiene".to_string());
        }

        let avg_stress = window_mean(week, |m| m.stress_score);
        let avg_mood = window_mean(week, |m| f64::from(m.mood_score));
        let avg_energy = window_mean(week, |m| f64::from(m.energy_score));
        if avg_stress > HIGH_STRESS_AVG && (avg_mood < LOW_MOOD_AVG || avg_energy < LOW_MOOD_AVG)
        {
            risk_score += STRESS_MOOD_POINTS;
            rationale.push("High stress combined with low mood or energy".to_string());
            actions.push("Schedule a mental health break".to_string());
        }
    }

    let level = RiskLevel::from_score(risk_score);
    match level {
        RiskLevel::Red => {
            actions.push("Consider consulting a healthcare professional".to_string());
        }
        RiskLevel::Green if rationale.is_empty() => {
            rationale.push("All key recovery markers stable".to_string());
            actions.push("Keep current balance".to_string());
        }
        _ => {}
    }

    tracing::debug!(risk_score, level = %level, days = week.len(), "burnout risk computed");

    BurnoutRisk {
        level,
        risk_score,
        rationale,
        actions,
    }
}
