use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::baseline::{compute_baseline, Baseline};

/// Number of days in the short-term analysis window
pub const WEEK_WINDOW_DAYS: usize = 7;

/// One day of recorded physiological and subjective metrics
///
/// Records are keyed by `date` and never change once written. Field names
/// serialize in camelCase to match the records written by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    /// Calendar date of the record (unique key)
    pub date: NaiveDate,

    /// Total sleep in hours
    pub sleep_hours: f64,

    /// Sleep efficiency percentage (0-100)
    pub sleep_efficiency: f64,

    /// Heart rate variability (RMSSD, ms)
    pub hrv: f64,

    /// Resting heart rate in bpm
    pub resting_hr: f64,

    /// Step count
    pub steps: u32,

    /// Minutes of structured exercise
    pub workout_minutes: u32,

    /// Training load on a 0-100 scale
    pub training_load: f64,

    /// Stress score (0-100)
    pub stress_score: f64,

    /// Self-reported mood (1-5)
    pub mood_score: u8,

    /// Self-reported energy (1-5)
    pub energy_score: u8,
}

impl DailyMetrics {
    /// Return a copy with every field forced into its valid range.
    ///
    /// Non-finite or negative readings are replaced with neutral values so
    /// that downstream arithmetic never sees NaN or divides by zero.
    pub fn sanitized(&self) -> Self {
        Self {
            date: self.date,
            sleep_hours: finite_or(self.sleep_hours, 0.0).clamp(0.0, 24.0),
            sleep_efficiency: finite_or(self.sleep_efficiency, 0.0).clamp(0.0, 100.0),
            hrv: positive_or(self.hrv, Baseline::DEFAULT.hrv),
            resting_hr: positive_or(self.resting_hr, Baseline::DEFAULT.resting_hr),
            steps: self.steps,
            workout_minutes: self.workout_minutes,
            training_load: finite_or(self.training_load, 0.0).clamp(0.0, 100.0),
            stress_score: finite_or(self.stress_score, 0.0).clamp(0.0, 100.0),
            mood_score: self.mood_score.clamp(1, 5),
            energy_score: self.energy_score.clamp(1, 5),
        }
    }

    /// True when every numeric field is already inside its valid range
    pub fn is_valid(&self) -> bool {
        self.sanitized() == *self
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Primary body-composition goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseFat,
    BuildMuscle,
    Maintain,
}

/// Preferred sleep/wake timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chronotype {
    Early,
    Normal,
    Night,
}

impl Chronotype {
    /// Time of day best suited for demanding sessions
    pub fn training_window(&self) -> &'static str {
        match self {
            Chronotype::Early => "7-10 AM",
            Chronotype::Normal => "11 AM-2 PM",
            Chronotype::Night => "5-8 PM",
        }
    }
}

/// User profile configured during onboarding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Age in years
    #[serde(default)]
    pub age: Option<u8>,

    pub goal: Goal,

    pub chronotype: Chronotype,

    /// Planned training sessions per week
    pub training_frequency: u8,

    /// Self-reported nightly sleep need in hours
    pub baseline_sleep_need: f64,

    /// Exams or other high cognitive load period
    #[serde(default)]
    pub exam_phase: bool,

    #[serde(default)]
    pub onboarding_complete: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            age: None,
            goal: Goal::Maintain,
            chronotype: Chronotype::Normal,
            training_frequency: 3,
            baseline_sleep_need: 8.0,
            exam_phase: false,
            onboarding_complete: false,
        }
    }
}

/// Recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Sleep,
    Recovery,
    Training,
    Stress,
    Burnout,
    Anomaly,
    Schedule,
    General,
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecommendationType::Sleep => "sleep",
            RecommendationType::Recovery => "recovery",
            RecommendationType::Training => "training",
            RecommendationType::Stress => "stress",
            RecommendationType::Burnout => "burnout",
            RecommendationType::Anomaly => "anomaly",
            RecommendationType::Schedule => "schedule",
            RecommendationType::General => "general",
        };
        write!(f, "{}", label)
    }
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

/// What a user can do with a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Accept,
    Reject,
    Snooze,
}

/// Button attached to a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationAction {
    pub label: String,
    pub kind: ActionKind,
}

impl RecommendationAction {
    pub fn new(label: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Recommendation produced by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecommendation {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    pub created_at: DateTime<Utc>,

    /// Name of the producing agent
    pub agent: String,

    #[serde(rename = "type")]
    pub kind: RecommendationType,

    pub title: String,

    pub rationale: String,

    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<RecommendationAction>,
}

impl AgentRecommendation {
    /// Create a recommendation with a fresh id and timestamp
    pub fn new(
        agent: impl Into<String>,
        kind: RecommendationType,
        title: impl Into<String>,
        rationale: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            agent: agent.into(),
            kind,
            title: title.into(),
            rationale: rationale.into(),
            priority,
            actions: Vec::new(),
        }
    }

    /// Attach an action button
    pub fn with_action(mut self, label: impl Into<String>, kind: ActionKind) -> Self {
        self.actions.push(RecommendationAction::new(label, kind));
        self
    }
}

/// Everything an agent needs for one analysis cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentContext {
    pub profile: UserProfile,

    /// Most recent daily record
    pub today: DailyMetrics,

    /// Up to seven most recent records, oldest first, including `today`
    pub last_7_days: Vec<DailyMetrics>,

    pub baseline: Baseline,

    /// Full history, oldest first
    pub all_metrics: Vec<DailyMetrics>,
}

impl AgentContext {
    /// Assemble a context from the stored history.
    ///
    /// Records are sanitized and ordered by date. Returns `None` when there is
    /// no record to treat as today.
    pub fn from_history(profile: UserProfile, history: &[DailyMetrics]) -> Option<Self> {
        let mut all_metrics: Vec<DailyMetrics> =
            history.iter().map(DailyMetrics::sanitized).collect();
        all_metrics.sort_by_key(|m| m.date);

        let today = all_metrics.last()?.clone();
        let last_7_days = last_n(&all_metrics, WEEK_WINDOW_DAYS).to_vec();
        let baseline = compute_baseline(&all_metrics);

        Some(Self {
            profile,
            today,
            last_7_days,
            baseline,
            all_metrics,
        })
    }
}

/// Slice holding at most the last `n` records
pub fn last_n<T>(records: &[T], n: usize) -> &[T] {
    &records[records.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_day(day: u32) -> DailyMetrics {
        DailyMetrics {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            sleep_hours: 7.5,
            sleep_efficiency: 88.0,
            hrv: 62.0,
            resting_hr: 58.0,
            steps: 9000,
            workout_minutes: 45,
            training_load: 50.0,
            stress_score: 40.0,
            mood_score: 4,
            energy_score: 4,
        }
    }

    #[test]
    fn test_sanitize_replaces_invalid_values() {
        let mut day = sample_day(1);
        day.sleep_hours = -2.0;
        day.sleep_efficiency = f64::NAN;
        day.hrv = 0.0;
        day.resting_hr = f64::INFINITY;
        day.stress_score = 140.0;
        day.mood_score = 0;
        day.energy_score = 9;

        assert!(!day.is_valid());
        let clean = day.sanitized();
        assert_eq!(clean.sleep_hours, 0.0);
        assert_eq!(clean.sleep_efficiency, 0.0);
        assert_eq!(clean.hrv, 60.0);
        assert_eq!(clean.resting_hr, 60.0);
        assert_eq!(clean.stress_score, 100.0);
        assert_eq!(clean.mood_score, 1);
        assert_eq!(clean.energy_score, 5);
        assert!(clean.is_valid());
    }

    #[test]
    fn test_metrics_json_uses_camel_case() {
        let json = serde_json::to_string(&sample_day(2)).unwrap();
        assert!(json.contains("\"sleepHours\":7.5"));
        assert!(json.contains("\"restingHr\":58.0"));
        assert!(json.contains("\"date\":\"2024-03-02\""));
    }

    #[test]
    fn test_context_from_history_orders_and_windows() {
        let mut history: Vec<DailyMetrics> = (1..=10).rev().map(sample_day).collect();
        history[0].hrv = 70.0; // March 10th

        let ctx = AgentContext::from_history(UserProfile::default(), &history).unwrap();
        assert_eq!(ctx.today.date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(ctx.today.hrv, 70.0);
        assert_eq!(ctx.last_7_days.len(), 7);
        assert_eq!(
            ctx.last_7_days[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
        assert_eq!(ctx.all_metrics.len(), 10);
        assert_eq!(ctx.baseline.days_used, 10);
    }

    #[test]
    fn test_context_requires_history() {
        assert!(AgentContext::from_history(UserProfile::default(), &[]).is_none());
    }

    #[test]
    fn test_recommendation_ids_are_unique() {
        let a = AgentRecommendation::new(
            "sleep",
            RecommendationType::Sleep,
            "t",
            "r",
            Priority::Low,
        );
        let b = AgentRecommendation::new(
            "sleep",
            RecommendationType::Sleep,
            "t",
            "r",
            Priority::Low,
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_recommendation_serializes_type_field() {
        let rec = AgentRecommendation::new(
            "fitness-coach",
            RecommendationType::Training,
            "Go train",
            "Readiness is high",
            Priority::Medium,
        )
        .with_action("Schedule", ActionKind::Accept);
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["type"], "training");
        assert_eq!(value["priority"], "medium");
        assert_eq!(value["actions"][0]["kind"], "accept");
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}
