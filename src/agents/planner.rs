use async_trait::async_trait;

use super::{Agent, AgentInfo};
use crate::error::AgentError;
use crate::models::{
    ActionKind, AgentContext, AgentRecommendation, Chronotype, Priority, RecommendationType,
};
use crate::readiness::compute_readiness;

/// Stress level during an exam phase that triggers study planning
const EXAM_STRESS: f64 = 60.0;
/// Readiness needed before suggesting a training slot
const SCHEDULE_READINESS: u8 = 60;
/// Shortfall against the personal sleep need that triggers a wind-down reminder
const SLEEP_SHORTFALL_HOURS: f64 = 0.5;

/// Fits recovery and training into the user's day
pub struct PlannerAgent {
    info: AgentInfo,
}

impl Default for PlannerAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerAgent {
    pub const ID: &'static str = "planner";

    pub fn new() -> Self {
        Self {
            info: AgentInfo::new(
                Self::ID,
                "Planner",
                "Schedules study blocks, training windows and bedtimes around your chronotype",
            ),
        }
    }

    fn bedtime(chronotype: Chronotype) -> &'static str {
        match chronotype {
            Chronotype::Early => "9:30 PM",
            Chronotype::Normal => "10:30 PM",
            Chronotype::Night => "11:30 PM",
        }
    }
}

#[async_trait]
impl Agent for PlannerAgent {
    fn info(&self) -> &AgentInfo {
        &self.info
    }

    async fn analyze(&self, ctx: &AgentContext) -> Result<Vec<AgentRecommendation>, AgentError> {
        let profile = &ctx.profile;
        let agent = self.info.name.as_str();
        let mut recommendations = Vec::new();

        if profile.exam_phase && ctx.today.stress_score > EXAM_STRESS {
            recommendations.push(
                AgentRecommendation::new(
                    agent,
                    RecommendationType::Schedule,
                    "Block study time with recovery breaks",
                    "Exam phase with elevated stress. Work in 50 minute blocks with \
                     10 minute movement breaks and keep one evening free this week.",
                    Priority::Medium,
                )
                .with_action("Add study blocks", ActionKind::Accept)
                .with_action("Dismiss", ActionKind::Reject),
            );
        }

        let readiness = compute_readiness(&ctx.today, &ctx.baseline, &ctx.last_7_days);
        if profile.training_frequency > 0 && readiness.score >= SCHEDULE_READINESS {
            recommendations.push(
                AgentRecommendation::new(
                    agent,
                    RecommendationType::Schedule,
                    format!("Best training window: {}", profile.chronotype.training_window()),
                    format!(
                        "Readiness is {}. Your chronotype performs best in this window; \
                         you planned {} sessions per week.",
                        readiness.score, profile.training_frequency
                    ),
                    Priority::Low,
                )
                .with_action("Add to calendar", ActionKind::Accept),
            );
        }

        if ctx.today.sleep_hours < profile.baseline_sleep_need - SLEEP_SHORTFALL_HOURS {
            recommendations.push(
                AgentRecommendation::new(
                    agent,
                    RecommendationType::Sleep,
                    format!("Start winding down by {}", Self::bedtime(profile.chronotype)),
                    format!(
                        "You slept {:.1}h against a need of {:.1}h. Dim screens an hour \
                         before bed tonight.",
                        ctx.today.sleep_hours, profile.baseline_sleep_need
                    ),
                    Priority::Low,
                )
                .with_action("Set reminder", ActionKind::Accept)
                .with_action("Skip tonight", ActionKind::Reject),
            );
        }

        tracing::debug!(
            agent = Self::ID,
            count = recommendations.len(),
            "planner analysis complete"
        );
        Ok(recommendations)
    }
}
