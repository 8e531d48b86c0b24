use async_trait::async_trait;

use super::{Agent, AgentInfo};
use crate::anomaly::detect_anomalies;
use crate::burnout::{compute_burnout_risk, RiskLevel};
use crate::error::AgentError;
use crate::models::{
    ActionKind, AgentContext, AgentRecommendation, Priority, RecommendationType,
};

/// Daily stress score that earns its own recommendation
const HIGH_STRESS_TODAY: f64 = 70.0;

/// Surfaces burnout risk, acute stress, and single-day anomalies
pub struct BurnoutGuardianAgent {
    info: AgentInfo,
}

impl Default for BurnoutGuardianAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl BurnoutGuardianAgent {
    pub const ID: &'static str = "burnout-guardian";

    pub fn new() -> Self {
        Self {
            info: AgentInfo::new(
                Self::ID,
                "Burnout Guardian",
                "Watches weekly overload trends, stress and anomalies",
            ),
        }
    }
}

#[async_trait]
impl Agent for BurnoutGuardianAgent {
    fn info(&self) -> &AgentInfo {
        &self.info
    }

    async fn analyze(&self, ctx: &AgentContext) -> Result<Vec<AgentRecommendation>, AgentError> {
        let mut recommendations = Vec::new();
        let agent = self.info.name.as_str();

        let risk = compute_burnout_risk(&ctx.last_7_days, &ctx.baseline);
        if risk.level != RiskLevel::Green {
            let priority = if risk.level == RiskLevel::Red {
                Priority::High
            } else {
                Priority::Medium
            };
            recommendations.push(
                AgentRecommendation::new(
                    agent,
                    RecommendationType::Burnout,
                    format!("Burnout risk: {} ({})", risk.level, risk.level.label()),
                    format!(
                        "{}. Suggested: {}.",
                        risk.rationale.join("; "),
                        risk.actions.join("; ")
                    ),
                    priority,
                )
                .with_action("Plan a lighter week", ActionKind::Accept)
                .with_action("Remind me tomorrow", ActionKind::Snooze),
            );
        }

        if ctx.today.stress_score > HIGH_STRESS_TODAY {
            recommendations.push(
                AgentRecommendation::new(
                    agent,
                    RecommendationType::Stress,
                    "Elevated stress today",
                    format!(
                        "Stress score is {:.0} today. Schedule a 10 minute breathing \
                         break or a short walk between commitments.",
                        ctx.today.stress_score
                    ),
                    Priority::Medium,
                )
                .with_action("Start breathing exercise", ActionKind::Accept)
                .with_action("Not now", ActionKind::Snooze),
            );
        }

        for anomaly in detect_anomalies(&ctx.today, &ctx.baseline) {
            recommendations.push(
                AgentRecommendation::new(
                    agent,
                    RecommendationType::Anomaly,
                    format!("{} anomaly ({})", anomaly.metric, anomaly.deviation),
                    format!("Likely cause: {}. {}.", anomaly.cause, anomaly.suggestion),
                    Priority::High,
                )
                .with_action("Acknowledge", ActionKind::Accept),
            );
        }

        tracing::debug!(
            agent = Self::ID,
            level = %risk.level,
            count = recommendations.len(),
            "burnout guardian analysis complete"
        );
        Ok(recommendations)
    }
}
