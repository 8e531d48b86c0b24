use async_trait::async_trait;

use super::{Agent, AgentInfo};
use crate::baseline::window_mean;
use crate::error::AgentError;
use crate::models::{
    ActionKind, AgentContext, AgentRecommendation, Priority, RecommendationType,
    WEEK_WINDOW_DAYS,
};

/// Accumulated weekly shortfall that warrants an alert (hours)
const SLEEP_DEBT_ALERT_HOURS: f64 = 3.0;
/// Weekly average efficiency below which sleep quality is flagged
const LOW_EFFICIENCY: f64 = 80.0;

/// Watches sleep debt and sleep efficiency over the last week
pub struct SleepAgent {
    info: AgentInfo,
}

impl Default for SleepAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl SleepAgent {
    pub const ID: &'static str = "sleep";

    pub fn new() -> Self {
        Self {
            info: AgentInfo::new(
                Self::ID,
                "Sleep Agent",
                "Tracks sleep debt and sleep efficiency against your baseline",
            ),
        }
    }

    /// Hours slept below a full week at the baseline duration.
    ///
    /// The target always spans seven nights, so nights missing from a short
    /// history count as debt.
    pub fn sleep_debt(ctx: &AgentContext) -> f64 {
        let target = ctx.baseline.sleep_hours * WEEK_WINDOW_DAYS as f64;
        let actual: f64 = ctx.last_7_days.iter().map(|m| m.sleep_hours).sum();
        target - actual
    }
}

#[async_trait]
impl Agent for SleepAgent {
    fn info(&self) -> &AgentInfo {
        &self.info
    }

    async fn analyze(&self, ctx: &AgentContext) -> Result<Vec<AgentRecommendation>, AgentError> {
        let mut recommendations = Vec::new();

        let debt = Self::sleep_debt(ctx);
        if debt > SLEEP_DEBT_ALERT_HOURS {
            recommendations.push(
                AgentRecommendation::new(
                    &self.info.name,
                    RecommendationType::Sleep,
                    "Sleep debt is building up",
                    format!(
                        "You are {:.1}h short of a full week at your usual {:.1}h. \
                         Aim for an earlier bedtime for the next few nights.",
                        debt, ctx.baseline.sleep_hours
                    ),
                    Priority::High,
                )
                .with_action("Plan an early night", ActionKind::Accept)
                .with_action("Remind me later", ActionKind::Snooze),
            );
        }

        let avg_efficiency = window_mean(&ctx.last_7_days, |m| m.sleep_efficiency);
        if !ctx.last_7_days.is_empty() && avg_efficiency < LOW_EFFICIENCY {
            recommendations.push(
                AgentRecommendation::new(
                    &self.info.name,
                    RecommendationType::Sleep,
                    "Sleep efficiency below 80%",
                    format!(
                        "Your average sleep efficiency this week is {:.0}%. Keep a \
                         consistent schedule, a cool dark room, and no caffeine after 2 PM.",
                        avg_efficiency
                    ),
                    Priority::Medium,
                )
                .with_action("Review sleep hygiene", ActionKind::Accept)
                .with_action("Dismiss", ActionKind::Reject),
            );
        }

        tracing::debug!(
            agent = Self::ID,
            sleep_debt = debt,
            avg_efficiency,
            count = recommendations.len(),
            "sleep analysis complete"
        );
        Ok(recommendations)
    }
}
