use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Mutex;

use super::{Agent, AgentInfo};
use crate::burnout::{compute_burnout_risk, RiskLevel};
use crate::error::AgentError;
use crate::models::{
    ActionKind, AgentContext, AgentRecommendation, Priority, RecommendationType,
};
use crate::readiness::compute_readiness;

const REST_READINESS: u8 = 40;
const TRAIN_READINESS: u8 = 80;
const MAX_TRAINING_LOAD_FOR_SESSION: f64 = 60.0;

/// Intensity suggested on high-readiness days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionIntensity {
    Hiit,
    Strength,
}

impl fmt::Display for SessionIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionIntensity::Hiit => write!(f, "HIIT"),
            SessionIntensity::Strength => write!(f, "Strength"),
        }
    }
}

/// Turns readiness and burnout risk into rest or training advice.
///
/// The session intensity on good days is drawn at random so users get some
/// variety. Seed the agent with [`FitnessCoachAgent::with_seed`] for a
/// reproducible sequence.
pub struct FitnessCoachAgent {
    info: AgentInfo,
    rng: Mutex<ChaCha8Rng>,
}

impl Default for FitnessCoachAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl FitnessCoachAgent {
    pub const ID: &'static str = "fitness-coach";

    /// Coach with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Coach with a deterministic random source
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            info: AgentInfo::new(
                Self::ID,
                "Fitness Coach",
                "Suggests rest or training based on readiness and burnout risk",
            ),
            rng: Mutex::new(rng),
        }
    }

    fn pick_intensity(&self) -> Result<SessionIntensity, AgentError> {
        let mut rng = self.rng.lock().map_err(|_| AgentError::Failed {
            agent: Self::ID.to_string(),
            reason: "random source poisoned".to_string(),
        })?;
        Ok(if rng.gen_bool(0.5) {
            SessionIntensity::Hiit
        } else {
            SessionIntensity::Strength
        })
    }
}

#[async_trait]
impl Agent for FitnessCoachAgent {
    fn info(&self) -> &AgentInfo {
        &self.info
    }

    async fn analyze(&self, ctx: &AgentContext) -> Result<Vec<AgentRecommendation>, AgentError> {
        let readiness = compute_readiness(&ctx.today, &ctx.baseline, &ctx.last_7_days);
        let risk = compute_burnout_risk(&ctx.last_7_days, &ctx.baseline);
        let agent = self.info.name.as_str();

        let mut recommendations = Vec::new();
        if risk.level == RiskLevel::Red || readiness.score < REST_READINESS {
            recommendations.push(
                AgentRecommendation::new(
                    agent,
                    RecommendationType::Recovery,
                    "Take a rest day",
                    format!(
                        "Readiness is {} and burnout risk is {}. Swap today's session \
                         for a walk, mobility work, or complete rest.",
                        readiness.score, risk.level
                    ),
                    Priority::High,
                )
                .with_action("Switch to rest day", ActionKind::Accept)
                .with_action("Train anyway", ActionKind::Reject),
            );
        }

        if readiness.score >= TRAIN_READINESS
            && ctx.today.training_load < MAX_TRAINING_LOAD_FOR_SESSION
        {
            let intensity = self.pick_intensity()?;
            recommendations.push(
                AgentRecommendation::new(
                    agent,
                    RecommendationType::Training,
                    format!("Good day for a {} session", intensity),
                    format!(
                        "Readiness is {} with a moderate recent load ({:.0}). \
                         Your body is ready for quality work.",
                        readiness.score, ctx.today.training_load
                    ),
                    Priority::Medium,
                )
                .with_action("Add to plan", ActionKind::Accept)
                .with_action("Later", ActionKind::Snooze),
            );
        }

        tracing::debug!(
            agent = Self::ID,
            readiness = readiness.score,
            level = %risk.level,
            count = recommendations.len(),
            "fitness coach analysis complete"
        );
        Ok(recommendations)
    }
}
