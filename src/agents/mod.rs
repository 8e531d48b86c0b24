//! Rule-based recommendation agents
//!
//! Every agent reads the same [`AgentContext`] and returns zero or more
//! recommendations. Agents never see each other's output; the
//! [`Orchestrator`](crate::orchestrator::Orchestrator) merges their results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::models::{AgentContext, AgentRecommendation};

pub mod burnout_guardian;
pub mod fitness_coach;
pub mod planner;
pub mod remote;
pub mod sleep;

pub use burnout_guardian::BurnoutGuardianAgent;
pub use fitness_coach::{FitnessCoachAgent, SessionIntensity};
pub use planner::PlannerAgent;
pub use remote::{RemoteAiAgent, RemoteAiConfig};
pub use sleep::SleepAgent;

/// Identifiers of the built-in local agents, in their default order
pub const BUILTIN_AGENT_IDS: [&str; 4] = [
    SleepAgent::ID,
    BurnoutGuardianAgent::ID,
    FitnessCoachAgent::ID,
    PlannerAgent::ID,
];

/// Fixed identity of an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Registry key
    pub id: String,
    /// Display name, stamped on every recommendation
    pub name: String,
    pub description: String,
}

impl AgentInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A recommendation producer
///
/// Implementations must be stateless apart from their identity (and, for the
/// fitness coach, a random source). Returning `Err` only drops this agent's
/// output for the current cycle.
#[async_trait]
pub trait Agent: Send + Sync {
    fn info(&self) -> &AgentInfo;

    async fn analyze(&self, ctx: &AgentContext) -> Result<Vec<AgentRecommendation>, AgentError>;
}

/// Build a built-in agent by id.
///
/// `rng_seed` only affects the fitness coach.
pub fn builtin_agent(id: &str, rng_seed: Option<u64>) -> Option<Box<dyn Agent>> {
    match id {
        SleepAgent::ID => Some(Box::new(SleepAgent::new())),
        BurnoutGuardianAgent::ID => Some(Box::new(BurnoutGuardianAgent::new())),
        FitnessCoachAgent::ID => Some(Box::new(match rng_seed {
            Some(seed) => FitnessCoachAgent::with_seed(seed),
            None => FitnessCoachAgent::new(),
        })),
        PlannerAgent::ID => Some(Box::new(PlannerAgent::new())),
        _ => None,
    }
}
