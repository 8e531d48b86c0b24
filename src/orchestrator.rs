//! Agent registry and fan-out
//!
//! The orchestrator owns an ordered registry of agents keyed by id. One
//! analysis cycle hands the same context to every agent, awaits them all,
//! and concatenates their output in registration order. A failing or
//! panicking agent contributes nothing to that cycle and does not affect
//! the others.

use futures_util::future::join_all;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use crate::agents::{Agent, AgentInfo};
use crate::error::AgentError;
use crate::models::{AgentContext, AgentRecommendation};

/// Outcome of one analysis cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Merged recommendations in registration order
    pub recommendations: Vec<AgentRecommendation>,

    /// Agents that contributed nothing because they failed
    #[serde(default)]
    pub failures: Vec<AgentError>,

    /// Number of agents invoked
    pub agents_run: usize,

    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl AnalysisReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Ordered registry of agents
#[derive(Default)]
pub struct Orchestrator {
    agents: Vec<Box<dyn Agent>>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Add an agent, keyed by its id.
    ///
    /// Registering an id that already exists replaces that agent in place,
    /// keeping its position, and returns the previous instance.
    pub fn register_agent(&mut self, agent: Box<dyn Agent>) -> Option<Box<dyn Agent>> {
        let id = agent.info().id.clone();
        tracing::debug!(agent = %id, "registering agent");

        match self.position(&id) {
            Some(index) => Some(std::mem::replace(&mut self.agents[index], agent)),
            None => {
                self.agents.push(agent);
                None
            }
        }
    }

    /// Remove an agent by id, returning it if it was registered
    pub fn unregister_agent(&mut self, id: &str) -> Option<Box<dyn Agent>> {
        let index = self.position(id)?;
        tracing::debug!(agent = %id, "unregistering agent");
        Some(self.agents.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&dyn Agent> {
        self.agents
            .iter()
            .find(|a| a.info().id == id)
            .map(|a| a.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Identity of every registered agent, in registration order
    pub fn agents(&self) -> impl Iterator<Item = &AgentInfo> {
        self.agents.iter().map(|a| a.info())
    }

    pub fn agent_ids(&self) -> Vec<String> {
        self.agents().map(|info| info.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.agents.iter().position(|a| a.info().id == id)
    }

    /// Run every agent and return the merged recommendations
    pub async fn analyze(&self, ctx: &AgentContext) -> Vec<AgentRecommendation> {
        self.analyze_with_report(ctx).await.recommendations
    }

    /// Run every agent and report which ones failed
    #[tracing::instrument(skip_all, fields(date = %ctx.today.date, agents = self.agents.len()))]
    pub async fn analyze_with_report(&self, ctx: &AgentContext) -> AnalysisReport {
        let started = Instant::now();

        let runs = self.agents.iter().map(|agent| run_isolated(agent.as_ref(), ctx));
        let outcomes = join_all(runs).await;

        let mut recommendations = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(recs) => recommendations.extend(recs),
                Err(err) => {
                    tracing::warn!(agent = %err.agent(), error = %err, "agent failed, skipping");
                    failures.push(err);
                }
            }
        }

        let report = AnalysisReport {
            recommendations,
            failures,
            agents_run: self.agents.len(),
            duration: started.elapsed(),
        };

        tracing::info!(
            recommendations = report.recommendations.len(),
            failed = report.failures.len(),
            elapsed_ms = report.duration.as_millis() as u64,
            "analysis cycle complete"
        );
        report
    }
}

/// Await one agent, converting a panic into an [`AgentError`]
async fn run_isolated(
    agent: &dyn Agent,
    ctx: &AgentContext,
) -> Result<Vec<AgentRecommendation>, AgentError> {
    match AssertUnwindSafe(agent.analyze(ctx)).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(AgentError::Panicked {
            agent: agent.info().id.clone(),
        }),
    }
}

// Durations are serialized as whole milliseconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
