//! Agent backed by an external recommendation service
//!
//! The service receives `{context, focus, model}` and answers with
//! `{recommendations: [...]}`. Any failure (connection, timeout, rate limit,
//! malformed body) is logged and replaced by a local rule-based
//! recommendation so the cycle never comes back empty-handed.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Agent, AgentInfo};
use crate::error::AgentError;
use crate::models::{
    ActionKind, AgentContext, AgentRecommendation, Priority, RecommendationAction,
    RecommendationType,
};
use crate::readiness::compute_readiness;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAiConfig {
    /// Full URL of the recommendation endpoint
    pub endpoint: String,
    /// Model identifier forwarded to the service
    pub model: String,
    /// What the service should concentrate on, e.g. "recovery"
    pub focus: String,
    pub timeout_secs: u64,
}

impl Default for RemoteAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8787/recommendations".to_string(),
            model: "default".to_string(),
            focus: "general".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Serialize)]
struct RemoteRequest<'a> {
    context: &'a AgentContext,
    focus: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct RemoteResponse {
    #[serde(default)]
    recommendations: Vec<RemoteRecommendation>,
}

fn default_kind() -> RecommendationType {
    RecommendationType::General
}

fn default_priority() -> Priority {
    Priority::Medium
}

/// Recommendation as sent by the service; ids and timestamps are assigned locally
#[derive(Deserialize)]
struct RemoteRecommendation {
    #[serde(rename = "type", default = "default_kind")]
    kind: RecommendationType,
    title: String,
    #[serde(default)]
    rationale: String,
    #[serde(default = "default_priority")]
    priority: Priority,
    #[serde(default)]
    actions: Vec<RecommendationAction>,
}

impl RemoteRecommendation {
    fn into_recommendation(self, agent: &str) -> AgentRecommendation {
        let mut rec =
            AgentRecommendation::new(agent, self.kind, self.title, self.rationale, self.priority);
        rec.actions = self.actions;
        rec
    }
}

/// Agent that delegates to a remote recommendation service
pub struct RemoteAiAgent {
    info: AgentInfo,
    client: Client,
    config: RemoteAiConfig,
}

impl RemoteAiAgent {
    pub const ID: &'static str = "remote-ai";

    /// Create the agent and its HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RemoteAiConfig) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Remote {
                agent: Self::ID.to_string(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        tracing::info!(
            endpoint = %config.endpoint,
            model = %config.model,
            "remote AI agent configured"
        );

        Ok(Self {
            info: AgentInfo::new(
                Self::ID,
                "AI Coach",
                format!("Remote recommendations focused on {}", config.focus),
            ),
            client,
            config,
        })
    }

    pub fn config(&self) -> &RemoteAiConfig {
        &self.config
    }

    fn remote_error(&self, reason: impl std::fmt::Display) -> AgentError {
        AgentError::Remote {
            agent: Self::ID.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Ask the remote service for recommendations, without fallback
    pub async fn fetch(&self, ctx: &AgentContext) -> Result<Vec<AgentRecommendation>, AgentError> {
        let request = RemoteRequest {
            context: ctx,
            focus: &self.config.focus,
            model: &self.config.model,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.remote_error(e))?
            .error_for_status()
            .map_err(|e| self.remote_error(e))?;

        let body: RemoteResponse = response.json().await.map_err(|e| self.remote_error(e))?;
        Ok(parse_recommendations(body, &self.info.name))
    }

    /// Local stand-in used when the service is unavailable
    pub fn fallback(&self, ctx: &AgentContext) -> Vec<AgentRecommendation> {
        let readiness = compute_readiness(&ctx.today, &ctx.baseline, &ctx.last_7_days);
        let (title, priority) = match readiness.score {
            0..=39 => ("Low readiness: keep today easy", Priority::High),
            40..=69 => ("Moderate readiness: train with care", Priority::Medium),
            _ => ("Ready to train", Priority::Low),
        };

        vec![AgentRecommendation::new(
            &self.info.name,
            RecommendationType::General,
            title,
            format!(
                "Readiness {}/100. {}.",
                readiness.score,
                readiness.explanation.join("; ")
            ),
            priority,
        )
        .with_action("OK", ActionKind::Accept)]
    }
}

fn parse_recommendations(body: RemoteResponse, agent: &str) -> Vec<AgentRecommendation> {
    body.recommendations
        .into_iter()
        .map(|r| r.into_recommendation(agent))
        .collect()
}

#[async_trait]
impl Agent for RemoteAiAgent {
    fn info(&self) -> &AgentInfo {
        &self.info
    }

    async fn analyze(&self, ctx: &AgentContext) -> Result<Vec<AgentRecommendation>, AgentError> {
        match self.fetch(ctx).await {
            Ok(recommendations) => Ok(recommendations),
            Err(err) => {
                tracing::warn!(
                    agent = Self::ID,
                    error = %err,
                    "remote AI unavailable, using fallback"
                );
                Ok(self.fallback(ctx))
            }
        }
    }
}
