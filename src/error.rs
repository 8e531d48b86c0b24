//! Unified error hierarchy for VitalRS
//!
//! The scoring functions never fail; errors only arise at the edges of the
//! engine (loading records, running agents, reading configuration).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all VitalRS operations
#[derive(Debug, Error)]
pub enum VitalRsError {
    /// Metrics/profile loading errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Agent execution errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while loading daily records or the user profile
#[derive(Debug, Error)]
pub enum SourceError {
    /// File not found at specified path
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Format-specific parsing error
    #[error("Parse error in {format}: {reason}")]
    Parse { format: String, reason: String },

    /// Unsupported file format
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Source contained no records
    #[error("No daily metrics available")]
    Empty,
}

/// Errors produced by a single agent during an analysis cycle
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentError {
    /// Rule evaluation failed inside the agent
    #[error("Agent {agent} failed: {reason}")]
    Failed { agent: String, reason: String },

    /// Remote recommendation service failed
    #[error("Remote call from {agent} failed: {reason}")]
    Remote { agent: String, reason: String },

    /// The agent panicked while analyzing
    #[error("Agent {agent} panicked")]
    Panicked { agent: String },
}

impl AgentError {
    /// Identifier of the agent that produced the error
    pub fn agent(&self) -> &str {
        match self {
            AgentError::Failed { agent, .. }
            | AgentError::Remote { agent, .. }
            | AgentError::Panicked { agent } => agent,
        }
    }
}

/// Result type alias for VitalRS operations
pub type Result<T> = std::result::Result<T, VitalRsError>;

impl VitalRsError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VitalRsError::Agent(AgentError::Remote { .. }) | VitalRsError::Io(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VitalRsError::Source(SourceError::Empty) => ErrorSeverity::Info,
            VitalRsError::Source(SourceError::NotFound { .. }) => ErrorSeverity::Warning,
            VitalRsError::Agent(_) => ErrorSeverity::Warning,
            VitalRsError::Validation(_) => ErrorSeverity::Warning,
            VitalRsError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            VitalRsError::Source(SourceError::NotFound { path }) => {
                format!("Could not find data file: {}", path.display())
            }
            VitalRsError::Source(SourceError::Empty) => {
                "No daily metrics recorded yet. Log a few days to get personalised insights."
                    .to_string()
            }
            VitalRsError::Agent(err) => {
                format!(
                    "The {} agent could not produce recommendations this time.",
                    err.agent()
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
