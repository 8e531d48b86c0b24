// Library interface for VitalRS modules
// This allows integration tests to access the core functionality

pub mod agents;
pub mod anomaly;
pub mod baseline;
pub mod burnout;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod readiness;
pub mod source;
pub mod what_if;

// Re-export commonly used types for convenience
pub use agents::{Agent, AgentInfo};
pub use anomaly::{detect_anomalies, Anomaly, AnomalyMetric};
pub use baseline::{compute_baseline, Baseline, BASELINE_WINDOW_DAYS};
pub use burnout::{compute_burnout_risk, BurnoutRisk, RiskLevel};
pub use config::AppConfig;
pub use error::{AgentError, Result, SourceError, VitalRsError};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use orchestrator::{AnalysisReport, Orchestrator};
pub use readiness::{compute_readiness, ReadinessScore};
pub use source::{FileSource, MetricsSource};
pub use what_if::{simulate_what_if, WhatIfOutcome};
