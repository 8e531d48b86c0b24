use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use vitalrs::agents::RemoteAiConfig;
use vitalrs::readiness::ReadinessBand;
use vitalrs::what_if::WHAT_IF_OPTIONS;
use vitalrs::{
    compute_baseline, compute_burnout_risk, compute_readiness, detect_anomalies, logging,
    simulate_what_if, AgentContext, AgentRecommendation, AppConfig, LogFormat,
    LogLevel, MetricsSource, Priority, RiskLevel, SourceError, VitalRsError,
};

/// VitalRS - Readiness and Recovery Insights
///
/// Derives a rolling baseline, readiness score, burnout risk and anomaly
/// alerts from daily health metrics, and runs rule-based agents that turn
/// them into recommendations.
#[derive(Parser)]
#[command(name = "vitalrs")]
#[command(author = "VitalRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Readiness and recovery insights from daily health metrics", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Daily metrics file (JSON or CSV), overrides the configured path
    #[arg(short, long, value_name = "FILE", global = true)]
    metrics: Option<PathBuf>,

    /// User profile file (JSON or TOML), overrides the configured path
    #[arg(short, long, value_name = "FILE", global = true)]
    profile: Option<PathBuf>,

    /// Increase verbosity of log output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,

    /// Print results as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the rolling 14-day baseline
    Baseline,

    /// Score today's readiness
    Readiness,

    /// Assess burnout risk over the last week
    Burnout,

    /// List today's deviations from baseline
    Anomalies,

    /// Estimate the effect of an activity on recovery
    WhatIf {
        /// Activity description, e.g. "HIIT session"
        option: Option<String>,

        /// List the preset options
        #[arg(short, long)]
        list: bool,
    },

    /// Run all configured agents and print their recommendations
    Analyze {
        /// Seed for reproducible session suggestions
        #[arg(long)]
        seed: Option<u64>,

        /// Remote recommendation endpoint to include
        #[arg(long, value_name = "URL")]
        remote: Option<String>,
    },

    /// List the configured agents
    Agents,

    /// Show or initialise the configuration file
    Config {
        /// Write the current configuration to the default location
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    logging::init_logging(&log_config)?;

    match run(&cli, config).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<VitalRsError>() {
            Some(vital_err) => {
                tracing::event!(
                    tracing::Level::DEBUG,
                    severity = ?vital_err.severity(),
                    error = %vital_err,
                    "command failed"
                );
                eprintln!("{}", vital_err.user_message().red());
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}

async fn run(cli: &Cli, mut config: AppConfig) -> Result<()> {
    match &cli.command {
        Commands::Baseline => {
            let (_, history) = load(cli, &config)?;
            let baseline = compute_baseline(&history);
            if cli.json {
                return print_json(&baseline);
            }
            println!("{}", "Baseline".cyan().bold());
            if baseline.is_default() {
                println!("  {}", "No history yet, showing population defaults".dimmed());
            } else {
                println!("  Days averaged:    {}", baseline.days_used);
            }
            println!("  HRV:              {:.1} ms", baseline.hrv);
            println!("  Resting HR:       {:.1} bpm", baseline.resting_hr);
            println!("  Sleep:            {:.2} h", baseline.sleep_hours);
            println!("  Sleep efficiency: {:.1}%", baseline.sleep_efficiency);
            println!("  Stress:           {:.0}", baseline.stress_score);
        }

        Commands::Readiness => {
            let ctx = context(cli, &config)?;
            let readiness = compute_readiness(&ctx.today, &ctx.baseline, &ctx.last_7_days);
            if cli.json {
                return print_json(&readiness);
            }
            let score = format!("{}", readiness.score);
            let score = match readiness.band() {
                ReadinessBand::Low => score.red(),
                ReadinessBand::Moderate => score.yellow(),
                ReadinessBand::High => score.green(),
            };
            println!("{} {} / 100", "Readiness for".cyan().bold(), ctx.today.date);
            println!("  Score: {}", score.bold());
            for reason in &readiness.explanation {
                println!("  • {}", reason);
            }
        }

        Commands::Burnout => {
            let ctx = context(cli, &config)?;
            let risk = compute_burnout_risk(&ctx.last_7_days, &ctx.baseline);
            if cli.json {
                return print_json(&risk);
            }
            let level = match risk.level {
                RiskLevel::Green => risk.level.to_string().green(),
                RiskLevel::Yellow => risk.level.to_string().yellow(),
                RiskLevel::Red => risk.level.to_string().red(),
            };
            println!(
                "{} {} ({}, score {})",
                "Burnout risk:".cyan().bold(),
                level.bold(),
                risk.level.label(),
                risk.risk_score
            );
            println!("  Why:");
            for reason in &risk.rationale {
                println!("    • {}", reason);
            }
            println!("  What to do:");
            for action in &risk.actions {
                println!("    • {}", action);
            }
        }

        Commands::Anomalies => {
            let ctx = context(cli, &config)?;
            let anomalies = detect_anomalies(&ctx.today, &ctx.baseline);
            if cli.json {
                return print_json(&anomalies);
            }
            if anomalies.is_empty() {
                println!("{}", "✓ No anomalies today".green());
            }
            for anomaly in anomalies {
                println!(
                    "{} {}",
                    format!("⚠ {}", anomaly.metric).yellow().bold(),
                    anomaly.deviation
                );
                println!("    Cause: {}", anomaly.cause);
                println!("    Try:   {}", anomaly.suggestion);
            }
        }

        Commands::WhatIf { option, list } => {
            if *list || option.is_none() {
                println!("{}", "Preset options:".cyan().bold());
                for preset in WHAT_IF_OPTIONS {
                    println!("  • {}", preset);
                }
                return Ok(());
            }
            let label = option.as_deref().unwrap_or_default();
            let ctx = context(cli, &config)?;
            let outcome = simulate_what_if(label, &ctx.baseline, &ctx.today);
            if cli.json {
                return print_json(&outcome);
            }
            println!("{} {}", "What if:".cyan().bold(), label);
            println!("  Readiness: {:+}", outcome.readiness_delta);
            println!("  Sleep:     {:+.1} h", outcome.sleep_delta);
            println!("  Recovery:  {:+}", outcome.recovery_delta);
            println!("  {}", outcome.explanation.dimmed());
        }

        Commands::Analyze { seed, remote } => {
            if seed.is_some() {
                config.agents.rng_seed = *seed;
            }
            if let Some(endpoint) = remote {
                config.agents.remote = Some(RemoteAiConfig {
                    endpoint: endpoint.clone(),
                    ..RemoteAiConfig::default()
                });
            }
            let ctx = context(cli, &config)?;
            let orchestrator = config.build_orchestrator()?;
            let report = orchestrator.analyze_with_report(&ctx).await;
            if cli.json {
                return print_json(&report);
            }

            println!(
                "{} {} agents, {} recommendations",
                "Analysis:".cyan().bold(),
                report.agents_run,
                report.recommendations.len()
            );
            if !report.recommendations.is_empty() {
                print_recommendations(&report.recommendations);
            }
            for failure in &report.failures {
                println!("  {} {}", "skipped:".yellow(), failure);
            }
        }

        Commands::Agents => {
            let orchestrator = config.build_orchestrator()?;
            for info in orchestrator.agents() {
                println!("{} {}", info.id.green().bold(), format!("({})", info.name).dimmed());
                println!("    {}", info.description);
            }
        }

        Commands::Config { init } => {
            if *init {
                let path = config.save_default()?;
                println!("{} {}", "✓ Configuration written to".green(), path.display());
            } else {
                let content = toml::to_string_pretty(&config)
                    .context("Failed to serialize configuration")?;
                println!("{}", content);
            }
        }
    }

    Ok(())
}

/// Profile and ordered history from the configured (or overridden) files
fn load(cli: &Cli, config: &AppConfig) -> Result<(vitalrs::UserProfile, Vec<vitalrs::DailyMetrics>)> {
    let source = config.file_source(cli.metrics.as_deref(), cli.profile.as_deref());
    let history = source.load_metrics()?;
    let profile = source.load_profile()?;
    Ok((profile, history))
}

fn context(cli: &Cli, config: &AppConfig) -> Result<AgentContext> {
    let (profile, history) = load(cli, config)?;
    AgentContext::from_history(profile, &history)
        .ok_or_else(|| VitalRsError::from(SourceError::Empty).into())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Tabled)]
struct RecommendationRow {
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Recommendation")]
    title: String,
}

fn print_recommendations(recommendations: &[AgentRecommendation]) {
    let rows: Vec<RecommendationRow> = recommendations
        .iter()
        .map(|rec| RecommendationRow {
            priority: match rec.priority {
                Priority::High => rec.priority.to_string().red().to_string(),
                Priority::Medium => rec.priority.to_string().yellow().to_string(),
                Priority::Low => rec.priority.to_string(),
            },
            agent: rec.agent.clone(),
            kind: rec.kind.to_string(),
            title: rec.title.clone(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));

    for rec in recommendations {
        println!("{} {}", "▸".cyan(), rec.title.bold());
        println!("  {}", rec.rationale);
    }
}
