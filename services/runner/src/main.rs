use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use estimator::{ConfidenceLevel, Seed};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runner::params::{resolve_trials, TrialPolicy};
use runner::{execute, Cli, Config, LogFormat, OutputFormat, RunContext, ScenarioReport};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "runner=info,estimator=info".into());

    // Logs go to stderr; stdout carries only the report
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    tracing::info!(
        service = "runner",
        version = env!("CARGO_PKG_VERSION"),
        "Starting Monte Carlo runner"
    );

    let seed = Seed::from(cli.seed.or(config.simulation.seed));
    let confidence = ConfidenceLevel::try_from(cli.confidence.unwrap_or(config.simulation.confidence))
        .context("Confidence level must be 0.90 or 0.95")?;
    let output = cli.output.unwrap_or(config.output);

    let scenario = cli.command.into_scenario();
    let policy: TrialPolicy = scenario.trial_policy(config.simulation.min_trials);
    let trials = resolve_trials(cli.trials.as_deref(), policy).settle("trials");

    tracing::info!(
        scenario = scenario.name(),
        seed = %seed,
        trials,
        confidence = %confidence,
        "Configuration loaded"
    );

    let started_at = Utc::now();
    let mut ctx = RunContext::new(seed, trials, confidence);
    let findings = execute(scenario.as_ref(), &mut ctx)
        .with_context(|| format!("Scenario `{}` failed", scenario.name()))?;

    let report = ScenarioReport::new(scenario.name(), scenario.question(), seed, trials, started_at, findings);
    match output {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.render_json()?),
    }
    Ok(())
}
