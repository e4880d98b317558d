//! suggesttask - suggest a task for a user utterance over HTTP.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use suggest_service::{parse_addr, serve, AppState, ServiceConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Classify utterances into tasks behind a flaky simulated dependency.
#[derive(Parser, Debug)]
#[command(name = "suggesttask")]
#[command(about = "HTTP service that suggests a task for a user utterance")]
#[command(version)]
struct Args {
    /// Config file (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address (e.g. :8080, 127.0.0.1:3000)
    #[arg(long)]
    listen: Option<String>,

    /// Extra rules file appended after the built-in rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Attempts per dependency call
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Delay between failed attempts, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Default failure probability of the dependency, 0.0 to 1.0
    #[arg(long)]
    failure_probability: Option<f64>,

    /// Seed for reproducible dependency failures
    #[arg(long)]
    seed: Option<u64>,

    /// Classify a single utterance, print the task, and exit
    #[arg(long)]
    classify: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    /// Load the config file, then apply flag overrides.
    fn config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::load(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(rules) = &self.rules {
            config.rules_file = Some(rules.clone());
        }
        if let Some(n) = self.max_attempts {
            config.retry.max_attempts = n;
        }
        if let Some(ms) = self.delay_ms {
            config.retry.delay_ms = ms;
        }
        if let Some(p) = self.failure_probability {
            config.dependency.failure_probability = p;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = args.config()?;
    let state = AppState::from_config(&config)?;

    if let Some(utterance) = &args.classify {
        println!("{}", state.classifier().classify(utterance));
        return Ok(());
    }

    let addr = parse_addr(&config.listen)?;
    info!(
        %addr,
        max_attempts = config.retry.max_attempts,
        delay_ms = config.retry.delay_ms,
        failure_probability = config.dependency.failure_probability,
        latency_ms = config.dependency.latency_ms,
        seeded = config.seed.is_some(),
        "starting suggestTask service"
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    serve(listener, state).await?;
    Ok(())
}
