//! SustainAd — carbon-aware creative selection and retention proof lab.
//!
//! Runs a session against the demo data and prints the results as JSON on
//! stdout. Structured logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use sustainad_core::config::AppConfig;
use sustainad_core::random::session_source;
use sustainad_retention::engine::today;
use sustainad_retention::ProofLab;
use sustainad_sustainability::{CarbonOptimizer, CreativeType};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sustainad")]
#[command(about = "Carbon-aware creative selection and retention incrementality")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "SUSTAINAD_CONFIG")]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible session (overrides config)
    #[arg(long, env = "SUSTAINAD__SESSION__RNG_SEED")]
    seed: Option<u64>,

    /// Transparency log capacity (overrides config)
    #[arg(long)]
    log_capacity: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve impressions through the carbon optimizer
    Serve {
        /// Number of impressions to serve
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Performance vs sustainability slider, 0-100 (overrides config)
        #[arg(short, long)]
        slider: Option<u8>,

        /// Extra creative as NAME:TYPE:SCORE, e.g. "Autumn Banner:image:70"
        #[arg(long = "creative", value_parser = parse_creative)]
        creatives: Vec<CreativeArg>,

        /// Start without the demo creatives
        #[arg(long, default_value_t = false)]
        empty: bool,
    },

    /// Score the demo creatives at a slider position without serving
    Preview {
        #[arg(short, long)]
        slider: Option<u8>,
    },

    /// Run the retention proof lab
    ProofLab {
        /// Brief action indices to apply, in order
        #[arg(long = "apply")]
        apply: Vec<usize>,

        /// Weeks to append to the lift series
        #[arg(long, default_value_t = 0)]
        append_weeks: usize,
    },
}

#[derive(Debug, Clone)]
struct CreativeArg {
    name: String,
    creative_type: CreativeType,
    performance_score: f64,
}

fn parse_creative(raw: &str) -> Result<CreativeArg, String> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(score), Some(kind), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected NAME:TYPE:SCORE, got {raw:?}"));
    };
    let performance_score = score
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid score {score:?}: {e}"))?;
    Ok(CreativeArg {
        name: name.to_string(),
        creative_type: kind.trim().parse()?,
        performance_score,
    })
}

/// An explicit config file must load. Without one, environment-only loading
/// falls back to defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(Some(path))
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sustainad=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;

    if let Some(seed) = cli.seed {
        config.session.rng_seed = Some(seed);
    }
    if let Some(capacity) = cli.log_capacity {
        config.session.log_capacity = capacity;
    }

    info!(
        log_capacity = config.session.log_capacity,
        seeded = config.session.rng_seed.is_some(),
        "Configuration loaded"
    );

    let mut rng = session_source(config.session.rng_seed);

    let output = match cli.command {
        Commands::Serve {
            count,
            slider,
            creatives,
            empty,
        } => {
            let mut optimizer = if empty {
                CarbonOptimizer::new(&config.optimizer, &config.session)
            } else {
                CarbonOptimizer::with_demo_creatives(&config.optimizer, &config.session)
            };
            if let Some(slider) = slider {
                optimizer.set_slider(slider);
            }
            for creative in creatives {
                optimizer.add_creative(
                    &creative.name,
                    creative.creative_type,
                    creative.performance_score,
                )?;
            }

            let decisions = optimizer.serve_many(count, &mut *rng);
            info!(
                session_id = %optimizer.session_id(),
                served = decisions.len(),
                "serve run complete"
            );
            json!({
                "session_id": optimizer.session_id(),
                "slider": optimizer.slider(),
                "decisions": decisions,
                "creatives": optimizer.creatives(),
                "aggregates": optimizer.aggregates(),
                "report": optimizer.report(),
                "history": optimizer.history(),
                "log": optimizer.logs(),
            })
        }
        Commands::Preview { slider } => {
            let mut optimizer =
                CarbonOptimizer::with_demo_creatives(&config.optimizer, &config.session);
            if let Some(slider) = slider {
                optimizer.set_slider(slider);
            }
            json!({
                "slider": optimizer.slider(),
                "scores": optimizer.preview(),
            })
        }
        Commands::ProofLab {
            apply,
            append_weeks,
        } => {
            let mut lab = ProofLab::demo(
                &config.retention,
                &config.session,
                today(),
                &mut *rng,
            );
            let outcomes: Vec<_> = apply.into_iter().map(|i| lab.apply_action(i)).collect();
            for _ in 0..append_weeks {
                lab.append_week(&mut *rng);
            }
            json!({
                "snapshot": lab.snapshot(),
                "status_label": lab.incrementality().status.label(),
                "outcomes": outcomes,
            })
        }
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}
