mod api_types;
mod classify;
mod config;
mod export;
mod fallback;
mod ingest;
mod models;
mod orchestrator;
mod render;
mod score;
mod store;
mod themes;
mod weights;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::classify::{Classifier, OracleClient};
use crate::config::Config;
use crate::models::{ItemKind, RawFeedback};
use crate::store::FeedbackStore;

/// Signal Triage - feedback classification and theme dashboard pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (overrides SIGNAL_CONFIG environment variable)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify raw feedback from a JSONL file (or stdin) and persist it
    Ingest {
        /// Raw feedback JSONL; reads stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Skip the oracle and classify with the keyword fallback only
        #[arg(long)]
        offline: bool,
    },
    /// Generate mock feedback and run it through the ingest path
    Seed {
        #[arg(long, default_value_t = 100)]
        count: usize,

        /// RNG seed; identical seeds generate identical feedback
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Skip the oracle and classify with the keyword fallback only
        #[arg(long)]
        offline: bool,
    },
    /// Aggregate stored items into the ranked report and dashboard bundle
    Report {
        /// Directory for the exported JSON bundle
        #[arg(short, long, default_value = "out")]
        output_dir: PathBuf,

        /// Only include items with this exact theme key
        #[arg(long)]
        theme: Option<String>,

        /// Only include bugs or feedback
        #[arg(long)]
        kind: Option<ItemKind>,
    },
}

fn resolve_config_path(cli_path: Option<&str>) -> (PathBuf, bool) {
    if let Some(p) = cli_path {
        debug!("Using config file from --config argument: {}", p);
        return (PathBuf::from(p), true);
    }
    if let Ok(p) = std::env::var("SIGNAL_CONFIG") {
        debug!("Using config file from SIGNAL_CONFIG: {}", p);
        return (PathBuf::from(p), true);
    }
    (PathBuf::from("signal.yaml"), false)
}

/// Load config from the resolved path. An explicitly named file must
/// exist; the default path may be absent, in which case defaults apply
/// and the oracle-dependent commands check for the endpoint themselves.
fn load_config(path: &std::path::Path, explicit: bool) -> Result<Config> {
    if path.exists() {
        let cfg = Config::load(path)?;
        debug!("Config loaded - path={}", path.display());
        Ok(cfg)
    } else if explicit {
        Err(anyhow::anyhow!("config file not found at {}", path.display()))
    } else {
        debug!("No config file at {} - using defaults", path.display());
        Ok(Config::default())
    }
}

fn build_classifier(cfg: &Config, offline: bool, config_path: &std::path::Path) -> Result<Classifier> {
    if offline {
        info!("Offline mode - oracle disabled, keyword fallback only");
        return Ok(Classifier::Offline);
    }
    if cfg.api_base.is_none() {
        return Err(anyhow::anyhow!(
            "oracle config not found at {}\n\
             Use --config to specify a config file, set SIGNAL_CONFIG, or pass --offline.\n\
             Example signal.yaml:\n\
             api_base: \"http://localhost:8787\"\napi_key: \"YOUR_KEY\"\nmodel: \"llama-3.1-8b\"\n",
            config_path.display()
        ));
    }
    Ok(Classifier::Oracle(OracleClient::new(cfg)?))
}

fn read_raw_feedback(file: Option<&PathBuf>) -> Result<Vec<RawFeedback>> {
    let (contents, source) = match file {
        Some(path) => (
            std::fs::read_to_string(path)
                .with_context(|| format!("reading feedback file {}", path.display()))?,
            path.display().to_string(),
        ),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading feedback from stdin")?;
            (buf, "stdin".to_string())
        }
    };

    let mut raws = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawFeedback>(line) {
            Ok(raw) => raws.push(raw),
            Err(e) => warn!(
                "Skipped malformed input line - source={}, line={}, error={}",
                source,
                idx + 1,
                e
            ),
        }
    }
    info!("Raw feedback read - source={}, items={}", source, raws.len());
    Ok(raws)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    info!("Starting signal_triage");

    let args = Args::parse();
    let (config_path, explicit) = resolve_config_path(args.config.as_deref());
    let cfg = load_config(&config_path, explicit)?;
    let store = FeedbackStore::new(cfg.data_file.clone());

    match args.command {
        Command::Ingest { file, offline } => {
            let classifier = build_classifier(&cfg, offline, &config_path)?;
            let raws = read_raw_feedback(file.as_ref())?;
            orchestrator::run_ingest(&store, &classifier, raws).await
        }
        Command::Seed {
            count,
            seed,
            offline,
        } => {
            let classifier = build_classifier(&cfg, offline, &config_path)?;
            info!("Seeding mock feedback - count={}, seed={}", count, seed);
            let raws = ingest::generate_feedback(count, seed);
            orchestrator::run_ingest(&store, &classifier, raws).await
        }
        Command::Report {
            output_dir,
            theme,
            kind,
        } => orchestrator::run_report(&store, &output_dir, theme.as_deref(), kind),
    }
}
