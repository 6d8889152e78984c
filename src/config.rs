use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    5
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data/feedbacks.jsonl")
}

/// Runtime configuration, loaded from YAML. Only the oracle fields are
/// required, and only when the oracle is actually used; `--offline` runs
/// never touch them.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the classification worker, e.g. "http://localhost:8787".
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: None,
            api_key: None,
            model: None,
            timeout_secs: default_timeout_secs(),
            batch_size: default_batch_size(),
            data_file: default_data_file(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Full URL of the oracle's analyze endpoint.
    pub fn analyze_url(&self) -> Result<Url> {
        let base = self
            .api_base
            .as_deref()
            .ok_or_else(|| anyhow!("api_base missing from config (oracle endpoint unknown)"))?;
        let joined = format!("{}/api/analyze", base.trim_end_matches('/'));
        Url::parse(&joined).with_context(|| format!("invalid api_base {base:?}"))
    }
}
