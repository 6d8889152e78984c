//! Classification Oracle boundary. The oracle is a JSON POST endpoint;
//! any transport, timeout, decode, or validation failure routes the item
//! through the fallback classifier instead of surfacing an error, so
//! classification as a whole never fails.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::api_types::{AnalyzeRequest, OracleAnalysis};
use crate::config::Config;
use crate::fallback;
use crate::models::{Analysis, RawFeedback};

pub struct OracleClient {
    client: Client,
    endpoint: url::Url,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Duration,
    batch_size: usize,
}

impl OracleClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint: cfg.analyze_url()?,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
            batch_size: cfg.batch_size.max(1),
        })
    }

    async fn try_classify(&self, raw: &RawFeedback) -> Result<Analysis> {
        let start = Instant::now();
        debug!(
            "Oracle call starting - title=\"{}\", text_length={} chars",
            raw.title,
            raw.body.len()
        );

        let request = AnalyzeRequest {
            text: &raw.body,
            title: &raw.title,
            model: self.model.as_deref(),
        };
        let mut req = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("request failed for {}", self.endpoint))?;
        let resp = resp
            .error_for_status()
            .with_context(|| format!("HTTP error for {}", self.endpoint))?;

        let payload: OracleAnalysis = resp
            .json()
            .await
            .with_context(|| format!("decoding JSON from {}", self.endpoint))?;
        let analysis = payload
            .into_analysis()
            .context("oracle response failed validation")?;

        debug!(
            "Oracle call completed - duration={:.2}s, theme={}",
            start.elapsed().as_secs_f32(),
            analysis.theme
        );
        Ok(analysis)
    }

    /// Classify one item, recovering locally via the fallback classifier.
    pub async fn classify(&self, raw: &RawFeedback) -> Analysis {
        match self.try_classify(raw).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(
                    "Oracle classification failed, using fallback - title=\"{}\", error={:#}",
                    raw.title, e
                );
                fallback::classify(&raw.text_for_classification())
            }
        }
    }

    /// Classify a batch, fanning out `batch_size` concurrent calls per
    /// round to respect the oracle's rate limits. Results preserve input
    /// order; a failed item falls back rather than aborting the batch.
    pub async fn classify_batch(&self, raws: &[RawFeedback]) -> Vec<Analysis> {
        let total = raws.len();
        if total == 0 {
            return Vec::new();
        }
        info!(
            "Batch classification starting - items={}, batch_size={}",
            total, self.batch_size
        );

        let mut out = Vec::with_capacity(total);
        let mut total_llm_time = 0.0f32;
        for chunk in raws.chunks(self.batch_size) {
            let batch_start = Instant::now();
            let results =
                futures::future::join_all(chunk.iter().map(|raw| self.classify(raw))).await;
            out.extend(results);

            let batch_elapsed = batch_start.elapsed().as_secs_f32();
            total_llm_time += batch_elapsed;
            let pct = (out.len() as f32 / total as f32 * 100.0) as u32;
            info!(
                "Classification progress: {}/{} ({}%) | batch of {}: {:.1}s",
                out.len(),
                total,
                pct,
                chunk.len(),
                batch_elapsed
            );
        }

        info!(
            "Batch classification completed - items={}, duration={:.2}s, avg_per_item={:.2}s",
            total,
            total_llm_time,
            total_llm_time / total as f32
        );
        out
    }
}

/// Either the live oracle or the standalone fallback classifier.
pub enum Classifier {
    Oracle(OracleClient),
    Offline,
}

impl Classifier {
    pub async fn classify_all(&self, raws: &[RawFeedback]) -> Vec<Analysis> {
        match self {
            Classifier::Oracle(client) => client.classify_batch(raws).await,
            Classifier::Offline => {
                debug!("Offline classification - items={}", raws.len());
                raws.iter()
                    .map(|raw| fallback::classify(&raw.text_for_classification()))
                    .collect()
            }
        }
    }
}
