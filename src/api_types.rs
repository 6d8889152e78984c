use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::{Analysis, Disposition, Priority, Sentiment, Severity, UserTier};

/// Request body for the oracle's analyze endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
}

/// Raw oracle response. Every field is optional at the wire level; the
/// model behind the endpoint does not reliably honor its own schema, so
/// decoding is tolerant and `into_analysis` does the actual checking.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OracleAnalysis {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub theme: Option<String>,
    pub severity: Option<String>,
    pub priority: Option<String>,
    pub user_tier: Option<String>,
    pub sentiment: Option<String>,
    pub key_points: Vec<String>,
    pub suggested_tags: Vec<String>,
    pub summary: Option<String>,
}

impl OracleAnalysis {
    /// Validate the raw payload into an `Analysis`.
    ///
    /// The type tag gates which rating field must be present: a bug needs a
    /// canonical severity and no priority, a feedback item the reverse.
    /// Tier and sentiment are ranking inputs only, so unrecognized values
    /// default instead of failing. Any error here sends the item to the
    /// fallback classifier.
    pub fn into_analysis(self) -> Result<Analysis> {
        let theme = match self.theme.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => bail!("missing theme"),
        };

        let disposition = match self.kind.as_deref().map(str::trim) {
            Some(k) if k.eq_ignore_ascii_case("bug") => {
                if let Some(p) = self.priority.as_deref() {
                    bail!("bug carries a priority ({p:?})");
                }
                let severity = self
                    .severity
                    .as_deref()
                    .and_then(Severity::parse)
                    .ok_or_else(|| {
                        anyhow::anyhow!("bug without a canonical severity ({:?})", self.severity)
                    })?;
                Disposition::Bug { severity }
            }
            Some(k) if k.eq_ignore_ascii_case("feedback") => {
                if let Some(s) = self.severity.as_deref() {
                    bail!("feedback carries a severity ({s:?})");
                }
                let priority = self
                    .priority
                    .as_deref()
                    .and_then(Priority::parse)
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "feedback without a canonical priority ({:?})",
                            self.priority
                        )
                    })?;
                Disposition::Feedback { priority }
            }
            other => bail!("unknown classification type {other:?}"),
        };

        Ok(Analysis {
            disposition,
            theme,
            user_tier: self
                .user_tier
                .as_deref()
                .and_then(UserTier::parse)
                .unwrap_or_default(),
            sentiment: self
                .sentiment
                .as_deref()
                .and_then(Sentiment::parse)
                .unwrap_or_default(),
            key_points: self.key_points,
            suggested_tags: self.suggested_tags,
            summary: self.summary.unwrap_or_default(),
        })
    }
}
