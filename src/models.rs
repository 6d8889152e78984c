use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw feedback as submitted, before any classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFeedback {
    pub title: String,
    pub body: String,
    pub author: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl RawFeedback {
    /// Combined text handed to classifiers; title and body joined.
    pub fn text_for_classification(&self) -> String {
        format!("{} {}", self.title, self.body).trim().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    P0, // critical
    P1, // major
    P2, // minor
    P3, // cosmetic
}

impl Severity {
    /// Fixed precedence order, worst first.
    pub const ALL: [Severity; 4] = [Severity::P0, Severity::P1, Severity::P2, Severity::P3];

    pub fn parse(s: &str) -> Option<Severity> {
        let s = s.trim();
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::P0 => "P0",
            Severity::P1 => "P1",
            Severity::P2 => "P2",
            Severity::P3 => "P3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    High,
    MediumHigh,
    Medium,
    Low,
}

impl Priority {
    /// Descending rank order.
    pub const ALL: [Priority; 4] = [
        Priority::High,
        Priority::MediumHigh,
        Priority::Medium,
        Priority::Low,
    ];

    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium-high" | "medium_high" => Some(Priority::MediumHigh),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::MediumHigh => "medium-high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserTier {
    Enterprise,
    Business,
    Free,
    #[default]
    Unknown,
}

impl UserTier {
    pub fn parse(s: &str) -> Option<UserTier> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enterprise" => Some(UserTier::Enterprise),
            "business" => Some(UserTier::Business),
            "free" => Some(UserTier::Free),
            "unknown" => Some(UserTier::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserTier::Enterprise => "Enterprise",
            UserTier::Business => "Business",
            UserTier::Free => "Free",
            UserTier::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn parse(s: &str) -> Option<Sentiment> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::InProgress => "in-progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }
}

/// Bug vs feedback, carrying the one rating field that applies.
/// The other side is structurally absent, so a record can never hold
/// a stale severity on a feedback item or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Disposition {
    Bug { severity: Severity },
    Feedback { priority: Priority },
}

/// Plain bug/feedback tag, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Bug,
    Feedback,
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bug" => Ok(ItemKind::Bug),
            "feedback" => Ok(ItemKind::Feedback),
            other => Err(format!("unknown kind {other:?} (expected bug or feedback)")),
        }
    }
}

/// Validated classification of one feedback record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(flatten)]
    pub disposition: Disposition,
    pub theme: String,
    #[serde(default)]
    pub user_tier: UserTier,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

/// One feedback record after ingestion. `status` is the only field that
/// may change after creation; `analysis` is None for records that were
/// never classified (such records are excluded from aggregation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub analysis: Option<Analysis>,
}

impl ClassifiedItem {
    pub fn severity(&self) -> Option<Severity> {
        match self.analysis.as_ref()?.disposition {
            Disposition::Bug { severity } => Some(severity),
            Disposition::Feedback { .. } => None,
        }
    }

    pub fn priority(&self) -> Option<Priority> {
        match self.analysis.as_ref()?.disposition {
            Disposition::Feedback { priority } => Some(priority),
            Disposition::Bug { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<ItemKind> {
        match self.analysis.as_ref()?.disposition {
            Disposition::Bug { .. } => Some(ItemKind::Bug),
            Disposition::Feedback { .. } => Some(ItemKind::Feedback),
        }
    }

    pub fn theme(&self) -> Option<&str> {
        self.analysis.as_ref().map(|a| a.theme.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Red,
    Yellow,
    Green,
}

impl TrafficLight {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficLight::Red => "red",
            TrafficLight::Yellow => "yellow",
            TrafficLight::Green => "green",
        }
    }
}

/// Derived view of one theme; recomputed on every aggregation pass and
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeGroup {
    pub theme: String,
    pub bugs: Vec<ClassifiedItem>,
    pub feedback: Vec<ClassifiedItem>,
    pub aggregated_severity: Option<Severity>,
    pub aggregated_priority: Option<Priority>,
    pub traffic_light: TrafficLight,
    pub total_count: usize,
}
