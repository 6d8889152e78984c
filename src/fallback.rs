//! Deterministic keyword classifier, used whenever the oracle fails or
//! returns output that does not validate. Also runs standalone in
//! `--offline` mode. Keyword checks are plain substring containment over
//! the NFC-lowercased text, applied in fixed order.

use unicode_normalization::UnicodeNormalization;

use crate::models::{Analysis, Disposition, Priority, Sentiment, Severity, UserTier};

const BUG_KEYWORDS: &[&str] = &[
    "bug", "error", "crash", "broken", "not working", "failing", "outage", "down", "500", "404",
];

const POSITIVE_KEYWORDS: &[&str] = &["positive", "satisfied", "good", "love"];
const NEGATIVE_KEYWORDS: &[&str] = &["negative", "problem", "issue"];

/// Scan order matters: first match wins.
const THEME_KEYWORDS: &[&str] = &[
    "performance",
    "ui",
    "ux",
    "feature",
    "bug",
    "security",
    "mobile",
    "integration",
    "api",
    "dashboard",
    "storage",
    "networking",
    "reliability",
];

const P0_KEYWORDS: &[&str] = &["outage", "down", "critical", "blocking all"];
const P1_KEYWORDS: &[&str] = &["degraded", "major", "enterprise", "failing"];
const P3_KEYWORDS: &[&str] = &["cosmetic", "typo", "alignment"];

const PRIORITY_BUMP_KEYWORDS: &[&str] = &["high impact", "crucial"];

const SUMMARY_MAX_CHARS: usize = 140;

fn normalize(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn severity_for(text: &str) -> Severity {
    if contains_any(text, P0_KEYWORDS) {
        Severity::P0
    } else if contains_any(text, P1_KEYWORDS) {
        Severity::P1
    } else if contains_any(text, P3_KEYWORDS) {
        Severity::P3
    } else {
        Severity::P2
    }
}

fn tier_and_priority_for(text: &str) -> (UserTier, Priority) {
    let (tier, seeded) = if text.contains("enterprise") {
        (UserTier::Enterprise, Priority::High)
    } else if text.contains("business") {
        (UserTier::Business, Priority::MediumHigh)
    } else if text.contains("free") || text.contains("tier") {
        (UserTier::Free, Priority::Low)
    } else {
        (UserTier::Unknown, Priority::Medium)
    };

    // "high impact"/"crucial" bumps: Low only reaches Medium, everything
    // else escalates to High.
    let priority = if contains_any(text, PRIORITY_BUMP_KEYWORDS) {
        if seeded == Priority::Low {
            Priority::Medium
        } else {
            Priority::High
        }
    } else {
        seeded
    };

    (tier, priority)
}

fn truncate_summary(text: &str) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
    out.push_str("...");
    out
}

/// Classify feedback text without the oracle.
pub fn classify(text: &str) -> Analysis {
    let lowered = normalize(text);

    let sentiment = if contains_any(&lowered, POSITIVE_KEYWORDS) {
        Sentiment::Positive
    } else if contains_any(&lowered, NEGATIVE_KEYWORDS) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let theme = THEME_KEYWORDS
        .iter()
        .find(|k| lowered.contains(*k))
        .map(|k| (*k).to_string())
        .unwrap_or_else(|| "general".to_string());

    let (disposition, user_tier) = if contains_any(&lowered, BUG_KEYWORDS) {
        (
            Disposition::Bug {
                severity: severity_for(&lowered),
            },
            UserTier::Unknown,
        )
    } else {
        let (tier, priority) = tier_and_priority_for(&lowered);
        (Disposition::Feedback { priority }, tier)
    };

    Analysis {
        disposition,
        suggested_tags: vec![theme.clone()],
        theme,
        user_tier,
        sentiment,
        key_points: vec![],
        summary: truncate_summary(text.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outage_text_is_a_p0_bug() {
        let analysis = classify("The service is down, looks like a full outage");
        assert_eq!(
            analysis.disposition,
            Disposition::Bug {
                severity: Severity::P0
            }
        );
    }

    #[test]
    fn severity_checks_run_in_fixed_order() {
        // "failing" (P1) and "typo" (P3) both match; P1 check runs first.
        let analysis = classify("Deploys are failing because of a typo in the config error");
        assert_eq!(
            analysis.disposition,
            Disposition::Bug {
                severity: Severity::P1
            }
        );

        let analysis = classify("Found a bug: cosmetic misalignment in the footer");
        assert_eq!(
            analysis.disposition,
            Disposition::Bug {
                severity: Severity::P3
            }
        );

        let analysis = classify("The save button is broken on Safari");
        assert_eq!(
            analysis.disposition,
            Disposition::Bug {
                severity: Severity::P2
            }
        );
    }

    #[test]
    fn positive_sentiment_takes_precedence() {
        let analysis = classify("I love this feature but there is a problem with it");
        assert_eq!(analysis.sentiment, Sentiment::Positive);

        let analysis = classify("There is a problem with the export");
        assert_eq!(analysis.sentiment, Sentiment::Negative);

        let analysis = classify("Just a question about the roadmap");
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn theme_scan_order_is_fixed() {
        // Both "api" and "performance" occur; "performance" is scanned first.
        let analysis = classify("Would like better performance from the api");
        assert_eq!(analysis.theme, "performance");

        let analysis = classify("Please support websockets");
        assert_eq!(analysis.theme, "general");
    }

    #[test]
    fn tier_keywords_seed_tier_and_priority() {
        let analysis = classify("Our enterprise team would like SSO");
        assert_eq!(analysis.user_tier, UserTier::Enterprise);
        assert_eq!(
            analysis.disposition,
            Disposition::Feedback {
                priority: Priority::High
            }
        );

        let analysis = classify("We are on the free plan and would like more quota");
        assert_eq!(analysis.user_tier, UserTier::Free);
        assert_eq!(
            analysis.disposition,
            Disposition::Feedback {
                priority: Priority::Low
            }
        );

        let analysis = classify("Would be nice to have dark mode");
        assert_eq!(analysis.user_tier, UserTier::Unknown);
        assert_eq!(
            analysis.disposition,
            Disposition::Feedback {
                priority: Priority::Medium
            }
        );
    }

    #[test]
    fn impact_keywords_bump_priority() {
        // Low escalates one step to Medium.
        let analysis = classify("Free tier request, but this is crucial for us");
        assert_eq!(
            analysis.disposition,
            Disposition::Feedback {
                priority: Priority::Medium
            }
        );

        // Anything else escalates straight to High.
        let analysis = classify("This would be high impact for our workflow");
        assert_eq!(
            analysis.disposition,
            Disposition::Feedback {
                priority: Priority::High
            }
        );
    }

    #[test]
    fn fallback_fills_the_oracle_contract_fields() {
        let analysis = classify("The dashboard is slow");
        assert_eq!(analysis.suggested_tags, vec!["dashboard".to_string()]);
        assert_eq!(analysis.summary, "The dashboard is slow");
        assert!(analysis.key_points.is_empty());
    }

    #[test]
    fn long_text_gets_a_truncated_summary() {
        let text = "x".repeat(400);
        let analysis = classify(&text);
        assert_eq!(analysis.summary.chars().count(), 143);
        assert!(analysis.summary.ends_with("..."));
    }
}
