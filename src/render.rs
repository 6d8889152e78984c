// src/render.rs
use itertools::Itertools;

use crate::models::{ClassifiedItem, ThemeGroup, TrafficLight};
use crate::score::impact_score;

/// Buckets are truncated to this many items in the report; the underlying
/// groups keep their full sorted sequences.
const TOP_PER_BUCKET: usize = 5;

fn light_symbol(light: TrafficLight) -> &'static str {
    match light {
        TrafficLight::Red => "🔴",
        TrafficLight::Yellow => "🟡",
        TrafficLight::Green => "🟢",
    }
}

fn capitalize_token(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Display form of a theme key. Grouping stays case-sensitive; this only
/// affects what the reader sees.
pub fn capitalize_words(s: &str) -> String {
    let lower = s.to_lowercase();
    match lower.as_str() {
        "api" => return "API".to_string(),
        "ui" => return "UI".to_string(),
        "ux" => return "UX".to_string(),
        "ui/ux" | "ui-ux" | "ui_ux" => return "UI/UX".to_string(),
        _ => {}
    }

    let is_sep = |c: char| c.is_whitespace() || c == '_' || c == '-';
    if lower.contains("ui") && lower.contains("ux") {
        s.split(is_sep)
            .filter(|w| !w.is_empty())
            .map(|w| {
                let lw = w.to_lowercase();
                if lw == "ui" || lw == "ux" {
                    w.to_uppercase()
                } else {
                    capitalize_token(w)
                }
            })
            .join("/")
    } else {
        s.split(is_sep)
            .filter(|w| !w.is_empty())
            .map(|w| {
                if w.to_lowercase() == "api" {
                    "API".to_string()
                } else {
                    capitalize_token(w)
                }
            })
            .join(" ")
    }
}

pub fn render_report(groups: &[ThemeGroup]) -> String {
    let mut out = String::new();
    out.push_str("# Feedback Themes\n\n");

    if groups.is_empty() {
        out.push_str("No classified feedback yet. Ingest items to see them grouped by theme.\n");
        return out;
    }

    for g in groups {
        out.push_str(&format!(
            "## {} {} — {} tickets • {} bugs • {} feedback\n",
            light_symbol(g.traffic_light),
            capitalize_words(&g.theme),
            g.total_count,
            g.bugs.len(),
            g.feedback.len()
        ));

        let mut badges = Vec::new();
        if let Some(sev) = g.aggregated_severity {
            badges.push(format!("severity {}", sev.as_str()));
        }
        if let Some(prio) = g.aggregated_priority {
            badges.push(format!("priority {}", prio.as_str()));
        }
        if !badges.is_empty() {
            out.push_str(&format!("{}\n", badges.join(" | ")));
        }
        out.push('\n');

        if !g.bugs.is_empty() {
            out.push_str("Bugs:\n");
            for item in g.bugs.iter().take(TOP_PER_BUCKET) {
                let sev = item.severity().map(|s| s.as_str()).unwrap_or("??");
                out.push_str(&format!(
                    "- [{}] {} ({}, {})\n",
                    sev,
                    item.title,
                    item.status.as_str(),
                    item.author
                ));
            }
            if g.bugs.len() > TOP_PER_BUCKET {
                out.push_str(&format!(
                    "+{} more bugs (showing top {} critical)\n",
                    g.bugs.len() - TOP_PER_BUCKET,
                    TOP_PER_BUCKET
                ));
            }
            out.push('\n');
        }

        if !g.feedback.is_empty() {
            out.push_str("Feedback:\n");
            for item in g.feedback.iter().take(TOP_PER_BUCKET) {
                let prio = item.priority().map(|p| p.as_str()).unwrap_or("??");
                let tier = item
                    .analysis
                    .as_ref()
                    .map(|a| a.user_tier.as_str())
                    .unwrap_or("Unknown");
                out.push_str(&format!(
                    "- [{}] {} (score {:.1}, {}, {})\n",
                    prio,
                    item.title,
                    impact_score(item),
                    tier,
                    item.status.as_str()
                ));
            }
            if g.feedback.len() > TOP_PER_BUCKET {
                out.push_str(&format!(
                    "+{} more feedback items (showing top {} impactful)\n",
                    g.feedback.len() - TOP_PER_BUCKET,
                    TOP_PER_BUCKET
                ));
            }
            out.push('\n');
        }
    }

    out
}

/// Plain-text serialization of a filtered item set, the shape the download
/// endpoint hands to external formatters.
pub fn render_items_text(items: &[&ClassifiedItem]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Feedback export — {} item(s)\n\n", items.len()));

    for item in items {
        let label = match (&item.severity(), &item.priority()) {
            (Some(sev), _) => format!("bug/{}", sev.as_str()),
            (_, Some(prio)) => format!("feedback/{}", prio.as_str()),
            _ => "unclassified".to_string(),
        };
        out.push_str(&format!("[{}] {}\n", label, item.title));
        out.push_str(&format!(
            "Author: {} | Created: {} | Status: {}\n",
            item.author,
            item.created_at.format("%Y-%m-%d %H:%M"),
            item.status.as_str()
        ));
        if let Some(analysis) = &item.analysis {
            out.push_str(&format!(
                "Theme: {} | Tier: {} | Tags: {}\n",
                analysis.theme,
                analysis.user_tier.as_str(),
                analysis.suggested_tags.iter().join(", ")
            ));
            if !analysis.summary.is_empty() {
                out.push_str(&format!("Summary: {}\n", analysis.summary));
            }
        }
        if !item.body.is_empty() {
            out.push_str(&format!("{}\n", item.body));
        }
        out.push_str("---\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Analysis, Disposition, Sentiment, Severity, Status, UserTier};
    use crate::themes::aggregate;
    use chrono::Utc;

    fn bug(id: &str, theme: &str, severity: Severity) -> ClassifiedItem {
        ClassifiedItem {
            id: id.into(),
            title: format!("bug {id}"),
            body: "details".into(),
            author: "user@example.com".into(),
            created_at: Utc::now(),
            status: Status::New,
            analysis: Some(Analysis {
                disposition: Disposition::Bug { severity },
                theme: theme.into(),
                user_tier: UserTier::Unknown,
                sentiment: Sentiment::Negative,
                key_points: vec![],
                suggested_tags: vec![theme.into()],
                summary: "it broke".into(),
            }),
        }
    }

    #[test]
    fn capitalization_handles_the_special_labels() {
        assert_eq!(capitalize_words("api"), "API");
        assert_eq!(capitalize_words("ui"), "UI");
        assert_eq!(capitalize_words("ui/ux"), "UI/UX");
        assert_eq!(capitalize_words("ui_ux"), "UI/UX");
        assert_eq!(capitalize_words("mobile ui and ux"), "Mobile/UI/And/UX");
        assert_eq!(capitalize_words("performance"), "Performance");
        assert_eq!(capitalize_words("api rate-limits"), "API Rate Limits");
    }

    #[test]
    fn report_caps_buckets_at_five() {
        let items: Vec<ClassifiedItem> = (0..8)
            .map(|i| bug(&format!("b{i}"), "api", Severity::P2))
            .collect();
        let report = render_report(&aggregate(&items));

        assert!(report.contains("## 🟡 API — 8 tickets • 8 bugs • 0 feedback"));
        assert!(report.contains("+3 more bugs (showing top 5 critical)"));
        assert_eq!(report.matches("- [P2]").count(), 5);
    }

    #[test]
    fn empty_report_has_a_friendly_message() {
        let report = render_report(&[]);
        assert!(report.contains("No classified feedback yet"));
    }

    #[test]
    fn items_text_includes_classification_and_body() {
        let item = bug("b1", "api", Severity::P0);
        let out = render_items_text(&[&item]);
        assert!(out.contains("[bug/P0] bug b1"));
        assert!(out.contains("Theme: api | Tier: Unknown | Tags: api"));
        assert!(out.contains("Summary: it broke"));
        assert!(out.contains("details"));
    }
}
